// src/services/contract_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ContractRepository, PropertyRepository},
    models::{
        contract::{Contract, ContractListing, ContractPayload, ContractSaved, ContractType},
        property::unit_display,
    },
};

#[derive(Clone)]
pub struct ContractService {
    repo: ContractRepository,
    property_repo: PropertyRepository,
}

impl ContractService {
    pub fn new(repo: ContractRepository, property_repo: PropertyRepository) -> Self {
        Self { repo, property_repo }
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        kind: Option<ContractType>,
    ) -> Result<Vec<ContractListing>, AppError> {
        let rows = self.repo.list(self.repo.pool(), search, kind).await?;

        Ok(rows
            .into_iter()
            .map(|row| ContractListing {
                property_display: row
                    .property_numero
                    .as_deref()
                    .map(|numero| unit_display(row.property_bloco.as_deref(), numero)),
                contract: row.contract,
            })
            .collect())
    }

    pub async fn details(&self, id: Uuid) -> Result<Contract, AppError> {
        self.repo
            .find_by_id(self.repo.pool(), id)
            .await?
            .ok_or(AppError::ContractNotFound)
    }

    async fn ensure_property(&self, payload: &ContractPayload) -> Result<(), AppError> {
        if let Some(property_id) = payload.property_id {
            if !self.property_repo.exists(self.repo.pool(), property_id).await? {
                return Err(AppError::PropertyNotFound);
            }
        }
        Ok(())
    }

    pub async fn create(&self, kind: ContractType, payload: &ContractPayload) -> Result<ContractSaved, AppError> {
        self.ensure_property(payload).await?;
        let contract = self.repo.create(self.repo.pool(), kind, payload).await?;

        tracing::info!(contract_id = %contract.id, kind = ?kind, "Contrato cadastrado");
        Ok(saved(contract))
    }

    pub async fn update(
        &self,
        id: Uuid,
        kind: ContractType,
        payload: &ContractPayload,
    ) -> Result<ContractSaved, AppError> {
        self.ensure_property(payload).await?;
        let contract = self
            .repo
            .update(self.repo.pool(), id, kind, payload)
            .await?
            .ok_or(AppError::ContractNotFound)?;

        Ok(saved(contract))
    }

    pub async fn delete(&self, id: Uuid) -> Result<ContractType, AppError> {
        let contract = self.details(id).await?;
        self.repo.delete(self.repo.pool(), id).await?;

        tracing::info!(contract_id = %id, "Contrato excluído");
        Ok(contract.kind)
    }
}

fn saved(contract: Contract) -> ContractSaved {
    ContractSaved {
        success: true,
        tab: contract.kind.tab().to_string(),
        contract,
    }
}
