// src/services/property_service.rs

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ContractRepository, PropertyRepository, UserRepository},
    models::{
        contract::Contract,
        property::{
            contract_owner_hint, contract_type_label, resolve_owner_name, Occupancy, PropertyDetail,
            PropertyListing, PropertyPayload, PropertyRecord, UserDirectory,
        },
    },
};

#[derive(Clone)]
pub struct PropertyService {
    repo: PropertyRepository,
    contract_repo: ContractRepository,
    user_repo: UserRepository,
}

impl PropertyService {
    pub fn new(repo: PropertyRepository, contract_repo: ContractRepository, user_repo: UserRepository) -> Self {
        Self {
            repo,
            contract_repo,
            user_repo,
        }
    }

    /// Listagem com nome do dono resolvido. A busca compara o número do imóvel
    /// ou o nome resolvido, sem diferenciar maiúsculas.
    pub async fn list(&self, search: Option<&str>, status: Option<&str>) -> Result<Vec<PropertyListing>, AppError> {
        let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<Occupancy>().map_err(AppError::InvalidOccupancy)?),
            None => None,
        };

        let pool = self.repo.pool();
        let properties = self.repo.list(pool, status).await?;
        let directory = UserDirectory::new(self.user_repo.list_names(pool).await?);

        let ids: Vec<Uuid> = properties.iter().map(|p| p.id).collect();
        let mut contracts_by_property: HashMap<Uuid, Vec<Contract>> = HashMap::new();
        for contract in self.contract_repo.list_for_properties(pool, &ids).await? {
            if let Some(property_id) = contract.property_id {
                contracts_by_property.entry(property_id).or_default().push(contract);
            }
        }

        let needle = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());

        let listings = properties
            .into_iter()
            .map(|property| {
                let contracts = contracts_by_property.get(&property.id).map(Vec::as_slice).unwrap_or(&[]);
                let hint = contract_owner_hint(contracts);
                PropertyListing {
                    owner_name: resolve_owner_name(&property, &directory, hint.as_deref()),
                    contract_type_label: contract_type_label(&property, contracts),
                    property,
                }
            })
            .filter(|listing| match &needle {
                None => true,
                Some(needle) => {
                    listing.property.numero.to_lowercase().contains(needle)
                        || listing
                            .owner_name
                            .as_deref()
                            .is_some_and(|name| name.to_lowercase().contains(needle))
                }
            })
            .collect();

        Ok(listings)
    }

    pub async fn detail(&self, id: Uuid) -> Result<PropertyDetail, AppError> {
        let pool = self.repo.pool();
        let property = self
            .repo
            .find_by_id(pool, id)
            .await?
            .ok_or(AppError::PropertyNotFound)?;

        let contracts = self.contract_repo.list_for_properties(pool, &[id]).await?;
        let directory = UserDirectory::new(self.user_repo.list_names(pool).await?);
        let hint = contract_owner_hint(&contracts);

        Ok(PropertyDetail {
            owner_name: resolve_owner_name(&property, &directory, hint.as_deref()),
            property,
            contracts,
        })
    }

    // Vincula o proprietário ao usuário de mesmo nome, se existir
    async fn record_from(&self, payload: &PropertyPayload) -> Result<PropertyRecord, AppError> {
        let matched = match payload.proprietario_nome.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => self.user_repo.find_id_by_name(self.repo.pool(), name).await?,
            _ => None,
        };
        Ok(PropertyRecord::from_payload(payload, matched))
    }

    pub async fn create(&self, payload: &PropertyPayload) -> Result<PropertyDetail, AppError> {
        let record = self.record_from(payload).await?;
        let property = self.repo.create(self.repo.pool(), &record).await?;

        tracing::info!(property_id = %property.id, "Imóvel cadastrado");
        self.detail(property.id).await
    }

    pub async fn update(&self, id: Uuid, payload: &PropertyPayload) -> Result<PropertyDetail, AppError> {
        let record = self.record_from(payload).await?;
        self.repo
            .update(self.repo.pool(), id, &record)
            .await?
            .ok_or(AppError::PropertyNotFound)?;

        self.detail(id).await
    }

    pub async fn update_occupancy(&self, id: Uuid, occupancy: Occupancy) -> Result<PropertyDetail, AppError> {
        self.repo
            .update_occupancy(self.repo.pool(), id, occupancy)
            .await?
            .ok_or(AppError::PropertyNotFound)?;

        tracing::info!(property_id = %id, status = ?occupancy, "Status do imóvel alterado");
        self.detail(id).await
    }

    /// Exclui o imóvel se nada o referencia. A checagem e a exclusão rodam na
    /// mesma transação; a FK RESTRICT cobre inserções concorrentes.
    pub async fn delete(&self, id: Option<Uuid>) -> Result<(), AppError> {
        let id = id.filter(|id| !id.is_nil()).ok_or(AppError::InvalidPropertyId)?;

        let mut tx = self.repo.pool().begin().await?;

        if !self.repo.exists(&mut *tx, id).await? {
            return Err(AppError::PropertyNotFound);
        }

        if self.repo.is_referenced(&mut *tx, id).await? {
            tracing::warn!(property_id = %id, "Exclusão bloqueada: imóvel em uso");
            return Err(AppError::PropertyInUse);
        }

        self.repo.delete(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!(property_id = %id, "Imóvel excluído");
        Ok(())
    }
}
