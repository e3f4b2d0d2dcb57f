// src/services/billing_service.rs

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        storage::{file_extension, FileStore, UploadArea},
    },
    db::PaymentRepository,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{authorize, ensure, Action, Decision},
    },
    models::auth::Role,
    models::payment::{
        ChargeRow, FinancialOverview, FinancialPage, FinancialSummary, NewCharge, Payment, PaymentView,
        ProofUploaded,
    },
};

#[derive(Clone)]
pub struct BillingService {
    repo: PaymentRepository,
    file_store: Arc<dyn FileStore>,
    pix_payload: String,
}

impl BillingService {
    pub fn new(repo: PaymentRepository, file_store: Arc<dyn FileStore>, pix_payload: String) -> Self {
        Self {
            repo,
            file_store,
            pix_payload,
        }
    }

    /// GET /Financial: visão geral para o gestor, cobrança do mês para os demais.
    pub async fn financial_page(&self, user: &AuthenticatedUser) -> Result<FinancialPage, AppError> {
        let now = Local::now().naive_local();

        if authorize(user.role, Action::ViewFinancialOverview) == Decision::Allow {
            return Ok(FinancialPage::Overview(self.overview(now).await?));
        }

        let charge = self.current_charge(user.id, now).await?;
        Ok(FinancialPage::OwnCharge {
            charge: PaymentView::for_role(&charge, user.role, now),
        })
    }

    async fn overview(&self, now: NaiveDateTime) -> Result<FinancialOverview, AppError> {
        let rows = self.repo.list_with_payers(self.repo.pool()).await?;

        let charges: Vec<ChargeRow> = rows
            .iter()
            .map(|row| ChargeRow {
                // Na visão do gestor os valores aparecem sem desconto
                charge: PaymentView::for_role(&row.payment, Role::Gestor, now),
                payer_name: row.payer_name(),
                apartment: row.apartment(),
            })
            .collect();

        Ok(FinancialOverview {
            summary: FinancialSummary::from_rows(&charges),
            charges,
        })
    }

    /// Garante a cobrança do mês corrente e devolve a mais recente por vencimento.
    pub async fn current_charge(&self, user_id: Uuid, now: NaiveDateTime) -> Result<Payment, AppError> {
        let charge = NewCharge::monthly(user_id, now.date(), &self.pix_payload);

        if self.repo.ensure_monthly_charge(self.repo.pool(), &charge).await? {
            tracing::info!(user_id = %user_id, mes = %charge.mes_referencia, "Cobrança mensal gerada");
        }

        self.repo
            .latest_for_user(self.repo.pool(), user_id)
            .await?
            .ok_or(AppError::PaymentNotFound)
    }

    /// Cobrança visível para o usuário: qualquer uma para o gestor, só as próprias para os demais.
    pub async fn visible_charge(&self, user: &AuthenticatedUser, payment_id: Uuid) -> Result<Payment, AppError> {
        let payment = self
            .repo
            .find_by_id(self.repo.pool(), payment_id)
            .await?
            .ok_or(AppError::PaymentNotFound)?;

        if payment.user_id != user.id {
            ensure(user.role, Action::UploadAnyPaymentProof)
                .map_err(|_| AppError::Forbidden("policy.not_owner"))?;
        }

        Ok(payment)
    }

    /// Grava o comprovante e marca a cobrança como paga. Qualquer tipo de arquivo é aceito.
    pub async fn upload_proof(
        &self,
        user: &AuthenticatedUser,
        payment_id: Uuid,
        file_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<ProofUploaded, AppError> {
        if bytes.is_empty() {
            return Err(AppError::MissingFile);
        }

        self.visible_charge(user, payment_id).await?;

        let extension = file_extension(file_name.unwrap_or_default());
        let stored = self.file_store.save(UploadArea::Comprovantes, &extension, bytes).await?;

        let updated = match self
            .repo
            .attach_proof(self.repo.pool(), payment_id, &stored.public_path)
            .await
        {
            Ok(Some(payment)) => payment,
            Ok(None) => {
                self.file_store.remove(&stored).await?;
                return Err(AppError::PaymentNotFound);
            }
            Err(e) => {
                if let Err(cleanup) = self.file_store.remove(&stored).await {
                    tracing::error!(path = %stored.public_path, "Falha ao remover comprovante órfão: {}", cleanup);
                }
                return Err(e);
            }
        };

        tracing::info!(payment_id = %updated.id, user_id = %user.id, "Comprovante registrado");

        Ok(ProofUploaded {
            success: true,
            message: "Comprovante enviado com sucesso!".to_string(),
            comprovante_path: stored.public_path,
        })
    }
}
