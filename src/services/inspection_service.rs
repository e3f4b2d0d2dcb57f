// src/services/inspection_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        storage::{validate_photo, FileStore, UploadArea},
    },
    db::{NoticeRepository, PropertyRepository},
    middleware::{
        auth::AuthenticatedUser,
        rbac::{authorize, ensure, Action, Decision},
    },
    models::notice::{
        default_tab, plan_checklist_updates, ChecklistItemUpdate, ChecklistSaved, ChecklistView, Notice,
        NoticeDetails, NoticeHistory, NoticeIndex, NoticeStatus, NoticeSummary, PhotoUploaded,
        StartInspectionResponse,
    },
};

// Foto recebida no multipart, ainda não validada
pub struct PhotoUpload<'a> {
    pub notice_id: Uuid,
    pub checklist_item_id: Option<Uuid>,
    pub file_name: Option<&'a str>,
    pub bytes: &'a [u8],
}

#[derive(Clone)]
pub struct InspectionService {
    repo: NoticeRepository,
    property_repo: PropertyRepository,
    file_store: Arc<dyn FileStore>,
}

impl InspectionService {
    pub fn new(repo: NoticeRepository, property_repo: PropertyRepository, file_store: Arc<dyn FileStore>) -> Self {
        Self {
            repo,
            property_repo,
            file_store,
        }
    }

    // Gestor e síndico veem tudo; morador só o que solicitou
    fn scope(user: &AuthenticatedUser) -> Option<Uuid> {
        match authorize(user.role, Action::ViewAllInspections) {
            Decision::Allow => None,
            Decision::Deny(_) => Some(user.id),
        }
    }

    async fn visible_notice(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Notice, AppError> {
        let notice = self
            .repo
            .find_by_id(self.repo.pool(), id)
            .await?
            .ok_or(AppError::InspectionNotFound)?;

        match Self::scope(user) {
            Some(owner) if notice.solicitante_id != owner => Err(AppError::InspectionNotFound),
            _ => Ok(notice),
        }
    }

    // =========================================================================
    //  TRANSIÇÕES
    // =========================================================================

    /// Cria uma vistoria Pendente em nome de quem solicita.
    pub async fn request(&self, user: &AuthenticatedUser, property_id: Option<Uuid>) -> Result<Notice, AppError> {
        ensure(user.role, Action::RequestInspection)?;

        let mut tx = self.repo.pool().begin().await?;

        if let Some(property_id) = property_id {
            if !self.property_repo.exists(&mut *tx, property_id).await? {
                return Err(AppError::PropertyNotFound);
            }
        }

        let notice = self
            .repo
            .create(&mut *tx, user.id, None, property_id, NoticeStatus::Pendente)
            .await?;
        tx.commit().await?;

        tracing::info!(notice_id = %notice.id, user_id = %user.id, "Vistoria solicitada");
        Ok(notice)
    }

    /// Assume a vistoria existente: gestor := chamador, status EmProgresso e
    /// checklist padrão semeado se ainda não houver itens.
    pub async fn start_existing(&self, gestor: &AuthenticatedUser, notice_id: Uuid) -> Result<ChecklistView, AppError> {
        let mut tx = self.repo.pool().begin().await?;

        let notice = self
            .repo
            .lock_by_id(&mut *tx, notice_id)
            .await?
            .ok_or(AppError::InspectionNotFound)?;
        notice.ensure_open()?;

        self.repo.mark_in_progress(&mut *tx, notice_id, gestor.id).await?;

        if self.repo.item_ids(&mut *tx, notice_id).await?.is_empty() {
            let seeded = self.repo.seed_checklist(&mut *tx, notice_id).await?;
            tracing::info!(notice_id = %notice_id, items = seeded, "Checklist padrão criado");
        }

        tx.commit().await?;

        tracing::info!(notice_id = %notice_id, gestor_id = %gestor.id, "Vistoria iniciada");
        self.checklist(gestor, notice_id, false).await
    }

    /// Cria a vistoria já em andamento para o imóvel, com os 15 itens, numa transação.
    pub async fn start_for_property(
        &self,
        gestor: &AuthenticatedUser,
        property_id: Uuid,
    ) -> Result<StartInspectionResponse, AppError> {
        let mut tx = self.repo.pool().begin().await?;

        if !self.property_repo.exists(&mut *tx, property_id).await? {
            return Err(AppError::PropertyNotFound);
        }

        let notice = self
            .repo
            .create(
                &mut *tx,
                gestor.id,
                Some(gestor.id),
                Some(property_id),
                NoticeStatus::EmProgresso,
            )
            .await?;

        self.repo.seed_checklist(&mut *tx, notice.id).await?;
        let item_ids = self.repo.item_ids(&mut *tx, notice.id).await?;

        tx.commit().await?;

        tracing::info!(notice_id = %notice.id, property_id = %property_id, "Vistoria aberta pelo gestor");
        Ok(StartInspectionResponse {
            success: true,
            notice_id: notice.id,
            item_ids,
        })
    }

    pub async fn save_checklist(
        &self,
        notice_id: Uuid,
        updates: &[ChecklistItemUpdate],
    ) -> Result<ChecklistSaved, AppError> {
        let mut tx = self.repo.pool().begin().await?;

        let notice = self
            .repo
            .lock_by_id(&mut *tx, notice_id)
            .await?
            .ok_or(AppError::InspectionNotFound)?;
        notice.ensure_open()?;

        let items = self.repo.list_items(&mut *tx, notice_id).await?;
        let plan = plan_checklist_updates(&items, updates);

        let mut updated = 0;
        for (item_id, status) in &plan {
            if self.repo.set_item_status(&mut *tx, notice_id, *item_id, *status).await? {
                updated += 1;
            }
        }

        tx.commit().await?;

        if plan.len() < updates.len() {
            tracing::debug!(
                notice_id = %notice_id,
                skipped = updates.len() - plan.len(),
                "Itens ignorados ao salvar checklist"
            );
        }

        Ok(ChecklistSaved {
            success: true,
            message: "Checklist salvo com sucesso!".to_string(),
            updated,
        })
    }

    /// Valida o arquivo antes de qualquer acesso ao banco ou ao disco.
    pub async fn upload_photo(
        &self,
        user: &AuthenticatedUser,
        upload: PhotoUpload<'_>,
    ) -> Result<PhotoUploaded, AppError> {
        let extension = validate_photo(upload.file_name, upload.bytes.len()).inspect_err(|e| {
            tracing::warn!(notice_id = %upload.notice_id, size = upload.bytes.len(), "Foto rejeitada: {}", e);
        })?;

        ensure(user.role, Action::AttachInspectionPhoto)?;

        let notice = self.visible_notice(user, upload.notice_id).await?;
        notice.ensure_open()?;

        if let Some(item_id) = upload.checklist_item_id {
            if !self.repo.item_belongs_to(self.repo.pool(), notice.id, item_id).await? {
                return Err(AppError::ChecklistItemNotInInspection);
            }
        }

        let stored = self.file_store.save(UploadArea::Vistorias, &extension, upload.bytes).await?;

        let foto = match self
            .repo
            .insert_foto(self.repo.pool(), notice.id, upload.checklist_item_id, &stored.public_path)
            .await
        {
            Ok(foto) => foto,
            Err(e) => {
                if let Err(cleanup) = self.file_store.remove(&stored).await {
                    tracing::error!(path = %stored.public_path, "Falha ao remover foto órfã: {}", cleanup);
                }
                return Err(e);
            }
        };

        tracing::info!(notice_id = %notice.id, foto_id = %foto.id, "Foto de vistoria registrada");
        Ok(PhotoUploaded {
            success: true,
            file_path: stored.public_path,
            file_name: stored.file_name,
        })
    }

    pub async fn conclude(&self, notice_id: Uuid) -> Result<Notice, AppError> {
        let mut tx = self.repo.pool().begin().await?;

        let notice = self
            .repo
            .lock_by_id(&mut *tx, notice_id)
            .await?
            .ok_or(AppError::InspectionNotFound)?;
        notice.ensure_open()?;

        let concluded = self.repo.mark_resolved(&mut *tx, notice_id).await?;
        tx.commit().await?;

        tracing::info!(notice_id = %notice_id, "Vistoria concluída");
        Ok(concluded)
    }

    // =========================================================================
    //  CONSULTAS
    // =========================================================================

    async fn summaries(&self, user: &AuthenticatedUser, notice_id: Option<Uuid>) -> Result<Vec<NoticeSummary>, AppError> {
        let rows = self
            .repo
            .list_summaries(self.repo.pool(), Self::scope(user), notice_id)
            .await?;
        Ok(rows.into_iter().map(NoticeSummary::from).collect())
    }

    pub async fn index(&self, user: &AuthenticatedUser, tab: Option<&str>) -> Result<NoticeIndex, AppError> {
        Ok(NoticeIndex {
            active_tab: default_tab(user.role, tab),
            notices: self.summaries(user, None).await?,
            properties: self.property_repo.list_options(self.repo.pool()).await?,
        })
    }

    pub async fn history(&self, user: &AuthenticatedUser) -> Result<NoticeHistory, AppError> {
        Ok(NoticeHistory::split(self.summaries(user, None).await?))
    }

    /// Checklist com itens na ordem do modelo. `read_only` vem da rota usada.
    pub async fn checklist(
        &self,
        user: &AuthenticatedUser,
        notice_id: Uuid,
        read_only: bool,
    ) -> Result<ChecklistView, AppError> {
        let notice = self
            .summaries(user, Some(notice_id))
            .await?
            .into_iter()
            .next()
            .ok_or(AppError::InspectionNotFound)?;

        let pool = self.repo.pool();
        Ok(ChecklistView {
            itens: self.repo.list_items(pool, notice_id).await?,
            fotos: self.repo.list_fotos(pool, notice_id).await?,
            notice,
            read_only,
        })
    }

    pub async fn item_ids(&self, user: &AuthenticatedUser, notice_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let notice = self.visible_notice(user, notice_id).await?;
        self.repo.item_ids(self.repo.pool(), notice.id).await
    }

    pub async fn details(&self, user: &AuthenticatedUser, notice_id: Uuid) -> Result<NoticeDetails, AppError> {
        let notice = self.visible_notice(user, notice_id).await?;
        let pool = self.repo.pool();

        let items = self.repo.list_items(pool, notice.id).await?;
        let fotos = self.repo.list_fotos(pool, notice.id).await?;

        Ok(NoticeDetails::new(&notice, items, fotos))
    }
}
