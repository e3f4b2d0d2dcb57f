// src/handlers/notice.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::upload_form::UploadForm,
    middleware::{
        auth::AuthenticatedUser,
        extract::{ApiJson, ApiMultipart, ApiPath, ApiQuery},
        i18n::Locale,
        rbac::{PermManageInspections, RequirePermission},
    },
    models::{
        notice::{
            ChecklistItemUpdate, ChecklistSaved, ChecklistView, IniciarVistoriaPayload, ItemIdsResponse, Notice,
            NoticeDetailsResponse, NoticeHistory, NoticeIndex, PhotoUploaded, SolicitarVistoriaPayload,
            StartInspectionResponse,
        },
        ActionResult,
    },
    services::inspection_service::PhotoUpload,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct NoticeTabQuery {
    /// Aba ativa: "checklist" ou "historico"
    pub tab: Option<String>,
}

// GET /Notice
#[utoipa::path(
    get,
    path = "/Notice",
    tag = "Notice",
    params(NoticeTabQuery),
    responses((status = 200, description = "Vistorias visíveis ao usuário", body = NoticeIndex)),
    security(("api_jwt" = []))
)]
pub async fn notice_index(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    ApiQuery(query): ApiQuery<NoticeTabQuery>,
) -> Result<Json<NoticeIndex>, ApiError> {
    let index = app_state
        .inspection_service
        .index(&user, query.tab.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(index))
}

// GET /Notice/Historico
#[utoipa::path(
    get,
    path = "/Notice/Historico",
    tag = "Notice",
    responses((status = 200, description = "Vistorias abertas e concluídas", body = NoticeHistory)),
    security(("api_jwt" = []))
)]
pub async fn notice_history(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<Json<NoticeHistory>, ApiError> {
    let history = app_state
        .inspection_service
        .history(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(history))
}

// POST /Notice/Solicitar
#[utoipa::path(
    post,
    path = "/Notice/Solicitar",
    tag = "Notice",
    request_body = SolicitarVistoriaPayload,
    responses(
        (status = 201, description = "Vistoria solicitada", body = Notice),
        (status = 404, description = "Imóvel não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn solicitar(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    payload: Option<ApiJson<SolicitarVistoriaPayload>>,
) -> Result<impl IntoResponse, ApiError> {
    let ApiJson(payload) = payload.unwrap_or_default();

    let notice = app_state
        .inspection_service
        .request(&user, payload.property_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(notice)))
}

// POST /Notice/Iniciar/{id}
#[utoipa::path(
    post,
    path = "/Notice/Iniciar/{id}",
    tag = "Notice",
    params(("id" = Uuid, Path, description = "ID da vistoria")),
    responses(
        (status = 200, description = "Vistoria em andamento com o checklist", body = ChecklistView),
        (status = 403, description = "Apenas gestores"),
        (status = 404, description = "Vistoria não encontrada"),
        (status = 409, description = "Vistoria já concluída")
    ),
    security(("api_jwt" = []))
)]
pub async fn iniciar(
    State(app_state): State<AppState>,
    locale: Locale,
    perm: RequirePermission<PermManageInspections>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ChecklistView>, ApiError> {
    let view = app_state
        .inspection_service
        .start_existing(&perm.user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(view))
}

// POST /Notice/IniciarVistoria
#[utoipa::path(
    post,
    path = "/Notice/IniciarVistoria",
    tag = "Notice",
    request_body = IniciarVistoriaPayload,
    responses(
        (status = 200, description = "Vistoria criada com os 15 itens", body = StartInspectionResponse),
        (status = 403, description = "Apenas gestores"),
        (status = 404, description = "Imóvel não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn iniciar_vistoria(
    State(app_state): State<AppState>,
    locale: Locale,
    perm: RequirePermission<PermManageInspections>,
    ApiJson(payload): ApiJson<IniciarVistoriaPayload>,
) -> Result<Json<StartInspectionResponse>, ApiError> {
    let started = app_state
        .inspection_service
        .start_for_property(&perm.user, payload.property_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(started))
}

// GET /Notice/Checklist/{id}
#[utoipa::path(
    get,
    path = "/Notice/Checklist/{id}",
    tag = "Notice",
    params(("id" = Uuid, Path, description = "ID da vistoria")),
    responses(
        (status = 200, description = "Checklist editável", body = ChecklistView),
        (status = 404, description = "Vistoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn checklist(
    State(app_state): State<AppState>,
    locale: Locale,
    perm: RequirePermission<PermManageInspections>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ChecklistView>, ApiError> {
    let view = app_state
        .inspection_service
        .checklist(&perm.user, id, false)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(view))
}

// GET /Notice/ViewChecklist/{id}
#[utoipa::path(
    get,
    path = "/Notice/ViewChecklist/{id}",
    tag = "Notice",
    params(("id" = Uuid, Path, description = "ID da vistoria")),
    responses(
        (status = 200, description = "Checklist somente leitura", body = ChecklistView),
        (status = 404, description = "Vistoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn view_checklist(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ChecklistView>, ApiError> {
    let view = app_state
        .inspection_service
        .checklist(&user, id, true)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(view))
}

// POST /Notice/SalvarChecklist/{id}
#[utoipa::path(
    post,
    path = "/Notice/SalvarChecklist/{id}",
    tag = "Notice",
    params(("id" = Uuid, Path, description = "ID da vistoria")),
    request_body = Vec<ChecklistItemUpdate>,
    responses(
        (status = 200, description = "Itens válidos aplicados; os demais ignorados", body = ChecklistSaved),
        (status = 404, description = "Vistoria não encontrada"),
        (status = 409, description = "Vistoria já concluída")
    ),
    security(("api_jwt" = []))
)]
pub async fn salvar_checklist(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermManageInspections>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(updates): ApiJson<Vec<ChecklistItemUpdate>>,
) -> Result<Json<ChecklistSaved>, ApiError> {
    let saved = app_state
        .inspection_service
        .save_checklist(id, &updates)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(saved))
}

// POST /Notice/UploadPhoto
// multipart: noticeId, checklistItemId (opcional), file
#[utoipa::path(
    post,
    path = "/Notice/UploadPhoto",
    tag = "Notice",
    request_body(content_type = "multipart/form-data", description = "Campos `noticeId`, `checklistItemId` e `file`"),
    responses(
        (status = 200, description = "Foto registrada", body = PhotoUploaded),
        (status = 400, description = "Arquivo ausente, grande demais ou de tipo não permitido"),
        (status = 404, description = "Vistoria não encontrada"),
        (status = 409, description = "Vistoria já concluída")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_photo(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    ApiMultipart(multipart): ApiMultipart,
) -> Result<Json<PhotoUploaded>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let mut form = UploadForm::read(multipart, "file").await.map_err(to_api)?;
    let notice_id = form.required_uuid("noticeId").map_err(to_api)?;
    let checklist_item_id = form.uuid("checklistItemId").map_err(to_api)?;
    let file = form.take_file();

    let upload = PhotoUpload {
        notice_id,
        checklist_item_id,
        file_name: file.file_name.as_deref(),
        bytes: &file.bytes,
    };

    let uploaded = app_state
        .inspection_service
        .upload_photo(&user, upload)
        .await
        .map_err(to_api)?;

    Ok(Json(uploaded))
}

// POST /Notice/ConcluirVistoria/{id}
#[utoipa::path(
    post,
    path = "/Notice/ConcluirVistoria/{id}",
    tag = "Notice",
    params(("id" = Uuid, Path, description = "ID da vistoria")),
    responses(
        (status = 200, description = "Vistoria concluída", body = ActionResult),
        (status = 404, description = "Vistoria não encontrada"),
        (status = 409, description = "Vistoria já concluída")
    ),
    security(("api_jwt" = []))
)]
pub async fn concluir_vistoria(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermManageInspections>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ActionResult>, ApiError> {
    app_state
        .inspection_service
        .conclude(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ActionResult::ok("Vistoria concluída com sucesso!")))
}

// GET /Notice/GetChecklistItems/{id}
#[utoipa::path(
    get,
    path = "/Notice/GetChecklistItems/{id}",
    tag = "Notice",
    params(("id" = Uuid, Path, description = "ID da vistoria")),
    responses(
        (status = 200, description = "IDs dos itens na ordem do modelo", body = ItemIdsResponse),
        (status = 404, description = "Vistoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_checklist_items(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ItemIdsResponse>, ApiError> {
    let item_ids = app_state
        .inspection_service
        .item_ids(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ItemIdsResponse { success: true, item_ids }))
}

// GET /Notice/GetNoticeDetails/{id}
#[utoipa::path(
    get,
    path = "/Notice/GetNoticeDetails/{id}",
    tag = "Notice",
    params(("id" = Uuid, Path, description = "ID da vistoria")),
    responses(
        (status = 200, description = "Vistoria com itens e fotos", body = NoticeDetailsResponse),
        (status = 404, description = "Vistoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_notice_details(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<NoticeDetailsResponse>, ApiError> {
    let notice = app_state
        .inspection_service
        .details(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(NoticeDetailsResponse { success: true, notice }))
}
