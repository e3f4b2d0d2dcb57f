// src/handlers/financial.rs

use axum::{
    extract::State,
    Json,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::upload_form::UploadForm,
    middleware::{auth::AuthenticatedUser, extract::ApiMultipart, i18n::Locale},
    models::payment::{FinancialPage, ProofUploaded},
};

// GET /Financial
#[utoipa::path(
    get,
    path = "/Financial",
    tag = "Financial",
    responses((status = 200, description = "Visão geral (gestor) ou cobrança do mês", body = FinancialPage)),
    security(("api_jwt" = []))
)]
pub async fn financial_index(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<Json<FinancialPage>, ApiError> {
    let page = app_state
        .billing_service
        .financial_page(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(page))
}

// POST /Financial/UploadComprovante
// multipart: id, comprovante
#[utoipa::path(
    post,
    path = "/Financial/UploadComprovante",
    tag = "Financial",
    request_body(content_type = "multipart/form-data", description = "Campos `id` e `comprovante`"),
    responses(
        (status = 200, description = "Comprovante registrado", body = ProofUploaded),
        (status = 403, description = "Cobrança de outro usuário"),
        (status = 404, description = "Cobrança não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_comprovante(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    ApiMultipart(multipart): ApiMultipart,
) -> Result<Json<ProofUploaded>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let mut form = UploadForm::read(multipart, "comprovante").await.map_err(to_api)?;
    let payment_id = form.required_uuid("id").map_err(to_api)?;
    let file = form.take_file();

    let uploaded = app_state
        .billing_service
        .upload_proof(&user, payment_id, file.file_name.as_deref(), &file.bytes)
        .await
        .map_err(to_api)?;

    Ok(Json(uploaded))
}
