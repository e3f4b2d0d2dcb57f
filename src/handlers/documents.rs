// src/handlers/documents.rs

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, extract::ApiPath, i18n::Locale},
};

// GET /Financial/Boleto/{id}
#[utoipa::path(
    get,
    path = "/Financial/Boleto/{id}",
    tag = "Financial",
    params(("id" = Uuid, Path, description = "ID da cobrança")),
    responses(
        (status = 200, description = "Boleto em PDF", content_type = "application/pdf"),
        (status = 403, description = "Cobrança de outro usuário"),
        (status = 404, description = "Cobrança não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn boleto_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    ApiPath(payment_id): ApiPath<Uuid>,
) -> Result<Response, ApiError> {
    let pdf_bytes = app_state
        .document_service
        .generate_boleto_pdf(&user, payment_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    // Configura os Headers para o navegador baixar ou mostrar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"boleto_{}.pdf\"", payment_id),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}
