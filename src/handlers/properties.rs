// src/handlers/properties.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        extract::{ApiJson, ApiPath, ApiQuery},
        i18n::Locale,
        rbac::{PermManageProperties, PermViewProperties, RequirePermission},
    },
    models::{
        property::{
            DeletePropertyPayload, Occupancy, PropertyDetail, PropertyListing, PropertyPayload, PropertyQuery,
            UpdateOccupancyPayload,
        },
        ActionResult,
    },
};

// GET /Properties
#[utoipa::path(
    get,
    path = "/Properties",
    tag = "Properties",
    params(PropertyQuery),
    responses(
        (status = 200, description = "Imóveis com o proprietário resolvido", body = Vec<PropertyListing>),
        (status = 400, description = "Status inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_properties(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermViewProperties>,
    ApiQuery(query): ApiQuery<PropertyQuery>,
) -> Result<Json<Vec<PropertyListing>>, ApiError> {
    let listings = app_state
        .property_service
        .list(query.search_string.as_deref(), query.status.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(listings))
}

// GET /Properties/{id}
#[utoipa::path(
    get,
    path = "/Properties/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "ID do imóvel")),
    responses(
        (status = 200, description = "Imóvel com contratos", body = PropertyDetail),
        (status = 404, description = "Imóvel não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_property(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermViewProperties>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<PropertyDetail>, ApiError> {
    let detail = app_state
        .property_service
        .detail(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(detail))
}

// POST /Properties/Create
#[utoipa::path(
    post,
    path = "/Properties/Create",
    tag = "Properties",
    request_body = PropertyPayload,
    responses((status = 201, description = "Imóvel cadastrado", body = PropertyDetail)),
    security(("api_jwt" = []))
)]
pub async fn create_property(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermManageProperties>,
    ApiJson(payload): ApiJson<PropertyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let created = app_state
        .property_service
        .create(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(created)))
}

// POST /Properties/Edit/{id}
#[utoipa::path(
    post,
    path = "/Properties/Edit/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "ID do imóvel")),
    request_body = PropertyPayload,
    responses(
        (status = 200, description = "Imóvel atualizado", body = PropertyDetail),
        (status = 404, description = "Imóvel não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn edit_property(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermManageProperties>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<PropertyPayload>,
) -> Result<Json<PropertyDetail>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let updated = app_state
        .property_service
        .update(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(updated))
}

// POST /Properties/AtualizarStatus/{id}
#[utoipa::path(
    post,
    path = "/Properties/AtualizarStatus/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "ID do imóvel")),
    request_body = UpdateOccupancyPayload,
    responses(
        (status = 200, description = "Status alterado", body = PropertyDetail),
        (status = 400, description = "Status inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermManageProperties>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateOccupancyPayload>,
) -> Result<Json<PropertyDetail>, ApiError> {
    let occupancy = payload
        .status
        .parse::<Occupancy>()
        .map_err(|raw| AppError::InvalidOccupancy(raw).to_api_error(&locale, &app_state.i18n_store))?;

    let updated = app_state
        .property_service
        .update_occupancy(id, occupancy)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(updated))
}

// POST /Properties/Delete
#[utoipa::path(
    post,
    path = "/Properties/Delete",
    tag = "Properties",
    request_body = DeletePropertyPayload,
    responses(
        (status = 200, description = "Imóvel excluído", body = ActionResult),
        (status = 400, description = "ID inválido"),
        (status = 404, description = "Imóvel não encontrado"),
        (status = 409, description = "Imóvel com contratos ou vistorias vinculadas")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_property(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermManageProperties>,
    ApiJson(payload): ApiJson<DeletePropertyPayload>,
) -> Result<Json<ActionResult>, ApiError> {
    app_state
        .property_service
        .delete(payload.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ActionResult::ok("Imóvel excluído com sucesso!")))
}
