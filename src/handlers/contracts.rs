// src/handlers/contracts.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        extract::{ApiJson, ApiPath, ApiQuery},
        i18n::Locale,
        rbac::{PermManageContracts, PermViewContracts, RequirePermission},
    },
    models::contract::{
        Contract, ContractListing, ContractPayload, ContractQuery, ContractSaved, ContractType,
        DeleteContractPayload, EditContractPayload,
    },
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ContractDeleted {
    pub success: bool,
    pub message: String,
    pub tab: String,
}

// Os três formulários de cadastro só diferem no tipo gravado
async fn create(
    app_state: &AppState,
    locale: &Locale,
    kind: ContractType,
    payload: ContractPayload,
) -> Result<(StatusCode, Json<ContractSaved>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(locale, &app_state.i18n_store))?;

    let saved = app_state
        .contract_service
        .create(kind, &payload)
        .await
        .map_err(|e| e.to_api_error(locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(saved)))
}

// GET /Contracts
#[utoipa::path(
    get,
    path = "/Contracts",
    tag = "Contracts",
    params(ContractQuery),
    responses((status = 200, description = "Contratos com o imóvel vinculado", body = Vec<ContractListing>)),
    security(("api_jwt" = []))
)]
pub async fn list_contracts(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermViewContracts>,
    ApiQuery(query): ApiQuery<ContractQuery>,
) -> Result<Json<Vec<ContractListing>>, ApiError> {
    let contracts = app_state
        .contract_service
        .list(query.search_string.as_deref(), query.kind)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(contracts))
}

// POST /Contracts/CreateLocatario
#[utoipa::path(
    post,
    path = "/Contracts/CreateLocatario",
    tag = "Contracts",
    request_body = ContractPayload,
    responses(
        (status = 201, description = "Contrato de locatário cadastrado", body = ContractSaved),
        (status = 404, description = "Imóvel não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_locatario(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermManageContracts>,
    ApiJson(payload): ApiJson<ContractPayload>,
) -> Result<impl IntoResponse, ApiError> {
    create(&app_state, &locale, ContractType::LocatarioProprietario, payload).await
}

// POST /Contracts/CreateCondomino
#[utoipa::path(
    post,
    path = "/Contracts/CreateCondomino",
    tag = "Contracts",
    request_body = ContractPayload,
    responses((status = 201, description = "Contrato de condômino cadastrado", body = ContractSaved)),
    security(("api_jwt" = []))
)]
pub async fn create_condomino(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermManageContracts>,
    ApiJson(payload): ApiJson<ContractPayload>,
) -> Result<impl IntoResponse, ApiError> {
    create(&app_state, &locale, ContractType::Condomino, payload).await
}

// POST /Contracts/CreateFuncionario
#[utoipa::path(
    post,
    path = "/Contracts/CreateFuncionario",
    tag = "Contracts",
    request_body = ContractPayload,
    responses((status = 201, description = "Contrato de funcionário cadastrado", body = ContractSaved)),
    security(("api_jwt" = []))
)]
pub async fn create_funcionario(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermManageContracts>,
    ApiJson(payload): ApiJson<ContractPayload>,
) -> Result<impl IntoResponse, ApiError> {
    create(&app_state, &locale, ContractType::Funcionario, payload).await
}

// GET /Contracts/Details/{id}
#[utoipa::path(
    get,
    path = "/Contracts/Details/{id}",
    tag = "Contracts",
    params(("id" = Uuid, Path, description = "ID do contrato")),
    responses(
        (status = 200, description = "Contrato", body = Contract),
        (status = 404, description = "Contrato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn contract_details(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermViewContracts>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Contract>, ApiError> {
    let contract = app_state
        .contract_service
        .details(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(contract))
}

// POST /Contracts/Edit/{id}
#[utoipa::path(
    post,
    path = "/Contracts/Edit/{id}",
    tag = "Contracts",
    params(("id" = Uuid, Path, description = "ID do contrato")),
    request_body = EditContractPayload,
    responses(
        (status = 200, description = "Contrato atualizado", body = ContractSaved),
        (status = 404, description = "Contrato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn edit_contract(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermManageContracts>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<EditContractPayload>,
) -> Result<Json<ContractSaved>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let saved = app_state
        .contract_service
        .update(id, payload.kind, &payload.fields)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(saved))
}

// POST /Contracts/Delete
#[utoipa::path(
    post,
    path = "/Contracts/Delete",
    tag = "Contracts",
    request_body = DeleteContractPayload,
    responses(
        (status = 200, description = "Contrato excluído; `tab` indica a aba de origem", body = ContractDeleted),
        (status = 404, description = "Contrato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_contract(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermManageContracts>,
    ApiJson(payload): ApiJson<DeleteContractPayload>,
) -> Result<Json<ContractDeleted>, ApiError> {
    let kind = app_state
        .contract_service
        .delete(payload.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ContractDeleted {
        success: true,
        message: "Contrato excluído com sucesso!".to_string(),
        tab: kind.tab().to_string(),
    }))
}
