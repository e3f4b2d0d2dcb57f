// src/handlers/auth.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, extract::ApiJson, i18n::Locale},
    models::{
        auth::{
            AuthResponse, GestorApiRegistration, LoginUserPayload, RegisterGestorPayload, RegisterMoradorPayload,
            RegisterSindicoPayload, Registration, User,
        },
        ActionResult,
    },
};

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredResponse {
    pub success: bool,
    pub id: Uuid,
}

async fn register(app_state: &AppState, locale: &Locale, registration: Registration) -> Result<Response, ApiError> {
    let user = app_state
        .auth_service
        .register(registration)
        .await
        .map_err(|e| e.to_api_error(locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(RegisteredResponse { success: true, id: user.id })).into_response())
}

// POST /Account/Login
#[utoipa::path(
    post,
    path = "/Account/Login",
    tag = "Account",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login realizado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    ApiJson(payload): ApiJson<LoginUserPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(response))
}

// POST /Account/RegisterMorador
#[utoipa::path(
    post,
    path = "/Account/RegisterMorador",
    tag = "Account",
    request_body = RegisterMoradorPayload,
    responses(
        (status = 201, description = "Morador cadastrado", body = RegisteredResponse),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn register_morador(
    State(app_state): State<AppState>,
    locale: Locale,
    ApiJson(payload): ApiJson<RegisterMoradorPayload>,
) -> Result<Response, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    if !payload.passwords_match() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "As senhas não coincidem."));
    }

    register(&app_state, &locale, payload.into()).await
}

// POST /Account/RegisterSindico
#[utoipa::path(
    post,
    path = "/Account/RegisterSindico",
    tag = "Account",
    request_body = RegisterSindicoPayload,
    responses(
        (status = 201, description = "Síndico cadastrado", body = RegisteredResponse),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn register_sindico(
    State(app_state): State<AppState>,
    locale: Locale,
    ApiJson(payload): ApiJson<RegisterSindicoPayload>,
) -> Result<Response, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    register(&app_state, &locale, payload.into()).await
}

// POST /Account/RegisterGestor
#[utoipa::path(
    post,
    path = "/Account/RegisterGestor",
    tag = "Account",
    request_body = RegisterGestorPayload,
    responses(
        (status = 201, description = "Gestor cadastrado", body = RegisteredResponse),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn register_gestor(
    State(app_state): State<AppState>,
    locale: Locale,
    ApiJson(payload): ApiJson<RegisterGestorPayload>,
) -> Result<Response, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    register(&app_state, &locale, payload.into()).await
}

// POST /api/account/register-gestor
// Contrato próprio: sucesso `{success:true}`, falha `400 {errors:[...]}`
#[utoipa::path(
    post,
    path = "/api/account/register-gestor",
    tag = "Account",
    request_body = GestorApiRegistration,
    responses(
        (status = 200, description = "Gestor cadastrado"),
        (status = 400, description = "Lista de erros de cadastro")
    )
)]
pub async fn register_gestor_api(
    State(app_state): State<AppState>,
    locale: Locale,
    ApiJson(payload): ApiJson<GestorApiRegistration>,
) -> Response {
    let errors_response =
        |errors: Vec<String>| (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response();

    if let Err(errors) = payload.check() {
        return errors_response(errors);
    }

    match app_state.auth_service.register(payload.into()).await {
        Ok(_) => Json(json!({ "success": true })).into_response(),
        Err(e @ AppError::EmailAlreadyExists) => {
            errors_response(vec![e.to_api_error(&locale, &app_state.i18n_store).message])
        }
        Err(e) => e.to_api_error(&locale, &app_state.i18n_store).into_response(),
    }
}

// POST /Account/Logout
// Tokens não têm estado no servidor; o cliente apenas descarta o seu
#[utoipa::path(
    post,
    path = "/Account/Logout",
    tag = "Account",
    responses((status = 200, description = "Sessão encerrada", body = ActionResult)),
    security(("api_jwt" = []))
)]
pub async fn logout(user: AuthenticatedUser) -> Json<ActionResult> {
    tracing::info!(user_id = %user.id, "Logout");
    Json(ActionResult::ok("Sessão encerrada."))
}

// GET /Account/Me
#[utoipa::path(
    get,
    path = "/Account/Me",
    tag = "Account",
    responses((status = 200, description = "Perfil do usuário logado", body = User)),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<Json<User>, ApiError> {
    let profile = app_state
        .auth_service
        .me(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(profile))
}
