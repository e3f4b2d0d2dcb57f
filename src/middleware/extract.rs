// src/middleware/extract.rs

use axum::{
    extract::{FromRef, FromRequest, FromRequestParts, Multipart, OptionalFromRequest, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

// Versões dos extratores do axum cuja rejeição sai no formato de erro da API,
// traduzida pelo Accept-Language da requisição.

fn reject<S>(locale: &Locale, state: &S, err: AppError) -> ApiError
where
    AppState: FromRef<S>,
{
    let app_state = AppState::from_ref(state);
    err.to_api_error(locale, &app_state.i18n_store)
}

/// Corpo JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_headers(req.headers());
        match <Json<T> as FromRequest<S>>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(reject(&locale, state, AppError::InvalidBody(rejection.body_text()))),
        }
    }
}

// Sem Content-Type o corpo é None; com Content-Type errado ou JSON malformado é erro
impl<T, S> OptionalFromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        let locale = Locale::from_headers(req.headers());
        match <Json<T> as OptionalFromRequest<S>>::from_request(req, state).await {
            Ok(value) => Ok(value.map(|Json(value)| ApiJson(value))),
            Err(rejection) => Err(reject(&locale, state, AppError::InvalidBody(rejection.body_text()))),
        }
    }
}

/// Parâmetros de rota, como o `{id}` das URLs.
#[derive(Debug, Clone, Copy)]
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => {
                let locale = Locale::from_headers(&parts.headers);
                Err(reject(&locale, state, AppError::InvalidPathParam(rejection.body_text())))
            }
        }
    }
}

/// Query string.
#[derive(Debug, Clone, Default)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => {
                let locale = Locale::from_headers(&parts.headers);
                Err(reject(&locale, state, AppError::InvalidQuery(rejection.body_text())))
            }
        }
    }
}

/// Formulário multipart; o conteúdo é lido depois por `UploadForm`.
pub struct ApiMultipart(pub Multipart);

impl<S> FromRequest<S> for ApiMultipart
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_headers(req.headers());
        match <Multipart as FromRequest<S>>::from_request(req, state).await {
            Ok(multipart) => Ok(ApiMultipart(multipart)),
            Err(rejection) => Err(reject(&locale, state, AppError::InvalidMultipart(rejection.body_text()))),
        }
    }
}
