// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Taxonomia interna de erros. Os handlers convertem para ApiError com o idioma do cliente.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Rejeições dos extratores: o texto do axum/serde vai só para o log
    #[error("Corpo da requisição inválido: {0}")]
    InvalidBody(String),

    #[error("Parâmetro de rota inválido: {0}")]
    InvalidPathParam(String),

    #[error("Parâmetro de consulta inválido: {0}")]
    InvalidQuery(String),

    #[error("Formulário multipart inválido: {0}")]
    InvalidMultipart(String),

    #[error("Campo inválido: {0}")]
    InvalidField(String),

    #[error("Campo obrigatório: {0}")]
    MissingField(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    // Carrega a chave i18n do motivo devolvido pela política de acesso
    #[error("Acesso negado: {0}")]
    Forbidden(&'static str),

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Imóvel não encontrado")]
    PropertyNotFound,

    #[error("ID do imóvel inválido")]
    InvalidPropertyId,

    #[error("Imóvel com contratos ou vistorias vinculadas")]
    PropertyInUse,

    #[error("Status de imóvel inválido: {0}")]
    InvalidOccupancy(String),

    #[error("Contrato não encontrado")]
    ContractNotFound,

    #[error("Cobrança não encontrada")]
    PaymentNotFound,

    #[error("Vistoria não encontrada")]
    InspectionNotFound,

    #[error("Vistoria já concluída")]
    InspectionAlreadyConcluded,

    #[error("Item de checklist não pertence à vistoria")]
    ChecklistItemNotInInspection,

    #[error("Nenhum arquivo enviado")]
    MissingFile,

    #[error("Arquivo acima do limite")]
    FileTooLarge,

    #[error("Tipo de arquivo não permitido")]
    FileTypeNotAllowed,

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Erro de E/S: {0}")]
    IoError(#[from] std::io::Error),
}

// O erro que sai pela API: status + mensagem já traduzida
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({
                "success": false,
                "message": self.message,
                "details": details,
            }),
            None => json!({
                "success": false,
                "message": self.message,
            }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    /// Código de status HTTP e chave de mensagem de cada variante.
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation.invalid_fields"),
            AppError::InvalidBody(_) => (StatusCode::BAD_REQUEST, "request.invalid_body"),
            AppError::InvalidPathParam(_) => (StatusCode::BAD_REQUEST, "request.invalid_path"),
            AppError::InvalidQuery(_) => (StatusCode::BAD_REQUEST, "request.invalid_query"),
            AppError::InvalidMultipart(_) => (StatusCode::BAD_REQUEST, "request.invalid_multipart"),
            AppError::InvalidField(_) => (StatusCode::BAD_REQUEST, "request.field_invalid"),
            AppError::MissingField(_) => (StatusCode::BAD_REQUEST, "request.field_required"),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "auth.email_taken"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "auth.invalid_credentials"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "auth.invalid_token"),
            AppError::Forbidden(reason) => (StatusCode::FORBIDDEN, *reason),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "auth.user_not_found"),
            AppError::PropertyNotFound => (StatusCode::NOT_FOUND, "property.not_found"),
            AppError::InvalidPropertyId => (StatusCode::BAD_REQUEST, "property.invalid_id"),
            AppError::PropertyInUse => (StatusCode::CONFLICT, "property.in_use"),
            AppError::InvalidOccupancy(_) => (StatusCode::BAD_REQUEST, "property.invalid_status"),
            AppError::ContractNotFound => (StatusCode::NOT_FOUND, "contract.not_found"),
            AppError::PaymentNotFound => (StatusCode::NOT_FOUND, "payment.not_found"),
            AppError::InspectionNotFound => (StatusCode::NOT_FOUND, "inspection.not_found"),
            AppError::InspectionAlreadyConcluded => (StatusCode::CONFLICT, "inspection.concluded"),
            AppError::ChecklistItemNotInInspection => (StatusCode::BAD_REQUEST, "inspection.item_mismatch"),
            AppError::MissingFile => (StatusCode::BAD_REQUEST, "upload.missing"),
            AppError::FileTooLarge => (StatusCode::BAD_REQUEST, "upload.too_large"),
            AppError::FileTypeNotAllowed => (StatusCode::BAD_REQUEST, "upload.type_not_allowed"),
            AppError::FontNotFound(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_)
            | AppError::IoError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }

    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let (status, key) = self.classify();

        match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(m) => Value::String(m.to_string()),
                            None => Value::String(e.code.to_string()),
                        })
                        .collect();
                    details.insert(field.to_string(), Value::Array(messages));
                }
                ApiError {
                    status,
                    message: store.translate(&locale.0, key),
                    details: Some(Value::Object(details)),
                }
            }
            AppError::InvalidBody(_)
            | AppError::InvalidPathParam(_)
            | AppError::InvalidQuery(_)
            | AppError::InvalidMultipart(_) => {
                tracing::debug!("Requisição rejeitada: {}", self);
                ApiError::new(status, store.translate(&locale.0, key))
            }
            AppError::InvalidField(field) | AppError::MissingField(field) => {
                ApiError::new(status, format!("{}: {}", store.translate(&locale.0, key), field))
            }
            _ if status == StatusCode::INTERNAL_SERVER_ERROR => {
                // O detalhe fica no log; o cliente recebe só a mensagem genérica
                tracing::error!("Erro Interno do Servidor: {:?}", self);
                ApiError::new(status, store.translate(&locale.0, key))
            }
            _ => ApiError::new(status, store.translate(&locale.0, key)),
        }
    }
}
