// src/models.rs

pub mod auth;
pub mod contract;
pub mod notice;
pub mod payment;
pub mod property;

use serde::Serialize;
use utoipa::ToSchema;

// Resposta simples de ações que não devolvem um recurso
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
