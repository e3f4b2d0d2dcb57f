// src/handlers/upload_form.rs

use std::collections::HashMap;

use axum::{
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
};
use uuid::Uuid;

use crate::common::error::AppError;

// Corpo acima do limite da rota chega aqui como erro de leitura do stream
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge
    } else {
        AppError::InvalidMultipart(e.body_text())
    }
}

#[derive(Debug, Default)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Formulário multipart lido por inteiro: campos de texto e um único arquivo.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    file: Option<UploadedFile>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart, file_field: &str) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(multipart_error)?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == file_field {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(multipart_error)?;
                form.file = Some(UploadedFile {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    // Campo opcional; vazio conta como ausente
    pub fn uuid(&self, name: &str) -> Result<Option<Uuid>, AppError> {
        self.text(name)
            .map(|raw| {
                Uuid::parse_str(raw).map_err(|_| AppError::InvalidField(name.to_string()))
            })
            .transpose()
    }

    pub fn required_uuid(&self, name: &str) -> Result<Uuid, AppError> {
        self.uuid(name)?
            .ok_or_else(|| AppError::MissingField(name.to_string()))
    }

    /// Arquivo enviado; ausente vira um arquivo vazio para a validação decidir.
    pub fn take_file(&mut self) -> UploadedFile {
        self.file.take().unwrap_or_default()
    }
}
