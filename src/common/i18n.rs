// src/common/i18n.rs

use std::{collections::HashMap, sync::Arc};

pub const DEFAULT_LANG: &str = "pt";

const PT: &[(&str, &str)] = &[
    ("validation.invalid_fields", "Um ou mais campos são inválidos."),
    ("request.invalid_body", "Corpo da requisição inválido ou incompleto."),
    ("request.invalid_path", "Identificador inválido na URL."),
    ("request.invalid_query", "Parâmetros de consulta inválidos."),
    ("request.invalid_multipart", "Formulário de envio inválido."),
    ("request.field_invalid", "Campo inválido"),
    ("request.field_required", "Campo obrigatório"),
    ("auth.email_taken", "Este e-mail já está em uso."),
    ("auth.invalid_credentials", "Login falhou. Verifique email e senha."),
    ("auth.invalid_token", "Token de autenticação inválido ou ausente."),
    ("auth.user_not_found", "Usuário não encontrado."),
    ("policy.requires_gestor", "Apenas gestores podem realizar esta ação."),
    ("policy.requires_staff", "Apenas gestores ou síndicos podem realizar esta ação."),
    ("policy.not_owner", "Você não tem acesso a este registro."),
    ("property.not_found", "Imóvel não encontrado."),
    ("property.invalid_id", "ID do imóvel inválido."),
    (
        "property.in_use",
        "Não é possível excluir o imóvel enquanto existirem contratos ou vistorias vinculadas.",
    ),
    ("property.invalid_status", "Status de imóvel inválido. Use Vago, Ocupado ou Alugado."),
    ("contract.not_found", "Contrato não encontrado."),
    ("payment.not_found", "Cobrança não encontrada."),
    ("inspection.not_found", "Vistoria não encontrada"),
    ("inspection.concluded", "Esta vistoria já foi concluída."),
    ("inspection.item_mismatch", "O item informado não pertence a esta vistoria."),
    ("upload.missing", "Nenhum arquivo foi selecionado"),
    ("upload.too_large", "Arquivo muito grande (máx 5MB)"),
    ("upload.type_not_allowed", "Tipo de arquivo não permitido. Use jpg, jpeg, png, gif ou webp"),
    ("internal", "Ocorreu um erro inesperado."),
];

const EN: &[(&str, &str)] = &[
    ("validation.invalid_fields", "One or more fields are invalid."),
    ("request.invalid_body", "Invalid or incomplete request body."),
    ("request.invalid_path", "Invalid identifier in the URL."),
    ("request.invalid_query", "Invalid query parameters."),
    ("request.invalid_multipart", "Invalid upload form."),
    ("request.field_invalid", "Invalid field"),
    ("request.field_required", "Required field"),
    ("auth.email_taken", "This e-mail is already in use."),
    ("auth.invalid_credentials", "Login failed. Check your e-mail and password."),
    ("auth.invalid_token", "Missing or invalid authentication token."),
    ("auth.user_not_found", "User not found."),
    ("policy.requires_gestor", "Only managers can perform this action."),
    ("policy.requires_staff", "Only managers or trustees can perform this action."),
    ("policy.not_owner", "You do not have access to this record."),
    ("property.not_found", "Property not found."),
    ("property.invalid_id", "Invalid property id."),
    (
        "property.in_use",
        "The property cannot be deleted while contracts or inspections reference it.",
    ),
    ("property.invalid_status", "Invalid property status. Use Vago, Ocupado or Alugado."),
    ("contract.not_found", "Contract not found."),
    ("payment.not_found", "Charge not found."),
    ("inspection.not_found", "Inspection not found"),
    ("inspection.concluded", "This inspection has already been concluded."),
    ("inspection.item_mismatch", "The checklist item does not belong to this inspection."),
    ("upload.missing", "No file was selected"),
    ("upload.too_large", "File too large (max 5MB)"),
    ("upload.type_not_allowed", "File type not allowed. Use jpg, jpeg, png, gif or webp"),
    ("internal", "An unexpected error occurred."),
];

/// Catálogo de mensagens por idioma. Idiomas desconhecidos caem no português.
#[derive(Clone)]
pub struct I18nStore {
    catalogs: Arc<HashMap<&'static str, HashMap<&'static str, &'static str>>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut catalogs = HashMap::new();
        catalogs.insert("pt", PT.iter().copied().collect());
        catalogs.insert("en", EN.iter().copied().collect());
        Self {
            catalogs: Arc::new(catalogs),
        }
    }

    pub fn translate(&self, lang: &str, key: &str) -> String {
        let lookup = |lang: &str| self.catalogs.get(lang).and_then(|c| c.get(key)).copied();

        lookup(lang)
            .or_else(|| lookup(DEFAULT_LANG))
            .unwrap_or(key)
            .to_string()
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_has_both_languages() {
        let pt: Vec<&str> = PT.iter().map(|(k, _)| *k).collect();
        let en: Vec<&str> = EN.iter().map(|(k, _)| *k).collect();
        assert_eq!(pt, en);
    }

    #[test]
    fn unknown_language_falls_back_to_portuguese() {
        let store = I18nStore::new();
        assert_eq!(store.translate("de", "payment.not_found"), "Cobrança não encontrada.");
        assert_eq!(store.translate("en", "payment.not_found"), "Charge not found.");
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        let store = I18nStore::new();
        assert_eq!(store.translate("pt", "no.such.key"), "no.such.key");
    }
}
