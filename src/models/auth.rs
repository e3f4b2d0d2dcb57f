// src/models/auth.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Papéis do condomínio (mesmos nomes usados nos tokens e no banco)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Gestor,
    Sindico,
    Morador,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[schema(example = "maria@condominio.com")]
    pub email: String,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,

    #[schema(example = "Maria Souza")]
    pub nome: Option<String>,
    pub cpf: Option<String>,
    pub bloco: Option<String>,
    pub apartamento: Option<String>,
    pub telefone: Option<String>,
    pub telefone_comercial: Option<String>,
    pub empresa: Option<String>,
    pub cargo: Option<String>,
    pub role: Role,
    #[schema(value_type = Option<String>, format = Date)]
    pub inicio_mandato: Option<NaiveDate>,
    pub bloco_residencia: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Nome para exibição: o nome cadastrado, ou o e-mail quando não há nome.
    pub fn display_name(&self) -> String {
        match self.nome.as_deref().map(str::trim) {
            Some(nome) if !nome.is_empty() => nome.to_string(),
            _ => self.email.clone(),
        }
    }
}

// Dados de um novo usuário já com a senha processada
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub nome: String,
    pub cpf: String,
    pub role: Role,
    pub bloco: Option<String>,
    pub apartamento: Option<String>,
    pub telefone: Option<String>,
    pub telefone_comercial: Option<String>,
    pub empresa: Option<String>,
    pub cargo: Option<String>,
    pub inicio_mandato: Option<NaiveDate>,
    pub bloco_residencia: Option<String>,
}

// Cadastro que ainda não passou pelo hash de senha
#[derive(Debug, Clone)]
pub struct Registration {
    pub password: String,
    pub user: NewUser,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterMoradorPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "O CPF é obrigatório."))]
    pub cpf: String,
    #[validate(length(min = 1, message = "O bloco é obrigatório."))]
    pub bloco: String,
    pub apartamento: Option<String>,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
    #[validate(length(min = 1, message = "O telefone é obrigatório."))]
    pub telefone: String,
    pub confirmar_senha: Option<String>,
}

impl RegisterMoradorPayload {
    pub fn passwords_match(&self) -> bool {
        self.confirmar_senha.as_deref().is_none_or(|c| c == self.senha)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSindicoPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "O CPF é obrigatório."))]
    pub cpf: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
    #[validate(length(min = 1, message = "O telefone é obrigatório."))]
    pub telefone: String,
    #[schema(value_type = String, format = Date, example = "2025-01-01")]
    pub inicio_mandato: NaiveDate,
    #[validate(length(min = 1, message = "O bloco de residência é obrigatório."))]
    pub bloco_residencia: String,
    pub apartamento: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterGestorPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "O CPF é obrigatório."))]
    pub cpf: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
    #[validate(length(min = 1, message = "O telefone comercial é obrigatório."))]
    pub telefone_comercial: String,
    pub empresa: Option<String>,
    pub cargo: Option<String>,
}

/// Corpo do cadastro de gestor via API (`/api/account/register-gestor`).
/// Todos os campos são opcionais no JSON; as regras ficam em `check`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GestorApiRegistration {
    #[serde(rename = "Nome", alias = "nome")]
    pub nome: Option<String>,
    #[serde(rename = "Email", alias = "email")]
    pub email: Option<String>,
    #[serde(rename = "CPF", alias = "cpf")]
    pub cpf: Option<String>,
    #[serde(rename = "Senha", alias = "senha")]
    pub senha: Option<String>,
    #[serde(rename = "ConfirmarSenha", alias = "confirmarSenha")]
    pub confirmar_senha: Option<String>,
    #[serde(rename = "TelefoneComercial", alias = "telefoneComercial")]
    pub telefone_comercial: Option<String>,
    #[serde(rename = "Empresa", alias = "empresa")]
    pub empresa: Option<String>,
    #[serde(rename = "Cargo", alias = "cargo")]
    pub cargo: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

impl GestorApiRegistration {
    /// Verifica na ordem: obrigatórios, confirmação de senha, tamanho mínimo.
    pub fn check(&self) -> Result<(), Vec<String>> {
        let required = [
            &self.email,
            &self.senha,
            &self.confirmar_senha,
            &self.nome,
            &self.cpf,
            &self.telefone_comercial,
        ];
        if required.iter().any(|field| is_blank(field)) {
            return Err(vec!["Todos os campos obrigatórios devem ser preenchidos.".to_string()]);
        }

        if self.senha != self.confirmar_senha {
            return Err(vec!["As senhas não coincidem.".to_string()]);
        }

        if self.senha.as_deref().map(|s| s.chars().count()).unwrap_or(0) < 6 {
            return Err(vec!["A senha deve ter pelo menos 6 caracteres.".to_string()]);
        }

        Ok(())
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub role: Role,
    pub name: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub name: String,
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_gestor() -> GestorApiRegistration {
        GestorApiRegistration {
            nome: Some("Carlos Lima".into()),
            email: Some("carlos@adm.com".into()),
            cpf: Some("123.456.789-00".into()),
            senha: Some("segredo1".into()),
            confirmar_senha: Some("segredo1".into()),
            telefone_comercial: Some("(11) 4000-0000".into()),
            empresa: None,
            cargo: None,
        }
    }

    #[test]
    fn complete_gestor_registration_passes() {
        assert!(valid_gestor().check().is_ok());
    }

    #[test]
    fn blank_required_field_is_reported_first() {
        let mut dto = valid_gestor();
        dto.cpf = Some("   ".into());
        dto.confirmar_senha = Some("outra".into());

        let errors = dto.check().unwrap_err();
        assert_eq!(errors, vec!["Todos os campos obrigatórios devem ser preenchidos."]);
    }

    #[test]
    fn password_mismatch_is_reported() {
        let mut dto = valid_gestor();
        dto.confirmar_senha = Some("segredo2".into());
        assert_eq!(dto.check().unwrap_err(), vec!["As senhas não coincidem."]);
    }

    #[test]
    fn short_password_is_reported() {
        let mut dto = valid_gestor();
        dto.senha = Some("abc".into());
        dto.confirmar_senha = Some("abc".into());
        assert_eq!(dto.check().unwrap_err(), vec!["A senha deve ter pelo menos 6 caracteres."]);
    }

    #[test]
    fn api_registration_accepts_pascal_case_json() {
        let dto: GestorApiRegistration = serde_json::from_str(
            r#"{"Nome":"Ana","Email":"ana@x.com","CPF":"1","Senha":"123456","ConfirmarSenha":"123456","TelefoneComercial":"2"}"#,
        )
        .unwrap();
        assert_eq!(dto.cpf.as_deref(), Some("1"));
        assert!(dto.check().is_ok());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let user = User {
            id: Uuid::new_v4(),
            email: "joao@x.com".into(),
            password_hash: String::new(),
            nome: Some("  ".into()),
            cpf: None,
            bloco: None,
            apartamento: None,
            telefone: None,
            telefone_comercial: None,
            empresa: None,
            cargo: None,
            role: Role::Morador,
            inicio_mandato: None,
            bloco_residencia: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(user.display_name(), "joao@x.com");
    }

    #[test]
    fn morador_confirmation_is_optional() {
        let payload = RegisterMoradorPayload {
            nome: "Ana".into(),
            email: "ana@x.com".into(),
            cpf: "1".into(),
            bloco: "A".into(),
            apartamento: None,
            senha: "123456".into(),
            telefone: "9".into(),
            confirmar_senha: None,
        };
        assert!(payload.passwords_match());
    }
}
