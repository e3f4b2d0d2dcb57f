// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{
        AuthResponse, Claims, GestorApiRegistration, NewUser, RegisterGestorPayload, RegisterMoradorPayload,
        RegisterSindicoPayload, Registration, Role, User,
    },
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    token_ttl_days: i64,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, token_ttl_days: i64, pool: PgPool) -> Self {
        Self {
            user_repo,
            jwt_secret,
            token_ttl_days,
            pool,
        }
    }

    pub async fn register(&self, registration: Registration) -> Result<User, AppError> {
        let Registration { password, mut user } = registration;

        // Hashing fora do runtime assíncrono: bcrypt é caro
        user.password_hash = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let mut tx = self.pool.begin().await?;
        let created = self.user_repo.create_user(&mut *tx, &user).await?;
        tx.commit().await?;

        tracing::info!(user_id = %created.id, role = ?created.role, "Usuário cadastrado");
        Ok(created)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            tracing::warn!(email = %email, "Tentativa de login com senha inválida");
            return Err(AppError::InvalidCredentials);
        }

        let name = user.display_name();
        Ok(AuthResponse {
            token: self.create_token(user.id, user.role, &name)?,
            role: user.role,
            name,
        })
    }

    // Decodifica o token sem ir ao banco; o papel vem das claims
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims)
    }

    pub async fn me(&self, user_id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(&self.pool, user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub fn create_token(&self, user_id: Uuid, role: Role, name: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(self.token_ttl_days);

        let claims = Claims {
            sub: user_id,
            role,
            name: name.to_string(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

// ---
// Formulários de cadastro -> Registration
// ---

fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn base_user(email: String, nome: String, cpf: String, role: Role) -> NewUser {
    NewUser {
        email: email.trim().to_string(),
        password_hash: String::new(),
        nome: nome.trim().to_string(),
        cpf: cpf.trim().to_string(),
        role,
        bloco: None,
        apartamento: None,
        telefone: None,
        telefone_comercial: None,
        empresa: None,
        cargo: None,
        inicio_mandato: None,
        bloco_residencia: None,
    }
}

impl From<RegisterMoradorPayload> for Registration {
    fn from(p: RegisterMoradorPayload) -> Self {
        let mut user = base_user(p.email, p.nome, p.cpf, Role::Morador);
        user.bloco = optional(Some(p.bloco));
        user.apartamento = optional(p.apartamento);
        user.telefone = optional(Some(p.telefone));
        Registration { password: p.senha, user }
    }
}

impl From<RegisterSindicoPayload> for Registration {
    fn from(p: RegisterSindicoPayload) -> Self {
        let mut user = base_user(p.email, p.nome, p.cpf, Role::Sindico);
        user.telefone = optional(Some(p.telefone));
        user.inicio_mandato = Some(p.inicio_mandato);
        user.bloco_residencia = optional(Some(p.bloco_residencia));
        user.apartamento = optional(p.apartamento);
        Registration { password: p.senha, user }
    }
}

impl From<RegisterGestorPayload> for Registration {
    fn from(p: RegisterGestorPayload) -> Self {
        let mut user = base_user(p.email, p.nome, p.cpf, Role::Gestor);
        user.telefone_comercial = optional(Some(p.telefone_comercial));
        user.empresa = optional(p.empresa);
        user.cargo = optional(p.cargo);
        Registration { password: p.senha, user }
    }
}

// Só chamado depois de `check()`; campos ausentes viram texto vazio
impl From<GestorApiRegistration> for Registration {
    fn from(p: GestorApiRegistration) -> Self {
        let mut user = base_user(
            p.email.unwrap_or_default(),
            p.nome.unwrap_or_default(),
            p.cpf.unwrap_or_default(),
            Role::Gestor,
        );
        user.telefone_comercial = optional(p.telefone_comercial);
        user.empresa = optional(p.empresa);
        user.cargo = optional(p.cargo);
        Registration {
            password: p.senha.unwrap_or_default(),
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn service() -> AuthService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/condohub_test")
            .unwrap();
        AuthService::new(UserRepository::new(pool.clone()), "segredo-de-teste".into(), 7, pool)
    }

    #[tokio::test]
    async fn token_round_trips_role_and_name() {
        let svc = service();
        let id = Uuid::new_v4();

        let token = svc.create_token(id, Role::Sindico, "Sr. Síndico").unwrap();
        let claims = svc.decode_token(&token).unwrap();

        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::Sindico);
        assert_eq!(claims.name, "Sr. Síndico");
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn tampered_token_is_rejected() {
        let svc = service();
        let token = svc.create_token(Uuid::new_v4(), Role::Morador, "Ana").unwrap();

        let result = svc.decode_token(&format!("{token}x"));
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn morador_form_maps_blank_apartment_to_none() {
        let registration = Registration::from(RegisterMoradorPayload {
            nome: " Ana ".into(),
            email: "ana@x.com".into(),
            cpf: "1".into(),
            bloco: "A".into(),
            apartamento: Some("  ".into()),
            senha: "123456".into(),
            telefone: "9".into(),
            confirmar_senha: None,
        });

        assert_eq!(registration.user.role, Role::Morador);
        assert_eq!(registration.user.nome, "Ana");
        assert_eq!(registration.user.apartamento, None);
        assert_eq!(registration.user.bloco.as_deref(), Some("A"));
    }
}
