// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{NewUser, User},
};

const USER_COLUMNS: &str = r#"
    id, email, password_hash, nome, cpf, bloco, apartamento, telefone,
    telefone_comercial, empresa, cargo, role, inicio_mandato, bloco_residencia,
    created_at, updated_at
"#;

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo e-mail (comparação sem diferenciar maiúsculas)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)");
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(maybe_user)
    }

    // Cria um novo usuário, traduzindo e-mail duplicado para o erro de domínio
    pub async fn create_user<'e, E>(&self, executor: E, new_user: &NewUser) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO users (
                email, password_hash, nome, cpf, role, bloco, apartamento, telefone,
                telefone_comercial, empresa, cargo, inicio_mandato, bloco_residencia
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(new_user.email.trim())
            .bind(&new_user.password_hash)
            .bind(&new_user.nome)
            .bind(&new_user.cpf)
            .bind(new_user.role)
            .bind(&new_user.bloco)
            .bind(&new_user.apartamento)
            .bind(&new_user.telefone)
            .bind(&new_user.telefone_comercial)
            .bind(&new_user.empresa)
            .bind(&new_user.cargo)
            .bind(new_user.inicio_mandato)
            .bind(&new_user.bloco_residencia)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
                        return AppError::EmailAlreadyExists;
                    }
                }
                e.into()
            })?;

        Ok(user)
    }

    // (id, nome) de todos os usuários, para resolver nomes de proprietários
    pub async fn list_names<'e, E>(&self, executor: E) -> Result<Vec<(Uuid, Option<String>)>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, (Uuid, Option<String>)>("SELECT id, nome FROM users")
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn find_id_by_name<'e, E>(&self, executor: E, name: &str) -> Result<Option<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM users
            WHERE lower(trim(nome)) = lower(trim($1))
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(executor)
        .await?;
        Ok(id)
    }
}
