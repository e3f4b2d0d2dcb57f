// src/db/property_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::property::{Occupancy, Property, PropertyOption, PropertyRecord},
};

const PROPERTY_COLUMNS: &str = r#"
    id, bloco, numero, tipo_imovel, occupancy, area,
    owner_user_id, owner_name, owner_ref, created_at, updated_at
"#;

#[derive(Clone)]
pub struct PropertyRepository {
    pool: PgPool,
}

impl PropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // Mais recentes primeiro; o filtro de texto é aplicado depois, sobre o nome resolvido
    pub async fn list<'e, E>(&self, executor: E, status: Option<Occupancy>) -> Result<Vec<Property>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {PROPERTY_COLUMNS} FROM properties
            WHERE ($1::occupancy_type IS NULL OR occupancy = $1)
            ORDER BY created_at DESC
            "#
        );
        let properties = sqlx::query_as::<_, Property>(&sql)
            .bind(status)
            .fetch_all(executor)
            .await?;
        Ok(properties)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Property>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1");
        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(property)
    }

    pub async fn exists<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let found = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM properties WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(found)
    }

    pub async fn create<'e, E>(&self, executor: E, record: &PropertyRecord) -> Result<Property, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO properties (
                bloco, numero, tipo_imovel, occupancy, area, owner_user_id, owner_name, owner_ref
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PROPERTY_COLUMNS}
            "#
        );
        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(&record.bloco)
            .bind(&record.numero)
            .bind(&record.tipo_imovel)
            .bind(record.occupancy)
            .bind(record.area)
            .bind(record.owner_user_id)
            .bind(&record.owner_name)
            .bind(&record.owner_ref)
            .fetch_one(executor)
            .await?;
        Ok(property)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        record: &PropertyRecord,
    ) -> Result<Option<Property>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE properties SET
                bloco = $2, numero = $3, tipo_imovel = $4, occupancy = $5, area = $6,
                owner_user_id = $7, owner_name = $8, owner_ref = $9, updated_at = now()
            WHERE id = $1
            RETURNING {PROPERTY_COLUMNS}
            "#
        );
        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(id)
            .bind(&record.bloco)
            .bind(&record.numero)
            .bind(&record.tipo_imovel)
            .bind(record.occupancy)
            .bind(record.area)
            .bind(record.owner_user_id)
            .bind(&record.owner_name)
            .bind(&record.owner_ref)
            .fetch_optional(executor)
            .await?;
        Ok(property)
    }

    pub async fn update_occupancy<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        occupancy: Occupancy,
    ) -> Result<Option<Property>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE properties SET occupancy = $2, updated_at = now()
            WHERE id = $1
            RETURNING {PROPERTY_COLUMNS}
            "#
        );
        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(id)
            .bind(occupancy)
            .fetch_optional(executor)
            .await?;
        Ok(property)
    }

    // Contratos ou vistorias que ainda apontam para o imóvel
    pub async fn is_referenced<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let referenced = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM contracts WHERE property_id = $1)
                OR EXISTS(SELECT 1 FROM notices WHERE property_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(executor)
        .await?;
        Ok(referenced)
    }

    // A FK é RESTRICT: uma referência criada em paralelo também vira PropertyInUse
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::PropertyInUse;
                    }
                }
                e.into()
            })?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_options<'e, E>(&self, executor: E) -> Result<Vec<PropertyOption>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let options = sqlx::query_as::<_, PropertyOption>(
            "SELECT id, bloco, numero FROM properties ORDER BY numero, bloco",
        )
        .fetch_all(executor)
        .await?;
        Ok(options)
    }
}
