// src/db/contract_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::contract::{Contract, ContractPayload, ContractType, ContractWithProperty},
};

const CONTRACT_COLUMNS: &str = r#"
    c.id, c.kind, c.nome, c.locatario_nome, c.proprietario_nome, c.property_id,
    c.data_inicio, c.data_fim, c.valor_mensal, c.cpf, c.telefone, c.email, c.unidade,
    c.tipo_condomino, c.cargo, c.turno, c.data_admissao, c.created_at, c.updated_at
"#;

#[derive(Clone)]
pub struct ContractRepository {
    pool: PgPool,
}

impl ContractRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // Busca por nome do contrato ou bloco/número do imóvel vinculado
    pub async fn list<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
        kind: Option<ContractType>,
    ) -> Result<Vec<ContractWithProperty>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let sql = format!(
            r#"
            SELECT {CONTRACT_COLUMNS},
                p.bloco AS property_bloco,
                p.numero AS property_numero
            FROM contracts c
            LEFT JOIN properties p ON p.id = c.property_id
            WHERE ($1::contract_type IS NULL OR c.kind = $1)
              AND (
                $2::text IS NULL
                OR c.nome ILIKE $2
                OR p.bloco ILIKE $2
                OR p.numero ILIKE $2
              )
            ORDER BY c.created_at DESC
            "#
        );

        let rows = sqlx::query_as::<_, ContractWithProperty>(&sql)
            .bind(kind)
            .bind(pattern)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Contract>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {CONTRACT_COLUMNS} FROM contracts c WHERE c.id = $1");
        let contract = sqlx::query_as::<_, Contract>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(contract)
    }

    // Contratos de vários imóveis de uma vez, na ordem de criação
    pub async fn list_for_properties<'e, E>(
        &self,
        executor: E,
        property_ids: &[Uuid],
    ) -> Result<Vec<Contract>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {CONTRACT_COLUMNS} FROM contracts c
            WHERE c.property_id = ANY($1)
            ORDER BY c.created_at
            "#
        );
        let contracts = sqlx::query_as::<_, Contract>(&sql)
            .bind(property_ids)
            .fetch_all(executor)
            .await?;
        Ok(contracts)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        kind: ContractType,
        payload: &ContractPayload,
    ) -> Result<Contract, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            WITH c AS (
                INSERT INTO contracts (
                    kind, nome, locatario_nome, proprietario_nome, property_id,
                    data_inicio, data_fim, valor_mensal, cpf, telefone, email, unidade,
                    tipo_condomino, cargo, turno, data_admissao
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                RETURNING *
            )
            SELECT {CONTRACT_COLUMNS} FROM c
            "#
        );
        let contract = bind_fields(sqlx::query_as::<_, Contract>(&sql).bind(kind), payload)
            .fetch_one(executor)
            .await?;
        Ok(contract)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        kind: ContractType,
        payload: &ContractPayload,
    ) -> Result<Option<Contract>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            WITH c AS (
                UPDATE contracts SET
                    kind = $1, nome = $2, locatario_nome = $3, proprietario_nome = $4,
                    property_id = $5, data_inicio = $6, data_fim = $7, valor_mensal = $8,
                    cpf = $9, telefone = $10, email = $11, unidade = $12,
                    tipo_condomino = $13, cargo = $14, turno = $15, data_admissao = $16,
                    updated_at = now()
                WHERE id = $17
                RETURNING *
            )
            SELECT {CONTRACT_COLUMNS} FROM c
            "#
        );
        let contract = bind_fields(sqlx::query_as::<_, Contract>(&sql).bind(kind), payload)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(contract)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

type ContractQuery<'q> = sqlx::query::QueryAs<'q, Postgres, Contract, sqlx::postgres::PgArguments>;

// Parâmetros $2..$16, comuns ao INSERT e ao UPDATE
fn bind_fields<'q>(query: ContractQuery<'q>, p: &'q ContractPayload) -> ContractQuery<'q> {
    query
        .bind(p.nome.trim())
        .bind(&p.locatario_nome)
        .bind(&p.proprietario_nome)
        .bind(p.property_id)
        .bind(p.data_inicio)
        .bind(p.data_fim)
        .bind(p.valor_mensal)
        .bind(&p.cpf)
        .bind(&p.telefone)
        .bind(&p.email)
        .bind(&p.unidade)
        .bind(&p.tipo_condomino)
        .bind(&p.cargo)
        .bind(&p.turno)
        .bind(p.data_admissao)
}
