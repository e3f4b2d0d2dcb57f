// src/db/payment_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::payment::{NewCharge, Payment, PaymentWithPayer},
};

const PAYMENT_COLUMNS: &str = r#"
    p.id, p.user_id, p.mes_referencia, p.taxa_condominial, p.fundo_reserva,
    p.data_vencimento, p.data_pagamento, p.comprovante_path, p.qr_code_pix, p.created_at
"#;

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insere a cobrança do mês se ainda não existir. Devolve true quando inseriu.
    /// A chave única (user_id, mes_referencia) garante uma cobrança por mês
    /// mesmo com duas requisições simultâneas.
    pub async fn ensure_monthly_charge<'e, E>(&self, executor: E, charge: &NewCharge) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO payments (
                user_id, mes_referencia, taxa_condominial, fundo_reserva, data_vencimento, qr_code_pix
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, mes_referencia) DO NOTHING
            "#,
        )
        .bind(charge.user_id)
        .bind(&charge.mes_referencia)
        .bind(charge.taxa_condominial)
        .bind(charge.fundo_reserva)
        .bind(charge.data_vencimento)
        .bind(&charge.qr_code_pix)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn latest_for_user<'e, E>(&self, executor: E, user_id: Uuid) -> Result<Option<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {PAYMENT_COLUMNS} FROM payments p
            WHERE p.user_id = $1
            ORDER BY p.data_vencimento DESC
            LIMIT 1
            "#
        );
        let payment = sqlx::query_as::<_, Payment>(&sql)
            .bind(user_id)
            .fetch_optional(executor)
            .await?;
        Ok(payment)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments p WHERE p.id = $1");
        let payment = sqlx::query_as::<_, Payment>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(payment)
    }

    // Todas as cobranças com o pagador, para a visão do gestor
    pub async fn list_with_payers<'e, E>(&self, executor: E) -> Result<Vec<PaymentWithPayer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {PAYMENT_COLUMNS},
                u.email AS payer_email,
                u.nome AS payer_nome,
                u.apartamento AS payer_apartamento
            FROM payments p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.data_vencimento DESC, u.nome
            "#
        );
        let rows = sqlx::query_as::<_, PaymentWithPayer>(&sql)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    // Registra o comprovante; a cobrança passa a ser lida como paga
    pub async fn attach_proof<'e, E>(&self, executor: E, id: Uuid, path: &str) -> Result<Option<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            WITH p AS (
                UPDATE payments SET comprovante_path = $2, data_pagamento = now()
                WHERE id = $1
                RETURNING *
            )
            SELECT {PAYMENT_COLUMNS} FROM p
            "#
        );
        let payment = sqlx::query_as::<_, Payment>(&sql)
            .bind(id)
            .bind(path)
            .fetch_optional(executor)
            .await?;
        Ok(payment)
    }
}
