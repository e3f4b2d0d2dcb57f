// src/db/notice_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::notice::{
        ChecklistItem, ItemStatus, Notice, NoticeFoto, NoticeStatus, NoticeSummaryRow, CHECKLIST_TEMPLATE,
    },
};

const NOTICE_COLUMNS: &str = r#"
    n.id, n.solicitante_id, n.gestor_id, n.property_id, n.status, n.data_criacao, n.data_conclusao
"#;

const ITEM_COLUMNS: &str = "id, notice_id, position, categoria, descricao, status";
const FOTO_COLUMNS: &str = "id, notice_id, checklist_item_id, foto_file, data_upload";

#[derive(Clone)]
pub struct NoticeRepository {
    pool: PgPool,
}

impl NoticeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // =========================================================================
    //  NOTICES
    // =========================================================================

    pub async fn create<'e, E>(
        &self,
        executor: E,
        solicitante_id: Uuid,
        gestor_id: Option<Uuid>,
        property_id: Option<Uuid>,
        status: NoticeStatus,
    ) -> Result<Notice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            WITH n AS (
                INSERT INTO notices (solicitante_id, gestor_id, property_id, status)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            SELECT {NOTICE_COLUMNS} FROM n
            "#
        );
        let notice = sqlx::query_as::<_, Notice>(&sql)
            .bind(solicitante_id)
            .bind(gestor_id)
            .bind(property_id)
            .bind(status)
            .fetch_one(executor)
            .await?;
        Ok(notice)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Notice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {NOTICE_COLUMNS} FROM notices n WHERE n.id = $1");
        let notice = sqlx::query_as::<_, Notice>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(notice)
    }

    // Trava a linha até o fim da transação (início/conclusão concorrentes esperam aqui)
    pub async fn lock_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Notice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {NOTICE_COLUMNS} FROM notices n WHERE n.id = $1 FOR UPDATE");
        let notice = sqlx::query_as::<_, Notice>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(notice)
    }

    pub async fn mark_in_progress<'e, E>(&self, executor: E, id: Uuid, gestor_id: Uuid) -> Result<Notice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            WITH n AS (
                UPDATE notices SET gestor_id = $2, status = 'EM_PROGRESSO'
                WHERE id = $1
                RETURNING *
            )
            SELECT {NOTICE_COLUMNS} FROM n
            "#
        );
        let notice = sqlx::query_as::<_, Notice>(&sql)
            .bind(id)
            .bind(gestor_id)
            .fetch_one(executor)
            .await?;
        Ok(notice)
    }

    pub async fn mark_resolved<'e, E>(&self, executor: E, id: Uuid) -> Result<Notice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            WITH n AS (
                UPDATE notices SET status = 'RESOLVIDO', data_conclusao = now()
                WHERE id = $1
                RETURNING *
            )
            SELECT {NOTICE_COLUMNS} FROM n
            "#
        );
        let notice = sqlx::query_as::<_, Notice>(&sql)
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(notice)
    }

    // Listagem com nomes e contagens. `solicitante` restringe às vistorias de um usuário.
    pub async fn list_summaries<'e, E>(
        &self,
        executor: E,
        solicitante: Option<Uuid>,
        notice_id: Option<Uuid>,
    ) -> Result<Vec<NoticeSummaryRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {NOTICE_COLUMNS},
                p.bloco AS property_bloco,
                p.numero AS property_numero,
                COALESCE(NULLIF(trim(s.nome), ''), s.email) AS solicitante_nome,
                CASE WHEN g.id IS NULL THEN NULL
                     ELSE COALESCE(NULLIF(trim(g.nome), ''), g.email) END AS gestor_nome,
                (SELECT COUNT(*) FROM checklist_items i WHERE i.notice_id = n.id) AS item_count,
                (SELECT COUNT(*) FROM notice_fotos f WHERE f.notice_id = n.id) AS foto_count
            FROM notices n
            JOIN users s ON s.id = n.solicitante_id
            LEFT JOIN users g ON g.id = n.gestor_id
            LEFT JOIN properties p ON p.id = n.property_id
            WHERE ($1::uuid IS NULL OR n.solicitante_id = $1)
              AND ($2::uuid IS NULL OR n.id = $2)
            ORDER BY n.data_criacao DESC
            "#
        );
        let rows = sqlx::query_as::<_, NoticeSummaryRow>(&sql)
            .bind(solicitante)
            .bind(notice_id)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    // =========================================================================
    //  CHECKLIST
    // =========================================================================

    /// Insere os 15 itens padrão. A chave (notice_id, position) impede duplicação
    /// se duas requisições semearem a mesma vistoria.
    pub async fn seed_checklist<'e, E>(&self, executor: E, notice_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let positions: Vec<i32> = (0..CHECKLIST_TEMPLATE.len() as i32).collect();
        let categorias: Vec<&str> = CHECKLIST_TEMPLATE.iter().map(|(c, _)| *c).collect();
        let descricoes: Vec<&str> = CHECKLIST_TEMPLATE.iter().map(|(_, d)| *d).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO checklist_items (notice_id, position, categoria, descricao)
            SELECT $1, t.position, t.categoria, t.descricao
            FROM UNNEST($2::int4[], $3::text[], $4::text[]) AS t(position, categoria, descricao)
            ON CONFLICT (notice_id, position) DO NOTHING
            "#,
        )
        .bind(notice_id)
        .bind(&positions)
        .bind(&categorias)
        .bind(&descricoes)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_items<'e, E>(&self, executor: E, notice_id: Uuid) -> Result<Vec<ChecklistItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM checklist_items WHERE notice_id = $1 ORDER BY position");
        let items = sqlx::query_as::<_, ChecklistItem>(&sql)
            .bind(notice_id)
            .fetch_all(executor)
            .await?;
        Ok(items)
    }

    pub async fn item_ids<'e, E>(&self, executor: E, notice_id: Uuid) -> Result<Vec<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM checklist_items WHERE notice_id = $1 ORDER BY position",
        )
        .bind(notice_id)
        .fetch_all(executor)
        .await?;
        Ok(ids)
    }

    pub async fn item_belongs_to<'e, E>(&self, executor: E, notice_id: Uuid, item_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let belongs = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM checklist_items WHERE id = $1 AND notice_id = $2)",
        )
        .bind(item_id)
        .bind(notice_id)
        .fetch_one(executor)
        .await?;
        Ok(belongs)
    }

    pub async fn set_item_status<'e, E>(
        &self,
        executor: E,
        notice_id: Uuid,
        item_id: Uuid,
        status: ItemStatus,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE checklist_items SET status = $3 WHERE id = $1 AND notice_id = $2")
            .bind(item_id)
            .bind(notice_id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  FOTOS
    // =========================================================================

    pub async fn insert_foto<'e, E>(
        &self,
        executor: E,
        notice_id: Uuid,
        checklist_item_id: Option<Uuid>,
        foto_file: &str,
    ) -> Result<NoticeFoto, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO notice_fotos (notice_id, checklist_item_id, foto_file)
            VALUES ($1, $2, $3)
            RETURNING {FOTO_COLUMNS}
            "#
        );
        let foto = sqlx::query_as::<_, NoticeFoto>(&sql)
            .bind(notice_id)
            .bind(checklist_item_id)
            .bind(foto_file)
            .fetch_one(executor)
            .await?;
        Ok(foto)
    }

    pub async fn list_fotos<'e, E>(&self, executor: E, notice_id: Uuid) -> Result<Vec<NoticeFoto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {FOTO_COLUMNS} FROM notice_fotos WHERE notice_id = $1 ORDER BY data_upload");
        let fotos = sqlx::query_as::<_, NoticeFoto>(&sql)
            .bind(notice_id)
            .fetch_all(executor)
            .await?;
        Ok(fotos)
    }
}
