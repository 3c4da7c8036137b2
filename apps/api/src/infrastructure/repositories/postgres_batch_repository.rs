use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::lists::{ContactRecord, Distribution, UploadBatch};
use crate::domain::repositories::BatchRepository;

#[derive(sqlx::FromRow)]
struct BatchRow {
    id: Uuid,
    source_file_name: String,
    uploaded_by: Uuid,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct DistributionRow {
    batch_id: Uuid,
    agent_id: Uuid,
    records: Json<Vec<ContactRecord>>,
}

/// PostgreSQL implementation of BatchRepository
///
/// A batch is one `upload_batches` row plus one `distributions` row per
/// agent, with the contact records kept as JSONB in agent order.
pub struct PostgresBatchRepository {
    pool: PgPool,
}

impl PostgresBatchRepository {
    /// Creates a new PostgresBatchRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads distributions for `batches` and assembles the aggregates
    async fn assemble(&self, batches: Vec<BatchRow>) -> Result<Vec<UploadBatch>, String> {
        if batches.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = batches.iter().map(|b| b.id).collect();
        let rows = sqlx::query_as::<_, DistributionRow>(
            r#"
            SELECT batch_id, agent_id, records
            FROM distributions
            WHERE batch_id = ANY($1)
            ORDER BY batch_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to load distributions: {}", e))?;

        let mut by_batch: HashMap<Uuid, Vec<Distribution>> = HashMap::new();
        for row in rows {
            by_batch
                .entry(row.batch_id)
                .or_default()
                .push(Distribution::new(row.agent_id, row.records.0));
        }

        Ok(batches
            .into_iter()
            .map(|b| {
                let distributions = by_batch.remove(&b.id).unwrap_or_default();
                UploadBatch::from_persistence(
                    b.id,
                    b.source_file_name,
                    b.uploaded_by,
                    b.created_at,
                    distributions,
                )
            })
            .collect())
    }
}

fn to_db_count(count: usize) -> Result<i32, String> {
    i32::try_from(count).map_err(|_| format!("Record count {} is too large to store", count))
}

#[async_trait]
impl BatchRepository for PostgresBatchRepository {
    async fn save(&self, batch: &UploadBatch) -> Result<Uuid, String> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| format!("Failed to start transaction: {}", e))?;

        sqlx::query(
            r#"
            INSERT INTO upload_batches (
                id, source_file_name, total_record_count, uploaded_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(batch.id())
        .bind(batch.source_file_name())
        .bind(to_db_count(batch.total_record_count())?)
        .bind(batch.uploaded_by())
        .bind(batch.created_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| format!("Failed to save batch: {}", e))?;

        for (position, distribution) in batch.distributions().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO distributions (batch_id, position, agent_id, record_count, records)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(batch.id())
            .bind(to_db_count(position)?)
            .bind(distribution.agent_id())
            .bind(to_db_count(distribution.count())?)
            .bind(Json(distribution.records()))
            .execute(&mut *tx)
            .await
            .map_err(|e| format!("Failed to save distribution: {}", e))?;
        }

        // Dropping the transaction on any early return rolls it back
        tx.commit()
            .await
            .map_err(|e| format!("Failed to commit batch: {}", e))?;

        Ok(batch.id())
    }

    async fn list(&self) -> Result<Vec<UploadBatch>, String> {
        let batches = sqlx::query_as::<_, BatchRow>(
            r#"
            SELECT id, source_file_name, uploaded_by, created_at
            FROM upload_batches
            ORDER BY created_at DESC, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to list batches: {}", e))?;

        self.assemble(batches).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UploadBatch>, String> {
        let batch = sqlx::query_as::<_, BatchRow>(
            r#"
            SELECT id, source_file_name, uploaded_by, created_at
            FROM upload_batches
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find batch by id: {}", e))?;

        match batch {
            Some(row) => Ok(self.assemble(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}
