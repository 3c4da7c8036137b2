use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::agent::{Agent, AgentName, MobileNumber};
use crate::domain::repositories::AgentRepository;
use crate::domain::user::value_objects::Email;

#[derive(sqlx::FromRow)]
struct AgentRow {
    id: Uuid,
    name: String,
    email: String,
    mobile: String,
    password_hash: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl AgentRow {
    fn into_agent(self) -> Result<Agent, String> {
        let invalid = |field: &str, e: String| format!("Invalid agent {} from database: {}", field, e);

        Ok(Agent::from_persistence(
            self.id,
            AgentName::new(&self.name).map_err(|e| invalid("name", e))?,
            Email::new(&self.email).map_err(|e| invalid("email", e))?,
            MobileNumber::new(&self.mobile).map_err(|e| invalid("mobile", e))?,
            self.password_hash,
            self.is_active,
            self.created_at,
        ))
    }
}

const AGENT_COLUMNS: &str = "id, name, email, mobile, password_hash, is_active, created_at";

/// PostgreSQL implementation of AgentRepository
pub struct PostgresAgentRepository {
    pool: PgPool,
}

impl PostgresAgentRepository {
    /// Creates a new PostgresAgentRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_all(&self, sql: &str, ids: Option<&[Uuid]>) -> Result<Vec<Agent>, String> {
        let mut query = sqlx::query_as::<_, AgentRow>(sql);
        if let Some(ids) = ids {
            query = query.bind(ids);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| format!("Failed to list agents: {}", e))?;

        rows.into_iter().map(AgentRow::into_agent).collect()
    }
}

#[async_trait]
impl AgentRepository for PostgresAgentRepository {
    async fn create(&self, agent: &Agent) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO agents (
                id, name, email, mobile, password_hash, is_active, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(agent.id())
        .bind(agent.name().as_str())
        .bind(agent.email().as_str())
        .bind(agent.mobile().as_str())
        .bind(agent.password_hash())
        .bind(agent.is_active())
        .bind(agent.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to create agent: {}", e))?;

        Ok(())
    }

    async fn update(&self, agent: &Agent) -> Result<(), String> {
        let result = sqlx::query(
            r#"
            UPDATE agents
            SET name = $2, email = $3, mobile = $4, is_active = $5, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(agent.id())
        .bind(agent.name().as_str())
        .bind(agent.email().as_str())
        .bind(agent.mobile().as_str())
        .bind(agent.is_active())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to update agent: {}", e))?;

        if result.rows_affected() == 0 {
            return Err(format!("Agent not found: {}", agent.id()));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, String> {
        let sql = format!("SELECT {} FROM agents WHERE id = $1", AGENT_COLUMNS);
        let row = sqlx::query_as::<_, AgentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| format!("Failed to find agent by id: {}", e))?;

        row.map(AgentRow::into_agent).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Agent>, String> {
        let sql = format!("SELECT {} FROM agents WHERE email = $1", AGENT_COLUMNS);
        let row = sqlx::query_as::<_, AgentRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| format!("Failed to find agent by email: {}", e))?;

        row.map(AgentRow::into_agent).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Agent>, String> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {} FROM agents WHERE id = ANY($1)", AGENT_COLUMNS);
        self.fetch_all(&sql, Some(ids)).await
    }

    async fn list_active(&self) -> Result<Vec<Agent>, String> {
        let sql = format!(
            "SELECT {} FROM agents WHERE is_active = TRUE ORDER BY created_at ASC, id ASC",
            AGENT_COLUMNS
        );
        self.fetch_all(&sql, None).await
    }
}
