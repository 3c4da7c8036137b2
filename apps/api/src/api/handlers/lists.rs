use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::staging::StagedUpload;
use crate::api::state::AppState;
use crate::domain::agent::Agent;
use crate::domain::lists::{process_upload, ContactRecord, UploadBatch, UploadRequest};
use crate::domain::repositories::{AgentRepository, BatchRepository};
use crate::infrastructure::repositories::{PostgresAgentRepository, PostgresBatchRepository};

/// Agent summary embedded in a distribution
#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// One agent's share of a batch
#[derive(Debug, Serialize)]
pub struct DistributionResponse {
    pub agent: AgentSummary,
    pub items: Vec<ContactRecord>,
    pub item_count: usize,
}

/// A stored batch as returned to clients
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub id: Uuid,
    pub file_name: String,
    pub total_items: usize,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub distributions: Vec<DistributionResponse>,
}

/// Response for a successful upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub list: BatchResponse,
}

impl BatchResponse {
    /// Builds the response, resolving agent ids against `agents`
    ///
    /// Agents missing from `agents` are reported with their id only.
    pub fn build(batch: &UploadBatch, agents: &HashMap<Uuid, Agent>) -> Self {
        let distributions = batch
            .distributions()
            .iter()
            .map(|d| {
                let agent = agents.get(&d.agent_id());
                DistributionResponse {
                    agent: AgentSummary {
                        id: d.agent_id(),
                        name: agent.map(|a| a.name().to_string()),
                        email: agent.map(|a| a.email().to_string()),
                    },
                    items: d.records().to_vec(),
                    item_count: d.count(),
                }
            })
            .collect();

        Self {
            id: batch.id(),
            file_name: batch.source_file_name().to_string(),
            total_items: batch.total_record_count(),
            uploaded_by: batch.uploaded_by(),
            created_at: batch.created_at(),
            distributions,
        }
    }
}

fn index_agents(agents: Vec<Agent>) -> HashMap<Uuid, Agent> {
    agents.into_iter().map(|a| (a.id(), a)).collect()
}

/// Loads every agent referenced by `batches`, including deactivated ones
async fn agents_for(
    agent_repo: &dyn AgentRepository,
    batches: &[UploadBatch],
) -> Result<HashMap<Uuid, Agent>, ApiError> {
    let mut ids: Vec<Uuid> = batches
        .iter()
        .flat_map(|b| b.distributions().iter().map(|d| d.agent_id()))
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let agents = agent_repo
        .find_by_ids(&ids)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Database error: {}", e)))?;

    Ok(index_agents(agents))
}

/// Upload a contact file and distribute it across active agents
///
/// POST /api/lists/upload
///
/// Expects a multipart body with the file in the `file` field.
pub async fn upload_list(
    JwtAuth(user_id): JwtAuth,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    // Deleted when dropped, on success and on every error path
    let mut staged = StagedUpload::from_multipart(
        &mut multipart,
        &state.config.upload_dir,
        state.config.max_upload_bytes,
    )
    .await?;
    let bytes = staged.read_bytes()?;

    tracing::info!(
        file = staged.file_name(),
        bytes = staged.size(),
        %user_id,
        "Received contact list upload"
    );

    let agent_repo = PostgresAgentRepository::new(state.pool.clone());
    let batch_repo = PostgresBatchRepository::new(state.pool.clone());

    let outcome = process_upload(
        &agent_repo,
        &batch_repo,
        UploadRequest {
            file_name: staged.file_name(),
            content_type: staged.content_type(),
            bytes: &bytes,
            uploaded_by: user_id,
        },
    )
    .await?;

    let agents = index_agents(outcome.agents);

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "File uploaded and distributed successfully".to_string(),
            list: BatchResponse::build(&outcome.batch, &agents),
        }),
    ))
}

/// List all batches, newest first
///
/// GET /api/lists
pub async fn list_batches(
    _auth: JwtAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<BatchResponse>>, ApiError> {
    let batch_repo = PostgresBatchRepository::new(state.pool.clone());
    let batches = batch_repo
        .list()
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Database error: {}", e)))?;

    let agent_repo = PostgresAgentRepository::new(state.pool.clone());
    let agents = agents_for(&agent_repo, &batches).await?;

    Ok(Json(
        batches
            .iter()
            .map(|b| BatchResponse::build(b, &agents))
            .collect(),
    ))
}

/// Get a batch by ID
///
/// GET /api/lists/:id
pub async fn get_batch(
    _auth: JwtAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BatchResponse>, ApiError> {
    let batch_repo = PostgresBatchRepository::new(state.pool.clone());
    let batch = batch_repo
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("List not found"))?;

    let agent_repo = PostgresAgentRepository::new(state.pool.clone());
    let agents = agents_for(&agent_repo, std::slice::from_ref(&batch)).await?;

    Ok(Json(BatchResponse::build(&batch, &agents)))
}
