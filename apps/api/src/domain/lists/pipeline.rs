// Upload orchestration
// detect kind -> load active agents -> normalize -> distribute -> persist

use uuid::Uuid;

use super::batch::UploadBatch;
use super::distributor::distribute;
use super::errors::{UploadError, UploadResult};
use super::normalizer::{normalize, FileKind};
use crate::domain::agent::Agent;
use crate::domain::repositories::{AgentRepository, BatchRepository};

/// A received upload, already read from the transport
#[derive(Debug, Clone, Copy)]
pub struct UploadRequest<'a> {
    /// Original file name as sent by the client
    pub file_name: &'a str,
    /// Declared content type, if the client sent one
    pub content_type: Option<&'a str>,
    pub bytes: &'a [u8],
    /// User performing the upload
    pub uploaded_by: Uuid,
}

/// Result of a successful upload
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub batch: UploadBatch,
    /// Agents that took part in the distribution, in distribution order
    pub agents: Vec<Agent>,
}

/// Runs one upload end to end
///
/// The active agent list is read once, before parsing. Nothing is stored
/// unless every step succeeds; the batch is then saved in one call.
///
/// # Errors
/// * `UnsupportedFormat` - File name or content type not accepted
/// * `NoAgents` - There are no active agents
/// * `Parse` - The file could not be read as its declared kind
/// * `EmptyResult` - The file holds no valid contact rows
/// * `Persistence` - Reading agents or saving the batch failed
/// * `Internal` - The normalizer task died or the distribution broke a batch invariant
pub async fn process_upload(
    agents: &dyn AgentRepository,
    batches: &dyn BatchRepository,
    request: UploadRequest<'_>,
) -> UploadResult<UploadOutcome> {
    let kind = FileKind::detect(request.file_name, request.content_type)?;

    let active = agents
        .list_active()
        .await
        .map_err(UploadError::Persistence)?;
    if active.is_empty() {
        return Err(UploadError::NoAgents);
    }

    // calamine inflates and walks the whole workbook; keep that off the async workers
    let bytes = request.bytes.to_vec();
    let records = tokio::task::spawn_blocking(move || normalize(&bytes, kind))
        .await
        .map_err(|e| UploadError::Internal(format!("normalizer task failed: {}", e)))??;
    if records.is_empty() {
        return Err(UploadError::EmptyResult);
    }

    let agent_ids: Vec<Uuid> = active.iter().map(Agent::id).collect();
    let distributions = distribute(&records, &agent_ids)?;

    let batch = UploadBatch::new(
        request.file_name.to_string(),
        request.uploaded_by,
        distributions,
    )
    .map_err(UploadError::Internal)?;

    batches
        .save(&batch)
        .await
        .map_err(UploadError::Persistence)?;

    tracing::info!(
        batch_id = %batch.id(),
        file = request.file_name,
        %kind,
        records = batch.total_record_count(),
        agents = active.len(),
        "Distributed contact list"
    );

    Ok(UploadOutcome {
        batch,
        agents: active,
    })
}
