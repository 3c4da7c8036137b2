use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::lists::UploadBatch;

/// Repository trait for upload batches
///
/// Batches are append-only: there is no update or delete.
#[async_trait]
pub trait BatchRepository: Send + Sync {
    /// Store a batch and all of its distributions atomically
    async fn save(&self, batch: &UploadBatch) -> Result<Uuid, String>;

    /// List all batches, newest first
    async fn list(&self) -> Result<Vec<UploadBatch>, String>;

    /// Find a batch by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UploadBatch>, String>;
}
