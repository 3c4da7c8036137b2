use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::agent::Agent;
use crate::domain::user::value_objects::Email;

/// Repository trait for the Agent aggregate
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Insert a new agent
    async fn create(&self, agent: &Agent) -> Result<(), String>;

    /// Persist changes to an existing agent
    async fn update(&self, agent: &Agent) -> Result<(), String>;

    /// Find an agent by ID, active or not
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, String>;

    /// Find an agent by email address
    async fn find_by_email(&self, email: &Email) -> Result<Option<Agent>, String>;

    /// Find every agent among `ids`, active or not
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Agent>, String>;

    /// List active agents, oldest first
    ///
    /// The order is stable and decides which agents receive the larger
    /// slices during distribution.
    async fn list_active(&self) -> Result<Vec<Agent>, String>;
}
