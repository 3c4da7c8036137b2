// Repository interfaces (ports)
// Implemented by adapters in the infrastructure layer

pub mod agent_repository;
pub mod batch_repository;
pub mod user_repository;

pub use agent_repository::AgentRepository;
pub use batch_repository::BatchRepository;
pub use user_repository::{User, UserRepository};
