// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod postgres_agent_repository;
pub mod postgres_batch_repository;
pub mod postgres_user_repository;

pub use postgres_agent_repository::PostgresAgentRepository;
pub use postgres_batch_repository::PostgresBatchRepository;
pub use postgres_user_repository::PostgresUserRepository;
