// Infrastructure layer module
// PostgreSQL adapters for the repository ports in domain::repositories

pub mod repositories;
