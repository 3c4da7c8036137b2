// Authentication helpers
// Password hashing and bearer token handling

pub mod jwt;
pub mod password;

use thiserror::Error;

/// Errors raised while hashing passwords or handling tokens
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}
