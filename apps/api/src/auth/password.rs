// Password hashing utilities
// bcrypt hashes for admin users and agents

use bcrypt::{hash, verify, DEFAULT_COST};

use super::AuthError;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Checks the password policy
///
/// # Returns
/// * `Err(String)` - Human readable reason when the password is rejected
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        ));
    }
    Ok(())
}

/// Hashes a password using bcrypt
///
/// # Example
/// ```
/// use agent_lists_api::auth::password::{hash_password, verify_password};
///
/// let hash = hash_password("my_password").unwrap();
/// assert!(verify_password("my_password", &hash).unwrap());
/// ```
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    Ok(hash(password, DEFAULT_COST)?)
}

/// Verifies a password against a bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    Ok(verify(password, hash)?)
}
