use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::value_objects::{AgentName, MobileNumber};
use crate::domain::user::value_objects::Email;

/// Agent aggregate root
///
/// A recipient of distributed contact records. Agents are never removed;
/// deleting one only deactivates it so earlier batches keep resolving.
///
/// # Invariants
/// - Name, email and mobile are always valid value objects
/// - Only active agents take part in new distributions
///
/// # Example
/// ```
/// use agent_lists_api::domain::agent::{Agent, AgentName, MobileNumber};
/// use agent_lists_api::domain::user::value_objects::Email;
///
/// let agent = Agent::new(
///     AgentName::new("Ada Lovelace").unwrap(),
///     Email::new("ada@example.com").unwrap(),
///     MobileNumber::new("+14155550100").unwrap(),
///     "hashed".to_string(),
/// );
///
/// assert!(agent.is_active());
/// ```
#[derive(Debug, Clone)]
pub struct Agent {
    id: Uuid,
    name: AgentName,
    email: Email,
    mobile: MobileNumber,
    password_hash: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

/// Partial update of an agent; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct AgentUpdate {
    pub name: Option<AgentName>,
    pub email: Option<Email>,
    pub mobile: Option<MobileNumber>,
    pub is_active: Option<bool>,
}

impl Agent {
    /// Creates a new active agent
    pub fn new(name: AgentName, email: Email, mobile: MobileNumber, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            mobile,
            password_hash,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Applies a partial update
    pub fn apply(&mut self, update: AgentUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(mobile) = update.mobile {
            self.mobile = mobile;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
    }

    /// Marks the agent inactive
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &AgentName {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn mobile(&self) -> &MobileNumber {
        &self.mobile
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Reconstructs an Agent from persistence layer data
    ///
    /// Only to be used by repository implementations.
    pub fn from_persistence(
        id: Uuid,
        name: AgentName,
        email: Email,
        mobile: MobileNumber,
        password_hash: String,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            mobile,
            password_hash,
            is_active,
            created_at,
        }
    }
}
