use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::auth::password::{hash_password, validate_password};
use crate::domain::agent::{Agent, AgentName, AgentUpdate, MobileNumber};
use crate::domain::repositories::AgentRepository;
use crate::domain::user::value_objects::Email;
use crate::infrastructure::repositories::PostgresAgentRepository;

/// Request body for creating an agent
#[derive(Debug, Deserialize)]
pub struct CreateAgentRequest {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
}

/// Request body for updating an agent; omitted fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAgentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub is_active: Option<bool>,
}

/// Agent as returned to clients (never includes the password hash)
#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Agent> for AgentResponse {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id(),
            name: agent.name().to_string(),
            email: agent.email().to_string(),
            mobile: agent.mobile().to_string(),
            is_active: agent.is_active(),
            created_at: agent.created_at(),
        }
    }
}

/// Response for agent deactivation
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Collects every validation failure so clients can show them together
#[derive(Default)]
struct Validation {
    errors: Vec<String>,
}

impl Validation {
    fn check<T>(&mut self, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.errors.push(e);
                None
            }
        }
    }

    fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::bad_request(format!(
                "Validation failed: {}",
                self.errors.join("; ")
            )))
        }
    }
}

fn parse_update(req: UpdateAgentRequest) -> Result<AgentUpdate, ApiError> {
    let mut validation = Validation::default();

    let name = req.name.and_then(|n| validation.check(AgentName::new(n)));
    let email = req.email.and_then(|e| {
        validation.check(Email::new(e).map_err(|_| "Please provide a valid email".to_string()))
    });
    let mobile = req.mobile.and_then(|m| validation.check(MobileNumber::new(m)));

    validation.finish()?;

    Ok(AgentUpdate {
        name,
        email,
        mobile,
        is_active: req.is_active,
    })
}

/// List active agents
///
/// GET /api/agents
pub async fn list_agents(
    _auth: JwtAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<AgentResponse>>, ApiError> {
    let agent_repo = PostgresAgentRepository::new(state.pool.clone());
    let agents = agent_repo
        .list_active()
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Database error: {}", e)))?;

    Ok(Json(agents.iter().map(AgentResponse::from).collect()))
}

/// Create a new agent
///
/// POST /api/agents
pub async fn create_agent(
    JwtAuth(user_id): JwtAuth,
    State(state): State<AppState>,
    Json(req): Json<CreateAgentRequest>,
) -> Result<(StatusCode, Json<AgentResponse>), ApiError> {
    let mut validation = Validation::default();
    let name = validation.check(AgentName::new(&req.name));
    let email = validation
        .check(Email::new(&req.email).map_err(|_| "Please provide a valid email".to_string()));
    let mobile = validation.check(MobileNumber::new(&req.mobile));
    validation.check(validate_password(&req.password));
    validation.finish()?;

    let (Some(name), Some(email), Some(mobile)) = (name, email, mobile) else {
        return Err(ApiError::bad_request("Validation failed"));
    };

    let agent_repo = PostgresAgentRepository::new(state.pool.clone());
    let existing = agent_repo
        .find_by_email(&email)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Database error: {}", e)))?;
    if existing.is_some() {
        return Err(ApiError::bad_request("Agent with this email already exists"));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to hash password: {}", e)))?;

    let agent = Agent::new(name, email, mobile, password_hash);
    agent_repo.create(&agent).await.map_err(|e| {
        if e.contains("duplicate") || e.contains("unique") {
            ApiError::bad_request("Agent with this email already exists")
        } else {
            ApiError::internal_server_error(format!("Failed to create agent: {}", e))
        }
    })?;

    tracing::info!(agent_id = %agent.id(), created_by = %user_id, "Created agent");

    Ok((StatusCode::CREATED, Json(AgentResponse::from(&agent))))
}

/// Update an agent
///
/// PUT /api/agents/:id
pub async fn update_agent(
    _auth: JwtAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAgentRequest>,
) -> Result<Json<AgentResponse>, ApiError> {
    let update = parse_update(req)?;

    let agent_repo = PostgresAgentRepository::new(state.pool.clone());
    let mut agent = agent_repo
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Agent not found"))?;

    agent.apply(update);

    agent_repo.update(&agent).await.map_err(|e| {
        if e.contains("duplicate") || e.contains("unique") {
            ApiError::bad_request("Agent with this email already exists")
        } else if e.contains("not found") {
            ApiError::not_found("Agent not found")
        } else {
            ApiError::internal_server_error(format!("Failed to update agent: {}", e))
        }
    })?;

    Ok(Json(AgentResponse::from(&agent)))
}

/// Deactivate an agent
///
/// DELETE /api/agents/:id
///
/// Agents are soft deleted so earlier batches still resolve them.
pub async fn delete_agent(
    _auth: JwtAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let agent_repo = PostgresAgentRepository::new(state.pool.clone());
    let mut agent = agent_repo
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Agent not found"))?;

    agent.deactivate();
    agent_repo
        .update(&agent)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Failed to delete agent: {}", e)))?;

    tracing::info!(agent_id = %id, "Deactivated agent");

    Ok(Json(MessageResponse {
        message: "Agent deactivated successfully".to_string(),
    }))
}
