//! API request and response types.

use crate::auth::AdminClaims;
use registration_store::{ClassCount, RegistrationRecord};
use serde::{Deserialize, Serialize};

/// Outcome with a user-facing message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Admin login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Public view of the admin identity.
#[derive(Debug, Serialize)]
pub struct AdminInfo {
    pub username: String,
    pub role: String,
}

/// Response after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub admin: AdminInfo,
}

/// Response to a token check.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub message: String,
    pub admin: AdminClaims,
}

/// All registrations, newest first.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub data: Vec<RegistrationRecord>,
}

/// Dashboard statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_registrations: usize,
    pub today_registrations: usize,
    pub class_stats: Vec<ClassCount>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub data: Stats,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub total_registrations: usize,
    pub storage_healthy: bool,
}
