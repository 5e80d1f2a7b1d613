//! HTTP request handlers.

use super::types::{
    AdminInfo, HealthResponse, ListResponse, LoginRequest, LoginResponse, MessageResponse,
    Stats, StatsResponse, VerifyResponse,
};
use super::AppState;
use crate::auth::{AdminClaims, AuthError};
use crate::error::ApiError;
use crate::export::{render_csv, EXPORT_FILE_NAME};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use registration_store::RegistrationFields;
use tracing::{info, warn};

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        total_registrations: state.store.count_all().await,
        storage_healthy: state.store.health_check().await,
    })
}

/// Public registration form submission.
pub async fn submit_query(
    State(state): State<AppState>,
    payload: Result<Json<RegistrationFields>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(fields) = payload.map_err(bad_body)?;

    let record = state
        .store
        .create(&fields)
        .await
        .map_err(|e| {
            ApiError::from_store(e, "An error occurred while submitting your registration")
        })?;

    info!(id = %record.id, "Registration submitted");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::ok(
            "Your registration has been submitted successfully!",
        )),
    ))
}

/// Admin login.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload.map_err(bad_body)?;

    let (Some(username), Some(password)) = (
        request.username.filter(|u| !u.is_empty()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    };

    let issued = state.auth.login(&username, &password).map_err(|e| match e {
        AuthError::InvalidCredentials => {
            warn!(%username, "Admin login rejected");
            ApiError::InvalidCredentials
        }
        other => ApiError::Internal {
            message: "An error occurred during login",
            detail: other.to_string(),
        },
    })?;

    info!(username = %issued.claims.username, "Admin logged in");

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token: issued.token,
        admin: AdminInfo {
            username: issued.claims.username,
            role: issued.claims.role,
        },
    }))
}

/// Confirm that the presented token is valid.
pub async fn verify_admin(Extension(claims): Extension<AdminClaims>) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        success: true,
        message: "Token is valid".to_string(),
        admin: claims,
    })
}

/// List all registrations, newest first.
pub async fn list_queries(State(state): State<AppState>) -> Json<ListResponse> {
    Json(ListResponse {
        success: true,
        data: state.store.list_all().await,
    })
}

/// Delete one registration.
pub async fn delete_query(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = state.store.delete_by_id(&id).await.map_err(|e| {
        ApiError::from_store(e, "An error occurred while deleting the registration")
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Registration not found".to_string()));
    }

    Ok(Json(MessageResponse::ok("Registration deleted successfully")))
}

/// Dashboard statistics.
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.store.stats(start_of_day(Local::now())).await;

    Json(StatsResponse {
        success: true,
        data: Stats {
            total_registrations: stats.total,
            today_registrations: stats.since,
            class_stats: stats.by_class,
        },
    })
}

/// Download all registrations as CSV.
///
/// The document is rendered completely before the response is built.
pub async fn export_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let records = state.store.list_all().await;
    if records.is_empty() {
        return Err(ApiError::NotFound("No registrations found".to_string()));
    }

    let body = render_csv(&records).map_err(|e| ApiError::Internal {
        message: "Failed to export CSV",
        detail: e.to_string(),
    })?;

    info!(rows = records.len(), "Exported registrations");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        body,
    )
        .into_response())
}

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    warn!(reason = %rejection.body_text(), "Rejected request body");
    ApiError::BadRequest("Invalid request body".to_string())
}

/// First instant of `now`'s calendar day in its own time zone.
///
/// When local midnight does not exist (a DST gap), the first existing hour of
/// the day is used instead.
pub fn start_of_day<Tz: TimeZone>(now: DateTime<Tz>) -> DateTime<Utc> {
    let tz = now.timezone();
    let midnight = now.date_naive().and_time(chrono::NaiveTime::MIN);

    (0..24)
        .find_map(|hour| {
            tz.from_local_datetime(&(midnight + Duration::hours(hour)))
                .earliest()
        })
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}
