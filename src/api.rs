//! REST API server for the personal finance dashboard
//!
//! Exposes the record store and the financial assistant via the HTTP
//! endpoints the dashboard front end consumes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::advisor::Advisor;
use crate::error::AppError;
use crate::models::{
    Account, ChatMessage, ChatRole, NewChatMessage, PublicUser, RiskTolerance, SavingsGoal,
    UserUpdate,
};
use crate::store::Storage;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub user_id: i64,
}

/// Profile update command. Unknown fields are rejected so that client
/// typos surface as 400s instead of silently doing nothing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfileUpdateRequest {
    pub monthly_income: Option<f64>,
    pub risk_tolerance: Option<RiskTolerance>,
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub storage: Arc<dyn Storage>,
    pub advisor: Arc<Advisor>,
}

/// =============================
/// Error Mapping
/// =============================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// User Endpoints
/// =============================

async fn get_user(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<PublicUser>, AppError> {
    let Some(user) = state.storage.get_user(id).await? else {
        return Err(AppError::NotFound("User not found".to_string()));
    };

    Ok(Json(PublicUser::from(user)))
}

async fn update_profile(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    payload: Result<Json<ProfileUpdateRequest>, JsonRejection>,
) -> Result<Json<PublicUser>, AppError> {
    let Json(req) = payload?;

    let updates = UserUpdate {
        monthly_income: req.monthly_income,
        risk_tolerance: req.risk_tolerance,
        ..UserUpdate::default()
    };

    let Some(user) = state.storage.update_user(id, updates).await? else {
        return Err(AppError::NotFound("User not found".to_string()));
    };

    info!(user_id = id, "User profile updated");
    Ok(Json(PublicUser::from(user)))
}

/// =============================
/// Account & Goal Endpoints
/// =============================

async fn get_accounts(
    State(state): State<ApiState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Account>>, AppError> {
    Ok(Json(state.storage.get_accounts(user_id).await?))
}

async fn get_savings_goals(
    State(state): State<ApiState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<SavingsGoal>>, AppError> {
    Ok(Json(state.storage.get_savings_goals(user_id).await?))
}

/// =============================
/// Chat Endpoints
/// =============================

async fn get_chat_messages(
    State(state): State<ApiState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    Ok(Json(state.storage.get_chat_messages(user_id).await?))
}

async fn send_chat_message(
    State(state): State<ApiState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let Json(req) = payload?;

    if req.message.is_empty() {
        return Err(AppError::Validation("Message cannot be empty".to_string()));
    }

    info!(user_id = req.user_id, "Chat message received");

    state
        .storage
        .create_chat_message(NewChatMessage {
            user_id: req.user_id,
            role: ChatRole::User,
            content: req.message.clone(),
        })
        .await?;

    let reply = state.advisor.respond(&req.message, req.user_id).await;

    state
        .storage
        .create_chat_message(NewChatMessage {
            user_id: req.user_id,
            role: ChatRole::Assistant,
            content: reply,
        })
        .await?;

    let history = state.storage.get_chat_messages(req.user_id).await?;
    Ok(Json(history))
}

/// =============================
/// Router
/// =============================

pub fn create_router(storage: Arc<dyn Storage>, advisor: Arc<Advisor>) -> Router {
    let state = ApiState { storage, advisor };

    Router::new()
        .route("/health", get(health))
        .route("/api/users/:id", get(get_user))
        .route("/api/users/:id/profile", patch(update_profile))
        .route("/api/accounts/:user_id", get(get_accounts))
        .route("/api/savings-goals/:user_id", get(get_savings_goals))
        .route("/api/chat/:user_id", get(get_chat_messages))
        .route("/api/chat", post(send_chat_message))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    storage: Arc<dyn Storage>,
    advisor: Arc<Advisor>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(storage, advisor);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
