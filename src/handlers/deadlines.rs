// src/handlers/deadlines.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::{AuthenticatedUser, Client},
        tenancy::Tenant,
    },
    models::deadlines::{DeadlineKind, DeadlinePriority, DeadlineStatus},
    services::deadline_service::DeadlineInput,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeadlinePayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,

    #[serde(default)]
    pub description: String,
    pub kind: DeadlineKind,
    pub due_date: NaiveDate,
    pub due_time: Option<NaiveTime>,
    pub priority: DeadlinePriority,
    pub responsible_id: Option<Uuid>,
    pub process_id: Option<Uuid>,

    #[serde(default = "default_alert_days")]
    pub alert_days_before: i32,
    #[serde(default)]
    pub notes: String,

    pub office_id: Option<Uuid>,
}

fn default_alert_days() -> i32 {
    3
}

#[derive(Debug, Deserialize)]
pub struct ListDeadlinesQuery {
    pub status: Option<DeadlineStatus>,
}

// POST /api/deadlines
pub async fn create_deadline(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Json(payload): Json<DeadlinePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let input = DeadlineInput {
        title: payload.title,
        description: payload.description,
        kind: payload.kind,
        due_date: payload.due_date,
        due_time: payload.due_time,
        priority: payload.priority,
        responsible_id: payload.responsible_id,
        alert_days_before: payload.alert_days_before,
        notes: payload.notes,
    };

    let deadline = app_state
        .deadline_service
        .create_deadline(
            &user,
            &ctx,
            payload.office_id,
            payload.process_id,
            input,
            &client,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(deadline)))
}

// GET /api/deadlines?status=
pub async fn list_deadlines(
    State(app_state): State<AppState>,
    Tenant(ctx): Tenant,
    Query(query): Query<ListDeadlinesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let deadlines = app_state
        .deadline_service
        .list_deadlines(&ctx, query.status)
        .await?;

    Ok(Json(deadlines))
}

// GET /api/deadlines/{id}
pub async fn get_deadline(
    State(app_state): State<AppState>,
    Tenant(ctx): Tenant,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let deadline = app_state.deadline_service.get_deadline(&ctx, id).await?;
    Ok(Json(deadline))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeadlinePayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,

    #[serde(default)]
    pub description: String,
    pub kind: DeadlineKind,
    pub due_date: NaiveDate,
    pub due_time: Option<NaiveTime>,
    pub priority: DeadlinePriority,
    pub status: DeadlineStatus,
    pub responsible_id: Option<Uuid>,

    #[serde(default = "default_alert_days")]
    pub alert_days_before: i32,
    #[serde(default)]
    pub notes: String,
}

// PUT /api/deadlines/{id}
pub async fn update_deadline(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDeadlinePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let input = DeadlineInput {
        title: payload.title,
        description: payload.description,
        kind: payload.kind,
        due_date: payload.due_date,
        due_time: payload.due_time,
        priority: payload.priority,
        responsible_id: payload.responsible_id,
        alert_days_before: payload.alert_days_before,
        notes: payload.notes,
    };

    let deadline = app_state
        .deadline_service
        .update_deadline(&user, &ctx, id, payload.status, input, &client)
        .await?;

    Ok(Json(deadline))
}

// POST /api/deadlines/{id}/complete
pub async fn complete_deadline(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let deadline = app_state
        .deadline_service
        .complete_deadline(&user, &ctx, id, &client)
        .await?;

    Ok(Json(deadline))
}

// DELETE /api/deadlines/{id}
pub async fn delete_deadline(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .deadline_service
        .delete_deadline(&user, &ctx, id, &client)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
