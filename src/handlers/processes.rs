// src/handlers/processes.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
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
    models::processes::{PartyRole, ProcessArea, ProcessPhase},
    services::process_service::ProcessInput,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProcessPayload {
    #[validate(length(min = 1, message = "O número do processo é obrigatório."))]
    pub number: String,

    #[serde(default)]
    pub internal_number: String,
    pub area: ProcessArea,

    #[validate(length(min = 1, message = "O assunto é obrigatório."))]
    pub subject: String,

    #[serde(default)]
    pub court: String,
    #[serde(default)]
    pub court_division: String,
    pub value: Option<Decimal>,
    pub distribution_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub is_confidential: bool,

    pub office_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProcessPayload {
    #[serde(default)]
    pub internal_number: String,
    pub area: ProcessArea,

    #[validate(length(min = 1, message = "O assunto é obrigatório."))]
    pub subject: String,

    #[serde(default)]
    pub court: String,
    #[serde(default)]
    pub court_division: String,
    pub phase: ProcessPhase,
    pub value: Option<Decimal>,
    pub distribution_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_confidential: bool,
}

fn default_true() -> bool {
    true
}

// POST /api/processes
pub async fn create_process(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Json(payload): Json<CreateProcessPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let input = ProcessInput {
        internal_number: payload.internal_number,
        area: payload.area,
        subject: payload.subject,
        court: payload.court,
        court_division: payload.court_division,
        value: payload.value,
        distribution_date: payload.distribution_date,
        notes: payload.notes,
        is_confidential: payload.is_confidential,
    };

    let process = app_state
        .process_service
        .create_process(
            &user,
            &ctx,
            payload.office_id,
            &payload.number,
            input,
            &client,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(process)))
}

// GET /api/processes
pub async fn list_processes(
    State(app_state): State<AppState>,
    Tenant(ctx): Tenant,
) -> Result<impl IntoResponse, AppError> {
    let processes = app_state.process_service.list_processes(&ctx).await?;
    Ok(Json(processes))
}

// GET /api/processes/{id}
pub async fn get_process(
    State(app_state): State<AppState>,
    Tenant(ctx): Tenant,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let process = app_state.process_service.get_process(&ctx, id).await?;
    Ok(Json(process))
}

// PUT /api/processes/{id}
pub async fn update_process(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProcessPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let input = ProcessInput {
        internal_number: payload.internal_number,
        area: payload.area,
        subject: payload.subject,
        court: payload.court,
        court_division: payload.court_division,
        value: payload.value,
        distribution_date: payload.distribution_date,
        notes: payload.notes,
        is_confidential: payload.is_confidential,
    };

    let process = app_state
        .process_service
        .update_process(
            &user,
            &ctx,
            id,
            payload.phase,
            payload.is_active,
            input,
            &client,
        )
        .await?;

    Ok(Json(process))
}

// DELETE /api/processes/{id}
pub async fn delete_process(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .process_service
        .delete_process(&user, &ctx, id, &client)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  PARTES DO PROCESSO
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPartyPayload {
    pub customer_id: Uuid,
    pub role: PartyRole,
    #[serde(default)]
    pub notes: String,
}

// POST /api/processes/{id}/parties
pub async fn add_party(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Path(process_id): Path<Uuid>,
    Json(payload): Json<AddPartyPayload>,
) -> Result<impl IntoResponse, AppError> {
    let party = app_state
        .process_service
        .add_party(
            &user,
            &ctx,
            process_id,
            payload.customer_id,
            payload.role,
            &payload.notes,
            &client,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(party)))
}

// GET /api/processes/{id}/parties
pub async fn list_parties(
    State(app_state): State<AppState>,
    Tenant(ctx): Tenant,
    Path(process_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let parties = app_state
        .process_service
        .list_parties(&ctx, process_id)
        .await?;

    Ok(Json(parties))
}

// DELETE /api/processes/{id}/parties/{party_id}
pub async fn remove_party(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Path((process_id, party_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .process_service
        .remove_party(&user, &ctx, process_id, party_id, &client)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
