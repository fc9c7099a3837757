// src/handlers/tenancy.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::{AuthenticatedUser, Client},
        tenancy::Tenant,
    },
    models::tenancy::{PlanTier, Role},
};

// =============================================================================
//  ORGANIZAÇÕES
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub name: String,

    #[validate(length(min = 11, message = "Informe o CPF ou CNPJ da organização."))]
    pub document: String,

    #[serde(default)]
    pub plan: Option<PlanTier>,
}

// POST /api/organizations
pub async fn create_organization(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Client(client): Client,
    Json(payload): Json<CreateOrganizationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let organization = app_state
        .tenancy_service
        .create_organization_with_admin(
            &user,
            &payload.name,
            &payload.document,
            payload.plan.unwrap_or(PlanTier::Free),
            &client,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(organization)))
}

// GET /api/organizations
pub async fn list_my_organizations(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let organizations = app_state.tenancy_service.list_my_organizations(&user).await?;
    Ok(Json(organizations))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsPayload {
    pub settings: Value,
}

// PATCH /api/organizations/settings
pub async fn update_organization_settings(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Json(payload): Json<UpdateSettingsPayload>,
) -> Result<impl IntoResponse, AppError> {
    let organization = app_state
        .tenancy_service
        .update_organization_settings(&user, &ctx, payload.settings, &client)
        .await?;

    Ok(Json(organization))
}

// =============================================================================
//  ESCRITÓRIOS
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfficePayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub name: String,
}

// POST /api/offices
pub async fn create_office(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Json(payload): Json<CreateOfficePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let office = app_state
        .tenancy_service
        .create_office(&user, &ctx, &payload.name, &client)
        .await?;

    Ok((StatusCode::CREATED, Json(office)))
}

// GET /api/offices
pub async fn list_offices(
    State(app_state): State<AppState>,
    Tenant(ctx): Tenant,
) -> Result<impl IntoResponse, AppError> {
    let offices = app_state.tenancy_service.list_offices(&ctx).await?;
    Ok(Json(offices))
}

// =============================================================================
//  MEMBERSHIPS
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMembershipPayload {
    pub user_id: Uuid,
    pub office_id: Option<Uuid>,
    pub role: Role,
}

// POST /api/memberships
pub async fn create_membership(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Json(payload): Json<CreateMembershipPayload>,
) -> Result<impl IntoResponse, AppError> {
    let membership = app_state
        .tenancy_service
        .create_membership(
            &user,
            &ctx,
            payload.user_id,
            payload.office_id,
            payload.role,
            &client,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(membership)))
}

// GET /api/memberships
pub async fn list_memberships(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
) -> Result<impl IntoResponse, AppError> {
    let memberships = app_state.tenancy_service.list_memberships(&user, &ctx).await?;
    Ok(Json(memberships))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActivePayload {
    pub is_active: bool,
}

// PATCH /api/memberships/{id}/active
pub async fn set_membership_active(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetActivePayload>,
) -> Result<impl IntoResponse, AppError> {
    let membership = app_state
        .tenancy_service
        .set_membership_active(&user, &ctx, id, payload.is_active, &client)
        .await?;

    Ok(Json(membership))
}
