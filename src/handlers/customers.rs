// src/handlers/customers.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
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
    models::customers::CustomerType,
    services::customer_service::CustomerInput,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub name: String,

    #[serde(rename = "type")]
    pub kind: CustomerType,

    #[validate(length(min = 11, message = "Informe o CPF ou CNPJ do cliente."))]
    pub document: String,

    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub phone_secondary: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub notes: String,

    // Só usado na criação, por quem tem vínculo org-wide
    pub office_id: Option<Uuid>,
}

impl CustomerPayload {
    fn into_input(self) -> CustomerInput {
        CustomerInput {
            name: self.name,
            kind: self.kind,
            document: self.document,
            email: self.email,
            phone: self.phone,
            phone_secondary: self.phone_secondary,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListCustomersQuery {
    pub search: Option<String>,
}

// POST /api/customers
pub async fn create_customer(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let office_id = payload.office_id;
    let customer = app_state
        .customer_service
        .create_customer(&user, &ctx, office_id, payload.into_input(), &client)
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

// GET /api/customers?search=
pub async fn list_customers(
    State(app_state): State<AppState>,
    Tenant(ctx): Tenant,
    Query(query): Query<ListCustomersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state
        .customer_service
        .list_customers(&ctx, query.search.as_deref())
        .await?;

    Ok(Json(customers))
}

// GET /api/customers/{id}
pub async fn get_customer(
    State(app_state): State<AppState>,
    Tenant(ctx): Tenant,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state.customer_service.get_customer(&ctx, id).await?;
    Ok(Json(customer))
}

// PUT /api/customers/{id}
pub async fn update_customer(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Path(id): Path<Uuid>,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let customer = app_state
        .customer_service
        .update_customer(&user, &ctx, id, payload.into_input(), &client)
        .await?;

    Ok(Json(customer))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActivePayload {
    pub is_active: bool,
}

// PATCH /api/customers/{id}/active
pub async fn set_customer_active(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetActivePayload>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state
        .customer_service
        .set_customer_active(&user, &ctx, id, payload.is_active, &client)
        .await?;

    Ok(Json(customer))
}

// DELETE /api/customers/{id}
pub async fn delete_customer(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .customer_service
        .delete_customer(&user, &ctx, id, &client)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
