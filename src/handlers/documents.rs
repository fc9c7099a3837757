// src/handlers/documents.rs

use axum::{
    Json,
    extract::{Path, State},
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
    models::documents::DocumentCategory,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,

    pub category: DocumentCategory,

    #[serde(default)]
    pub description: String,

    #[validate(length(min = 1, message = "O nome do arquivo é obrigatório."))]
    pub file_name: String,

    pub file_size: Option<i64>,
    pub process_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,

    #[serde(default)]
    pub is_confidential: bool,

    pub office_id: Option<Uuid>,
}

// POST /api/documents
pub async fn create_document(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Json(payload): Json<CreateDocumentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let document = app_state
        .document_service
        .create_document(
            &user,
            &ctx,
            payload.office_id,
            &payload.title,
            payload.category,
            &payload.description,
            &payload.file_name,
            payload.file_size,
            payload.process_id,
            payload.customer_id,
            payload.is_confidential,
            &client,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(document)))
}

// GET /api/documents
pub async fn list_documents(
    State(app_state): State<AppState>,
    Tenant(ctx): Tenant,
) -> Result<impl IntoResponse, AppError> {
    let documents = app_state.document_service.list_documents(&ctx).await?;
    Ok(Json(documents))
}

// GET /api/documents/{id}
pub async fn get_document(
    State(app_state): State<AppState>,
    Tenant(ctx): Tenant,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let document = app_state.document_service.get_document(&ctx, id).await?;
    Ok(Json(document))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,

    pub category: DocumentCategory,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub is_confidential: bool,
}

// PUT /api/documents/{id}
pub async fn update_document(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDocumentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let document = app_state
        .document_service
        .update_document(
            &user,
            &ctx,
            id,
            &payload.title,
            payload.category,
            &payload.description,
            payload.is_confidential,
            &client,
        )
        .await?;

    Ok(Json(document))
}

// DELETE /api/documents/{id}
pub async fn delete_document(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .document_service
        .delete_document(&user, &ctx, id, &client)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
