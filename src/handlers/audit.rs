// src/handlers/audit.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, tenancy::Tenant},
};

#[derive(Debug, Deserialize)]
pub struct ListAuditQuery {
    pub limit: Option<i64>,
}

// GET /api/audit-logs?limit= (somente org_admin)
pub async fn list_audit_logs(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Query(query): Query<ListAuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    // Teto de 500 linhas por página
    let limit = query.limit.unwrap_or(100).clamp(1, 500);

    let logs = app_state
        .audit_service
        .list_for_organization(user.id, &ctx, limit, &app_state.db_pool)
        .await?;

    Ok(Json(logs))
}
