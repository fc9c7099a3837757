// src/middleware/tenancy.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, config::AppState, services::scoping::TenantContext};

/// Autentica e resolve o contexto de tenant do usuário numa única camada.
///
/// O contexto resolvido (possivelmente vazio, se o usuário não tem vínculo
/// ativo) vai para as extensions; as consultas escopadas respondem vazio em
/// vez de 403, então a requisição segue mesmo sem vínculo.
pub async fn tenant_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    let auth_header = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    let Some(token) = auth_header.and_then(|h| h.strip_prefix("Bearer ")) else {
        return Err(AppError::InvalidToken);
    };

    let user = app_state.auth_service.validate_token(token).await?;
    let ctx = app_state.scoping_service.resolve_context(user.id).await?;

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(ctx);

    Ok(next.run(request).await)
}

// Extrator do contexto resolvido pelo tenant_guard
pub struct Tenant(pub TenantContext);

impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .map(Tenant)
            .ok_or(AppError::InvalidToken)
    }
}
