// src/handlers/finance.rs

use axum::{
    Json,
    extract::{Path, Query, State},
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
    models::finance::{AgreementKind, AgreementStatus, PaymentMethod, PaymentStatus},
    services::finance_service::AgreementInput,
};

// =============================================================================
//  CONTRATOS DE HONORÁRIOS
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgreementPayload {
    pub customer_id: Uuid,
    pub process_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,

    pub kind: AgreementKind,

    #[serde(default)]
    pub description: String,

    pub amount: Decimal,
    pub success_percentage: Option<Decimal>,
    pub hourly_rate: Option<Decimal>,

    #[serde(default = "default_installments")]
    pub installments: i32,

    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,

    #[serde(default)]
    pub notes: String,

    pub office_id: Option<Uuid>,
}

fn default_installments() -> i32 {
    1
}

// POST /api/finance/agreements
pub async fn create_agreement(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Json(payload): Json<CreateAgreementPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let input = AgreementInput {
        title: payload.title,
        kind: payload.kind,
        description: payload.description,
        amount: payload.amount,
        success_percentage: payload.success_percentage,
        hourly_rate: payload.hourly_rate,
        installments: payload.installments,
        start_date: payload.start_date,
        end_date: payload.end_date,
        notes: payload.notes,
    };

    let agreement = app_state
        .finance_service
        .create_agreement(
            &user,
            &ctx,
            payload.office_id,
            payload.customer_id,
            payload.process_id,
            input,
            &client,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(agreement)))
}

// GET /api/finance/agreements
pub async fn list_agreements(
    State(app_state): State<AppState>,
    Tenant(ctx): Tenant,
) -> Result<impl IntoResponse, AppError> {
    let agreements = app_state.finance_service.list_agreements(&ctx).await?;
    Ok(Json(agreements))
}

// GET /api/finance/agreements/{id} (com totais de recebimento)
pub async fn get_agreement(
    State(app_state): State<AppState>,
    Tenant(ctx): Tenant,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.finance_service.get_agreement(&ctx, id).await?;
    Ok(Json(summary))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAgreementStatusPayload {
    pub status: AgreementStatus,
}

// PATCH /api/finance/agreements/{id}/status
pub async fn set_agreement_status(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetAgreementStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let agreement = app_state
        .finance_service
        .set_agreement_status(&user, &ctx, id, payload.status, &client)
        .await?;

    Ok(Json(agreement))
}

// DELETE /api/finance/agreements/{id}
pub async fn delete_agreement(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .finance_service
        .delete_agreement(&user, &ctx, id, &client)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  PAGAMENTOS
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentPayload {
    pub fee_agreement_id: Uuid,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub method: PaymentMethod,

    #[serde(default)]
    pub notes: String,
}

// POST /api/finance/payments
pub async fn create_payment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Json(payload): Json<CreatePaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let payment = app_state
        .finance_service
        .create_payment(
            &user,
            &ctx,
            payload.fee_agreement_id,
            &payload.description,
            payload.amount,
            payload.due_date,
            payload.method,
            &payload.notes,
            &client,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(payment)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPaymentsQuery {
    pub fee_agreement_id: Option<Uuid>,
}

// GET /api/finance/payments?feeAgreementId=
pub async fn list_payments(
    State(app_state): State<AppState>,
    Tenant(ctx): Tenant,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let payments = app_state
        .finance_service
        .list_payments(&ctx, query.fee_agreement_id)
        .await?;

    Ok(Json(payments))
}

// GET /api/finance/payments/{id}
pub async fn get_payment(
    State(app_state): State<AppState>,
    Tenant(ctx): Tenant,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let payment = app_state.finance_service.get_payment(&ctx, id).await?;
    Ok(Json(payment))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivePaymentPayload {
    pub payment_date: Option<NaiveDate>,
}

// POST /api/finance/payments/{id}/receive
pub async fn receive_payment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReceivePaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let payment = app_state
        .finance_service
        .mark_payment_received(&user, &ctx, id, payload.payment_date, &client)
        .await?;

    Ok(Json(payment))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPaymentStatusPayload {
    pub status: PaymentStatus,
}

// PATCH /api/finance/payments/{id}/status
pub async fn set_payment_status(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Tenant(ctx): Tenant,
    Client(client): Client,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetPaymentStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let payment = app_state
        .finance_service
        .set_payment_status(&user, &ctx, id, payload.status, &client)
        .await?;

    Ok(Json(payment))
}
