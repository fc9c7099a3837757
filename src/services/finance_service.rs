// src/services/finance_service.rs

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, FinanceRepository},
    models::{
        audit::AuditAction,
        auth::User,
        finance::{
            AgreementKind, AgreementStatus, FeeAgreement, Payment, PaymentMethod, PaymentStatus,
            installment_amount,
        },
    },
    services::{
        audit::{AuditService, ClientInfo},
        authz::{AuthorizationService, Capability},
        scoping::TenantContext,
    },
};

#[derive(Debug, Clone)]
pub struct AgreementInput {
    pub title: String,
    pub kind: AgreementKind,
    pub description: String,
    pub amount: Decimal,
    pub success_percentage: Option<Decimal>,
    pub hourly_rate: Option<Decimal>,
    pub installments: i32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: String,
}

/// Contrato enriquecido com os totais derivados dos pagamentos.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementSummary {
    #[serde(flatten)]
    pub agreement: FeeAgreement,
    pub total_received: Decimal,
    pub total_pending: Decimal,
    pub percentage_received: Decimal,
    pub is_fully_paid: bool,
}

#[derive(Clone)]
pub struct FinanceService {
    repo: FinanceRepository,
    customer_repo: CustomerRepository,
    authz: AuthorizationService,
    audit: AuditService,
    pool: PgPool,
}

impl FinanceService {
    pub fn new(
        repo: FinanceRepository,
        customer_repo: CustomerRepository,
        authz: AuthorizationService,
        audit: AuditService,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            customer_repo,
            authz,
            audit,
            pool,
        }
    }

    async fn summarize(&self, agreement: FeeAgreement) -> Result<AgreementSummary, AppError> {
        let total_received = self.repo.total_received(&self.pool, agreement.id).await?;
        Ok(AgreementSummary {
            total_pending: agreement.total_pending(total_received),
            percentage_received: agreement.percentage_received(total_received),
            is_fully_paid: agreement.is_fully_paid(total_received),
            total_received,
            agreement,
        })
    }

    // =========================================================================
    //  CONTRATOS DE HONORÁRIOS
    // =========================================================================

    pub async fn create_agreement(
        &self,
        actor: &User,
        ctx: &TenantContext,
        office_id: Option<Uuid>,
        customer_id: Uuid,
        process_id: Option<Uuid>,
        input: AgreementInput,
        client: &ClientInfo,
    ) -> Result<FeeAgreement, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ReadRecords)
            .await?;

        let office_id = ctx
            .office_id()
            .or(office_id)
            .ok_or(AppError::OfficeRequired)?;

        // Cliente de outro tenant é tratado como inexistente
        let customer = self
            .customer_repo
            .find_by_id(&self.pool, &ctx.scope(), customer_id)
            .await?
            .ok_or(AppError::NotFound)?;

        // Valor da parcela derivado no servidor, nunca aceito do cliente
        let per_installment = installment_amount(input.amount, input.installments);

        let mut tx = self.pool.begin().await?;
        let agreement = self
            .repo
            .create_agreement(
                &mut *tx,
                org_id,
                office_id,
                customer.id,
                process_id,
                &input.title,
                input.kind,
                &input.description,
                input.amount,
                input.success_percentage,
                input.hourly_rate,
                input.installments,
                per_installment,
                input.start_date,
                input.end_date,
                &input.notes,
            )
            .await?;
        tx.commit().await?;

        self.audit
            .record(
                Some(actor.id),
                Some(org_id),
                Some(office_id),
                AuditAction::Create,
                "FeeAgreement",
                Some(agreement.id),
                &format!("{} - {}", agreement.title, customer.name),
                json!({}),
                client,
            )
            .await;

        Ok(agreement)
    }

    pub async fn list_agreements(
        &self,
        ctx: &TenantContext,
    ) -> Result<Vec<FeeAgreement>, AppError> {
        self.repo.list_agreements(&self.pool, &ctx.scope()).await
    }

    /// Contrato com totais de recebimento calculados a partir dos pagamentos.
    pub async fn get_agreement(
        &self,
        ctx: &TenantContext,
        id: Uuid,
    ) -> Result<AgreementSummary, AppError> {
        let agreement = self
            .repo
            .find_agreement(&self.pool, &ctx.scope(), id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.summarize(agreement).await
    }

    pub async fn set_agreement_status(
        &self,
        actor: &User,
        ctx: &TenantContext,
        id: Uuid,
        status: AgreementStatus,
        client: &ClientInfo,
    ) -> Result<FeeAgreement, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ReadRecords)
            .await?;

        let scope = ctx.scope();
        let mut tx = self.pool.begin().await?;

        let before = self
            .repo
            .find_agreement(&mut *tx, &scope, id)
            .await?
            .ok_or(AppError::NotFound)?;

        let updated = self
            .repo
            .set_agreement_status(&mut *tx, &scope, id, status)
            .await?
            .ok_or(AppError::NotFound)?;

        tx.commit().await?;

        self.audit
            .record_update(
                Some(actor.id),
                Some(org_id),
                ctx.office_id(),
                "FeeAgreement",
                updated.id,
                &updated.title,
                &before,
                &updated,
                client,
            )
            .await;

        Ok(updated)
    }

    pub async fn delete_agreement(
        &self,
        actor: &User,
        ctx: &TenantContext,
        id: Uuid,
        client: &ClientInfo,
    ) -> Result<(), AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ReadRecords)
            .await?;

        let scope = ctx.scope();
        let mut tx = self.pool.begin().await?;

        let before = self
            .repo
            .find_agreement(&mut *tx, &scope, id)
            .await?
            .ok_or(AppError::NotFound)?;

        let deleted = self.repo.delete_agreement(&mut *tx, &scope, id).await?;
        if !deleted {
            return Err(AppError::NotFound);
        }

        tx.commit().await?;

        self.audit
            .record(
                Some(actor.id),
                Some(org_id),
                ctx.office_id(),
                AuditAction::Delete,
                "FeeAgreement",
                Some(before.id),
                &before.title,
                json!({}),
                client,
            )
            .await;

        Ok(())
    }

    // =========================================================================
    //  PAGAMENTOS
    // =========================================================================

    pub async fn create_payment(
        &self,
        actor: &User,
        ctx: &TenantContext,
        fee_agreement_id: Uuid,
        description: &str,
        amount: Decimal,
        due_date: NaiveDate,
        method: PaymentMethod,
        notes: &str,
        client: &ClientInfo,
    ) -> Result<Payment, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ReadRecords)
            .await?;

        // O pagamento herda organização e escritório do contrato
        let agreement = self
            .repo
            .find_agreement(&self.pool, &ctx.scope(), fee_agreement_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut tx = self.pool.begin().await?;
        let payment = self
            .repo
            .create_payment(
                &mut *tx,
                agreement.organization_id,
                agreement.office_id,
                agreement.id,
                description,
                amount,
                due_date,
                method,
                notes,
            )
            .await?;
        tx.commit().await?;

        self.audit
            .record(
                Some(actor.id),
                Some(org_id),
                Some(agreement.office_id),
                AuditAction::Create,
                "Payment",
                Some(payment.id),
                &format!("{} ({})", payment.description, payment.amount),
                json!({}),
                client,
            )
            .await;

        Ok(payment)
    }

    pub async fn list_payments(
        &self,
        ctx: &TenantContext,
        fee_agreement_id: Option<Uuid>,
    ) -> Result<Vec<Payment>, AppError> {
        self.repo
            .list_payments(&self.pool, &ctx.scope(), fee_agreement_id)
            .await
    }

    pub async fn get_payment(&self, ctx: &TenantContext, id: Uuid) -> Result<Payment, AppError> {
        self.repo
            .find_payment(&self.pool, &ctx.scope(), id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Baixa do pagamento: `payment_date` informada ou a data de hoje.
    pub async fn mark_payment_received(
        &self,
        actor: &User,
        ctx: &TenantContext,
        id: Uuid,
        payment_date: Option<NaiveDate>,
        client: &ClientInfo,
    ) -> Result<Payment, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ReadRecords)
            .await?;

        let payment_date = payment_date.unwrap_or_else(|| Utc::now().date_naive());

        let scope = ctx.scope();
        let mut tx = self.pool.begin().await?;

        let before = self
            .repo
            .find_payment(&mut *tx, &scope, id)
            .await?
            .ok_or(AppError::NotFound)?;

        let updated = self
            .repo
            .mark_payment_received(&mut *tx, &scope, id, payment_date)
            .await?
            .ok_or(AppError::NotFound)?;

        tx.commit().await?;

        self.audit
            .record_update(
                Some(actor.id),
                Some(org_id),
                ctx.office_id(),
                "Payment",
                updated.id,
                &format!("{} ({})", updated.description, updated.amount),
                &before,
                &updated,
                client,
            )
            .await;

        Ok(updated)
    }

    pub async fn set_payment_status(
        &self,
        actor: &User,
        ctx: &TenantContext,
        id: Uuid,
        status: PaymentStatus,
        client: &ClientInfo,
    ) -> Result<Payment, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ReadRecords)
            .await?;

        let scope = ctx.scope();
        let mut tx = self.pool.begin().await?;

        let before = self
            .repo
            .find_payment(&mut *tx, &scope, id)
            .await?
            .ok_or(AppError::NotFound)?;

        let updated = self
            .repo
            .set_payment_status(&mut *tx, &scope, id, status)
            .await?
            .ok_or(AppError::NotFound)?;

        tx.commit().await?;

        self.audit
            .record_update(
                Some(actor.id),
                Some(org_id),
                ctx.office_id(),
                "Payment",
                updated.id,
                &format!("{} ({})", updated.description, updated.amount),
                &before,
                &updated,
                client,
            )
            .await;

        Ok(updated)
    }
}
