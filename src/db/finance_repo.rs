// src/db/finance_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, scope::TenantScope},
    models::finance::{
        AgreementKind, AgreementStatus, FeeAgreement, Payment, PaymentMethod, PaymentStatus,
    },
};

const AGREEMENT_COLUMNS: &str = "id, organization_id, office_id, customer_id, process_id, \
    title, kind, description, amount, success_percentage, hourly_rate, installments, \
    installment_amount, start_date, end_date, status, notes, created_at, updated_at";

const PAYMENT_COLUMNS: &str = "id, organization_id, office_id, fee_agreement_id, description, \
    amount, due_date, payment_date, method, status, notes, created_at, updated_at";

#[derive(Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CONTRATOS DE HONORÁRIOS
    // =========================================================================

    pub async fn create_agreement<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        office_id: Uuid,
        customer_id: Uuid,
        process_id: Option<Uuid>,
        title: &str,
        kind: AgreementKind,
        description: &str,
        amount: Decimal,
        success_percentage: Option<Decimal>,
        hourly_rate: Option<Decimal>,
        installments: i32,
        installment_amount: Option<Decimal>,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        notes: &str,
    ) -> Result<FeeAgreement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let agreement = sqlx::query_as::<_, FeeAgreement>(&format!(
            r#"
            INSERT INTO fee_agreements (
                organization_id, office_id, customer_id, process_id, title, kind,
                description, amount, success_percentage, hourly_rate, installments,
                installment_amount, start_date, end_date, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {AGREEMENT_COLUMNS}
            "#
        ))
        .bind(organization_id)
        .bind(office_id)
        .bind(customer_id)
        .bind(process_id)
        .bind(title)
        .bind(kind)
        .bind(description)
        .bind(amount)
        .bind(success_percentage)
        .bind(hourly_rate)
        .bind(installments)
        .bind(installment_amount)
        .bind(start_date)
        .bind(end_date)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(agreement)
    }

    pub async fn list_agreements<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
    ) -> Result<Vec<FeeAgreement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(Vec::new());
        };

        let agreements = sqlx::query_as::<_, FeeAgreement>(&format!(
            r#"
            SELECT {AGREEMENT_COLUMNS}
            FROM fee_agreements
            WHERE organization_id = $1
              AND ($2::uuid IS NULL OR office_id = $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(org_id)
        .bind(scope.office_id)
        .fetch_all(executor)
        .await?;

        Ok(agreements)
    }

    pub async fn find_agreement<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        id: Uuid,
    ) -> Result<Option<FeeAgreement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(None);
        };

        let agreement = sqlx::query_as::<_, FeeAgreement>(&format!(
            r#"
            SELECT {AGREEMENT_COLUMNS}
            FROM fee_agreements
            WHERE id = $1
              AND organization_id = $2
              AND ($3::uuid IS NULL OR office_id = $3)
            "#
        ))
        .bind(id)
        .bind(org_id)
        .bind(scope.office_id)
        .fetch_optional(executor)
        .await?;

        Ok(agreement)
    }

    pub async fn set_agreement_status<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        id: Uuid,
        status: AgreementStatus,
    ) -> Result<Option<FeeAgreement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(None);
        };

        let agreement = sqlx::query_as::<_, FeeAgreement>(&format!(
            r#"
            UPDATE fee_agreements
            SET status = $4, updated_at = NOW()
            WHERE id = $1
              AND organization_id = $2
              AND ($3::uuid IS NULL OR office_id = $3)
            RETURNING {AGREEMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(org_id)
        .bind(scope.office_id)
        .bind(status)
        .fetch_optional(executor)
        .await?;

        Ok(agreement)
    }

    pub async fn delete_agreement<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            DELETE FROM fee_agreements
            WHERE id = $1
              AND organization_id = $2
              AND ($3::uuid IS NULL OR office_id = $3)
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(scope.office_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Soma dos pagamentos já recebidos de um contrato.
    pub async fn total_received<'e, E>(
        &self,
        executor: E,
        agreement_id: Uuid,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: Option<Decimal> = sqlx::query_scalar(
            r#"
            SELECT SUM(amount) FROM payments
            WHERE fee_agreement_id = $1 AND status = 'received'
            "#,
        )
        .bind(agreement_id)
        .fetch_one(executor)
        .await?;

        Ok(total.unwrap_or(Decimal::ZERO))
    }

    // =========================================================================
    //  PAGAMENTOS
    // =========================================================================

    pub async fn create_payment<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        office_id: Uuid,
        fee_agreement_id: Uuid,
        description: &str,
        amount: Decimal,
        due_date: NaiveDate,
        method: PaymentMethod,
        notes: &str,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            INSERT INTO payments (
                organization_id, office_id, fee_agreement_id, description,
                amount, due_date, method, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(organization_id)
        .bind(office_id)
        .bind(fee_agreement_id)
        .bind(description)
        .bind(amount)
        .bind(due_date)
        .bind(method)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    pub async fn list_payments<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        fee_agreement_id: Option<Uuid>,
    ) -> Result<Vec<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(Vec::new());
        };

        let payments = sqlx::query_as::<_, Payment>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM payments
            WHERE organization_id = $1
              AND ($2::uuid IS NULL OR office_id = $2)
              AND ($3::uuid IS NULL OR fee_agreement_id = $3)
            ORDER BY due_date ASC
            "#
        ))
        .bind(org_id)
        .bind(scope.office_id)
        .bind(fee_agreement_id)
        .fetch_all(executor)
        .await?;

        Ok(payments)
    }

    pub async fn find_payment<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        id: Uuid,
    ) -> Result<Option<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(None);
        };

        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM payments
            WHERE id = $1
              AND organization_id = $2
              AND ($3::uuid IS NULL OR office_id = $3)
            "#
        ))
        .bind(id)
        .bind(org_id)
        .bind(scope.office_id)
        .fetch_optional(executor)
        .await?;

        Ok(payment)
    }

    /// Marca um pagamento como recebido na data informada (ou hoje).
    pub async fn mark_payment_received<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        id: Uuid,
        payment_date: NaiveDate,
    ) -> Result<Option<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(None);
        };

        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            UPDATE payments
            SET status = 'received', payment_date = $4, updated_at = NOW()
            WHERE id = $1
              AND organization_id = $2
              AND ($3::uuid IS NULL OR office_id = $3)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(org_id)
        .bind(scope.office_id)
        .bind(payment_date)
        .fetch_optional(executor)
        .await?;

        Ok(payment)
    }

    pub async fn set_payment_status<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        id: Uuid,
        status: PaymentStatus,
    ) -> Result<Option<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(None);
        };

        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            UPDATE payments
            SET status = $4, updated_at = NOW()
            WHERE id = $1
              AND organization_id = $2
              AND ($3::uuid IS NULL OR office_id = $3)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(org_id)
        .bind(scope.office_id)
        .bind(status)
        .fetch_optional(executor)
        .await?;

        Ok(payment)
    }
}
