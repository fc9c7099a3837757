// src/services/deadline_service.rs

use chrono::{NaiveDate, NaiveTime};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::DeadlineRepository,
    models::{
        audit::AuditAction,
        auth::User,
        deadlines::{Deadline, DeadlineKind, DeadlinePriority, DeadlineStatus},
    },
    services::{
        audit::{AuditService, ClientInfo},
        authz::{AuthorizationService, Capability},
        scoping::TenantContext,
    },
};

#[derive(Debug, Clone)]
pub struct DeadlineInput {
    pub title: String,
    pub description: String,
    pub kind: DeadlineKind,
    pub due_date: NaiveDate,
    pub due_time: Option<NaiveTime>,
    pub priority: DeadlinePriority,
    pub responsible_id: Option<Uuid>,
    pub alert_days_before: i32,
    pub notes: String,
}

#[derive(Clone)]
pub struct DeadlineService {
    repo: DeadlineRepository,
    authz: AuthorizationService,
    audit: AuditService,
    pool: PgPool,
}

impl DeadlineService {
    pub fn new(
        repo: DeadlineRepository,
        authz: AuthorizationService,
        audit: AuditService,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            authz,
            audit,
            pool,
        }
    }

    fn repr(deadline: &Deadline) -> String {
        format!("{} ({})", deadline.title, deadline.due_date)
    }

    pub async fn create_deadline(
        &self,
        actor: &User,
        ctx: &TenantContext,
        office_id: Option<Uuid>,
        process_id: Option<Uuid>,
        input: DeadlineInput,
        client: &ClientInfo,
    ) -> Result<Deadline, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ReadRecords)
            .await?;

        let office_id = ctx
            .office_id()
            .or(office_id)
            .ok_or(AppError::OfficeRequired)?;

        let mut tx = self.pool.begin().await?;
        let deadline = self
            .repo
            .create(
                &mut *tx,
                org_id,
                office_id,
                &input.title,
                &input.description,
                input.kind,
                input.due_date,
                input.due_time,
                input.priority,
                input.responsible_id,
                process_id,
                input.alert_days_before,
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
                "Deadline",
                Some(deadline.id),
                &Self::repr(&deadline),
                json!({}),
                client,
            )
            .await;

        Ok(deadline)
    }

    pub async fn list_deadlines(
        &self,
        ctx: &TenantContext,
        status: Option<DeadlineStatus>,
    ) -> Result<Vec<Deadline>, AppError> {
        self.repo.list(&self.pool, &ctx.scope(), status).await
    }

    pub async fn get_deadline(&self, ctx: &TenantContext, id: Uuid) -> Result<Deadline, AppError> {
        self.repo
            .find_by_id(&self.pool, &ctx.scope(), id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn update_deadline(
        &self,
        actor: &User,
        ctx: &TenantContext,
        id: Uuid,
        status: DeadlineStatus,
        input: DeadlineInput,
        client: &ClientInfo,
    ) -> Result<Deadline, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ReadRecords)
            .await?;

        let scope = ctx.scope();
        let mut tx = self.pool.begin().await?;

        let before = self
            .repo
            .find_by_id(&mut *tx, &scope, id)
            .await?
            .ok_or(AppError::NotFound)?;

        let updated = self
            .repo
            .update(
                &mut *tx,
                &scope,
                id,
                &input.title,
                &input.description,
                input.kind,
                input.due_date,
                input.due_time,
                input.priority,
                status,
                input.responsible_id,
                input.alert_days_before,
                &input.notes,
            )
            .await?
            .ok_or(AppError::NotFound)?;

        tx.commit().await?;

        self.audit
            .record_update(
                Some(actor.id),
                Some(org_id),
                ctx.office_id(),
                "Deadline",
                updated.id,
                &Self::repr(&updated),
                &before,
                &updated,
                client,
            )
            .await;

        Ok(updated)
    }

    /// Marca o prazo como cumprido, carimbando `completed_at` no servidor.
    pub async fn complete_deadline(
        &self,
        actor: &User,
        ctx: &TenantContext,
        id: Uuid,
        client: &ClientInfo,
    ) -> Result<Deadline, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ReadRecords)
            .await?;

        let scope = ctx.scope();
        let mut tx = self.pool.begin().await?;

        let before = self
            .repo
            .find_by_id(&mut *tx, &scope, id)
            .await?
            .ok_or(AppError::NotFound)?;

        let completed = self
            .repo
            .mark_completed(&mut *tx, &scope, id)
            .await?
            .ok_or(AppError::NotFound)?;

        tx.commit().await?;

        self.audit
            .record_update(
                Some(actor.id),
                Some(org_id),
                ctx.office_id(),
                "Deadline",
                completed.id,
                &Self::repr(&completed),
                &before,
                &completed,
                client,
            )
            .await;

        Ok(completed)
    }

    pub async fn delete_deadline(
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
            .find_by_id(&mut *tx, &scope, id)
            .await?
            .ok_or(AppError::NotFound)?;

        let deleted = self.repo.delete(&mut *tx, &scope, id).await?;
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
                "Deadline",
                Some(before.id),
                &Self::repr(&before),
                json!({}),
                client,
            )
            .await;

        Ok(())
    }
}
