// src/services/process_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, ProcessRepository},
    models::{
        audit::AuditAction,
        auth::User,
        processes::{PartyRole, Process, ProcessArea, ProcessParty, ProcessPhase},
    },
    services::{
        audit::{AuditService, ClientInfo},
        authz::{AuthorizationService, Capability, role_can_view_object},
        scoping::TenantContext,
    },
};

#[derive(Debug, Clone)]
pub struct ProcessInput {
    pub internal_number: String,
    pub area: ProcessArea,
    pub subject: String,
    pub court: String,
    pub court_division: String,
    pub value: Option<Decimal>,
    pub distribution_date: Option<NaiveDate>,
    pub notes: String,
    pub is_confidential: bool,
}

#[derive(Clone)]
pub struct ProcessService {
    repo: ProcessRepository,
    customer_repo: CustomerRepository,
    authz: AuthorizationService,
    audit: AuditService,
    pool: PgPool,
}

impl ProcessService {
    pub fn new(
        repo: ProcessRepository,
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

    fn repr(process: &Process) -> String {
        format!("{} ({})", process.number, process.subject)
    }

    /// O papel do vínculo ativo decide se processos em segredo de justiça
    /// são visíveis. Sem vínculo, nada confidencial aparece.
    fn can_view_confidential(ctx: &TenantContext) -> bool {
        ctx.membership
            .as_ref()
            .map(|m| role_can_view_object(m.role, true))
            .unwrap_or(false)
    }

    /// Carrega um processo aplicando a regra de confidencialidade: um
    /// processo sigiloso fora do alcance do papel responde 404, nunca 403,
    /// para não revelar que o número existe.
    async fn load_visible(
        &self,
        ctx: &TenantContext,
        id: Uuid,
    ) -> Result<Process, AppError> {
        let process = self
            .repo
            .find_by_id(&self.pool, &ctx.scope(), id)
            .await?
            .ok_or(AppError::NotFound)?;

        if process.is_confidential && !Self::can_view_confidential(ctx) {
            return Err(AppError::NotFound);
        }

        Ok(process)
    }

    pub async fn create_process(
        &self,
        actor: &User,
        ctx: &TenantContext,
        office_id: Option<Uuid>,
        number: &str,
        input: ProcessInput,
        client: &ClientInfo,
    ) -> Result<Process, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ManageProcesses)
            .await?;

        let office_id = ctx
            .office_id()
            .or(office_id)
            .ok_or(AppError::OfficeRequired)?;

        let mut tx = self.pool.begin().await?;
        let process = self
            .repo
            .create(
                &mut *tx,
                org_id,
                office_id,
                number,
                &input.internal_number,
                input.area,
                &input.subject,
                &input.court,
                &input.court_division,
                input.value,
                input.distribution_date,
                &input.notes,
                input.is_confidential,
            )
            .await?;
        tx.commit().await?;

        self.audit
            .record(
                Some(actor.id),
                Some(org_id),
                Some(office_id),
                AuditAction::Create,
                "Process",
                Some(process.id),
                &Self::repr(&process),
                json!({}),
                client,
            )
            .await;

        Ok(process)
    }

    pub async fn list_processes(&self, ctx: &TenantContext) -> Result<Vec<Process>, AppError> {
        let include_confidential = Self::can_view_confidential(ctx);
        self.repo
            .list(&self.pool, &ctx.scope(), include_confidential)
            .await
    }

    pub async fn get_process(&self, ctx: &TenantContext, id: Uuid) -> Result<Process, AppError> {
        self.load_visible(ctx, id).await
    }

    pub async fn update_process(
        &self,
        actor: &User,
        ctx: &TenantContext,
        id: Uuid,
        phase: ProcessPhase,
        is_active: bool,
        input: ProcessInput,
        client: &ClientInfo,
    ) -> Result<Process, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ManageProcesses)
            .await?;

        let before = self.load_visible(ctx, id).await?;

        let mut tx = self.pool.begin().await?;
        let updated = self
            .repo
            .update(
                &mut *tx,
                &ctx.scope(),
                id,
                &input.internal_number,
                input.area,
                &input.subject,
                &input.court,
                &input.court_division,
                phase,
                input.value,
                input.distribution_date,
                &input.notes,
                is_active,
                input.is_confidential,
            )
            .await?
            .ok_or(AppError::NotFound)?;
        tx.commit().await?;

        self.audit
            .record_update(
                Some(actor.id),
                Some(org_id),
                ctx.office_id(),
                "Process",
                updated.id,
                &Self::repr(&updated),
                &before,
                &updated,
                client,
            )
            .await;

        Ok(updated)
    }

    pub async fn delete_process(
        &self,
        actor: &User,
        ctx: &TenantContext,
        id: Uuid,
        client: &ClientInfo,
    ) -> Result<(), AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ManageProcesses)
            .await?;

        let before = self.load_visible(ctx, id).await?;

        let mut tx = self.pool.begin().await?;
        let deleted = self.repo.delete(&mut *tx, &ctx.scope(), id).await?;
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
                "Process",
                Some(before.id),
                &Self::repr(&before),
                json!({}),
                client,
            )
            .await;

        Ok(())
    }

    // =========================================================================
    //  PARTES DO PROCESSO
    // =========================================================================

    pub async fn add_party(
        &self,
        actor: &User,
        ctx: &TenantContext,
        process_id: Uuid,
        customer_id: Uuid,
        role: PartyRole,
        notes: &str,
        client: &ClientInfo,
    ) -> Result<ProcessParty, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ManageProcesses)
            .await?;

        let process = self.load_visible(ctx, process_id).await?;

        // O cliente referenciado precisa estar no mesmo escopo; referência
        // a cliente de outro tenant é tratada como inexistente.
        let customer = self
            .customer_repo
            .find_by_id(&self.pool, &ctx.scope(), customer_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut tx = self.pool.begin().await?;
        let party = self
            .repo
            .add_party(&mut *tx, process.id, customer.id, role, notes)
            .await?;
        tx.commit().await?;

        self.audit
            .record(
                Some(actor.id),
                Some(org_id),
                ctx.office_id(),
                AuditAction::Create,
                "ProcessParty",
                Some(party.id),
                &format!("{} em {}", customer.name, process.number),
                json!({}),
                client,
            )
            .await;

        Ok(party)
    }

    pub async fn list_parties(
        &self,
        ctx: &TenantContext,
        process_id: Uuid,
    ) -> Result<Vec<ProcessParty>, AppError> {
        let process = self.load_visible(ctx, process_id).await?;
        self.repo.list_parties(&self.pool, process.id).await
    }

    pub async fn remove_party(
        &self,
        actor: &User,
        ctx: &TenantContext,
        process_id: Uuid,
        party_id: Uuid,
        client: &ClientInfo,
    ) -> Result<(), AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ManageProcesses)
            .await?;

        let process = self.load_visible(ctx, process_id).await?;

        let party = self
            .repo
            .find_party(&self.pool, process.id, party_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut tx = self.pool.begin().await?;
        let removed = self.repo.remove_party(&mut *tx, process.id, party.id).await?;
        if !removed {
            return Err(AppError::NotFound);
        }
        tx.commit().await?;

        self.audit
            .record(
                Some(actor.id),
                Some(org_id),
                ctx.office_id(),
                AuditAction::Delete,
                "ProcessParty",
                Some(party.id),
                &format!("Parte removida de {}", process.number),
                json!({}),
                client,
            )
            .await;

        Ok(())
    }
}
