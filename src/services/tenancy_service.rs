// src/services/tenancy_service.rs

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MembershipRepository, TenancyRepository},
    models::{
        audit::AuditAction,
        auth::User,
        customers::normalize_document,
        tenancy::{Membership, Office, Organization, PlanTier, Role},
    },
    services::{
        audit::{AuditService, ClientInfo},
        authz::{AuthorizationService, Capability},
        scoping::TenantContext,
    },
};

#[derive(Clone)]
pub struct TenancyService {
    tenancy_repo: TenancyRepository,
    membership_repo: MembershipRepository,
    authz: AuthorizationService,
    audit: AuditService,
    pool: PgPool,
}

impl TenancyService {
    pub fn new(
        tenancy_repo: TenancyRepository,
        membership_repo: MembershipRepository,
        authz: AuthorizationService,
        audit: AuditService,
        pool: PgPool,
    ) -> Self {
        Self {
            tenancy_repo,
            membership_repo,
            authz,
            audit,
            pool,
        }
    }

    // =========================================================================
    //  ORGANIZAÇÕES
    // =========================================================================

    /// Cria uma organização e, atomicamente, torna o criador o seu
    /// primeiro org_admin (membership sem escritório = todos).
    pub async fn create_organization_with_admin(
        &self,
        actor: &User,
        name: &str,
        document: &str,
        plan: PlanTier,
        client: &ClientInfo,
    ) -> Result<Organization, AppError> {
        let document = normalize_document(document)?;

        let mut tx = self.pool.begin().await?;

        let organization = self
            .tenancy_repo
            .create_organization(&mut *tx, name, &document, plan)
            .await?;

        let membership = self
            .membership_repo
            .create_membership(&mut *tx, actor.id, organization.id, None, Role::OrgAdmin)
            .await?;

        tx.commit().await?;

        self.audit
            .record(
                Some(actor.id),
                Some(organization.id),
                None,
                AuditAction::Create,
                "Organization",
                Some(organization.id),
                &organization.name,
                json!({}),
                client,
            )
            .await;
        self.audit
            .record(
                Some(actor.id),
                Some(organization.id),
                None,
                AuditAction::Create,
                "Membership",
                Some(membership.id),
                &format!("{} - org_admin", actor.email),
                json!({}),
                client,
            )
            .await;

        Ok(organization)
    }

    /// Organizações em que o usuário possui membership ativo.
    pub async fn list_my_organizations(&self, actor: &User) -> Result<Vec<Organization>, AppError> {
        self.tenancy_repo.list_organizations_for_user(actor.id).await
    }

    pub async fn update_organization_settings(
        &self,
        actor: &User,
        ctx: &TenantContext,
        settings: serde_json::Value,
        client: &ClientInfo,
    ) -> Result<Organization, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::AdministerOrganization)
            .await?;

        let mut tx = self.pool.begin().await?;

        let before = self
            .tenancy_repo
            .find_organization(&mut *tx, org_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let updated = self
            .tenancy_repo
            .update_organization_settings(&mut *tx, org_id, &settings)
            .await?
            .ok_or(AppError::NotFound)?;

        tx.commit().await?;

        self.audit
            .record_update(
                Some(actor.id),
                Some(org_id),
                ctx.office_id(),
                "Organization",
                updated.id,
                &updated.name,
                &before,
                &updated,
                client,
            )
            .await;

        Ok(updated)
    }

    // =========================================================================
    //  ESCRITÓRIOS
    // =========================================================================

    pub async fn create_office(
        &self,
        actor: &User,
        ctx: &TenantContext,
        name: &str,
        client: &ClientInfo,
    ) -> Result<Office, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::AdministerOrganization)
            .await?;

        let mut tx = self.pool.begin().await?;
        let office = self.tenancy_repo.create_office(&mut *tx, org_id, name).await?;
        tx.commit().await?;

        self.audit
            .record(
                Some(actor.id),
                Some(org_id),
                Some(office.id),
                AuditAction::Create,
                "Office",
                Some(office.id),
                &office.name,
                json!({}),
                client,
            )
            .await;

        Ok(office)
    }

    pub async fn list_offices(&self, ctx: &TenantContext) -> Result<Vec<Office>, AppError> {
        // Fail-closed: sem organização no contexto, lista vazia
        let Some(org_id) = ctx.organization_id() else {
            return Ok(Vec::new());
        };

        self.tenancy_repo.list_offices(&self.pool, org_id).await
    }

    // =========================================================================
    //  MEMBERSHIPS
    // =========================================================================

    pub async fn create_membership(
        &self,
        actor: &User,
        ctx: &TenantContext,
        user_id: Uuid,
        office_id: Option<Uuid>,
        role: Role,
        client: &ClientInfo,
    ) -> Result<Membership, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::AdministerOrganization)
            .await?;

        // Referência cruzada proibida: o escritório tem que ser da própria
        // organização.
        if let Some(office) = office_id {
            self.tenancy_repo
                .find_office(&self.pool, org_id, office)
                .await?
                .ok_or(AppError::NotFound)?;
        }

        let mut tx = self.pool.begin().await?;
        let membership = self
            .membership_repo
            .create_membership(&mut *tx, user_id, org_id, office_id, role)
            .await?;
        tx.commit().await?;

        self.audit
            .record(
                Some(actor.id),
                Some(org_id),
                office_id,
                AuditAction::Create,
                "Membership",
                Some(membership.id),
                &format!("membership de {}", user_id),
                json!({}),
                client,
            )
            .await;

        Ok(membership)
    }

    pub async fn list_memberships(
        &self,
        actor: &User,
        ctx: &TenantContext,
    ) -> Result<Vec<Membership>, AppError> {
        let Some(org_id) = ctx.organization_id() else {
            return Ok(Vec::new());
        };

        self.authz
            .ensure(actor.id, org_id, Capability::AdministerOffice)
            .await?;

        self.membership_repo
            .list_for_organization(&self.pool, org_id)
            .await
    }

    pub async fn set_membership_active(
        &self,
        actor: &User,
        ctx: &TenantContext,
        membership_id: Uuid,
        is_active: bool,
        client: &ClientInfo,
    ) -> Result<Membership, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::AdministerOrganization)
            .await?;

        let mut tx = self.pool.begin().await?;

        let before = self
            .membership_repo
            .find_by_id(&mut *tx, org_id, membership_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let updated = self
            .membership_repo
            .set_active(&mut *tx, org_id, membership_id, is_active)
            .await?
            .ok_or(AppError::NotFound)?;

        tx.commit().await?;

        self.audit
            .record_update(
                Some(actor.id),
                Some(org_id),
                updated.office_id,
                "Membership",
                updated.id,
                &format!("membership de {}", updated.user_id),
                &before,
                &updated,
                client,
            )
            .await;

        Ok(updated)
    }
}
