// src/services/customer_service.rs

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CustomerRepository,
    models::{
        audit::AuditAction,
        auth::User,
        customers::{Customer, CustomerType, normalize_document},
    },
    services::{
        audit::{AuditService, ClientInfo},
        authz::{AuthorizationService, Capability},
        scoping::TenantContext,
    },
};

/// Campos editáveis de um cliente. Compartilhado entre create e update.
#[derive(Debug, Clone)]
pub struct CustomerInput {
    pub name: String,
    pub kind: CustomerType,
    pub document: String,
    pub email: String,
    pub phone: String,
    pub phone_secondary: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub notes: String,
}

#[derive(Clone)]
pub struct CustomerService {
    repo: CustomerRepository,
    authz: AuthorizationService,
    audit: AuditService,
    pool: PgPool,
}

impl CustomerService {
    pub fn new(
        repo: CustomerRepository,
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

    fn repr(customer: &Customer) -> String {
        format!("{} ({})", customer.name, customer.document)
    }

    pub async fn create_customer(
        &self,
        actor: &User,
        ctx: &TenantContext,
        office_id: Option<Uuid>,
        input: CustomerInput,
        client: &ClientInfo,
    ) -> Result<Customer, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ManageCustomers)
            .await?;

        // Escritório do contexto, ou o explicitamente informado
        let office_id = ctx
            .office_id()
            .or(office_id)
            .ok_or(AppError::OfficeRequired)?;

        let document = normalize_document(&input.document)?;

        let mut tx = self.pool.begin().await?;
        let customer = self
            .repo
            .create(
                &mut *tx,
                org_id,
                office_id,
                &input.name,
                input.kind,
                &document,
                &input.email,
                &input.phone,
                &input.phone_secondary,
                &input.address,
                &input.city,
                &input.state,
                &input.zip_code,
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
                "Customer",
                Some(customer.id),
                &Self::repr(&customer),
                json!({}),
                client,
            )
            .await;

        Ok(customer)
    }

    pub async fn list_customers(
        &self,
        ctx: &TenantContext,
        search: Option<&str>,
    ) -> Result<Vec<Customer>, AppError> {
        self.repo.list(&self.pool, &ctx.scope(), search).await
    }

    pub async fn get_customer(&self, ctx: &TenantContext, id: Uuid) -> Result<Customer, AppError> {
        self.repo
            .find_by_id(&self.pool, &ctx.scope(), id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn update_customer(
        &self,
        actor: &User,
        ctx: &TenantContext,
        id: Uuid,
        input: CustomerInput,
        client: &ClientInfo,
    ) -> Result<Customer, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ManageCustomers)
            .await?;

        let document = normalize_document(&input.document)?;
        let scope = ctx.scope();

        let mut tx = self.pool.begin().await?;

        // Pré-imagem para o diff de auditoria
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
                &input.name,
                input.kind,
                &document,
                &input.email,
                &input.phone,
                &input.phone_secondary,
                &input.address,
                &input.city,
                &input.state,
                &input.zip_code,
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
                "Customer",
                updated.id,
                &Self::repr(&updated),
                &before,
                &updated,
                client,
            )
            .await;

        Ok(updated)
    }

    pub async fn set_customer_active(
        &self,
        actor: &User,
        ctx: &TenantContext,
        id: Uuid,
        is_active: bool,
        client: &ClientInfo,
    ) -> Result<Customer, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ManageCustomers)
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
            .set_active(&mut *tx, &scope, id, is_active)
            .await?
            .ok_or(AppError::NotFound)?;

        tx.commit().await?;

        self.audit
            .record_update(
                Some(actor.id),
                Some(org_id),
                ctx.office_id(),
                "Customer",
                updated.id,
                &Self::repr(&updated),
                &before,
                &updated,
                client,
            )
            .await;

        Ok(updated)
    }

    pub async fn delete_customer(
        &self,
        actor: &User,
        ctx: &TenantContext,
        id: Uuid,
        client: &ClientInfo,
    ) -> Result<(), AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ManageCustomers)
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
                "Customer",
                Some(before.id),
                &Self::repr(&before),
                json!({}),
                client,
            )
            .await;

        Ok(())
    }
}
