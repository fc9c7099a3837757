// src/services/document_service.rs

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::DocumentRepository,
    models::{
        audit::AuditAction,
        auth::User,
        documents::{Document, DocumentCategory},
    },
    services::{
        audit::{AuditService, ClientInfo},
        authz::{AuthorizationService, Capability, role_can_view_object},
        scoping::TenantContext,
    },
};

#[derive(Clone)]
pub struct DocumentService {
    repo: DocumentRepository,
    authz: AuthorizationService,
    audit: AuditService,
    pool: PgPool,
}

impl DocumentService {
    pub fn new(
        repo: DocumentRepository,
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

    fn can_view_confidential(ctx: &TenantContext) -> bool {
        ctx.membership
            .as_ref()
            .map(|m| role_can_view_object(m.role, true))
            .unwrap_or(false)
    }

    /// Documento confidencial fora do alcance do papel é mascarado como 404.
    async fn load_visible(&self, ctx: &TenantContext, id: Uuid) -> Result<Document, AppError> {
        let document = self
            .repo
            .find_by_id(&self.pool, &ctx.scope(), id)
            .await?
            .ok_or(AppError::NotFound)?;

        if document.is_confidential && !Self::can_view_confidential(ctx) {
            return Err(AppError::NotFound);
        }

        Ok(document)
    }

    pub async fn create_document(
        &self,
        actor: &User,
        ctx: &TenantContext,
        office_id: Option<Uuid>,
        title: &str,
        category: DocumentCategory,
        description: &str,
        file_name: &str,
        file_size: Option<i64>,
        process_id: Option<Uuid>,
        customer_id: Option<Uuid>,
        is_confidential: bool,
        client: &ClientInfo,
    ) -> Result<Document, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ReadRecords)
            .await?;

        let office_id = ctx
            .office_id()
            .or(office_id)
            .ok_or(AppError::OfficeRequired)?;

        let mut tx = self.pool.begin().await?;
        let document = self
            .repo
            .create(
                &mut *tx,
                org_id,
                office_id,
                title,
                category,
                description,
                file_name,
                file_size,
                process_id,
                customer_id,
                actor.id,
                is_confidential,
            )
            .await?;
        tx.commit().await?;

        self.audit
            .record(
                Some(actor.id),
                Some(org_id),
                Some(office_id),
                AuditAction::Create,
                "Document",
                Some(document.id),
                &document.title,
                json!({}),
                client,
            )
            .await;

        Ok(document)
    }

    pub async fn list_documents(&self, ctx: &TenantContext) -> Result<Vec<Document>, AppError> {
        let include_confidential = Self::can_view_confidential(ctx);
        self.repo
            .list(&self.pool, &ctx.scope(), include_confidential)
            .await
    }

    pub async fn get_document(&self, ctx: &TenantContext, id: Uuid) -> Result<Document, AppError> {
        self.load_visible(ctx, id).await
    }

    pub async fn update_document(
        &self,
        actor: &User,
        ctx: &TenantContext,
        id: Uuid,
        title: &str,
        category: DocumentCategory,
        description: &str,
        is_confidential: bool,
        client: &ClientInfo,
    ) -> Result<Document, AppError> {
        let org_id = ctx.organization_id().ok_or(AppError::Forbidden)?;
        self.authz
            .ensure(actor.id, org_id, Capability::ReadRecords)
            .await?;

        let before = self.load_visible(ctx, id).await?;

        let mut tx = self.pool.begin().await?;
        let updated = self
            .repo
            .update(
                &mut *tx,
                &ctx.scope(),
                id,
                title,
                category,
                description,
                is_confidential,
            )
            .await?
            .ok_or(AppError::NotFound)?;
        tx.commit().await?;

        self.audit
            .record_update(
                Some(actor.id),
                Some(org_id),
                ctx.office_id(),
                "Document",
                updated.id,
                &updated.title,
                &before,
                &updated,
                client,
            )
            .await;

        Ok(updated)
    }

    pub async fn delete_document(
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
                "Document",
                Some(before.id),
                &before.title,
                json!({}),
                client,
            )
            .await;

        Ok(())
    }
}
