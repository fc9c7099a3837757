// src/db/document_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, scope::TenantScope},
    models::documents::{Document, DocumentCategory},
};

const DOCUMENT_COLUMNS: &str = "id, organization_id, office_id, title, category, description, \
    file_name, file_size, process_id, customer_id, uploaded_by, is_confidential, \
    created_at, updated_at";

#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        office_id: Uuid,
        title: &str,
        category: DocumentCategory,
        description: &str,
        file_name: &str,
        file_size: Option<i64>,
        process_id: Option<Uuid>,
        customer_id: Option<Uuid>,
        uploaded_by: Uuid,
        is_confidential: bool,
    ) -> Result<Document, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let document = sqlx::query_as::<_, Document>(&format!(
            r#"
            INSERT INTO documents (
                organization_id, office_id, title, category, description, file_name,
                file_size, process_id, customer_id, uploaded_by, is_confidential
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(organization_id)
        .bind(office_id)
        .bind(title)
        .bind(category)
        .bind(description)
        .bind(file_name)
        .bind(file_size)
        .bind(process_id)
        .bind(customer_id)
        .bind(uploaded_by)
        .bind(is_confidential)
        .fetch_one(executor)
        .await?;

        Ok(document)
    }

    /// Lista documentos do escopo; `include_confidential` falso
    /// omite os confidenciais.
    pub async fn list<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        include_confidential: bool,
    ) -> Result<Vec<Document>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(Vec::new());
        };

        let documents = sqlx::query_as::<_, Document>(&format!(
            r#"
            SELECT {DOCUMENT_COLUMNS}
            FROM documents
            WHERE organization_id = $1
              AND ($2::uuid IS NULL OR office_id = $2)
              AND ($3 OR is_confidential = FALSE)
            ORDER BY created_at DESC
            "#
        ))
        .bind(org_id)
        .bind(scope.office_id)
        .bind(include_confidential)
        .fetch_all(executor)
        .await?;

        Ok(documents)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        id: Uuid,
    ) -> Result<Option<Document>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(None);
        };

        let document = sqlx::query_as::<_, Document>(&format!(
            r#"
            SELECT {DOCUMENT_COLUMNS}
            FROM documents
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

        Ok(document)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        id: Uuid,
        title: &str,
        category: DocumentCategory,
        description: &str,
        is_confidential: bool,
    ) -> Result<Option<Document>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(None);
        };

        let document = sqlx::query_as::<_, Document>(&format!(
            r#"
            UPDATE documents
            SET title = $4, category = $5, description = $6, is_confidential = $7,
                updated_at = NOW()
            WHERE id = $1
              AND organization_id = $2
              AND ($3::uuid IS NULL OR office_id = $3)
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(org_id)
        .bind(scope.office_id)
        .bind(title)
        .bind(category)
        .bind(description)
        .bind(is_confidential)
        .fetch_optional(executor)
        .await?;

        Ok(document)
    }

    pub async fn delete<'e, E>(
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
            DELETE FROM documents
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
}
