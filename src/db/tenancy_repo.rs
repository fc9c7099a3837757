// src/db/tenancy_repo.rs

use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{AppError, map_unique_violation},
    models::tenancy::{Office, Organization, PlanTier},
};

const ORGANIZATION_COLUMNS: &str =
    "id, name, document, plan, is_active, settings, created_at, updated_at";
const OFFICE_COLUMNS: &str =
    "id, organization_id, name, is_active, settings, created_at, updated_at";

#[derive(Clone)]
pub struct TenancyRepository {
    pool: PgPool,
}

impl TenancyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  ORGANIZAÇÕES
    // =========================================================================

    pub async fn create_organization<'e, E>(
        &self,
        executor: E,
        name: &str,
        document: &str,
        plan: PlanTier,
    ) -> Result<Organization, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let org = sqlx::query_as::<_, Organization>(&format!(
            r#"
            INSERT INTO organizations (name, document, plan)
            VALUES ($1, $2, $3)
            RETURNING {ORGANIZATION_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(document)
        .bind(plan)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            map_unique_violation(e, format!("O documento '{}' já está cadastrado.", document))
        })?;

        Ok(org)
    }

    pub async fn find_organization<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Organization>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let org = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(org)
    }

    /// Organizações onde o usuário possui membership ativo.
    pub async fn list_organizations_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Organization>, AppError> {
        let orgs = sqlx::query_as::<_, Organization>(
            r#"
            SELECT DISTINCT o.id, o.name, o.document, o.plan, o.is_active,
                   o.settings, o.created_at, o.updated_at
            FROM organizations o
            INNER JOIN memberships m ON m.organization_id = o.id
            WHERE m.user_id = $1 AND m.is_active = TRUE
            ORDER BY o.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orgs)
    }

    pub async fn update_organization_settings<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        settings: &Value,
    ) -> Result<Option<Organization>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let org = sqlx::query_as::<_, Organization>(&format!(
            r#"
            UPDATE organizations
            SET settings = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {ORGANIZATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(settings)
        .fetch_optional(executor)
        .await?;

        Ok(org)
    }

    // =========================================================================
    //  ESCRITÓRIOS
    // =========================================================================

    pub async fn create_office<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        name: &str,
    ) -> Result<Office, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let office = sqlx::query_as::<_, Office>(&format!(
            r#"
            INSERT INTO offices (organization_id, name)
            VALUES ($1, $2)
            RETURNING {OFFICE_COLUMNS}
            "#
        ))
        .bind(organization_id)
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                format!("Já existe um escritório '{}' nesta organização.", name),
            )
        })?;

        Ok(office)
    }

    pub async fn list_offices<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
    ) -> Result<Vec<Office>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let offices = sqlx::query_as::<_, Office>(&format!(
            "SELECT {OFFICE_COLUMNS} FROM offices
             WHERE organization_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(organization_id)
        .fetch_all(executor)
        .await?;

        Ok(offices)
    }

    pub async fn find_office<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Office>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let office = sqlx::query_as::<_, Office>(&format!(
            "SELECT {OFFICE_COLUMNS} FROM offices
             WHERE id = $1 AND organization_id = $2"
        ))
        .bind(id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;

        Ok(office)
    }
}
