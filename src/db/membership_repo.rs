// src/db/membership_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{AppError, map_unique_violation},
    models::tenancy::{Membership, Role},
};

const MEMBERSHIP_COLUMNS: &str = "id, user_id, organization_id, office_id, role, is_active, \
                                  settings, created_at, updated_at";

/// Fonte única da verdade sobre "quem pode agir como quê, e onde".
#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_membership<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        organization_id: Uuid,
        office_id: Option<Uuid>,
        role: Role,
    ) -> Result<Membership, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let membership = sqlx::query_as::<_, Membership>(&format!(
            r#"
            INSERT INTO memberships (user_id, organization_id, office_id, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {MEMBERSHIP_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(organization_id)
        .bind(office_id)
        .bind(role)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                "Este usuário já possui membership para esta organização/escritório.",
            )
        })?;

        Ok(membership)
    }

    /// Primeiro membership ativo do usuário, com desempate determinístico
    /// pelo mais recente. É a base do Scoping Resolver.
    pub async fn find_first_active_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Membership>, AppError> {
        let membership = sqlx::query_as::<_, Membership>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM memberships
             WHERE user_id = $1 AND is_active = TRUE
             ORDER BY created_at DESC
             LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }

    /// Existe membership ativo de `user_id` em `organization_id` com papel
    /// dentro do conjunto permitido? Ausência => negação.
    pub async fn has_active_role(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        allowed_roles: &[Role],
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM memberships
                WHERE user_id = $1
                  AND organization_id = $2
                  AND role = ANY($3)
                  AND is_active = TRUE
            )
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .bind(allowed_roles)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn list_for_organization<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
    ) -> Result<Vec<Membership>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let memberships = sqlx::query_as::<_, Membership>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM memberships
             WHERE organization_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(organization_id)
        .fetch_all(executor)
        .await?;

        Ok(memberships)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Membership>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let membership = sqlx::query_as::<_, Membership>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM memberships
             WHERE id = $1 AND organization_id = $2"
        ))
        .bind(id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;

        Ok(membership)
    }

    pub async fn set_active<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<Membership>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let membership = sqlx::query_as::<_, Membership>(&format!(
            r#"
            UPDATE memberships
            SET is_active = $3, updated_at = NOW()
            WHERE id = $1 AND organization_id = $2
            RETURNING {MEMBERSHIP_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(organization_id)
        .bind(is_active)
        .fetch_optional(executor)
        .await?;

        Ok(membership)
    }
}
