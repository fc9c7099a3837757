// src/db/deadline_repo.rs

use chrono::{NaiveDate, NaiveTime};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, scope::TenantScope},
    models::deadlines::{Deadline, DeadlineKind, DeadlinePriority, DeadlineStatus},
};

const DEADLINE_COLUMNS: &str = "id, organization_id, office_id, title, description, kind, \
    due_date, due_time, completed_at, priority, status, responsible_id, process_id, \
    alert_days_before, alert_sent, notes, created_at, updated_at";

#[derive(Clone)]
pub struct DeadlineRepository {
    pool: PgPool,
}

impl DeadlineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        office_id: Uuid,
        title: &str,
        description: &str,
        kind: DeadlineKind,
        due_date: NaiveDate,
        due_time: Option<NaiveTime>,
        priority: DeadlinePriority,
        responsible_id: Option<Uuid>,
        process_id: Option<Uuid>,
        alert_days_before: i32,
        notes: &str,
    ) -> Result<Deadline, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let deadline = sqlx::query_as::<_, Deadline>(&format!(
            r#"
            INSERT INTO deadlines (
                organization_id, office_id, title, description, kind, due_date,
                due_time, priority, responsible_id, process_id, alert_days_before, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {DEADLINE_COLUMNS}
            "#
        ))
        .bind(organization_id)
        .bind(office_id)
        .bind(title)
        .bind(description)
        .bind(kind)
        .bind(due_date)
        .bind(due_time)
        .bind(priority)
        .bind(responsible_id)
        .bind(process_id)
        .bind(alert_days_before)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(deadline)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        status: Option<DeadlineStatus>,
    ) -> Result<Vec<Deadline>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(Vec::new());
        };

        let deadlines = sqlx::query_as::<_, Deadline>(&format!(
            r#"
            SELECT {DEADLINE_COLUMNS}
            FROM deadlines
            WHERE organization_id = $1
              AND ($2::uuid IS NULL OR office_id = $2)
              AND ($3::deadline_status IS NULL OR status = $3)
            ORDER BY due_date ASC, due_time ASC
            "#
        ))
        .bind(org_id)
        .bind(scope.office_id)
        .bind(status)
        .fetch_all(executor)
        .await?;

        Ok(deadlines)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        id: Uuid,
    ) -> Result<Option<Deadline>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(None);
        };

        let deadline = sqlx::query_as::<_, Deadline>(&format!(
            r#"
            SELECT {DEADLINE_COLUMNS}
            FROM deadlines
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

        Ok(deadline)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        id: Uuid,
        title: &str,
        description: &str,
        kind: DeadlineKind,
        due_date: NaiveDate,
        due_time: Option<NaiveTime>,
        priority: DeadlinePriority,
        status: DeadlineStatus,
        responsible_id: Option<Uuid>,
        alert_days_before: i32,
        notes: &str,
    ) -> Result<Option<Deadline>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(None);
        };

        let deadline = sqlx::query_as::<_, Deadline>(&format!(
            r#"
            UPDATE deadlines
            SET title = $4, description = $5, kind = $6, due_date = $7, due_time = $8,
                priority = $9, status = $10, responsible_id = $11,
                alert_days_before = $12, notes = $13, updated_at = NOW()
            WHERE id = $1
              AND organization_id = $2
              AND ($3::uuid IS NULL OR office_id = $3)
            RETURNING {DEADLINE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(org_id)
        .bind(scope.office_id)
        .bind(title)
        .bind(description)
        .bind(kind)
        .bind(due_date)
        .bind(due_time)
        .bind(priority)
        .bind(status)
        .bind(responsible_id)
        .bind(alert_days_before)
        .bind(notes)
        .fetch_optional(executor)
        .await?;

        Ok(deadline)
    }

    /// Marca como concluído, registrando o instante da conclusão.
    pub async fn mark_completed<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        id: Uuid,
    ) -> Result<Option<Deadline>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(None);
        };

        let deadline = sqlx::query_as::<_, Deadline>(&format!(
            r#"
            UPDATE deadlines
            SET status = 'completed', completed_at = NOW(), updated_at = NOW()
            WHERE id = $1
              AND organization_id = $2
              AND ($3::uuid IS NULL OR office_id = $3)
            RETURNING {DEADLINE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(org_id)
        .bind(scope.office_id)
        .fetch_optional(executor)
        .await?;

        Ok(deadline)
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
            DELETE FROM deadlines
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
