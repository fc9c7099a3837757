// src/db/audit_repo.rs

use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::audit::{AuditAction, AuditLog},
};

const AUDIT_COLUMNS: &str = "id, user_id, organization_id, office_id, action, model_name, \
    object_id, object_repr, changes, ip_address, user_agent, timestamp";

/// Persistência do log de auditoria. Só insere e lê: entradas nunca são
/// atualizadas ou apagadas pela aplicação.
#[derive(Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        office_id: Option<Uuid>,
        action: AuditAction,
        model_name: &str,
        object_id: Option<Uuid>,
        object_repr: &str,
        changes: &Value,
        ip_address: Option<&str>,
        user_agent: &str,
    ) -> Result<AuditLog, AppError> {
        let entry = sqlx::query_as::<_, AuditLog>(&format!(
            r#"
            INSERT INTO audit_logs (
                user_id, organization_id, office_id, action, model_name,
                object_id, object_repr, changes, ip_address, user_agent
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {AUDIT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(organization_id)
        .bind(office_id)
        .bind(action)
        .bind(model_name)
        .bind(object_id)
        .bind(object_repr)
        .bind(changes)
        .bind(ip_address)
        .bind(user_agent)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn list_for_organization<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AuditLog>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = sqlx::query_as::<_, AuditLog>(&format!(
            r#"
            SELECT {AUDIT_COLUMNS}
            FROM audit_logs
            WHERE organization_id = $1
            ORDER BY timestamp DESC
            LIMIT $2
            "#
        ))
        .bind(organization_id)
        .bind(limit)
        .fetch_all(executor)
        .await?;

        Ok(entries)
    }
}
