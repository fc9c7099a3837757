// src/models/audit.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "audit_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    View,
    Download,
    Login,
    Logout,
}

/// Registro imutável de auditoria: quem fez o quê, onde e quando.
/// Criado somente pelo AuditService; nunca atualizado nem deletado
/// pela aplicação.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: Uuid,

    // Quem (nulo se o usuário foi removido depois)
    pub user_id: Option<Uuid>,

    // Onde
    pub organization_id: Uuid,
    pub office_id: Option<Uuid>,

    // O quê
    pub action: AuditAction,
    pub model_name: String,
    pub object_id: Option<Uuid>,
    pub object_repr: String,

    // Detalhes: { "campo": { "old": ..., "new": ... } }
    pub changes: Value,

    pub ip_address: Option<String>,
    pub user_agent: String,

    pub timestamp: DateTime<Utc>,
}
