// src/services/audit.rs

use serde::Serialize;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AuditRepository,
    models::audit::{AuditAction, AuditLog},
    services::{
        authz::{AuthorizationService, Capability},
        scoping::TenantContext,
    },
};

/// Tipos auditados. Mutations de qualquer outro tipo não geram registro.
pub const AUDITED_MODELS: &[&str] = &[
    "Customer",
    "Process",
    "ProcessParty",
    "Deadline",
    "Document",
    "FeeAgreement",
    "Payment",
    "Organization",
    "Office",
    "Membership",
];

// Campos de "contabilidade" ignorados no diff (nomes já serializados)
const SKIPPED_FIELDS: &[&str] = &["id", "createdAt", "updatedAt"];

/// Metadados do cliente HTTP, capturados pelo middleware e repassados ao
/// registro de auditoria.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: String,
}

fn stringify(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::String(s) => Value::String(s.clone()),
        other => Value::String(other.to_string()),
    }
}

/// Diff campo a campo entre a versão pré e pós-mutação (já serializadas).
/// Cada campo alterado vira uma entrada { "old": ..., "new": ... };
/// campos inalterados e de contabilidade são omitidos.
pub fn diff_changes(before: &Value, after: &Value) -> Value {
    let empty = Map::new();
    let old_map = before.as_object().unwrap_or(&empty);
    let new_map = after.as_object().unwrap_or(&empty);

    let mut changes = Map::new();

    let mut keys: Vec<&String> = old_map.keys().chain(new_map.keys()).collect();
    keys.sort();
    keys.dedup();

    for key in keys {
        if SKIPPED_FIELDS.contains(&key.as_str()) {
            continue;
        }

        let old_value = old_map.get(key).unwrap_or(&Value::Null);
        let new_value = new_map.get(key).unwrap_or(&Value::Null);

        if old_value != new_value {
            changes.insert(
                key.clone(),
                json!({ "old": stringify(old_value), "new": stringify(new_value) }),
            );
        }
    }

    Value::Object(changes)
}

/// Audit Recorder: chamado explicitamente na fronteira transacional de cada
/// operação mutante (em vez do antigo hook global "qualquer save").
///
/// Gravação é best-effort: falha aqui é logada e engolida, nunca aborta nem
/// desfaz a mutação primária (que já comitou na própria transação).
#[derive(Clone)]
pub struct AuditService {
    repo: AuditRepository,
    authz: AuthorizationService,
}

impl AuditService {
    pub fn new(repo: AuditRepository, authz: AuthorizationService) -> Self {
        Self { repo, authz }
    }

    /// Registra uma ação auditada. No-op quando:
    /// - o tipo não está na lista de auditados (ou é o próprio AuditLog);
    /// - não há usuário agindo (operações anônimas/background);
    /// - nenhuma organização pôde ser determinada.
    pub async fn record(
        &self,
        actor: Option<Uuid>,
        organization_id: Option<Uuid>,
        office_id: Option<Uuid>,
        action: AuditAction,
        model_name: &str,
        object_id: Option<Uuid>,
        object_repr: &str,
        changes: Value,
        client: &ClientInfo,
    ) {
        if model_name == "AuditLog" || !AUDITED_MODELS.contains(&model_name) {
            return;
        }

        let Some(user_id) = actor else {
            return;
        };

        let Some(org_id) = organization_id else {
            return;
        };

        if let Err(e) = self
            .repo
            .insert(
                user_id,
                org_id,
                office_id,
                action,
                model_name,
                object_id,
                object_repr,
                &changes,
                client.ip_address.as_deref(),
                &client.user_agent,
            )
            .await
        {
            tracing::warn!("Falha ao gravar audit log de {}: {}", model_name, e);
        }
    }

    /// Atalho para update: serializa as duas versões e calcula o diff.
    pub async fn record_update<T: Serialize>(
        &self,
        actor: Option<Uuid>,
        organization_id: Option<Uuid>,
        office_id: Option<Uuid>,
        model_name: &str,
        object_id: Uuid,
        object_repr: &str,
        before: &T,
        after: &T,
        client: &ClientInfo,
    ) {
        let old = serde_json::to_value(before).unwrap_or(Value::Null);
        let new = serde_json::to_value(after).unwrap_or(Value::Null);
        let changes = diff_changes(&old, &new);

        self.record(
            actor,
            organization_id,
            office_id,
            AuditAction::Update,
            model_name,
            Some(object_id),
            object_repr,
            changes,
            client,
        )
        .await;
    }

    /// Consulta do log: restrita a quem administra a organização.
    pub async fn list_for_organization(
        &self,
        actor_id: Uuid,
        ctx: &TenantContext,
        limit: i64,
        pool: &sqlx::PgPool,
    ) -> Result<Vec<AuditLog>, AppError> {
        let Some(org_id) = ctx.organization_id() else {
            return Err(AppError::Forbidden);
        };

        self.authz
            .ensure(actor_id, org_id, Capability::AdministerOrganization)
            .await?;

        self.repo.list_for_organization(pool, org_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_com_um_unico_campo_alterado() {
        let before = json!({
            "id": "abc",
            "name": "Maria da Silva",
            "phone": "11999990000",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z",
        });
        let after = json!({
            "id": "abc",
            "name": "Maria da Silva",
            "phone": "11988887777",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-02-01T12:00:00Z",
        });

        let changes = diff_changes(&before, &after);
        let map = changes.as_object().unwrap();

        // Exatamente o campo "phone", com old/new corretos; updatedAt é
        // contabilidade e fica de fora.
        assert_eq!(map.len(), 1);
        assert_eq!(map["phone"]["old"], "11999990000");
        assert_eq!(map["phone"]["new"], "11988887777");
    }

    #[test]
    fn diff_sem_alteracoes_e_vazio() {
        let v = json!({ "id": "x", "name": "Org", "updatedAt": "2025-03-01T00:00:00Z" });
        let changes = diff_changes(&v, &v);
        assert!(changes.as_object().unwrap().is_empty());
    }

    #[test]
    fn diff_estringifica_valores_nao_textuais() {
        let before = json!({ "isActive": true, "value": 1500.5 });
        let after = json!({ "isActive": false, "value": null });

        let changes = diff_changes(&before, &after);
        assert_eq!(changes["isActive"]["old"], "true");
        assert_eq!(changes["isActive"]["new"], "false");
        assert_eq!(changes["value"]["old"], "1500.5");
        assert_eq!(changes["value"]["new"], Value::Null);
    }

    #[test]
    fn modelos_fora_da_lista_nao_sao_auditados() {
        assert!(!AUDITED_MODELS.contains(&"AuditLog"));
        assert!(!AUDITED_MODELS.contains(&"User"));
        assert!(AUDITED_MODELS.contains(&"Customer"));
        assert!(AUDITED_MODELS.contains(&"Payment"));
    }
}
