// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

// --- ENUMS ---

// Mapeia o CREATE TYPE organization_plan do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "organization_plan", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    Free,
    Basic,
    Premium,
    Enterprise,
}

// Papel de um usuário dentro de uma organização/escritório.
// Mapeia o CREATE TYPE membership_role do banco.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "membership_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    OrgAdmin,
    OfficeAdmin,
    Lawyer,
    Intern,
    Accountant,
    Finance,
    Guest,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::OrgAdmin,
        Role::OfficeAdmin,
        Role::Lawyer,
        Role::Intern,
        Role::Accountant,
        Role::Finance,
        Role::Guest,
    ];
}

// --- ENTIDADES ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    pub name: String,

    // CNPJ ou CPF, apenas dígitos (único no sistema)
    pub document: String,

    pub plan: PlanTier,
    pub is_active: bool,

    // Configurações flexíveis (JSONB)
    pub settings: Value,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Office {
    pub id: Uuid,
    pub organization_id: Uuid,

    // Único dentro da organização
    pub name: String,

    pub is_active: bool,
    pub settings: Value,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Vínculo entre User, Organization, Office e Role.
/// `office_id` nulo significa "todos os escritórios da organização".
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub office_id: Option<Uuid>,

    pub role: Role,
    pub is_active: bool,
    pub settings: Value,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
