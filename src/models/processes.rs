// src/models/processes.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "process_area", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProcessArea {
    Civil,
    Criminal,
    Labor,
    Family,
    Tax,
    Administrative,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "process_phase", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProcessPhase {
    Initial,
    Instruction,
    Sentence,
    Appeal,
    Execution,
    Archived,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "party_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Plaintiff,
    Defendant,
    ThirdParty,
    Witness,
    Expert,
    OpposingLawyer,
}

/// Processo judicial. Número CNJ, tribunal, fase, etc.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub office_id: Uuid,

    // Número único do processo (formato CNJ: NNNNNNN-DD.AAAA.J.TR.OOOO)
    pub number: String,
    // Número de controle interno do escritório
    pub internal_number: String,

    pub area: ProcessArea,
    pub subject: String,

    pub court: String,
    pub court_division: String,

    pub phase: ProcessPhase,

    // Valor da causa em R$
    pub value: Option<Decimal>,
    pub distribution_date: Option<NaiveDate>,

    pub notes: String,
    pub is_active: bool,

    // Segredo de justiça: visível apenas para admins e advogados
    pub is_confidential: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Relacionamento entre Process e Customer.
/// Herda o escopo (organização/escritório) transitivamente pelo processo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProcessParty {
    pub id: Uuid,
    pub process_id: Uuid,
    pub customer_id: Uuid,

    pub role: PartyRole,
    pub notes: String,

    pub created_at: DateTime<Utc>,
}
