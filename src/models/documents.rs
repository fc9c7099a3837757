// src/models/documents.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "document_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Petition,
    Contract,
    Decision,
    Proof,
    Correspondence,
    Invoice,
    Receipt,
    Procuration,
    Report,
    Other,
}

/// Documento do escritório. O armazenamento do arquivo em si fica a cargo
/// de um colaborador externo; aqui persistimos apenas os metadados.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub office_id: Uuid,

    pub title: String,
    pub category: DocumentCategory,
    pub description: String,

    pub file_name: String,
    pub file_size: Option<i64>,

    // Vinculação opcional a processo e/ou cliente
    pub process_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,

    pub uploaded_by: Option<Uuid>,

    // Visível apenas para admins e advogados
    pub is_confidential: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
