// src/models/customers.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::common::error::AppError;

// Mapeia o CREATE TYPE customer_type do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "customer_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CustomerType {
    Pf, // Pessoa Física
    Pj, // Pessoa Jurídica
}

/// Cliente do escritório (pessoa física ou jurídica).
/// Pode ser autor, réu ou terceiro em processos.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub office_id: Uuid,

    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: CustomerType,

    // CPF/CNPJ normalizado (só dígitos), único dentro da organização
    pub document: String,

    pub email: String,
    pub phone: String,
    pub phone_secondary: String,

    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,

    pub notes: String,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Documento formatado para exibição (XXX.XXX.XXX-XX ou XX.XXX.XXX/XXXX-XX).
    pub fn document_formatted(&self) -> String {
        format_document(&self.document)
    }
}

/// Remove pontuação e valida tamanho de CPF (11) ou CNPJ (14).
/// Normalização acontece ANTES da persistência; nunca coagimos
/// silenciosamente além disso.
pub fn normalize_document(raw: &str) -> Result<String, AppError> {
    let clean: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if clean.len() != 11 && clean.len() != 14 {
        return Err(AppError::InvalidDocument(
            "CPF deve ter 11 dígitos ou CNPJ 14 dígitos.".to_string(),
        ));
    }

    Ok(clean)
}

pub fn format_document(digits: &str) -> String {
    match digits.len() {
        // CPF: XXX.XXX.XXX-XX
        11 => format!(
            "{}.{}.{}-{}",
            &digits[..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..]
        ),
        // CNPJ: XX.XXX.XXX/XXXX-XX
        14 => format!(
            "{}.{}.{}/{}-{}",
            &digits[..2],
            &digits[2..5],
            &digits[5..8],
            &digits[8..12],
            &digits[12..]
        ),
        _ => digits.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normaliza_cpf_com_pontuacao() {
        assert_eq!(normalize_document("123.456.789-09").unwrap(), "12345678909");
    }

    #[test]
    fn normaliza_cnpj_com_pontuacao() {
        assert_eq!(
            normalize_document("12.345.678/0001-95").unwrap(),
            "12345678000195"
        );
    }

    #[test]
    fn rejeita_tamanho_invalido() {
        assert!(matches!(
            normalize_document("123456"),
            Err(AppError::InvalidDocument(_))
        ));
        assert!(matches!(
            normalize_document(""),
            Err(AppError::InvalidDocument(_))
        ));
    }

    #[test]
    fn formata_cpf_e_cnpj() {
        assert_eq!(format_document("12345678909"), "123.456.789-09");
        assert_eq!(format_document("12345678000195"), "12.345.678/0001-95");
        // Tamanho inesperado passa direto
        assert_eq!(format_document("42"), "42");
    }
}
