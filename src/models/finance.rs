// src/models/finance.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "agreement_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AgreementKind {
    Fixed,
    Hourly,
    Success,
    Monthly,
    Percentage,
    Hybrid,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "agreement_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AgreementStatus {
    Draft,
    Active,
    Suspended,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Debit,
    Credit,
    Pix,
    BankTransfer,
    Check,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Received,
    Cancelled,
    Refunded,
}

/// Contrato de honorários com cliente.
/// Define como e quanto o cliente vai pagar.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeeAgreement {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub office_id: Uuid,

    pub customer_id: Uuid,
    pub process_id: Option<Uuid>,

    pub title: String,
    pub kind: AgreementKind,
    pub description: String,

    // Valor do honorário em R$
    pub amount: Decimal,
    pub success_percentage: Option<Decimal>,
    pub hourly_rate: Option<Decimal>,

    pub installments: i32,
    // Calculado automaticamente: amount / installments
    pub installment_amount: Option<Decimal>,

    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,

    pub status: AgreementStatus,
    pub notes: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FeeAgreement {
    pub fn total_pending(&self, total_received: Decimal) -> Decimal {
        self.amount - total_received
    }

    /// Percentual recebido do contrato. Sempre numérico: zero quando o
    /// valor do contrato é zero.
    pub fn percentage_received(&self, total_received: Decimal) -> Decimal {
        if self.amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (total_received / self.amount) * Decimal::from(100)
    }

    pub fn is_fully_paid(&self, total_received: Decimal) -> bool {
        total_received >= self.amount
    }
}

/// Valor de cada parcela, com 2 casas decimais.
pub fn installment_amount(amount: Decimal, installments: i32) -> Option<Decimal> {
    if installments <= 0 {
        return None;
    }
    Some((amount / Decimal::from(installments)).round_dp(2))
}

/// Registro de pagamento de honorários.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub office_id: Uuid,

    pub fee_agreement_id: Uuid,

    // Ex: "Parcela 1/12", "Honorário Inicial"
    pub description: String,
    pub amount: Decimal,

    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,

    pub method: PaymentMethod,
    pub status: PaymentStatus,

    pub notes: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        if matches!(
            self.status,
            PaymentStatus::Received | PaymentStatus::Cancelled | PaymentStatus::Refunded
        ) {
            return false;
        }
        today > self.due_date
    }

    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        if !self.is_overdue(today) {
            return 0;
        }
        (today - self.due_date).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::*;

    fn agreement(amount: Decimal) -> FeeAgreement {
        FeeAgreement {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            office_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            process_id: None,
            title: "Honorários".to_string(),
            kind: AgreementKind::Fixed,
            description: String::new(),
            amount,
            success_percentage: None,
            hourly_rate: None,
            installments: 1,
            installment_amount: None,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: None,
            status: AgreementStatus::Active,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn percentual_recebido_e_sempre_numerico() {
        // Contrato com valor zero: zero, nunca um sentinela booleano
        let zero = agreement(Decimal::ZERO);
        assert_eq!(zero.percentage_received(Decimal::ZERO), Decimal::ZERO);

        let ag = agreement(Decimal::from(1000));
        assert_eq!(ag.percentage_received(Decimal::from(250)), Decimal::from(25));
        assert_eq!(ag.percentage_received(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn valor_da_parcela() {
        assert_eq!(
            installment_amount(Decimal::from(1000), 3),
            Some(Decimal::from_str("333.33").unwrap())
        );
        assert_eq!(installment_amount(Decimal::from(1000), 0), None);
    }

    #[test]
    fn pagamento_recebido_nunca_esta_atrasado() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let mut payment = Payment {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            office_id: Uuid::new_v4(),
            fee_agreement_id: Uuid::new_v4(),
            description: "Parcela 1/3".to_string(),
            amount: Decimal::from(500),
            due_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            payment_date: None,
            method: PaymentMethod::Pix,
            status: PaymentStatus::Pending,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(payment.is_overdue(today));
        assert_eq!(payment.days_overdue(today), 17);

        payment.status = PaymentStatus::Received;
        assert!(!payment.is_overdue(today));
        assert_eq!(payment.days_overdue(today), 0);
    }
}
