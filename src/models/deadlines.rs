// src/models/deadlines.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "deadline_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeadlineKind {
    Legal,
    Hearing,
    Meeting,
    Task,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "deadline_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeadlinePriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "deadline_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
    Overdue,
}

/// Prazo ou compromisso. Pode estar vinculado a um processo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Deadline {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub office_id: Uuid,

    pub title: String,
    pub description: String,
    pub kind: DeadlineKind,

    pub due_date: NaiveDate,
    pub due_time: Option<NaiveTime>,
    pub completed_at: Option<DateTime<Utc>>,

    pub priority: DeadlinePriority,
    pub status: DeadlineStatus,

    pub responsible_id: Option<Uuid>,
    pub process_id: Option<Uuid>,

    pub alert_days_before: i32,
    pub alert_sent: bool,

    pub notes: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deadline {
    /// Prazo vencido: a data limite já passou e ele ainda está em aberto.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        if matches!(self.status, DeadlineStatus::Completed | DeadlineStatus::Cancelled) {
            return false;
        }
        today > self.due_date
    }

    /// Dias restantes até o vencimento (None se concluído/cancelado).
    pub fn days_remaining(&self, today: NaiveDate) -> Option<i64> {
        if matches!(self.status, DeadlineStatus::Completed | DeadlineStatus::Cancelled) {
            return None;
        }
        Some((self.due_date - today).num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deadline(status: DeadlineStatus, due: NaiveDate) -> Deadline {
        Deadline {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            office_id: Uuid::new_v4(),
            title: "Contestação".to_string(),
            description: String::new(),
            kind: DeadlineKind::Legal,
            due_date: due,
            due_time: None,
            completed_at: None,
            priority: DeadlinePriority::High,
            status,
            responsible_id: None,
            process_id: None,
            alert_days_before: 3,
            alert_sent: false,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn prazo_vencido_apenas_quando_em_aberto() {
        let due = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        assert!(deadline(DeadlineStatus::Pending, due).is_overdue(today));
        assert!(!deadline(DeadlineStatus::Completed, due).is_overdue(today));
        assert!(!deadline(DeadlineStatus::Cancelled, due).is_overdue(today));
    }

    #[test]
    fn dias_restantes() {
        let due = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        assert_eq!(deadline(DeadlineStatus::Pending, due).days_remaining(today), Some(5));
        assert_eq!(deadline(DeadlineStatus::Completed, due).days_remaining(today), None);
    }
}
