// src/db/process_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        error::{AppError, map_unique_violation},
        scope::TenantScope,
    },
    models::processes::{PartyRole, Process, ProcessArea, ProcessParty, ProcessPhase},
};

const PROCESS_COLUMNS: &str = "id, organization_id, office_id, number, internal_number, area, \
    subject, court, court_division, phase, value, distribution_date, notes, is_active, \
    is_confidential, created_at, updated_at";

const PARTY_COLUMNS: &str = "id, process_id, customer_id, role, notes, created_at";

#[derive(Clone)]
pub struct ProcessRepository {
    pool: PgPool,
}

impl ProcessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  PROCESSOS
    // =========================================================================

    pub async fn create<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        office_id: Uuid,
        number: &str,
        internal_number: &str,
        area: ProcessArea,
        subject: &str,
        court: &str,
        court_division: &str,
        value: Option<Decimal>,
        distribution_date: Option<NaiveDate>,
        notes: &str,
        is_confidential: bool,
    ) -> Result<Process, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let process = sqlx::query_as::<_, Process>(&format!(
            r#"
            INSERT INTO processes (
                organization_id, office_id, number, internal_number, area, subject,
                court, court_division, value, distribution_date, notes, is_confidential
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {PROCESS_COLUMNS}
            "#
        ))
        .bind(organization_id)
        .bind(office_id)
        .bind(number)
        .bind(internal_number)
        .bind(area)
        .bind(subject)
        .bind(court)
        .bind(court_division)
        .bind(value)
        .bind(distribution_date)
        .bind(notes)
        .bind(is_confidential)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, format!("O processo '{}' já existe.", number)))?;

        Ok(process)
    }

    /// Lista processos visíveis sob o escopo. `include_confidential` falso
    /// exclui processos em segredo de justiça da listagem.
    pub async fn list<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        include_confidential: bool,
    ) -> Result<Vec<Process>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(Vec::new());
        };

        let processes = sqlx::query_as::<_, Process>(&format!(
            r#"
            SELECT {PROCESS_COLUMNS}
            FROM processes
            WHERE organization_id = $1
              AND ($2::uuid IS NULL OR office_id = $2)
              AND ($3 OR is_confidential = FALSE)
            ORDER BY created_at DESC
            "#
        ))
        .bind(org_id)
        .bind(scope.office_id)
        .bind(include_confidential)
        .fetch_all(executor)
        .await?;

        Ok(processes)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        id: Uuid,
    ) -> Result<Option<Process>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(None);
        };

        let process = sqlx::query_as::<_, Process>(&format!(
            r#"
            SELECT {PROCESS_COLUMNS}
            FROM processes
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

        Ok(process)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        id: Uuid,
        internal_number: &str,
        area: ProcessArea,
        subject: &str,
        court: &str,
        court_division: &str,
        phase: ProcessPhase,
        value: Option<Decimal>,
        distribution_date: Option<NaiveDate>,
        notes: &str,
        is_active: bool,
        is_confidential: bool,
    ) -> Result<Option<Process>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(None);
        };

        let process = sqlx::query_as::<_, Process>(&format!(
            r#"
            UPDATE processes
            SET internal_number = $4, area = $5, subject = $6, court = $7,
                court_division = $8, phase = $9, value = $10, distribution_date = $11,
                notes = $12, is_active = $13, is_confidential = $14, updated_at = NOW()
            WHERE id = $1
              AND organization_id = $2
              AND ($3::uuid IS NULL OR office_id = $3)
            RETURNING {PROCESS_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(org_id)
        .bind(scope.office_id)
        .bind(internal_number)
        .bind(area)
        .bind(subject)
        .bind(court)
        .bind(court_division)
        .bind(phase)
        .bind(value)
        .bind(distribution_date)
        .bind(notes)
        .bind(is_active)
        .bind(is_confidential)
        .fetch_optional(executor)
        .await?;

        Ok(process)
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
            DELETE FROM processes
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

    // =========================================================================
    //  PARTES DO PROCESSO (escopo herdado via processo)
    // =========================================================================

    pub async fn add_party<'e, E>(
        &self,
        executor: E,
        process_id: Uuid,
        customer_id: Uuid,
        role: PartyRole,
        notes: &str,
    ) -> Result<ProcessParty, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let party = sqlx::query_as::<_, ProcessParty>(&format!(
            r#"
            INSERT INTO process_parties (process_id, customer_id, role, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING {PARTY_COLUMNS}
            "#
        ))
        .bind(process_id)
        .bind(customer_id)
        .bind(role)
        .bind(notes)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            map_unique_violation(e, "Esta parte já está cadastrada no processo com este papel.")
        })?;

        Ok(party)
    }

    pub async fn list_parties<'e, E>(
        &self,
        executor: E,
        process_id: Uuid,
    ) -> Result<Vec<ProcessParty>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let parties = sqlx::query_as::<_, ProcessParty>(&format!(
            "SELECT {PARTY_COLUMNS} FROM process_parties
             WHERE process_id = $1
             ORDER BY created_at ASC"
        ))
        .bind(process_id)
        .fetch_all(executor)
        .await?;

        Ok(parties)
    }

    pub async fn find_party<'e, E>(
        &self,
        executor: E,
        process_id: Uuid,
        party_id: Uuid,
    ) -> Result<Option<ProcessParty>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let party = sqlx::query_as::<_, ProcessParty>(&format!(
            "SELECT {PARTY_COLUMNS} FROM process_parties
             WHERE id = $1 AND process_id = $2"
        ))
        .bind(party_id)
        .bind(process_id)
        .fetch_optional(executor)
        .await?;

        Ok(party)
    }

    pub async fn remove_party<'e, E>(
        &self,
        executor: E,
        process_id: Uuid,
        party_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "DELETE FROM process_parties WHERE id = $1 AND process_id = $2",
        )
        .bind(party_id)
        .bind(process_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
