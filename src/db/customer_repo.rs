// src/db/customer_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        error::{AppError, map_unique_violation},
        scope::TenantScope,
    },
    models::customers::{Customer, CustomerType},
};

const CUSTOMER_COLUMNS: &str = r#"id, organization_id, office_id, name, "type", document,
    email, phone, phone_secondary, address, city, state, zip_code, notes, is_active,
    created_at, updated_at"#;

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        office_id: Uuid,
        name: &str,
        kind: CustomerType,
        document: &str,
        email: &str,
        phone: &str,
        phone_secondary: &str,
        address: &str,
        city: &str,
        state: &str,
        zip_code: &str,
        notes: &str,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers (
                organization_id, office_id, name, "type", document,
                email, phone, phone_secondary, address, city, state, zip_code, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(organization_id)
        .bind(office_id)
        .bind(name)
        .bind(kind)
        .bind(document)
        .bind(email)
        .bind(phone)
        .bind(phone_secondary)
        .bind(address)
        .bind(city)
        .bind(state)
        .bind(zip_code)
        .bind(notes)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                format!("Documento '{}' já cadastrado nesta organização.", document),
            )
        })?;

        Ok(customer)
    }

    /// Lista clientes visíveis sob o escopo, com busca opcional por
    /// nome/documento/e-mail. Sem organização no escopo => lista vazia.
    pub async fn list<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        search: Option<&str>,
    ) -> Result<Vec<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(Vec::new());
        };

        let search_term = search.map(|q| format!("%{}%", q));

        let customers = sqlx::query_as::<_, Customer>(&format!(
            r#"
            SELECT {CUSTOMER_COLUMNS}
            FROM customers
            WHERE organization_id = $1
              AND ($2::uuid IS NULL OR office_id = $2)
              AND ($3::text IS NULL OR name ILIKE $3 OR document ILIKE $3 OR email ILIKE $3)
            ORDER BY created_at DESC
            "#
        ))
        .bind(org_id)
        .bind(scope.office_id)
        .bind(search_term)
        .fetch_all(executor)
        .await?;

        Ok(customers)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        id: Uuid,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(None);
        };

        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            SELECT {CUSTOMER_COLUMNS}
            FROM customers
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

        Ok(customer)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        id: Uuid,
        name: &str,
        kind: CustomerType,
        document: &str,
        email: &str,
        phone: &str,
        phone_secondary: &str,
        address: &str,
        city: &str,
        state: &str,
        zip_code: &str,
        notes: &str,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(None);
        };

        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE customers
            SET name = $4, "type" = $5, document = $6, email = $7, phone = $8,
                phone_secondary = $9, address = $10, city = $11, state = $12,
                zip_code = $13, notes = $14, updated_at = NOW()
            WHERE id = $1
              AND organization_id = $2
              AND ($3::uuid IS NULL OR office_id = $3)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(org_id)
        .bind(scope.office_id)
        .bind(name)
        .bind(kind)
        .bind(document)
        .bind(email)
        .bind(phone)
        .bind(phone_secondary)
        .bind(address)
        .bind(city)
        .bind(state)
        .bind(zip_code)
        .bind(notes)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                format!("Documento '{}' já cadastrado nesta organização.", document),
            )
        })?;

        Ok(customer)
    }

    pub async fn set_active<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(org_id) = scope.organization_id else {
            return Ok(None);
        };

        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE customers
            SET is_active = $4, updated_at = NOW()
            WHERE id = $1
              AND organization_id = $2
              AND ($3::uuid IS NULL OR office_id = $3)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(org_id)
        .bind(scope.office_id)
        .bind(is_active)
        .fetch_optional(executor)
        .await?;

        Ok(customer)
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
            DELETE FROM customers
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
}
