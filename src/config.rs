// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        AuditRepository, CustomerRepository, DeadlineRepository, DocumentRepository,
        FinanceRepository, MembershipRepository, ProcessRepository, TenancyRepository,
        UserRepository,
    },
    services::{
        AuditService, AuthService, AuthorizationService, CustomerService, DeadlineService,
        DocumentService, FinanceService, ProcessService, ScopingService, TenancyService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub scoping_service: ScopingService,
    pub audit_service: AuditService,
    pub tenancy_service: TenancyService,
    pub customer_service: CustomerService,
    pub process_service: ProcessService,
    pub deadline_service: DeadlineService,
    pub document_service: DocumentService,
    pub finance_service: FinanceService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL deve ser definida"))?;
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET deve ser definido"))?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let membership_repo = MembershipRepository::new(db_pool.clone());
        let tenancy_repo = TenancyRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let process_repo = ProcessRepository::new(db_pool.clone());
        let deadline_repo = DeadlineRepository::new(db_pool.clone());
        let document_repo = DocumentRepository::new(db_pool.clone());
        let finance_repo = FinanceRepository::new(db_pool.clone());
        let audit_repo = AuditRepository::new(db_pool.clone());

        let authz = AuthorizationService::new(membership_repo.clone());
        let audit_service = AuditService::new(audit_repo, authz.clone());
        let scoping_service = ScopingService::new(membership_repo.clone());
        let auth_service = AuthService::new(user_repo, jwt_secret, db_pool.clone());

        let tenancy_service = TenancyService::new(
            tenancy_repo,
            membership_repo,
            authz.clone(),
            audit_service.clone(),
            db_pool.clone(),
        );
        let customer_service = CustomerService::new(
            customer_repo.clone(),
            authz.clone(),
            audit_service.clone(),
            db_pool.clone(),
        );
        let process_service = ProcessService::new(
            process_repo,
            customer_repo.clone(),
            authz.clone(),
            audit_service.clone(),
            db_pool.clone(),
        );
        let deadline_service = DeadlineService::new(
            deadline_repo,
            authz.clone(),
            audit_service.clone(),
            db_pool.clone(),
        );
        let document_service = DocumentService::new(
            document_repo,
            authz.clone(),
            audit_service.clone(),
            db_pool.clone(),
        );
        let finance_service = FinanceService::new(
            finance_repo,
            customer_repo,
            authz,
            audit_service.clone(),
            db_pool.clone(),
        );

        Ok(Self {
            db_pool,
            auth_service,
            scoping_service,
            audit_service,
            tenancy_service,
            customer_service,
            process_service,
            deadline_service,
            document_service,
            finance_service,
        })
    }
}
