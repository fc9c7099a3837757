// src/services/mod.rs

pub mod audit;
pub mod auth_service;
pub mod authz;
pub mod customer_service;
pub mod deadline_service;
pub mod document_service;
pub mod finance_service;
pub mod process_service;
pub mod scoping;
pub mod tenancy_service;

pub use audit::AuditService;
pub use auth_service::AuthService;
pub use authz::AuthorizationService;
pub use customer_service::CustomerService;
pub use deadline_service::DeadlineService;
pub use document_service::DocumentService;
pub use finance_service::FinanceService;
pub use process_service::ProcessService;
pub use scoping::ScopingService;
pub use tenancy_service::TenancyService;
