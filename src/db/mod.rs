pub mod audit_repo;
pub use audit_repo::AuditRepository;
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod deadline_repo;
pub use deadline_repo::DeadlineRepository;
pub mod document_repo;
pub use document_repo::DocumentRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
pub mod membership_repo;
pub use membership_repo::MembershipRepository;
pub mod process_repo;
pub use process_repo::ProcessRepository;
pub mod tenancy_repo;
pub use tenancy_repo::TenancyRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
