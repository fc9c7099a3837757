pub mod audit;
pub mod auth;
pub mod customers;
pub mod deadlines;
pub mod documents;
pub mod finance;
pub mod processes;
pub mod tenancy;
