//! Service layer for the agency site.
//! - Generic CRUD over every table, backed by sea-orm or memory, behind a query cache.
//! - Localized site content, contact form, dashboard counts.
//! - Accounts and tokens, per-visitor preferences.

pub mod errors;
pub mod metrics;
pub mod pagination;
pub mod repository;
pub mod cache;
pub mod crud;
pub mod catalog;
pub mod site;
pub mod dashboard;
pub mod contact;
pub mod auth;
pub mod storage;
pub mod preferences;
pub mod seed;
#[cfg(test)]
pub mod test_support;

pub use catalog::Catalog;
pub use crud::CrudService;
pub use errors::ServiceError;
