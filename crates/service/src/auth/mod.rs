//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, sign-in, tokens and staff administration live here so the
//! HTTP layer only moves cookies and JSON.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;

pub use errors::AuthError;
pub use repository::{AuthRepository, CatalogAuthRepository};
pub use service::{AuthService, AuthSettings};
