//! Catalog consistency engine for providers and services.
//! - `kind` describes the two catalog entity kinds to one generic engine.
//! - `service` enforces owner scoping, name uniqueness and the deletion gate.
//! - `stats` derives account statistics as pure functions.
//! - `repository` abstracts persistence; `repo::seaorm` is the SQL-backed store.

pub mod errors;
pub mod domain;
pub mod kind;
pub mod stats;
pub mod repository;
pub mod repo;
pub mod service;
#[cfg(test)]
pub mod test_support;

pub use kind::{CatalogKind, ProviderKind, ServiceKind};
pub use service::CatalogService;
