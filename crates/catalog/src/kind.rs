//! Entity-kind descriptors. Providers and services follow the same rules
//! (owned, uniquely named, reference-counted by accounts); a kind supplies
//! only its field schema.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use models::errors::ModelError;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{NewProvider, NewService, Provider, ProviderPatch, Service, ServicePatch};
use crate::errors::CatalogError;

/// Read/write access the engine needs on a stored record.
pub trait CatalogRecord: Clone + Debug + Serialize + Send + Sync + 'static {
    fn id(&self) -> Uuid;
    fn owner_id(&self) -> Uuid;
    fn name(&self) -> &str;
    fn is_active(&self) -> bool;
    fn created_at(&self) -> DateTime<Utc>;
    fn set_active(&mut self, active: bool, now: DateTime<Utc>);
}

pub trait CatalogKind: Send + Sync + 'static {
    /// Human label used in messages, e.g. "Provider not found".
    const LABEL: &'static str;
    /// Whether single-record reads carry derived account statistics.
    const WITH_STATS: bool;

    type Record: CatalogRecord;
    type NewInput: Debug + Send + Sync;
    type Patch: Debug + Send + Sync;

    fn validate_new(input: &Self::NewInput) -> Result<(), CatalogError>;
    fn validate_patch(patch: &Self::Patch) -> Result<(), CatalogError>;
    fn new_name(input: &Self::NewInput) -> &str;
    fn patch_name(patch: &Self::Patch) -> Option<&str>;

    /// Materialize a fresh, active record. Used by stores that do not assign
    /// fields themselves.
    fn build(id: Uuid, owner_id: Uuid, input: &Self::NewInput, now: DateTime<Utc>) -> Self::Record;
    /// Copy the fields present in `patch` onto `record`.
    fn apply(record: &mut Self::Record, patch: &Self::Patch, now: DateTime<Utc>);
}

fn validation(e: ModelError) -> CatalogError {
    match e {
        ModelError::Validation(msg) => CatalogError::Validation(msg),
        other => CatalogError::Validation(other.to_string()),
    }
}

fn trimmed(s: &str) -> String { s.trim().to_string() }

#[derive(Debug, Clone, Copy)]
pub struct ProviderKind;

#[derive(Debug, Clone, Copy)]
pub struct ServiceKind;

impl CatalogRecord for Provider {
    fn id(&self) -> Uuid { self.id }
    fn owner_id(&self) -> Uuid { self.owner_id }
    fn name(&self) -> &str { &self.name }
    fn is_active(&self) -> bool { self.is_active }
    fn created_at(&self) -> DateTime<Utc> { self.created_at }
    fn set_active(&mut self, active: bool, now: DateTime<Utc>) {
        self.is_active = active;
        self.updated_at = now;
    }
}

impl CatalogRecord for Service {
    fn id(&self) -> Uuid { self.id }
    fn owner_id(&self) -> Uuid { self.owner_id }
    fn name(&self) -> &str { &self.name }
    fn is_active(&self) -> bool { self.is_active }
    fn created_at(&self) -> DateTime<Utc> { self.created_at }
    fn set_active(&mut self, active: bool, now: DateTime<Utc>) {
        self.is_active = active;
        self.updated_at = now;
    }
}

impl CatalogKind for ProviderKind {
    const LABEL: &'static str = "Provider";
    const WITH_STATS: bool = false;

    type Record = Provider;
    type NewInput = NewProvider;
    type Patch = ProviderPatch;

    fn validate_new(input: &NewProvider) -> Result<(), CatalogError> {
        models::provider::validate_name(&input.name).map_err(validation)
    }

    fn validate_patch(patch: &ProviderPatch) -> Result<(), CatalogError> {
        if let Some(name) = &patch.name { models::provider::validate_name(name).map_err(validation)?; }
        Ok(())
    }

    fn new_name(input: &NewProvider) -> &str { &input.name }

    fn patch_name(patch: &ProviderPatch) -> Option<&str> { patch.name.as_deref() }

    fn build(id: Uuid, owner_id: Uuid, input: &NewProvider, now: DateTime<Utc>) -> Provider {
        Provider {
            id,
            owner_id,
            name: trimmed(&input.name),
            phone_number: input.phone_number.clone(),
            notes: input.notes.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(record: &mut Provider, patch: &ProviderPatch, now: DateTime<Utc>) {
        if let Some(n) = &patch.name { record.name = trimmed(n); }
        if let Some(p) = &patch.phone_number { record.phone_number = Some(p.clone()); }
        if let Some(n) = &patch.notes { record.notes = Some(n.clone()); }
        if let Some(b) = patch.is_active { record.is_active = b; }
        record.updated_at = now;
    }
}

impl CatalogKind for ServiceKind {
    const LABEL: &'static str = "Service";
    const WITH_STATS: bool = true;

    type Record = Service;
    type NewInput = NewService;
    type Patch = ServicePatch;

    fn validate_new(input: &NewService) -> Result<(), CatalogError> {
        models::provider::validate_name(&input.name).map_err(validation)?;
        models::service::validate_base_price(input.base_price).map_err(validation)
    }

    fn validate_patch(patch: &ServicePatch) -> Result<(), CatalogError> {
        if let Some(name) = &patch.name { models::provider::validate_name(name).map_err(validation)?; }
        if let Some(price) = patch.base_price { models::service::validate_base_price(price).map_err(validation)?; }
        Ok(())
    }

    fn new_name(input: &NewService) -> &str { &input.name }

    fn patch_name(patch: &ServicePatch) -> Option<&str> { patch.name.as_deref() }

    fn build(id: Uuid, owner_id: Uuid, input: &NewService, now: DateTime<Utc>) -> Service {
        Service {
            id,
            owner_id,
            name: trimmed(&input.name),
            description: input.description.clone(),
            base_price: input.base_price,
            logo_url: input.logo_url.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(record: &mut Service, patch: &ServicePatch, now: DateTime<Utc>) {
        if let Some(n) = &patch.name { record.name = trimmed(n); }
        if let Some(d) = &patch.description { record.description = Some(d.clone()); }
        if let Some(p) = patch.base_price { record.base_price = p; }
        if let Some(u) = &patch.logo_url { record.logo_url = Some(u.clone()); }
        if let Some(b) = patch.is_active { record.is_active = b; }
        record.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_validation_rejects_negative_price_and_blank_name() {
        let bad_price = NewService { name: "Netflix".into(), description: None, base_price: -1.0, logo_url: None };
        assert!(matches!(ServiceKind::validate_new(&bad_price), Err(CatalogError::Validation(_))));
        let blank = NewService { name: "  ".into(), description: None, base_price: 1.0, logo_url: None };
        assert!(ServiceKind::validate_new(&blank).is_err());
        let patch = ServicePatch { base_price: Some(-3.0), ..Default::default() };
        assert!(ServiceKind::validate_patch(&patch).is_err());
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let now = Utc::now();
        let input = NewProvider { name: " Acme ".into(), phone_number: Some("123".into()), notes: Some("n".into()) };
        let mut p = ProviderKind::build(Uuid::new_v4(), Uuid::new_v4(), &input, now);
        assert_eq!(p.name, "Acme");

        ProviderKind::apply(&mut p, &ProviderPatch { notes: Some("updated".into()), ..Default::default() }, now);
        assert_eq!(p.name, "Acme");
        assert_eq!(p.phone_number.as_deref(), Some("123"));
        assert_eq!(p.notes.as_deref(), Some("updated"));
        assert!(p.is_active);
    }
}
