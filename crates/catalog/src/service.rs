use std::sync::Arc;

use common::types::Ack;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::{Detail, Listed};
use crate::errors::CatalogError;
use crate::kind::{CatalogKind, CatalogRecord, ServiceKind};
use crate::repository::CatalogRepository;
use crate::stats::{self, OwnerReport};

/// Catalog business rules for one entity kind, independent of web framework.
///
/// Every operation is scoped to `owner_id`: records of other owners behave
/// as if they did not exist. Uniqueness and deletion checks read before they
/// write; the store's unique index and foreign keys back them up and surface
/// as the same errors.
pub struct CatalogService<K: CatalogKind> {
    repo: Arc<dyn CatalogRepository<K>>,
}

impl<K: CatalogKind> Clone for CatalogService<K> {
    fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<K: CatalogKind> CatalogService<K> {
    pub fn new(repo: Arc<dyn CatalogRepository<K>>) -> Self { Self { repo } }

    /// Create a record for `owner_id`, refusing names the owner already uses.
    ///
    /// # Examples
    /// ```
    /// use catalog::{CatalogService, ServiceKind};
    /// use catalog::domain::NewService;
    /// use catalog::errors::CatalogError;
    /// use catalog::repository::mock::MockCatalogRepository;
    /// use std::sync::Arc;
    /// let svc = CatalogService::<ServiceKind>::new(Arc::new(MockCatalogRepository::default()));
    /// let owner = uuid::Uuid::new_v4();
    /// let input = || NewService { name: "Netflix".into(), description: None, base_price: 10.0, logo_url: None };
    /// let created = tokio_test::block_on(svc.create(input(), owner)).unwrap();
    /// assert!(created.is_active);
    /// let again = tokio_test::block_on(svc.create(input(), owner));
    /// assert!(matches!(again, Err(CatalogError::Conflict(_))));
    /// ```
    #[instrument(skip(self, input), fields(kind = K::LABEL, owner_id = %owner_id))]
    pub async fn create(&self, input: K::NewInput, owner_id: Uuid) -> Result<K::Record, CatalogError> {
        K::validate_new(&input)?;
        let name = K::new_name(&input).trim();
        if let Some(existing) = self.repo.find_by_name(owner_id, name, None).await? {
            warn!(existing_id = %existing.id(), name, "catalog_name_conflict");
            return Err(CatalogError::name_taken(K::LABEL));
        }
        let created = self.repo.insert(owner_id, &input).await?;
        info!(id = %created.id(), name = created.name(), "catalog_entry_created");
        Ok(created)
    }

    /// All records of the owner, newest first, each with its account count.
    #[instrument(skip(self), fields(kind = K::LABEL, owner_id = %owner_id))]
    pub async fn find_all(&self, owner_id: Uuid) -> Result<Vec<Listed<K::Record>>, CatalogError> {
        let list = self.repo.list_owned(owner_id).await?;
        debug!(count = list.len(), "catalog_listed");
        Ok(list)
    }

    /// One record with its accounts; kinds with `WITH_STATS` also get
    /// derived statistics.
    #[instrument(skip(self), fields(kind = K::LABEL, owner_id = %owner_id))]
    pub async fn find_one(&self, id: Uuid, owner_id: Uuid) -> Result<Detail<K::Record>, CatalogError> {
        let record = self.owned(id, owner_id).await?;
        let accounts = self.repo.accounts_of(id).await?;
        let stats = K::WITH_STATS.then(|| stats::account_stats(&accounts));
        Ok(Detail { account_count: accounts.len() as u64, record, accounts, stats })
    }

    /// Apply the fields present in `patch`. A rename is checked against the
    /// owner's other records only, so keeping the current name never clashes.
    #[instrument(skip(self, patch), fields(kind = K::LABEL, owner_id = %owner_id))]
    pub async fn update(&self, id: Uuid, patch: K::Patch, owner_id: Uuid) -> Result<K::Record, CatalogError> {
        let current = self.owned(id, owner_id).await?;
        K::validate_patch(&patch)?;
        if let Some(name) = K::patch_name(&patch).map(str::trim) {
            if name != current.name() && self.repo.find_by_name(owner_id, name, Some(id)).await?.is_some() {
                warn!(%id, name, "catalog_name_conflict");
                return Err(CatalogError::name_taken(K::LABEL));
            }
        }
        let updated = self.repo.update(id, owner_id, &patch).await?;
        info!(%id, "catalog_entry_updated");
        Ok(updated)
    }

    /// Flip `is_active`. Deactivation is the reversible alternative to removal.
    #[instrument(skip(self), fields(kind = K::LABEL, owner_id = %owner_id))]
    pub async fn toggle_active(&self, id: Uuid, owner_id: Uuid) -> Result<K::Record, CatalogError> {
        let current = self.owned(id, owner_id).await?;
        let toggled = self.repo.set_active(id, owner_id, !current.is_active()).await?;
        info!(%id, is_active = toggled.is_active(), "catalog_entry_toggled");
        Ok(toggled)
    }

    /// Permanently delete a record no account references.
    #[instrument(skip(self), fields(kind = K::LABEL, owner_id = %owner_id))]
    pub async fn remove(&self, id: Uuid, owner_id: Uuid) -> Result<Ack, CatalogError> {
        self.owned(id, owner_id).await?;
        let references = self.repo.count_accounts(id).await?;
        if references > 0 {
            warn!(%id, references, "catalog_delete_blocked");
            return Err(CatalogError::deletion_blocked(K::LABEL));
        }
        if !self.repo.delete(id, owner_id).await? {
            return Err(CatalogError::not_found(K::LABEL));
        }
        info!(%id, "catalog_entry_deleted");
        Ok(Ack::new(format!("{} deleted successfully", K::LABEL)))
    }

    async fn owned(&self, id: Uuid, owner_id: Uuid) -> Result<K::Record, CatalogError> {
        self.repo
            .find_owned(id, owner_id)
            .await?
            .ok_or_else(|| CatalogError::not_found(K::LABEL))
    }
}

impl CatalogService<ServiceKind> {
    /// Per-service account figures plus owner-level totals.
    #[instrument(skip(self), fields(owner_id = %owner_id))]
    pub async fn stats(&self, owner_id: Uuid) -> Result<OwnerReport, CatalogError> {
        let rows = self.repo.list_with_accounts(owner_id).await?;
        Ok(stats::owner_report(&rows))
    }
}
