use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AccountSummary, Listed};
use crate::errors::CatalogError;
use crate::kind::CatalogKind;

/// Persistence abstraction for one catalog kind.
///
/// Every lookup that takes an `owner_id` must ignore rows of other owners.
#[async_trait]
pub trait CatalogRepository<K: CatalogKind>: Send + Sync {
    /// Record of `owner_id` named `name`, skipping `excluding` when given.
    async fn find_by_name(&self, owner_id: Uuid, name: &str, excluding: Option<Uuid>) -> Result<Option<K::Record>, CatalogError>;
    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<K::Record>, CatalogError>;
    /// Newest first; equal timestamps ordered by id.
    async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<Listed<K::Record>>, CatalogError>;
    /// Same order as `list_owned`, each record with its full account set.
    async fn list_with_accounts(&self, owner_id: Uuid) -> Result<Vec<(K::Record, Vec<AccountSummary>)>, CatalogError>;
    async fn accounts_of(&self, id: Uuid) -> Result<Vec<AccountSummary>, CatalogError>;
    async fn count_accounts(&self, id: Uuid) -> Result<u64, CatalogError>;

    async fn insert(&self, owner_id: Uuid, input: &K::NewInput) -> Result<K::Record, CatalogError>;
    async fn update(&self, id: Uuid, owner_id: Uuid, patch: &K::Patch) -> Result<K::Record, CatalogError>;
    async fn set_active(&self, id: Uuid, owner_id: Uuid, active: bool) -> Result<K::Record, CatalogError>;
    /// Returns false when nothing matched.
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<bool, CatalogError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::{DateTime, Duration, Utc};

    use crate::kind::CatalogRecord;

    /// Behaves like the SQL store: names are unique per owner, and a record
    /// with attached accounts refuses deletion.
    pub struct MockCatalogRepository<K: CatalogKind> {
        rows: Mutex<Vec<K::Record>>,
        accounts: Mutex<HashMap<Uuid, Vec<AccountSummary>>>, // key: parent record id
        clock: Mutex<DateTime<Utc>>,
    }

    impl<K: CatalogKind> Default for MockCatalogRepository<K> {
        fn default() -> Self {
            Self { rows: Mutex::default(), accounts: Mutex::default(), clock: Mutex::new(DateTime::<Utc>::MIN_UTC) }
        }
    }

    impl<K: CatalogKind> MockCatalogRepository<K> {
        /// Reference `account` from the record `parent_id`.
        pub fn attach_account(&self, parent_id: Uuid, account: AccountSummary) {
            self.accounts.lock().unwrap().entry(parent_id).or_default().push(account);
        }

        /// Strictly increasing timestamps so creation order is observable.
        fn tick(&self) -> DateTime<Utc> {
            let mut last = self.clock.lock().unwrap();
            let now = Utc::now().max(*last + Duration::microseconds(1));
            *last = now;
            now
        }

        fn sorted(&self, owner_id: Uuid) -> Vec<K::Record> {
            let mut owned: Vec<K::Record> = self.rows.lock().unwrap().iter().filter(|r| r.owner_id() == owner_id).cloned().collect();
            owned.sort_by(|a, b| b.created_at().cmp(&a.created_at()).then(a.id().cmp(&b.id())));
            owned
        }

        fn name_clash(rows: &[K::Record], owner_id: Uuid, name: &str, excluding: Option<Uuid>) -> bool {
            rows.iter().any(|r| r.owner_id() == owner_id && r.name() == name && Some(r.id()) != excluding)
        }

        fn modify(&self, id: Uuid, owner_id: Uuid, f: impl FnOnce(&mut K::Record)) -> Result<K::Record, CatalogError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|r| r.id() == id && r.owner_id() == owner_id)
                .ok_or_else(|| CatalogError::not_found(K::LABEL))?;
            f(row);
            Ok(row.clone())
        }
    }

    #[async_trait]
    impl<K: CatalogKind> CatalogRepository<K> for MockCatalogRepository<K> {
        async fn find_by_name(&self, owner_id: Uuid, name: &str, excluding: Option<Uuid>) -> Result<Option<K::Record>, CatalogError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|r| r.owner_id() == owner_id && r.name() == name && Some(r.id()) != excluding).cloned())
        }

        async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<K::Record>, CatalogError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|r| r.id() == id && r.owner_id() == owner_id).cloned())
        }

        async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<Listed<K::Record>>, CatalogError> {
            let accounts = self.accounts.lock().unwrap();
            Ok(self
                .sorted(owner_id)
                .into_iter()
                .map(|record| {
                    let account_count = accounts.get(&record.id()).map_or(0, |a| a.len() as u64);
                    Listed { record, account_count }
                })
                .collect())
        }

        async fn list_with_accounts(&self, owner_id: Uuid) -> Result<Vec<(K::Record, Vec<AccountSummary>)>, CatalogError> {
            let accounts = self.accounts.lock().unwrap();
            Ok(self
                .sorted(owner_id)
                .into_iter()
                .map(|record| {
                    let attached = accounts.get(&record.id()).cloned().unwrap_or_default();
                    (record, attached)
                })
                .collect())
        }

        async fn accounts_of(&self, id: Uuid) -> Result<Vec<AccountSummary>, CatalogError> {
            Ok(self.accounts.lock().unwrap().get(&id).cloned().unwrap_or_default())
        }

        async fn count_accounts(&self, id: Uuid) -> Result<u64, CatalogError> {
            Ok(self.accounts.lock().unwrap().get(&id).map_or(0, |a| a.len() as u64))
        }

        async fn insert(&self, owner_id: Uuid, input: &K::NewInput) -> Result<K::Record, CatalogError> {
            let now = self.tick();
            let record = K::build(Uuid::new_v4(), owner_id, input, now);
            let mut rows = self.rows.lock().unwrap();
            if Self::name_clash(&rows, owner_id, record.name(), None) {
                return Err(CatalogError::name_taken(K::LABEL));
            }
            rows.push(record.clone());
            Ok(record)
        }

        async fn update(&self, id: Uuid, owner_id: Uuid, patch: &K::Patch) -> Result<K::Record, CatalogError> {
            let now = self.tick();
            if let Some(name) = K::patch_name(patch) {
                let rows = self.rows.lock().unwrap();
                if Self::name_clash(&rows, owner_id, name.trim(), Some(id)) {
                    return Err(CatalogError::name_taken(K::LABEL));
                }
            }
            self.modify(id, owner_id, |r| K::apply(r, patch, now))
        }

        async fn set_active(&self, id: Uuid, owner_id: Uuid, active: bool) -> Result<K::Record, CatalogError> {
            let now = self.tick();
            self.modify(id, owner_id, |r| r.set_active(active, now))
        }

        async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<bool, CatalogError> {
            if self.accounts.lock().unwrap().get(&id).is_some_and(|a| !a.is_empty()) {
                return Err(CatalogError::deletion_blocked(K::LABEL));
            }
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| !(r.id() == id && r.owner_id() == owner_id));
            Ok(rows.len() < before)
        }
    }
}
