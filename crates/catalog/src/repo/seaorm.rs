use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::SelectStatement;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    QueryTrait, Set,
};
use uuid::Uuid;

use models::{account, provider, service};

use crate::domain::{AccountSummary, Listed, Provider, ProviderPatch, Service, ServicePatch, NewProvider, NewService};
use crate::errors::{db_err, CatalogError};
use crate::kind::{CatalogKind, ProviderKind, ServiceKind};
use crate::repository::CatalogRepository;

/// SeaORM-backed repository; one value serves both catalog kinds.
#[derive(Clone)]
pub struct SeaOrmCatalogRepository {
    pub db: DatabaseConnection,
}

/// Which foreign key on `account` points at the catalog row.
#[derive(Clone, Copy)]
enum Parent { Provider, Service }

impl Parent {
    fn column(self) -> account::Column {
        match self {
            Parent::Provider => account::Column::ProviderId,
            Parent::Service => account::Column::ServiceId,
        }
    }

    /// `SELECT id FROM <catalog table> WHERE owner_id = ?`
    fn owned_ids(self, owner_id: Uuid) -> SelectStatement {
        match self {
            Parent::Provider => provider::Entity::find()
                .select_only()
                .column(provider::Column::Id)
                .filter(provider::Column::OwnerId.eq(owner_id))
                .into_query(),
            Parent::Service => service::Entity::find()
                .select_only()
                .column(service::Column::Id)
                .filter(service::Column::OwnerId.eq(owner_id))
                .into_query(),
        }
    }

    fn key(self, m: &account::Model) -> Uuid {
        match self {
            Parent::Provider => m.provider_id,
            Parent::Service => m.service_id,
        }
    }
}

fn summary(m: account::Model) -> Result<AccountSummary, CatalogError> {
    Ok(AccountSummary {
        id: m.id,
        status: m.status.parse()?,
        created_at: m.created_at.with_timezone(&Utc),
        email: m.email,
        available_screens: m.available_screens,
        total_screens: m.total_screens,
        expiration_date: m.expiration_date.with_timezone(&Utc),
    })
}

fn provider_from(m: provider::Model) -> Provider {
    Provider {
        id: m.id,
        owner_id: m.owner_id,
        name: m.name,
        phone_number: m.phone_number,
        notes: m.notes,
        is_active: m.is_active,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

fn service_from(m: service::Model) -> Service {
    Service {
        id: m.id,
        owner_id: m.owner_id,
        name: m.name,
        description: m.description,
        base_price: m.base_price,
        logo_url: m.logo_url,
        is_active: m.is_active,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

impl SeaOrmCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn accounts_for(&self, parent: Parent, id: Uuid) -> Result<Vec<AccountSummary>, CatalogError> {
        account::Entity::find()
            .filter(parent.column().eq(id))
            .order_by_asc(account::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(summary)
            .collect()
    }

    async fn count_for(&self, parent: Parent, id: Uuid) -> Result<u64, CatalogError> {
        account::Entity::find()
            .filter(parent.column().eq(id))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    /// Account counts for every catalog row of `owner_id` in one grouped query.
    async fn counts_by_parent(&self, parent: Parent, owner_id: Uuid) -> Result<HashMap<Uuid, u64>, CatalogError> {
        let pairs: Vec<(Uuid, i64)> = account::Entity::find()
            .select_only()
            .column(parent.column())
            .column_as(account::Column::Id.count(), "account_count")
            .filter(parent.column().in_subquery(parent.owned_ids(owner_id)))
            .group_by(parent.column())
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(pairs.into_iter().map(|(id, n)| (id, n.max(0) as u64)).collect())
    }

    async fn accounts_by_parent(&self, parent: Parent, owner_id: Uuid) -> Result<HashMap<Uuid, Vec<AccountSummary>>, CatalogError> {
        let rows = account::Entity::find()
            .filter(parent.column().in_subquery(parent.owned_ids(owner_id)))
            .order_by_asc(account::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let mut grouped: HashMap<Uuid, Vec<AccountSummary>> = HashMap::new();
        for row in rows {
            let key = parent.key(&row);
            grouped.entry(key).or_default().push(summary(row)?);
        }
        Ok(grouped)
    }

    async fn providers_of(&self, owner_id: Uuid) -> Result<Vec<Provider>, CatalogError> {
        let rows = provider::Entity::find()
            .filter(provider::Column::OwnerId.eq(owner_id))
            .order_by_desc(provider::Column::CreatedAt)
            .order_by_asc(provider::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(provider_from).collect())
    }

    async fn services_of(&self, owner_id: Uuid) -> Result<Vec<Service>, CatalogError> {
        let rows = service::Entity::find()
            .filter(service::Column::OwnerId.eq(owner_id))
            .order_by_desc(service::Column::CreatedAt)
            .order_by_asc(service::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(service_from).collect())
    }

    async fn provider_row(&self, id: Uuid, owner_id: Uuid) -> Result<Option<provider::Model>, CatalogError> {
        provider::Entity::find_by_id(id)
            .filter(provider::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    async fn service_row(&self, id: Uuid, owner_id: Uuid) -> Result<Option<service::Model>, CatalogError> {
        service::Entity::find_by_id(id)
            .filter(service::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(db_err)
    }
}

#[async_trait]
impl CatalogRepository<ProviderKind> for SeaOrmCatalogRepository {
    async fn find_by_name(&self, owner_id: Uuid, name: &str, excluding: Option<Uuid>) -> Result<Option<Provider>, CatalogError> {
        let mut finder = provider::Entity::find()
            .filter(provider::Column::OwnerId.eq(owner_id))
            .filter(provider::Column::Name.eq(name));
        if let Some(id) = excluding { finder = finder.filter(provider::Column::Id.ne(id)); }
        let found = finder.one(&self.db).await.map_err(db_err)?;
        Ok(found.map(provider_from))
    }

    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Provider>, CatalogError> {
        Ok(self.provider_row(id, owner_id).await?.map(provider_from))
    }

    async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<Listed<Provider>>, CatalogError> {
        let rows = self.providers_of(owner_id).await?;
        let counts = self.counts_by_parent(Parent::Provider, owner_id).await?;
        Ok(rows
            .into_iter()
            .map(|record| Listed { account_count: counts.get(&record.id).copied().unwrap_or(0), record })
            .collect())
    }

    async fn list_with_accounts(&self, owner_id: Uuid) -> Result<Vec<(Provider, Vec<AccountSummary>)>, CatalogError> {
        let rows = self.providers_of(owner_id).await?;
        let mut grouped = self.accounts_by_parent(Parent::Provider, owner_id).await?;
        Ok(rows.into_iter().map(|p| { let a = grouped.remove(&p.id).unwrap_or_default(); (p, a) }).collect())
    }

    async fn accounts_of(&self, id: Uuid) -> Result<Vec<AccountSummary>, CatalogError> {
        self.accounts_for(Parent::Provider, id).await
    }

    async fn count_accounts(&self, id: Uuid) -> Result<u64, CatalogError> {
        self.count_for(Parent::Provider, id).await
    }

    async fn insert(&self, owner_id: Uuid, input: &NewProvider) -> Result<Provider, CatalogError> {
        let created = provider::create(&self.db, owner_id, &input.name, input.phone_number.as_deref(), input.notes.as_deref())
            .await
            .map_err(|e| CatalogError::from_model(ProviderKind::LABEL, e))?;
        Ok(provider_from(created))
    }

    async fn update(&self, id: Uuid, owner_id: Uuid, patch: &ProviderPatch) -> Result<Provider, CatalogError> {
        let existing = self.provider_row(id, owner_id).await?.ok_or_else(|| CatalogError::not_found(ProviderKind::LABEL))?;
        let mut am: provider::ActiveModel = existing.into();
        if let Some(n) = &patch.name { am.name = Set(n.trim().to_string()); }
        if let Some(p) = &patch.phone_number { am.phone_number = Set(Some(p.clone())); }
        if let Some(n) = &patch.notes { am.notes = Set(Some(n.clone())); }
        if let Some(b) = patch.is_active { am.is_active = Set(b); }
        am.updated_at = Set(Utc::now().into());
        let updated = am
            .update(&self.db)
            .await
            .map_err(|e| CatalogError::from_model(ProviderKind::LABEL, e.into()))?;
        Ok(provider_from(updated))
    }

    async fn set_active(&self, id: Uuid, owner_id: Uuid, active: bool) -> Result<Provider, CatalogError> {
        let patch = ProviderPatch { is_active: Some(active), ..Default::default() };
        CatalogRepository::<ProviderKind>::update(self, id, owner_id, &patch).await
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<bool, CatalogError> {
        let res = provider::Entity::delete_many()
            .filter(provider::Column::Id.eq(id))
            .filter(provider::Column::OwnerId.eq(owner_id))
            .exec(&self.db)
            .await
            .map_err(|e| CatalogError::from_model(ProviderKind::LABEL, e.into()))?;
        Ok(res.rows_affected > 0)
    }
}

#[async_trait]
impl CatalogRepository<ServiceKind> for SeaOrmCatalogRepository {
    async fn find_by_name(&self, owner_id: Uuid, name: &str, excluding: Option<Uuid>) -> Result<Option<Service>, CatalogError> {
        let mut finder = service::Entity::find()
            .filter(service::Column::OwnerId.eq(owner_id))
            .filter(service::Column::Name.eq(name));
        if let Some(id) = excluding { finder = finder.filter(service::Column::Id.ne(id)); }
        let found = finder.one(&self.db).await.map_err(db_err)?;
        Ok(found.map(service_from))
    }

    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Service>, CatalogError> {
        Ok(self.service_row(id, owner_id).await?.map(service_from))
    }

    async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<Listed<Service>>, CatalogError> {
        let rows = self.services_of(owner_id).await?;
        let counts = self.counts_by_parent(Parent::Service, owner_id).await?;
        Ok(rows
            .into_iter()
            .map(|record| Listed { account_count: counts.get(&record.id).copied().unwrap_or(0), record })
            .collect())
    }

    async fn list_with_accounts(&self, owner_id: Uuid) -> Result<Vec<(Service, Vec<AccountSummary>)>, CatalogError> {
        let rows = self.services_of(owner_id).await?;
        let mut grouped = self.accounts_by_parent(Parent::Service, owner_id).await?;
        Ok(rows.into_iter().map(|s| { let a = grouped.remove(&s.id).unwrap_or_default(); (s, a) }).collect())
    }

    async fn accounts_of(&self, id: Uuid) -> Result<Vec<AccountSummary>, CatalogError> {
        self.accounts_for(Parent::Service, id).await
    }

    async fn count_accounts(&self, id: Uuid) -> Result<u64, CatalogError> {
        self.count_for(Parent::Service, id).await
    }

    async fn insert(&self, owner_id: Uuid, input: &NewService) -> Result<Service, CatalogError> {
        let created = service::create(
            &self.db,
            owner_id,
            &input.name,
            input.description.as_deref(),
            input.base_price,
            input.logo_url.as_deref(),
        )
        .await
        .map_err(|e| CatalogError::from_model(ServiceKind::LABEL, e))?;
        Ok(service_from(created))
    }

    async fn update(&self, id: Uuid, owner_id: Uuid, patch: &ServicePatch) -> Result<Service, CatalogError> {
        let existing = self.service_row(id, owner_id).await?.ok_or_else(|| CatalogError::not_found(ServiceKind::LABEL))?;
        let mut am: service::ActiveModel = existing.into();
        if let Some(n) = &patch.name { am.name = Set(n.trim().to_string()); }
        if let Some(d) = &patch.description { am.description = Set(Some(d.clone())); }
        if let Some(p) = patch.base_price { am.base_price = Set(p); }
        if let Some(u) = &patch.logo_url { am.logo_url = Set(Some(u.clone())); }
        if let Some(b) = patch.is_active { am.is_active = Set(b); }
        am.updated_at = Set(Utc::now().into());
        let updated = am
            .update(&self.db)
            .await
            .map_err(|e| CatalogError::from_model(ServiceKind::LABEL, e.into()))?;
        Ok(service_from(updated))
    }

    async fn set_active(&self, id: Uuid, owner_id: Uuid, active: bool) -> Result<Service, CatalogError> {
        let patch = ServicePatch { is_active: Some(active), ..Default::default() };
        CatalogRepository::<ServiceKind>::update(self, id, owner_id, &patch).await
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<bool, CatalogError> {
        let res = service::Entity::delete_many()
            .filter(service::Column::Id.eq(id))
            .filter(service::Column::OwnerId.eq(owner_id))
            .exec(&self.db)
            .await
            .map_err(|e| CatalogError::from_model(ServiceKind::LABEL, e.into()))?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_account};
    use std::time::Duration;

    fn netflix() -> NewService {
        NewService { name: "Netflix".into(), description: Some("4K plan".into()), base_price: 10.0, logo_url: None }
    }

    #[tokio::test]
    async fn service_crud_and_counts() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmCatalogRepository::new(db.clone());
        let owner = Uuid::new_v4();

        let s = CatalogRepository::<ServiceKind>::insert(&repo, owner, &netflix()).await?;
        let p = CatalogRepository::<ProviderKind>::insert(&repo, owner, &NewProvider { name: "Acme".into(), phone_number: None, notes: None }).await?;
        seed_account(&db, owner, p.id, s.id, "SOLD", 0).await?;
        seed_account(&db, owner, p.id, s.id, "AVAILABLE", 2).await?;

        let listed = CatalogRepository::<ServiceKind>::list_owned(&repo, owner).await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].account_count, 2);
        assert_eq!(CatalogRepository::<ProviderKind>::count_accounts(&repo, p.id).await?, 2);

        let accounts = CatalogRepository::<ServiceKind>::accounts_of(&repo, s.id).await?;
        assert_eq!(accounts.len(), 2);

        let patch = ServicePatch { base_price: Some(12.5), ..Default::default() };
        let updated = CatalogRepository::<ServiceKind>::update(&repo, s.id, owner, &patch).await?;
        assert_eq!(updated.base_price, 12.5);
        assert_eq!(updated.description.as_deref(), Some("4K plan"));
        Ok(())
    }

    #[tokio::test]
    async fn listing_is_owner_scoped_and_newest_first() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmCatalogRepository::new(db);
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        for name in ["first", "second", "third"] {
            CatalogRepository::<ProviderKind>::insert(&repo, a, &NewProvider { name: name.into(), phone_number: None, notes: None }).await?;
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        CatalogRepository::<ProviderKind>::insert(&repo, b, &NewProvider { name: "other".into(), phone_number: None, notes: None }).await?;

        let names: Vec<String> = CatalogRepository::<ProviderKind>::list_owned(&repo, a)
            .await?
            .into_iter()
            .map(|l| l.record.name)
            .collect();
        assert_eq!(names, ["third", "second", "first"]);
        Ok(())
    }

    #[tokio::test]
    async fn unique_index_surfaces_as_conflict() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmCatalogRepository::new(db);
        let owner = Uuid::new_v4();

        CatalogRepository::<ServiceKind>::insert(&repo, owner, &netflix()).await?;
        let dup = CatalogRepository::<ServiceKind>::insert(&repo, owner, &netflix()).await;
        assert!(matches!(dup, Err(CatalogError::Conflict(_))), "got {dup:?}");
        Ok(())
    }

    #[tokio::test]
    async fn unique_index_rejects_rename_onto_taken_name() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmCatalogRepository::new(db);
        let owner = Uuid::new_v4();
        let new = |name: &str| NewProvider { name: name.into(), phone_number: None, notes: None };

        let a = CatalogRepository::<ProviderKind>::insert(&repo, owner, &new("A")).await?;
        CatalogRepository::<ProviderKind>::insert(&repo, owner, &new("B")).await?;

        // store-level write without the engine's read-check
        let patch = ProviderPatch { name: Some(" B ".into()), ..Default::default() };
        let res = CatalogRepository::<ProviderKind>::update(&repo, a.id, owner, &patch).await;
        assert!(
            matches!(&res, Err(CatalogError::Conflict(m)) if m == "Provider with this name already exists"),
            "got {res:?}"
        );
        let kept = CatalogRepository::<ProviderKind>::find_owned(&repo, a.id, owner).await?;
        assert_eq!(kept.map(|p| p.name).as_deref(), Some("A"));
        Ok(())
    }

    #[tokio::test]
    async fn grouped_account_reads_stay_within_owner() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmCatalogRepository::new(db.clone());
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let mut seeded = Vec::new();
        for owner in [a, b] {
            let p = CatalogRepository::<ProviderKind>::insert(&repo, owner, &NewProvider { name: "Acme".into(), phone_number: None, notes: None }).await?;
            let s = CatalogRepository::<ServiceKind>::insert(&repo, owner, &netflix()).await?;
            seeded.push((owner, p, s));
        }
        let (_, pa, sa) = &seeded[0];
        let (_, pb, sb) = &seeded[1];
        seed_account(&db, a, pa.id, sa.id, "AVAILABLE", 2).await?;
        seed_account(&db, b, pb.id, sb.id, "SOLD", 0).await?;
        seed_account(&db, b, pb.id, sb.id, "AVAILABLE", 1).await?;
        // a's idle provider has no accounts and still lists with zero
        tokio::time::sleep(Duration::from_millis(5)).await;
        let idle = CatalogRepository::<ProviderKind>::insert(&repo, a, &NewProvider { name: "Idle".into(), phone_number: None, notes: None }).await?;

        let listed = CatalogRepository::<ProviderKind>::list_owned(&repo, a).await?;
        let counts: Vec<(Uuid, u64)> = listed.iter().map(|l| (l.record.id, l.account_count)).collect();
        assert_eq!(counts, [(idle.id, 0), (pa.id, 1)]);

        let with_accounts = CatalogRepository::<ServiceKind>::list_with_accounts(&repo, b).await?;
        assert_eq!(with_accounts.len(), 1);
        assert_eq!(with_accounts[0].0.id, sb.id);
        assert_eq!(with_accounts[0].1.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn foreign_key_surfaces_as_deletion_blocked() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmCatalogRepository::new(db.clone());
        let owner = Uuid::new_v4();
        let s = CatalogRepository::<ServiceKind>::insert(&repo, owner, &netflix()).await?;
        let p = CatalogRepository::<ProviderKind>::insert(&repo, owner, &NewProvider { name: "Acme".into(), phone_number: None, notes: None }).await?;
        seed_account(&db, owner, p.id, s.id, "AVAILABLE", 1).await?;

        let res = CatalogRepository::<ServiceKind>::delete(&repo, s.id, owner).await;
        assert!(matches!(res, Err(CatalogError::DeletionBlocked(_))), "got {res:?}");
        // other owners cannot delete it either
        let foreign = CatalogRepository::<ProviderKind>::delete(&repo, p.id, Uuid::new_v4()).await?;
        assert!(!foreign);
        Ok(())
    }
}
