use crate::db::{connect_sqlite_memory, connect_with_config, migrate};
use crate::errors::ModelError;
use crate::{account, provider, service};
use anyhow::Result;
use chrono::{Duration, Utc};
use sea_orm::{EntityTrait, ModelTrait, PaginatorTrait};
use uuid::Uuid;

#[tokio::test]
async fn test_provider_create_trims_and_defaults_active() -> Result<()> {
    let db = connect_sqlite_memory().await?;
    let owner = Uuid::new_v4();

    let p = provider::create(&db, owner, "  Acme Streams ", Some("+1 555 0100"), None).await?;
    assert_eq!(p.name, "Acme Streams");
    assert!(p.is_active);
    assert_eq!(p.owner_id, owner);

    let found = provider::Entity::find_by_id(p.id).one(&db).await?;
    assert_eq!(found.map(|m| m.phone_number), Some(Some("+1 555 0100".to_string())));
    Ok(())
}

#[tokio::test]
async fn test_connect_with_config_applies_pool_settings() -> Result<()> {
    let cfg = configs::DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let db = connect_with_config(&cfg).await?;
    migrate(&db).await?;

    let owner = Uuid::new_v4();
    provider::create(&db, owner, "Acme", None, None).await?;
    assert_eq!(provider::Entity::find().count(&db).await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_unique_index_is_per_owner() -> Result<()> {
    let db = connect_sqlite_memory().await?;
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    service::create(&db, a, "Netflix", None, 10.0, None).await?;
    let dup = service::create(&db, a, "Netflix", None, 12.0, None).await;
    assert!(matches!(dup, Err(ModelError::Conflict(_))), "got {dup:?}");

    service::create(&db, b, "Netflix", None, 12.0, None).await?;
    assert_eq!(service::Entity::find().count(&db).await?, 2);
    Ok(())
}

#[tokio::test]
async fn test_referenced_provider_cannot_be_deleted() -> Result<()> {
    let db = connect_sqlite_memory().await?;
    let owner = Uuid::new_v4();
    let p = provider::create(&db, owner, "Supplier", None, None).await?;
    let s = service::create(&db, owner, "Disney+", None, 8.5, None).await?;
    account::create(&db, account::NewAccount {
        owner_id: owner,
        provider_id: p.id,
        service_id: s.id,
        email: "shared@example.com",
        status: "available",
        available_screens: 4,
        total_screens: 4,
        expiration_date: (Utc::now() + Duration::days(30)).into(),
    }).await?;

    let res = p.clone().delete(&db).await.map_err(ModelError::from);
    assert!(matches!(res, Err(ModelError::Referenced(_))), "got {res:?}");
    assert!(provider::Entity::find_by_id(p.id).one(&db).await?.is_some());
    Ok(())
}

#[test]
fn test_field_validation() {
    assert!(provider::validate_name("   ").is_err());
    assert!(provider::validate_name(&"x".repeat(provider::MAX_NAME_LEN + 1)).is_err());
    assert!(provider::validate_name("HBO").is_ok());

    assert!(service::validate_base_price(-0.01).is_err());
    assert!(service::validate_base_price(f64::NAN).is_err());
    assert!(service::validate_base_price(0.0).is_ok());

    assert_eq!(account::validate_status("sold").unwrap(), "SOLD");
    assert!(account::validate_status("lost").is_err());
    assert!(account::validate_screens(5, 4).is_err());
    assert!(account::validate_screens(0, 4).is_ok());
}
