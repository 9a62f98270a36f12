use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::account;

/// Fresh, migrated database for the current test.
///
/// `TEST_DATABASE_URL` points the suite at a real server; otherwise each test
/// gets its own in-memory SQLite database.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => {
            let db = sea_orm::Database::connect(url).await?;
            models::db::migrate(&db).await?;
            Ok(db)
        }
        Err(_) => models::db::connect_sqlite_memory().await,
    }
}

/// Insert an account referencing `provider_id` and `service_id`.
pub async fn seed_account(
    db: &DatabaseConnection,
    owner_id: Uuid,
    provider_id: Uuid,
    service_id: Uuid,
    status: &str,
    available_screens: i32,
) -> Result<account::Model, anyhow::Error> {
    let email = format!("acct_{}@example.com", Uuid::new_v4());
    let created = account::create(db, account::NewAccount {
        owner_id,
        provider_id,
        service_id,
        email: &email,
        status,
        available_screens,
        total_screens: available_screens.max(4),
        expiration_date: (Utc::now() + Duration::days(30)).into(),
    })
    .await?;
    Ok(created)
}
