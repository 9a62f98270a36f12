use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use server::routes::{self, auth::OwnerClaims, ServerAuthConfig, ServerState};

const SECRET: &str = "e2e-secret";

/// Router over the SQL store. Uses `TEST_DATABASE_URL` when set, otherwise a
/// private in-memory SQLite database.
async fn start() -> anyhow::Result<(Router, DatabaseConnection)> {
    let db = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => {
            let db = sea_orm::Database::connect(url).await?;
            models::db::migrate(&db).await?;
            db
        }
        Err(_) => models::db::connect_sqlite_memory().await?,
    };
    let state = ServerState::from_db(db.clone(), ServerAuthConfig { jwt_secret: SECRET.into() });
    Ok((routes::build_router(state, tower_http::cors::CorsLayer::very_permissive()), db))
}

fn bearer(uid: Uuid) -> String {
    let exp = (Utc::now().timestamp() + 3600) as usize;
    let token = encode(&Header::default(), &OwnerClaims { uid, exp }, &EncodingKey::from_secret(SECRET.as_bytes()))
        .expect("sign token");
    format!("Bearer {token}")
}

async fn send(app: &Router, method: &str, uri: &str, owner: Uuid, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let req = Request::builder().method(method).uri(uri).header(header::AUTHORIZATION, bearer(owner));
    let req = match body {
        Some(b) => req.header(header::CONTENT_TYPE, "application/json").body(Body::from(b.to_string()))?,
        None => req.body(Body::empty())?,
    };
    let res = app.clone().oneshot(req).await?;
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

fn id_of(v: &Value) -> anyhow::Result<Uuid> {
    Ok(v["id"].as_str().ok_or_else(|| anyhow::anyhow!("missing id in {v}"))?.parse()?)
}

async fn seed_account(db: &DatabaseConnection, owner: Uuid, provider: Uuid, service: Uuid, status: &str, screens: i32) -> anyhow::Result<()> {
    let email = format!("acct_{}@example.com", Uuid::new_v4());
    models::account::create(db, models::account::NewAccount {
        owner_id: owner,
        provider_id: provider,
        service_id: service,
        email: &email,
        status,
        available_screens: screens,
        total_screens: 4,
        expiration_date: (Utc::now() + Duration::days(30)).into(),
    })
    .await?;
    Ok(())
}

#[tokio::test]
async fn e2e_netflix_across_two_owners() -> anyhow::Result<()> {
    let (app, _db) = start().await?;
    let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());
    let netflix = json!({"name": "Netflix", "basePrice": 10.0});

    let (status, mine) = send(&app, "POST", "/services", u1, Some(netflix.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, "POST", "/services", u1, Some(netflix.clone())).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(&app, "POST", "/services", u2, Some(netflix)).await?;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/services/{}", id_of(&mine)?);
    let (status, ack) = send(&app, "DELETE", &uri, u1, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["message"], "Service deleted successfully");
    let (status, _) = send(&app, "GET", &uri, u1, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, others) = send(&app, "GET", "/services", u2, None).await?;
    assert_eq!(others.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn e2e_accounts_drive_stats_and_block_deletion() -> anyhow::Result<()> {
    let (app, db) = start().await?;
    let owner = Uuid::new_v4();

    let (_, provider) = send(&app, "POST", "/providers", owner, Some(json!({"name": "Wholesale"}))).await?;
    let (_, service) = send(&app, "POST", "/services", owner, Some(json!({"name": "Disney+", "basePrice": 8.0}))).await?;
    let (provider_id, service_id) = (id_of(&provider)?, id_of(&service)?);
    seed_account(&db, owner, provider_id, service_id, "AVAILABLE", 3).await?;
    seed_account(&db, owner, provider_id, service_id, "SOLD", 0).await?;
    seed_account(&db, owner, provider_id, service_id, "AVAILABLE", 0).await?;

    let (status, detail) = send(&app, "GET", &format!("/services/{service_id}"), owner, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["accountCount"], 3);
    assert_eq!(detail["stats"]["availableAccounts"], 1);
    assert_eq!(detail["stats"]["totalScreensAvailable"], 3);

    let (_, report) = send(&app, "GET", "/services/stats", owner, None).await?;
    assert_eq!(report["totalServices"], 1);
    assert_eq!(report["services"][0]["soldOutAccounts"], 1);

    let (_, listed) = send(&app, "GET", "/providers", owner, None).await?;
    assert_eq!(listed[0]["accountCount"], 3);

    for uri in [format!("/providers/{provider_id}"), format!("/services/{service_id}")] {
        let (status, body) = send(&app, "DELETE", &uri, owner, None).await?;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], 2004);
    }

    let (status, toggled) = send(&app, "PATCH", &format!("/providers/{provider_id}/toggle-active"), owner, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["isActive"], false);
    Ok(())
}

#[tokio::test]
async fn e2e_rename_rules() -> anyhow::Result<()> {
    let (app, _db) = start().await?;
    let owner = Uuid::new_v4();
    let (_, acme) = send(&app, "POST", "/providers", owner, Some(json!({"name": "Acme"}))).await?;
    send(&app, "POST", "/providers", owner, Some(json!({"name": "Globex"}))).await?;
    let uri = format!("/providers/{}", id_of(&acme)?);

    let (status, same) = send(&app, "PATCH", &uri, owner, Some(json!({"name": "Acme", "notes": "kept"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(same["notes"], "kept");

    let (status, _) = send(&app, "PATCH", &uri, owner, Some(json!({"name": "Globex"}))).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "PATCH", &uri, owner, Some(json!({"name": "   "}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
