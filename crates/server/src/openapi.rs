use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

// Schema mirrors of the catalog wire types; the catalog crate stays free of
// documentation concerns.

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
pub struct AckDoc { pub message: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDoc {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub phone_number: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderListedDoc {
    #[serde(flatten)]
    pub provider: ProviderDoc,
    pub account_count: u64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDetailDoc {
    #[serde(flatten)]
    pub provider: ProviderDoc,
    pub accounts: Vec<AccountSummaryDoc>,
    pub account_count: u64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProviderDoc {
    pub name: String,
    pub phone_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderPatchDoc {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDoc {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub base_price: f64,
    pub logo_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceListedDoc {
    #[serde(flatten)]
    pub service: ServiceDoc,
    pub account_count: u64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatsDoc {
    pub total_accounts: u64,
    pub available_accounts: u64,
    pub sold_out_accounts: u64,
    pub total_screens_available: i64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetailDoc {
    #[serde(flatten)]
    pub service: ServiceDoc,
    pub accounts: Vec<AccountSummaryDoc>,
    pub account_count: u64,
    pub stats: AccountStatsDoc,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewServiceDoc {
    pub name: String,
    pub description: Option<String>,
    pub base_price: f64,
    pub logo_url: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServicePatchDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<f64>,
    pub logo_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummaryDoc {
    pub id: Uuid,
    /// One of AVAILABLE, SOLD, RESERVED, EXPIRED.
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub email: String,
    pub available_screens: i32,
    pub total_screens: i32,
    pub expiration_date: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceReportDoc {
    pub service_id: Uuid,
    pub service_name: String,
    pub total_accounts: u64,
    pub available_screens: i64,
    pub sold_out_accounts: u64,
    /// Always 0.
    pub revenue: f64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReportDoc {
    pub total_services: u64,
    pub active_services: u64,
    pub services: Vec<ServiceReportDoc>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::providers::create,
        crate::routes::providers::find_all,
        crate::routes::providers::find_one,
        crate::routes::providers::update,
        crate::routes::providers::toggle_active,
        crate::routes::providers::remove,
        crate::routes::services::create,
        crate::routes::services::find_all,
        crate::routes::services::stats,
        crate::routes::services::find_one,
        crate::routes::services::update,
        crate::routes::services::toggle_active,
        crate::routes::services::remove,
    ),
    components(
        schemas(
            HealthResponse,
            AckDoc,
            ProviderDoc,
            ProviderListedDoc,
            ProviderDetailDoc,
            NewProviderDoc,
            ProviderPatchDoc,
            ServiceDoc,
            ServiceListedDoc,
            ServiceDetailDoc,
            NewServiceDoc,
            ServicePatchDoc,
            AccountSummaryDoc,
            AccountStatsDoc,
            ServiceReportDoc,
            OwnerReportDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "providers"),
        (name = "services")
    )
)]
pub struct ApiDoc;
