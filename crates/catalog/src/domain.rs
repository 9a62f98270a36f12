use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CatalogError;
use crate::stats::AccountStats;

/// Upstream supplier of streaming accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub phone_number: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sellable product line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
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

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProvider {
    pub name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update; absent fields stay as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderPatch {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub base_price: f64,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Partial update; absent fields stay as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<f64>,
    pub logo_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Available,
    Sold,
    Reserved,
    Expired,
}

impl FromStr for AccountStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(AccountStatus::Available),
            "SOLD" => Ok(AccountStatus::Sold),
            "RESERVED" => Ok(AccountStatus::Reserved),
            "EXPIRED" => Ok(AccountStatus::Expired),
            other => Err(CatalogError::Db(format!("unknown account status {other:?}"))),
        }
    }
}

/// Display subset of an account attached to a provider or service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: Uuid,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub email: String,
    pub available_screens: i32,
    pub total_screens: i32,
    pub expiration_date: DateTime<Utc>,
}

/// List entry: the record plus how many accounts reference it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listed<R> {
    #[serde(flatten)]
    pub record: R,
    pub account_count: u64,
}

/// Single-record view with its accounts; services also carry derived stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Detail<R> {
    #[serde(flatten)]
    pub record: R,
    pub accounts: Vec<AccountSummary>,
    pub account_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<AccountStats>,
}
