//! Account statistics derived on every read. Nothing here is stored.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{AccountStatus, AccountSummary, Service};

/// Per-service figures attached to a service detail view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub total_accounts: u64,
    /// Accounts that are AVAILABLE and still have a free screen.
    pub available_accounts: u64,
    pub sold_out_accounts: u64,
    pub total_screens_available: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceReport {
    pub service_id: Uuid,
    pub service_name: String,
    pub total_accounts: u64,
    pub available_screens: i64,
    pub sold_out_accounts: u64,
    /// Always 0 until sales are recorded against services.
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReport {
    pub total_services: u64,
    pub active_services: u64,
    pub services: Vec<ServiceReport>,
}

fn sold(accounts: &[AccountSummary]) -> u64 {
    accounts.iter().filter(|a| a.status == AccountStatus::Sold).count() as u64
}

fn free_screens(accounts: &[AccountSummary]) -> i64 {
    accounts.iter().map(|a| i64::from(a.available_screens)).sum()
}

pub fn account_stats(accounts: &[AccountSummary]) -> AccountStats {
    AccountStats {
        total_accounts: accounts.len() as u64,
        available_accounts: accounts
            .iter()
            .filter(|a| a.status == AccountStatus::Available && a.available_screens > 0)
            .count() as u64,
        sold_out_accounts: sold(accounts),
        total_screens_available: free_screens(accounts),
    }
}

pub fn service_report(service: &Service, accounts: &[AccountSummary]) -> ServiceReport {
    ServiceReport {
        service_id: service.id,
        service_name: service.name.clone(),
        total_accounts: accounts.len() as u64,
        available_screens: free_screens(accounts),
        sold_out_accounts: sold(accounts),
        revenue: 0.0,
    }
}

pub fn owner_report(rows: &[(Service, Vec<AccountSummary>)]) -> OwnerReport {
    OwnerReport {
        total_services: rows.len() as u64,
        active_services: rows.iter().filter(|(s, _)| s.is_active).count() as u64,
        services: rows.iter().map(|(s, accounts)| service_report(s, accounts)).collect(),
    }
}
