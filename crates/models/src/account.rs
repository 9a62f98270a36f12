//! Accounts are owned by the inventory side of the system; the catalog only
//! reads them to count references and derive statistics.

use sea_orm::{entity::prelude::*, Set, DatabaseConnection, ActiveModelTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, provider, service};

pub const STATUSES: [&str; 4] = ["AVAILABLE", "SOLD", "RESERVED", "EXPIRED"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub email: String,
    pub status: String,
    pub available_screens: i32,
    pub total_screens: i32,
    pub expiration_date: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Provider, Service }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Provider => Entity::belongs_to(provider::Entity)
                .from(Column::ProviderId)
                .to(provider::Column::Id)
                .into(),
            Relation::Service => Entity::belongs_to(service::Entity)
                .from(Column::ServiceId)
                .to(service::Column::Id)
                .into(),
        }
    }
}

impl Related<provider::Entity> for Entity {
    fn to() -> RelationDef { Relation::Provider.def() }
}

impl Related<service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_status(s: &str) -> Result<String, errors::ModelError> {
    let up = s.to_ascii_uppercase();
    if !STATUSES.contains(&up.as_str()) {
        return Err(errors::ModelError::Validation(format!("invalid account status: {s}")));
    }
    Ok(up)
}

pub fn validate_screens(available: i32, total: i32) -> Result<(), errors::ModelError> {
    if available < 0 || total < 0 {
        return Err(errors::ModelError::Validation("screen counts must be >= 0".into()));
    }
    if available > total {
        return Err(errors::ModelError::Validation("available_screens cannot exceed total_screens".into()));
    }
    Ok(())
}

/// Parameters for recording an account against a provider and a service.
#[derive(Clone, Debug)]
pub struct NewAccount<'a> {
    pub owner_id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub email: &'a str,
    pub status: &'a str,
    pub available_screens: i32,
    pub total_screens: i32,
    pub expiration_date: DateTimeWithTimeZone,
}

pub async fn create(db: &DatabaseConnection, input: NewAccount<'_>) -> Result<Model, errors::ModelError> {
    let status = validate_status(input.status)?;
    validate_screens(input.available_screens, input.total_screens)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(input.owner_id),
        provider_id: Set(input.provider_id),
        service_id: Set(input.service_id),
        email: Set(input.email.to_string()),
        status: Set(status),
        available_screens: Set(input.available_screens),
        total_screens: Set(input.total_screens),
        expiration_date: Set(input.expiration_date),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}
