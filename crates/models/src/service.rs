use sea_orm::{entity::prelude::*, Set, DatabaseConnection, ActiveModelTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{account, errors, provider::validate_name};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub base_price: f64,
    pub logo_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Account }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Account => Entity::has_many(account::Entity).into(),
        }
    }
}

impl Related<account::Entity> for Entity {
    fn to() -> RelationDef { Relation::Account.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_base_price(price: f64) -> Result<(), errors::ModelError> {
    if !price.is_finite() {
        return Err(errors::ModelError::Validation("base_price must be a finite number".into()));
    }
    if price < 0.0 {
        return Err(errors::ModelError::Validation("base_price must be >= 0".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    owner_id: Uuid,
    name: &str,
    description: Option<&str>,
    base_price: f64,
    logo_url: Option<&str>,
) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_base_price(base_price)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        name: Set(name.trim().to_string()),
        description: Set(description.map(str::to_string)),
        base_price: Set(base_price),
        logo_url: Set(logo_url.map(str::to_string)),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
