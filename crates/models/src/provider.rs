use sea_orm::{entity::prelude::*, Set, DatabaseConnection, ActiveModelTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{account, errors};

pub const MAX_NAME_LEN: usize = 128;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "provider")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub phone_number: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
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

/// Shared by providers and services: trimmed, non-empty, bounded.
pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(errors::ModelError::Validation(format!("name longer than {MAX_NAME_LEN} characters")));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    owner_id: Uuid,
    name: &str,
    phone_number: Option<&str>,
    notes: Option<&str>,
) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        name: Set(name.trim().to_string()),
        phone_number: Set(phone_number.map(str::to_string)),
        notes: Set(notes.map(str::to_string)),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
