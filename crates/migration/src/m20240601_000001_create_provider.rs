//! Create `provider` table.
//!
//! Upstream suppliers of streaming accounts, scoped by owner.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Provider::Table)
                    .if_not_exists()
                    .col(uuid(Provider::Id).primary_key())
                    .col(uuid(Provider::OwnerId).not_null())
                    .col(string_len(Provider::Name, 128).not_null())
                    .col(string_len_null(Provider::PhoneNumber, 32))
                    .col(text_null(Provider::Notes))
                    .col(boolean(Provider::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(Provider::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Provider::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        // A name may be used once per owner
        manager
            .create_index(
                Index::create()
                    .name("uniq_provider_owner_name")
                    .table(Provider::Table)
                    .col(Provider::OwnerId)
                    .col(Provider::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Provider::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Provider {
    Table,
    Id,
    OwnerId,
    Name,
    PhoneNumber,
    Notes,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
