//! Create `service` table.
//! Sellable product lines with a base price, scoped by owner.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(uuid(Service::Id).primary_key())
                    .col(uuid(Service::OwnerId).not_null())
                    .col(string_len(Service::Name, 128).not_null())
                    .col(text_null(Service::Description))
                    .col(double(Service::BasePrice).not_null())
                    .col(string_len_null(Service::LogoUrl, 512))
                    .col(boolean(Service::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(Service::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Service::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_service_owner_name")
                    .table(Service::Table)
                    .col(Service::OwnerId)
                    .col(Service::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Service::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Service {
    Table,
    Id,
    OwnerId,
    Name,
    Description,
    BasePrice,
    LogoUrl,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
