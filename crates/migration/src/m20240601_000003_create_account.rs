//! Create `account` table.
//!
//! Sellable credentials; each row pins its provider and service, and the
//! foreign keys refuse to let either parent disappear underneath it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Account::Table)
                    .if_not_exists()
                    .col(uuid(Account::Id).primary_key())
                    .col(uuid(Account::OwnerId).not_null())
                    .col(uuid(Account::ProviderId).not_null())
                    .col(uuid(Account::ServiceId).not_null())
                    .col(string_len(Account::Email, 256).not_null())
                    .col(string_len(Account::Status, 16).not_null())
                    .col(integer(Account::AvailableScreens).not_null())
                    .col(integer(Account::TotalScreens).not_null())
                    .col(timestamp_with_time_zone(Account::ExpirationDate).not_null())
                    .col(timestamp_with_time_zone(Account::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_provider")
                            .from(Account::Table, Account::ProviderId)
                            .to(Provider::Table, Provider::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_service")
                            .from(Account::Table, Account::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Account::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Account {
    Table,
    Id,
    OwnerId,
    ProviderId,
    ServiceId,
    Email,
    Status,
    AvailableScreens,
    TotalScreens,
    ExpirationDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Provider { Table, Id }

#[derive(DeriveIden)]
enum Service { Table, Id }
