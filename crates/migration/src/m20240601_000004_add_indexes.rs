use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Account counts are taken per provider and per service
        manager
            .create_index(
                Index::create()
                    .name("idx_account_provider")
                    .table(Account::Table)
                    .col(Account::ProviderId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_account_service")
                    .table(Account::Table)
                    .col(Account::ServiceId)
                    .to_owned(),
            )
            .await?;

        // Listings are owner-scoped and newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_provider_owner_created")
                    .table(Provider::Table)
                    .col(Provider::OwnerId)
                    .col(Provider::CreatedAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_service_owner_created")
                    .table(Service::Table)
                    .col(Service::OwnerId)
                    .col(Service::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_account_provider").table(Account::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_account_service").table(Account::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_provider_owner_created").table(Provider::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_owner_created").table(Service::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Account { Table, ProviderId, ServiceId }

#[derive(DeriveIden)]
enum Provider { Table, OwnerId, CreatedAt }

#[derive(DeriveIden)]
enum Service { Table, OwnerId, CreatedAt }
