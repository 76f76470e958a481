//! Create `profiles` table.
//!
//! One row per account; `role` is one of admin, employee, client.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(uuid(Profiles::Id).primary_key())
                    .col(string_len(Profiles::Email, 255).unique_key().not_null())
                    .col(string_len(Profiles::FullName, 128).not_null())
                    .col(string_len(Profiles::Role, 16).not_null())
                    .col(string_null(Profiles::AvatarUrl))
                    .col(string_len_null(Profiles::Phone, 32))
                    .col(timestamp_with_time_zone(Profiles::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Profiles::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Profiles::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Profiles { Table, Id, Email, FullName, Role, AvatarUrl, Phone, CreatedAt, UpdatedAt }
