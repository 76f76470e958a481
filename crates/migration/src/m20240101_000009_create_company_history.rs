//! Create `company_history` table (timeline milestones, newest year first).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CompanyHistory::Table)
                    .if_not_exists()
                    .col(uuid(CompanyHistory::Id).primary_key())
                    .col(integer(CompanyHistory::Year).not_null())
                    .col(string_len(CompanyHistory::Title, 255).not_null())
                    .col(text(CompanyHistory::Description).not_null())
                    .col(json_binary(CompanyHistory::Translations).not_null())
                    .col(timestamp_with_time_zone(CompanyHistory::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(CompanyHistory::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CompanyHistory::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CompanyHistory { Table, Id, Year, Title, Description, Translations, CreatedAt, UpdatedAt }
