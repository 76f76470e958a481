//! Create `site_statistics` table (headline figures on the landing page).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SiteStatistics::Table)
                    .if_not_exists()
                    .col(uuid(SiteStatistics::Id).primary_key())
                    .col(string_len(SiteStatistics::Label, 128).not_null())
                    .col(string_len(SiteStatistics::Value, 64).not_null())
                    .col(string_len_null(SiteStatistics::Icon, 64))
                    .col(integer(SiteStatistics::Order).not_null().default(0))
                    .col(json_binary(SiteStatistics::Translations).not_null())
                    .col(timestamp_with_time_zone(SiteStatistics::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(SiteStatistics::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SiteStatistics::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum SiteStatistics { Table, Id, Label, Value, Icon, Order, Translations, CreatedAt, UpdatedAt }
