//! Create `projects` table (portfolio entries).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(uuid(Projects::Id).primary_key())
                    .col(string_len(Projects::Title, 255).not_null())
                    .col(text(Projects::Description).not_null())
                    .col(string_len_null(Projects::Category, 64))
                    .col(string_null(Projects::ImageUrl))
                    .col(string_null(Projects::Link))
                    .col(json_binary(Projects::Translations).not_null())
                    .col(timestamp_with_time_zone(Projects::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Projects::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Projects::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    Title,
    Description,
    Category,
    ImageUrl,
    Link,
    Translations,
    CreatedAt,
    UpdatedAt,
}
