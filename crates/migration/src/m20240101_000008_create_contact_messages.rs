//! Create `contact_messages` table (contact form submissions).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContactMessages::Table)
                    .if_not_exists()
                    .col(uuid(ContactMessages::Id).primary_key())
                    .col(string_len(ContactMessages::Name, 128).not_null())
                    .col(string_len(ContactMessages::Email, 255).not_null())
                    .col(string_len_null(ContactMessages::Phone, 32))
                    .col(string_len_null(ContactMessages::Subject, 255))
                    .col(text(ContactMessages::Message).not_null())
                    .col(boolean(ContactMessages::Read).not_null().default(false))
                    .col(timestamp_with_time_zone(ContactMessages::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ContactMessages::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ContactMessages::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ContactMessages {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Subject,
    Message,
    Read,
    CreatedAt,
    UpdatedAt,
}
