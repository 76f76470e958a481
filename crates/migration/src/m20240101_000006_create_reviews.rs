//! Create `reviews` table.
//!
//! Public submissions land with `approved = false`; rating is checked to 1..=5.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(uuid(Reviews::Id).primary_key())
                    .col(string_len(Reviews::ClientName, 128).not_null())
                    .col(string_len_null(Reviews::Company, 128))
                    .col(text(Reviews::Content).not_null())
                    .col(
                        integer(Reviews::Rating)
                            .not_null()
                            .check(Expr::col(Reviews::Rating).between(1, 5)),
                    )
                    .col(boolean(Reviews::Approved).not_null().default(false))
                    .col(json_binary(Reviews::Translations).not_null())
                    .col(timestamp_with_time_zone(Reviews::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Reviews::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Reviews::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    Id,
    ClientName,
    Company,
    Content,
    Rating,
    Approved,
    Translations,
    CreatedAt,
    UpdatedAt,
}
