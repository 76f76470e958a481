//! Create `blog_posts` table with optional FK to the authoring profile.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlogPosts::Table)
                    .if_not_exists()
                    .col(uuid(BlogPosts::Id).primary_key())
                    .col(string_len(BlogPosts::Title, 255).not_null())
                    .col(string_len(BlogPosts::Slug, 255).unique_key().not_null())
                    .col(text_null(BlogPosts::Excerpt))
                    .col(text(BlogPosts::Content).not_null())
                    .col(string_null(BlogPosts::CoverImage))
                    .col(uuid_null(BlogPosts::AuthorId))
                    .col(boolean(BlogPosts::Published).not_null().default(false))
                    .col(json_binary(BlogPosts::Translations).not_null())
                    .col(timestamp_with_time_zone(BlogPosts::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(BlogPosts::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_posts_author")
                            .from(BlogPosts::Table, BlogPosts::AuthorId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(BlogPosts::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum BlogPosts {
    Table,
    Id,
    Title,
    Slug,
    Excerpt,
    Content,
    CoverImage,
    AuthorId,
    Published,
    Translations,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Profiles { Table, Id }
