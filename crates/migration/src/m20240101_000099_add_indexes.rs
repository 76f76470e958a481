use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: &[(&str, &str, &str)] = &[
    ("idx_profiles_role", "profiles", "role"),
    ("idx_services_order", "services", "order"),
    ("idx_team_members_order", "team_members", "order"),
    ("idx_projects_category", "projects", "category"),
    ("idx_reviews_approved", "reviews", "approved"),
    ("idx_blog_posts_published", "blog_posts", "published"),
    ("idx_blog_posts_author", "blog_posts", "author_id"),
    ("idx_contact_messages_read", "contact_messages", "read"),
    ("idx_company_history_year", "company_history", "year"),
    ("idx_tasks_status", "tasks", "status"),
    ("idx_tasks_assigned_to", "tasks", "assigned_to"),
    ("idx_site_statistics_order", "site_statistics", "order"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, column) in INDEXES {
            manager
                .create_index(
                    Index::create()
                        .name(*name)
                        .table(Alias::new(*table))
                        .col(Alias::new(*column))
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, _) in INDEXES.iter().rev() {
            manager
                .drop_index(Index::drop().name(*name).table(Alias::new(*table)).to_owned())
                .await?;
        }
        Ok(())
    }
}
