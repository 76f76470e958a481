//! Migrator registering the site tables in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_profiles;
mod m20240101_000002_create_user_credentials;
mod m20240101_000003_create_services;
mod m20240101_000004_create_team_members;
mod m20240101_000005_create_projects;
mod m20240101_000006_create_reviews;
mod m20240101_000007_create_blog_posts;
mod m20240101_000008_create_contact_messages;
mod m20240101_000009_create_company_history;
mod m20240101_000010_create_tasks;
mod m20240101_000011_create_site_statistics;
mod m20240101_000099_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_profiles::Migration),
            Box::new(m20240101_000002_create_user_credentials::Migration),
            Box::new(m20240101_000003_create_services::Migration),
            Box::new(m20240101_000004_create_team_members::Migration),
            Box::new(m20240101_000005_create_projects::Migration),
            Box::new(m20240101_000006_create_reviews::Migration),
            Box::new(m20240101_000007_create_blog_posts::Migration),
            Box::new(m20240101_000008_create_contact_messages::Migration),
            Box::new(m20240101_000009_create_company_history::Migration),
            Box::new(m20240101_000010_create_tasks::Migration),
            Box::new(m20240101_000011_create_site_statistics::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000099_add_indexes::Migration),
        ]
    }
}
