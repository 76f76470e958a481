//! Create `tasks` table (internal dashboard task board).
//!
//! `assigned_to` and `created_by` reference profiles and are cleared when the
//! profile is removed.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(uuid(Tasks::Id).primary_key())
                    .col(string_len(Tasks::Title, 255).not_null())
                    .col(text_null(Tasks::Description))
                    .col(string_len(Tasks::Status, 16).not_null().default("todo"))
                    .col(string_len(Tasks::Priority, 16).not_null().default("medium"))
                    .col(uuid_null(Tasks::AssignedTo))
                    .col(uuid_null(Tasks::CreatedBy))
                    .col(date_null(Tasks::DueDate))
                    .col(timestamp_with_time_zone(Tasks::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Tasks::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_assigned_to")
                            .from(Tasks::Table, Tasks::AssignedTo)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_created_by")
                            .from(Tasks::Table, Tasks::CreatedBy)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Tasks::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    Title,
    Description,
    Status,
    Priority,
    AssignedTo,
    CreatedBy,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Profiles { Table, Id }
