//! Internal task board used from the dashboard.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::resource::{FilterField, FilterKind, Resource, SortKey, SortValue, Timestamp};
use crate::validation;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub assigned_to: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub due_date: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::profile::Entity",
        from = "Column::AssignedTo",
        to = "crate::profile::Column::Id"
    )]
    Assignee,
    #[sea_orm(
        belongs_to = "crate::profile::Entity",
        from = "Column::CreatedBy",
        to = "crate::profile::Column::Id"
    )]
    Creator,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_open(&self) -> bool {
        self.status != TaskStatus::Done.as_str()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_to: Option<Uuid>,
    /// Filled from the signed-in user when absent.
    pub created_by: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
}

impl Resource for Model {
    type Create = CreateTask;
    type Patch = UpdateTask;

    const TABLE: &'static str = "tasks";
    const SORT: SortKey = SortKey::desc("created_at");
    const FILTERS: &'static [FilterField] = &[
        FilterField::new("status", FilterKind::Text),
        FilterField::new("assigned_to", FilterKind::Uuid),
        FilterField::new("created_by", FilterKind::Uuid),
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(id: Uuid, now: Timestamp, input: CreateTask) -> Result<Self, ModelError> {
        Ok(Self {
            id,
            title: validation::required("title", &input.title, 255)?,
            description: validation::optional(input.description),
            status: input.status.as_str().to_string(),
            priority: input.priority.as_str().to_string(),
            assigned_to: input.assigned_to,
            created_by: input.created_by,
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: UpdateTask, now: Timestamp) -> Result<(), ModelError> {
        if let Some(title) = patch.title {
            self.title = validation::required("title", &title, 255)?;
        }
        if patch.description.is_some() {
            self.description = validation::optional(patch.description);
        }
        if let Some(status) = patch.status {
            self.status = status.as_str().to_string();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority.as_str().to_string();
        }
        if patch.assigned_to.is_some() {
            self.assigned_to = patch.assigned_to;
        }
        if patch.due_date.is_some() {
            self.due_date = patch.due_date;
        }
        self.updated_at = now;
        Ok(())
    }

    fn sort_value(&self) -> SortValue {
        SortValue::Time(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn statuses_use_snake_case_on_the_wire() {
        let patch: UpdateTask = serde_json::from_str(r#"{"status":"in_progress","priority":"high"}"#).unwrap();
        assert_eq!(patch.status, Some(TaskStatus::InProgress));
        assert_eq!(patch.priority, Some(TaskPriority::High));
        assert!(serde_json::from_str::<UpdateTask>(r#"{"status":"blocked"}"#).is_err());
    }

    #[test]
    fn new_tasks_are_open_todo_medium() {
        let input = CreateTask { title: "Write copy".into(), ..Default::default() };
        let mut t = Model::build(Uuid::new_v4(), Utc::now().into(), input).unwrap();
        assert_eq!(t.status, "todo");
        assert_eq!(t.priority, "medium");
        assert!(t.is_open());
        t.apply(UpdateTask { status: Some(TaskStatus::Done), ..Default::default() }, Utc::now().into())
            .unwrap();
        assert!(!t.is_open());
    }
}
