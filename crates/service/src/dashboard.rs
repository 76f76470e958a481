//! Counts shown on the dashboard home.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use models::task::TaskStatus;

use crate::catalog::Catalog;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct Overview {
    pub services: usize,
    pub team_members: usize,
    pub projects: usize,
    pub published_posts: usize,
    pub pending_reviews: usize,
    pub unread_messages: usize,
    pub open_tasks: usize,
    /// Every status is present, zero when no task has it.
    pub tasks_by_status: BTreeMap<String, usize>,
}

pub async fn overview(catalog: &Catalog) -> Result<Overview, ServiceError> {
    let (services, team, projects, blog, reviews, messages, tasks) = tokio::try_join!(
        catalog.services.list(None),
        catalog.team.list(None),
        catalog.projects.list(None),
        catalog.blog.list(None),
        catalog.reviews.list(None),
        catalog.messages.list(None),
        catalog.tasks.list(None),
    )?;

    let mut tasks_by_status: BTreeMap<String, usize> =
        TaskStatus::ALL.iter().map(|s| (s.as_str().to_string(), 0)).collect();
    let mut open_tasks = 0;
    for task in tasks.iter() {
        *tasks_by_status.entry(task.status.clone()).or_default() += 1;
        if task.is_open() {
            open_tasks += 1;
        }
    }

    Ok(Overview {
        services: services.len(),
        team_members: team.len(),
        projects: projects.len(),
        published_posts: blog.iter().filter(|p| p.published).count(),
        pending_reviews: reviews.iter().filter(|r| !r.approved).count(),
        unread_messages: messages.iter().filter(|m| !m.read).count(),
        open_tasks,
        tasks_by_status,
    })
}
