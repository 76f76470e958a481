use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use models::{Filter, Resource, SortDirection};

use super::Repository;
use crate::errors::ServiceError;

/// In-process table guarded by an `RwLock`.
///
/// Ordering follows `M::SORT` with a stable sort, so rows with equal keys keep
/// insertion order. A read-only instance serves static fixtures and rejects writes.
pub struct MemoryRepository<M> {
    rows: RwLock<Vec<M>>,
    read_only: bool,
}

impl<M: Resource> Default for MemoryRepository<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Resource> MemoryRepository<M> {
    pub fn new() -> Self {
        Self { rows: RwLock::new(Vec::new()), read_only: false }
    }

    pub fn with_rows(rows: Vec<M>) -> Self {
        Self { rows: RwLock::new(rows), read_only: false }
    }

    pub fn read_only(rows: Vec<M>) -> Self {
        Self { rows: RwLock::new(rows), read_only: true }
    }

    fn ensure_writable(&self) -> Result<(), ServiceError> {
        if self.read_only {
            return Err(ServiceError::ReadOnly(format!("{} is served from static fixtures", M::TABLE)));
        }
        Ok(())
    }
}

fn matches<M: Resource>(row: &M, filter: &Filter) -> Result<bool, ServiceError> {
    let value = serde_json::to_value(row).map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(value
        .get(filter.field)
        .map(|field| filter.value.matches(field))
        .unwrap_or(false))
}

/// `Conflict` when `candidate` repeats a `M::UNIQUE` value held by another row.
fn ensure_unique<M: Resource>(rows: &[M], candidate: &M) -> Result<(), ServiceError> {
    if M::UNIQUE.is_empty() {
        return Ok(());
    }
    let to_value = |row: &M| serde_json::to_value(row).map_err(|e| ServiceError::Db(e.to_string()));
    let mine = to_value(candidate)?;
    for other in rows.iter().filter(|r| r.id() != candidate.id()) {
        let theirs = to_value(other)?;
        for column in M::UNIQUE {
            match mine.get(*column) {
                None | Some(serde_json::Value::Null) => {}
                Some(value) if theirs.get(*column) == Some(value) => {
                    return Err(ServiceError::Conflict(format!("{}.{column} {value} already exists", M::TABLE)));
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

pub(crate) fn sort_rows<M: Resource>(rows: &mut [M]) {
    let desc = M::SORT.direction == SortDirection::Desc;
    rows.sort_by(|a, b| {
        let ord = a.sort_value().cmp(&b.sort_value());
        if desc { ord.reverse() } else { ord }
    });
}

#[async_trait]
impl<M: Resource> Repository<M> for MemoryRepository<M> {
    async fn list(&self, filter: Option<Filter>) -> Result<Vec<M>, ServiceError> {
        let rows = self.rows.read().await;
        let mut out = match &filter {
            None => rows.clone(),
            Some(f) => {
                let mut picked = Vec::new();
                for row in rows.iter() {
                    if matches(row, f)? {
                        picked.push(row.clone());
                    }
                }
                picked
            }
        };
        sort_rows(&mut out);
        Ok(out)
    }

    async fn get(&self, id: Uuid) -> Result<Option<M>, ServiceError> {
        Ok(self.rows.read().await.iter().find(|r| r.id() == id).cloned())
    }

    async fn insert(&self, row: M) -> Result<M, ServiceError> {
        self.ensure_writable()?;
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| r.id() == row.id()) {
            return Err(ServiceError::Validation(format!("duplicate id {}", row.id())));
        }
        ensure_unique(&rows, &row)?;
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, row: M) -> Result<M, ServiceError> {
        self.ensure_writable()?;
        let mut rows = self.rows.write().await;
        ensure_unique(&rows, &row)?;
        let slot = rows
            .iter_mut()
            .find(|r| r.id() == row.id())
            .ok_or_else(|| ServiceError::not_found(M::TABLE))?;
        *slot = row.clone();
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        self.ensure_writable()?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.id() != id);
        Ok(rows.len() != before)
    }

    async fn update_batch(&self, batch: Vec<M>) -> Result<(), ServiceError> {
        self.ensure_writable()?;
        let mut rows = self.rows.write().await;
        let known: HashSet<Uuid> = rows.iter().map(|r| r.id()).collect();
        if let Some(missing) = batch.iter().find(|r| !known.contains(&r.id())) {
            return Err(ServiceError::NotFound(format!("{} {} not found", M::TABLE, missing.id())));
        }
        let mut next = rows.clone();
        for row in &batch {
            if let Some(slot) = next.iter_mut().find(|r| r.id() == row.id()) {
                *slot = row.clone();
            }
        }
        for row in &batch {
            ensure_unique(&next, row)?;
        }
        *rows = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use models::{blog_post, profile, review, FilterValue};

    use super::*;

    fn review_at(name: &str, minutes: i64, approved: bool) -> review::Model {
        let input = review::CreateReview {
            client_name: name.into(),
            content: "Solid work".into(),
            rating: 5,
            approved,
            ..Default::default()
        };
        let at = Utc::now() + Duration::minutes(minutes);
        review::Model::build(Uuid::new_v4(), at.into(), input).unwrap()
    }

    #[tokio::test]
    async fn list_orders_newest_first_for_every_permutation() {
        let rows = [review_at("a", 1, true), review_at("b", 2, true), review_at("c", 3, true)];
        let perms = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for perm in perms {
            let repo = MemoryRepository::with_rows(perm.iter().map(|&i| rows[i].clone()).collect());
            let names: Vec<String> = repo.list(None).await.unwrap().into_iter().map(|r| r.client_name).collect();
            assert_eq!(names, ["c", "b", "a"], "permutation {perm:?}");
        }
    }

    #[tokio::test]
    async fn equality_filter_uses_field_values() {
        let repo = MemoryRepository::with_rows(vec![
            review_at("a", 1, true),
            review_at("b", 2, false),
            review_at("c", 3, true),
        ]);
        let approved = repo.list(Some(Filter::eq("approved", FilterValue::Bool(true)))).await.unwrap();
        assert_eq!(approved.len(), 2);
        assert!(approved.iter().all(|r| r.approved));
    }

    #[tokio::test]
    async fn read_only_rejects_writes() {
        let row = review_at("a", 0, true);
        let repo = MemoryRepository::read_only(vec![row.clone()]);
        assert!(matches!(repo.insert(review_at("b", 0, true)).await, Err(ServiceError::ReadOnly(_))));
        assert!(matches!(repo.delete(row.id).await, Err(ServiceError::ReadOnly(_))));
        assert_eq!(repo.list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn batch_with_unknown_row_changes_nothing() {
        let a = review_at("a", 0, false);
        let repo = MemoryRepository::with_rows(vec![a.clone()]);
        let mut a2 = a.clone();
        a2.approved = true;
        let ghost = review_at("ghost", 0, true);
        assert!(repo.update_batch(vec![a2, ghost]).await.is_err());
        assert!(!repo.get(a.id).await.unwrap().unwrap().approved);
    }

    #[tokio::test]
    async fn update_missing_row_is_not_found() {
        let repo = MemoryRepository::<review::Model>::new();
        assert!(matches!(repo.update(review_at("a", 0, true)).await, Err(ServiceError::NotFound(_))));
        assert!(!repo.delete(Uuid::new_v4()).await.unwrap());
    }

    fn post(title: &str, slug: &str) -> blog_post::Model {
        let input = blog_post::CreateBlogPost {
            title: title.into(),
            slug: Some(slug.into()),
            content: "Body".into(),
            ..Default::default()
        };
        blog_post::Model::build(Uuid::new_v4(), Utc::now().into(), input).unwrap()
    }

    #[tokio::test]
    async fn unique_columns_reject_repeated_values() {
        let repo = MemoryRepository::new();
        let first = repo.insert(post("Launch", "launch")).await.unwrap();
        assert!(matches!(repo.insert(post("Launch again", "launch")).await, Err(ServiceError::Conflict(_))));

        let second = repo.insert(post("Other", "other")).await.unwrap();
        let mut renamed = second.clone();
        renamed.slug = "launch".into();
        assert!(matches!(repo.update(renamed).await, Err(ServiceError::Conflict(_))));
        assert_eq!(repo.get(second.id).await.unwrap().unwrap().slug, "other");

        let mut same = first.clone();
        same.title = "Launch day".into();
        repo.update(same).await.unwrap();
        assert_eq!(repo.list(None).await.unwrap().len(), 2);

        let emails = MemoryRepository::new();
        let person = |email: &str| {
            let input = profile::CreateProfile { email: email.into(), full_name: "Amal".into(), ..Default::default() };
            profile::Model::build(Uuid::new_v4(), Utc::now().into(), input).unwrap()
        };
        emails.insert(person("amal@example.com")).await.unwrap();
        assert!(matches!(emails.insert(person("AMAL@example.com")).await, Err(ServiceError::Conflict(_))));
    }
}
