use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IdenStatic,
    IntoActiveModel, Iterable, PrimaryKeyTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use models::{Filter, Resource, SortDirection};

use super::Repository;
use crate::errors::ServiceError;

type EntityOf<A> = <A as ActiveModelTrait>::Entity;
type ModelOf<A> = <EntityOf<A> as EntityTrait>::Model;

/// SeaORM-backed repository, generic over the entity's `ActiveModel`.
pub struct SeaOrmRepository<A> {
    db: DatabaseConnection,
    _active: PhantomData<fn() -> A>,
}

impl<A> SeaOrmRepository<A> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db, _active: PhantomData }
    }
}

fn column<E: EntityTrait>(name: &str) -> Result<E::Column, ServiceError> {
    E::Column::iter()
        .find(|c| c.as_str() == name)
        .ok_or_else(|| ServiceError::Validation(format!("unknown column `{name}`")))
}

#[async_trait]
impl<A> Repository<ModelOf<A>> for SeaOrmRepository<A>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + Sync + 'static,
    ModelOf<A>: Resource + IntoActiveModel<A>,
    <<EntityOf<A> as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    async fn list(&self, filter: Option<Filter>) -> Result<Vec<ModelOf<A>>, ServiceError> {
        let mut query = EntityOf::<A>::find();
        if let Some(f) = filter {
            query = query.filter(column::<EntityOf<A>>(f.field)?.eq(f.value));
        }
        let sort = <ModelOf<A> as Resource>::SORT;
        let sort_col = column::<EntityOf<A>>(sort.field)?;
        query = match sort.direction {
            SortDirection::Asc => query.order_by_asc(sort_col),
            SortDirection::Desc => query.order_by_desc(sort_col),
        };
        let rows = query.all(&self.db).await?;
        debug!(table = <ModelOf<A> as Resource>::TABLE, rows = rows.len(), "list");
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ModelOf<A>>, ServiceError> {
        Ok(EntityOf::<A>::find_by_id(id).one(&self.db).await?)
    }

    async fn insert(&self, row: ModelOf<A>) -> Result<ModelOf<A>, ServiceError> {
        Ok(row.into_active_model().reset_all().insert(&self.db).await?)
    }

    async fn update(&self, row: ModelOf<A>) -> Result<ModelOf<A>, ServiceError> {
        Ok(row.into_active_model().reset_all().update(&self.db).await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = EntityOf::<A>::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn update_batch(&self, rows: Vec<ModelOf<A>>) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        for row in rows {
            // dropping `txn` on the error path rolls the batch back
            row.into_active_model().reset_all().update(&txn).await?;
        }
        txn.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use models::{offering, FilterValue};

    use super::*;
    use crate::test_support::get_db;

    fn service(title: &str, order: i32) -> offering::Model {
        let input = offering::CreateService {
            title: title.into(),
            description: "desc".into(),
            order: Some(order),
            ..Default::default()
        };
        offering::Model::build(Uuid::new_v4(), Utc::now().into(), input).unwrap()
    }

    #[tokio::test]
    async fn reorder_batch_is_atomic() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo: Arc<dyn Repository<offering::Model>> = Arc::new(SeaOrmRepository::<offering::ActiveModel>::new(db));

        let a = repo.insert(service("A", 500)).await?;
        let b = repo.insert(service("B", 501)).await?;

        let mut a2 = a.clone();
        a2.order = 900;
        let ghost = service("ghost", 901);
        assert!(repo.update_batch(vec![a2, ghost]).await.is_err());
        assert_eq!(repo.get(a.id).await?.map(|m| m.order), Some(500));

        let mut a3 = a.clone();
        let mut b3 = b.clone();
        a3.order = 502;
        b3.order = 499;
        repo.update_batch(vec![a3, b3]).await?;
        assert_eq!(repo.get(b.id).await?.map(|m| m.order), Some(499));

        assert!(repo.delete(a.id).await?);
        assert!(repo.delete(b.id).await?);
        assert!(!repo.delete(b.id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_and_orders_in_sql() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmRepository::<models::review::ActiveModel>::new(db);
        let mut ids = vec![];
        for (i, approved) in [true, false, true].into_iter().enumerate() {
            let input = models::review::CreateReview {
                client_name: format!("client {i}"),
                content: "ok".into(),
                rating: 4,
                approved,
                ..Default::default()
            };
            let at = Utc::now() + chrono::Duration::seconds(i as i64);
            let row = models::review::Model::build(Uuid::new_v4(), at.into(), input)?;
            ids.push(repo.insert(row).await?.id);
        }
        let approved = repo
            .list(Some(Filter::eq("approved", FilterValue::Bool(true))))
            .await?;
        let ours: Vec<Uuid> = approved.iter().map(|r| r.id).filter(|id| ids.contains(id)).collect();
        assert_eq!(ours, vec![ids[2], ids[0]]);
        for id in ids {
            repo.delete(id).await?;
        }
        Ok(())
    }
}
