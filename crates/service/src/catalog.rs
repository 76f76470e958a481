//! Every table's CRUD service, wired to one storage backend.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use models::{
    blog_post, company_history, contact_message, credential, offering, profile, project, review, site_statistic,
    task, team_member, Resource,
};

use crate::cache::CacheSettings;
use crate::crud::CrudService;
use crate::repository::{MemoryRepository, Repository, SeaOrmRepository};

pub struct Catalog {
    pub profiles: Arc<CrudService<profile::Model>>,
    pub credentials: Arc<CrudService<credential::Model>>,
    pub services: Arc<CrudService<offering::Model>>,
    pub team: Arc<CrudService<team_member::Model>>,
    pub projects: Arc<CrudService<project::Model>>,
    pub reviews: Arc<CrudService<review::Model>>,
    pub blog: Arc<CrudService<blog_post::Model>>,
    pub messages: Arc<CrudService<contact_message::Model>>,
    pub history: Arc<CrudService<company_history::Model>>,
    pub tasks: Arc<CrudService<task::Model>>,
    pub statistics: Arc<CrudService<site_statistic::Model>>,
}

fn crud<M: Resource>(repo: Arc<dyn Repository<M>>, settings: CacheSettings) -> Arc<CrudService<M>> {
    Arc::new(CrudService::new(repo, settings))
}

fn sql<A>(db: &DatabaseConnection) -> Arc<SeaOrmRepository<A>> {
    Arc::new(SeaOrmRepository::new(db.clone()))
}

fn mem<M: Resource>() -> Arc<dyn Repository<M>> {
    Arc::new(MemoryRepository::new())
}

impl Catalog {
    pub fn seaorm(db: &DatabaseConnection, settings: CacheSettings) -> Self {
        Self {
            profiles: crud(sql::<profile::ActiveModel>(db), settings),
            credentials: crud(sql::<credential::ActiveModel>(db), settings),
            services: crud(sql::<offering::ActiveModel>(db), settings),
            team: crud(sql::<team_member::ActiveModel>(db), settings),
            projects: crud(sql::<project::ActiveModel>(db), settings),
            reviews: crud(sql::<review::ActiveModel>(db), settings),
            blog: crud(sql::<blog_post::ActiveModel>(db), settings),
            messages: crud(sql::<contact_message::ActiveModel>(db), settings),
            history: crud(sql::<company_history::ActiveModel>(db), settings),
            tasks: crud(sql::<task::ActiveModel>(db), settings),
            statistics: crud(sql::<site_statistic::ActiveModel>(db), settings),
        }
    }

    /// Process-local storage; contents are lost on restart.
    pub fn memory(settings: CacheSettings) -> Self {
        Self {
            profiles: crud(mem(), settings),
            credentials: crud(mem(), settings),
            services: crud(mem(), settings),
            team: crud(mem(), settings),
            projects: crud(mem(), settings),
            reviews: crud(mem(), settings),
            blog: crud(mem(), settings),
            messages: crud(mem(), settings),
            history: crud(mem(), settings),
            tasks: crud(mem(), settings),
            statistics: crud(mem(), settings),
        }
    }
}
