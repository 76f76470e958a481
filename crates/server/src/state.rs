use std::path::Path;
use std::sync::Arc;

use common::Locale;
use configs::{AppConfig, ContentSource};
use service::auth::{AuthService, CatalogAuthRepository};
use service::cache::CacheSettings;
use service::contact::ContactService;
use service::preferences::PreferenceService;
use service::site::SiteContent;
use service::storage::KeyValueStore;
use service::Catalog;

pub type Auth = AuthService<CatalogAuthRepository>;

/// Everything a handler can reach. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub site: Arc<SiteContent>,
    pub contact: Arc<ContactService>,
    pub auth: Arc<Auth>,
    pub preferences: Arc<PreferenceService>,
    pub default_locale: Locale,
    pub cookie_secure: bool,
}

impl AppState {
    /// Wire the services over `catalog`; `store` holds visitor preferences.
    pub async fn from_config(
        cfg: &AppConfig,
        catalog: Catalog,
        store: Arc<dyn KeyValueStore>,
    ) -> anyhow::Result<Self> {
        let site = match cfg.content.source {
            ContentSource::Database => SiteContent::from_catalog(&catalog),
            ContentSource::Fixtures => {
                let settings = CacheSettings::from(&cfg.cache);
                SiteContent::from_fixtures(Path::new(&cfg.content.fixtures_dir), &catalog, settings).await?
            }
        };
        let contact = ContactService::from_config(catalog.messages.clone(), &cfg.email);
        let auth = AuthService::new(Arc::new(CatalogAuthRepository::new(&catalog)), (&cfg.auth).into());
        let default_locale = cfg.server.default_locale.parse().unwrap_or_default();

        Ok(Self {
            catalog: Arc::new(catalog),
            site: Arc::new(site),
            contact: Arc::new(contact),
            auth: Arc::new(auth),
            preferences: Arc::new(PreferenceService::new(store)),
            default_locale,
            cookie_secure: cfg.auth.cookie_secure,
        })
    }
}
