//! Per-visitor theme and language.
//!
//! Each field is stored under its own key, `{scope}:language` and
//! `{scope}:theme`, where the scope is the visitor id. Missing or
//! unrecognised stored values read as the defaults (`en`, `light`).

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

use common::{Direction, Locale};

use crate::errors::ServiceError;
use crate::storage::KeyValueStore;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ServiceError::Validation(format!("unknown theme `{other}`"))),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request-scoped preference context handed to handlers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitePreferences {
    pub language: Locale,
    pub theme: Theme,
}

impl SitePreferences {
    pub fn direction(&self) -> Direction {
        self.language.direction()
    }

    pub fn view(&self) -> PreferencesView {
        PreferencesView { language: self.language, theme: self.theme, direction: self.direction() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct PreferencesView {
    #[schema(value_type = String, example = "ar")]
    pub language: Locale,
    pub theme: Theme,
    #[schema(value_type = String, example = "rtl")]
    pub direction: Direction,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct PreferencesPatch {
    #[schema(value_type = Option<String>)]
    pub language: Option<Locale>,
    pub theme: Option<Theme>,
}

fn language_key(scope: &str) -> String {
    format!("{scope}:language")
}

fn theme_key(scope: &str) -> String {
    format!("{scope}:theme")
}

fn stored_language(raw: &str) -> Option<Locale> {
    raw.parse::<Locale>().ok().filter(|l| l.as_str() == raw)
}

pub struct PreferenceService {
    store: Arc<dyn KeyValueStore>,
}

impl PreferenceService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Language the visitor explicitly saved, if any.
    pub async fn saved_language(&self, scope: &str) -> Result<Option<Locale>, ServiceError> {
        Ok(self.store.read(&language_key(scope)).await?.and_then(|raw| stored_language(&raw)))
    }

    pub async fn load(&self, scope: &str) -> Result<SitePreferences, ServiceError> {
        let language = self.saved_language(scope).await?.unwrap_or_default();
        let theme = self
            .store
            .read(&theme_key(scope))
            .await?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        Ok(SitePreferences { language, theme })
    }

    #[instrument(skip(self))]
    pub async fn update(&self, scope: &str, patch: PreferencesPatch) -> Result<SitePreferences, ServiceError> {
        if let Some(language) = patch.language {
            self.store.write(&language_key(scope), language.as_str()).await?;
        }
        if let Some(theme) = patch.theme {
            self.store.write(&theme_key(scope), theme.as_str()).await?;
        }
        let prefs = self.load(scope).await?;
        debug!(language = %prefs.language, theme = %prefs.theme, "preferences saved");
        Ok(prefs)
    }

    pub async fn toggle_theme(&self, scope: &str) -> Result<SitePreferences, ServiceError> {
        let current = self.load(scope).await?;
        self.update(scope, PreferencesPatch { theme: Some(current.theme.toggle()), language: None }).await
    }

    pub async fn toggle_language(&self, scope: &str) -> Result<SitePreferences, ServiceError> {
        let current = self.load(scope).await?;
        self.update(scope, PreferencesPatch { language: Some(current.language.toggle()), theme: None }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonMapStore, MemoryStore};

    #[tokio::test]
    async fn defaults_are_english_light() {
        let svc = PreferenceService::new(Arc::new(MemoryStore::new()));
        let prefs = svc.load("visitor").await.unwrap();
        assert_eq!(prefs, SitePreferences { language: Locale::En, theme: Theme::Light });
        assert_eq!(prefs.direction(), Direction::Ltr);
    }

    #[tokio::test]
    async fn scopes_do_not_share_values() {
        let svc = PreferenceService::new(Arc::new(MemoryStore::new()));
        svc.toggle_theme("a").await.unwrap();
        assert_eq!(svc.load("a").await.unwrap().theme, Theme::Dark);
        assert_eq!(svc.load("b").await.unwrap().theme, Theme::Light);
    }

    #[tokio::test]
    async fn toggles_round_trip() {
        let svc = PreferenceService::new(Arc::new(MemoryStore::new()));
        assert_eq!(svc.toggle_language("v").await.unwrap().language, Locale::Ar);
        assert_eq!(svc.toggle_language("v").await.unwrap().language, Locale::En);
        assert_eq!(svc.toggle_theme("v").await.unwrap().theme, Theme::Dark);
        assert_eq!(svc.toggle_theme("v").await.unwrap().theme, Theme::Light);
    }

    #[tokio::test]
    async fn invalid_stored_values_read_as_defaults() {
        let store = Arc::new(MemoryStore::new());
        store.write("v:language", "fr").await.unwrap();
        store.write("v:theme", "sepia").await.unwrap();
        let svc = PreferenceService::new(store);
        assert_eq!(svc.load("v").await.unwrap(), SitePreferences::default());
        assert_eq!(svc.saved_language("v").await.unwrap(), None);
    }

    #[tokio::test]
    async fn saved_language_only_reports_explicit_choices() {
        let svc = PreferenceService::new(Arc::new(MemoryStore::new()));
        assert_eq!(svc.saved_language("v").await.unwrap(), None);
        svc.toggle_theme("v").await.unwrap();
        assert_eq!(svc.saved_language("v").await.unwrap(), None);
        svc.toggle_language("v").await.unwrap();
        assert_eq!(svc.saved_language("v").await.unwrap(), Some(Locale::Ar));
    }

    #[tokio::test]
    async fn toggles_survive_a_fresh_load_from_disk() -> Result<(), anyhow::Error> {
        let path = std::env::temp_dir().join(format!("prefs_{}.json", uuid::Uuid::new_v4()));
        {
            let svc = PreferenceService::new(JsonMapStore::<String, String>::open(&path).await?);
            svc.toggle_language("v").await?;
            svc.toggle_theme("v").await?;
        }
        let svc = PreferenceService::new(JsonMapStore::<String, String>::open(&path).await?);
        let prefs = svc.load("v").await?;
        assert_eq!(prefs.language, Locale::Ar);
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.view().direction, Direction::Rtl);
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
