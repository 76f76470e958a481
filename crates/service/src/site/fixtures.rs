//! Static JSON content bundled with the front end.
//!
//! Each file is an array of create inputs for the table. Every entry goes
//! through the same validation as a dashboard create; `order` defaults to the
//! position in the file and `created_at` decreases with position so
//! newest-first lists keep the file order.

use std::path::Path;

use chrono::{Duration, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use models::{ModelError, Resource};

use crate::errors::ServiceError;

fn fill(obj: &mut Map<String, Value>, key: &str, value: Value) {
    obj.entry(key.to_string()).or_insert(value);
}

/// Parse `file` under `dir`; a missing file yields an empty list.
pub async fn load<M: Resource>(dir: &Path, file: &str, defaults: &[(&str, Value)]) -> Result<Vec<M>, ServiceError> {
    let path = dir.join(file);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "fixture file missing, serving empty list");
            return Ok(Vec::new());
        }
        Err(e) => return Err(ServiceError::Db(format!("{}: {e}", path.display()))),
    };
    let rows = parse::<M>(&bytes, defaults).map_err(|e| match e {
        ServiceError::Validation(msg) => ServiceError::Validation(format!("{file}: {msg}")),
        other => other,
    })?;
    info!(file, rows = rows.len(), table = M::TABLE, "fixtures loaded");
    Ok(rows)
}

/// Build rows from a JSON array of `M::Create` objects.
pub fn parse<M: Resource>(bytes: &[u8], defaults: &[(&str, Value)]) -> Result<Vec<M>, ServiceError> {
    let items: Vec<Value> = serde_json::from_slice(bytes).map_err(|e| ServiceError::Validation(e.to_string()))?;
    let base = Utc::now();
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let Value::Object(mut obj) = item else {
                return Err(ServiceError::Validation(format!("entry {i} is not an object")));
            };
            fill(&mut obj, "order", Value::from(i as i64));
            for (key, value) in defaults {
                fill(&mut obj, key, value.clone());
            }
            let input: M::Create = serde_json::from_value(Value::Object(obj))
                .map_err(|e| ServiceError::Validation(format!("entry {i}: {e}")))?;
            let stamp = (base - Duration::seconds(i as i64)).into();
            M::build(Uuid::new_v4(), stamp, input).map_err(|e| match e {
                ModelError::Validation(msg) => ServiceError::Validation(format!("entry {i}: {msg}")),
                other => ServiceError::Model(other),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use models::{offering, review};
    use serde_json::json;

    use super::*;
    use crate::repository::memory::sort_rows;

    #[test]
    fn fills_system_fields_and_keeps_file_order() {
        let raw = r#"[
            {"title": "Web", "description": "Sites", "icon": null},
            {"title": "Apps", "description": "Mobile", "translations": {"ar": {"title": "تطبيقات"}}}
        ]"#;
        let mut rows: Vec<offering::Model> = parse(raw.as_bytes(), &[]).unwrap();
        sort_rows(&mut rows);
        assert_eq!(rows[0].title, "Web");
        assert_eq!(rows[1].order, 1);
        assert_eq!(rows[1].translations["ar"]["title"], "تطبيقات");
    }

    #[test]
    fn defaults_apply_only_when_absent() {
        let raw = br#"[
            {"client_name": "A", "content": "good", "rating": 5},
            {"client_name": "B", "content": "meh", "rating": 3, "approved": false}
        ]"#;
        let rows: Vec<review::Model> = parse(raw, &[("approved", json!(true)), ("company", Value::Null)]).unwrap();
        assert!(rows[0].approved);
        assert!(!rows[1].approved);
    }

    #[test]
    fn malformed_entries_are_reported() {
        assert!(parse::<offering::Model>(b"[1]", &[]).is_err());
        assert!(parse::<offering::Model>(br#"[{"title": "x"}]"#, &[]).is_err());
        assert!(parse::<offering::Model>(b"{}", &[]).is_err());
    }

    #[test]
    fn entries_are_validated_like_dashboard_creates() {
        let bad_rating = br#"[{"client_name": "A", "content": "good", "rating": 0}]"#;
        let err = parse::<review::Model>(bad_rating, &[]).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m.starts_with("entry 0")), "{err:?}");

        let blank_title = br#"[{"title": "Web", "description": "Sites"}, {"title": "  ", "description": "x"}]"#;
        assert!(matches!(parse::<offering::Model>(blank_title, &[]), Err(ServiceError::Validation(m)) if m.starts_with("entry 1")));

        let bad_translations = br#"[{"title": "Web", "description": "Sites", "translations": {"fr": {"title": "x"}}}]"#;
        assert!(matches!(parse::<offering::Model>(bad_translations, &[]), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn explicit_order_wins_over_position() {
        let raw = br#"[{"title": "A", "description": "a", "order": 9}, {"title": "B", "description": "b"}]"#;
        let rows: Vec<offering::Model> = parse(raw, &[]).unwrap();
        assert_eq!(rows[0].order, 9);
        assert_eq!(rows[1].order, 1);
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = std::env::temp_dir().join(format!("fixtures_{}", Uuid::new_v4()));
        let rows = load::<offering::Model>(&dir, "services.json", &[]).await.unwrap();
        assert!(rows.is_empty());
    }
}
