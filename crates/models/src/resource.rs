//! Schema description shared by every table the generic CRUD layer serves.
//!
//! A [`Resource`] names its table, its list ordering and the fields that may
//! be used as an equality filter. Repositories use this to build queries (or
//! to emulate them in memory) without knowing the concrete entity.

use std::fmt::Debug;

use chrono::{DateTime, FixedOffset};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

pub type Timestamp = DateTime<FixedOffset>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortKey {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl SortKey {
    pub const fn asc(field: &'static str) -> Self {
        Self { field, direction: SortDirection::Asc }
    }

    pub const fn desc(field: &'static str) -> Self {
        Self { field, direction: SortDirection::Desc }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKind {
    Bool,
    Text,
    Uuid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterField {
    pub name: &'static str,
    pub kind: FilterKind,
}

impl FilterField {
    pub const fn new(name: &'static str, kind: FilterKind) -> Self {
        Self { name, kind }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Text(String),
    Uuid(Uuid),
}

impl FilterValue {
    pub fn parse(kind: FilterKind, raw: &str) -> Result<Self, ModelError> {
        let raw = raw.trim();
        match kind {
            FilterKind::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(FilterValue::Bool(true)),
                "false" | "0" => Ok(FilterValue::Bool(false)),
                _ => Err(ModelError::validation(format!("expected a boolean, got `{raw}`"))),
            },
            FilterKind::Text => Ok(FilterValue::Text(raw.to_string())),
            FilterKind::Uuid => raw
                .parse::<Uuid>()
                .map(FilterValue::Uuid)
                .map_err(|_| ModelError::validation(format!("expected a uuid, got `{raw}`"))),
        }
    }

    /// Compare against a field of a row serialized with `serde_json`.
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        use serde_json::Value;
        match (self, value) {
            (FilterValue::Bool(b), Value::Bool(v)) => b == v,
            (FilterValue::Text(s), Value::String(v)) => s == v,
            (FilterValue::Uuid(u), Value::String(v)) => v.parse::<Uuid>().map(|v| v == *u).unwrap_or(false),
            _ => false,
        }
    }
}

impl From<FilterValue> for sea_orm::Value {
    fn from(v: FilterValue) -> Self {
        match v {
            FilterValue::Bool(b) => b.into(),
            FilterValue::Text(s) => s.into(),
            FilterValue::Uuid(u) => u.into(),
        }
    }
}

/// Single equality predicate: `field = value`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Filter {
    pub field: &'static str,
    pub value: FilterValue,
}

impl Filter {
    pub fn eq(field: &'static str, value: FilterValue) -> Self {
        Self { field, value }
    }
}

/// Value a row is ordered by.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Int(i64),
    Time(Timestamp),
}

pub trait Resource: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Input accepted on create; never carries id or timestamps.
    type Create: DeserializeOwned + Debug + Send + 'static;
    /// Partial update; absent fields keep their value.
    type Patch: DeserializeOwned + Debug + Default + Send + 'static;

    const TABLE: &'static str;
    const SORT: SortKey;
    const FILTERS: &'static [FilterField] = &[];
    /// Columns whose values may appear on one row only.
    const UNIQUE: &'static [&'static str] = &[];

    fn id(&self) -> Uuid;

    fn build(id: Uuid, now: Timestamp, input: Self::Create) -> Result<Self, ModelError>;

    /// Apply `patch` and stamp `updated_at`.
    fn apply(&mut self, patch: Self::Patch, now: Timestamp) -> Result<(), ModelError>;

    fn sort_value(&self) -> SortValue;

    fn parse_filter(field: &str, raw: &str) -> Result<Filter, ModelError> {
        let spec = Self::FILTERS
            .iter()
            .find(|f| f.name == field)
            .ok_or_else(|| ModelError::validation(format!("`{field}` is not filterable on {}", Self::TABLE)))?;
        Ok(Filter::eq(spec.name, FilterValue::parse(spec.kind, raw)?))
    }
}

/// Rows with a display position (`order` column) that can be reordered.
pub trait Ordinal: Resource {
    fn ordinal(&self) -> i32;
    fn set_ordinal(&mut self, ordinal: i32, now: Timestamp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_values_parse_by_kind() {
        assert_eq!(FilterValue::parse(FilterKind::Bool, "TRUE").unwrap(), FilterValue::Bool(true));
        assert!(FilterValue::parse(FilterKind::Bool, "yes").is_err());
        assert!(FilterValue::parse(FilterKind::Uuid, "nope").is_err());
        let id = Uuid::new_v4();
        assert_eq!(FilterValue::parse(FilterKind::Uuid, &id.to_string()).unwrap(), FilterValue::Uuid(id));
    }

    #[test]
    fn filter_values_match_json_fields() {
        let id = Uuid::new_v4();
        assert!(FilterValue::Bool(false).matches(&json!(false)));
        assert!(!FilterValue::Bool(false).matches(&json!("false")));
        assert!(FilterValue::Text("web".into()).matches(&json!("web")));
        assert!(FilterValue::Uuid(id).matches(&json!(id.to_string())));
        assert!(!FilterValue::Uuid(id).matches(&serde_json::Value::Null));
    }

    #[test]
    fn sort_values_order_naturally() {
        assert!(SortValue::Int(1) < SortValue::Int(2));
        let early = DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap();
        let late = DateTime::parse_from_rfc3339("2024-01-01T03:00:00+02:00").unwrap();
        assert!(SortValue::Time(early) < SortValue::Time(late));
    }
}
