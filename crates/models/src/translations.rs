//! Per-locale overrides of display text stored in the `translations` column.
//!
//! Shape: `{ "en": { "title": "..." }, "ar": { "title": "..." } }`. A missing
//! or blank override falls back to the base column.

use common::Locale;
use sea_orm::prelude::Json;
use serde::Serialize;

use crate::errors::ModelError;

pub fn empty() -> Json {
    Json::Object(Default::default())
}

/// Check the column shape; `null` and absent are accepted as empty.
pub fn validate(value: &Json) -> Result<(), ModelError> {
    let map = match value {
        Json::Null => return Ok(()),
        Json::Object(map) => map,
        _ => return Err(ModelError::validation("translations must be an object")),
    };
    for (code, fields) in map {
        match code.parse::<Locale>() {
            Ok(locale) if locale.as_str() == code => {}
            _ => return Err(ModelError::validation(format!("unsupported locale key `{code}`"))),
        }
        let fields = fields
            .as_object()
            .ok_or_else(|| ModelError::validation(format!("translations.{code} must be an object")))?;
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_string()) {
            return Err(ModelError::validation(format!("translations.{code}.{name} must be a string")));
        }
    }
    Ok(())
}

pub fn normalize(value: Option<Json>) -> Result<Json, ModelError> {
    match value {
        None | Some(Json::Null) => Ok(empty()),
        Some(v) => {
            validate(&v)?;
            Ok(v)
        }
    }
}

fn lookup<'a>(translations: &'a Json, locale: Locale, field: &str) -> Option<&'a str> {
    translations
        .get(locale.as_str())
        .and_then(|m| m.get(field))
        .and_then(Json::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub fn pick(translations: &Json, locale: Locale, field: &str, base: &str) -> String {
    lookup(translations, locale, field).unwrap_or(base).to_string()
}

pub fn pick_opt(translations: &Json, locale: Locale, field: &str, base: Option<&str>) -> Option<String> {
    lookup(translations, locale, field).or(base).map(str::to_string)
}

/// Rows that render differently per locale.
pub trait Localize {
    type View: Serialize + Send;

    fn localize(&self, locale: Locale) -> Self::View;
}
