//! Locale and text direction for the bilingual site.
//!
//! English is the base language; Arabic is rendered right-to-left. Locale
//! codes are accepted case-insensitively and with region suffixes
//! (`ar-EG`, `en_US`), so browser headers resolve without a lookup table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unsupported locale: {0}")]
pub struct UnsupportedLocale(pub String);

pub const LOCALES: [Locale; 2] = [Locale::En, Locale::Ar];

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Locale::En => Direction::Ltr,
            Locale::Ar => Direction::Rtl,
        }
    }

    /// The other language of the pair; backs the language toggle.
    pub fn toggle(self) -> Self {
        match self {
            Locale::En => Locale::Ar,
            Locale::Ar => Locale::En,
        }
    }

    /// First supported tag of an `Accept-Language` header, honouring q-values.
    /// `q=0` marks a language as not acceptable.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        let mut candidates: Vec<(f32, Locale)> = header
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.trim().split(';');
                let tag = pieces.next()?.trim();
                let q = pieces
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                if q.is_nan() || q <= 0.0 {
                    return None;
                }
                tag.parse::<Locale>().ok().map(|l| (q, l))
            })
            .collect();
        candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        candidates.first().map(|(_, l)| *l)
    }
}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Ok(Locale::En),
            "ar" => Ok(Locale::Ar),
            _ => Err(UnsupportedLocale(s.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

/// Resolve the effective locale for a request.
///
/// Resolution order (highest to lowest priority):
/// 1. Explicit request (`?lang=`), if supported
/// 2. Stored visitor preference, if supported
/// 3. `Accept-Language` header
/// 4. Server default
pub fn resolve_locale(
    requested: Option<&str>,
    stored: Option<&str>,
    accept_language: Option<&str>,
    server_default: Locale,
) -> Locale {
    requested
        .and_then(|l| l.parse().ok())
        .or_else(|| stored.and_then(|l| l.parse().ok()))
        .or_else(|| accept_language.and_then(Locale::from_accept_language))
        .unwrap_or(server_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arabic_is_rtl_english_is_ltr() {
        assert_eq!(Locale::Ar.direction(), Direction::Rtl);
        assert_eq!(Locale::En.direction(), Direction::Ltr);
    }

    #[test]
    fn parse_accepts_region_and_case() {
        assert_eq!("ar-EG".parse::<Locale>(), Ok(Locale::Ar));
        assert_eq!("EN_us".parse::<Locale>(), Ok(Locale::En));
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn toggle_flips_between_pair() {
        assert_eq!(Locale::En.toggle(), Locale::Ar);
        assert_eq!(Locale::En.toggle().toggle(), Locale::En);
    }

    #[test]
    fn accept_language_respects_quality() {
        assert_eq!(Locale::from_accept_language("fr-FR, en;q=0.5, ar;q=0.9"), Some(Locale::Ar));
        assert_eq!(Locale::from_accept_language("de, fr"), None);
    }

    #[test]
    fn accept_language_skips_zero_quality() {
        assert_eq!(Locale::from_accept_language("ar;q=0"), None);
        assert_eq!(Locale::from_accept_language("ar;q=0.0, en;q=0.1"), Some(Locale::En));
        assert_eq!(resolve_locale(None, None, Some("ar;q=0"), Locale::En), Locale::En);
    }

    #[test]
    fn resolution_order() {
        assert_eq!(resolve_locale(Some("ar"), Some("en"), None, Locale::En), Locale::Ar);
        assert_eq!(resolve_locale(Some("xx"), Some("ar"), None, Locale::En), Locale::Ar);
        assert_eq!(resolve_locale(None, None, Some("ar-SA"), Locale::En), Locale::Ar);
        assert_eq!(resolve_locale(None, Some("zz"), None, Locale::Ar), Locale::Ar);
    }

    #[test]
    fn serde_uses_lowercase_codes() {
        assert_eq!(serde_json::to_string(&Locale::Ar).unwrap(), "\"ar\"");
        assert_eq!(serde_json::to_string(&Direction::Rtl).unwrap(), "\"rtl\"");
    }
}
