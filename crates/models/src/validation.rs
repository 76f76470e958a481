//! Field-level checks shared by the entity constructors.

use crate::errors::ModelError;

/// Trimmed, non-empty text of at most `max` characters.
pub fn required(field: &str, value: &str, max: usize) -> Result<String, ModelError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ModelError::validation(format!("{field} is required")));
    }
    if v.chars().count() > max {
        return Err(ModelError::validation(format!("{field} must be at most {max} characters")));
    }
    Ok(v.to_string())
}

/// Blank strings collapse to `None`.
pub fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn email(value: &str) -> Result<String, ModelError> {
    let v = value.trim().to_lowercase();
    let valid = match v.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !v.contains(char::is_whitespace)
                && v.len() <= 255
        }
        None => false,
    };
    if !valid {
        return Err(ModelError::validation("invalid email address"));
    }
    Ok(v)
}

/// Lowercase ASCII words joined by `-`.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}

pub fn slug(value: &str) -> Result<String, ModelError> {
    let v = value.trim();
    let valid = !v.is_empty()
        && v.len() <= 255
        && v.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !v.starts_with('-')
        && !v.ends_with('-');
    if !valid {
        return Err(ModelError::validation("slug must be lowercase letters, digits and dashes"));
    }
    Ok(v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert_eq!(email(" Sara@Example.com ").unwrap(), "sara@example.com");
        assert!(email("no-at-sign").is_err());
        assert!(email("a@b").is_err());
        assert!(email("a b@c.com").is_err());
        assert!(email("@c.com").is_err());
    }

    #[test]
    fn required_trims_and_bounds() {
        assert_eq!(required("name", "  Ali ", 10).unwrap(), "Ali");
        assert!(required("name", "   ", 10).is_err());
        assert!(required("name", "abcdefghijk", 10).is_err());
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Hello, World -- 2024 "), "hello-world-2024");
        assert_eq!(slugify("مرحبا"), "");
        assert!(slug("hello-world").is_ok());
        assert!(slug("Hello").is_err());
        assert!(slug("-x").is_err());
    }

    #[test]
    fn optional_drops_blank() {
        assert_eq!(optional(Some("  ".into())), None);
        assert_eq!(optional(Some(" x ".into())), Some("x".into()));
    }
}
