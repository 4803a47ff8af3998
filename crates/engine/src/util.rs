//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use chrono::{NaiveDate, Utc};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Same as [`parse_uuid`] for nullable columns.
pub(crate) fn parse_optional_uuid(value: Option<&str>, label: &str) -> ResultEngine<Option<Uuid>> {
    value.map(|v| parse_uuid(v, label)).transpose()
}

/// Date stamped on every SDS state change.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Trim and NFC-normalize a name coming from a form.
///
/// Mobile keyboards may submit decomposed accents, stored names are composed.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!("{label} must not be empty")));
    }
    Ok(trimmed.nfc().collect())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.nfc().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_name_is_trimmed_and_composed() {
        let name = normalize_required_name("  Zoe\u{0301} ", "firstname").unwrap();
        assert_eq!(name, "Zo\u{00e9}");
    }

    #[test]
    fn required_name_rejects_blank() {
        let err = normalize_required_name("   ", "lastname").unwrap_err();
        assert_eq!(
            err,
            EngineError::Validation("lastname must not be empty".to_string())
        );
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(
            normalize_optional_text(Some(" a@b.ch ")),
            Some("a@b.ch".to_string())
        );
    }

    #[test]
    fn parse_uuid_labels_error() {
        let err = parse_uuid("nope", "sponsorship").unwrap_err();
        assert_eq!(err, EngineError::InvalidId("invalid sponsorship id".to_string()));
    }
}
