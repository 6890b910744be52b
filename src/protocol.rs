//! Wire types of the update-check protocol.
//!
//! Request bodies are decoded from a raw `serde_json::Value` rather than
//! derived structs: each field has its own error code, malformed optional data
//! degrades to defaults, and the first failing check wins.

use crate::error::UpdateCheckError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Header key carrying a catalog's revision timestamp
pub const REVISION_DATE_KEY: &str = "PO-Revision-Date";

/// What the client already has installed for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CurrentTranslation {
    /// Missing or non-string revision dates are kept as `None` and compare
    /// as the oldest possible timestamp.
    #[serde(rename = "PO-Revision-Date", skip_serializing_if = "Option::is_none")]
    pub revision_date: Option<String>,
}

impl CurrentTranslation {
    pub fn new(revision_date: impl Into<String>) -> Self {
        Self {
            revision_date: Some(revision_date.into()),
        }
    }
}

/// A validated update-check request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCheckRequest {
    /// Project path, optionally prefixed with `/projects`
    pub item: String,
    /// Locale tags as sent by the client (e.g. `pl_PL`); non-string entries dropped
    pub locales: Vec<String>,
    /// Installed translations keyed by language code
    pub translations: BTreeMap<String, CurrentTranslation>,
}

impl UpdateCheckRequest {
    /// Decode and validate a raw request body.
    pub fn from_body(body: &[u8]) -> Result<Self, UpdateCheckError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|_| UpdateCheckError::InvalidData)?;
        Self::from_value(&value)
    }

    /// Validate an already-decoded JSON document.
    pub fn from_value(value: &Value) -> Result<Self, UpdateCheckError> {
        let data = value.as_object().ok_or(UpdateCheckError::InvalidData)?;

        let item = match data.get("item") {
            Some(Value::String(item)) if !item.is_empty() => item.clone(),
            _ => return Err(UpdateCheckError::InvalidItem),
        };

        let locales = match data.get("locale") {
            Some(Value::Array(tags)) if !tags.is_empty() => tags
                .iter()
                .filter_map(|tag| tag.as_str().map(str::to_string))
                .collect(),
            _ => return Err(UpdateCheckError::InvalidLocale),
        };

        let translations = parse_translations(data.get("translations"))?;

        Ok(Self {
            item,
            locales,
            translations,
        })
    }
}

/// Absent, null and empty-array values mean "nothing installed". PHP clients
/// encode an empty map as `[]`.
fn parse_translations(
    value: Option<&Value>,
) -> Result<BTreeMap<String, CurrentTranslation>, UpdateCheckError> {
    match value {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(Value::Array(entries)) if entries.is_empty() => Ok(BTreeMap::new()),
        Some(Value::Object(entries)) => Ok(entries
            .iter()
            .map(|(locale, entry)| (locale.clone(), current_translation(entry)))
            .collect()),
        Some(_) => Err(UpdateCheckError::InvalidTranslations),
    }
}

fn current_translation(entry: &Value) -> CurrentTranslation {
    let revision_date = entry
        .as_object()
        .and_then(|headers: &Map<String, Value>| headers.get(REVISION_DATE_KEY))
        .and_then(Value::as_str)
        .map(str::to_string);

    CurrentTranslation { revision_date }
}

/// Request body as sent by clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCheckPayload {
    pub item: String,
    pub locale: Vec<String>,
    #[serde(default)]
    pub translations: BTreeMap<String, CurrentTranslation>,
}

/// A translation package that is newer than what the client has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCandidate {
    pub language: String,
    pub updated: String,
    pub package: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Result<UpdateCheckRequest, UpdateCheckError> {
        UpdateCheckRequest::from_value(&value)
    }

    // ==================== Body Decoding Tests ====================

    #[test]
    fn test_from_body_valid() {
        let body = br#"{"item":"/projects/my-plugin","locale":["pl_PL"],"translations":{}}"#;
        let request = UpdateCheckRequest::from_body(body).unwrap();

        assert_eq!(request.item, "/projects/my-plugin");
        assert_eq!(request.locales, vec!["pl_PL"]);
        assert!(request.translations.is_empty());
    }

    #[test]
    fn test_from_body_not_json() {
        let result = UpdateCheckRequest::from_body(b"item=my-plugin");
        assert!(matches!(result, Err(UpdateCheckError::InvalidData)));
    }

    #[test]
    fn test_from_body_empty() {
        let result = UpdateCheckRequest::from_body(b"");
        assert!(matches!(result, Err(UpdateCheckError::InvalidData)));
    }

    #[test]
    fn test_non_object_is_invalid_data() {
        for value in [json!([1, 2]), json!("text"), json!(42), json!(null)] {
            assert!(matches!(parse(value), Err(UpdateCheckError::InvalidData)));
        }
    }

    // ==================== Item Validation Tests ====================

    #[test]
    fn test_item_missing() {
        let result = parse(json!({"locale": ["pl_PL"]}));
        assert!(matches!(result, Err(UpdateCheckError::InvalidItem)));
    }

    #[test]
    fn test_item_empty() {
        let result = parse(json!({"item": "", "locale": ["pl_PL"]}));
        assert!(matches!(result, Err(UpdateCheckError::InvalidItem)));
    }

    #[test]
    fn test_item_not_string() {
        let result = parse(json!({"item": ["my-plugin"], "locale": ["pl_PL"]}));
        assert!(matches!(result, Err(UpdateCheckError::InvalidItem)));
    }

    // ==================== Locale Validation Tests ====================

    #[test]
    fn test_locale_missing() {
        let result = parse(json!({"item": "my-plugin"}));
        assert!(matches!(result, Err(UpdateCheckError::InvalidLocale)));
    }

    #[test]
    fn test_locale_not_array() {
        let result = parse(json!({"item": "my-plugin", "locale": "pl_PL"}));
        assert!(matches!(result, Err(UpdateCheckError::InvalidLocale)));
    }

    #[test]
    fn test_locale_empty_array() {
        let result = parse(json!({"item": "my-plugin", "locale": []}));
        assert!(matches!(result, Err(UpdateCheckError::InvalidLocale)));
    }

    #[test]
    fn test_locale_drops_non_strings() {
        let request = parse(json!({"item": "my-plugin", "locale": ["pl_PL", 7, null, "de_DE"]}))
            .unwrap();
        assert_eq!(request.locales, vec!["pl_PL", "de_DE"]);
    }

    #[test]
    fn test_item_checked_before_locale() {
        let result = parse(json!({"item": 5, "locale": 5}));
        assert!(matches!(result, Err(UpdateCheckError::InvalidItem)));
    }

    // ==================== Translations Validation Tests ====================

    #[test]
    fn test_translations_absent_or_null() {
        let absent = parse(json!({"item": "p", "locale": ["pl"]})).unwrap();
        assert!(absent.translations.is_empty());

        let null = parse(json!({"item": "p", "locale": ["pl"], "translations": null})).unwrap();
        assert!(null.translations.is_empty());
    }

    #[test]
    fn test_translations_empty_array() {
        let request = parse(json!({"item": "p", "locale": ["pl"], "translations": []})).unwrap();
        assert!(request.translations.is_empty());
    }

    #[test]
    fn test_translations_invalid() {
        for bad in [json!("x"), json!(3), json!(["pl"])] {
            let result = parse(json!({"item": "p", "locale": ["pl"], "translations": bad}));
            assert!(matches!(result, Err(UpdateCheckError::InvalidTranslations)));
        }
    }

    #[test]
    fn test_translations_entries() {
        let request = parse(json!({
            "item": "p",
            "locale": ["pl"],
            "translations": {
                "pl": {"PO-Revision-Date": "2025-01-01 00:00:00", "Language": "pl_PL"},
                "de": {"Language": "de_DE"},
                "fr": "garbage"
            }
        }))
        .unwrap();

        assert_eq!(request.translations.len(), 3);
        assert_eq!(
            request.translations["pl"].revision_date.as_deref(),
            Some("2025-01-01 00:00:00")
        );
        assert_eq!(request.translations["de"].revision_date, None);
        assert_eq!(request.translations["fr"].revision_date, None);
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn test_candidate_serialization() {
        let candidate = UpdateCandidate {
            language: "pl".to_string(),
            updated: "2025-04-01 00:00:00".to_string(),
            package: "https://example.test/projects/p/pl/default/export-translations/?format=zip"
                .to_string(),
        };

        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["language"], "pl");
        assert_eq!(json["updated"], "2025-04-01 00:00:00");
        assert!(json["package"].as_str().unwrap().ends_with("?format=zip"));
    }

    #[test]
    fn test_payload_serializes_revision_header() {
        let mut payload = UpdateCheckPayload {
            item: "my-plugin".to_string(),
            locale: vec!["pl_PL".to_string()],
            ..Default::default()
        };
        payload
            .translations
            .insert("pl".to_string(), CurrentTranslation::new("2025-01-01 00:00:00"));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["translations"]["pl"]["PO-Revision-Date"], "2025-01-01 00:00:00");

        // The server accepts what the client sends
        let request = UpdateCheckRequest::from_value(&json).unwrap();
        assert_eq!(request.translations, payload.translations);
    }
}
