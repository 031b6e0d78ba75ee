//! Field value types extracted from records

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A polymorphic field value that can hold different types
///
/// Accessors in a [`ViewSchema`](crate::core::ViewSchema) turn a record
/// attribute into one of these; the engine never looks at the record itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    List(Vec<FieldValue>),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get the value as a UUID if possible
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            FieldValue::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    /// Get the nested values of a list
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Epoch milliseconds for date-like values
    ///
    /// Strings are parsed with [`parse_date`]; integers are taken as epoch
    /// milliseconds already. Everything else has no timestamp.
    pub fn timestamp(&self) -> Option<i64> {
        match self {
            FieldValue::DateTime(dt) => Some(dt.timestamp_millis()),
            FieldValue::Date(d) => d
                .and_hms_opt(0, 0, 0)
                .map(|naive| Utc.from_utc_datetime(&naive).timestamp_millis()),
            FieldValue::String(s) => parse_date(s).map(|dt| dt.timestamp_millis()),
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// String form used for categorical matching and group keys
    ///
    /// Lists and nulls have no single label.
    pub fn label(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Boolean(b) => Some(b.to_string()),
            FieldValue::Uuid(u) => Some(u.to_string()),
            FieldValue::DateTime(dt) => Some(dt.to_rfc3339()),
            FieldValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            FieldValue::List(_) | FieldValue::Null => None,
        }
    }

    /// Lower-cased label, the text the search box looks at
    pub fn search_text(&self) -> Option<String> {
        self.label().map(|label| label.to_lowercase())
    }

    /// Whether `needle` (already lower-cased) occurs in this value's text
    ///
    /// Lists match when any element matches.
    pub fn contains_text(&self, needle: &str) -> bool {
        match self {
            FieldValue::List(items) => items.iter().any(|item| item.contains_text(needle)),
            other => other
                .search_text()
                .is_some_and(|text| text.contains(needle)),
        }
    }

    /// Whether this value carries `label`, checking each element of a list
    pub fn has_label(&self, label: &str) -> bool {
        match self {
            FieldValue::List(items) => items.iter().any(|item| item.has_label(label)),
            other => other.label().is_some_and(|own| own == label),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            FieldValue::Null => write!(f, ""),
            other => write!(f, "{}", other.label().unwrap_or_default()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Uuid(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(value: Vec<T>) -> Self {
        FieldValue::List(value.into_iter().map(Into::into).collect())
    }
}

impl From<&serde_json::Value> for FieldValue {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => n.as_f64().map(FieldValue::Float).unwrap_or(FieldValue::Null),
            },
            Value::String(s) => FieldValue::String(s.clone()),
            Value::Array(items) => FieldValue::List(items.iter().map(FieldValue::from).collect()),
            // Nested objects have no scalar form
            Value::Object(_) => FieldValue::Null,
        }
    }
}

/// How the engine orders and compares a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text such as names, codes and descriptions
    #[default]
    Text,
    /// Integer or decimal quantities, amounts, rates
    Number,
    /// Enumerated labels such as status, category, priority
    Enum,
    /// Dates and timestamps
    Date,
    Boolean,
    /// Nested lists of values or sub-records
    List,
}

impl FieldKind {
    /// Resolve a kind from the names used in page configurations
    pub fn from_alias(alias: &str) -> Option<FieldKind> {
        match alias.trim().to_ascii_lowercase().as_str() {
            "text" | "string" | "str" => Some(FieldKind::Text),
            "number" | "numeric" | "integer" | "int" | "float" | "decimal" | "currency"
            | "money" | "percent" => Some(FieldKind::Number),
            "enum" | "status" | "label" | "category" => Some(FieldKind::Enum),
            "date" | "datetime" | "timestamp" => Some(FieldKind::Date),
            "bool" | "boolean" | "flag" => Some(FieldKind::Boolean),
            "list" | "array" | "tags" => Some(FieldKind::List),
            _ => None,
        }
    }
}

/// Parse the date formats found in ERP records
///
/// Accepts RFC 3339 (`2024-03-15T10:30:00Z`), `2024-03-15 10:30:00`,
/// `2024-03-15T10:30:00`, `2024-03-15` and `15/03/2024`. Naive values are
/// read as UTC.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    for format in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|naive| Utc.from_utc_datetime(&naive));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_value_string() {
        let value = FieldValue::String("test".to_string());
        assert_eq!(value.as_string(), Some("test"));
        assert_eq!(value.as_integer(), None);
        assert!(!value.is_null());
    }

    #[test]
    fn test_field_value_numbers_widen() {
        assert_eq!(FieldValue::Integer(42).as_f64(), Some(42.0));
        assert_eq!(FieldValue::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(FieldValue::String("42".into()).as_f64(), None);
    }

    #[test]
    fn test_field_value_null() {
        let value = FieldValue::Null;
        assert!(value.is_null());
        assert_eq!(value.label(), None);
        assert_eq!(value.timestamp(), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(FieldValue::from("active").label().as_deref(), Some("active"));
        assert_eq!(FieldValue::Integer(7).label().as_deref(), Some("7"));
        assert_eq!(FieldValue::Boolean(true).label().as_deref(), Some("true"));
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(FieldValue::Date(date).label().as_deref(), Some("2024-03-15"));
        assert_eq!(FieldValue::List(vec![]).label(), None);
    }

    #[test]
    fn test_search_text() {
        assert_eq!(FieldValue::from("ACME Ltd").search_text().as_deref(), Some("acme ltd"));
        assert_eq!(FieldValue::Null.search_text(), None);
    }

    #[test]
    fn test_contains_text_is_case_insensitive() {
        let value = FieldValue::from("Alpha Steel Ltd");
        assert!(value.contains_text("alp"));
        assert!(value.contains_text("steel"));
        assert!(!value.contains_text("beta"));
    }

    #[test]
    fn test_contains_text_searches_list_elements() {
        let value = FieldValue::from(vec!["Welding", "Painting"]);
        assert!(value.contains_text("paint"));
        assert!(!value.contains_text("assembly"));
    }

    #[test]
    fn test_has_label_on_list() {
        let value = FieldValue::from(vec!["hr", "finance"]);
        assert!(value.has_label("finance"));
        assert!(!value.has_label("Finance"));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        assert_eq!(parse_date("2024-03-15"), Some(expected));
        assert_eq!(parse_date("15/03/2024"), Some(expected));
        assert_eq!(parse_date("2024-03-15T00:00:00Z"), Some(expected));
        assert_eq!(parse_date("2024-03-15 00:00:00"), Some(expected));
        assert_eq!(parse_date("2024-03-15T02:00:00+02:00"), Some(expected));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("next tuesday"), None);
        assert_eq!(parse_date("2024-13-45"), None);
    }

    #[test]
    fn test_timestamp_from_each_date_form() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let millis = dt.timestamp_millis();
        assert_eq!(FieldValue::DateTime(dt).timestamp(), Some(millis));
        assert_eq!(
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).timestamp(),
            Some(millis)
        );
        assert_eq!(FieldValue::from("2024-01-01").timestamp(), Some(millis));
        assert_eq!(FieldValue::from("soon").timestamp(), None);
    }

    #[test]
    fn test_from_json_value() {
        assert_eq!(FieldValue::from(&json!("x")), FieldValue::from("x"));
        assert_eq!(FieldValue::from(&json!(3)), FieldValue::Integer(3));
        assert_eq!(FieldValue::from(&json!(1.5)), FieldValue::Float(1.5));
        assert_eq!(FieldValue::from(&json!(null)), FieldValue::Null);
        assert_eq!(
            FieldValue::from(&json!(["a", 1])),
            FieldValue::List(vec![FieldValue::from("a"), FieldValue::Integer(1)])
        );
        assert_eq!(FieldValue::from(&json!({"nested": true})), FieldValue::Null);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(FieldValue::from(None::<String>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some(5i64)), FieldValue::Integer(5));
    }

    #[test]
    fn test_kind_aliases() {
        assert_eq!(FieldKind::from_alias("currency"), Some(FieldKind::Number));
        assert_eq!(FieldKind::from_alias("Status"), Some(FieldKind::Enum));
        assert_eq!(FieldKind::from_alias(" datetime "), Some(FieldKind::Date));
        assert_eq!(FieldKind::from_alias("tags"), Some(FieldKind::List));
        assert_eq!(FieldKind::from_alias("blob"), None);
    }

    #[test]
    fn test_display_list() {
        let value = FieldValue::from(vec!["a", "b"]);
        assert_eq!(value.to_string(), "[a, b]");
        assert_eq!(FieldValue::Null.to_string(), "");
    }
}
