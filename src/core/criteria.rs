//! Filter and sort criteria driven by list page controls

use crate::core::field::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// Sort direction of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    /// The opposite direction
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Parse `asc`/`desc` (and the long forms); anything else is ascending
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "desc" | "descending" => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }

    /// Flip an ascending comparison result when descending
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Sort field and direction
///
/// # Format
/// - `field:asc` or `field` (ascending)
/// - `field:desc` (descending)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Parse a `field:direction` expression
    ///
    /// Returns `None` when no field name is given.
    pub fn parse(expr: &str) -> Option<Self> {
        let (field, direction) = match expr.split_once(':') {
            Some((field, dir)) => (field.trim(), SortDirection::parse(dir)),
            None => (expr.trim(), SortDirection::Ascending),
        };

        if field.is_empty() {
            return None;
        }

        Some(Self {
            field: field.to_string(),
            direction,
        })
    }

    /// Same field, opposite direction
    pub fn toggled(&self) -> Self {
        Self {
            field: self.field.clone(),
            direction: self.direction.toggled(),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.direction.as_str())
    }
}

/// A dropdown-style filter on one field
///
/// Serialized as the raw control value, with `"all"` meaning no filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoricalFilter {
    All,
    Only(String),
}

impl CategoricalFilter {
    /// Read a dropdown value; exactly `all` means no filter
    pub fn from_input(value: &str) -> Self {
        if value == "all" {
            CategoricalFilter::All
        } else {
            CategoricalFilter::Only(value.to_string())
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, CategoricalFilter::Only(_))
    }

    /// Exact, case-sensitive label match; `All` accepts everything
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match self {
            CategoricalFilter::All => true,
            CategoricalFilter::Only(expected) => value.has_label(expected),
        }
    }
}

impl From<String> for CategoricalFilter {
    fn from(value: String) -> Self {
        CategoricalFilter::from_input(&value)
    }
}

impl From<&str> for CategoricalFilter {
    fn from(value: &str) -> Self {
        CategoricalFilter::from_input(value)
    }
}

impl From<CategoricalFilter> for String {
    fn from(value: CategoricalFilter) -> Self {
        match value {
            CategoricalFilter::All => "all".to_string(),
            CategoricalFilter::Only(v) => v,
        }
    }
}

/// Threshold comparison used by range filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Gt => ">",
            Comparison::Gte => ">=",
            Comparison::Lt => "<",
            Comparison::Lte => "<=",
        }
    }

    /// Whether `value.cmp(bound)` satisfies this comparison
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Comparison::Gt => ordering == Ordering::Greater,
            Comparison::Gte => ordering != Ordering::Less,
            Comparison::Lt => ordering == Ordering::Less,
            Comparison::Lte => ordering != Ordering::Greater,
        }
    }

    /// Split a query key such as `amount>=` into field and comparison
    pub fn split_key(key: &str) -> Option<(&str, Comparison)> {
        // Two-character operators first so `>=` is not read as `>`
        for (suffix, comparison) in [
            (">=", Comparison::Gte),
            ("<=", Comparison::Lte),
            (">", Comparison::Gt),
            ("<", Comparison::Lt),
        ] {
            if let Some(field) = key.strip_suffix(suffix) {
                let field = field.trim();
                if !field.is_empty() {
                    return Some((field, comparison));
                }
            }
        }
        None
    }
}

/// A numeric or date threshold on one field (`amount > 100`, `due <= 2024-06-30`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeFilter {
    pub field: String,
    pub comparison: Comparison,
    pub bound: FieldValue,
}

impl RangeFilter {
    pub fn new(field: impl Into<String>, comparison: Comparison, bound: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            comparison,
            bound: bound.into(),
        }
    }
}

/// Snapshot of the list controls: search box, dropdowns, thresholds, sort
///
/// Criteria carry no hidden state. Deriving a view from the same records and
/// the same criteria always yields the same rows in the same order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Criteria {
    /// Free-text search, matched literally (no trimming)
    pub search: String,

    /// Dropdown filters keyed by field name
    pub filters: IndexMap<String, CategoricalFilter>,

    /// Threshold filters
    pub ranges: Vec<RangeFilter>,

    /// Current sort column
    pub sort: Option<SortSpec>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<CategoricalFilter>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    pub fn with_range(mut self, range: RangeFilter) -> Self {
        self.ranges.push(range);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Add filters from a JSON query object
    ///
    /// # Format
    /// - Exact match: `{"status": "active"}` (`"all"` clears the field)
    /// - Comparison: `{"amount>": 100, "amount<=": 500, "due<": "2024-06-30"}`
    ///
    /// Non-object input is ignored.
    pub fn with_filter_json(mut self, filter: &Value) -> Self {
        let Some(obj) = filter.as_object() else {
            return self;
        };

        for (key, value) in obj {
            if let Some((field, comparison)) = Comparison::split_key(key) {
                self.ranges
                    .push(RangeFilter::new(field, comparison, FieldValue::from(value)));
                continue;
            }

            let filter = match value {
                Value::Null => CategoricalFilter::All,
                Value::String(s) => CategoricalFilter::from_input(s),
                other => match FieldValue::from(other).label() {
                    Some(label) => CategoricalFilter::Only(label),
                    None => continue,
                },
            };
            self.filters.insert(key.clone(), filter);
        }

        self
    }

    /// Dropdown filters that actually restrict rows
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters.iter().filter_map(|(field, filter)| match filter {
            CategoricalFilter::Only(value) => Some((field.as_str(), value.as_str())),
            CategoricalFilter::All => None,
        })
    }

    /// True when no control restricts the rows (sort does not count)
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_empty() && self.ranges.is_empty() && self.active_filters().next().is_none()
    }
}
