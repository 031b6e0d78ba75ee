//! Declarative page schemas
//!
//! A [`ViewSchema`] replaces the filter/sort/summary code each list page used
//! to duplicate: it says which attributes exist, how to read them from a
//! record, which ones the search box looks at, which ones dropdowns filter on,
//! which columns sort, and which summary cards to compute.

use crate::core::criteria::{Comparison, SortSpec};
use crate::core::error::{Result, SchemaError};
use crate::core::field::{FieldKind, FieldValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Extracts one attribute from a record
pub type Accessor<R> = Arc<dyn Fn(&R) -> FieldValue + Send + Sync>;

/// One attribute of a record type
pub struct FieldDef<R> {
    name: String,
    kind: FieldKind,
    accessor: Accessor<R>,
    searchable: bool,
    filterable: bool,
    sortable: bool,
}

impl<R> FieldDef<R> {
    /// Create a field with defaults derived from its kind
    ///
    /// Text fields are searchable, enum and boolean fields are filterable,
    /// every field except lists is sortable.
    pub fn new<F>(name: impl Into<String>, kind: FieldKind, accessor: F) -> Self
    where
        F: Fn(&R) -> FieldValue + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind,
            accessor: Arc::new(accessor),
            searchable: kind == FieldKind::Text,
            filterable: matches!(kind, FieldKind::Enum | FieldKind::Boolean),
            sortable: kind != FieldKind::List,
        }
    }

    pub fn text<F>(name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> FieldValue + Send + Sync + 'static,
    {
        Self::new(name, FieldKind::Text, accessor)
    }

    pub fn number<F>(name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> FieldValue + Send + Sync + 'static,
    {
        Self::new(name, FieldKind::Number, accessor)
    }

    pub fn enumeration<F>(name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> FieldValue + Send + Sync + 'static,
    {
        Self::new(name, FieldKind::Enum, accessor)
    }

    pub fn date<F>(name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> FieldValue + Send + Sync + 'static,
    {
        Self::new(name, FieldKind::Date, accessor)
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    pub fn is_filterable(&self) -> bool {
        self.filterable
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Read this attribute from a record
    pub fn value(&self, record: &R) -> FieldValue {
        (self.accessor)(record)
    }
}

impl<R> Clone for FieldDef<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            accessor: Arc::clone(&self.accessor),
            searchable: self.searchable,
            filterable: self.filterable,
            sortable: self.sortable,
        }
    }
}

impl<R> fmt::Debug for FieldDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("searchable", &self.searchable)
            .field("filterable", &self.filterable)
            .field("sortable", &self.sortable)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Conditions and summaries
// =============================================================================

/// Test applied to one attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOp {
    Equals(String),
    NotEquals(String),
    In(Vec<String>),
    GreaterThan(f64),
    LessThan(f64),
}

/// A per-record condition such as `status = active` or `quantity < 10`
///
/// # YAML
/// ```yaml
/// field: status
/// equals: active
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    #[serde(flatten)]
    pub op: ConditionOp,
}

impl Condition {
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: ConditionOp::Equals(value.into()),
        }
    }

    pub fn not_equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: ConditionOp::NotEquals(value.into()),
        }
    }

    pub fn one_of<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            op: ConditionOp::In(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn greater_than(field: impl Into<String>, bound: f64) -> Self {
        Self {
            field: field.into(),
            op: ConditionOp::GreaterThan(bound),
        }
    }

    pub fn less_than(field: impl Into<String>, bound: f64) -> Self {
        Self {
            field: field.into(),
            op: ConditionOp::LessThan(bound),
        }
    }

    /// Evaluate against the attribute value of one record
    pub fn holds(&self, value: &FieldValue) -> bool {
        match &self.op {
            ConditionOp::Equals(expected) => value.has_label(expected),
            ConditionOp::NotEquals(expected) => !value.has_label(expected),
            ConditionOp::In(allowed) => allowed.iter().any(|label| value.has_label(label)),
            ConditionOp::GreaterThan(bound) => Self::compare(value, *bound, Comparison::Gt),
            ConditionOp::LessThan(bound) => Self::compare(value, *bound, Comparison::Lt),
        }
    }

    fn compare(value: &FieldValue, bound: f64, comparison: Comparison) -> bool {
        value
            .as_f64()
            .and_then(|v| v.partial_cmp(&bound))
            .is_some_and(|ordering: Ordering| comparison.holds(ordering))
    }
}

/// Roll-up computed over a record set
///
/// Serialized with a `reducer` tag so page configs read naturally:
/// ```yaml
/// - name: total_value
///   reducer: sum
///   field: value
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reducer", rename_all = "snake_case")]
pub enum Reducer {
    /// Records satisfying a condition
    Count { when: Condition },
    Sum { field: String },
    /// Arithmetic mean, 0 for an empty set
    Average { field: String },
    /// `sum(field * weight) / sum(weight)`, 0 when the weights sum to 0
    WeightedAverage { field: String, weight: String },
    /// Share of records satisfying a condition, in percent
    Percentage { when: Condition },
    Min { field: String },
    Max { field: String },
    /// Record counts per distinct label, in first-seen order
    CountBy { field: String },
}

impl Reducer {
    /// Fields this reducer reads
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Reducer::Count { when } | Reducer::Percentage { when } => vec![when.field.as_str()],
            Reducer::Sum { field }
            | Reducer::Average { field }
            | Reducer::Min { field }
            | Reducer::Max { field }
            | Reducer::CountBy { field } => vec![field.as_str()],
            Reducer::WeightedAverage { field, weight } => vec![field.as_str(), weight.as_str()],
        }
    }
}

/// A named summary card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDef {
    pub name: String,
    #[serde(flatten)]
    pub reducer: Reducer,
}

impl SummaryDef {
    pub fn new(name: impl Into<String>, reducer: Reducer) -> Self {
        Self {
            name: name.into(),
            reducer,
        }
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Complete list page configuration for one record type
pub struct ViewSchema<R> {
    fields: IndexMap<String, FieldDef<R>>,
    active_rule: Option<Condition>,
    summaries: Vec<SummaryDef>,
    default_sort: Option<SortSpec>,
}

impl<R> ViewSchema<R> {
    pub fn builder() -> ViewSchemaBuilder<R> {
        ViewSchemaBuilder::new()
    }

    /// Declared fields, in declaration order
    pub fn fields(&self) -> impl ExactSizeIterator<Item = &FieldDef<R>> {
        self.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef<R>> {
        self.fields.get(name)
    }

    pub fn searchable_fields(&self) -> impl Iterator<Item = &FieldDef<R>> {
        self.fields.values().filter(|f| f.is_searchable())
    }

    pub fn filterable_fields(&self) -> impl Iterator<Item = &FieldDef<R>> {
        self.fields.values().filter(|f| f.is_filterable())
    }

    pub fn sortable_fields(&self) -> impl Iterator<Item = &FieldDef<R>> {
        self.fields.values().filter(|f| f.is_sortable())
    }

    /// Condition that makes a record count towards `active_count`
    pub fn active_rule(&self) -> Option<&Condition> {
        self.active_rule.as_ref()
    }

    pub fn summaries(&self) -> &[SummaryDef] {
        &self.summaries
    }

    pub fn default_sort(&self) -> Option<&SortSpec> {
        self.default_sort.as_ref()
    }

    /// Read a named attribute, `None` if the schema does not declare it
    pub fn value(&self, record: &R, field: &str) -> Option<FieldValue> {
        self.fields.get(field).map(|def| def.value(record))
    }

    /// Whether a record satisfies a condition; unknown fields never hold
    pub fn holds(&self, record: &R, condition: &Condition) -> bool {
        self.value(record, &condition.field)
            .is_some_and(|value| condition.holds(&value))
    }

    pub fn is_active(&self, record: &R) -> bool {
        self.active_rule
            .as_ref()
            .is_some_and(|rule| self.holds(record, rule))
    }
}

impl<R> Clone for ViewSchema<R> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            active_rule: self.active_rule.clone(),
            summaries: self.summaries.clone(),
            default_sort: self.default_sort.clone(),
        }
    }
}

impl<R> fmt::Debug for ViewSchema<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewSchema")
            .field("fields", &self.fields.values().collect::<Vec<_>>())
            .field("active_rule", &self.active_rule)
            .field("summaries", &self.summaries)
            .field("default_sort", &self.default_sort)
            .finish()
    }
}

/// Builder for [`ViewSchema`]
///
/// # Example
///
/// ```ignore
/// let schema = ViewSchema::<StockItem>::builder()
///     .with_field(FieldDef::text("name", |s: &StockItem| s.name.as_str().into()))
///     .with_field(FieldDef::enumeration("status", |s: &StockItem| s.status.as_str().into()))
///     .with_field(FieldDef::number("quantity", |s: &StockItem| s.quantity.into()))
///     .with_active_rule(Condition::equals("status", "active"))
///     .with_summary(SummaryDef::new("avg_qty", Reducer::Average { field: "quantity".into() }))
///     .build()?;
/// ```
pub struct ViewSchemaBuilder<R> {
    fields: Vec<FieldDef<R>>,
    active_rule: Option<Condition>,
    summaries: Vec<SummaryDef>,
    default_sort: Option<SortSpec>,
}

impl<R> ViewSchemaBuilder<R> {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            active_rule: None,
            summaries: Vec::new(),
            default_sort: None,
        }
    }

    pub fn with_field(mut self, field: FieldDef<R>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_active_rule(mut self, rule: Condition) -> Self {
        self.active_rule = Some(rule);
        self
    }

    pub fn with_summary(mut self, summary: SummaryDef) -> Self {
        self.summaries.push(summary);
        self
    }

    pub fn with_default_sort(mut self, sort: SortSpec) -> Self {
        self.default_sort = Some(sort);
        self
    }

    /// Validate references and build the schema
    pub fn build(self) -> Result<ViewSchema<R>> {
        let mut fields = IndexMap::with_capacity(self.fields.len());
        for field in self.fields {
            if field.name.trim().is_empty() {
                return Err(SchemaError::EmptyFieldName.into());
            }
            if fields.contains_key(&field.name) {
                return Err(SchemaError::DuplicateField { field: field.name }.into());
            }
            fields.insert(field.name.clone(), field);
        }

        let ensure_known = |context: String, field: &str| -> Result<()> {
            if fields.contains_key(field) {
                Ok(())
            } else {
                Err(SchemaError::UnknownField {
                    context,
                    field: field.to_string(),
                }
                .into())
            }
        };

        if let Some(rule) = &self.active_rule {
            ensure_known("active rule".to_string(), &rule.field)?;
        }
        if let Some(sort) = &self.default_sort {
            ensure_known("default sort".to_string(), &sort.field)?;
        }

        let mut seen = std::collections::HashSet::new();
        for summary in &self.summaries {
            if !seen.insert(summary.name.as_str()) {
                return Err(SchemaError::DuplicateSummary {
                    name: summary.name.clone(),
                }
                .into());
            }
            for field in summary.reducer.fields() {
                ensure_known(format!("summary '{}'", summary.name), field)?;
            }
        }

        Ok(ViewSchema {
            fields,
            active_rule: self.active_rule,
            summaries: self.summaries,
            default_sort: self.default_sort,
        })
    }
}

impl<R> Default for ViewSchemaBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}
