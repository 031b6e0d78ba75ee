//! Page configuration loading and merging
//!
//! A [`ViewConfig`] describes a list page over JSON rows: which attributes to
//! read, how to treat them, the active-record rule, the summary cards and the
//! default sort. Pages can be assembled from several YAML fragments with
//! [`ViewConfig::merge`].

use crate::core::criteria::SortSpec;
use crate::core::error::{ConfigError, Result};
use crate::core::field::{FieldKind, FieldValue};
use crate::core::schema::{Condition, FieldDef, Reducer, SummaryDef, ViewSchema};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// One attribute of a JSON row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Attribute name used by filters, sorts and summaries
    pub name: String,

    /// Kind alias (`text`, `number`, `currency`, `status`, `date`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Top-level key or JSON pointer (`/customer/name`); defaults to `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searchable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filterable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sortable: Option<bool>,
}

impl FieldConfig {
    pub fn new(name: impl Into<String>, kind: &str) -> Self {
        Self {
            name: name.into(),
            kind: Some(kind.to_string()),
            path: None,
            searchable: None,
            filterable: None,
            sortable: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Resolved kind; unknown aliases fall back to text
    pub fn field_kind(&self) -> FieldKind {
        let Some(alias) = self.kind.as_deref() else {
            return FieldKind::default();
        };
        FieldKind::from_alias(alias).unwrap_or_else(|| {
            tracing::warn!(field = %self.name, kind = %alias, "unknown field kind, treating as text");
            FieldKind::default()
        })
    }

    fn to_field_def(&self) -> FieldDef<Value> {
        let path = self.path.clone().unwrap_or_else(|| self.name.clone());
        let mut def = FieldDef::new(self.name.clone(), self.field_kind(), move |row: &Value| {
            lookup(row, &path).map(FieldValue::from).unwrap_or(FieldValue::Null)
        });
        if let Some(searchable) = self.searchable {
            def = def.searchable(searchable);
        }
        if let Some(filterable) = self.filterable {
            def = def.filterable(filterable);
        }
        if let Some(sortable) = self.sortable {
            def = def.sortable(sortable);
        }
        def
    }
}

fn lookup<'v>(row: &'v Value, path: &str) -> Option<&'v Value> {
    if path.starts_with('/') {
        row.pointer(path)
    } else {
        row.get(path)
    }
}

/// Complete configuration for one list page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Page name, used in logs
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub fields: Vec<FieldConfig>,

    /// Condition counted as "active" in the summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_rule: Option<Condition>,

    #[serde(default)]
    pub summaries: Vec<SummaryDef>,

    /// `field` or `field:asc|desc`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<String>,
}

impl ViewConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Merge page fragments in order
    ///
    /// Fields with the same name are replaced in place by later fragments,
    /// summaries are concatenated, and the last fragment that sets a name,
    /// active rule or default sort wins.
    pub fn merge(configs: Vec<ViewConfig>) -> Self {
        let mut name = String::new();
        let mut fields: IndexMap<String, FieldConfig> = IndexMap::new();
        let mut active_rule = None;
        let mut summaries = Vec::new();
        let mut default_sort = None;

        for config in configs {
            if !config.name.is_empty() {
                name = config.name;
            }
            for field in config.fields {
                if fields.contains_key(&field.name) {
                    tracing::debug!(field = %field.name, "field overridden by later config");
                }
                fields.insert(field.name.clone(), field);
            }
            if config.active_rule.is_some() {
                active_rule = config.active_rule;
            }
            summaries.extend(config.summaries);
            if config.default_sort.as_deref().is_some_and(|s| !s.trim().is_empty()) {
                default_sort = config.default_sort;
            }
        }

        Self {
            name,
            fields: fields.into_values().collect(),
            active_rule,
            summaries,
            default_sort,
        }
    }

    /// Build a schema over JSON rows
    pub fn build_schema(&self) -> Result<ViewSchema<Value>> {
        let mut builder = ViewSchema::builder();
        for field in &self.fields {
            builder = builder.with_field(field.to_field_def());
        }
        if let Some(rule) = &self.active_rule {
            builder = builder.with_active_rule(rule.clone());
        }
        for summary in &self.summaries {
            builder = builder.with_summary(summary.clone());
        }
        if let Some(sort) = self.default_sort.as_deref() {
            let spec = SortSpec::parse(sort).ok_or_else(|| ConfigError::Invalid {
                message: format!("default_sort '{sort}' is not a valid sort expression"),
            })?;
            builder = builder.with_default_sort(spec);
        }

        let schema = builder.build()?;
        tracing::debug!(
            page = %self.name,
            fields = self.fields.len(),
            summaries = self.summaries.len(),
            "built view schema from config"
        );
        Ok(schema)
    }

    /// Inventory page used by tests and demos
    pub fn default_config() -> Self {
        Self {
            name: "inventory".to_string(),
            fields: vec![
                FieldConfig::new("sku", "text"),
                FieldConfig::new("name", "text"),
                FieldConfig::new("category", "enum"),
                FieldConfig::new("status", "status"),
                FieldConfig::new("warehouse", "enum").with_path("/location/warehouse"),
                FieldConfig::new("quantity", "number"),
                FieldConfig::new("unit_cost", "currency"),
                FieldConfig::new("restocked_at", "date"),
            ],
            active_rule: Some(Condition::equals("status", "active")),
            summaries: vec![
                SummaryDef::new(
                    "total_quantity",
                    Reducer::Sum {
                        field: "quantity".to_string(),
                    },
                ),
                SummaryDef::new(
                    "low_stock",
                    Reducer::Count {
                        when: Condition::less_than("quantity", 10.0),
                    },
                ),
                SummaryDef::new(
                    "average_unit_cost",
                    Reducer::WeightedAverage {
                        field: "unit_cost".to_string(),
                        weight: "quantity".to_string(),
                    },
                ),
                SummaryDef::new(
                    "by_category",
                    Reducer::CountBy {
                        field: "category".to_string(),
                    },
                ),
            ],
            default_sort: Some("name:asc".to_string()),
        }
    }
}
