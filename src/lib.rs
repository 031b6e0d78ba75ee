//! # ERP List View
//!
//! A generic engine for the list pages of an ERP back office: inventory,
//! invoices, employees, purchase orders and the like. Every such page shows a
//! collection of records narrowed by a search box and a few dropdowns, ordered
//! by a clickable column, and topped with summary cards.
//!
//! ## Features
//!
//! - **Declarative Schemas**: Describe a page's fields once with [`ViewSchema`](core::schema::ViewSchema)
//! - **Search and Filters**: Case-insensitive search plus exact categorical and range filters
//! - **Stable Sorting**: Type-aware column ordering with missing values last
//! - **Summaries**: Counts, sums, averages and percentages that never divide by zero
//! - **Configuration-Based**: Define pages over JSON rows via YAML configuration
//! - **Selection and Pagination**: Identity-keyed row selection and page windows
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use listview::prelude::*;
//!
//! struct Invoice { number: String, customer: String, status: String, total: f64 }
//!
//! let schema = ViewSchema::builder()
//!     .with_field(FieldDef::text("number", |i: &Invoice| i.number.clone().into()))
//!     .with_field(FieldDef::text("customer", |i: &Invoice| i.customer.clone().into()))
//!     .with_field(FieldDef::enumeration("status", |i: &Invoice| i.status.clone().into()))
//!     .with_field(FieldDef::number("total", |i: &Invoice| i.total.into()))
//!     .with_active_rule(Condition::equals("status", "open"))
//!     .with_summary(SummaryDef::new("outstanding", Reducer::Sum { field: "total".into() }))
//!     .build()?;
//!
//! let mut view = ListView::new(&schema, &invoices);
//! view.set_search_text("acme");
//! view.set_categorical_filter("status", "open");
//! view.set_sort("total");
//!
//! let rows = view.visible_records();
//! let outstanding = view.summary().metric("outstanding");
//! ```

pub mod config;
pub mod core;
pub mod engine;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        criteria::{CategoricalFilter, Comparison, Criteria, RangeFilter, SortDirection, SortSpec},
        error::{ConfigError, Result, SchemaError, ViewError},
        field::{FieldKind, FieldValue},
        query::{Page, PageRequest, PaginationMeta, QueryParams},
        record::Record,
        schema::{Condition, ConditionOp, FieldDef, Reducer, SummaryDef, ViewSchema},
    };

    // === Engine ===
    pub use crate::engine::{
        DerivedView, ListView, Selection, Summary, SummaryScope, derive, summarize,
    };

    // === Config ===
    pub use crate::config::{FieldConfig, ViewConfig};
}
