//! Core types shared by every list page

pub mod criteria;
pub mod error;
pub mod field;
pub mod query;
pub mod record;
pub mod schema;

pub use criteria::{CategoricalFilter, Comparison, Criteria, RangeFilter, SortDirection, SortSpec};
pub use error::{ConfigError, Result, SchemaError, ViewError};
pub use field::{FieldKind, FieldValue};
pub use query::{Page, PageRequest, PaginationMeta, QueryParams};
pub use record::Record;
pub use schema::{Condition, ConditionOp, FieldDef, Reducer, SummaryDef, ViewSchema, ViewSchemaBuilder};
