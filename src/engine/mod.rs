//! Filtering, ordering and summarizing engine

pub mod comparator;
pub mod predicate;
pub mod selection;
pub mod summary;
pub mod view;

pub use comparator::{build_comparator, compare_values};
pub use predicate::{filter, matches};
pub use selection::Selection;
pub use summary::{Summary, summarize};
pub use view::{DerivedView, ListView, SummaryScope, derive};
