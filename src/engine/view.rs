//! List view controller
//!
//! [`ListView`] holds the current criteria for one page and re-derives the
//! visible rows and summary synchronously whenever a control changes. The
//! derivation itself is the pure function [`derive`].

use crate::core::criteria::{CategoricalFilter, Criteria, RangeFilter, SortSpec};
use crate::core::query::{Page, PageRequest, paginate};
use crate::core::schema::ViewSchema;
use crate::engine::comparator;
use crate::engine::predicate::{self, describe_range};
use crate::engine::summary::{Summary, summarize};
use serde::{Deserialize, Serialize};

/// Which records the summary cards are computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryScope {
    /// The whole collection, regardless of filters
    All,
    /// Only the rows currently visible
    #[default]
    Filtered,
}

/// Filtered and sorted rows plus their summary
#[derive(Debug)]
pub struct DerivedView<'a, R> {
    /// Visible rows, in display order
    pub rows: Vec<&'a R>,

    /// Summary over the rows or the full collection, per [`SummaryScope`]
    pub summary: Summary,

    /// Size of the underlying collection
    pub total: usize,
}

impl<'a, R> DerivedView<'a, R> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One page of the visible rows
    pub fn page(&self, request: &PageRequest) -> Page<&'a R> {
        paginate(&self.rows, request)
    }
}

impl<R> Clone for DerivedView<'_, R> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            summary: self.summary.clone(),
            total: self.total,
        }
    }
}

/// Filter, sort and summarize `records` under `criteria`
///
/// Pure: the same records, schema, criteria and scope always produce the same
/// rows in the same order and the same summary.
pub fn derive<'a, R>(
    records: &'a [R],
    schema: &ViewSchema<R>,
    criteria: &Criteria,
    scope: SummaryScope,
) -> DerivedView<'a, R> {
    let mut rows = predicate::filter(records, schema, criteria);
    if let Some(sort) = &criteria.sort {
        comparator::sort(&mut rows, schema, sort);
    }

    let summary = match scope {
        SummaryScope::All => summarize(records, schema),
        SummaryScope::Filtered => summarize(rows.iter().copied(), schema),
    };

    tracing::debug!(
        visible = rows.len(),
        total = records.len(),
        search = %criteria.search,
        sort = ?criteria.sort.as_ref().map(ToString::to_string),
        "list view derived"
    );
    for range in &criteria.ranges {
        tracing::trace!(range = %describe_range(range), "range filter applied");
    }

    DerivedView {
        rows,
        summary,
        total: records.len(),
    }
}

/// Stateful controller for one list page
///
/// # Example
///
/// ```ignore
/// let mut view = ListView::new(&schema, &invoices);
/// view.set_search_text("acme");
/// view.set_categorical_filter("status", "overdue");
/// view.set_sort("due_date");
/// for invoice in view.visible_records() { /* render row */ }
/// let overdue_total = view.summary().metric("total_amount");
/// ```
pub struct ListView<'a, R> {
    schema: &'a ViewSchema<R>,
    records: &'a [R],
    criteria: Criteria,
    scope: SummaryScope,
    view: DerivedView<'a, R>,
}

impl<'a, R> ListView<'a, R> {
    /// Start with no search, no filters and the schema's default sort
    pub fn new(schema: &'a ViewSchema<R>, records: &'a [R]) -> Self {
        Self::with_criteria(schema, records, Self::initial_criteria(schema))
    }

    pub fn with_criteria(schema: &'a ViewSchema<R>, records: &'a [R], criteria: Criteria) -> Self {
        let scope = SummaryScope::default();
        let view = derive(records, schema, &criteria, scope);
        Self {
            schema,
            records,
            criteria,
            scope,
            view,
        }
    }

    fn initial_criteria(schema: &ViewSchema<R>) -> Criteria {
        Criteria {
            sort: schema.default_sort().cloned(),
            ..Criteria::default()
        }
    }

    fn refresh(&mut self) {
        self.view = derive(self.records, self.schema, &self.criteria, self.scope);
    }

    // === Controls ===

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.criteria.search = text.into();
        self.refresh();
    }

    /// Set a dropdown; `"all"` clears it
    pub fn set_categorical_filter(&mut self, key: impl Into<String>, value: &str) {
        let key = key.into();
        if self.schema.field(&key).is_none() {
            tracing::trace!(field = %key, "filter set on a field the schema does not declare");
        }
        self.criteria
            .filters
            .insert(key, CategoricalFilter::from_input(value));
        self.refresh();
    }

    pub fn clear_filter(&mut self, key: &str) {
        self.criteria.filters.shift_remove(key);
        self.refresh();
    }

    /// Add a threshold, replacing one with the same field and comparison
    pub fn set_range_filter(&mut self, range: RangeFilter) {
        self.criteria
            .ranges
            .retain(|r| !(r.field == range.field && r.comparison == range.comparison));
        self.criteria.ranges.push(range);
        self.refresh();
    }

    /// Remove every threshold on `field`
    pub fn clear_range_filters(&mut self, field: &str) {
        self.criteria.ranges.retain(|r| r.field != field);
        self.refresh();
    }

    /// Column header click: same column toggles direction, a new column
    /// starts ascending
    pub fn set_sort(&mut self, key: impl Into<String>) {
        let key = key.into();
        let next = match &self.criteria.sort {
            Some(current) if current.field == key => current.toggled(),
            _ => SortSpec::ascending(key),
        };
        self.criteria.sort = Some(next);
        self.refresh();
    }

    pub fn set_sort_spec(&mut self, sort: Option<SortSpec>) {
        self.criteria.sort = sort;
        self.refresh();
    }

    /// Replace all criteria at once (restoring a saved view, applying query params)
    pub fn set_criteria(&mut self, criteria: Criteria) {
        self.criteria = criteria;
        self.refresh();
    }

    /// Point the view at a new snapshot of the collection
    pub fn set_records(&mut self, records: &'a [R]) {
        self.records = records;
        self.refresh();
    }

    pub fn set_summary_scope(&mut self, scope: SummaryScope) {
        self.scope = scope;
        self.refresh();
    }

    /// Clear search and filters and restore the default sort
    pub fn reset(&mut self) {
        self.criteria = Self::initial_criteria(self.schema);
        self.refresh();
    }

    // === Derived state ===

    pub fn visible_records(&self) -> &[&'a R] {
        &self.view.rows
    }

    pub fn summary(&self) -> &Summary {
        &self.view.summary
    }

    pub fn view(&self) -> &DerivedView<'a, R> {
        &self.view
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn summary_scope(&self) -> SummaryScope {
        self.scope
    }

    pub fn schema(&self) -> &'a ViewSchema<R> {
        self.schema
    }

    pub fn records(&self) -> &'a [R] {
        self.records
    }

    pub fn page(&self, request: &PageRequest) -> Page<&'a R> {
        self.view.page(request)
    }
}
