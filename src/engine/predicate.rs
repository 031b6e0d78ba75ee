//! Record inclusion tests

use crate::core::criteria::{Criteria, RangeFilter};
use crate::core::field::{FieldKind, FieldValue};
use crate::core::schema::ViewSchema;
use std::cmp::Ordering;

/// Whether a record passes the search box, every dropdown and every threshold
///
/// Dropdown and threshold criteria on fields the schema does not declare are
/// ignored.
pub fn matches<R>(record: &R, schema: &ViewSchema<R>, criteria: &Criteria) -> bool {
    matches_search(record, schema, &criteria.search)
        && matches_filters(record, schema, criteria)
        && criteria
            .ranges
            .iter()
            .all(|range| matches_range(record, schema, range))
}

/// Case-insensitive substring search over the searchable fields
///
/// An empty search matches everything. Whitespace is not trimmed.
pub fn matches_search<R>(record: &R, schema: &ViewSchema<R>, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }

    let needle = search.to_lowercase();
    schema
        .searchable_fields()
        .any(|field| field.value(record).contains_text(&needle))
}

/// Every active dropdown must match exactly (logical AND)
///
/// Dropdowns on fields that are undeclared or not filterable are ignored.
pub fn matches_filters<R>(record: &R, schema: &ViewSchema<R>, criteria: &Criteria) -> bool {
    criteria
        .filters
        .iter()
        .filter(|(_, filter)| filter.is_active())
        .all(|(key, filter)| match schema.field(key) {
            Some(field) if field.is_filterable() => filter.accepts(&field.value(record)),
            Some(_) => {
                tracing::trace!(field = %key, "ignoring filter on non-filterable field");
                true
            }
            None => {
                tracing::trace!(field = %key, "ignoring filter on unknown field");
                true
            }
        })
}

/// A threshold on a known field; values that cannot be compared fail it
pub fn matches_range<R>(record: &R, schema: &ViewSchema<R>, range: &RangeFilter) -> bool {
    let Some(field) = schema.field(&range.field) else {
        tracing::trace!(field = %range.field, "ignoring range on unknown field");
        return true;
    };

    let value = field.value(record);
    compare_to_bound(field.kind(), &value, &range.bound)
        .is_some_and(|ordering| range.comparison.holds(ordering))
}

fn compare_to_bound(kind: FieldKind, value: &FieldValue, bound: &FieldValue) -> Option<Ordering> {
    match kind {
        FieldKind::Date => {
            let (v, b) = (value.timestamp()?, bound.timestamp()?);
            Some(v.cmp(&b))
        }
        _ => {
            let (v, b) = (value.as_f64()?, numeric_bound(bound)?);
            v.partial_cmp(&b)
        }
    }
}

// Query strings deliver numbers as text ("amount>" = "100")
fn numeric_bound(bound: &FieldValue) -> Option<f64> {
    bound
        .as_f64()
        .or_else(|| bound.as_string().and_then(|s| s.trim().parse().ok()))
}

/// Keep matching records, preserving input order
pub fn filter<'a, R>(records: &'a [R], schema: &ViewSchema<R>, criteria: &Criteria) -> Vec<&'a R> {
    records
        .iter()
        .filter(|record| matches(*record, schema, criteria))
        .collect()
}

/// Readable form of a range, used in logs
pub(crate) fn describe_range(range: &RangeFilter) -> String {
    format!(
        "{} {} {}",
        range.field,
        range.comparison.symbol(),
        range.bound
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::criteria::{Comparison, SortSpec};
    use crate::core::schema::FieldDef;

    #[derive(Debug, PartialEq)]
    struct Invoice {
        number: &'static str,
        customer: &'static str,
        status: &'static str,
        amount: f64,
        due: &'static str,
        tags: Vec<&'static str>,
    }

    fn schema() -> ViewSchema<Invoice> {
        ViewSchema::builder()
            .with_field(FieldDef::text("number", |i: &Invoice| i.number.into()))
            .with_field(FieldDef::text("customer", |i: &Invoice| i.customer.into()))
            .with_field(FieldDef::enumeration("status", |i: &Invoice| i.status.into()))
            .with_field(FieldDef::number("amount", |i: &Invoice| i.amount.into()))
            .with_field(FieldDef::date("due", |i: &Invoice| i.due.into()))
            .with_field(
                FieldDef::new("tags", FieldKind::List, |i: &Invoice| i.tags.clone().into())
                    .filterable(true),
            )
            .build()
            .unwrap()
    }

    fn invoices() -> Vec<Invoice> {
        vec![
            Invoice {
                number: "INV-001",
                customer: "Acme Corp",
                status: "paid",
                amount: 1200.0,
                due: "2024-01-15",
                tags: vec!["export"],
            },
            Invoice {
                number: "INV-002",
                customer: "Globex",
                status: "overdue",
                amount: 450.0,
                due: "2024-02-01",
                tags: vec![],
            },
            Invoice {
                number: "INV-003",
                customer: "Acme Industrial",
                status: "overdue",
                amount: 3000.0,
                due: "not set",
                tags: vec!["export", "priority"],
            },
        ]
    }

    fn numbers(rows: &[&Invoice]) -> Vec<&'static str> {
        rows.iter().map(|i| i.number).collect()
    }

    #[test]
    fn test_empty_criteria_keeps_everything_in_order() {
        let data = invoices();
        let rows = filter(&data, &schema(), &Criteria::new());
        assert_eq!(numbers(&rows), vec!["INV-001", "INV-002", "INV-003"]);
    }

    #[test]
    fn test_empty_collection() {
        let rows = filter(&[], &schema(), &Criteria::new().with_search("x"));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_search_any_searchable_field() {
        let data = invoices();
        let rows = filter(&data, &schema(), &Criteria::new().with_search("ACME"));
        assert_eq!(numbers(&rows), vec!["INV-001", "INV-003"]);

        let rows = filter(&data, &schema(), &Criteria::new().with_search("inv-002"));
        assert_eq!(numbers(&rows), vec!["INV-002"]);
    }

    #[test]
    fn test_search_ignores_non_searchable_fields() {
        let data = invoices();
        // "overdue" only appears in the status enum, which is not searchable
        let rows = filter(&data, &schema(), &Criteria::new().with_search("overdue"));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_whitespace_search_is_literal() {
        let data = invoices();
        let rows = filter(&data, &schema(), &Criteria::new().with_search(" "));
        assert_eq!(numbers(&rows), vec!["INV-001", "INV-003"]);

        let rows = filter(&data, &schema(), &Criteria::new().with_search("acme "));
        assert_eq!(numbers(&rows), vec!["INV-001", "INV-003"]);

        let rows = filter(&data, &schema(), &Criteria::new().with_search(" acme"));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_categorical_and_search_combine() {
        let data = invoices();
        let criteria = Criteria::new()
            .with_search("acme")
            .with_filter("status", "overdue");
        let rows = filter(&data, &schema(), &criteria);
        assert_eq!(numbers(&rows), vec!["INV-003"]);
    }

    #[test]
    fn test_categorical_all_and_unknown_key_ignored() {
        let data = invoices();
        let criteria = Criteria::new()
            .with_filter("status", "all")
            .with_filter("warehouse", "north");
        assert_eq!(filter(&data, &schema(), &criteria).len(), 3);
    }

    #[test]
    fn test_filter_on_non_filterable_field_ignored() {
        let data = invoices();
        // customer is a text field, not filterable by default
        let criteria = Criteria::new().with_filter("customer", "Globex");
        assert_eq!(filter(&data, &schema(), &criteria).len(), 3);

        let schema = ViewSchema::builder()
            .with_field(
                FieldDef::enumeration("status", |i: &Invoice| i.status.into()).filterable(false),
            )
            .build()
            .unwrap();
        let criteria = Criteria::new().with_filter("status", "paid");
        assert_eq!(filter(&data, &schema, &criteria).len(), 3);
    }

    #[test]
    fn test_filter_on_opted_in_text_field() {
        let data = invoices();
        let schema = ViewSchema::builder()
            .with_field(
                FieldDef::text("customer", |i: &Invoice| i.customer.into()).filterable(true),
            )
            .build()
            .unwrap();
        let criteria = Criteria::new().with_filter("customer", "Globex");
        assert_eq!(numbers(&filter(&data, &schema, &criteria)), vec!["INV-002"]);
    }

    #[test]
    fn test_categorical_is_case_sensitive() {
        let data = invoices();
        let criteria = Criteria::new().with_filter("status", "Overdue");
        assert!(filter(&data, &schema(), &criteria).is_empty());
    }

    #[test]
    fn test_list_field_filter_matches_any_element() {
        let data = invoices();
        let criteria = Criteria::new().with_filter("tags", "priority");
        assert_eq!(numbers(&filter(&data, &schema(), &criteria)), vec!["INV-003"]);
    }

    #[test]
    fn test_numeric_range() {
        let data = invoices();
        let criteria = Criteria::new()
            .with_range(RangeFilter::new("amount", Comparison::Gte, 450.0))
            .with_range(RangeFilter::new("amount", Comparison::Lt, 3000.0));
        assert_eq!(
            numbers(&filter(&data, &schema(), &criteria)),
            vec!["INV-001", "INV-002"]
        );
    }

    #[test]
    fn test_numeric_range_accepts_text_bound() {
        let data = invoices();
        let criteria = Criteria::new().with_range(RangeFilter::new("amount", Comparison::Gt, "1000"));
        assert_eq!(
            numbers(&filter(&data, &schema(), &criteria)),
            vec!["INV-001", "INV-003"]
        );
    }

    #[test]
    fn test_date_range_excludes_unparsable() {
        let data = invoices();
        let criteria =
            Criteria::new().with_range(RangeFilter::new("due", Comparison::Lte, "2024-12-31"));
        assert_eq!(
            numbers(&filter(&data, &schema(), &criteria)),
            vec!["INV-001", "INV-002"]
        );
    }

    #[test]
    fn test_range_on_unknown_field_ignored() {
        let data = invoices();
        let criteria = Criteria::new().with_range(RangeFilter::new("weight", Comparison::Gt, 1.0));
        assert_eq!(filter(&data, &schema(), &criteria).len(), 3);
    }

    #[test]
    fn test_sort_does_not_affect_matching() {
        let data = invoices();
        let criteria = Criteria::new().with_sort(SortSpec::descending("amount"));
        assert_eq!(filter(&data, &schema(), &criteria).len(), 3);
    }

    #[test]
    fn test_describe_range() {
        let range = RangeFilter::new("amount", Comparison::Gte, 10i64);
        assert_eq!(describe_range(&range), "amount >= 10");
    }
}
