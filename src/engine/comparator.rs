//! Column ordering

use crate::core::criteria::SortSpec;
use crate::core::field::{FieldKind, FieldValue};
use crate::core::schema::{FieldDef, ViewSchema};
use std::cmp::Ordering;

/// Build the ordering for a sort column
///
/// Values that cannot be ordered for the field's kind (nulls, unparsable
/// dates, text in a number column) sort as greatest. The direction flips the
/// whole result, so in descending order those values come first. A column the
/// schema does not declare, or declares as not sortable, compares everything
/// as equal, which keeps the input order under a stable sort.
pub fn build_comparator<'s, R>(
    schema: &'s ViewSchema<R>,
    sort: &SortSpec,
) -> impl Fn(&R, &R) -> Ordering + use<'s, R> {
    let field = match schema.field(&sort.field) {
        Some(field) if field.is_sortable() => Some(field),
        Some(_) => {
            tracing::trace!(field = %sort.field, "ignoring sort on non-sortable field");
            None
        }
        None => {
            tracing::trace!(field = %sort.field, "ignoring sort on unknown field");
            None
        }
    };
    let direction = sort.direction;

    move |a: &R, b: &R| match field {
        Some(field) => direction.apply(compare_field(field, a, b)),
        None => Ordering::Equal,
    }
}

fn compare_field<R>(field: &FieldDef<R>, a: &R, b: &R) -> Ordering {
    compare_values(field.kind(), &field.value(a), &field.value(b))
}

/// Ascending comparison of two attribute values of the given kind
pub fn compare_values(kind: FieldKind, a: &FieldValue, b: &FieldValue) -> Ordering {
    match kind {
        FieldKind::Text | FieldKind::Enum => {
            greatest_if_none(text_key(a).as_deref(), text_key(b).as_deref(), compare_text)
        }
        FieldKind::Number => greatest_if_none(a.as_f64(), b.as_f64(), |x, y| x.total_cmp(&y)),
        FieldKind::Date => greatest_if_none(a.timestamp(), b.timestamp(), |x, y| x.cmp(&y)),
        FieldKind::Boolean => greatest_if_none(as_bool(a), as_bool(b), |x, y| x.cmp(&y)),
        FieldKind::List => greatest_if_none(list_len(a), list_len(b), |x, y| x.cmp(&y)),
    }
}

/// Alphabetical order: case-insensitive first, exact text as tiebreak
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn greatest_if_none<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn text_key(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::List(items) => items.first().and_then(FieldValue::label),
        other => other.label(),
    }
}

fn as_bool(value: &FieldValue) -> Option<bool> {
    match value {
        FieldValue::Boolean(b) => Some(*b),
        _ => None,
    }
}

fn list_len(value: &FieldValue) -> Option<usize> {
    match value {
        FieldValue::List(items) => Some(items.len()),
        FieldValue::Null => None,
        _ => Some(1),
    }
}

/// Stable in-place sort of rows by a column
pub fn sort<R>(rows: &mut [&R], schema: &ViewSchema<R>, sort: &SortSpec) {
    let cmp = build_comparator(schema, sort);
    rows.sort_by(|a, b| cmp(*a, *b));
}
