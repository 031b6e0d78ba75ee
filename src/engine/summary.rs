//! Summary cards computed over a record set
//!
//! Every value is recomputed from scratch on each call. Empty sets and zero
//! denominators yield `0.0`, never NaN, so rendering code needs no guards.

use crate::core::schema::{Condition, Reducer, ViewSchema};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Roll-up statistics for one record set
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    /// Number of records summarized
    pub count: usize,

    /// Records satisfying the schema's active rule
    pub active_count: usize,

    /// Named numeric summaries, in schema order
    pub metrics: IndexMap<String, f64>,

    /// Named group counts (`CountBy` reducers), in schema order
    pub groups: IndexMap<String, IndexMap<String, usize>>,
}

impl Summary {
    /// A metric by name, `0.0` when absent
    pub fn metric(&self, name: &str) -> f64 {
        self.metrics.get(name).copied().unwrap_or(0.0)
    }

    /// Group counts by name
    pub fn group(&self, name: &str) -> Option<&IndexMap<String, usize>> {
        self.groups.get(name)
    }

    /// Share of active records in percent
    pub fn active_percentage(&self) -> f64 {
        percent(self.active_count, self.count)
    }
}

/// Compute the schema's summaries over `records`
///
/// Pass the full collection or the filtered rows; both are valid inputs.
pub fn summarize<'r, R, I>(records: I, schema: &ViewSchema<R>) -> Summary
where
    R: 'r,
    I: IntoIterator<Item = &'r R>,
{
    let records: Vec<&R> = records.into_iter().collect();

    let mut summary = Summary {
        count: records.len(),
        active_count: records.iter().filter(|r| schema.is_active(r)).count(),
        ..Summary::default()
    };

    for def in schema.summaries() {
        match &def.reducer {
            Reducer::CountBy { field } => {
                summary
                    .groups
                    .insert(def.name.clone(), count_by(&records, schema, field));
            }
            reducer => {
                let value = reduce(&records, schema, reducer);
                summary.metrics.insert(def.name.clone(), finite(value));
            }
        }
    }

    summary
}

fn reduce<R>(records: &[&R], schema: &ViewSchema<R>, reducer: &Reducer) -> f64 {
    match reducer {
        Reducer::Count { when } => count_where(records, schema, when) as f64,
        Reducer::Sum { field } => sum(records, schema, field),
        Reducer::Average { field } => average(records, schema, field),
        Reducer::WeightedAverage { field, weight } => {
            weighted_average(records, schema, field, weight)
        }
        Reducer::Percentage { when } => percentage(records, schema, when),
        Reducer::Min { field } => numbers(records, schema, field)
            .reduce(f64::min)
            .unwrap_or(0.0),
        Reducer::Max { field } => numbers(records, schema, field)
            .reduce(f64::max)
            .unwrap_or(0.0),
        // grouped separately in `summarize`
        Reducer::CountBy { .. } => 0.0,
    }
}

/// Numeric values of a field, skipping anything non-numeric
fn numbers<'a, R>(
    records: &'a [&'a R],
    schema: &'a ViewSchema<R>,
    field: &'a str,
) -> impl Iterator<Item = f64> + 'a {
    records
        .iter()
        .filter_map(move |record| schema.value(record, field)?.as_f64())
        .filter(|value| value.is_finite())
}

pub fn count_where<R>(records: &[&R], schema: &ViewSchema<R>, when: &Condition) -> usize {
    records.iter().filter(|r| schema.holds(r, when)).count()
}

pub fn sum<R>(records: &[&R], schema: &ViewSchema<R>, field: &str) -> f64 {
    finite(numbers(records, schema, field).sum())
}

/// Mean of the numeric values; 0 when there are none
pub fn average<R>(records: &[&R], schema: &ViewSchema<R>, field: &str) -> f64 {
    let (total, n) = numbers(records, schema, field).fold((0.0, 0usize), |(t, n), v| (t + v, n + 1));
    ratio(total, n as f64)
}

/// `sum(field * weight) / sum(weight)` over records where both are numeric
pub fn weighted_average<R>(records: &[&R], schema: &ViewSchema<R>, field: &str, weight: &str) -> f64 {
    let (weighted, weights) = records
        .iter()
        .filter_map(|record| {
            let value = schema.value(record, field)?.as_f64()?;
            let w = schema.value(record, weight)?.as_f64()?;
            (value.is_finite() && w.is_finite()).then_some((value, w))
        })
        .fold((0.0, 0.0), |(acc, total), (value, w)| (acc + value * w, total + w));
    ratio(weighted, weights)
}

/// Percentage of records satisfying `when`; 0 for an empty set
pub fn percentage<R>(records: &[&R], schema: &ViewSchema<R>, when: &Condition) -> f64 {
    percent(count_where(records, schema, when), records.len())
}

/// Record counts per label, in first-seen order
///
/// List values count once per element; nulls are grouped under `""`.
pub fn count_by<R>(records: &[&R], schema: &ViewSchema<R>, field: &str) -> IndexMap<String, usize> {
    let mut groups: IndexMap<String, usize> = IndexMap::new();
    for record in records {
        let Some(value) = schema.value(record, field) else {
            continue;
        };
        let labels: Vec<String> = match value.as_list() {
            Some(items) => items.iter().filter_map(|item| item.label()).collect(),
            None => vec![value.label().unwrap_or_default()],
        };
        for label in labels {
            *groups.entry(label).or_insert(0) += 1;
        }
    }
    groups
}

/// `numerator / denominator`, or 0 when the result would not be finite
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    finite(numerator / denominator)
}

fn percent(part: usize, whole: usize) -> f64 {
    ratio(part as f64 * 100.0, whole as f64)
}

fn finite(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{FieldDef, SummaryDef};
    use crate::core::field::FieldKind;

    struct Stock {
        sku: &'static str,
        category: &'static str,
        status: &'static str,
        qty: f64,
        unit_cost: Option<f64>,
        bins: Vec<&'static str>,
    }

    fn schema() -> ViewSchema<Stock> {
        ViewSchema::builder()
            .with_field(FieldDef::text("sku", |s: &Stock| s.sku.into()))
            .with_field(FieldDef::enumeration("category", |s: &Stock| s.category.into()))
            .with_field(FieldDef::enumeration("status", |s: &Stock| s.status.into()))
            .with_field(FieldDef::number("qty", |s: &Stock| s.qty.into()))
            .with_field(FieldDef::number("unit_cost", |s: &Stock| s.unit_cost.into()))
            .with_field(FieldDef::new("bins", FieldKind::List, |s: &Stock| s.bins.clone().into()))
            .with_active_rule(Condition::equals("status", "active"))
            .with_summary(SummaryDef::new("total_qty", Reducer::Sum { field: "qty".into() }))
            .with_summary(SummaryDef::new("avg_qty", Reducer::Average { field: "qty".into() }))
            .with_summary(SummaryDef::new(
                "avg_cost",
                Reducer::WeightedAverage {
                    field: "unit_cost".into(),
                    weight: "qty".into(),
                },
            ))
            .with_summary(SummaryDef::new(
                "low_stock",
                Reducer::Count {
                    when: Condition::less_than("qty", 10.0),
                },
            ))
            .with_summary(SummaryDef::new(
                "pct_raw",
                Reducer::Percentage {
                    when: Condition::equals("category", "raw"),
                },
            ))
            .with_summary(SummaryDef::new("min_qty", Reducer::Min { field: "qty".into() }))
            .with_summary(SummaryDef::new("max_qty", Reducer::Max { field: "qty".into() }))
            .with_summary(SummaryDef::new(
                "by_category",
                Reducer::CountBy {
                    field: "category".into(),
                },
            ))
            .with_summary(SummaryDef::new("by_bin", Reducer::CountBy { field: "bins".into() }))
            .build()
            .unwrap()
    }

    fn stock() -> Vec<Stock> {
        vec![
            Stock {
                sku: "RM-100",
                category: "raw",
                status: "active",
                qty: 40.0,
                unit_cost: Some(2.0),
                bins: vec!["A1"],
            },
            Stock {
                sku: "FG-200",
                category: "finished",
                status: "active",
                qty: 5.0,
                unit_cost: Some(10.0),
                bins: vec!["B1", "A1"],
            },
            Stock {
                sku: "RM-101",
                category: "raw",
                status: "discontinued",
                qty: 15.0,
                unit_cost: None,
                bins: vec![],
            },
        ]
    }

    #[test]
    fn test_summarize_full_set() {
        let data = stock();
        let summary = summarize(&data, &schema());

        assert_eq!(summary.count, 3);
        assert_eq!(summary.active_count, 2);
        assert_eq!(summary.metric("total_qty"), 60.0);
        assert_eq!(summary.metric("avg_qty"), 20.0);
        // (2*40 + 10*5) / (40 + 5); RM-101 has no cost and is skipped
        assert!((summary.metric("avg_cost") - 130.0 / 45.0).abs() < 1e-9);
        assert_eq!(summary.metric("low_stock"), 1.0);
        assert!((summary.metric("pct_raw") - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.metric("min_qty"), 5.0);
        assert_eq!(summary.metric("max_qty"), 40.0);

        let by_category = summary.group("by_category").unwrap();
        assert_eq!(by_category.get("raw"), Some(&2));
        assert_eq!(by_category.get("finished"), Some(&1));
        assert_eq!(by_category.keys().collect::<Vec<_>>(), vec!["raw", "finished"]);

        let by_bin = summary.group("by_bin").unwrap();
        assert_eq!(by_bin.get("A1"), Some(&2));
        assert_eq!(by_bin.get("B1"), Some(&1));
    }

    #[test]
    fn test_summarize_empty_is_all_zero() {
        let summary = summarize(std::iter::empty::<&Stock>(), &schema());

        assert_eq!(summary.count, 0);
        assert_eq!(summary.active_count, 0);
        assert_eq!(summary.active_percentage(), 0.0);
        for (name, value) in &summary.metrics {
            assert_eq!(*value, 0.0, "metric {} should be 0", name);
        }
        assert!(summary.group("by_category").unwrap().is_empty());
    }

    #[test]
    fn test_summarize_filtered_rows() {
        let data = stock();
        let schema = schema();
        let raw: Vec<&Stock> = data.iter().filter(|s| s.category == "raw").collect();
        let summary = summarize(raw.iter().copied(), &schema);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.metric("avg_qty"), 27.5);
        assert_eq!(summary.metric("pct_raw"), 100.0);
    }

    #[test]
    fn test_weighted_average_zero_weight() {
        let data = vec![Stock {
            sku: "X",
            category: "raw",
            status: "active",
            qty: 0.0,
            unit_cost: Some(4.0),
            bins: vec![],
        }];
        let summary = summarize(&data, &schema());
        assert_eq!(summary.metric("avg_cost"), 0.0);
    }

    #[test]
    fn test_active_percentage() {
        let data = stock();
        let summary = summarize(&data, &schema());
        assert!((summary.active_percentage() - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_metric_is_zero() {
        assert_eq!(Summary::default().metric("nope"), 0.0);
    }

    #[test]
    fn test_ratio_guards() {
        assert_eq!(ratio(0.0, 0.0), 0.0);
        assert_eq!(ratio(5.0, 0.0), 0.0);
        assert_eq!(ratio(f64::MAX, f64::MIN_POSITIVE), 0.0);
        assert_eq!(ratio(6.0, 3.0), 2.0);
    }

    #[test]
    fn test_standalone_helpers() {
        let data = stock();
        let schema = schema();
        let rows: Vec<&Stock> = data.iter().collect();
        assert_eq!(sum(&rows, &schema, "qty"), 60.0);
        assert_eq!(average(&rows, &schema, "unit_cost"), 6.0);
        assert_eq!(average(&rows, &schema, "missing"), 0.0);
        assert_eq!(
            percentage(&rows, &schema, &Condition::equals("status", "active")),
            200.0 / 3.0
        );
        assert_eq!(count_where(&[], &schema, &Condition::equals("status", "active")), 0);
    }
}
