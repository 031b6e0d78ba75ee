//! Three ERP list pages driven by the same engine
//!
//! This example demonstrates:
//! - A config-driven inventory page over JSON rows
//! - A typed invoices page with dates, range filters and selection
//! - An employees page with list-valued skills and per-department counts
//!
//! Run with `RUST_LOG=listview=debug` to see every recomputation.

use chrono::NaiveDate;
use listview::prelude::*;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Invoice {
    id: Uuid,
    number: String,
    customer: String,
    status: String,
    total: f64,
    due: NaiveDate,
}

impl Record for Invoice {
    type Id = Uuid;

    fn record_id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone)]
struct Employee {
    name: String,
    department: String,
    skills: Vec<String>,
    salary: f64,
    hours: f64,
    remote: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("ERP List View Example");
    println!("=====================\n");

    inventory_page()?;
    invoices_page()?;
    employees_page()?;

    Ok(())
}

fn inventory_page() -> anyhow::Result<()> {
    let config = ViewConfig::default_config();
    let schema = config.build_schema()?;
    let rows = vec![
        json!({"id": "P-100", "sku": "BLT-M8", "name": "Hex bolt M8", "category": "fasteners", "status": "active", "location": {"warehouse": "north"}, "quantity": 1200, "unit_cost": 0.12, "restocked_at": "2024-05-02"}),
        json!({"id": "P-101", "sku": "NUT-M8", "name": "Hex nut M8", "category": "fasteners", "status": "active", "location": {"warehouse": "north"}, "quantity": 8, "unit_cost": 0.05, "restocked_at": "2024-01-17"}),
        json!({"id": "P-200", "sku": "DRL-18V", "name": "Cordless drill", "category": "tools", "status": "active", "location": {"warehouse": "south"}, "quantity": 14, "unit_cost": 89.0, "restocked_at": "2024-04-11"}),
        json!({"id": "P-201", "sku": "SAW-CIR", "name": "Circular saw", "category": "tools", "status": "discontinued", "location": {"warehouse": "south"}, "quantity": 2, "unit_cost": 120.0, "restocked_at": null}),
    ];

    println!("Inventory ({} items)", rows.len());
    let mut view = ListView::new(&schema, &rows);
    print_summary(view.summary());

    view.set_categorical_filter("warehouse", "north");
    println!("  warehouse = north:");
    for row in view.visible_records() {
        println!("    {:<8} {:<14} qty {}", row["sku"], row["name"], row["quantity"]);
    }
    print_summary(view.summary());
    println!();
    Ok(())
}

fn invoices_page() -> anyhow::Result<()> {
    let schema = ViewSchema::builder()
        .with_field(FieldDef::text("number", |i: &Invoice| i.number.as_str().into()))
        .with_field(FieldDef::text("customer", |i: &Invoice| i.customer.as_str().into()))
        .with_field(FieldDef::enumeration("status", |i: &Invoice| i.status.as_str().into()))
        .with_field(FieldDef::number("total", |i: &Invoice| i.total.into()))
        .with_field(FieldDef::date("due", |i: &Invoice| i.due.into()))
        .with_active_rule(Condition::one_of("status", ["open", "overdue"]))
        .with_summary(SummaryDef::new("outstanding", Reducer::Sum { field: "total".into() }))
        .with_summary(SummaryDef::new("largest", Reducer::Max { field: "total".into() }))
        .with_summary(SummaryDef::new(
            "overdue_share",
            Reducer::Percentage {
                when: Condition::equals("status", "overdue"),
            },
        ))
        .with_default_sort(SortSpec::ascending("due"))
        .build()?;

    let invoice = |number: &str, customer: &str, status: &str, total: f64, due: (i32, u32, u32)| {
        Invoice {
            id: Uuid::new_v4(),
            number: number.to_string(),
            customer: customer.to_string(),
            status: status.to_string(),
            total,
            due: NaiveDate::from_ymd_opt(due.0, due.1, due.2).unwrap_or_default(),
        }
    };
    let invoices = vec![
        invoice("INV-1041", "Acme Corp", "paid", 1250.0, (2024, 3, 1)),
        invoice("INV-1042", "Globex", "overdue", 980.5, (2024, 2, 10)),
        invoice("INV-1043", "Acme Corp", "open", 430.0, (2024, 4, 30)),
        invoice("INV-1044", "Initech", "overdue", 2210.0, (2024, 1, 22)),
        invoice("INV-1045", "Umbrella", "draft", 75.0, (2024, 5, 15)),
    ];

    println!("Invoices ({} documents)", invoices.len());
    let mut view = ListView::new(&schema, &invoices);
    view.set_range_filter(RangeFilter::new("total", Comparison::Gte, 500.0));
    view.set_sort("total");
    view.set_sort("total");
    println!("  total >= 500, largest first:");
    for inv in view.visible_records() {
        println!("    {} {:<10} {:<8} {:>9.2} due {}", inv.number, inv.customer, inv.status, inv.total, inv.due);
    }
    print_summary(view.summary());

    let mut selection = Selection::new();
    selection.toggle_all(view.visible_records().iter().copied());
    let chasing: Vec<&str> = selection
        .selected_records(&invoices)
        .into_iter()
        .filter(|inv| inv.status == "overdue")
        .map(|inv| inv.number.as_str())
        .collect();
    println!("  selected {} rows, overdue among them: {:?}", selection.len(), chasing);

    let params: QueryParams = serde_json::from_value(json!({
        "search": "acme",
        "sort": "due:desc",
        "limit": 1,
        "page": 2
    }))?;
    view.set_criteria(params.to_criteria());
    let page = view.page(&params.page_request());
    println!(
        "  ?search=acme&sort=due:desc page {}/{}: {:?}",
        page.pagination.page,
        page.pagination.total_pages,
        page.data.iter().map(|inv| inv.number.as_str()).collect::<Vec<_>>()
    );
    println!();
    Ok(())
}

fn employees_page() -> anyhow::Result<()> {
    let schema = ViewSchema::builder()
        .with_field(FieldDef::text("name", |e: &Employee| e.name.as_str().into()))
        .with_field(FieldDef::enumeration("department", |e: &Employee| {
            e.department.as_str().into()
        }))
        .with_field(
            FieldDef::new("skills", FieldKind::List, |e: &Employee| e.skills.clone().into())
                .searchable(true)
                .filterable(true),
        )
        .with_field(FieldDef::number("salary", |e: &Employee| e.salary.into()))
        .with_field(FieldDef::number("hours", |e: &Employee| e.hours.into()))
        .with_field(FieldDef::new("remote", FieldKind::Boolean, |e: &Employee| e.remote.into()))
        .with_active_rule(Condition::equals("remote", "true"))
        .with_summary(SummaryDef::new("payroll", Reducer::Sum { field: "salary".into() }))
        .with_summary(SummaryDef::new(
            "hourly_weighted_salary",
            Reducer::WeightedAverage {
                field: "salary".into(),
                weight: "hours".into(),
            },
        ))
        .with_summary(SummaryDef::new(
            "by_department",
            Reducer::CountBy {
                field: "department".into(),
            },
        ))
        .with_default_sort(SortSpec::ascending("name"))
        .build()?;

    let employee = |name: &str, department: &str, skills: &[&str], salary: f64, hours: f64, remote: bool| {
        Employee {
            name: name.to_string(),
            department: department.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            salary,
            hours,
            remote,
        }
    };
    let staff = vec![
        employee("Noor Haddad", "Finance", &["sap", "excel"], 64000.0, 40.0, false),
        employee("Tomás Ruiz", "Warehouse", &["forklift"], 41000.0, 38.0, false),
        employee("Mei Lin", "Engineering", &["rust", "sql"], 92000.0, 40.0, true),
        employee("Ola Berg", "Engineering", &["sql", "excel"], 78000.0, 32.0, true),
    ];

    println!("Employees ({} people)", staff.len());
    let mut view = ListView::new(&schema, &staff);
    view.set_summary_scope(SummaryScope::All);
    view.set_categorical_filter("skills", "sql");
    println!("  skilled in sql:");
    for e in view.visible_records() {
        println!("    {:<12} {:<12} {:?}", e.name, e.department, e.skills);
    }
    println!("  company-wide:");
    print_summary(view.summary());

    view.reset();
    view.set_search_text("EXCEL");
    println!(
        "  search 'EXCEL': {:?}",
        view.visible_records().iter().map(|e| e.name.as_str()).collect::<Vec<_>>()
    );
    Ok(())
}

fn print_summary(summary: &Summary) {
    println!(
        "  {} records, {} active ({:.1}%)",
        summary.count,
        summary.active_count,
        summary.active_percentage()
    );
    for (name, value) in &summary.metrics {
        println!("    {name}: {value:.2}");
    }
    for (name, groups) in &summary.groups {
        println!("    {name}: {groups:?}");
    }
}
