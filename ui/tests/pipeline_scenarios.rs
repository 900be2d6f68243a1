//! End-to-end runs of the offender pipeline over small hand-built tables.

use api::SourceRow;
use ui::core::aggregate::{headline_metrics, occurrences_by_test, summary_rows, total_occurrences};
use ui::core::filters::{Dimension, FilterSelection};
use serde_json::Value;
use ui::core::pipeline::{process_table, Criteria, ExpandedRow, PayloadField};
use ui::core::session::Granularity;
use ui::results::build_csv;

fn sample_table() -> Vec<SourceRow> {
    vec![
        SourceRow::new(
            "not_null",
            r#"{"TABLE_NAME":"orders","COLUMN_NAME":"customer_id"}"#,
            Some(r#"[{"OCCURRENCES":3,"OFFENDERS":"NULL"}]"#),
        )
        .with_query("select customer_id from orders"),
        SourceRow::new(
            "accepted_values",
            r#"{"TABLE_NAME":"orders_stage","TABLE_NAME_MAIN":"orders","COLUMN_NAME":"status","VALUE":["new","paid"]}"#,
            Some(r#"[{"OCCURRENCES":2,"OFFENDERS":"lost"},{"OCCURRENCES":1,"OFFENDERS":"void"}]"#),
        ),
        SourceRow::new(
            "unique",
            r#"{"TABLE_NAME":"customers","COLUMN_NAME":"email"}"#,
            Some(r#"[{"OCCURRENCES":4,"OFFENDERS":"a@example.com"}]"#),
        ),
        // Passing tests and scalar results never produce offender rows.
        SourceRow::new("row_count", r#"{"TABLE_NAME":"orders"}"#, Some("42")),
        SourceRow::new("freshness", r#"{"TABLE_NAME":"orders"}"#, None),
    ]
}

#[test]
fn not_null_failure_expands_to_a_single_row() {
    let rows = process_table(&sample_table()[..1]).unwrap();
    assert_eq!(
        rows,
        vec![ExpandedRow {
            table: "orders".into(),
            column: "customer_id".into(),
            test_name: "not_null".into(),
            criteria: Default::default(),
            offenders: "NULL".into(),
            occurrences: 3.0,
            test_query: "select customer_id from orders".into(),
        }]
    );
}

#[test]
fn explicit_null_criteria_survives_expansion() {
    let table = vec![SourceRow::new(
        "not_null",
        r#"{"TABLE_NAME":"orders","COLUMN_NAME":"id","VALUE":null}"#,
        Some(r#"[{"OCCURRENCES":2,"OFFENDERS":"row5,row9"}]"#),
    )];

    let rows = process_table(&table).unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.table, "orders");
    assert_eq!(row.column, "id");
    assert_eq!(row.test_name, "not_null");
    assert_eq!(row.criteria, Criteria(Value::Null));
    assert_ne!(row.criteria, Criteria::empty());
    assert_eq!(row.offenders, "row5,row9");
    assert_eq!(row.occurrences, 2.0);

    let csv = String::from_utf8(build_csv(&rows, Granularity::Detailed).unwrap()).unwrap();
    assert_eq!(
        csv.lines().nth(1),
        Some("orders,id,not_null,,\"row5,row9\",2,")
    );
}

#[test]
fn whole_table_keeps_source_and_array_order() {
    let rows = process_table(&sample_table()).unwrap();
    let offenders: Vec<&str> = rows.iter().map(|r| r.offenders.as_str()).collect();
    assert_eq!(offenders, ["NULL", "lost", "void", "a@example.com"]);
    // TABLE_NAME_MAIN wins over TABLE_NAME.
    assert_eq!(rows[1].table, "orders");
}

#[test]
fn reprocessing_yields_the_same_rows() {
    let table = sample_table();
    let first = process_table(&table).unwrap();
    let second = process_table(&table).unwrap();
    assert_eq!(first, second);
}

#[test]
fn summaries_preserve_total_occurrences() {
    let rows = process_table(&sample_table()).unwrap();
    let total = total_occurrences(&rows);
    assert_eq!(total, 10.0);

    let summary_total: f64 = summary_rows(&rows).iter().map(|r| r.occurrences).sum();
    let by_test_total: f64 = occurrences_by_test(&rows).iter().map(|r| r.occurrences).sum();
    assert_eq!(summary_total, total);
    assert_eq!(by_test_total, total);
    assert_eq!(headline_metrics(&rows).total_issues, total);
}

#[test]
fn filtering_restricts_every_downstream_view() {
    let rows = process_table(&sample_table()).unwrap();
    let mut filters = FilterSelection::new();
    filters.select(Dimension::Table, "customers");

    let filtered = filters.apply(&rows);
    assert_eq!(filtered.len(), 1);
    assert!(filtered.iter().all(|r| r.table == "customers"));

    let metrics = headline_metrics(&filtered);
    assert_eq!(metrics.total_issues, 4.0);
    assert_eq!(metrics.unique_tables, 1);

    let csv = String::from_utf8(build_csv(&filtered, Granularity::Summary).unwrap()).unwrap();
    assert_eq!(
        csv,
        "TABLE,COLUMN,TEST_NAME,CRITERIA,OCCURRENCES\ncustomers,email,unique,,4\n"
    );
}

#[test]
fn malformed_offender_payload_reports_the_row() {
    let mut table = sample_table();
    table[2].test_result_value = Some(r#"[{"OCCURRENCES":4,"#.to_string());

    let err = process_table(&table).unwrap_err();
    assert_eq!(err.row, 2);
    assert_eq!(err.error.field, PayloadField::TestResultValue);
}

#[test]
fn empty_table_produces_no_rows() {
    assert!(process_table(&[]).unwrap().is_empty());
}
