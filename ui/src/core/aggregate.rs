//! Group-by sums over expanded offender rows, feeding charts, headline cards and the summary table.
//!
//! Groups come out in ascending key order. Criteria group by their canonical JSON
//! text, so `null` and `""` stay separate groups.

use std::collections::{BTreeMap, HashSet};

use super::pipeline::{Criteria, ExpandedRow};

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub table: String,
    pub column: String,
    pub test_name: String,
    pub criteria: Criteria,
    pub occurrences: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestShare {
    pub test_name: String,
    pub occurrences: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestLocationShare {
    pub test_name: String,
    pub table: String,
    pub column: String,
    pub occurrences: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadlineMetrics {
    pub total_issues: f64,
    pub unique_tables: usize,
    pub unique_columns: usize,
    pub unique_tests: usize,
}

pub fn total_occurrences(rows: &[ExpandedRow]) -> f64 {
    rows.iter().map(|row| row.occurrences).sum()
}

pub fn headline_metrics(rows: &[ExpandedRow]) -> HeadlineMetrics {
    let distinct = |key: fn(&ExpandedRow) -> &str| {
        rows.iter().map(key).collect::<HashSet<_>>().len()
    };

    HeadlineMetrics {
        total_issues: total_occurrences(rows),
        unique_tables: distinct(|row| row.table.as_str()),
        unique_columns: distinct(|row| row.column.as_str()),
        unique_tests: distinct(|row| row.test_name.as_str()),
    }
}

/// Occurrences summed per (table, column, test, criteria).
pub fn summary_rows(rows: &[ExpandedRow]) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<(String, String, String, String), SummaryRow> = BTreeMap::new();
    for row in rows {
        let key = (
            row.table.clone(),
            row.column.clone(),
            row.test_name.clone(),
            row.criteria.key(),
        );
        groups
            .entry(key)
            .or_insert_with(|| SummaryRow {
                table: row.table.clone(),
                column: row.column.clone(),
                test_name: row.test_name.clone(),
                criteria: row.criteria.clone(),
                occurrences: 0.0,
            })
            .occurrences += row.occurrences;
    }
    groups.into_values().collect()
}

/// Occurrences per test with each test's share of the total.
pub fn occurrences_by_test(rows: &[ExpandedRow]) -> Vec<TestShare> {
    let mut groups: BTreeMap<&str, f64> = BTreeMap::new();
    for row in rows {
        *groups.entry(row.test_name.as_str()).or_default() += row.occurrences;
    }

    let total: f64 = groups.values().sum();
    groups
        .into_iter()
        .map(|(test_name, occurrences)| TestShare {
            test_name: test_name.to_string(),
            occurrences,
            percentage: share(occurrences, total),
        })
        .collect()
}

/// Occurrences per (test, table, column) with each group's share of the total.
pub fn occurrences_by_test_location(rows: &[ExpandedRow]) -> Vec<TestLocationShare> {
    let mut groups: BTreeMap<(&str, &str, &str), f64> = BTreeMap::new();
    for row in rows {
        let key = (
            row.test_name.as_str(),
            row.table.as_str(),
            row.column.as_str(),
        );
        *groups.entry(key).or_default() += row.occurrences;
    }

    let total: f64 = groups.values().sum();
    groups
        .into_iter()
        .map(|((test_name, table, column), occurrences)| TestLocationShare {
            test_name: test_name.to_string(),
            table: table.to_string(),
            column: column.to_string(),
            occurrences,
            percentage: share(occurrences, total),
        })
        .collect()
}

/// Percentage of `part` in `total`; zero when there is nothing to share.
fn share(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        part / total * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn row(table: &str, column: &str, test: &str, criteria: Criteria, n: f64) -> ExpandedRow {
        ExpandedRow {
            table: table.into(),
            column: column.into(),
            test_name: test.into(),
            criteria,
            offenders: format!("{table}.{column}"),
            occurrences: n,
            test_query: String::new(),
        }
    }

    fn sample() -> Vec<ExpandedRow> {
        vec![
            row("orders", "id", "not_null", Criteria(Value::Null), 2.0),
            row("orders", "id", "not_null", Criteria(Value::Null), 3.0),
            row("orders", "id", "not_null", Criteria::empty(), 1.0),
            row("customers", "email", "unique", Criteria::empty(), 4.0),
        ]
    }

    #[test]
    fn headline_counts() {
        let metrics = headline_metrics(&sample());
        assert_eq!(metrics.total_issues, 10.0);
        assert_eq!(metrics.unique_tables, 2);
        assert_eq!(metrics.unique_columns, 2);
        assert_eq!(metrics.unique_tests, 2);
        assert_eq!(headline_metrics(&[]), HeadlineMetrics::default());
    }

    #[test]
    fn summary_groups_by_all_four_dimensions() {
        let summary = summary_rows(&sample());
        assert_eq!(summary.len(), 3);

        assert_eq!(summary[0].table, "customers");
        assert_eq!(summary[0].occurrences, 4.0);

        let null_group = summary
            .iter()
            .find(|s| s.table == "orders" && s.criteria.is_null())
            .unwrap();
        assert_eq!(null_group.occurrences, 5.0);

        let empty_group = summary
            .iter()
            .find(|s| s.table == "orders" && s.criteria == Criteria::empty())
            .unwrap();
        assert_eq!(empty_group.occurrences, 1.0);
    }

    #[test]
    fn test_shares_sum_to_hundred() {
        let shares = occurrences_by_test(&sample());
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].test_name, "not_null");
        assert_eq!(shares[0].occurrences, 6.0);
        assert_eq!(shares[0].percentage, 60.0);
        let total: f64 = shares.iter().map(|s| s.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn location_shares() {
        let mut rows = sample();
        rows.push(row("customers", "id", "not_null", Criteria::empty(), 10.0));
        let shares = occurrences_by_test_location(&rows);
        assert_eq!(shares.len(), 3);
        assert_eq!(
            (shares[0].test_name.as_str(), shares[0].table.as_str()),
            ("not_null", "customers")
        );
        assert_eq!(shares[0].percentage, 50.0);
    }

    #[test]
    fn zero_total_has_zero_shares() {
        let rows = vec![row("t", "c", "x", Criteria::empty(), 0.0)];
        let shares = occurrences_by_test(&rows);
        assert_eq!(shares[0].percentage, 0.0);
    }
}
