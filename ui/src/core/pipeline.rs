//! Reshaping pipeline: raw result rows in, one row per offender out.
//!
//! Three steps, each usable on its own:
//! 1. [`filter_offender_rows`] keeps rows whose result payload is an offender array.
//! 2. [`parse_query_descriptor`] resolves table / column / criteria from `TEST_PARAMETERS`.
//! 3. [`expand_offenders`] turns the payload array into [`ExpandedRow`]s.
//!
//! [`process_table`] chains them over a whole table. Missing keys never fail;
//! they resolve to `""` (strings) or `0` (counts). Malformed JSON does fail,
//! and the first failure aborts the pass.

use std::fmt;

use api::SourceRow;
use serde::de::Error as _;
use serde_json::{Map, Value};

/// Result payloads carrying offender arrays always start with this literal.
pub const OFFENDER_PAYLOAD_PREFIX: &str = r#"[{"OCCURRENCES""#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadField {
    TestParameters,
    TestResultValue,
}

impl fmt::Display for PayloadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TestParameters => "TEST_PARAMETERS",
            Self::TestResultValue => "TEST_RESULT_VALUE",
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("malformed {field}: {source}")]
pub struct ParseError {
    pub field: PayloadField,
    #[source]
    pub source: serde_json::Error,
}

impl ParseError {
    fn new(field: PayloadField, source: serde_json::Error) -> Self {
        Self { field, source }
    }
}

/// A [`ParseError`] tagged with the index of the offending row in the source table.
#[derive(Debug, thiserror::Error)]
#[error("source row {row}: {error}")]
pub struct PipelineError {
    pub row: usize,
    #[source]
    pub error: ParseError,
}

/// The comparison value a test checked against. Kept as raw JSON so that an
/// explicit `null` stays distinguishable from a missing key (which resolves to `""`).
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria(pub Value);

impl Criteria {
    pub fn empty() -> Self {
        Self(Value::String(String::new()))
    }

    /// Canonical JSON text; unique per distinct value and used for grouping and filtering.
    pub fn key(&self) -> String {
        self.0.to_string()
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Text written to exported CSV (`null` becomes an empty field).
    pub fn csv_field(&self) -> String {
        match &self.0 {
            Value::Null => String::new(),
            other => value_text(other),
        }
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryDescriptor {
    pub table: String,
    pub column: String,
    pub criteria: Criteria,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OffenderRecord {
    pub offenders: String,
    pub occurrences: f64,
}

/// One offender of one test, flattened with its test's context.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpandedRow {
    pub table: String,
    pub column: String,
    pub test_name: String,
    pub criteria: Criteria,
    pub offenders: String,
    pub occurrences: f64,
    pub test_query: String,
}

/// `TEST_PARAMETERS` keys as found; `None` means the key was absent.
#[derive(Debug, Default)]
struct RawQueryParameters {
    table_name_main: Option<Value>,
    table_name: Option<Value>,
    column_name: Option<Value>,
    value: Option<Value>,
}

impl RawQueryParameters {
    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            table_name_main: map.remove("TABLE_NAME_MAIN"),
            table_name: map.remove("TABLE_NAME"),
            column_name: map.remove("COLUMN_NAME"),
            value: map.remove("VALUE"),
        }
    }

    fn resolve(self) -> QueryDescriptor {
        let table = match self.table_name_main {
            Some(main) if is_truthy(&main) => value_text(&main),
            _ => self.table_name.as_ref().map(value_text).unwrap_or_default(),
        };

        QueryDescriptor {
            table,
            column: self.column_name.as_ref().map(value_text).unwrap_or_default(),
            criteria: self.value.map(Criteria).unwrap_or_default(),
        }
    }
}

/// One element of the `TEST_RESULT_VALUE` array, keys as found.
#[derive(Debug, Default)]
struct RawOffender {
    offenders: Option<Value>,
    occurrences: Option<Value>,
}

impl RawOffender {
    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            offenders: map.remove("OFFENDERS"),
            occurrences: map.remove("OCCURRENCES"),
        }
    }

    fn resolve(self) -> Result<OffenderRecord, serde_json::Error> {
        let occurrences = match self.occurrences {
            None | Some(Value::Null) => 0.0,
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| {
                serde_json::Error::custom(format!("OCCURRENCES is not numeric: {s:?}"))
            })?,
            Some(other) => {
                return Err(serde_json::Error::custom(format!(
                    "OCCURRENCES is not numeric: {other}"
                )))
            }
        };

        Ok(OffenderRecord {
            offenders: self.offenders.as_ref().map(value_text).unwrap_or_default(),
            occurrences,
        })
    }
}

/// Whether a raw `TEST_RESULT_VALUE` carries an offender array.
pub fn is_offender_payload(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.starts_with(OFFENDER_PAYLOAD_PREFIX))
}

/// Rows carrying offender arrays, with their index in `rows`. Order is preserved.
pub fn filter_offender_rows(rows: &[SourceRow]) -> impl Iterator<Item = (usize, &SourceRow)> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| is_offender_payload(row.test_result_value.as_deref()))
}

pub fn parse_query_descriptor(test_parameters: &str) -> Result<QueryDescriptor, ParseError> {
    let map: Map<String, Value> = serde_json::from_str(test_parameters)
        .map_err(|err| ParseError::new(PayloadField::TestParameters, err))?;
    Ok(RawQueryParameters::from_map(map).resolve())
}

/// Parse the offender array of `row` and emit one [`ExpandedRow`] per element, in array order.
pub fn expand_offenders(
    row: &SourceRow,
    descriptor: &QueryDescriptor,
) -> Result<Vec<ExpandedRow>, ParseError> {
    let payload = row.test_result_value.as_deref().unwrap_or_default();
    let elements: Vec<Map<String, Value>> = serde_json::from_str(payload)
        .map_err(|err| ParseError::new(PayloadField::TestResultValue, err))?;

    elements
        .into_iter()
        .map(|element| {
            let offender = RawOffender::from_map(element)
                .resolve()
                .map_err(|err| ParseError::new(PayloadField::TestResultValue, err))?;
            Ok(ExpandedRow {
                table: descriptor.table.clone(),
                column: descriptor.column.clone(),
                test_name: row.test_name.clone(),
                criteria: descriptor.criteria.clone(),
                offenders: offender.offenders,
                occurrences: offender.occurrences,
                test_query: row.test_query.clone(),
            })
        })
        .collect()
}

/// Run filter, descriptor parsing, and expansion over a whole table.
pub fn process_table(rows: &[SourceRow]) -> Result<Vec<ExpandedRow>, PipelineError> {
    let mut expanded = Vec::new();
    for (index, row) in filter_offender_rows(rows) {
        let tag = |error| PipelineError { row: index, error };
        let descriptor = parse_query_descriptor(&row.test_parameters).map_err(tag)?;
        expanded.extend(expand_offenders(row, &descriptor).map_err(tag)?);
    }
    Ok(expanded)
}

/// Truthiness of a JSON value: `null`, `false`, `0`, `""`, `[]` and `{}` are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Text form of a descriptor value. Strings are taken verbatim, `null` is empty.
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(name: &str, params: &str, result: Option<&str>) -> SourceRow {
        SourceRow::new(name, params, result)
    }

    #[test]
    fn filter_keeps_only_offender_payloads() {
        let rows = vec![
            row("a", "{}", Some(r#"[{"OCCURRENCES": 1}]"#)),
            row("b", "{}", None),
            row("c", "{}", Some("PASSED")),
            row("d", "{}", Some(r#"[{"OFFENDERS": "x", "OCCURRENCES": 1}]"#)),
            row("e", "{}", Some(r#"[{"OCCURRENCES":4,"OFFENDERS":"y"}]"#)),
            row("f", "{}", Some(r#" [{"OCCURRENCES":4}]"#)),
        ];
        let kept: Vec<(usize, &str)> = filter_offender_rows(&rows)
            .map(|(i, r)| (i, r.test_name.as_str()))
            .collect();
        assert_eq!(kept, vec![(0, "a"), (4, "e")]);
        for (_, r) in filter_offender_rows(&rows) {
            assert!(r
                .test_result_value
                .as_deref()
                .unwrap()
                .starts_with(OFFENDER_PAYLOAD_PREFIX));
        }
    }

    #[test]
    fn table_prefers_main_name() {
        let d = parse_query_descriptor(r#"{"TABLE_NAME_MAIN":"A","TABLE_NAME":"B"}"#).unwrap();
        assert_eq!(d.table, "A");
        let d = parse_query_descriptor(r#"{"TABLE_NAME":"B"}"#).unwrap();
        assert_eq!(d.table, "B");
        let d = parse_query_descriptor("{}").unwrap();
        assert_eq!(d.table, "");
        assert_eq!(d.column, "");
        assert_eq!(d.criteria, Criteria::empty());
    }

    #[test]
    fn falsy_main_name_falls_through() {
        for main in [r#""""#, "null", "false", "0", "[]", "{}"] {
            let params = format!(r#"{{"TABLE_NAME_MAIN":{main},"TABLE_NAME":"B"}}"#);
            let d = parse_query_descriptor(&params).unwrap();
            assert_eq!(d.table, "B", "TABLE_NAME_MAIN={main}");
        }
    }

    #[test]
    fn criteria_keeps_explicit_null() {
        let d = parse_query_descriptor(r#"{"COLUMN_NAME":"id","VALUE":null}"#).unwrap();
        assert_eq!(d.column, "id");
        assert!(d.criteria.is_null());
        assert_eq!(d.criteria.csv_field(), "");

        let d = parse_query_descriptor(r#"{"VALUE":10}"#).unwrap();
        assert_eq!(d.criteria, Criteria(json!(10)));
        assert_eq!(d.criteria.csv_field(), "10");
    }

    #[test]
    fn malformed_parameters_are_errors() {
        let err = parse_query_descriptor("{not json").unwrap_err();
        assert_eq!(err.field, PayloadField::TestParameters);
        assert!(parse_query_descriptor(r#"["TABLE_NAME"]"#).is_err());
    }

    #[test]
    fn expands_each_offender_with_defaults() {
        let source = row(
            "unique",
            r#"{"TABLE_NAME":"orders"}"#,
            Some(r#"[{"OCCURRENCES": 3, "OFFENDERS": "x"}, {"OCCURRENCES": 5}]"#),
        )
        .with_query("select id from orders");
        let descriptor = parse_query_descriptor(&source.test_parameters).unwrap();
        let rows = expand_offenders(&source, &descriptor).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].offenders, "x");
        assert_eq!(rows[0].occurrences, 3.0);
        assert_eq!(rows[1].offenders, "");
        assert_eq!(rows[1].occurrences, 5.0);
        for r in &rows {
            assert_eq!(r.table, "orders");
            assert_eq!(r.test_name, "unique");
            assert_eq!(r.test_query, "select id from orders");
        }
    }

    #[test]
    fn missing_occurrences_default_to_zero() {
        let source = row("t", "{}", Some(r#"[{"OFFENDERS": "x"}, {"OCCURRENCES": null}]"#));
        let rows = expand_offenders(&source, &QueryDescriptor::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.occurrences == 0.0));
    }

    #[test]
    fn empty_array_contributes_nothing() {
        let source = row("t", "{}", Some("[]"));
        let rows = expand_offenders(&source, &QueryDescriptor::default()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn malformed_payload_aborts_the_pass() {
        let rows = vec![
            row("ok", "{}", Some(r#"[{"OCCURRENCES": 1}]"#)),
            row("bad", "{}", Some(r#"[{"OCCURRENCES": 1"#)),
        ];
        let err = process_table(&rows).unwrap_err();
        assert_eq!(err.row, 1);
        assert_eq!(err.error.field, PayloadField::TestResultValue);
    }

    #[test]
    fn malformed_parameters_abort_only_for_qualifying_rows() {
        let rows = vec![
            row("skipped", "{broken", Some("PASSED")),
            row("kept", "{broken", Some(r#"[{"OCCURRENCES": 1}]"#)),
        ];
        let err = process_table(&rows).unwrap_err();
        assert_eq!(err.row, 1);
        assert_eq!(err.error.field, PayloadField::TestParameters);
    }

    #[test]
    fn non_numeric_occurrences_are_rejected() {
        let source = row("t", "{}", Some(r#"[{"OCCURRENCES": "many"}]"#));
        assert!(expand_offenders(&source, &QueryDescriptor::default()).is_err());

        let source = row("t", "{}", Some(r#"[{"OCCURRENCES": "7"}]"#));
        let rows = expand_offenders(&source, &QueryDescriptor::default()).unwrap();
        assert_eq!(rows[0].occurrences, 7.0);
    }

    #[test]
    fn sum_matches_payload_total() {
        let payload = r#"[{"OCCURRENCES":1.5,"OFFENDERS":"a"},{"OCCURRENCES":2},{"OCCURRENCES":0.25}]"#;
        let rows = process_table(&[row("t", "{}", Some(payload))]).unwrap();
        let total: f64 = rows.iter().map(|r| r.occurrences).sum();
        assert_eq!(total, 1.5 + 2.0 + 0.25);
    }
}
