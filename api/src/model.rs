use serde::{Deserialize, Serialize};

/// One row of the raw data-quality result table.
///
/// `test_result_value` is `None` when the cell is empty; only string payloads
/// are candidates for offender expansion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRow {
    #[serde(rename = "TEST_NAME")]
    pub test_name: String,
    #[serde(rename = "TEST_PARAMETERS")]
    pub test_parameters: String,
    #[serde(rename = "TEST_RESULT_VALUE")]
    pub test_result_value: Option<String>,
    #[serde(rename = "TEST_QUERY", default)]
    pub test_query: String,
}

impl SourceRow {
    pub fn new(
        test_name: impl Into<String>,
        test_parameters: impl Into<String>,
        test_result_value: Option<&str>,
    ) -> Self {
        Self {
            test_name: test_name.into(),
            test_parameters: test_parameters.into(),
            test_result_value: test_result_value.map(str::to_string),
            test_query: String::new(),
        }
    }

    pub fn with_query(mut self, test_query: impl Into<String>) -> Self {
        self.test_query = test_query.into();
        self
    }
}
