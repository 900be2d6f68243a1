mod filters;
pub use filters::FilterSidebar;

mod summary;
pub use summary::ResultsSummary;

mod charts;
pub use charts::IssueChartPanel;

mod table;
pub use table::{RawTablePreview, ResultsTable};

mod export;
pub use export::{build_csv, ResultsExportPanel};

use api::SourceRow;
use dioxus::logger::tracing::{info, warn};
use dioxus::prelude::*;

use crate::core::pipeline::{self, ExpandedRow};
use crate::core::session::SessionContext;

/// Outcome of one pipeline pass over the loaded table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsState {
    pub source: Vec<SourceRow>,
    pub rows: Vec<ExpandedRow>,
    pub error: Option<String>,
}

impl ResultsState {
    pub fn from_source(loaded: &Result<Vec<SourceRow>, String>) -> Self {
        let source = match loaded {
            Ok(source) => source,
            Err(err) => {
                warn!(%err, "result table unavailable");
                return Self {
                    error: Some(format!("Couldn't load the result table: {err}")),
                    ..Self::default()
                };
            }
        };

        match pipeline::process_table(source) {
            Ok(rows) => {
                info!(
                    source_rows = source.len(),
                    offender_rows = rows.len(),
                    "expanded offender rows"
                );
                Self {
                    source: source.clone(),
                    rows,
                    error: None,
                }
            }
            Err(err) => {
                warn!(%err, "result table could not be reshaped");
                Self {
                    source: source.clone(),
                    rows: Vec::new(),
                    error: Some(format!("Couldn't read test results: {err}")),
                }
            }
        }
    }
}

/// Install the per-session dashboard state for everything below the caller.
pub fn use_session_provider() -> Signal<SessionContext> {
    use_context_provider(|| Signal::new(SessionContext::default()))
}
