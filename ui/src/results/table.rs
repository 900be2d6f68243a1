use api::SourceRow;
use dioxus::prelude::*;

use crate::core::{
    aggregate::summary_rows,
    format,
    pipeline::ExpandedRow,
    session::{Granularity, SessionContext},
};
use crate::t;

/// Raw rows shown in the collapsible preview; the full table can be large.
const RAW_PREVIEW_LIMIT: usize = 50;

#[component]
pub fn ResultsTable(rows: Vec<ExpandedRow>, session: Signal<SessionContext>) -> Element {
    let mut session_signal = session;
    let granularity = session.read().granularity;

    let granularity_options = [
        (Granularity::Summary, t!("table-granularity-summary")),
        (Granularity::Detailed, t!("table-granularity-detailed")),
    ];

    let body = match granularity {
        Granularity::Summary => render_summary(&rows),
        Granularity::Detailed => render_detailed(&rows),
    };

    rsx! {
        section { class: "results-card results-table",
            div { class: "results-card__header",
                h2 { {t!("table-title")} }
                div { class: "results-table__granularity", role: "radiogroup",
                    for (option, option_label) in granularity_options.into_iter() {
                        label { class: "results-table__granularity-option",
                            input {
                                r#type: "radio",
                                name: "granularity",
                                checked: option == granularity,
                                onchange: move |_| session_signal.with_mut(|s| s.granularity = option),
                            }
                            "{option_label}"
                        }
                    }
                }
            }

            if rows.is_empty() {
                p { class: "results-card__placeholder", {t!("table-empty")} }
            } else {
                div { class: "results-table__scroll", {body} }
            }
        }
    }
}

fn render_summary(rows: &[ExpandedRow]) -> Element {
    let summary = summary_rows(rows);

    rsx! {
        table { class: "results-table__grid",
            thead {
                tr {
                    th { "TABLE" }
                    th { "COLUMN" }
                    th { "TEST_NAME" }
                    th { "CRITERIA" }
                    th { class: "results-table__numeric", "OCCURRENCES" }
                }
            }
            tbody {
                for row in summary.into_iter() {
                    tr {
                        td { "{row.table}" }
                        td { "{row.column}" }
                        td { "{row.test_name}" }
                        td { "{format::criteria_label(&row.criteria)}" }
                        td { class: "results-table__numeric", "{format::format_count(row.occurrences)}" }
                    }
                }
            }
        }
    }
}

fn render_detailed(rows: &[ExpandedRow]) -> Element {
    rsx! {
        table { class: "results-table__grid",
            thead {
                tr {
                    th { "TABLE" }
                    th { "COLUMN" }
                    th { "TEST_NAME" }
                    th { "CRITERIA" }
                    th { "OFFENDERS" }
                    th { class: "results-table__numeric", "OCCURRENCES" }
                    th { "TEST_QUERY" }
                }
            }
            tbody {
                for row in rows.iter() {
                    tr {
                        td { "{row.table}" }
                        td { "{row.column}" }
                        td { "{row.test_name}" }
                        td { "{format::criteria_label(&row.criteria)}" }
                        td { class: "results-table__offenders", "{row.offenders}" }
                        td { class: "results-table__numeric", "{format::format_count(row.occurrences)}" }
                        td { class: "results-table__query",
                            code { "{row.test_query}" }
                        }
                    }
                }
            }
        }
    }
}

/// The table exactly as loaded, before any reshaping.
#[component]
pub fn RawTablePreview(rows: Vec<SourceRow>) -> Element {
    let total = rows.len();
    let shown = total.min(RAW_PREVIEW_LIMIT);
    let count_label = t!("raw-table-count", shown = shown, total = total);

    rsx! {
        details { class: "results-card results-raw",
            summary { class: "results-raw__summary",
                {t!("raw-table-title")}
                span { class: "results-card__meta", " {count_label}" }
            }
            div { class: "results-table__scroll",
                table { class: "results-table__grid",
                    thead {
                        tr {
                            th { "TEST_NAME" }
                            th { "TEST_PARAMETERS" }
                            th { "TEST_RESULT_VALUE" }
                            th { "TEST_QUERY" }
                        }
                    }
                    tbody {
                        for row in rows.iter().take(RAW_PREVIEW_LIMIT) {
                            tr {
                                td { "{row.test_name}" }
                                td { code { "{row.test_parameters}" } }
                                td { code { "{result_text(row)}" } }
                                td { code { "{row.test_query}" } }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn result_text(row: &SourceRow) -> &str {
    row.test_result_value.as_deref().unwrap_or_default()
}
