use dioxus::prelude::*;

use crate::core::{aggregate::headline_metrics, format, pipeline::ExpandedRow};
use crate::t;

#[component]
pub fn ResultsSummary(rows: Vec<ExpandedRow>) -> Element {
    let metrics = headline_metrics(&rows);
    let total_issues = format::format_count(metrics.total_issues);
    let row_count = t!("summary-offender-rows", count = rows.len());

    rsx! {
        section { class: "results-card results-summary",
            div { class: "results-card__header",
                h2 { {t!("summary-title")} }
                span { class: "results-card__meta", "{row_count}" }
            }

            div { class: "results-highlights",
                div { class: "results-highlight",
                    span { class: "results-highlight__label", {t!("summary-total-issues")} }
                    strong { class: "results-highlight__value", "{total_issues}" }
                }
                div { class: "results-highlight",
                    span { class: "results-highlight__label", {t!("summary-unique-tables")} }
                    strong { class: "results-highlight__value", "{metrics.unique_tables}" }
                }
                div { class: "results-highlight",
                    span { class: "results-highlight__label", {t!("summary-unique-columns")} }
                    strong { class: "results-highlight__value", "{metrics.unique_columns}" }
                }
                div { class: "results-highlight",
                    span { class: "results-highlight__label", {t!("summary-unique-tests")} }
                    strong { class: "results-highlight__value", "{metrics.unique_tests}" }
                }
            }
        }
    }
}
