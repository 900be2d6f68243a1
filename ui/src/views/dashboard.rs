use dioxus::logger::tracing::debug;
use dioxus::prelude::*;

use crate::core::{loader, session::SessionContext};
use crate::results::{
    FilterSidebar, IssueChartPanel, RawTablePreview, ResultsExportPanel, ResultsState,
    ResultsSummary, ResultsTable,
};

#[component]
pub fn Dashboard() -> Element {
    // Subscribe to global language code (if provided) so we re-render on change.
    let lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let lang_marker = lang_code.as_ref().map(|s| s()).unwrap_or_default();

    // Platforms normally install the session via `use_session_provider`; keep a
    // local one so the page still works when embedded without it.
    let local_session = use_signal(SessionContext::default);
    let session = try_use_context::<Signal<SessionContext>>().unwrap_or(local_session);

    let table = use_resource(|| async move { loader::fetch_source_rows().await });
    let state = use_memo(move || table.read().as_ref().map(ResultsState::from_source));

    debug!(lang = %lang_marker, "dashboard render");

    let content = match state() {
        None => rsx! {
            p { class: "results-card__placeholder", {crate::t!("dashboard-loading")} }
        },
        Some(state) => match state.error.clone() {
            Some(err) => rsx! {
                section { class: "results-card results-card--error",
                    h2 { {crate::t!("dashboard-error-title")} }
                    p { "{err}" }
                }
                if !state.source.is_empty() {
                    RawTablePreview { rows: state.source }
                }
            },
            None => render_loaded(state, session),
        },
    };

    rsx! {
        // Hidden marker node retains reactive dependency on language signal.
        div { style: "display:none", "{lang_marker}" }
        section { class: "page page-dashboard",
            h1 { {crate::t!("dashboard-title")} }
            p { {crate::t!("dashboard-intro")} }
            {content}
        }
    }
}

fn render_loaded(state: ResultsState, session: Signal<SessionContext>) -> Element {
    let (filtered, granularity) = {
        let ctx = session.read();
        (ctx.filters.apply(&state.rows), ctx.granularity)
    };

    rsx! {
        div { class: "dashboard__layout",
            FilterSidebar { rows: state.rows.clone(), session }
            div { class: "dashboard__main",
                ResultsSummary { rows: filtered.clone() }
                IssueChartPanel { rows: filtered.clone(), session }
                ResultsTable { rows: filtered.clone(), session }
                ResultsExportPanel { rows: filtered, granularity }
                RawTablePreview { rows: state.source }
            }
        }
    }
}
