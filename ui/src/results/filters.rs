use dioxus::prelude::*;

use crate::core::{
    filters::{distinct_options, Dimension, DimensionOption},
    pipeline::ExpandedRow,
    session::SessionContext,
};
use crate::t;

/// Multi-select filters for every dimension. Options come from the unfiltered
/// rows so a narrowed view never hides the way back.
#[component]
pub fn FilterSidebar(rows: Vec<ExpandedRow>, session: Signal<SessionContext>) -> Element {
    let mut session_signal = session;
    let has_selection = !session.read().filters.is_empty();

    let groups: Vec<(Dimension, String, Vec<DimensionOption>)> = Dimension::ALL
        .into_iter()
        .map(|dimension| {
            (
                dimension,
                dimension_heading(dimension),
                distinct_options(&rows, dimension),
            )
        })
        .collect();

    rsx! {
        aside { class: "results-card filter-sidebar",
            div { class: "results-card__header",
                h2 { {t!("filters-title")} }
            }

            for (dimension, heading, options) in groups.into_iter() {
                {render_dimension(dimension, heading, options, session)}
            }

            button {
                r#type: "button",
                class: "button button--ghost filter-sidebar__reset",
                disabled: !has_selection,
                onclick: move |_| session_signal.with_mut(|s| s.reset_filters()),
                {t!("filters-reset")}
            }
        }
    }
}

fn dimension_heading(dimension: Dimension) -> String {
    match dimension {
        Dimension::Table => t!("filters-table"),
        Dimension::Column => t!("filters-column"),
        Dimension::TestName => t!("filters-test-name"),
        Dimension::Criteria => t!("filters-criteria"),
    }
}

fn render_dimension(
    dimension: Dimension,
    heading: String,
    options: Vec<DimensionOption>,
    session: Signal<SessionContext>,
) -> Element {
    let selected = session.read().filters.selected_count(dimension);

    rsx! {
        fieldset { class: "filter-sidebar__group",
            legend { class: "filter-sidebar__legend",
                "{heading}"
                if selected > 0 {
                    span { class: "filter-sidebar__count", "{selected}" }
                }
            }

            if options.is_empty() {
                p { class: "results-card__placeholder", "—" }
            } else {
                ul { class: "filter-sidebar__options",
                    for (index, option) in options.into_iter().enumerate() {
                        {render_option(dimension, index, option, session)}
                    }
                }
            }
        }
    }
}

/// DOM id for the `index`-th option of `dimension`. Keys can hold quotes and
/// spaces, so they never go into the id.
fn option_input_id(dimension: Dimension, index: usize) -> String {
    format!("filter-{}-{index}", dimension.column_name().to_ascii_lowercase())
}

fn render_option(
    dimension: Dimension,
    index: usize,
    option: DimensionOption,
    mut session: Signal<SessionContext>,
) -> Element {
    let DimensionOption { key, label } = option;
    let checked = session.read().filters.is_selected(dimension, &key);
    let input_id = option_input_id(dimension, index);

    rsx! {
        li { class: "filter-sidebar__option", key: "{input_id}",
            input {
                r#type: "checkbox",
                id: "{input_id}",
                checked,
                onchange: move |_| session.with_mut(|s| s.filters.toggle(dimension, &key)),
            }
            label { r#for: "{input_id}", "{label}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_ids_are_attribute_safe() {
        for dimension in Dimension::ALL {
            for index in [0, 7, 42] {
                let id = option_input_id(dimension, index);
                assert!(id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
            }
        }
        assert_eq!(option_input_id(Dimension::Criteria, 3), "filter-criteria-3");
        assert_eq!(option_input_id(Dimension::TestName, 0), "filter-test_name-0");
    }

    #[test]
    fn input_ids_are_unique_per_dimension_and_index() {
        let ids: std::collections::HashSet<_> = Dimension::ALL
            .into_iter()
            .flat_map(|d| (0..3).map(move |i| option_input_id(d, i)))
            .collect();
        assert_eq!(ids.len(), Dimension::ALL.len() * 3);
    }
}
