use dioxus::prelude::*;

use crate::core::pipeline::OFFENDER_PAYLOAD_PREFIX;

#[component]
pub fn About() -> Element {
    // Subscribe to global language code (if provided) so this view re-renders
    // immediately when the locale changes elsewhere.
    let lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let lang_marker = lang_code.as_ref().map(|s| s()).unwrap_or_default();

    rsx! {
        div { style: "display:none", "{lang_marker}" }
        section { class: "page page-about",
            h1 { {crate::t!("about-title")} }
            p { {crate::t!("about-intro")} }

            ul { class: "page-about__steps",
                li { {crate::t!("about-step-filter")} " " code { "{OFFENDER_PAYLOAD_PREFIX}" } }
                li { {crate::t!("about-step-parameters")} }
                li { {crate::t!("about-step-expand")} }
            }
            p { class: "page-about__config",
                {crate::t!("about-config")}
                " "
                code { "DQ_TABLE_ID" }
            }
        }
    }
}
