use crate::i18n;
use crate::t;
use dioxus::logger::tracing::debug;
use dioxus::prelude::*;
use once_cell::sync::OnceCell;

const NAVBAR_CSS: Asset = asset!("/assets/styling/navbar.css");
const NAVBAR_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/styling/navbar.css"
));

/// Link constructors supplied by the platform shell, so this crate never needs
/// to know the shell's `Route` enum. Each closure receives the localized label
/// and returns a `Link` containing it.
///
/// ```ignore
/// register_nav(NavBuilder {
///     dashboard: |label| rsx!( Link { class: "navbar__link", to: Route::Dashboard {}, "{label}" } ),
///     about: |label| rsx!( Link { class: "navbar__link", to: Route::About {}, "{label}" } ),
/// });
/// ```
pub struct NavBuilder {
    pub dashboard: fn(label: &str) -> Element,
    pub about: fn(label: &str) -> Element,
}

static NAV_BUILDER: OnceCell<NavBuilder> = OnceCell::new();

/// First registration wins.
pub fn register_nav(builder: NavBuilder) {
    let _ = NAV_BUILDER.set(builder);
}

#[component]
pub fn AppNavbar(children: Element) -> Element {
    i18n::init();

    let mut current_lang = use_signal(|| "en-US".to_string());
    let langs = use_signal(i18n::available_languages);
    let show_switcher = langs().len() > 1;
    let lang_code_ctx: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let lang_marker = lang_code_ctx.as_ref().map(|c| c()).unwrap_or_default();

    debug!(lang = %lang_marker, "navbar render");

    let on_change = move |evt: dioxus::events::FormEvent| {
        let val = evt.value();
        if i18n::set_language(&val).is_ok() {
            current_lang.set(val.clone());
            if let Some(mut code) = lang_code_ctx {
                code.set(val);
            }
        }
    };

    let internal_nav: Option<(Element, Element)> = NAV_BUILDER
        .get()
        .map(|b| ((b.dashboard)(&t!("nav-dashboard")), (b.about)(&t!("nav-about"))));

    let tagline = t!("tagline");

    rsx! {
        document::Link { rel: "stylesheet", href: NAVBAR_CSS }
        if cfg!(all(not(debug_assertions), not(target_arch = "wasm32"))) {
            document::Style { "{NAVBAR_CSS_INLINE}" }
        }

        header {
            id: "navbar",
            class: "navbar",
            div { style: "display:none", "{lang_marker}" }
            div { class: "navbar__inner",
                div { class: "navbar__brand",
                    span { class: "navbar__brand-link",
                        span { class: "navbar__brand-spark", aria_hidden: "true" }
                        span { class: "navbar__brand-mark", "DQ Lens" }
                    }
                    span { class: "navbar__brand-subtitle", "{tagline}" }
                }

                if let Some((dashboard, about)) = internal_nav {
                    nav { class: "navbar__links",
                        {dashboard}
                        {about}
                    }
                } else {
                    nav { class: "navbar__links", {children} }
                }

                if show_switcher {
                    div { class: "navbar__locale",
                        label {
                            class: "visually-hidden",
                            r#for: "locale-select",
                            {t!("nav-language-label")}
                        }
                        select {
                            id: "locale-select",
                            value: "{current_lang()}",
                            oninput: on_change,
                            for code in langs().into_iter() {
                                option { key: "{code}", value: "{code}", "{code}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
