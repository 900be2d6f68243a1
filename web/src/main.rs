use dioxus::prelude::*;

use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::results::use_session_provider;
use ui::views::{About, Dashboard};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebNavbar)]
    #[route("/")]
    Dashboard {},
    #[route("/about")]
    About {},
}

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn nav_dashboard(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Dashboard {},
        "{label}"
    })
}
fn nav_about(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::About {},
        "{label}"
    })
}

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);

    // One session per browser tab.
    use_session_provider();

    register_nav(NavBuilder {
        dashboard: nav_dashboard,
        about: nav_about,
    });

    rsx! {
        document::Style { "{MAIN_CSS_INLINE}" }

        Router::<Route> {}
    }
}

/// Web layout: shared navbar above the routed page.
#[component]
fn WebNavbar() -> Element {
    rsx! {
        AppNavbar { }
        Outlet::<Route> {}
    }
}
