#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

#[cfg(feature = "desktop")]
use dioxus::desktop::{tao::window::WindowBuilder, Config};
use dioxus::prelude::*;

use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::results::use_session_provider;
use ui::views::{About, Dashboard};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(DesktopNavbar)]
    #[route("/")]
    Dashboard {},
    #[route("/about")]
    About {},
}

// Shared theme is always inlined; the desktop bundle ships no stylesheet of its own.
const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

#[cfg(feature = "desktop")]
fn main() {
    LaunchBuilder::desktop()
        .with_cfg(
            Config::new().with_window(
                WindowBuilder::new()
                    .with_title(format!("DQ Lens – v{}", env!("CARGO_PKG_VERSION")))
                    .with_maximized(true),
            ),
        )
        .launch(App);
}

#[cfg(all(feature = "server", not(feature = "desktop")))]
fn main() {
    LaunchBuilder::server().launch(App);
}

fn nav_dashboard(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Dashboard {}, "{label}" })
}
fn nav_about(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::About {}, "{label}" })
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    // AppNavbar writes the selected locale here; views subscribe to it.
    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);

    // Filters, view mode and chart kinds survive route changes.
    use_session_provider();

    register_nav(NavBuilder {
        dashboard: nav_dashboard,
        about: nav_about,
    });

    rsx! {
        document::Style { "{MAIN_CSS_INLINE}" }

        // Keyed on the locale so the routed subtree remounts on language change.
        div {
            key: "{lang_code()}",
            Router::<Route> { }
        }
    }
}

#[component]
fn DesktopNavbar() -> Element {
    rsx! {
        AppNavbar { }

        Outlet::<Route> {}
    }
}
