//! Shared UI crate for DQ Lens: the offender pipeline, dashboard panels and views
//! used by both the web and desktop shells.

pub mod core;
pub mod i18n;
pub mod results;
pub mod views;

pub mod components {
    // Localized application navbar (components/app_navbar.rs)
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}
