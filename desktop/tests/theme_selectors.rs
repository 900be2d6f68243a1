#![cfg(test)]
//! The desktop shell embeds `ui/assets/theme/main.css` at compile time, so a
//! dropped selector only shows up as broken styling at runtime. These checks
//! catch that at test time instead.

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

/// Selectors the dashboard components render with.
const REQUIRED_SELECTORS: &[&str] = &[
    ":root",
    "--color-bg",
    "body {",
    ".page {",
    ".button {",
    ".button--primary",
    ".button--ghost",
    // Layout
    ".dashboard__layout",
    ".dashboard__main",
    // Filters
    ".filter-sidebar",
    ".filter-sidebar__group",
    ".filter-sidebar__option",
    ".filter-sidebar__reset",
    // Cards
    ".results-card",
    ".results-card--error",
    ".results-card__header",
    ".results-card__meta",
    ".results-card__placeholder",
    ".results-highlights",
    ".results-highlight__value",
    // Charts
    ".results-chart__svg",
    ".results-chart__facets",
    ".results-chart__legend-swatch",
    ".results-chart__kind",
    // Tables and export
    ".results-table__grid",
    ".results-table__numeric",
    ".results-table__granularity",
    ".results-raw__summary",
    ".results-export__actions",
    "@media (max-width: 720px)",
];

#[test]
fn theme_contains_required_selectors() {
    let missing: Vec<_> = REQUIRED_SELECTORS
        .iter()
        .filter(|sel| !THEME_CSS.contains(**sel))
        .collect();
    assert!(missing.is_empty(), "theme is missing selectors: {missing:?}");
}

#[test]
fn theme_is_not_truncated() {
    let non_ws_len = THEME_CSS.chars().filter(|c| !c.is_whitespace()).count();
    assert!(
        non_ws_len > 4_000,
        "embedded theme is unexpectedly small ({non_ws_len} non-whitespace chars)"
    );
}

#[test]
fn braces_are_balanced() {
    let open = THEME_CSS.matches('{').count();
    let close = THEME_CSS.matches('}').count();
    assert_eq!(open, close);
}
