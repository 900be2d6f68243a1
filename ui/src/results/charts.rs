use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, TAU};

use dioxus::prelude::*;

use crate::core::{
    aggregate::{occurrences_by_test, occurrences_by_test_location, TestLocationShare, TestShare},
    format,
    pipeline::ExpandedRow,
    session::{ChartKind, SessionContext, ViewMode},
};
use crate::t;

/// Sequential oranges, darkest first.
const PALETTE: [&str; 9] = [
    "rgb(127,39,4)",
    "rgb(166,54,3)",
    "rgb(217,72,1)",
    "rgb(241,105,19)",
    "rgb(253,141,60)",
    "rgb(253,174,107)",
    "rgb(253,208,162)",
    "rgb(254,230,206)",
    "rgb(255,245,235)",
];

const PIE_SIZE: f64 = 320.0;
const FACET_SIZE: f64 = 200.0;
const BAR_WIDTH: f64 = 640.0;
const BAR_HEIGHT: f64 = 320.0;
const BAR_MARGIN_LEFT: f64 = 48.0;
const BAR_MARGIN_BOTTOM: f64 = 56.0;
const BAR_MARGIN_TOP: f64 = 16.0;

fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PieSlice {
    pub label: String,
    pub value: f64,
    pub percentage: f64,
    pub color: &'static str,
    pub path: String,
}

/// SVG wedge paths for `data`, clockwise from twelve o'clock. Zero-sized entries are skipped.
pub(crate) fn pie_slices(
    data: &[(String, f64, &'static str)],
    cx: f64,
    cy: f64,
    radius: f64,
) -> Vec<PieSlice> {
    let total: f64 = data.iter().map(|(_, value, _)| value.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut angle = -FRAC_PI_2;
    let mut slices = Vec::new();
    for (label, value, color) in data {
        let value = value.max(0.0);
        if value == 0.0 {
            continue;
        }
        let sweep = value / total * TAU;
        let path = if sweep >= TAU - 1e-9 {
            format!(
                "M {cx} {top} A {radius} {radius} 0 1 1 {cx} {bottom} A {radius} {radius} 0 1 1 {cx} {top} Z",
                top = cy - radius,
                bottom = cy + radius,
            )
        } else {
            let (x0, y0) = (cx + radius * angle.cos(), cy + radius * angle.sin());
            let end = angle + sweep;
            let (x1, y1) = (cx + radius * end.cos(), cy + radius * end.sin());
            let large_arc = u8::from(sweep > std::f64::consts::PI);
            format!(
                "M {cx} {cy} L {x0:.3} {y0:.3} A {radius} {radius} 0 {large_arc} 1 {x1:.3} {y1:.3} Z"
            )
        };
        angle += sweep;
        slices.push(PieSlice {
            label: label.clone(),
            value,
            percentage: value / total * 100.0,
            color: *color,
            path,
        });
    }
    slices
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BarSegment {
    pub category: String,
    pub series: String,
    pub value: f64,
    pub color: &'static str,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Stacked bars: one column per category, segments stacked bottom-up in input order.
pub(crate) fn stacked_bar_layout(
    categories: &[(String, Vec<(String, f64, &'static str)>)],
) -> Vec<BarSegment> {
    let max_total = categories
        .iter()
        .map(|(_, segments)| segments.iter().map(|(_, v, _)| v.max(0.0)).sum::<f64>())
        .fold(0.0_f64, f64::max);
    if categories.is_empty() || max_total <= 0.0 {
        return Vec::new();
    }

    let plot_width = BAR_WIDTH - BAR_MARGIN_LEFT;
    let plot_height = BAR_HEIGHT - BAR_MARGIN_BOTTOM - BAR_MARGIN_TOP;
    let slot = plot_width / categories.len() as f64;
    let bar_width = slot * 0.7;
    let baseline = BAR_HEIGHT - BAR_MARGIN_BOTTOM;

    let mut out = Vec::new();
    for (index, (category, segments)) in categories.iter().enumerate() {
        let x = BAR_MARGIN_LEFT + slot * index as f64 + (slot - bar_width) / 2.0;
        let mut top = baseline;
        for (series, value, color) in segments {
            let height = value.max(0.0) / max_total * plot_height;
            top -= height;
            out.push(BarSegment {
                category: category.clone(),
                series: series.clone(),
                value: *value,
                color: *color,
                x,
                y: top,
                width: bar_width,
                height,
            });
        }
    }
    out
}

#[component]
pub fn IssueChartPanel(rows: Vec<ExpandedRow>, session: Signal<SessionContext>) -> Element {
    let mut session_signal = session;
    let (view_mode, kind) = {
        let ctx = session.read();
        (ctx.view_mode, ctx.chart_kind())
    };

    let (heading, chart) = match view_mode {
        ViewMode::Overview => (
            t!("chart-overview-title"),
            overview_chart(&occurrences_by_test(&rows), kind),
        ),
        ViewMode::Detail => (
            t!("chart-detail-title"),
            detail_chart(&occurrences_by_test_location(&rows), kind),
        ),
    };

    let kind_options = [
        (ChartKind::Pie, t!("chart-kind-pie")),
        (ChartKind::Bar, t!("chart-kind-bar")),
    ];

    let radio_name = match view_mode {
        ViewMode::Overview => "chart-kind",
        ViewMode::Detail => "detail-chart-kind",
    };

    rsx! {
        section { class: "results-card results-chart",
            div { class: "results-card__header",
                h2 { class: "results-chart__title", "{heading}" }
                match view_mode {
                    ViewMode::Overview => rsx! {
                        button {
                            r#type: "button",
                            class: "button button--accent",
                            onclick: move |_| session_signal.with_mut(|s| s.show_detail()),
                            {t!("chart-show-detail")}
                        }
                    },
                    ViewMode::Detail => rsx! {
                        button {
                            r#type: "button",
                            class: "button button--accent",
                            onclick: move |_| session_signal.with_mut(|s| s.show_overview()),
                            {t!("chart-show-overview")}
                        }
                    },
                }
            }

            div { class: "results-chart__kind", role: "radiogroup",
                for (option, option_label) in kind_options.into_iter() {
                    label { class: "results-chart__kind-option",
                        input {
                            r#type: "radio",
                            name: radio_name,
                            checked: option == kind,
                            onchange: move |_| session_signal.with_mut(|s| s.set_chart_kind(option)),
                        }
                        "{option_label}"
                    }
                }
            }

            if rows.is_empty() {
                p { class: "results-card__placeholder", {t!("table-empty")} }
            } else {
                {chart}
            }
        }
    }
}

fn overview_chart(shares: &[TestShare], kind: ChartKind) -> Element {
    let data: Vec<(String, f64, &'static str)> = shares
        .iter()
        .enumerate()
        .map(|(i, s)| (s.test_name.clone(), s.occurrences, palette_color(i)))
        .collect();

    match kind {
        ChartKind::Pie => rsx! {
            h3 { class: "results-chart__subtitle", {t!("chart-pie-title")} }
            {render_pie(&data, PIE_SIZE)}
            {render_legend(&overview_legend(shares))}
        },
        ChartKind::Bar => {
            let categories: Vec<_> = data
                .iter()
                .map(|(name, value, color)| (name.clone(), vec![(name.clone(), *value, *color)]))
                .collect();
            rsx! {
                h3 { class: "results-chart__subtitle", {t!("chart-bar-title")} }
                {render_bars(&stacked_bar_layout(&categories))}
                {render_legend(&overview_legend(shares))}
            }
        }
    }
}

fn detail_chart(shares: &[TestLocationShare], kind: ChartKind) -> Element {
    // Test names keep one colour across every facet / stack.
    let mut test_colors: BTreeMap<&str, &'static str> = BTreeMap::new();
    for share in shares {
        let next = test_colors.len();
        test_colors
            .entry(share.test_name.as_str())
            .or_insert_with(|| palette_color(next));
    }

    match kind {
        ChartKind::Pie => {
            let mut facets: BTreeMap<&str, Vec<(String, f64, &'static str)>> = BTreeMap::new();
            for share in shares {
                facets.entry(share.column.as_str()).or_default().push((
                    format!("{} · {}", share.test_name, format::display_label(&share.table)),
                    share.occurrences,
                    test_colors[share.test_name.as_str()],
                ));
            }
            let legend = grouped_legend(shares, &test_colors, |s| s.test_name.as_str());

            rsx! {
                div { class: "results-chart__facets",
                    for (column, data) in facets.into_iter() {
                        figure { class: "results-chart__facet",
                            {render_pie(&data, FACET_SIZE)}
                            figcaption { "COLUMN = {format::display_label(column)}" }
                        }
                    }
                }
                {render_legend(&legend)}
            }
        }
        ChartKind::Bar => {
            let mut table_colors: BTreeMap<&str, &'static str> = BTreeMap::new();
            for share in shares {
                let next = table_colors.len();
                table_colors
                    .entry(share.table.as_str())
                    .or_insert_with(|| palette_color(next));
            }

            let mut categories: Vec<(String, Vec<(String, f64, &'static str)>)> = Vec::new();
            for share in shares {
                let segment = (
                    format!(
                        "{} · {}",
                        format::display_label(&share.table),
                        format::display_label(&share.column)
                    ),
                    share.occurrences,
                    table_colors[share.table.as_str()],
                );
                match categories.last_mut() {
                    Some((name, segments)) if *name == share.test_name => segments.push(segment),
                    _ => categories.push((share.test_name.clone(), vec![segment])),
                }
            }

            let legend = grouped_legend(shares, &table_colors, |s| s.table.as_str());

            rsx! {
                {render_bars(&stacked_bar_layout(&categories))}
                {render_legend(&legend)}
            }
        }
    }
}

fn render_pie(data: &[(String, f64, &'static str)], size: f64) -> Element {
    let center = size / 2.0;
    let slices = pie_slices(data, center, center, center - 8.0);

    rsx! {
        svg {
            class: "results-chart__svg results-chart__svg--pie",
            width: "{size}",
            height: "{size}",
            view_box: "0 0 {size} {size}",
            for slice in slices.into_iter() {
                path {
                    d: "{slice.path}",
                    fill: slice.color,
                    stroke: "#0f1116",
                    stroke_width: "1",
                    title { "{slice.label}: {format::format_count(slice.value)} ({format::format_percent(slice.percentage)})" }
                }
            }
        }
    }
}

fn render_bars(segments: &[BarSegment]) -> Element {
    let baseline = BAR_HEIGHT - BAR_MARGIN_BOTTOM;
    let label_y = baseline + 18.0;
    let axis_title_y = BAR_MARGIN_TOP + 8.0;

    let mut labels: Vec<(String, String)> = Vec::new();
    let mut last_category: Option<&str> = None;
    for segment in segments {
        if last_category != Some(segment.category.as_str()) {
            let center = format!("{:.2}", segment.x + segment.width / 2.0);
            labels.push((truncate(&segment.category, 14), center));
            last_category = Some(segment.category.as_str());
        }
    }

    let rects: Vec<BarRect> = segments.iter().map(BarRect::from).collect();

    rsx! {
        svg {
            class: "results-chart__svg results-chart__svg--bar",
            width: "{BAR_WIDTH}",
            height: "{BAR_HEIGHT}",
            view_box: "0 0 {BAR_WIDTH} {BAR_HEIGHT}",
            line {
                x1: "{BAR_MARGIN_LEFT}",
                y1: "{baseline}",
                x2: "{BAR_WIDTH}",
                y2: "{baseline}",
                stroke: "rgba(245,247,251,0.4)",
            }
            text {
                x: "12",
                y: "{axis_title_y}",
                class: "results-chart__axis-label",
                {t!("chart-axis-occurrences")}
            }
            for bar in rects.into_iter() {
                rect {
                    x: "{bar.x}",
                    y: "{bar.y}",
                    width: "{bar.width}",
                    height: "{bar.height}",
                    fill: bar.color,
                    title { "{bar.tooltip}" }
                }
            }
            for (label, x) in labels.into_iter() {
                text {
                    x: "{x}",
                    y: "{label_y}",
                    text_anchor: "middle",
                    class: "results-chart__axis-label",
                    "{label}"
                }
            }
        }
    }
}

/// A [`BarSegment`] with its SVG attributes already rendered to text.
struct BarRect {
    x: String,
    y: String,
    width: String,
    height: String,
    color: &'static str,
    tooltip: String,
}

impl From<&BarSegment> for BarRect {
    fn from(segment: &BarSegment) -> Self {
        Self {
            x: format!("{:.2}", segment.x),
            y: format!("{:.2}", segment.y),
            width: format!("{:.2}", segment.width),
            height: format!("{:.2}", segment.height),
            color: segment.color,
            tooltip: format!(
                "{} · {}: {}",
                segment.category,
                segment.series,
                format::format_count(segment.value)
            ),
        }
    }
}

/// One legend line: occurrences and their share of the filtered total.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LegendEntry {
    pub label: String,
    pub value: String,
    pub color: &'static str,
}

impl LegendEntry {
    fn new(label: &str, occurrences: f64, percentage: f64, color: &'static str) -> Self {
        Self {
            label: format::display_label(label),
            value: format!(
                "{} ({})",
                format::format_count(occurrences),
                format::format_percent(percentage)
            ),
            color,
        }
    }
}

fn overview_legend(shares: &[TestShare]) -> Vec<LegendEntry> {
    shares
        .iter()
        .enumerate()
        .map(|(i, s)| LegendEntry::new(&s.test_name, s.occurrences, s.percentage, palette_color(i)))
        .collect()
}

/// Location shares folded by `key`; shares of a group add up to the group's share.
fn grouped_legend(
    shares: &[TestLocationShare],
    colors: &BTreeMap<&str, &'static str>,
    key: fn(&TestLocationShare) -> &str,
) -> Vec<LegendEntry> {
    colors
        .iter()
        .map(|(name, color)| {
            let (occurrences, percentage) = shares
                .iter()
                .filter(|s| key(s) == *name)
                .fold((0.0, 0.0), |(n, p), s| (n + s.occurrences, p + s.percentage));
            LegendEntry::new(name, occurrences, percentage, *color)
        })
        .collect()
}

fn render_legend(entries: &[LegendEntry]) -> Element {
    rsx! {
        ul { class: "results-chart__legend",
            for entry in entries.iter().cloned() {
                li { class: "results-chart__legend-item",
                    span {
                        class: "results-chart__legend-swatch",
                        style: "background: {entry.color}",
                    }
                    span { "{entry.label}" }
                    span { class: "results-chart__legend-value", "{entry.value}" }
                }
            }
        }
    }
}

fn truncate(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let head: String = label.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
