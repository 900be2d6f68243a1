//! Per-session dashboard state. One `SessionContext` lives in a signal owned by
//! the dashboard page and is handed to each panel; nothing here is global.

use super::filters::FilterSelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Overview,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Pie,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    #[default]
    Summary,
    Detailed,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "Summary",
            Self::Detailed => "Detailed",
        }
    }

    /// Download name for exports at this granularity, e.g. `Summary_data.csv`.
    pub fn export_filename(self) -> String {
        format!("{}_data.csv", self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    pub view_mode: ViewMode,
    /// Chart kinds are remembered separately for the overview and the detail view.
    pub overview_chart: ChartKind,
    pub detail_chart: ChartKind,
    pub granularity: Granularity,
    pub filters: FilterSelection,
}

impl SessionContext {
    pub fn show_detail(&mut self) {
        self.view_mode = ViewMode::Detail;
    }

    pub fn show_overview(&mut self) {
        self.view_mode = ViewMode::Overview;
    }

    pub fn chart_kind(&self) -> ChartKind {
        match self.view_mode {
            ViewMode::Overview => self.overview_chart,
            ViewMode::Detail => self.detail_chart,
        }
    }

    /// Set the chart kind of the current view only.
    pub fn set_chart_kind(&mut self, kind: ChartKind) {
        match self.view_mode {
            ViewMode::Overview => self.overview_chart = kind,
            ViewMode::Detail => self.detail_chart = kind,
        }
    }

    pub fn reset_filters(&mut self) {
        self.filters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filters::Dimension;

    #[test]
    fn starts_in_overview_with_pie_and_summary() {
        let session = SessionContext::default();
        assert_eq!(session.view_mode, ViewMode::Overview);
        assert_eq!(session.chart_kind(), ChartKind::Pie);
        assert_eq!(session.granularity, Granularity::Summary);
        assert!(session.filters.is_empty());
    }

    #[test]
    fn chart_kind_is_per_view() {
        let mut session = SessionContext::default();
        session.set_chart_kind(ChartKind::Bar);
        session.show_detail();
        assert_eq!(session.chart_kind(), ChartKind::Pie);
        session.show_overview();
        assert_eq!(session.chart_kind(), ChartKind::Bar);
    }

    #[test]
    fn view_toggle_keeps_filters() {
        let mut session = SessionContext::default();
        session.filters.select(Dimension::Table, "orders");
        session.show_detail();
        assert!(session.filters.is_selected(Dimension::Table, "orders"));
        session.reset_filters();
        assert!(session.filters.is_empty());
        assert_eq!(session.view_mode, ViewMode::Detail);
    }

    #[test]
    fn export_filenames() {
        assert_eq!(Granularity::Summary.export_filename(), "Summary_data.csv");
        assert_eq!(Granularity::Detailed.export_filename(), "Detailed_data.csv");
    }
}
