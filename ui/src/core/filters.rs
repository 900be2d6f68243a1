//! Dimension filters over expanded offender rows.
//!
//! Within one dimension the selected values are OR-ed; across dimensions they
//! are AND-ed. A dimension with nothing selected does not constrain anything.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::format::{criteria_label, display_label};
use super::pipeline::ExpandedRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Table,
    Column,
    TestName,
    Criteria,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Table,
        Dimension::Column,
        Dimension::TestName,
        Dimension::Criteria,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::Column => "COLUMN",
            Self::TestName => "TEST_NAME",
            Self::Criteria => "CRITERIA",
        }
    }

    /// Value of this dimension in `row`, in the form used for selection.
    pub fn key_of(self, row: &ExpandedRow) -> String {
        match self {
            Self::Table => row.table.clone(),
            Self::Column => row.column.clone(),
            Self::TestName => row.test_name.clone(),
            Self::Criteria => row.criteria.key(),
        }
    }

    fn label_of(self, row: &ExpandedRow) -> String {
        match self {
            Self::Criteria => criteria_label(&row.criteria),
            _ => display_label(&self.key_of(row)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionOption {
    pub key: String,
    pub label: String,
}

/// Distinct values of `dimension` in first-seen order.
pub fn distinct_options(rows: &[ExpandedRow], dimension: Dimension) -> Vec<DimensionOption> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(|row| {
            let key = dimension.key_of(row);
            seen.insert(key.clone()).then(|| DimensionOption {
                label: dimension.label_of(row),
                key,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    selected: BTreeMap<Dimension, BTreeSet<String>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, dimension: Dimension, key: impl Into<String>) {
        self.selected.entry(dimension).or_default().insert(key.into());
    }

    pub fn toggle(&mut self, dimension: Dimension, key: &str) {
        let values = self.selected.entry(dimension).or_default();
        if !values.remove(key) {
            values.insert(key.to_string());
        }
        if values.is_empty() {
            self.selected.remove(&dimension);
        }
    }

    pub fn is_selected(&self, dimension: Dimension, key: &str) -> bool {
        self.selected
            .get(&dimension)
            .is_some_and(|values| values.contains(key))
    }

    pub fn selected_count(&self, dimension: Dimension) -> usize {
        self.selected.get(&dimension).map_or(0, BTreeSet::len)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selected.values().all(BTreeSet::is_empty)
    }

    pub fn matches(&self, row: &ExpandedRow) -> bool {
        self.selected
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .all(|(dimension, values)| values.contains(&dimension.key_of(row)))
    }

    pub fn apply(&self, rows: &[ExpandedRow]) -> Vec<ExpandedRow> {
        rows.iter().filter(|row| self.matches(row)).cloned().collect()
    }
}
