//! Per-group aggregate rows produced by [`crate::summarize`].

use crate::types::day_category::DayCategory;
use serde::{Deserialize, Serialize};

/// Number of joined records behind each category cell of a [`SummaryRow`].
///
/// A cell whose count is zero was zero-filled; a cell with a positive count
/// and a `0.0` mean really observed a zero ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub dry: usize,
    pub rain: usize,
    pub snow: usize,
    pub mixed: usize,
}

impl CategoryCounts {
    pub fn get(&self, category: DayCategory) -> usize {
        match category {
            DayCategory::Dry => self.dry,
            DayCategory::Rain => self.rain,
            DayCategory::Snow => self.snow,
            DayCategory::Mixed => self.mixed,
        }
    }

    pub fn total(&self) -> usize {
        self.dry + self.rain + self.snow + self.mixed
    }

    pub(crate) fn set(&mut self, category: DayCategory, count: usize) {
        match category {
            DayCategory::Dry => self.dry = count,
            DayCategory::Rain => self.rain = count,
            DayCategory::Snow => self.snow = count,
            DayCategory::Mixed => self.mixed = count,
        }
    }
}

/// Mean search ratio of one keyword group per weather category.
///
/// Category means with no observation are `0.0`. The `*_vs_dry` deltas are
/// `Some` on every row of a [`Summary`] that observed at least one dry day
/// and `None` on every row otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub group: String,
    pub dry: f64,
    pub rain: f64,
    pub snow: f64,
    pub mixed: f64,
    pub rain_vs_dry: Option<f64>,
    pub snow_vs_dry: Option<f64>,
    pub mixed_vs_dry: Option<f64>,
    pub observations: CategoryCounts,
}

impl SummaryRow {
    pub fn mean(&self, category: DayCategory) -> f64 {
        match category {
            DayCategory::Dry => self.dry,
            DayCategory::Rain => self.rain,
            DayCategory::Snow => self.snow,
            DayCategory::Mixed => self.mixed,
        }
    }

    /// `<category>_vs_dry`; always `None` for [`DayCategory::Dry`] itself.
    pub fn delta_vs_dry(&self, category: DayCategory) -> Option<f64> {
        match category {
            DayCategory::Dry => None,
            DayCategory::Rain => self.rain_vs_dry,
            DayCategory::Snow => self.snow_vs_dry,
            DayCategory::Mixed => self.mixed_vs_dry,
        }
    }

    /// Whether the category cell is backed by at least one record.
    pub fn is_observed(&self, category: DayCategory) -> bool {
        self.observations.get(category) > 0
    }
}

/// The pivoted summary: one row per keyword group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Categories observed anywhere in the joined data, in canonical order.
    pub categories: Vec<DayCategory>,
    /// One row per distinct group, sorted by group name.
    pub rows: Vec<SummaryRow>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when a dry day was observed, i.e. the delta columns exist.
    pub fn has_baseline(&self) -> bool {
        self.categories.contains(&DayCategory::BASELINE)
    }

    pub fn row(&self, group: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|row| row.group == group)
    }

    /// The pivot column set shared by every row: `group`, the observed
    /// categories, then the delta columns when a baseline exists.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = vec!["group"];
        columns.extend(self.categories.iter().map(|c| c.as_str()));
        if self.has_baseline() {
            columns.extend(DayCategory::ALL.iter().filter_map(|c| c.delta_column()));
        }
        columns
    }
}
