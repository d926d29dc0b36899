use crate::types::day_category::DayCategory;
use crate::types::merged_record::MergedRecord;
use crate::types::summary::{CategoryCounts, Summary, SummaryRow};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    sum: f64,
    count: usize,
}

impl Cell {
    fn mean_or_zero(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Pivots joined records into one [`SummaryRow`] per keyword group.
///
/// Each category cell is the mean ratio of that group's records in that
/// category, or `0.0` when the group has none. The column set is the union of
/// categories observed across all groups. When at least one dry record exists,
/// every row gets `<category>_vs_dry = mean(category) - mean(dry)` for rain,
/// snow and mixed; otherwise no row has deltas.
///
/// An empty input yields an empty summary.
///
/// # Examples
///
/// ```
/// use trendwx::{summarize, DayCategory, MergedRecord};
/// use chrono::NaiveDate;
///
/// let record = |ratio: f64, category| MergedRecord {
///     date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     group: "A".to_string(),
///     ratio,
///     precipitation_sum: None,
///     rain_sum: None,
///     snowfall_sum: None,
///     category,
/// };
/// let summary = summarize(&[
///     record(10.0, DayCategory::Dry),
///     record(20.0, DayCategory::Dry),
///     record(5.0, DayCategory::Rain),
/// ]);
/// let row = summary.row("A").unwrap();
/// assert_eq!(row.dry, 15.0);
/// assert_eq!(row.rain_vs_dry, Some(-10.0));
/// ```
pub fn summarize(records: &[MergedRecord]) -> Summary {
    let mut cells: BTreeMap<&str, [Cell; 4]> = BTreeMap::new();
    let mut observed = BTreeSet::new();

    for record in records {
        let cell = &mut cells.entry(record.group.as_str()).or_default()[record.category.index()];
        cell.sum += record.ratio;
        cell.count += 1;
        observed.insert(record.category);
    }

    let has_baseline = observed.contains(&DayCategory::BASELINE);
    let rows = cells
        .into_iter()
        .map(|(group, group_cells)| {
            let mut observations = CategoryCounts::default();
            for category in DayCategory::ALL {
                observations.set(category, group_cells[category.index()].count);
            }
            let mean = |category: DayCategory| group_cells[category.index()].mean_or_zero();
            let dry = mean(DayCategory::Dry);
            let delta = |category: DayCategory| has_baseline.then(|| mean(category) - dry);

            SummaryRow {
                group: group.to_string(),
                dry,
                rain: mean(DayCategory::Rain),
                snow: mean(DayCategory::Snow),
                mixed: mean(DayCategory::Mixed),
                rain_vs_dry: delta(DayCategory::Rain),
                snow_vs_dry: delta(DayCategory::Snow),
                mixed_vs_dry: delta(DayCategory::Mixed),
                observations,
            }
        })
        .collect();

    Summary {
        categories: observed.into_iter().collect(),
        rows,
    }
}
