//! Descriptive views over joined records beyond the pivoted summary:
//! how each weather category compares with the overall mean, how many days
//! fell into each category, per-group spread of the search ratio, and the
//! ratio over time in daily, weekly or monthly buckets.

use crate::types::day_category::DayCategory;
use crate::types::merged_record::MergedRecord;
use crate::utils::{mean, sample_std_dev};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeDirection {
    Increase,
    Decrease,
    Same,
}

/// How one weather category compares with all joined records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub category: DayCategory,
    /// Mean ratio over every record in the category, all groups pooled.
    pub mean_ratio: f64,
    pub records: usize,
    /// Distinct calendar days in the category.
    pub days: usize,
    /// `(mean_ratio - overall_mean) / overall_mean * 100`; `None` when the
    /// overall mean is zero.
    pub change_vs_overall_pct: Option<f64>,
}

impl CategoryProfile {
    pub fn direction(&self) -> Option<ChangeDirection> {
        self.change_vs_overall_pct.map(|pct| {
            if pct > 0.0 {
                ChangeDirection::Increase
            } else if pct < 0.0 {
                ChangeDirection::Decrease
            } else {
                ChangeDirection::Same
            }
        })
    }
}

/// Profiles every observed category, highest mean ratio first.
pub fn category_profile(records: &[MergedRecord]) -> Vec<CategoryProfile> {
    let ratios: Vec<f64> = records.iter().map(|r| r.ratio).collect();
    let Some(overall) = mean(&ratios) else {
        return Vec::new();
    };

    let mut by_category: BTreeMap<DayCategory, (Vec<f64>, BTreeSet<NaiveDate>)> =
        BTreeMap::new();
    for record in records {
        let (ratios, days) = by_category.entry(record.category).or_default();
        ratios.push(record.ratio);
        days.insert(record.date);
    }

    let mut profiles: Vec<CategoryProfile> = by_category
        .into_iter()
        .filter_map(|(category, (ratios, days))| {
            let mean_ratio = mean(&ratios)?;
            Some(CategoryProfile {
                category,
                mean_ratio,
                records: ratios.len(),
                days: days.len(),
                change_vs_overall_pct: (overall != 0.0)
                    .then(|| (mean_ratio - overall) / overall * 100.0),
            })
        })
        .collect();
    profiles.sort_by(|a, b| b.mean_ratio.total_cmp(&a.mean_ratio));
    profiles
}

/// Number of distinct calendar days per observed category.
pub fn day_distribution(records: &[MergedRecord]) -> BTreeMap<DayCategory, usize> {
    let days: BTreeSet<(NaiveDate, DayCategory)> =
        records.iter().map(|r| (r.date, r.category)).collect();
    let mut distribution = BTreeMap::new();
    for (_, category) in days {
        *distribution.entry(category).or_insert(0) += 1;
    }
    distribution
}

/// Spread of one group's search ratio over the joined period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStatistics {
    pub group: String,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation, `None` with fewer than two records.
    pub std_dev: Option<f64>,
}

/// Per-group descriptive statistics, sorted by group name.
pub fn group_statistics(records: &[MergedRecord]) -> Vec<GroupStatistics> {
    let mut by_group: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for record in records {
        by_group
            .entry(record.group.as_str())
            .or_default()
            .push(record.ratio);
    }
    by_group
        .into_iter()
        .filter_map(|(group, ratios)| {
            Some(GroupStatistics {
                group: group.to_string(),
                count: ratios.len(),
                mean: mean(&ratios)?,
                min: ratios.iter().copied().fold(f64::INFINITY, f64::min),
                max: ratios.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                std_dev: sample_std_dev(&ratios),
            })
        })
        .collect()
}

/// Calendar bucket size for [`trend_by_period`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[default]
    Day,
    /// Monday through Sunday.
    Week,
    Month,
}

impl Period {
    /// First day of the bucket containing `date`.
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Period::Day => date,
            Period::Week => date - Days::new(u64::from(date.weekday().num_days_from_monday())),
            Period::Month => date - Days::new(u64::from(date.day0())),
        }
    }

    /// `2024-03-05`, `2024-W10` (ISO week numbering) or `2024-03`.
    pub fn label(self, start: NaiveDate) -> String {
        match self {
            Period::Day => start.format("%Y-%m-%d").to_string(),
            Period::Week => {
                let week = start.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Period::Month => format!("{}-{:02}", start.year(), start.month()),
        }
    }
}

/// Mean search ratio and weather of one time bucket, all groups pooled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTrend {
    pub start: NaiveDate,
    pub label: String,
    pub records: usize,
    pub mean_ratio: f64,
    /// Mean over the records that carry the reading; `None` if none do.
    pub precipitation_sum: Option<f64>,
    pub rain_sum: Option<f64>,
    pub snowfall_sum: Option<f64>,
}

/// Buckets records by `period` and averages ratio and weather per bucket,
/// in chronological order. Empty buckets are not emitted.
pub fn trend_by_period(records: &[MergedRecord], period: Period) -> Vec<PeriodTrend> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&MergedRecord>> = BTreeMap::new();
    for record in records {
        buckets
            .entry(period.bucket_start(record.date))
            .or_default()
            .push(record);
    }

    buckets
        .into_iter()
        .filter_map(|(start, bucket)| {
            let ratios: Vec<f64> = bucket.iter().map(|r| r.ratio).collect();
            let present = |select: fn(&MergedRecord) -> Option<f64>| {
                let values: Vec<f64> = bucket.iter().filter_map(|r| select(r)).collect();
                mean(&values)
            };
            Some(PeriodTrend {
                start,
                label: period.label(start),
                records: bucket.len(),
                mean_ratio: mean(&ratios)?,
                precipitation_sum: present(|r| r.precipitation_sum),
                rain_sum: present(|r| r.rain_sum),
                snowfall_sum: present(|r| r.snowfall_sum),
            })
        })
        .collect()
}

/// Mean search ratio of one group in one time bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPeriodTrend {
    pub start: NaiveDate,
    pub label: String,
    pub group: String,
    pub records: usize,
    pub mean_ratio: f64,
}

/// Like [`trend_by_period`] but kept apart per group, ordered by bucket and
/// then group name.
pub fn group_trend_by_period(records: &[MergedRecord], period: Period) -> Vec<GroupPeriodTrend> {
    let mut buckets: BTreeMap<(NaiveDate, &str), Vec<f64>> = BTreeMap::new();
    for record in records {
        buckets
            .entry((period.bucket_start(record.date), record.group.as_str()))
            .or_default()
            .push(record.ratio);
    }

    buckets
        .into_iter()
        .filter_map(|((start, group), ratios)| {
            Some(GroupPeriodTrend {
                start,
                label: period.label(start),
                group: group.to_string(),
                records: ratios.len(),
                mean_ratio: mean(&ratios)?,
            })
        })
        .collect()
}
