use crate::engine::classify::Thresholds;
use crate::types::merged_record::MergedRecord;
use crate::types::trend_point::TrendPoint;
use crate::types::weather_point::WeatherPoint;
use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Row and date counts describing what an inner join kept and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStats {
    pub trend_rows: usize,
    pub weather_rows: usize,
    pub joined_rows: usize,
    /// Distinct trend dates with no weather reading.
    pub trend_dates_dropped: usize,
    /// Distinct weather dates with no trend point.
    pub weather_dates_dropped: usize,
}

/// Output of [`join`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Joined {
    /// Sorted by date, then group.
    pub records: Vec<MergedRecord>,
    pub stats: JoinStats,
}

impl Joined {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Inner-joins trend points with weather points on calendar date.
///
/// Every trend point whose date has a weather point yields one record per
/// matching weather point, classified with `thresholds`. Dates present in only
/// one input are dropped and counted in [`JoinStats`]. Either input being
/// empty yields an empty result, never an error.
pub fn join(trend: &[TrendPoint], weather: &[WeatherPoint], thresholds: &Thresholds) -> Joined {
    let mut weather_by_date: HashMap<NaiveDate, Vec<&WeatherPoint>> = HashMap::new();
    for point in weather {
        weather_by_date.entry(point.date).or_default().push(point);
    }

    let mut records = Vec::with_capacity(trend.len());
    let mut unmatched_trend_dates = HashSet::new();
    let mut matched_dates = HashSet::new();

    for point in trend {
        let Some(days) = weather_by_date.get(&point.date) else {
            unmatched_trend_dates.insert(point.date);
            continue;
        };
        matched_dates.insert(point.date);
        for day in days {
            records.push(MergedRecord {
                date: point.date,
                group: point.group.clone(),
                ratio: point.ratio,
                precipitation_sum: day.precipitation_sum,
                rain_sum: day.rain_sum,
                snowfall_sum: day.snowfall_sum,
                category: thresholds.classify(day.rain_sum, day.snowfall_sum),
            });
        }
    }

    records.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.group.cmp(&b.group)));

    let stats = JoinStats {
        trend_rows: trend.len(),
        weather_rows: weather.len(),
        joined_rows: records.len(),
        trend_dates_dropped: unmatched_trend_dates.len(),
        weather_dates_dropped: weather_by_date
            .keys()
            .filter(|date| !matched_dates.contains(*date))
            .count(),
    };

    if stats.trend_dates_dropped > 0 || stats.weather_dates_dropped > 0 {
        warn!(
            "Join dropped {} trend dates and {} weather dates without a counterpart",
            stats.trend_dates_dropped, stats.weather_dates_dropped
        );
    }
    debug!(
        "Joined {} trend rows with {} weather rows into {} records",
        stats.trend_rows, stats.weather_rows, stats.joined_rows
    );

    Joined { records, stats }
}
