use crate::engine::aggregate::summarize;
use crate::engine::classify::Thresholds;
use crate::engine::correlate::{
    correlate, correlate_by_group, CorrelationDirection, CorrelationStrength, GroupCorrelation,
};
use crate::engine::error::UndefinedCorrelation;
use crate::engine::join::{join, JoinStats};
use crate::engine::profile::{
    category_profile, day_distribution, group_statistics, group_trend_by_period, trend_by_period,
    CategoryProfile, GroupPeriodTrend, GroupStatistics, Period, PeriodTrend,
};
use crate::export::error::ExportError;
use crate::export::frames::{records_frame, summary_frame, write_csv};
use crate::sources::open_meteo::{LocationCoverage, WeatherSeries};
use crate::types::day_category::DayCategory;
use crate::types::merged_record::MergedRecord;
use crate::types::summary::Summary;
use crate::types::trend_point::TrendPoint;
use crate::types::weather_point::MagnitudeField;
use log::info;
use polars::prelude::DataFrame;
use std::collections::BTreeMap;
use std::path::Path;

/// Everything one trend/weather comparison produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub records: Vec<MergedRecord>,
    pub summary: Summary,
    /// Pooled across all groups; per-group values come from
    /// [`Analysis::correlation_by_group`].
    pub correlation: Result<f64, UndefinedCorrelation>,
    pub magnitude: MagnitudeField,
    pub join_stats: JoinStats,
    pub coverage: LocationCoverage,
    pub thresholds: Thresholds,
}

impl Analysis {
    /// Runs join, summary and correlation on already fetched series.
    ///
    /// Never fails: non-overlapping series give an empty analysis, see
    /// [`Analysis::is_empty`].
    ///
    /// ```
    /// use trendwx::{Analysis, MagnitudeField, Thresholds, TrendPoint, WeatherPoint, WeatherSeries};
    /// use chrono::NaiveDate;
    ///
    /// let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
    /// let trend = vec![TrendPoint::new(day(1), "golf", 80.0), TrendPoint::new(day(2), "golf", 20.0)];
    /// let weather = WeatherSeries {
    ///     points: vec![
    ///         WeatherPoint::new(day(1), Some(0.0), Some(0.0), Some(0.0)),
    ///         WeatherPoint::new(day(2), Some(15.0), Some(15.0), Some(0.0)),
    ///     ],
    ///     coverage: Default::default(),
    /// };
    ///
    /// let analysis = Analysis::from_series(&trend, &weather, Thresholds::default(), MagnitudeField::Rain);
    /// assert_eq!(analysis.summary.row("golf").unwrap().rain_vs_dry, Some(-60.0));
    /// assert!((analysis.correlation.unwrap() + 1.0).abs() < 1e-12);
    /// ```
    pub fn from_series(
        trend: &[TrendPoint],
        weather: &WeatherSeries,
        thresholds: Thresholds,
        magnitude: MagnitudeField,
    ) -> Self {
        let joined = join(trend, &weather.points, &thresholds);
        let summary = summarize(&joined.records);
        let correlation = correlate(&joined.records, magnitude);
        info!(
            "Analyzed {} joined records across {} group(s)",
            joined.records.len(),
            summary.rows.len()
        );

        Analysis {
            records: joined.records,
            summary,
            correlation,
            magnitude,
            join_stats: joined.stats,
            coverage: weather.coverage.clone(),
            thresholds,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Strength and direction of the pooled coefficient, when defined.
    pub fn correlation_label(&self) -> Option<(CorrelationStrength, CorrelationDirection)> {
        self.correlation.as_ref().ok().map(|r| {
            (
                CorrelationStrength::from_coefficient(*r),
                CorrelationDirection::from_coefficient(*r),
            )
        })
    }

    pub fn correlation_by_group(&self) -> Vec<GroupCorrelation> {
        correlate_by_group(&self.records, self.magnitude)
    }

    pub fn category_profile(&self) -> Vec<CategoryProfile> {
        category_profile(&self.records)
    }

    pub fn day_distribution(&self) -> BTreeMap<DayCategory, usize> {
        day_distribution(&self.records)
    }

    pub fn group_statistics(&self) -> Vec<GroupStatistics> {
        group_statistics(&self.records)
    }

    pub fn trend_by_period(&self, period: Period) -> Vec<PeriodTrend> {
        trend_by_period(&self.records, period)
    }

    pub fn group_trend_by_period(&self, period: Period) -> Vec<GroupPeriodTrend> {
        group_trend_by_period(&self.records, period)
    }

    pub fn records_frame(&self) -> Result<DataFrame, ExportError> {
        records_frame(&self.records)
    }

    pub fn summary_frame(&self) -> Result<DataFrame, ExportError> {
        summary_frame(&self.summary)
    }

    /// Writes the daily records and the summary as two CSV files.
    pub fn write_csv(&self, records_path: &Path, summary_path: &Path) -> Result<(), ExportError> {
        write_csv(&mut self.records_frame()?, records_path)?;
        write_csv(&mut self.summary_frame()?, summary_path)
    }
}
