use crate::engine::error::{CorrelatedSeries, UndefinedCorrelation};
use crate::types::merged_record::MergedRecord;
use crate::types::weather_point::MagnitudeField;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Pearson correlation between a weather field and the search ratio.
///
/// The analyzer is group-agnostic: filter the records to one group before
/// calling to get a per-group coefficient, or use [`correlate_by_group`].
///
/// # Errors
///
/// [`UndefinedCorrelation`] when fewer than two records are supplied, when
/// either series is constant, or when a value is not finite.
///
/// # Examples
///
/// ```
/// use trendwx::{correlate, DayCategory, MagnitudeField, MergedRecord, UndefinedCorrelation};
/// use chrono::NaiveDate;
///
/// let records: Vec<MergedRecord> = (0..5)
///     .map(|i| MergedRecord {
///         date: NaiveDate::from_ymd_opt(2024, 8, 1 + i).unwrap(),
///         group: "golf".to_string(),
///         ratio: 2.0 * i as f64,
///         precipitation_sum: Some(i as f64),
///         rain_sum: Some(i as f64),
///         snowfall_sum: None,
///         category: DayCategory::Dry,
///     })
///     .collect();
///
/// let r = correlate(&records, MagnitudeField::Precipitation).unwrap();
/// assert!((r - 1.0).abs() < 1e-12);
///
/// // Snowfall never varies, so there is nothing to correlate.
/// assert!(matches!(
///     correlate(&records, MagnitudeField::Snowfall),
///     Err(UndefinedCorrelation::ZeroVariance { .. })
/// ));
/// ```
pub fn correlate(
    records: &[MergedRecord],
    field: MagnitudeField,
) -> Result<f64, UndefinedCorrelation> {
    let magnitudes: Vec<f64> = records.iter().map(|r| r.magnitude(field)).collect();
    let ratios: Vec<f64> = records.iter().map(|r| r.ratio).collect();
    pearson(
        &magnitudes,
        &ratios,
        CorrelatedSeries::Magnitude(field),
        CorrelatedSeries::Ratio,
    )
}

/// Pearson product-moment coefficient of two equally long series.
///
/// The result is clamped to `[-1, 1]` to absorb floating point overshoot.
pub fn pearson(
    xs: &[f64],
    ys: &[f64],
    x_series: CorrelatedSeries,
    y_series: CorrelatedSeries,
) -> Result<f64, UndefinedCorrelation> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return Err(UndefinedCorrelation::TooFewRecords { found: n });
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);

    for (values, series) in [(xs, x_series), (ys, y_series)] {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(UndefinedCorrelation::NonFinite { series });
        }
        if values.iter().all(|v| *v == values[0]) {
            return Err(UndefinedCorrelation::ZeroVariance { series });
        }
    }

    let dxs = scaled_deviations(xs, x_series)?;
    let dys = scaled_deviations(ys, y_series)?;

    let (mut covariance, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (dx, dy) in dxs.iter().zip(&dys) {
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = var_x.sqrt() * var_y.sqrt();
    if denominator == 0.0 {
        let series = if var_x == 0.0 { x_series } else { y_series };
        return Err(UndefinedCorrelation::ZeroVariance { series });
    }
    Ok((covariance / denominator).clamp(-1.0, 1.0))
}

/// Deviations from the mean divided by the largest one, so every value lies
/// in `[-1, 1]` and squaring cannot overflow. Pearson's `r` is unchanged by
/// the scaling.
fn scaled_deviations(
    values: &[f64],
    series: CorrelatedSeries,
) -> Result<Vec<f64>, UndefinedCorrelation> {
    let n = values.len() as f64;
    let mean = values.iter().map(|v| v / n).sum::<f64>();
    let deviations: Vec<f64> = values.iter().map(|v| v - mean).collect();

    let spread = deviations.iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));
    if !spread.is_finite() {
        return Err(UndefinedCorrelation::NonFinite { series });
    }
    if spread == 0.0 {
        return Err(UndefinedCorrelation::ZeroVariance { series });
    }
    Ok(deviations.into_iter().map(|d| d / spread).collect())
}

/// The coefficient (or its undefined marker) for one keyword group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCorrelation {
    pub group: String,
    pub records: usize,
    pub coefficient: Result<f64, UndefinedCorrelation>,
}

/// Runs [`correlate`] separately for every group, sorted by group name.
pub fn correlate_by_group(records: &[MergedRecord], field: MagnitudeField) -> Vec<GroupCorrelation> {
    let mut by_group: BTreeMap<&str, Vec<MergedRecord>> = BTreeMap::new();
    for record in records {
        by_group
            .entry(record.group.as_str())
            .or_default()
            .push(record.clone());
    }
    by_group
        .into_iter()
        .map(|(group, group_records)| GroupCorrelation {
            group: group.to_string(),
            records: group_records.len(),
            coefficient: correlate(&group_records, field),
        })
        .collect()
}

/// Conventional strength buckets for `|r|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CorrelationStrength {
    Negligible,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl CorrelationStrength {
    /// `|r| >= 0.8` very strong, `>= 0.6` strong, `>= 0.4` moderate,
    /// `>= 0.2` weak, otherwise negligible.
    pub fn from_coefficient(r: f64) -> Self {
        let magnitude = r.abs();
        if magnitude >= 0.8 {
            CorrelationStrength::VeryStrong
        } else if magnitude >= 0.6 {
            CorrelationStrength::Strong
        } else if magnitude >= 0.4 {
            CorrelationStrength::Moderate
        } else if magnitude >= 0.2 {
            CorrelationStrength::Weak
        } else {
            CorrelationStrength::Negligible
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CorrelationStrength::Negligible => "negligible",
            CorrelationStrength::Weak => "weak",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::Strong => "strong",
            CorrelationStrength::VeryStrong => "very strong",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationDirection {
    Positive,
    Negative,
    None,
}

impl CorrelationDirection {
    pub fn from_coefficient(r: f64) -> Self {
        if r > 0.0 {
            CorrelationDirection::Positive
        } else if r < 0.0 {
            CorrelationDirection::Negative
        } else {
            CorrelationDirection::None
        }
    }
}

impl fmt::Display for CorrelationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CorrelationDirection::Positive => "positive",
            CorrelationDirection::Negative => "negative",
            CorrelationDirection::None => "none",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::day_category::DayCategory;
    use chrono::NaiveDate;

    fn record(group: &str, day: u32, precipitation: f64, ratio: f64) -> MergedRecord {
        MergedRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            group: group.to_string(),
            ratio,
            precipitation_sum: Some(precipitation),
            rain_sum: Some(precipitation),
            snowfall_sum: None,
            category: DayCategory::Dry,
        }
    }

    #[test]
    fn test_exact_linear_relationship_is_one() {
        let records: Vec<MergedRecord> = (1..=20)
            .map(|d| {
                let precipitation = (d as f64 * 1.7) % 13.0;
                record("golf", d, precipitation, 2.0 * precipitation)
            })
            .collect();
        let r = correlate(&records, MagnitudeField::Precipitation).unwrap();
        assert!((r - 1.0).abs() < 1e-9, "r = {r}");
    }

    #[test]
    fn test_inverse_relationship_is_minus_one() {
        let records: Vec<MergedRecord> = (1..=10)
            .map(|d| record("golf", d, d as f64, 100.0 - 3.0 * d as f64))
            .collect();
        let r = correlate(&records, MagnitudeField::Rain).unwrap();
        assert!((r + 1.0).abs() < 1e-9, "r = {r}");
    }

    #[test]
    fn test_constant_ratio_is_undefined_not_zero() {
        let records: Vec<MergedRecord> = (1..=5)
            .map(|d| record("golf", d, d as f64, 42.0))
            .collect();
        assert_eq!(
            correlate(&records, MagnitudeField::Precipitation),
            Err(UndefinedCorrelation::ZeroVariance {
                series: CorrelatedSeries::Ratio
            })
        );
    }

    #[test]
    fn test_constant_magnitude_is_undefined() {
        let records: Vec<MergedRecord> = (1..=5)
            .map(|d| record("golf", d, 0.0, d as f64))
            .collect();
        assert_eq!(
            correlate(&records, MagnitudeField::Precipitation),
            Err(UndefinedCorrelation::ZeroVariance {
                series: CorrelatedSeries::Magnitude(MagnitudeField::Precipitation)
            })
        );
    }

    #[test]
    fn test_too_few_records() {
        assert_eq!(
            correlate(&[], MagnitudeField::Precipitation),
            Err(UndefinedCorrelation::TooFewRecords { found: 0 })
        );
        assert_eq!(
            correlate(&[record("golf", 1, 1.0, 1.0)], MagnitudeField::Precipitation),
            Err(UndefinedCorrelation::TooFewRecords { found: 1 })
        );
    }

    #[test]
    fn test_non_finite_values_are_undefined() {
        let xs = [1.0, f64::NAN, 3.0];
        let ys = [1.0, 2.0, 3.0];
        assert_eq!(
            pearson(&xs, &ys, CorrelatedSeries::Ratio, CorrelatedSeries::Ratio),
            Err(UndefinedCorrelation::NonFinite {
                series: CorrelatedSeries::Ratio
            })
        );
    }

    #[test]
    fn test_huge_magnitudes_do_not_overflow() {
        let xs = [1e200, 2e200, 3e200];
        let ys = [1.0, 2.0, 3.0];
        let r = pearson(&xs, &ys, CorrelatedSeries::Ratio, CorrelatedSeries::Ratio).unwrap();
        assert!((r - 1.0).abs() < 1e-12, "r = {r}");

        let inverted = [3e-300, 2e-300, 1e-300];
        let r = pearson(&inverted, &ys, CorrelatedSeries::Ratio, CorrelatedSeries::Ratio).unwrap();
        assert!((r + 1.0).abs() < 1e-12, "r = {r}");
    }

    #[test]
    fn test_deviation_overflow_is_non_finite() {
        let xs = [-f64::MAX, f64::MAX, f64::MAX];
        let ys = [1.0, 2.0, 3.0];
        assert_eq!(
            pearson(
                &xs,
                &ys,
                CorrelatedSeries::Magnitude(MagnitudeField::Rain),
                CorrelatedSeries::Ratio
            ),
            Err(UndefinedCorrelation::NonFinite {
                series: CorrelatedSeries::Magnitude(MagnitudeField::Rain)
            })
        );
    }

    #[test]
    fn test_pearson_known_value() {
        // cov = 6, var_x = 10, var_y = 6, so r = 6 / sqrt(60).
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [2.0, 4.0, 5.0, 4.0, 5.0];
        let r = pearson(&xs, &ys, CorrelatedSeries::Ratio, CorrelatedSeries::Ratio).unwrap();
        assert!((r - 0.7745966692414834).abs() < 1e-12, "r = {r}");
    }

    #[test]
    fn test_correlate_by_group_reports_each_group() {
        let mut records: Vec<MergedRecord> = (1..=4)
            .map(|d| record("rising", d, d as f64, d as f64 * 10.0))
            .collect();
        records.extend((1..=4).map(|d| record("flat", d, d as f64, 7.0)));
        records.push(record("single", 1, 1.0, 1.0));

        let results = correlate_by_group(&records, MagnitudeField::Precipitation);
        let groups: Vec<&str> = results.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(groups, ["flat", "rising", "single"]);
        assert!(matches!(
            results[0].coefficient,
            Err(UndefinedCorrelation::ZeroVariance { .. })
        ));
        assert!((results[1].coefficient.unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(results[2].records, 1);
        assert_eq!(
            results[2].coefficient,
            Err(UndefinedCorrelation::TooFewRecords { found: 1 })
        );
    }

    #[test]
    fn test_strength_buckets() {
        assert_eq!(CorrelationStrength::from_coefficient(-0.85), CorrelationStrength::VeryStrong);
        assert_eq!(CorrelationStrength::from_coefficient(0.8), CorrelationStrength::VeryStrong);
        assert_eq!(CorrelationStrength::from_coefficient(0.6), CorrelationStrength::Strong);
        assert_eq!(CorrelationStrength::from_coefficient(-0.45), CorrelationStrength::Moderate);
        assert_eq!(CorrelationStrength::from_coefficient(0.2), CorrelationStrength::Weak);
        assert_eq!(CorrelationStrength::from_coefficient(0.19), CorrelationStrength::Negligible);
        assert_eq!(CorrelationStrength::VeryStrong.to_string(), "very strong");
    }

    #[test]
    fn test_direction() {
        assert_eq!(CorrelationDirection::from_coefficient(0.3), CorrelationDirection::Positive);
        assert_eq!(CorrelationDirection::from_coefficient(-0.3), CorrelationDirection::Negative);
        assert_eq!(CorrelationDirection::from_coefficient(0.0), CorrelationDirection::None);
    }
}
