use crate::types::day_category::DayCategory;
use bon::Builder;
use serde::{Deserialize, Serialize};

/// Default daily rain total (mm) at or above which a day counts as rainy.
pub const DEFAULT_RAIN_THRESHOLD_MM: f64 = 1.0;
/// Default daily snowfall total at or above which a day counts as snowy.
pub const DEFAULT_SNOW_THRESHOLD_MM: f64 = 1.0;

/// The rain and snowfall cut-offs used to classify a day.
///
/// Passed per invocation; there is no process-wide threshold state.
///
/// # Examples
///
/// ```
/// use trendwx::{DayCategory, Thresholds};
///
/// let strict = Thresholds::builder().rain_mm(5.0).build();
/// assert_eq!(strict.snow_mm, 1.0);
/// assert_eq!(strict.classify(Some(3.0), None), DayCategory::Dry);
/// assert_eq!(Thresholds::default().classify(Some(3.0), None), DayCategory::Rain);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize, Deserialize)]
pub struct Thresholds {
    #[builder(default = DEFAULT_RAIN_THRESHOLD_MM)]
    pub rain_mm: f64,
    #[builder(default = DEFAULT_SNOW_THRESHOLD_MM)]
    pub snow_mm: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            rain_mm: DEFAULT_RAIN_THRESHOLD_MM,
            snow_mm: DEFAULT_SNOW_THRESHOLD_MM,
        }
    }
}

impl Thresholds {
    pub fn new(rain_mm: f64, snow_mm: f64) -> Self {
        Self { rain_mm, snow_mm }
    }

    /// Classifies one day. See [`classify`].
    pub fn classify(&self, rain_sum: Option<f64>, snowfall_sum: Option<f64>) -> DayCategory {
        classify(rain_sum, snowfall_sum, self)
    }
}

/// Maps a day's rain and snowfall totals to a [`DayCategory`].
///
/// Absent values read as `0.0`. The first matching rule wins:
/// both thresholds reached is `Mixed`, then snowfall alone is `Snow`, then
/// rain alone is `Rain`, otherwise `Dry`. Total and deterministic: every
/// input, negative or not, maps to exactly one category.
pub fn classify(
    rain_sum: Option<f64>,
    snowfall_sum: Option<f64>,
    thresholds: &Thresholds,
) -> DayCategory {
    let rain = rain_sum.unwrap_or(0.0);
    let snow = snowfall_sum.unwrap_or(0.0);
    let rainy = rain >= thresholds.rain_mm;
    let snowy = snow >= thresholds.snow_mm;

    match (rainy, snowy) {
        (true, true) => DayCategory::Mixed,
        (false, true) => DayCategory::Snow,
        (true, false) => DayCategory::Rain,
        (false, false) => DayCategory::Dry,
    }
}
