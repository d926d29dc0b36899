//! Defines the `DayCategory` enum, the weather label attached to every joined day.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The weather category a calendar day falls into.
///
/// A category is always derived from the rain and snowfall sums of one
/// [`crate::WeatherPoint`] through [`crate::Thresholds::classify`]; it is never
/// stored independently of the observation it came from.
///
/// The declaration order (`Dry`, `Rain`, `Snow`, `Mixed`) is the canonical
/// column order used by [`crate::Summary`] and the flat export.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DayCategory {
    /// Neither rain nor snowfall reached its threshold. Also the category of a
    /// day with no weather reading at all.
    Dry,
    /// Rain reached its threshold, snowfall did not.
    Rain,
    /// Snowfall reached its threshold, rain did not.
    Snow,
    /// Both rain and snowfall reached their thresholds.
    Mixed,
}

/// Returned when parsing a string that is not one of `dry`, `rain`, `snow`, `mixed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown day category '{0}'")]
pub struct UnknownDayCategory(pub String);

impl DayCategory {
    /// All categories in canonical column order.
    pub const ALL: [DayCategory; 4] = [
        DayCategory::Dry,
        DayCategory::Rain,
        DayCategory::Snow,
        DayCategory::Mixed,
    ];

    /// The reference category that delta columns are computed against.
    pub const BASELINE: DayCategory = DayCategory::Dry;

    /// The lowercase label used in exported column names and `day_type` cells.
    ///
    /// # Examples
    ///
    /// ```
    /// use trendwx::DayCategory;
    ///
    /// assert_eq!(DayCategory::Mixed.as_str(), "mixed");
    /// assert_eq!(DayCategory::Dry.to_string(), "dry");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            DayCategory::Dry => "dry",
            DayCategory::Rain => "rain",
            DayCategory::Snow => "snow",
            DayCategory::Mixed => "mixed",
        }
    }

    /// Name of the `<category>_vs_dry` delta column, `None` for the baseline itself.
    pub fn delta_column(&self) -> Option<&'static str> {
        match self {
            DayCategory::Dry => None,
            DayCategory::Rain => Some("rain_vs_dry"),
            DayCategory::Snow => Some("snow_vs_dry"),
            DayCategory::Mixed => Some("mixed_vs_dry"),
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            DayCategory::Dry => 0,
            DayCategory::Rain => 1,
            DayCategory::Snow => 2,
            DayCategory::Mixed => 3,
        }
    }
}

impl fmt::Display for DayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DayCategory {
    type Err = UnknownDayCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dry" => Ok(DayCategory::Dry),
            "rain" => Ok(DayCategory::Rain),
            "snow" => Ok(DayCategory::Snow),
            "mixed" => Ok(DayCategory::Mixed),
            other => Err(UnknownDayCategory(other.to_string())),
        }
    }
}
