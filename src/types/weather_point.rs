use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Daily precipitation totals for one date, in millimetres.
///
/// In single-location mode this is one station's reading; in multi-location
/// mode it is the per-date average across the location set. Any field may be
/// absent; consumers treat an absent value as `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherPoint {
    pub date: NaiveDate,
    pub precipitation_sum: Option<f64>,
    pub rain_sum: Option<f64>,
    pub snowfall_sum: Option<f64>,
}

impl WeatherPoint {
    pub fn new(
        date: NaiveDate,
        precipitation_sum: Option<f64>,
        rain_sum: Option<f64>,
        snowfall_sum: Option<f64>,
    ) -> Self {
        Self {
            date,
            precipitation_sum,
            rain_sum,
            snowfall_sum,
        }
    }

    /// The chosen field's value, absent values read as `0.0`.
    pub fn magnitude(&self, field: MagnitudeField) -> f64 {
        field.select(self.precipitation_sum, self.rain_sum, self.snowfall_sum)
    }
}

/// The weather field correlated against the search ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MagnitudeField {
    /// Total precipitation (rain + showers + snowfall water equivalent).
    #[default]
    Precipitation,
    Rain,
    Snowfall,
}

impl MagnitudeField {
    pub const ALL: [MagnitudeField; 3] = [
        MagnitudeField::Precipitation,
        MagnitudeField::Rain,
        MagnitudeField::Snowfall,
    ];

    /// Column name of the field in both the source API and the export.
    pub fn column_name(&self) -> &'static str {
        match self {
            MagnitudeField::Precipitation => "precipitation_sum",
            MagnitudeField::Rain => "rain_sum",
            MagnitudeField::Snowfall => "snowfall_sum",
        }
    }

    pub(crate) fn select(
        &self,
        precipitation_sum: Option<f64>,
        rain_sum: Option<f64>,
        snowfall_sum: Option<f64>,
    ) -> f64 {
        match self {
            MagnitudeField::Precipitation => precipitation_sum,
            MagnitudeField::Rain => rain_sum,
            MagnitudeField::Snowfall => snowfall_sum,
        }
        .unwrap_or(0.0)
    }
}

impl fmt::Display for MagnitudeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}
