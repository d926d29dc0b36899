use crate::types::day_category::DayCategory;
use crate::types::weather_point::MagnitudeField;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trend point joined with the weather of its date.
///
/// Created once by [`crate::join`] and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    pub date: NaiveDate,
    pub group: String,
    pub ratio: f64,
    pub precipitation_sum: Option<f64>,
    pub rain_sum: Option<f64>,
    pub snowfall_sum: Option<f64>,
    pub category: DayCategory,
}

impl MergedRecord {
    /// The chosen weather field, absent values read as `0.0`.
    pub fn magnitude(&self, field: MagnitudeField) -> f64 {
        field.select(self.precipitation_sum, self.rain_sum, self.snowfall_sum)
    }
}
