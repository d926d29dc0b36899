use crate::types::weather_point::MagnitudeField;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One of the two series fed into a correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelatedSeries {
    Magnitude(MagnitudeField),
    Ratio,
}

impl fmt::Display for CorrelatedSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelatedSeries::Magnitude(field) => write!(f, "{}", field),
            CorrelatedSeries::Ratio => write!(f, "ratio"),
        }
    }
}

/// The "not computable" outcome of a correlation.
///
/// Distinct from a coefficient of `0.0`, which means no linear relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum UndefinedCorrelation {
    #[error("Correlation needs at least 2 records, found {found}")]
    TooFewRecords { found: usize },

    #[error("Correlation is undefined because the {series} series is constant")]
    ZeroVariance { series: CorrelatedSeries },

    #[error("Correlation is undefined because the {series} series contains a non-finite value")]
    NonFinite { series: CorrelatedSeries },
}
