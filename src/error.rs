use crate::export::error::ExportError;
use crate::sources::error::SourceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which series fetch an analysis was waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Trend,
    Weather,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Trend => write!(f, "search trend"),
            Stage::Weather => write!(f, "weather"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TrendWxError {
    #[error("The {stage} source is unavailable: {source}")]
    SourceUnavailable {
        stage: Stage,
        #[source]
        source: SourceError,
    },

    #[error(
        "No dates overlap between the trend series ({trend_rows} rows) and the weather series ({weather_rows} rows)"
    )]
    EmptyJoin {
        trend_rows: usize,
        weather_rows: usize,
    },

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl TrendWxError {
    pub(crate) fn trend(source: SourceError) -> Self {
        TrendWxError::SourceUnavailable {
            stage: Stage::Trend,
            source,
        }
    }

    pub(crate) fn weather(source: SourceError) -> Self {
        TrendWxError::SourceUnavailable {
            stage: Stage::Weather,
            source,
        }
    }

    /// The fetch stage that failed, if this is a source failure.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            TrendWxError::SourceUnavailable { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
