mod analysis;
mod engine;
mod error;
mod export;
mod sources;
mod trend_weather;
mod types;
mod utils;

pub use analysis::Analysis;
pub use error::{Stage, TrendWxError};
pub use trend_weather::*;

pub use engine::aggregate::summarize;
pub use engine::classify::*;
pub use engine::correlate::*;
pub use engine::error::*;
pub use engine::join::*;
pub use engine::profile::*;

pub use export::error::ExportError;
pub use export::frames::*;

pub use sources::config::*;
pub use sources::error::SourceError;
pub use sources::naver::{parse_search_response, NaverTrendClient, TrendSource, MAX_GROUPS_PER_REQUEST};
pub use sources::open_meteo::*;
pub use sources::request_cache::{RequestKey, TtlCache};

pub use types::date_range::DateRange;
pub use types::day_category::{DayCategory, UnknownDayCategory};
pub use types::location::*;
pub use types::merged_record::MergedRecord;
pub use types::summary::*;
pub use types::trend_point::*;
pub use types::weather_point::*;
