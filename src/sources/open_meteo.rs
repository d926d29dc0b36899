use crate::sources::config::SourceConfig;
use crate::sources::error::SourceError;
use crate::sources::multi_location::fetch_average;
use crate::types::date_range::{DateRange, API_DATE_FORMAT};
use crate::types::location::{Location, LocationSpec};
use crate::types::weather_point::WeatherPoint;
use chrono::NaiveDate;
use log::{info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;

const ARCHIVE_PATH: &str = "/v1/archive";
const DAILY_FIELDS: &str = "precipitation_sum,rain_sum,snowfall_sum";

/// A location whose fetch failed while averaging several locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedLocation {
    pub name: String,
    pub reason: String,
}

/// Which locations contributed to a weather series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCoverage {
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedLocation>,
}

impl LocationCoverage {
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Daily weather for a [`LocationSpec`], plus the locations behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSeries {
    pub points: Vec<WeatherPoint>,
    pub coverage: LocationCoverage,
}

/// Anything that can produce daily precipitation totals for a [`LocationSpec`].
pub trait WeatherSource: Send + Sync {
    fn fetch_weather(
        &self,
        location: &LocationSpec,
        range: DateRange,
    ) -> impl Future<Output = Result<WeatherSeries, SourceError>> + Send;
}

/// Client for the Open-Meteo historical weather archive.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    archive_url: String,
    timezone: String,
    max_concurrent_fetches: usize,
}

#[derive(Deserialize)]
struct ArchiveResponse {
    daily: Option<DailyArrays>,
}

#[derive(Deserialize)]
struct DailyArrays {
    #[serde(default)]
    time: Vec<String>,
    precipitation_sum: Option<Vec<Option<f64>>>,
    rain_sum: Option<Vec<Option<f64>>>,
    snowfall_sum: Option<Vec<Option<f64>>>,
}

impl OpenMeteoClient {
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        Ok(Self {
            client: config.http_client()?,
            archive_url: format!(
                "{}{}",
                config.open_meteo_base_url.trim_end_matches('/'),
                ARCHIVE_PATH
            ),
            timezone: config.timezone.clone(),
            max_concurrent_fetches: config.max_concurrent_fetches,
        })
    }

    /// Daily series for a single location.
    pub async fn fetch_location(
        &self,
        location: &Location,
        range: DateRange,
    ) -> Result<Vec<WeatherPoint>, SourceError> {
        let url = &self.archive_url;
        info!("Fetching daily weather for {} over {}", location.name, range);

        let response = self
            .client
            .get(url)
            .query(&[
                ("latitude", location.coordinate.0.to_string()),
                ("longitude", location.coordinate.1.to_string()),
                ("start_date", range.start_param()),
                ("end_date", range.end_param()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", self.timezone.clone()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(match e.status() {
                    Some(status) => SourceError::HttpStatus {
                        url: url.clone(),
                        status,
                        source: e,
                    },
                    None => SourceError::NetworkRequest(url.clone(), e),
                });
            }
        };

        let text = response
            .text()
            .await
            .map_err(|e| SourceError::NetworkRequest(url.clone(), e))?;
        parse_archive_response(url, &text)
    }
}

impl WeatherSource for OpenMeteoClient {
    async fn fetch_weather(
        &self,
        location: &LocationSpec,
        range: DateRange,
    ) -> Result<WeatherSeries, SourceError> {
        match location {
            LocationSpec::Point(point) => {
                let points = self.fetch_location(point, range).await?;
                Ok(WeatherSeries {
                    points,
                    coverage: LocationCoverage {
                        succeeded: vec![point.name.clone()],
                        failed: Vec::new(),
                    },
                })
            }
            LocationSpec::Average(locations) => {
                fetch_average(locations, self.max_concurrent_fetches, |l| {
                    self.fetch_location(l, range)
                })
                .await
            }
        }
    }
}

/// Turns an archive response body into weather points.
///
/// `null` entries become absent fields, as does a field array missing
/// altogether. Field arrays whose length differs from `time` are rejected.
pub fn parse_archive_response(url: &str, body: &str) -> Result<Vec<WeatherPoint>, SourceError> {
    let malformed = |message: String| SourceError::MalformedResponse {
        url: url.to_string(),
        message,
    };

    let response: ArchiveResponse =
        serde_json::from_str(body).map_err(|source| SourceError::JsonParse {
            url: url.to_string(),
            source,
        })?;
    let daily = response
        .daily
        .ok_or_else(|| malformed("missing 'daily' object".to_string()))?;

    let len = daily.time.len();
    let column = |name: &str, values: Option<Vec<Option<f64>>>| match values {
        None => Ok(vec![None; len]),
        Some(values) if values.len() == len => Ok(values),
        Some(values) => Err(malformed(format!(
            "'{}' has {} entries but 'time' has {}",
            name,
            values.len(),
            len
        ))),
    };
    let precipitation = column("precipitation_sum", daily.precipitation_sum)?;
    let rain = column("rain_sum", daily.rain_sum)?;
    let snowfall = column("snowfall_sum", daily.snowfall_sum)?;

    daily
        .time
        .iter()
        .enumerate()
        .map(|(i, time)| {
            let date = NaiveDate::parse_from_str(time, API_DATE_FORMAT)
                .map_err(|e| malformed(format!("invalid date '{}': {}", time, e)))?;
            Ok(WeatherPoint::new(date, precipitation[i], rain[i], snowfall[i]))
        })
        .collect()
}
