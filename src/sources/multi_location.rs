//! Nationwide-style weather: fetch several locations concurrently and average
//! their daily readings per date.

use crate::sources::error::SourceError;
use crate::sources::open_meteo::{FailedLocation, LocationCoverage, WeatherSeries};
use crate::types::location::Location;
use crate::types::weather_point::WeatherPoint;
use chrono::NaiveDate;
use futures_util::stream::{self, StreamExt};
use log::{info, warn};
use std::collections::BTreeMap;
use std::future::Future;

/// Fetches every location with at most `max_concurrent` requests in flight.
///
/// A failing location is recorded in the coverage and does not stop the
/// others. Fails only when no location succeeded.
pub(crate) async fn fetch_average<'a, F, Fut>(
    locations: &'a [Location],
    max_concurrent: usize,
    fetch: F,
) -> Result<WeatherSeries, SourceError>
where
    F: Fn(&'a Location) -> Fut,
    Fut: Future<Output = Result<Vec<WeatherPoint>, SourceError>>,
{
    if locations.is_empty() {
        return Err(SourceError::InvalidRequest(
            "at least one location is required".to_string(),
        ));
    }

    // Requests are built up front; a stream mapping over borrowed locations
    // would not be `Send`.
    let requests: Vec<_> = locations
        .iter()
        .enumerate()
        .map(|(index, location)| {
            let request = fetch(location);
            async move { (index, request.await) }
        })
        .collect();
    let mut results: Vec<(usize, Result<Vec<WeatherPoint>, SourceError>)> =
        stream::iter(requests)
            .buffer_unordered(max_concurrent.max(1))
            .collect()
            .await;
    results.sort_by_key(|(index, _)| *index);

    let mut coverage = LocationCoverage::default();
    let mut series = Vec::with_capacity(results.len());
    for (index, result) in results {
        let name = locations[index].name.clone();
        match result {
            Ok(points) => {
                coverage.succeeded.push(name);
                series.push(points);
            }
            Err(e) => {
                warn!("Weather fetch for {} failed: {}", name, e);
                coverage.failed.push(FailedLocation {
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }

    if series.is_empty() {
        return Err(SourceError::NoLocationSucceeded {
            attempted: locations.len(),
        });
    }
    info!(
        "Averaging weather over {} of {} locations",
        coverage.succeeded.len(),
        coverage.attempted()
    );

    Ok(WeatherSeries {
        points: average_by_date(&series),
        coverage,
    })
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Per-date mean of each field over the series that reported it.
///
/// Dates are the union across all series, in ascending order. A field with no
/// reading on a date stays absent.
pub(crate) fn average_by_date(series: &[Vec<WeatherPoint>]) -> Vec<WeatherPoint> {
    let mut by_date: BTreeMap<NaiveDate, [Accumulator; 3]> = BTreeMap::new();
    for point in series.iter().flatten() {
        let [precipitation, rain, snowfall] = by_date.entry(point.date).or_default();
        precipitation.add(point.precipitation_sum);
        rain.add(point.rain_sum);
        snowfall.add(point.snowfall_sum);
    }
    by_date
        .into_iter()
        .map(|(date, [precipitation, rain, snowfall])| {
            WeatherPoint::new(date, precipitation.mean(), rain.mean(), snowfall.mean())
        })
        .collect()
}
