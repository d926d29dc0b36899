//! The main entry point: fetch a keyword trend series and a weather series for
//! the same period, then run the correlation engine on them.

use crate::analysis::Analysis;
use crate::engine::classify::Thresholds;
use crate::error::TrendWxError;
use crate::sources::config::SourceConfig;
use crate::sources::error::SourceError;
use crate::sources::naver::{validate_groups, NaverTrendClient, TrendSource};
use crate::sources::open_meteo::{OpenMeteoClient, WeatherSeries, WeatherSource};
use crate::sources::request_cache::{RequestKey, TtlCache};
use crate::types::date_range::DateRange;
use crate::types::location::LocationSpec;
use crate::types::trend_point::{KeywordGroup, TrendPoint};
use crate::types::weather_point::MagnitudeField;
use bon::bon;
use log::{info, warn};
use std::time::Duration;

/// Both raw series of one request, as cached.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedSeries {
    pub trend: Vec<TrendPoint>,
    pub weather: WeatherSeries,
}

/// Owns the trend and weather sources plus a short-lived request cache.
///
/// Identical requests (same groups, range and location) within the cache TTL
/// are answered without touching the network.
pub struct TrendWeather<T = NaverTrendClient, W = OpenMeteoClient> {
    trends: T,
    weather: W,
    cache: TtlCache<RequestKey, FetchedSeries>,
}

impl TrendWeather {
    /// Builds the Naver DataLab and Open-Meteo clients from `config`.
    pub fn from_config(config: &SourceConfig) -> Result<Self, SourceError> {
        Ok(Self::with_sources(
            NaverTrendClient::new(config)?,
            OpenMeteoClient::new(config)?,
            config.cache_ttl,
        ))
    }

    /// Default settings, credentials from `NAVER_CLIENT_ID` / `NAVER_CLIENT_SECRET`.
    pub fn from_env() -> Result<Self, SourceError> {
        Self::from_config(&SourceConfig::from_env()?)
    }
}

#[bon]
impl<T: TrendSource, W: WeatherSource> TrendWeather<T, W> {
    pub fn with_sources(trends: T, weather: W, cache_ttl: Duration) -> Self {
        Self {
            trends,
            weather,
            cache: TtlCache::new(cache_ttl),
        }
    }

    async fn fetch_series(
        &self,
        groups: &[KeywordGroup],
        range: DateRange,
        location: &LocationSpec,
    ) -> Result<FetchedSeries, TrendWxError> {
        validate_groups(groups).map_err(TrendWxError::trend)?;
        let key = RequestKey::new(groups, range, location);

        self.cache
            .get_or_try_insert_with(key, move || async move {
                warn!("Request cache miss for {} over {}", location.label(), range);
                let trend = self
                    .trends
                    .fetch_trends(groups, range)
                    .await
                    .map_err(TrendWxError::trend)?;
                if trend.is_empty() {
                    return Err(TrendWxError::trend(SourceError::EmptySeries));
                }

                let weather = self
                    .weather
                    .fetch_weather(location, range)
                    .await
                    .map_err(TrendWxError::weather)?;
                if weather.points.is_empty() {
                    return Err(TrendWxError::weather(SourceError::EmptySeries));
                }

                Ok(FetchedSeries { trend, weather })
            })
            .await
    }

    /// Fetches both raw series without analyzing them.
    ///
    /// `location` defaults to the Seoul single point.
    #[builder]
    pub async fn fetch(
        &self,
        groups: &[KeywordGroup],
        range: DateRange,
        location: Option<LocationSpec>,
    ) -> Result<FetchedSeries, TrendWxError> {
        let location = location.unwrap_or_default();
        self.fetch_series(groups, range, &location).await
    }

    /// Fetches, joins, summarizes and correlates.
    ///
    /// # Errors
    ///
    /// - [`TrendWxError::SourceUnavailable`] naming the stage when either
    ///   fetch fails or returns nothing. The trend fetch runs first; when it
    ///   fails the weather source is not called.
    /// - [`TrendWxError::EmptyJoin`] when the two series share no date.
    ///
    /// An undefined correlation is not an error; it is reported in
    /// [`Analysis::correlation`].
    #[builder]
    pub async fn analyze(
        &self,
        groups: &[KeywordGroup],
        range: DateRange,
        location: Option<LocationSpec>,
        thresholds: Option<Thresholds>,
        magnitude: Option<MagnitudeField>,
    ) -> Result<Analysis, TrendWxError> {
        let location = location.unwrap_or_default();
        let series = self.fetch_series(groups, range, &location).await?;

        let analysis = Analysis::from_series(
            &series.trend,
            &series.weather,
            thresholds.unwrap_or_default(),
            magnitude.unwrap_or_default(),
        );
        if analysis.is_empty() {
            return Err(TrendWxError::EmptyJoin {
                trend_rows: series.trend.len(),
                weather_rows: series.weather.points.len(),
            });
        }

        info!(
            "Analysis for {} over {} done: {} records",
            location.label(),
            range,
            analysis.records.len()
        );
        Ok(analysis)
    }

    /// Drops every cached request.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;
    use crate::sources::config::NaverCredentials;
    use crate::sources::open_meteo::LocationCoverage;
    use crate::types::day_category::DayCategory;
    use crate::types::location::Location;
    use crate::types::weather_point::WeatherPoint;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn june() -> DateRange {
        DateRange::new(day(1), day(30)).unwrap()
    }

    struct FakeTrends {
        points: Option<Vec<TrendPoint>>,
        calls: AtomicUsize,
    }

    impl TrendSource for FakeTrends {
        async fn fetch_trends(
            &self,
            _groups: &[KeywordGroup],
            _range: DateRange,
        ) -> Result<Vec<TrendPoint>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.points
                .clone()
                .ok_or(SourceError::MissingCredentials("NAVER_CLIENT_ID"))
        }
    }

    struct FakeWeather {
        points: Option<Vec<WeatherPoint>>,
        calls: AtomicUsize,
    }

    impl WeatherSource for FakeWeather {
        async fn fetch_weather(
            &self,
            location: &LocationSpec,
            _range: DateRange,
        ) -> Result<WeatherSeries, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let points = self.points.clone().ok_or(SourceError::NoLocationSucceeded {
                attempted: location.locations().len(),
            })?;
            Ok(WeatherSeries {
                points,
                coverage: LocationCoverage {
                    succeeded: location.locations().iter().map(|l| l.name.clone()).collect(),
                    failed: Vec::new(),
                },
            })
        }
    }

    fn client(
        trend: Option<Vec<TrendPoint>>,
        weather: Option<Vec<WeatherPoint>>,
    ) -> TrendWeather<FakeTrends, FakeWeather> {
        TrendWeather::with_sources(
            FakeTrends {
                points: trend,
                calls: AtomicUsize::new(0),
            },
            FakeWeather {
                points: weather,
                calls: AtomicUsize::new(0),
            },
            Duration::from_secs(300),
        )
    }

    fn trend() -> Vec<TrendPoint> {
        vec![
            TrendPoint::new(day(1), "golf", 70.0),
            TrendPoint::new(day(2), "golf", 20.0),
            TrendPoint::new(day(3), "golf", 50.0),
            TrendPoint::new(day(1), "tennis", 40.0),
            TrendPoint::new(day(2), "tennis", 35.0),
        ]
    }

    fn weather() -> Vec<WeatherPoint> {
        vec![
            WeatherPoint::new(day(1), Some(0.0), Some(0.0), Some(0.0)),
            WeatherPoint::new(day(2), Some(25.0), Some(25.0), Some(0.0)),
            WeatherPoint::new(day(3), Some(0.5), Some(0.5), Some(0.0)),
        ]
    }

    fn groups() -> Vec<KeywordGroup> {
        vec![
            KeywordGroup::single("golf").unwrap(),
            KeywordGroup::single("tennis").unwrap(),
        ]
    }

    #[tokio::test]
    async fn test_analyze() {
        let client = client(Some(trend()), Some(weather()));
        let groups = groups();
        let analysis = client
            .analyze()
            .groups(&groups)
            .range(june())
            .call()
            .await
            .unwrap();

        assert_eq!(analysis.records.len(), 5);
        assert_eq!(analysis.magnitude, MagnitudeField::Precipitation);
        assert_eq!(analysis.coverage.succeeded, ["Seoul"]);

        let golf = analysis.summary.row("golf").unwrap();
        assert_eq!(golf.dry, 60.0);
        assert_eq!(golf.rain, 20.0);
        assert_eq!(golf.rain_vs_dry, Some(-40.0));
        let tennis = analysis.summary.row("tennis").unwrap();
        assert_eq!(tennis.rain_vs_dry, Some(-5.0));
        assert!(analysis.correlation.is_ok());
    }

    #[tokio::test]
    async fn test_analyze_with_custom_thresholds() {
        let client = client(Some(trend()), Some(weather()));
        let groups = groups();
        let analysis = client
            .analyze()
            .groups(&groups)
            .range(june())
            .thresholds(Thresholds::new(0.5, 1.0))
            .magnitude(MagnitudeField::Rain)
            .location(LocationSpec::Average(vec![Location::seoul()]))
            .call()
            .await
            .unwrap();

        // 0.5 mm on day 3 is now rain
        assert_eq!(analysis.summary.row("golf").unwrap().observations.rain, 2);
        assert_eq!(analysis.thresholds.rain_mm, 0.5);
        assert_eq!(analysis.magnitude, MagnitudeField::Rain);
    }

    #[tokio::test]
    async fn test_trend_failure_stops_before_weather() {
        let client = client(None, Some(weather()));
        let groups = groups();
        let err = client
            .analyze()
            .groups(&groups)
            .range(june())
            .call()
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Trend));
        assert!(matches!(
            err,
            TrendWxError::SourceUnavailable {
                source: SourceError::MissingCredentials(_),
                ..
            }
        ));
        assert_eq!(client.weather.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_trend_series_is_unavailable() {
        let client = client(Some(Vec::new()), Some(weather()));
        let groups = groups();
        let err = client
            .analyze()
            .groups(&groups)
            .range(june())
            .call()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TrendWxError::SourceUnavailable {
                stage: Stage::Trend,
                source: SourceError::EmptySeries
            }
        ));
    }

    #[tokio::test]
    async fn test_weather_failure() {
        let client = client(Some(trend()), None);
        let groups = groups();
        let err = client
            .analyze()
            .groups(&groups)
            .range(june())
            .location(LocationSpec::nationwide())
            .call()
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Weather));
        assert!(matches!(
            err,
            TrendWxError::SourceUnavailable {
                source: SourceError::NoLocationSucceeded { attempted: 19 },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_disjoint_dates_are_an_empty_join() {
        let later = vec![WeatherPoint::new(day(20), Some(0.0), Some(0.0), Some(0.0))];
        let client = client(Some(trend()), Some(later));
        let groups = groups();
        let err = client
            .analyze()
            .groups(&groups)
            .range(june())
            .call()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TrendWxError::EmptyJoin {
                trend_rows: 5,
                weather_rows: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_invalid_groups_are_rejected_before_fetching() {
        let client = client(Some(trend()), Some(weather()));
        let err = client
            .fetch()
            .groups(&[])
            .range(june())
            .call()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TrendWxError::SourceUnavailable {
                stage: Stage::Trend,
                source: SourceError::InvalidRequest(_)
            }
        ));
        assert_eq!(client.trends.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_repeated_request_is_cached() {
        let client = client(Some(trend()), Some(weather()));
        let groups = groups();
        for _ in 0..3 {
            client.analyze().groups(&groups).range(june()).call().await.unwrap();
        }
        assert_eq!(client.trends.calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.weather.calls.load(Ordering::SeqCst), 1);

        // A different location is a different request.
        let fetched = client
            .fetch()
            .groups(&groups)
            .range(june())
            .location(LocationSpec::nationwide())
            .call()
            .await
            .unwrap();
        assert_eq!(fetched.weather.coverage.succeeded.len(), 19);
        assert_eq!(client.weather.calls.load(Ordering::SeqCst), 2);

        client.clear_cache().await;
        client.analyze().groups(&groups).range(june()).call().await.unwrap();
        assert_eq!(client.trends.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let client = client(None, Some(weather()));
        let groups = groups();
        for _ in 0..2 {
            assert!(client.fetch().groups(&groups).range(june()).call().await.is_err());
        }
        assert_eq!(client.trends.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_day_categories_of_fixture() {
        let thresholds = Thresholds::default();
        let categories: Vec<DayCategory> = weather()
            .iter()
            .map(|w| thresholds.classify(w.rain_sum, w.snowfall_sum))
            .collect();
        assert_eq!(
            categories,
            [DayCategory::Dry, DayCategory::Rain, DayCategory::Dry]
        );
    }

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn test_networked_client_futures_are_send() {
        let config = SourceConfig::builder()
            .credentials(NaverCredentials::new("id", "secret"))
            .build();
        let client = TrendWeather::from_config(&config).unwrap();
        let groups = groups();

        let analyze = client
            .analyze()
            .groups(&groups)
            .range(june())
            .location(LocationSpec::nationwide())
            .call();
        assert_send(&analyze);
        let fetch = client
            .fetch()
            .groups(&groups)
            .range(june())
            .location(LocationSpec::Point(Location::seoul()))
            .call();
        assert_send(&fetch);
    }

    #[tokio::test]
    async fn test_networked_client_reports_trend_stage_on_spawned_task() {
        let config = SourceConfig::builder()
            .credentials(NaverCredentials::new("id", "secret"))
            .naver_base_url("http://127.0.0.1:1")
            .open_meteo_base_url("http://127.0.0.1:1")
            .timeout(Duration::from_secs(5))
            .build();
        let client = TrendWeather::from_config(&config).unwrap();

        let handle = tokio::spawn(async move {
            let groups = groups();
            client
                .analyze()
                .groups(&groups)
                .range(june())
                .location(LocationSpec::nationwide())
                .call()
                .await
        });
        let err = handle.await.unwrap().unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Trend));
    }
}
