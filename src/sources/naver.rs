use crate::sources::config::{NaverCredentials, SourceConfig};
use crate::sources::error::SourceError;
use crate::types::date_range::{DateRange, API_DATE_FORMAT};
use crate::types::trend_point::{KeywordGroup, TrendPoint};
use chrono::NaiveDate;
use log::{info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::future::Future;

/// Most keyword groups the DataLab search endpoint accepts per request.
pub const MAX_GROUPS_PER_REQUEST: usize = 5;

const SEARCH_PATH: &str = "/v1/datalab/search";

/// Anything that can produce daily relative search interest per keyword group.
pub trait TrendSource: Send + Sync {
    fn fetch_trends(
        &self,
        groups: &[KeywordGroup],
        range: DateRange,
    ) -> impl Future<Output = Result<Vec<TrendPoint>, SourceError>> + Send;
}

/// Client for the Naver DataLab search trend API.
#[derive(Debug, Clone)]
pub struct NaverTrendClient {
    client: Client,
    search_url: String,
    credentials: NaverCredentials,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    start_date: String,
    end_date: String,
    time_unit: &'static str,
    keyword_groups: &'a [KeywordGroup],
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    title: String,
    #[serde(default)]
    data: Vec<SearchDataPoint>,
}

#[derive(Deserialize)]
struct SearchDataPoint {
    period: String,
    ratio: f64,
}

impl NaverTrendClient {
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        Ok(Self {
            client: config.http_client()?,
            search_url: format!(
                "{}{}",
                config.naver_base_url.trim_end_matches('/'),
                SEARCH_PATH
            ),
            credentials: config.credentials.clone(),
        })
    }

    async fn fetch_batch(
        &self,
        batch: &[KeywordGroup],
        range: DateRange,
    ) -> Result<Vec<TrendPoint>, SourceError> {
        let url = &self.search_url;
        let body = SearchRequest {
            start_date: range.start_param(),
            end_date: range.end_param(),
            time_unit: "date",
            keyword_groups: batch,
        };

        let response = self
            .client
            .post(url)
            .header("X-Naver-Client-Id", self.credentials.client_id())
            .header("X-Naver-Client-Secret", self.credentials.client_secret())
            .json(&body)
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
        parse_search_response(url, &text)
    }
}

impl TrendSource for NaverTrendClient {
    async fn fetch_trends(
        &self,
        groups: &[KeywordGroup],
        range: DateRange,
    ) -> Result<Vec<TrendPoint>, SourceError> {
        validate_groups(groups)?;
        info!(
            "Fetching search trends for {} keyword group(s) over {}",
            groups.len(),
            range
        );

        let mut points = Vec::new();
        for batch in groups.chunks(MAX_GROUPS_PER_REQUEST) {
            points.extend(self.fetch_batch(batch, range).await?);
        }

        info!("Fetched {} trend points", points.len());
        Ok(points)
    }
}

/// Rejects an empty group list and groups that share a name.
pub(crate) fn validate_groups(groups: &[KeywordGroup]) -> Result<(), SourceError> {
    if groups.is_empty() {
        return Err(SourceError::InvalidRequest(
            "at least one keyword group is required".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for group in groups {
        if !seen.insert(group.name()) {
            return Err(SourceError::InvalidRequest(format!(
                "keyword group name '{}' is used more than once",
                group.name()
            )));
        }
    }
    Ok(())
}

/// Turns a DataLab search response body into trend points.
///
/// Each result's `title` becomes the point's group.
pub fn parse_search_response(url: &str, body: &str) -> Result<Vec<TrendPoint>, SourceError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|source| SourceError::JsonParse {
            url: url.to_string(),
            source,
        })?;

    let mut points = Vec::new();
    for result in response.results {
        for item in result.data {
            let date = NaiveDate::parse_from_str(&item.period, API_DATE_FORMAT).map_err(|e| {
                SourceError::MalformedResponse {
                    url: url.to_string(),
                    message: format!("invalid period '{}': {}", item.period, e),
                }
            })?;
            points.push(TrendPoint::new(date, result.title.clone(), item.ratio));
        }
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://openapi.naver.com/v1/datalab/search";

    #[test]
    fn test_parse_search_response() {
        let body = r#"{
            "startDate": "2024-01-01",
            "endDate": "2024-01-02",
            "timeUnit": "date",
            "results": [
                {
                    "title": "golf",
                    "keywords": ["golf", "golf booking"],
                    "data": [
                        {"period": "2024-01-01", "ratio": 100},
                        {"period": "2024-01-02", "ratio": 42.5}
                    ]
                },
                {
                    "title": "screen golf",
                    "keywords": ["screen golf"],
                    "data": [{"period": "2024-01-02", "ratio": 7.1}]
                }
            ]
        }"#;

        let points = parse_search_response(URL, body).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].group, "golf");
        assert_eq!(points[0].ratio, 100.0);
        assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(points[2].group, "screen golf");
    }

    #[test]
    fn test_parse_response_without_results_is_empty() {
        assert!(parse_search_response(URL, "{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_json_and_bad_period() {
        assert!(matches!(
            parse_search_response(URL, "not json"),
            Err(SourceError::JsonParse { .. })
        ));

        let body = r#"{"results": [{"title": "g", "data": [{"period": "01/02/2024", "ratio": 1}]}]}"#;
        assert!(matches!(
            parse_search_response(URL, body),
            Err(SourceError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let groups = [KeywordGroup::new("golf", ["golf", "tee time"]).unwrap()];
        let body = SearchRequest {
            start_date: "2024-01-01".to_string(),
            end_date: "2024-12-31".to_string(),
            time_unit: "date",
            keyword_groups: &groups,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "startDate": "2024-01-01",
                "endDate": "2024-12-31",
                "timeUnit": "date",
                "keywordGroups": [{"groupName": "golf", "keywords": ["golf", "tee time"]}]
            })
        );
    }

    #[test]
    fn test_validate_groups() {
        assert!(validate_groups(&[]).is_err());
        let golf = KeywordGroup::single("golf").unwrap();
        assert!(validate_groups(&[golf.clone()]).is_ok());
        assert!(matches!(
            validate_groups(&[golf.clone(), golf]),
            Err(SourceError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_search_url_from_base() {
        let config = SourceConfig::builder()
            .credentials(NaverCredentials::new("id", "secret"))
            .naver_base_url("http://localhost:8080/")
            .build();
        let client = NaverTrendClient::new(&config).unwrap();
        assert_eq!(client.search_url, "http://localhost:8080/v1/datalab/search");
    }

    #[tokio::test]
    #[ignore = "requires NAVER_CLIENT_ID / NAVER_CLIENT_SECRET and network access"]
    async fn test_fetch_live() {
        let config = SourceConfig::from_env().unwrap();
        let client = NaverTrendClient::new(&config).unwrap();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();
        let groups = [KeywordGroup::single("golf").unwrap()];
        let points = client.fetch_trends(&groups, range).await.unwrap();
        assert!(!points.is_empty());
        assert!(points.iter().all(|p| range.contains(p.date)));
    }
}
