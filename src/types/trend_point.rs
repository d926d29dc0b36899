use crate::sources::error::SourceError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Most keywords a single group may bundle.
pub const MAX_KEYWORDS_PER_GROUP: usize = 5;

/// A named bundle of search terms tracked as a single series.
///
/// Serializes to the `{"groupName": ..., "keywords": [...]}` shape the
/// DataLab search endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordGroup {
    group_name: String,
    keywords: Vec<String>,
}

impl KeywordGroup {
    /// Creates a validated group.
    ///
    /// Names and keywords are trimmed; empty keywords are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidRequest`] if the name is empty, or if no
    /// keyword or more than [`MAX_KEYWORDS_PER_GROUP`] keywords remain.
    ///
    /// # Examples
    ///
    /// ```
    /// use trendwx::KeywordGroup;
    ///
    /// let group = KeywordGroup::new("golf booking", ["golf booking", " tee time "]).unwrap();
    /// assert_eq!(group.keywords(), ["golf booking", "tee time"]);
    ///
    /// assert!(KeywordGroup::new("  ", ["golf"]).is_err());
    /// ```
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Result<Self, SourceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let group_name = name.into().trim().to_string();
        if group_name.is_empty() {
            return Err(SourceError::InvalidRequest(
                "keyword group name must not be empty".to_string(),
            ));
        }
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() || keywords.len() > MAX_KEYWORDS_PER_GROUP {
            return Err(SourceError::InvalidRequest(format!(
                "keyword group '{}' needs 1 to {} keywords, got {}",
                group_name,
                MAX_KEYWORDS_PER_GROUP,
                keywords.len()
            )));
        }
        Ok(Self {
            group_name,
            keywords,
        })
    }

    /// A group whose only keyword is its own name.
    pub fn single(keyword: impl Into<String>) -> Result<Self, SourceError> {
        let keyword = keyword.into();
        Self::new(keyword.clone(), [keyword])
    }

    /// Parses a comma separated keyword list, e.g. `"golf, rounding"`.
    pub fn from_comma_separated(
        name: impl Into<String>,
        keywords: &str,
    ) -> Result<Self, SourceError> {
        Self::new(name, keywords.split(','))
    }

    pub fn name(&self) -> &str {
        &self.group_name
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

/// One day of relative search interest for one keyword group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub group: String,
    /// Relative index, normalized by the source to 0–100.
    pub ratio: f64,
}

impl TrendPoint {
    pub fn new(date: NaiveDate, group: impl Into<String>, ratio: f64) -> Self {
        Self {
            date,
            group: group.into(),
            ratio,
        }
    }
}
