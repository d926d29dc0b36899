//! Geographic locations that weather series are requested for.

use serde::{Deserialize, Serialize};

/// `(latitude, longitude)` in decimal degrees, sent to the weather archive
/// as-is.
///
/// ```
/// use trendwx::{LatLon, Location};
///
/// let busan = Location::new("Busan", LatLon(35.1796, 129.0756));
/// assert!(busan.coordinate.0 < busan.coordinate.1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

/// A named point that weather is fetched for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub coordinate: LatLon,
}

// Eight metropolitan cities followed by eleven major Gyeonggi cities.
const KOREA_MAJOR_CITIES: [(&str, f64, f64); 19] = [
    ("Seoul", 37.5665, 126.9780),
    ("Busan", 35.1796, 129.0756),
    ("Daegu", 35.8714, 128.6014),
    ("Incheon", 37.4563, 126.7052),
    ("Gwangju", 35.1595, 126.8526),
    ("Daejeon", 36.3504, 127.3845),
    ("Ulsan", 35.5384, 129.3114),
    ("Sejong", 36.4800, 127.2890),
    ("Suwon", 37.2636, 127.0286),
    ("Seongnam", 37.4201, 127.1267),
    ("Goyang", 37.6584, 126.8320),
    ("Yongin", 37.2411, 127.1776),
    ("Anyang", 37.3943, 126.9568),
    ("Ansan", 37.3222, 126.8308),
    ("Pyeongtaek", 36.9908, 127.0856),
    ("Uijeongbu", 37.7381, 127.0477),
    ("Gwangmyeong", 37.4164, 126.8840),
    ("Gwacheon", 37.4291, 126.9878),
    ("Osan", 37.1498, 127.0772),
];

impl Location {
    pub fn new(name: impl Into<String>, coordinate: LatLon) -> Self {
        Self {
            name: name.into(),
            coordinate,
        }
    }

    /// Seoul city hall, the default single-point proxy for South Korea.
    pub fn seoul() -> Self {
        Self::new("Seoul", LatLon(37.5665, 126.9780))
    }

    /// The fixed set of 19 South Korean cities averaged in nationwide mode.
    pub fn korea_major_cities() -> Vec<Location> {
        KOREA_MAJOR_CITIES
            .iter()
            .map(|(name, lat, lon)| Location::new(*name, LatLon(*lat, *lon)))
            .collect()
    }
}

/// Where a weather series should come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LocationSpec {
    /// A single location's daily series.
    Point(Location),
    /// The per-date average of several locations' daily series.
    Average(Vec<Location>),
}

impl LocationSpec {
    /// The 19-city nationwide average.
    pub fn nationwide() -> Self {
        LocationSpec::Average(Location::korea_major_cities())
    }

    pub fn locations(&self) -> &[Location] {
        match self {
            LocationSpec::Point(location) => std::slice::from_ref(location),
            LocationSpec::Average(locations) => locations,
        }
    }

    /// A short human-readable label, e.g. `Seoul` or `average of 19 locations`.
    pub fn label(&self) -> String {
        match self {
            LocationSpec::Point(location) => location.name.clone(),
            LocationSpec::Average(locations) => {
                format!("average of {} locations", locations.len())
            }
        }
    }
}

impl Default for LocationSpec {
    fn default() -> Self {
        LocationSpec::Point(Location::seoul())
    }
}
