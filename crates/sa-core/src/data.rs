//! University records and the source trait that serves them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stable identifier of a university record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniversityId(pub u32);

impl fmt::Display for UniversityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UniversityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(UniversityId)
    }
}

/// A geographic position, serialized the way map renderers expect: `[lng, lat]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(value: LngLat) -> Self {
        value.to_array()
    }
}

/// A university as served by the data layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityRecord {
    /// Stable identifier, carried on map features and list rows
    pub id: UniversityId,

    /// Display name
    pub name: String,

    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub country: String,

    /// Longitude in degrees
    pub lng: f64,

    /// Latitude in degrees
    pub lat: f64,

    /// Free-text description shown (truncated) in the preview popup
    #[serde(default)]
    pub description_text: String,

    /// Teaching languages
    #[serde(default)]
    pub languages: Vec<String>,

    /// Average student rating, if any
    #[serde(default)]
    pub rating: Option<f32>,

    /// Number of students who went there
    #[serde(default)]
    pub movers: u32,
}

impl UniversityRecord {
    pub fn coordinates(&self) -> LngLat {
        LngLat::new(self.lng, self.lat)
    }

    /// Whether the university teaches in `language` (case-insensitive)
    pub fn teaches_in(&self, language: &str) -> bool {
        self.languages
            .iter()
            .any(|l| l.eq_ignore_ascii_case(language))
    }
}

/// Trait for university data sources
#[async_trait::async_trait]
pub trait UniversitySource: Send + Sync {
    /// Fetch the full ordered collection of universities
    async fn fetch_all(&self) -> anyhow::Result<Vec<UniversityRecord>>;

    /// Get the source name/path
    fn source_name(&self) -> &str;
}
