use std::time::Duration;

use async_trait::async_trait;
use sa_core::data::{UniversityRecord, UniversitySource};
use tracing::debug;

use crate::DataError;

/// Bundled university fixture
const FIXTURE_JSON: &str = include_str!("../../fixtures/universities.json");

/// In-memory university source standing in for the backend.
///
/// Serves a fixed collection, optionally after a simulated network delay,
/// or fails every fetch when marked offline.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    records: Vec<UniversityRecord>,
    latency: Option<Duration>,
    offline: bool,
}

impl MemorySource {
    /// Create a source serving `records`
    pub fn new(name: impl Into<String>, records: Vec<UniversityRecord>) -> Self {
        Self {
            name: name.into(),
            records,
            latency: None,
            offline: false,
        }
    }

    /// Source serving the bundled fixture
    pub fn fixture() -> Result<Self, DataError> {
        let records: Vec<UniversityRecord> = serde_json::from_str(FIXTURE_JSON)?;
        Ok(Self::new("in-memory fixture", records))
    }

    /// Delay every fetch by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every fetch fail
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl UniversitySource for MemorySource {
    async fn fetch_all(&self) -> anyhow::Result<Vec<UniversityRecord>> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.offline {
            return Err(DataError::Unavailable(self.name.clone()).into());
        }

        debug!("Serving {} universities from {}", self.records.len(), self.name);
        Ok(self.records.clone())
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixture_parses_and_serves_in_order() {
        let source = MemorySource::fixture().unwrap();
        assert!(!source.is_empty());

        let records = source.fetch_all().await.unwrap();
        assert_eq!(records.len(), source.len());
        assert_eq!(records[0].name, "Sapienza University of Rome");
        assert_eq!(records[0].coordinates().to_array(), [12.5, 41.9]);
    }

    #[tokio::test]
    async fn test_offline_source_fails() {
        let source = MemorySource::new("empty", Vec::new()).offline();
        let err = source.fetch_all().await.unwrap_err();

        assert!(err.downcast_ref::<DataError>().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let source = MemorySource::new("slow", Vec::new()).with_latency(Duration::from_millis(250));
        let started = tokio::time::Instant::now();

        source.fetch_all().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(250));
    }
}
