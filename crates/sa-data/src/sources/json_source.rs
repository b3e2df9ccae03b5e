use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sa_core::data::{UniversityRecord, UniversitySource};
use tracing::info;

use crate::DataError;

/// University source reading a JSON array from disk on every fetch
pub struct JsonFileSource {
    /// Path to the JSON file
    path: PathBuf,
    name: String,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<UniversityRecord>, DataError> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        let records: Vec<UniversityRecord> = serde_json::from_str(&json)?;
        Ok(records)
    }
}

#[async_trait]
impl UniversitySource for JsonFileSource {
    async fn fetch_all(&self) -> anyhow::Result<Vec<UniversityRecord>> {
        let records = self.read().await?;
        info!("Read {} universities from {}", records.len(), self.name);
        Ok(records)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(file: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sa-data-{}-{}", std::process::id(), file))
    }

    #[tokio::test]
    async fn test_reads_records_from_file() {
        let path = temp_path("ok.json");
        std::fs::write(
            &path,
            r#"[{"id": 1, "name": "A", "lng": 1.0, "lat": 2.0}, {"id": 2, "name": "B", "lng": 3.0, "lat": 4.0}]"#,
        )
        .unwrap();

        let records = JsonFileSource::new(&path).fetch_all().await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "B");
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let path = temp_path("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = JsonFileSource::new(&path).fetch_all().await;
        std::fs::remove_file(&path).ok();

        let err = result.unwrap_err();
        assert!(matches!(err.downcast_ref::<DataError>(), Some(DataError::Json(_))));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let source = JsonFileSource::new(temp_path("missing.json"));
        let err = source.fetch_all().await.unwrap_err();
        assert!(matches!(err.downcast_ref::<DataError>(), Some(DataError::Io(_))));
    }
}
