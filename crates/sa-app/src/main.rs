//! Main application entry point

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sa_core::{AppState, MapSettings, UniversitySource};
use sa_data::{JsonFileSource, MemorySource};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod demo;

/// Path of an optional JSON settings file
const SETTINGS_ENV: &str = "STUDY_ABROAD_SETTINGS";

/// Path of an optional JSON university file replacing the bundled fixture
const DATA_ENV: &str = "STUDY_ABROAD_DATA";

const ACCESS_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

fn load_settings() -> Result<MapSettings> {
    let mut settings = match std::env::var(SETTINGS_ENV) {
        Ok(path) => {
            info!("Loading settings from {}", path);
            MapSettings::from_json_file(&path)?
        }
        Err(_) => MapSettings::default(),
    };

    if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
        settings.access_token = Some(token);
    }
    Ok(settings)
}

fn university_source() -> Result<Box<dyn UniversitySource>> {
    match std::env::var(DATA_ENV) {
        Ok(path) => Ok(Box::new(JsonFileSource::new(path))),
        // The fixture answers like a slow backend would
        Err(_) => Ok(Box::new(MemorySource::fixture()?.with_latency(Duration::from_millis(50)))),
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting study-abroad map session");

    let settings = load_settings()?;
    let source = university_source()?;
    let state = Arc::new(AppState::new(settings));

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(demo::run(state, source.as_ref()))
}
