//! State handed to every handler
//!
//! Everything inside is cheap to clone; the pool and the weather provider are
//! shared behind their own handles.

use crate::config::Config;
use crate::database::Database;
use crate::error::AppError;
use crate::uploads::UploadStore;
use crate::weather::{OpenWeatherClient, WeatherProvider};
use std::sync::Arc;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Connection pool
    pub db: Database,
    /// Loaded configuration
    pub config: Arc<Config>,
    /// Cover image storage
    pub uploads: UploadStore,
    /// Current-weather source
    pub weather: Arc<dyn WeatherProvider>,
}

impl AppState {
    /// Assemble state from its parts
    pub fn new(db: Database, config: Config, weather: Arc<dyn WeatherProvider>) -> Self {
        let uploads = UploadStore::new(config.uploads.dir.clone(), config.uploads.max_bytes);
        Self {
            db,
            config: Arc::new(config),
            uploads,
            weather,
        }
    }

    /// State backed by the real weather API
    pub fn with_openweather(db: Database, config: Config) -> Result<Self, AppError> {
        let weather = OpenWeatherClient::new(&config.weather)?;
        Ok(Self::new(db, config, Arc::new(weather)))
    }
}
