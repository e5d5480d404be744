//! Weather data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Default number of history entries
pub const DEFAULT_HISTORY_LIMIT: i64 = 20;
/// Largest accepted history `limit`
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Simplified current weather for one city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// City name as reported by the upstream
    pub city: String,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Human-readable condition, e.g. `light rain`
    pub condition: String,
}

/// A stored lookup
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    /// Unique identifier
    pub id: i64,
    /// City name
    pub city: String,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Condition text
    pub condition: String,
    /// Lookup time
    pub created_at: DateTime<Utc>,
}

/// Query string of `GET /weather`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherQuery {
    /// City to look up
    pub city: Option<String>,
}

/// Query string of `GET /weather/history`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    /// Only readings for this city (case-insensitive)
    pub city: Option<String>,
    /// Number of readings, 1 to 100
    pub limit: Option<i64>,
}
