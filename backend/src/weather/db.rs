//! Weather reading persistence

use crate::database::Database;
use crate::error::AppError;
use crate::weather::models::{WeatherReading, WeatherReport};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};

impl Database {
    /// Store a successful lookup
    pub async fn insert_reading(&self, report: &WeatherReport) -> Result<WeatherReading, AppError> {
        let reading = sqlx::query_as::<_, WeatherReading>(
            "INSERT INTO weather_readings (city, temperature, condition, created_at) VALUES (?, ?, ?, ?) \
             RETURNING id, city, temperature, condition, created_at",
        )
        .bind(&report.city)
        .bind(report.temperature)
        .bind(&report.condition)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;
        Ok(reading)
    }

    /// Most recent readings, optionally for one city
    pub async fn list_readings(&self, city: Option<&str>, limit: i64) -> Result<Vec<WeatherReading>, AppError> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, city, temperature, condition, created_at FROM weather_readings",
        );
        if let Some(city) = city {
            builder.push(" WHERE city = ").push_bind(city).push(" COLLATE NOCASE");
        }
        builder
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(limit);

        let readings = builder
            .build_query_as::<WeatherReading>()
            .fetch_all(self.pool())
            .await?;
        Ok(readings)
    }
}
