//! Weather lookups

use crate::database::Database;
use crate::error::AppError;
use crate::weather::client::WeatherProvider;
use crate::weather::models::{
    HistoryQuery, WeatherReading, WeatherReport, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT,
};
use tracing::{info, warn};

/// Fetch current weather and record it
///
/// A failed write to the history is logged and does not fail the lookup.
pub async fn lookup(
    db: &Database,
    provider: &dyn WeatherProvider,
    city: Option<&str>,
) -> Result<WeatherReport, AppError> {
    let city = city
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("City is required".to_string()))?;

    let report = provider.current(city).await?;
    info!(city = %report.city, temperature = report.temperature, "Weather fetched");

    if let Err(e) = db.insert_reading(&report).await {
        warn!("Failed to store weather reading: {}", e);
    }
    Ok(report)
}

/// Stored readings, newest first
pub async fn history(db: &Database, query: HistoryQuery) -> Result<Vec<WeatherReading>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_HISTORY_LIMIT
        )));
    }
    let city = query.city.as_deref().map(str::trim).filter(|c| !c.is_empty());
    db.list_readings(city, limit).await
}


#[cfg(test)]
mod tests {
    use super::test_support::StubProvider;
    use super::*;
    use crate::database::test_support::test_db;

    #[tokio::test]
    async fn test_lookup_records_history() {
        let test = test_db().await;
        let report = lookup(&test.db, &StubProvider, Some(" london ")).await.unwrap();
        assert_eq!(report.city, "London");
        lookup(&test.db, &StubProvider, Some("Cairo")).await.unwrap();
        lookup(&test.db, &StubProvider, Some("London")).await.unwrap();

        let all = history(&test.db, HistoryQuery::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].city, "London");

        let london = history(
            &test.db,
            HistoryQuery {
                city: Some("LONDON".into()),
                limit: Some(1),
            },
        )
        .await
        .unwrap();
        assert_eq!(london.len(), 1);
        assert_eq!(london[0].city, "London");
    }

    #[tokio::test]
    async fn test_lookup_errors() {
        let test = test_db().await;
        assert!(matches!(
            lookup(&test.db, &StubProvider, None).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            lookup(&test.db, &StubProvider, Some("  ")).await,
            Err(AppError::BadRequest(_))
        ));
        let err = lookup(&test.db, &StubProvider, Some("Atlantis")).await.unwrap_err();
        assert_eq!(err.to_string(), "City not found.");
        assert!(history(&test.db, HistoryQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_limit_bounds() {
        let test = test_db().await;
        for limit in [0, 101] {
            let query = HistoryQuery {
                city: None,
                limit: Some(limit),
            };
            assert!(matches!(
                history(&test.db, query).await,
                Err(AppError::BadRequest(_))
            ));
        }
    }
}
