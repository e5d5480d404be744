//! Weather handlers

use crate::api::extract::{Json, Query};
use crate::error::AppError;
use crate::state::AppState;
use crate::weather::{service, HistoryQuery, WeatherQuery, WeatherReading, WeatherReport};
use axum::extract::State;

/// GET /weather?city=
pub async fn current_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<WeatherReport>, AppError> {
    let report = service::lookup(&state.db, state.weather.as_ref(), query.city.as_deref()).await?;
    Ok(Json(report))
}

/// GET /weather/history?city=&limit=
pub async fn weather_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<WeatherReading>>, AppError> {
    Ok(Json(service::history(&state.db, query).await?))
}
