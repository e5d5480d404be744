//! Current-weather proxy with a stored lookup history

pub mod client;
pub mod db;
pub mod models;
pub mod service;

pub use client::{OpenWeatherClient, WeatherProvider};
pub use models::{HistoryQuery, WeatherQuery, WeatherReading, WeatherReport};
