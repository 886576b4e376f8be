/// Core data types for the dashboard payload
///
/// These types match the JSON document served at `/data.json`. Field names on
/// the wire are the Spanish names written by the producer.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::error::FetchError;

/// Metric key that carries the analysts' consensus recommendation
pub const RECOMMENDATION_KEY: &str = "Recomendación Analistas";

/// Full dashboard document
///
/// Replaced wholesale on every successful poll.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DashboardPayload {
    /// Ticker symbol (e.g., "AAPL")
    pub ticker: String,
    /// Fundamental metrics, keyed by display label, in document order
    #[serde(rename = "metricas_fundamentales", default)]
    pub fundamentals: IndexMap<String, MetricValue>,
    /// Price history
    #[serde(rename = "grafico")]
    pub chart: PriceHistory,
    /// News headlines, newest first as delivered
    #[serde(rename = "noticias", default)]
    pub news: Vec<NewsItem>,
}

impl DashboardPayload {
    /// Reject documents the views cannot draw
    ///
    /// `precios` must be non-empty and index-aligned with `fechas`.
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.chart.prices.is_empty() {
            return Err(FetchError::InvalidPayload(
                "grafico.precios is empty".to_string(),
            ));
        }
        if self.chart.dates.len() != self.chart.prices.len() {
            return Err(FetchError::InvalidPayload(format!(
                "grafico.fechas has {} entries but grafico.precios has {}",
                self.chart.dates.len(),
                self.chart.prices.len()
            )));
        }
        Ok(())
    }

    /// Decode and validate a payload from raw JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FetchError> {
        let payload: Self = serde_json::from_slice(bytes)?;
        payload.validate()?;
        Ok(payload)
    }
}

/// Price history series, `dates[i]` belongs to `prices[i]`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PriceHistory {
    #[serde(rename = "fechas")]
    pub dates: Vec<String>,
    #[serde(rename = "precios")]
    pub prices: Vec<f64>,
}

/// News headline
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsItem {
    /// ISO date string (e.g., "2024-01-15")
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "titulo")]
    pub title: String,
    /// External article URL
    #[serde(rename = "enlace")]
    pub link: String,
}

/// Metric value, either display-ready text or a bare number
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    /// Text content, if this is a string value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetricValue::Text(text) => Some(text),
            MetricValue::Number(_) => None,
        }
    }

    /// Empty strings, zero and NaN count as "no value"
    pub fn is_empty(&self) -> bool {
        match self {
            MetricValue::Text(text) => text.is_empty(),
            MetricValue::Number(n) => *n == 0.0 || n.is_nan(),
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Text(text) => write!(f, "{}", text),
            // f64 Display already drops the trailing ".0" of integral values
            MetricValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}
