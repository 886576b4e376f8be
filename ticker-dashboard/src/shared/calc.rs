//! Derived values shown by the dashboard views
//!
//! Price change, recommendation, trend, badge classification and chart axis
//! scaling. All inputs come straight from the payload.

use indexmap::IndexMap;

use super::dates::format_display_date;
use super::types::{DashboardPayload, MetricValue, RECOMMENDATION_KEY};

/// Recommendation shown when the payload carries none
pub const DEFAULT_RECOMMENDATION: &str = "Hold";

/// Headroom added above and below the price range on the Y axis
const Y_AXIS_PADDING: f64 = 0.05;

/// Target number of labelled X-axis ticks
const X_AXIS_TICKS: usize = 6;

/// Direction of a price move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// Header rule: zero counts as up (NaN counts as down)
    pub fn from_change(change_pct: f64) -> Self {
        if change_pct >= 0.0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }

    /// Chart rule: up only when the last price is strictly above the first
    pub fn of_series(prices: &[f64]) -> Self {
        match (prices.first(), prices.last()) {
            (Some(first), Some(last)) if last > first => Trend::Up,
            _ => Trend::Down,
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, Trend::Up)
    }
}

/// Visual treatment of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

/// "buy" → positive, "sell" → negative, anything else neutral (case-insensitive)
pub fn classify_recommendation(recommendation: &str) -> Tone {
    if recommendation.eq_ignore_ascii_case("buy") {
        Tone::Positive
    } else if recommendation.eq_ignore_ascii_case("sell") {
        Tone::Negative
    } else {
        Tone::Neutral
    }
}

/// Percentage change from first to last price
///
/// Not guarded against a zero first price: the result is then infinite or
/// NaN. An empty series yields NaN.
pub fn price_change(prices: &[f64]) -> f64 {
    match (prices.first(), prices.last()) {
        (Some(first), Some(last)) => (last - first) / first * 100.0,
        _ => f64::NAN,
    }
}

/// `+10.00%`, `-3.25%`
pub fn format_change(change_pct: f64) -> String {
    // -0.0 is non-negative and must not print as "-0.00"
    let change_pct = if change_pct == 0.0 { 0.0 } else { change_pct };
    let sign = if change_pct >= 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, change_pct)
}

/// Analysts' recommendation, or [`DEFAULT_RECOMMENDATION`] when missing or empty
pub fn recommendation(fundamentals: &IndexMap<String, MetricValue>) -> String {
    fundamentals
        .get(RECOMMENDATION_KEY)
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
        .unwrap_or_else(|| DEFAULT_RECOMMENDATION.to_string())
}

/// True when a metric value is the string "buy" in any case
pub fn is_buy(value: &MetricValue) -> bool {
    value
        .as_text()
        .is_some_and(|text| text.eq_ignore_ascii_case("buy"))
}

/// Y-axis domain for a price series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

impl AxisBounds {
    /// Bounds safe to draw: a zero-width domain is widened by one unit each way
    pub fn drawable(&self) -> [f64; 2] {
        if self.max > self.min {
            [self.min, self.max]
        } else {
            [self.min - 1.0, self.max + 1.0]
        }
    }
}

/// `floor(min - 5% range)`, `ceil(max + 5% range)`
pub fn y_axis_bounds(prices: &[f64]) -> AxisBounds {
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    AxisBounds {
        min: (min - range * Y_AXIS_PADDING).floor(),
        max: (max + range * Y_AXIS_PADDING).ceil(),
    }
}

/// Number of points skipped between labelled X-axis ticks
pub fn x_tick_interval(point_count: usize) -> usize {
    point_count / X_AXIS_TICKS
}

/// Indices of points that carry an X-axis label
pub fn x_tick_indices(point_count: usize) -> Vec<usize> {
    let step = x_tick_interval(point_count) + 1;
    (0..point_count).step_by(step).collect()
}

/// One chart sample
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub index: usize,
    pub date: String,
    pub price: f64,
    pub formatted_date: String,
}

/// Zip dates and prices into chart samples, preserving order
pub fn chart_points(dates: &[String], prices: &[f64]) -> Vec<ChartPoint> {
    dates
        .iter()
        .zip(prices.iter())
        .enumerate()
        .map(|(index, (date, price))| ChartPoint {
            index,
            date: date.clone(),
            price: *price,
            formatted_date: format_display_date(date),
        })
        .collect()
}

/// Values derived from a payload for the header
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadSummary {
    pub price_change: f64,
    pub recommendation: String,
}

impl PayloadSummary {
    pub fn from_payload(payload: &DashboardPayload) -> Self {
        Self {
            price_change: price_change(&payload.chart.prices),
            recommendation: recommendation(&payload.fundamentals),
        }
    }
}
