//! Ratatui views for the dashboard
//!
//! Every view is a pure function of the slice of data it is handed.

mod header;
mod metrics_grid;
mod news;
mod page;
mod price_chart;

pub use header::{render_header, HeaderModel};
pub use metrics_grid::{grid_height, metric_tiles, render_metrics_grid, MetricTile};
pub use news::{news_count_label, news_rows, render_news_sidebar, NewsRow};
pub use page::{render_dashboard, ViewState, LOADING_MESSAGE};
pub use price_chart::{render_price_chart, ChartModel, Tooltip};

use ratatui::style::Color;

use crate::shared::calc::{Tone, Trend};

// Palette
pub const C_BUY: Color = Color::Rgb(100, 220, 100);
pub const C_SELL: Color = Color::Rgb(220, 100, 100);
pub const C_NEUTRAL: Color = Color::Rgb(220, 190, 90);
pub const C_DIM: Color = Color::Rgb(120, 120, 120);
pub const C_BRIGHT: Color = Color::Rgb(220, 220, 220);
pub const C_ACCENT: Color = Color::Rgb(100, 180, 220);
pub const C_BORDER: Color = Color::Rgb(60, 70, 85);

// Area fill under the price line
const C_BUY_FILL: Color = Color::Rgb(30, 80, 40);
const C_SELL_FILL: Color = Color::Rgb(85, 35, 35);

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Positive => C_BUY,
        Tone::Negative => C_SELL,
        Tone::Neutral => C_NEUTRAL,
    }
}

pub fn trend_color(trend: Trend) -> Color {
    match trend {
        Trend::Up => C_BUY,
        Trend::Down => C_SELL,
    }
}

fn trend_fill_color(trend: Trend) -> Color {
    match trend {
        Trend::Up => C_BUY_FILL,
        Trend::Down => C_SELL_FILL,
    }
}

fn trend_arrow(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "▲",
        Trend::Down => "▼",
    }
}
