/// Ticker Dashboard - Shared Library
///
/// Terminal dashboard for a single ticker, fed by a JSON document that is
/// polled on an interval:
/// - header with price change and analysts' recommendation
/// - fundamental metrics grid
/// - price history area chart
/// - news feed
///
/// The library includes:
/// - Payload types and sources (HTTP / local file)
/// - The cancellable poller and the state container it feeds
/// - Ratatui views
pub mod shared;
pub mod view;

// Re-export commonly used types for convenience
pub use shared::types::{DashboardPayload, MetricValue, NewsItem, PriceHistory, RECOMMENDATION_KEY};

pub use shared::config::DashboardConfig;
pub use shared::error::FetchError;
pub use shared::poller::{PollOutcome, Poller, PollerHandle};
pub use shared::source::{source_from_config, FileSource, HttpSource, PayloadSource};
pub use shared::state::{DashboardState, FeedStatus};

pub use shared::calc::{
    classify_recommendation, price_change, recommendation, y_axis_bounds, AxisBounds,
    PayloadSummary, Tone, Trend,
};
