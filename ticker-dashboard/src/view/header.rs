//! Header bar: ticker, trend, price change and recommendation badge

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{tone_color, trend_arrow, trend_color, C_BORDER, C_DIM, C_NEUTRAL};
use crate::shared::calc::{classify_recommendation, format_change, Tone, Trend};
use crate::shared::state::FeedStatus;

/// Everything the header draws
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderModel {
    pub ticker: String,
    pub trend: Trend,
    pub change_label: String,
    pub recommendation: String,
    pub badge: Tone,
    /// Set when the shown data is stale
    pub stale_note: Option<String>,
}

impl HeaderModel {
    pub fn new(ticker: &str, recommendation: &str, price_change: f64) -> Self {
        Self {
            ticker: ticker.to_string(),
            trend: Trend::from_change(price_change),
            change_label: format_change(price_change),
            recommendation: recommendation.to_string(),
            badge: classify_recommendation(recommendation),
            stale_note: None,
        }
    }

    /// Attach the feed status; only `Stale` produces a note
    pub fn with_status(mut self, status: FeedStatus, reason: Option<String>) -> Self {
        self.stale_note = match status {
            FeedStatus::Stale => Some(match reason {
                Some(reason) => format!("⚠ datos desactualizados: {}", reason),
                None => "⚠ datos desactualizados".to_string(),
            }),
            _ => None,
        };
        self
    }

    fn left_line(&self) -> Line<'static> {
        let color = trend_color(self.trend);
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                self.ticker.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(trend_arrow(self.trend), Style::default().fg(color)),
            Span::raw(" "),
            Span::styled(self.change_label.clone(), Style::default().fg(color)),
        ])
    }

    fn right_line(&self) -> Line<'static> {
        let badge_color = tone_color(self.badge);
        let mut spans = Vec::new();
        if let Some(note) = &self.stale_note {
            spans.push(Span::styled(note.clone(), Style::default().fg(C_NEUTRAL)));
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!("[ {} ]", self.recommendation),
            Style::default()
                .fg(badge_color)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
        Line::from(spans)
    }
}

/// Render the header bar
pub fn render_header(f: &mut Frame, area: Rect, model: &HeaderModel) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(C_BORDER));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let right = model.right_line();
    let right_width = (right.width() as u16).min(inner.width);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right_width)])
        .split(inner);

    f.render_widget(Paragraph::new(model.left_line()), chunks[0]);
    f.render_widget(
        Paragraph::new(right).style(Style::default().fg(C_DIM)),
        chunks[1],
    );
}
