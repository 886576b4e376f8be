//! Page layout: loading placeholder or the four dashboard views

use chrono::{DateTime, Local, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{
    grid_height, render_header, render_metrics_grid, render_news_sidebar, render_price_chart,
    ChartModel, HeaderModel, C_ACCENT, C_BRIGHT, C_DIM, C_SELL,
};
use crate::shared::state::{DashboardState, DashboardView, FeedStatus};

pub const LOADING_MESSAGE: &str = "Cargando datos de la terminal...";

/// UI-only selection state, owned by the render loop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Chart point under the tooltip
    pub chart_cursor: Option<usize>,
    /// Selected news entry
    pub news_selected: Option<usize>,
}

impl ViewState {
    /// Move the chart cursor left; starts at the last point
    pub fn cursor_left(&mut self, point_count: usize) {
        if point_count == 0 {
            self.chart_cursor = None;
            return;
        }
        self.chart_cursor = Some(match self.chart_cursor {
            Some(i) => i.min(point_count - 1).saturating_sub(1),
            None => point_count - 1,
        });
    }

    /// Move the chart cursor right; starts at the last point
    pub fn cursor_right(&mut self, point_count: usize) {
        if point_count == 0 {
            self.chart_cursor = None;
            return;
        }
        self.chart_cursor = Some(match self.chart_cursor {
            Some(i) => (i + 1).min(point_count - 1),
            None => point_count - 1,
        });
    }

    pub fn news_next(&mut self, item_count: usize) {
        if item_count == 0 {
            self.news_selected = None;
            return;
        }
        self.news_selected = Some(match self.news_selected {
            Some(i) => (i + 1).min(item_count - 1),
            None => 0,
        });
    }

    pub fn news_previous(&mut self, item_count: usize) {
        if item_count == 0 {
            self.news_selected = None;
            return;
        }
        self.news_selected = Some(match self.news_selected {
            Some(i) => i.min(item_count - 1).saturating_sub(1),
            None => 0,
        });
    }

    /// Clear selections that no longer fit a new payload
    pub fn clamp(&mut self, point_count: usize, item_count: usize) {
        self.chart_cursor = self.chart_cursor.filter(|i| *i < point_count);
        self.news_selected = self.news_selected.filter(|i| *i < item_count);
    }
}

/// Render the whole screen
pub fn render_dashboard(f: &mut Frame, state: &DashboardState, ui: &ViewState, source: &str) {
    match state.view() {
        Some(view) => render_loaded(f, &view, ui, source),
        None => render_loading(f, state, source),
    }
}

fn render_loading(f: &mut Frame, state: &DashboardState, source: &str) {
    let area = f.area();
    let mut lines = vec![Line::from(Span::styled(
        LOADING_MESSAGE,
        Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
    ))];

    if state.status() == FeedStatus::Failed {
        if let Some(failure) = state.last_error() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                failure.error.to_string(),
                Style::default().fg(C_SELL),
            )));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(source.to_string(), Style::default().fg(C_DIM))));

    let height = (lines.len() as u16).min(area.height);
    let top = area.y + area.height.saturating_sub(height) / 2;
    let centered = Rect::new(area.x, top, area.width, height);

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), centered);
}

fn render_loaded(f: &mut Frame, view: &DashboardView, ui: &ViewState, source: &str) {
    let payload = view.payload;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(grid_height(payload.fundamentals.len())),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(f.area());

    let header = HeaderModel::new(
        &payload.ticker,
        &view.summary.recommendation,
        view.summary.price_change,
    )
    .with_status(view.status, view.last_error.map(|e| e.error.to_string()));
    render_header(f, chunks[0], &header);

    render_metrics_grid(f, chunks[1], &payload.fundamentals);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)])
        .split(chunks[2]);

    let chart = ChartModel::new(&payload.chart.dates, &payload.chart.prices);
    render_price_chart(f, main[0], &chart, ui.chart_cursor);
    render_news_sidebar(f, main[1], &payload.news, ui.news_selected);

    render_footer(f, chunks[3], view.updated_at, source);
}

fn render_footer(f: &mut Frame, area: Rect, updated_at: Option<DateTime<Utc>>, source: &str) {
    let updated = updated_at
        .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--".to_string());

    let line = Line::from(vec![
        Span::styled(" q", Style::default().fg(C_ACCENT)),
        Span::styled(" salir  ", Style::default().fg(C_DIM)),
        Span::styled("r", Style::default().fg(C_ACCENT)),
        Span::styled(" actualizar  ", Style::default().fg(C_DIM)),
        Span::styled("←/→", Style::default().fg(C_ACCENT)),
        Span::styled(" gráfico  ", Style::default().fg(C_DIM)),
        Span::styled("↑/↓", Style::default().fg(C_ACCENT)),
        Span::styled(" noticias  ", Style::default().fg(C_DIM)),
        Span::styled(
            format!("│ {} · actualizado {}", source, updated),
            Style::default().fg(C_DIM),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
