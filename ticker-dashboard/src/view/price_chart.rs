//! Price history area chart with a cursor tooltip

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use super::{trend_color, trend_fill_color, C_BORDER, C_BRIGHT, C_DIM};
use crate::shared::calc::{
    chart_points, x_tick_indices, x_tick_interval, y_axis_bounds, AxisBounds, ChartPoint, Trend,
};

/// Tooltip for the point under the cursor
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub date: String,
    pub price: String,
}

/// Regions inside the chart block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout {
    pub y_labels: Rect,
    pub plot: Rect,
    pub x_labels: Rect,
}

/// Derived chart data
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub points: Vec<ChartPoint>,
    pub trend: Trend,
    pub bounds: AxisBounds,
    pub tick_interval: usize,
}

impl ChartModel {
    pub fn new(dates: &[String], prices: &[f64]) -> Self {
        Self {
            points: chart_points(dates, prices),
            trend: Trend::of_series(prices),
            bounds: y_axis_bounds(prices),
            tick_interval: x_tick_interval(dates.len().min(prices.len())),
        }
    }

    /// `(x, y)` samples for the chart widget
    pub fn data(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.index as f64, p.price))
            .collect()
    }

    /// `$100.00 → $110.00`
    pub fn range_label(&self) -> String {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => format!("${:.2} → ${:.2}", first.price, last.price),
            _ => String::new(),
        }
    }

    pub fn tooltip(&self, cursor: usize) -> Option<Tooltip> {
        self.points.get(cursor).map(|p| Tooltip {
            date: p.formatted_date.clone(),
            price: format!("${:.2}", p.price),
        })
    }

    /// Column, counted from the left edge of a plot `width` cells wide, that
    /// point `index` is drawn in. Braille cells are two dots wide.
    pub fn point_column(&self, index: usize, width: u16) -> u16 {
        let last = self.points.len().saturating_sub(1);
        if last == 0 || width == 0 {
            return 0;
        }
        let ratio = index.min(last) as f64 / last as f64;
        let dot = (ratio * (f64::from(width) * 2.0 - 1.0)) as u16;
        dot / 2
    }

    /// Date labels for every `tick_interval + 1`-th point as `(start column,
    /// text)`, each centered on its point's column. A label that would run
    /// into the previous one is skipped.
    pub fn x_label_positions(&self, width: u16) -> Vec<(u16, String)> {
        let mut placed: Vec<(u16, String)> = Vec::new();
        let mut next_free = 0u16;

        for index in x_tick_indices(self.points.len()) {
            let Some(point) = self.points.get(index) else {
                continue;
            };
            let label_width = point.formatted_date.chars().count() as u16;
            if label_width > width {
                continue;
            }
            let center = self.point_column(index, width);
            let start = center
                .saturating_sub(label_width / 2)
                .min(width - label_width);
            if !placed.is_empty() && start < next_free {
                continue;
            }
            next_free = start + label_width + 1;
            placed.push((start, point.formatted_date.clone()));
        }
        placed
    }

    /// Split the chart's inner area into y labels, plot and x labels
    pub fn layout(&self, inner: Rect) -> ChartLayout {
        let label_width = self
            .y_labels()
            .iter()
            .map(|l| l.chars().count() as u16 + 1)
            .max()
            .unwrap_or(0)
            .min(inner.width / 3);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(label_width), Constraint::Min(1)])
            .split(rows[0]);

        ChartLayout {
            y_labels: columns[0],
            plot: columns[1],
            x_labels: Rect::new(columns[1].x, rows[1].y, columns[1].width, rows[1].height),
        }
    }

    pub fn y_labels(&self) -> Vec<String> {
        let [min, max] = self.bounds.drawable();
        let mid = (min + max) / 2.0;
        [min, mid, max]
            .iter()
            .map(|value| format!("${}", value))
            .collect()
    }
}

/// Render the price chart; `cursor` selects the tooltip point
pub fn render_price_chart(f: &mut Frame, area: Rect, model: &ChartModel, cursor: Option<usize>) {
    let color = trend_color(model.trend);

    let title = Line::from(vec![
        Span::styled(
            " Evolución del Precio ",
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{} ", model.range_label()), Style::default().fg(color)),
    ]);
    let mut block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_BORDER));

    if let Some(tooltip) = cursor.and_then(|i| model.tooltip(i)) {
        block = block.title_bottom(Line::from(vec![
            Span::styled(format!(" {} ", tooltip.date), Style::default().fg(C_DIM)),
            Span::styled(
                format!("{} ", tooltip.price),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    if model.points.is_empty() {
        let empty = Paragraph::new(Span::styled(" Sin datos de precio", Style::default().fg(C_DIM)))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let data = model.data();
    let x_max = (model.points.len().saturating_sub(1)).max(1) as f64;
    let cursor_point: Vec<(f64, f64)> = cursor
        .and_then(|i| data.get(i).copied())
        .into_iter()
        .collect();

    let datasets = vec![
        // Fill first so the line draws over it
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Bar)
            .style(Style::default().fg(trend_fill_color(model.trend)))
            .data(&data),
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color))
            .data(&data),
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD))
            .data(&cursor_point),
    ];

    let inner = block.inner(area);
    f.render_widget(block, area);
    let layout = model.layout(inner);

    // Axis labels are drawn by hand so each date sits under its own point
    let chart = Chart::new(datasets)
        .x_axis(Axis::default().bounds([0.0, x_max]))
        .y_axis(Axis::default().bounds(model.bounds.drawable()));
    f.render_widget(chart, layout.plot);

    render_y_labels(f, layout.y_labels, &model.y_labels());
    render_x_labels(f, layout.x_labels, &model.x_label_positions(layout.x_labels.width));
}

/// `labels` is `[min, mid, max]`, drawn bottom, middle and top
fn render_y_labels(f: &mut Frame, area: Rect, labels: &[String]) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let rows = [area.bottom() - 1, area.y + area.height / 2, area.y];
    for (label, row) in labels.iter().zip(rows) {
        let line = Paragraph::new(Span::styled(label.clone(), Style::default().fg(C_DIM)))
            .alignment(Alignment::Right);
        f.render_widget(line, Rect::new(area.x, row, area.width.saturating_sub(1), 1));
    }
}

fn render_x_labels(f: &mut Frame, area: Rect, labels: &[(u16, String)]) {
    for (start, label) in labels {
        let width = label.chars().count() as u16;
        let cell = Rect::new(area.x + start, area.y, width, area.height.min(1));
        f.render_widget(
            Paragraph::new(Span::styled(label.clone(), Style::default().fg(C_DIM))),
            cell,
        );
    }
}
