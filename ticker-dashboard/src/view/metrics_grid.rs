//! Fundamental metrics tile grid

use indexmap::IndexMap;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{C_BORDER, C_BRIGHT, C_BUY, C_DIM, C_SELL};
use crate::shared::calc::is_buy;
use crate::shared::types::{MetricValue, RECOMMENDATION_KEY};

const TILES_PER_ROW: usize = 4;
const TILE_HEIGHT: u16 = 4;

const ICON_TRENDING: &str = "↗";
const ICON_DEFAULT: &str = "▤";

/// One metric tile
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTile {
    pub label: String,
    pub value: String,
    pub icon: &'static str,
    pub icon_color: Color,
    pub value_color: Color,
}

/// Build tiles in the mapping's insertion order
pub fn metric_tiles(metrics: &IndexMap<String, MetricValue>) -> Vec<MetricTile> {
    metrics
        .iter()
        .map(|(label, value)| {
            let (icon, icon_color, value_color) = if label == RECOMMENDATION_KEY {
                if is_buy(value) {
                    (ICON_TRENDING, C_BUY, C_BUY)
                } else {
                    (ICON_TRENDING, C_DIM, C_SELL)
                }
            } else {
                (ICON_DEFAULT, C_DIM, C_BRIGHT)
            };

            MetricTile {
                label: label.clone(),
                value: value.to_string(),
                icon,
                icon_color,
                value_color,
            }
        })
        .collect()
}

/// Rows needed to show `count` tiles
pub fn grid_height(count: usize) -> u16 {
    let rows = count.div_ceil(TILES_PER_ROW) as u16;
    rows * TILE_HEIGHT
}

/// Render the metrics grid, four tiles per row
pub fn render_metrics_grid(f: &mut Frame, area: Rect, metrics: &IndexMap<String, MetricValue>) {
    let tiles = metric_tiles(metrics);
    if tiles.is_empty() {
        return;
    }

    let row_count = tiles.len().div_ceil(TILES_PER_ROW);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(TILE_HEIGHT); row_count])
        .split(area);

    for (row_area, row_tiles) in rows.iter().zip(tiles.chunks(TILES_PER_ROW)) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, TILES_PER_ROW as u32); TILES_PER_ROW])
            .split(*row_area);

        for (tile_area, tile) in columns.iter().zip(row_tiles) {
            render_tile(f, *tile_area, tile);
        }
    }
}

fn render_tile(f: &mut Frame, area: Rect, tile: &MetricTile) {
    let title = Line::from(vec![
        Span::styled(format!(" {} ", tile.label), Style::default().fg(C_DIM)),
        Span::styled(format!("{} ", tile.icon), Style::default().fg(tile.icon_color)),
    ]);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_BORDER));

    let value = Paragraph::new(Line::from(Span::styled(
        format!(" {}", tile.value),
        Style::default()
            .fg(tile.value_color)
            .add_modifier(Modifier::BOLD),
    )))
    .block(block);

    f.render_widget(value, area);
}
