//! News sidebar

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use super::{C_ACCENT, C_BORDER, C_BRIGHT, C_DIM};
use crate::shared::dates::format_display_date;
use crate::shared::types::NewsItem;

/// One visual row of the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsRow<'a> {
    Entry(&'a NewsItem),
    Divider,
}

/// Entries separated by dividers, none after the last
pub fn news_rows(items: &[NewsItem]) -> Vec<NewsRow<'_>> {
    let mut rows = Vec::with_capacity(items.len() * 2);
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            rows.push(NewsRow::Divider);
        }
        rows.push(NewsRow::Entry(item));
    }
    rows
}

pub fn news_count_label(count: usize) -> String {
    format!("{} artículos", count)
}

/// Render the sidebar; `selected` is an index into `items`
pub fn render_news_sidebar(f: &mut Frame, area: Rect, items: &[NewsItem], selected: Option<usize>) {
    let title = Line::from(vec![
        Span::styled(
            " Últimas Noticias ",
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{} ", news_count_label(items.len())), Style::default().fg(C_DIM)),
    ]);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_BORDER));

    let divider_width = area.width.saturating_sub(2) as usize;
    let list_items: Vec<ListItem> = news_rows(items)
        .into_iter()
        .map(|row| match row {
            NewsRow::Entry(item) => ListItem::new(vec![
                Line::from(Span::styled(
                    format_display_date(&item.date),
                    Style::default().fg(C_DIM),
                )),
                Line::from(Span::styled(item.title.clone(), Style::default().fg(C_BRIGHT))),
                Line::from(Span::styled(
                    format!("↗ {}", item.link),
                    Style::default().fg(C_ACCENT),
                )),
            ]),
            NewsRow::Divider => ListItem::new(Line::from(Span::styled(
                "─".repeat(divider_width),
                Style::default().fg(C_BORDER),
            ))),
        })
        .collect();

    let list = List::new(list_items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    // Entry i sits at row 2i because of the dividers
    let mut state = ListState::default();
    state.select(selected.filter(|i| *i < items.len()).map(|i| i * 2));
    f.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(n: usize) -> NewsItem {
        NewsItem {
            date: format!("2024-02-{:02}", n),
            title: format!("Headline {}", n),
            link: format!("https://news.example/{}", n),
        }
    }

    fn divider_count(rows: &[NewsRow]) -> usize {
        rows.iter().filter(|r| matches!(r, NewsRow::Divider)).count()
    }

    #[test]
    fn test_dividers_between_entries_only() {
        for n in 0..6 {
            let items: Vec<NewsItem> = (1..=n).map(item).collect();
            let rows = news_rows(&items);

            assert_eq!(divider_count(&rows), n.saturating_sub(1), "{} items", n);
            assert_eq!(rows.len(), (2 * n).saturating_sub(1), "{} items", n);
            assert_ne!(rows.last(), Some(&NewsRow::Divider));
        }
    }

    #[test]
    fn test_rows_keep_item_order() {
        let items: Vec<NewsItem> = (1..=3).map(item).collect();
        let titles: Vec<&str> = news_rows(&items)
            .into_iter()
            .filter_map(|row| match row {
                NewsRow::Entry(item) => Some(item.title.as_str()),
                NewsRow::Divider => None,
            })
            .collect();
        assert_eq!(titles, vec!["Headline 1", "Headline 2", "Headline 3"]);
    }

    #[test]
    fn test_count_label() {
        assert_eq!(news_count_label(0), "0 artículos");
        assert_eq!(news_count_label(12), "12 artículos");
    }
}
