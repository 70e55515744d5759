use engine::Money;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};

use crate::{app::AppState, currency_store::engine_currency, ui::components::money, ui::theme::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let block = Block::default()
        .title(format!("Budgets · {}", state.month))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    if state.budgets.is_empty() {
        let empty = Paragraph::new(Line::from("No budgets for this month."))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items = state
        .budgets
        .iter()
        .map(|budget| {
            let currency = engine_currency(budget.currency);
            let category = state
                .categories
                .iter()
                .find(|category| category.id == budget.category_id)
                .map(|category| category.name.clone())
                .unwrap_or_else(|| "?".to_string());

            let spans = vec![
                Span::styled(format!("{category:<16}"), Style::default().fg(theme.text)),
                Span::raw(" "),
                money::styled_progress_bar(
                    budget.spent_minor,
                    Some(budget.limit_minor),
                    12,
                    &theme,
                ),
                Span::raw("  "),
                Span::styled(
                    format!(
                        "{} / {}",
                        Money::new(budget.spent_minor).format(currency),
                        Money::new(budget.limit_minor).format(currency)
                    ),
                    Style::default().fg(theme.text_muted),
                ),
            ];
            ListItem::new(Line::from(spans))
        })
        .collect::<Vec<_>>();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
