use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};

use crate::{app::AppState, currency_store::engine_currency, ui::components::money, ui::theme::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let block = Block::default()
        .title("Goals")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    if state.goals.is_empty() {
        let empty = Paragraph::new(Line::from("No goals yet."))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items = state
        .goals
        .iter()
        .map(|goal| {
            let currency = engine_currency(goal.currency);
            let name_style = if goal.archived {
                Style::default().fg(theme.dim)
            } else {
                Style::default().fg(theme.text)
            };

            let mut spans = vec![
                Span::styled(format!("{:<18}", goal.name), name_style),
                Span::raw(" "),
                money::styled_progress_bar(goal.saved_minor, Some(goal.target_minor), 12, &theme),
                Span::raw("  "),
            ];
            spans.extend(money::converted_balance(
                &state.currency,
                goal.target_minor,
                currency,
                &theme,
            ));
            if let Some(date) = goal.target_date {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(
                    format!("by {date}"),
                    Style::default().fg(theme.dim),
                ));
            }
            if goal.archived {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    "[ARCHIVED]",
                    Style::default()
                        .fg(theme.warning)
                        .add_modifier(Modifier::BOLD),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect::<Vec<_>>();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
