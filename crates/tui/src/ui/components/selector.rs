use engine::Currency;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::{app::AppState, ui::theme::Theme};

/// Currency selector overlay.
///
/// Lists the fixed supported set; Enter applies the highlighted currency as
/// the display preference. Purely presentational: selection state lives in
/// the app, the preference in the currency store.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let Some(selector) = state.selector.as_ref() else {
        return;
    };
    let theme = Theme::default();

    let popup = centered_rect(area, 34, (Currency::ALL.len() + 4) as u16);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title("Display Currency")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(block.inner(popup));
    frame.render_widget(block, popup);

    let preferred = state.currency.preferred();
    let items = Currency::ALL
        .iter()
        .map(|currency| {
            let marker = if *currency == preferred { "●" } else { " " };
            let line = Line::from(vec![
                Span::styled(marker.to_string(), Style::default().fg(theme.accent)),
                Span::raw(" "),
                Span::styled(
                    currency.code().to_string(),
                    Style::default().fg(theme.text),
                ),
                Span::raw("  "),
                Span::styled(
                    currency.symbol().trim().to_string(),
                    Style::default().fg(theme.text_muted),
                ),
            ]);
            ListItem::new(line)
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(selector.selected));

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, layout[0], &mut list_state);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Enter: select • Esc: close",
            Style::default().fg(theme.dim),
        ))),
        layout[1],
    );
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
