pub mod components;
pub mod keymap;
pub mod screens;
pub mod theme;

mod terminal;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::AppState;

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    match state.screen {
        crate::app::Screen::Login => screens::login::render(frame, area, state),
        crate::app::Screen::Home => render_shell(frame, area, state),
    }
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    // Main layout: info bar, tabs, content, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.section, &theme);

    match state.section {
        crate::app::Section::Overview => screens::overview::render(frame, layout[2], state),
        crate::app::Section::Transactions => screens::transactions::render(frame, layout[2], state),
        crate::app::Section::Budgets => screens::budgets::render(frame, layout[2], state),
        crate::app::Section::Goals => screens::goals::render(frame, layout[2], state),
    }

    render_bottom_bar(frame, layout[3], state, &theme);
    components::selector::render(frame, area, state);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let user = state.login.username.as_str();
    let rates = if state.currency.has_rates() {
        Span::styled("rates OK", Style::default().fg(theme.positive))
    } else {
        Span::styled("rates pending", Style::default().fg(theme.warning))
    };

    let mut spans = vec![
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user}  ")),
        Span::styled("Display", Style::default().fg(theme.text_muted)),
        Span::raw(": "),
        components::money::currency_badge(&state.currency, theme),
        Span::raw("  "),
        rates,
    ];

    if let Some(status) = state.status.as_ref() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            status.clone(),
            Style::default().fg(theme.warning),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = components::tabs::tab_shortcuts(theme);

    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.push(Span::styled("c", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" currency"));
    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.push(Span::styled("r", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" refresh"));

    if state.section == crate::app::Section::Transactions {
        parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        parts.push(Span::styled("a", Style::default().fg(theme.accent)));
        parts.push(Span::raw(" expense"));
        parts.push(Span::raw("  "));
        parts.push(Span::styled("i", Style::default().fg(theme.accent)));
        parts.push(Span::raw(" income"));
    }

    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
