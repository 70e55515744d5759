use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::{
    app::{AppState, LoginField},
    ui::theme::Theme,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(8),
            Constraint::Min(0),
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(44),
            Constraint::Min(0),
        ])
        .split(layout[1]);

    let login = &state.login;
    let masked = "*".repeat(login.password.len());

    let mut lines = vec![
        render_field(
            "Username",
            login.username.as_str(),
            login.focus == LoginField::Username,
            &theme,
        ),
        render_field(
            "Password",
            masked.as_str(),
            login.focus == LoginField::Password,
            &theme,
        ),
        Line::from(Span::styled(
            "Enter: login • Tab: next field • Ctrl+C: quit",
            Style::default().fg(theme.dim),
        )),
    ];

    if let Some(message) = login.message.as_ref() {
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(theme.error),
        )));
    }

    let block = Block::default()
        .title("Gruzzolo")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Left)
            .block(block),
        columns[1],
    );
}

fn render_field(label: &str, value: &str, focused: bool, theme: &Theme) -> Line<'static> {
    let label_style = if focused {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    Line::from(vec![
        Span::styled(format!("{label:<10}"), label_style),
        Span::raw(" "),
        Span::styled(value.to_string(), Style::default().fg(theme.text)),
    ])
}
