use engine::Money;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
    app::AppState,
    currency_store::engine_currency,
    ui::{components::money, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_accounts(frame, columns[0], state, &theme);
    render_totals(frame, columns[1], state, &theme);
}

fn render_accounts(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let block = Block::default()
        .title("Accounts")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    if state.accounts.is_empty() {
        let empty = Paragraph::new(Line::from("No accounts yet."))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items = state
        .accounts
        .iter()
        .map(|account| {
            let name_style = if account.archived {
                Style::default().fg(theme.dim)
            } else {
                Style::default().fg(theme.text)
            };
            let mut spans = vec![
                Span::styled(format!("{:<18}", account.name), name_style),
                Span::raw(" "),
            ];
            spans.extend(money::converted_balance(
                &state.currency,
                account.balance_minor,
                engine_currency(account.currency),
                theme,
            ));
            if account.archived {
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

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_account));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_totals(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let block = Block::default()
        .title("Net Worth")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let store = &state.currency;
    let mut lines = Vec::new();

    // One combined figure when every currency converts; otherwise the raw
    // per-currency rows, without an error state.
    let balances = state
        .totals
        .iter()
        .map(|row| (Money::new(row.balance_minor), engine_currency(row.currency)));
    match store.sum_in_preferred(balances) {
        Ok(total) => {
            lines.push(Line::from(vec![
                Span::styled("Total", Style::default().fg(theme.text_muted)),
                Span::raw("    "),
                Span::styled(
                    total.format(store.preferred()),
                    Style::default()
                        .fg(theme.text)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        Err(_) => {
            lines.push(Line::from(Span::styled(
                "Totals by currency (no combined rate)",
                Style::default().fg(theme.dim),
            )));
        }
    }

    lines.push(Line::default());
    for row in &state.totals {
        let currency = engine_currency(row.currency);
        let mut spans = vec![
            Span::styled(
                format!("{:<5}", currency.code()),
                Style::default().fg(theme.text_muted),
            ),
            Span::raw(" "),
        ];
        spans.extend(money::converted_balance(
            store,
            row.balance_minor,
            currency,
            theme,
        ));
        lines.push(Line::from(spans));

        lines.push(Line::from(vec![
            Span::raw("      "),
            Span::styled("in ", Style::default().fg(theme.dim)),
            Span::styled(
                Money::new(row.total_income_minor).format(currency),
                Style::default().fg(theme.positive),
            ),
            Span::styled("  out ", Style::default().fg(theme.dim)),
            Span::styled(
                Money::new(row.total_expenses_minor).format(currency),
                Style::default().fg(theme.negative),
            ),
        ]));
    }

    if state.totals.is_empty() {
        lines.push(Line::from(Span::styled(
            "No activity yet.",
            Style::default().fg(theme.dim),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
