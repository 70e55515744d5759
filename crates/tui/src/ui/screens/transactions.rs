use api_types::transaction::TransactionKind;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};

use crate::{
    app::{AppState, QuickAddField, QuickAddKind},
    currency_store::engine_currency,
    ui::{components::money, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let (form_area, list_area) = if state.quick_add.is_some() {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0)])
            .split(area);
        (Some(layout[0]), layout[1])
    } else {
        (None, area)
    };

    if let Some(form_area) = form_area {
        render_form(frame, form_area, state, &theme);
    }
    render_list(frame, list_area, state, &theme);
}

fn render_form(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(form) = state.quick_add.as_ref() else {
        return;
    };

    let mut lines = vec![
        render_field(
            "Amount",
            form.amount.as_str(),
            form.focus == QuickAddField::Amount,
            theme,
        ),
        render_field(
            "Note",
            form.note.as_str(),
            form.focus == QuickAddField::Note,
            theme,
        ),
        Line::from(Span::styled(
            "Enter: save • Tab: next • Esc: cancel",
            Style::default().fg(theme.dim),
        )),
    ];

    if let Some(err) = form.error.as_ref() {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(theme.error),
        )));
    }

    let block = Block::default()
        .title(match form.kind {
            QuickAddKind::Expense => "Quick Add Expense",
            QuickAddKind::Income => "Quick Add Income",
        })
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let title = state
        .selected_account_view()
        .map(|account| format!("Transactions · {}", account.name))
        .unwrap_or_else(|| "Transactions".to_string());

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    if state.selected_account_view().is_none() {
        let empty = Paragraph::new(Line::from("Create an account first."))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    if state.transactions.is_empty() {
        let empty = Paragraph::new(Line::from(vec![
            Span::raw("No transactions. Press "),
            Span::styled("a", Style::default().fg(theme.accent)),
            Span::raw(" to add an expense."),
        ]))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items = state
        .transactions
        .iter()
        .map(|tx| {
            let when = tx.occurred_at.format("%d %b %H:%M").to_string();
            let note = tx.note.as_deref().unwrap_or("");
            let mut spans = vec![
                Span::styled(when, Style::default().fg(theme.dim)),
                Span::raw(" "),
                kind_chip(tx.kind, theme),
                Span::raw(" "),
            ];
            spans.extend(money::converted_amount(
                &state.currency,
                tx.amount_minor,
                engine_currency(tx.currency),
                theme,
            ));
            if !note.is_empty() {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    note.to_string(),
                    Style::default().fg(theme.text_muted),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect::<Vec<_>>();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
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

fn kind_chip(kind: TransactionKind, theme: &Theme) -> Span<'static> {
    let (label, color) = match kind {
        TransactionKind::Income => ("INC", theme.positive),
        TransactionKind::Expense => ("EXP", theme.negative),
        TransactionKind::Transfer => ("TRF", theme.text),
    };
    Span::styled(
        format!("[{label}]"),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}
