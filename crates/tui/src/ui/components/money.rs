use engine::{Currency, Money};
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use crate::{currency_store::CurrencyStore, ui::theme::Theme};

/// Renders an amount in the user's preferred currency with semantic coloring.
///
/// When the shown value is a conversion, a dim `(original)` annotation
/// follows it; when conversion is impossible the original amount is shown
/// alone. Positive amounts get a `+` prefix.
#[must_use]
pub fn converted_amount(
    store: &CurrencyStore,
    amount_minor: i64,
    currency: Currency,
    theme: &Theme,
) -> Vec<Span<'static>> {
    let shown = store.display(Money::new(amount_minor), currency);

    let (color, prefix) = if amount_minor > 0 {
        (theme.positive, "+")
    } else if amount_minor < 0 {
        (theme.negative, "")
    } else {
        (theme.dim, "")
    };

    let mut spans = vec![Span::styled(
        format!("{prefix}{}", shown.text),
        Style::default().fg(color),
    )];
    if let Some(original) = shown.original {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("({original})"),
            Style::default().fg(theme.dim),
        ));
    }
    spans
}

/// Same as [`converted_amount`] without the `+` prefix, for balances and
/// totals where the sign is part of the value.
#[must_use]
pub fn converted_balance(
    store: &CurrencyStore,
    amount_minor: i64,
    currency: Currency,
    theme: &Theme,
) -> Vec<Span<'static>> {
    let shown = store.display(Money::new(amount_minor), currency);

    let color = if amount_minor < 0 {
        theme.negative
    } else {
        theme.text
    };

    let mut spans = vec![Span::styled(shown.text, Style::default().fg(color))];
    if let Some(original) = shown.original {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("({original})"),
            Style::default().fg(theme.dim),
        ));
    }
    spans
}

/// Header chip showing the preferred display currency.
#[must_use]
pub fn currency_badge(store: &CurrencyStore, theme: &Theme) -> Span<'static> {
    Span::styled(
        format!("[{}]", store.preferred().code()),
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )
}

/// Creates a simple text-based progress bar for inline use.
///
/// Returns a string like `████████░░ 80%` or `━━━━━━━━━━` for unlimited.
#[must_use]
pub fn inline_progress_bar(current: i64, cap: Option<i64>, width: usize) -> String {
    match cap {
        Some(cap_value) if cap_value > 0 => {
            let ratio = (current as f64 / cap_value as f64).clamp(0.0, 1.0);
            let filled = ((ratio * width as f64) as usize).min(width);
            let empty = width.saturating_sub(filled);
            let percentage = (ratio * 100.0) as u16;

            format!(
                "{}{} {}%",
                "█".repeat(filled),
                "░".repeat(empty),
                percentage
            )
        }
        _ => "━".repeat(width),
    }
}

/// Creates a styled inline progress bar with usage-based coloring.
#[must_use]
pub fn styled_progress_bar(
    current: i64,
    cap: Option<i64>,
    width: usize,
    theme: &Theme,
) -> Span<'static> {
    let bar = inline_progress_bar(current, cap, width);

    let color = match cap {
        Some(cap_value) if cap_value > 0 => {
            let ratio = current as f64 / cap_value as f64;
            if ratio < 0.7 {
                theme.positive
            } else if ratio < 0.9 {
                theme.warning
            } else {
                theme.negative
            }
        }
        _ => theme.dim,
    };

    Span::styled(bar, Style::default().fg(color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use engine::RateTable;

    fn eur_store() -> CurrencyStore {
        let mut store = CurrencyStore::new(Currency::Eur);
        store.install_rates(RateTable::new(
            Currency::Usd,
            [(Currency::Eur, 0.9)],
            Utc::now(),
        ));
        store
    }

    #[test]
    fn converted_amount_includes_the_annotation() {
        let store = eur_store();
        let theme = Theme::default();
        let spans = converted_amount(&store, 100_00, Currency::Usd, &theme);
        assert_eq!(spans[0].content.as_ref(), "+€90.00");
        assert_eq!(spans[2].content.as_ref(), "($100.00)");
    }

    #[test]
    fn same_currency_amount_has_no_annotation() {
        let store = eur_store();
        let theme = Theme::default();
        let spans = converted_amount(&store, -50_00, Currency::Eur, &theme);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].content.as_ref(), "€-50.00");
    }

    #[test]
    fn unconvertible_amount_falls_back_to_the_original() {
        let store = eur_store();
        let theme = Theme::default();
        let spans = converted_balance(&store, 1000, Currency::Jpy, &theme);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].content.as_ref(), "¥1000");
    }

    #[test]
    fn badge_tracks_the_preference() {
        let mut store = eur_store();
        let theme = Theme::default();
        assert_eq!(currency_badge(&store, &theme).content.as_ref(), "[EUR]");

        store.set_preferred(Currency::Cop);
        assert_eq!(currency_badge(&store, &theme).content.as_ref(), "[COP]");
    }

    #[test]
    fn progress_bar_clamps_and_formats() {
        assert_eq!(inline_progress_bar(50, Some(100), 4), "██░░ 50%");
        assert_eq!(inline_progress_bar(200, Some(100), 4), "████ 100%");
        assert_eq!(inline_progress_bar(10, None, 4), "━━━━");
    }
}
