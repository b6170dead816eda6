//! Reply rendering. Everything here is a pure string builder; the rate and
//! totals replies use Telegram's HTML parse mode.

use std::collections::HashMap;
use std::fmt::Write as _;

use rates::{Currency, Provider, RateMap};

pub(crate) const SAVE_FAILED: &str = "Failed to save the expense";
pub(crate) const NO_DATA: &str = "No data found";

pub(crate) fn help_text() -> &'static str {
    "/list - for list active debts\n/rates - for exchange RUB => USD/EUR/GEL rates"
}

pub(crate) fn render_saved(amount: f64, reason: &str) -> String {
    format!("Saved: {amount:.5} {reason}")
}

/// One block per currency, providers in fixed order, providers without data
/// for that currency skipped.
pub(crate) fn render_rates(quotes: &[(Provider, RateMap)]) -> String {
    let mut text = String::new();

    for currency in Currency::LISTED {
        let _ = writeln!(text, "<b>[{currency}]</b>");
        for (provider, rates) in quotes {
            if let Some(rate) = rates.get(&currency) {
                let _ = writeln!(text, "  {}: {}", provider.label(), rate);
            }
        }
        text.push('\n');
    }

    text
}

/// One line per user, sorted by handle so the output is deterministic.
pub(crate) fn render_totals(totals: &HashMap<String, f64>) -> String {
    if totals.is_empty() {
        return NO_DATA.to_string();
    }

    let mut entries: Vec<_> = totals.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut text = String::new();
    for (username, total) in entries {
        let _ = writeln!(text, "<b>@{username}</b>: {total:.2}");
    }
    text
}
