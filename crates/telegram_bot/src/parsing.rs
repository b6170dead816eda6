//! Free-text message parsing.

/// A parsed `<amount> [reason...]` message.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ExpenseInput {
    pub amount: f64,
    pub reason: String,
}

/// Splits a message on the first whitespace run: the leading token is the
/// amount (comma accepted as decimal separator, unparseable reads as zero),
/// the rest is the reason, rejoined with single spaces.
pub(crate) fn parse_expense(text: &str) -> ExpenseInput {
    let mut words = text.split_whitespace();
    let amount = words.next().map(parse_decimal).unwrap_or(0.0);
    let reason = words.collect::<Vec<_>>().join(" ");

    ExpenseInput { amount, reason }
}

fn parse_decimal(raw: &str) -> f64 {
    raw.replace(',', ".").parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_and_reason() {
        let parsed = parse_expense("12.5 groceries");
        assert_eq!(parsed.amount, 12.5);
        assert_eq!(parsed.reason, "groceries");
    }

    #[test]
    fn comma_and_dot_separators_are_equivalent() {
        assert_eq!(parse_expense("12,5 groceries"), parse_expense("12.5 groceries"));
    }

    #[test]
    fn reason_is_rejoined_with_single_spaces() {
        let parsed = parse_expense("  7   taxi   to  airport ");
        assert_eq!(parsed.amount, 7.0);
        assert_eq!(parsed.reason, "taxi to airport");
    }

    #[test]
    fn missing_reason_is_empty() {
        let parsed = parse_expense("100");
        assert_eq!(parsed.amount, 100.0);
        assert_eq!(parsed.reason, "");
    }

    #[test]
    fn unparseable_amount_reads_as_zero() {
        let parsed = parse_expense("lunch with friends");
        assert_eq!(parsed.amount, 0.0);
        assert_eq!(parsed.reason, "with friends");
    }

    #[test]
    fn empty_message_reads_as_zero() {
        let parsed = parse_expense("");
        assert_eq!(parsed.amount, 0.0);
        assert_eq!(parsed.reason, "");
    }
}
