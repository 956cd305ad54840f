//! Amount Entry Helpers

/// Quick-select amounts, in rupees
pub const PRESET_AMOUNTS: [u64; 4] = [100, 500, 1000, 5000];

/// Keep only ASCII digits from user input
pub fn sanitize_amount_input(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Parse an entered amount; must be a positive integer
pub fn parse_amount(input: &str) -> Option<u64> {
    input.trim().parse::<u64>().ok().filter(|amount| *amount >= 1)
}

/// Format with Indian digit grouping: last three digits, then pairs
///
/// `1234567` becomes `12,34,567`.
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

/// Display form of a sanitized input; empty stays empty
pub fn display_amount(input: &str) -> String {
    input.parse::<u64>().map(format_inr).unwrap_or_default()
}
