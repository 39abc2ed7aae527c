pub fn currency(amount: f64) -> String {
    format!("${amount:.2}")
}

pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Manual quantity input: non-numeric or below 1 clamps to 1.
pub fn parse_qty(raw: &str) -> u32 {
    raw.trim().parse::<u32>().map_or(1, |qty| qty.max(1))
}
