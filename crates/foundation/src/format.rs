/// Formats a count with comma thousands separators (`9400` -> `"9,400"`).
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats a unit fraction as a percentage with one decimal (`0.823` -> `"82.3"`).
pub fn format_fraction_percent(fraction: f64) -> String {
    format!("{:.1}", fraction * 100.0)
}

/// Rounds a unit fraction to a whole percentage (`-0.046` -> `-5`).
pub fn round_fraction_percent(fraction: f64) -> i64 {
    let v = (fraction * 100.0).round();
    // Avoid printing "-0".
    if v == 0.0 { 0 } else { v as i64 }
}
