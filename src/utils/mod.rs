//! Common utilities and helpers

pub mod time;

/// `stream` / `streams` depending on `count`
pub fn plural(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

/// Scale `value` by powers of 1000, returning the scaled value and its SI prefix
pub fn si_prefix(value: f64) -> (f64, &'static str) {
    const PREFIXES: &[&str] = &["", "k", "M", "G", "T", "P", "E"];
    let mut value = value;
    let mut idx = 0;
    while value > 1000.0 && idx < PREFIXES.len() - 1 {
        value /= 1000.0;
        idx += 1;
    }
    (value, PREFIXES[idx])
}

/// Format a bit rate for display, e.g. `1.5 Mb/s`
pub fn format_bit_rate(bits_per_second: u64) -> String {
    let (value, prefix) = si_prefix(bits_per_second as f64);
    format!("{:.1} {}b/s", value, prefix)
}
