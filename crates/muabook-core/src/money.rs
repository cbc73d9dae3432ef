//! Fixed-locale rendering of integer-cent amounts.
//!
//! Output is always US-style (`$1,234.56`) regardless of the server's ambient
//! locale, so email bodies stay deterministic for tests.

/// Formats integer cents as a dollar string with thousands separators.
#[must_use]
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let dollars = cents / 100;
    let remainder = cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{remainder:02}")
}
