//! Number coercion utilities.
//!
//! Input widgets hand over raw text, so the number rule needs to know whether
//! a piece of text would coerce to a number and what a number looks like once
//! it is turned back into text. Coercion is loose: surrounding whitespace is
//! ignored and blank text counts as zero.

/// Return true if `text` coerces to a number.
///
/// Accepts signed decimals with an optional fraction and exponent, the
/// `Infinity` literal, and unsigned `0x`/`0o`/`0b` integer literals. Words that
/// the float parser would otherwise accept (`inf`, `nan`) are rejected.
///
pub fn is_numeric(text: &str) -> bool {
    let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if trimmed.is_empty() {
        return true;
    }

    if matches!(trimmed, "Infinity" | "+Infinity" | "-Infinity") {
        return true;
    }

    if let Some(radix) = radix_of(trimmed) {
        let digits = &trimmed[2..];
        return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
    }

    let decimal_chars = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    decimal_chars && trimmed.parse::<f64>().is_ok()
}

fn radix_of(text: &str) -> Option<u32> {
    let prefix = text.get(..2)?;
    match prefix {
        "0x" | "0X" => Some(16),
        "0o" | "0O" => Some(8),
        "0b" | "0B" => Some(2),
        _ => None,
    }
}

/// Render a number the way it reads in a text input.
///
/// Integral values print without a fraction, negative zero prints as `0`, and
/// non-finite values print as `Infinity`, `-Infinity` or `NaN`. Magnitudes of
/// at least `1e21` or below `1e-6` use exponent notation with a signed
/// exponent, such as `1e+21` and `1.5e-7`.
///
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }
    format!("{}", value)
}
