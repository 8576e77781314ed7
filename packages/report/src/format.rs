//! Russian-locale number formatting.

/// Placeholder shown for absent values.
pub const MISSING: &str = "—";

const GROUP_SEPARATOR: char = '\u{a0}';
const DECIMAL_SEPARATOR: char = ',';

/// Groups of three digits, but only once the integer part has at least
/// five digits (`1234` stays as is, `12 345` is grouped), as the Russian
/// locale does.
fn group_thousands(digits: &str) -> String {
    if digits.len() < 5 {
        return digits.to_string();
    }

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    out
}

/// Formats `value` with exactly `digits` fraction digits, a non-breaking
/// space between thousands and a decimal comma. Absent and non-finite
/// values render as [`MISSING`].
#[must_use]
pub fn fmt_num(value: Option<f64>, digits: usize) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return MISSING.to_string();
    };

    let rendered = format!("{:.*}", digits, value.abs());
    let (int_part, frac_part) = rendered
        .split_once('.')
        .map_or((rendered.as_str(), None), |(i, f)| (i, Some(f)));

    let is_zero = rendered.chars().all(|c| c == '0' || c == '.');
    let mut out = String::new();
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push(DECIMAL_SEPARATOR);
        out.push_str(frac);
    }
    out
}

/// Formats `value` like [`fmt_num`] with an explicit `+` on positive
/// values, e.g. `+1,50`. Values that round to zero carry no sign.
#[must_use]
pub fn fmt_signed(value: Option<f64>, digits: usize) -> String {
    let text = fmt_num(value, digits);
    let is_zero = !text.chars().any(|c| ('1'..='9').contains(&c));
    match value {
        Some(v) if v > 0.0 && !is_zero => format!("+{text}"),
        _ => text,
    }
}

/// Formats a percentage change with an explicit sign, e.g. `+1,23%`.
#[must_use]
pub fn fmt_delta(pct: Option<f64>) -> String {
    if pct.filter(|v| v.is_finite()).is_none() {
        return MISSING.to_string();
    }
    format!("{}%", fmt_signed(pct, 2))
}
