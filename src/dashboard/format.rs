//! Number formatting for the dashboard
//!
//! Two decimals with thousands separators, e.g. `$1,234.56` / `-$12.00`.
//! Non-finite values render as `NaN` / `inf` / `-inf`.

/// `1234.567` -> `1,234.57`
pub fn number(value: f64) -> String {
    if let Some(text) = non_finite(value) {
        return text.to_string();
    }
    let sign = if value < 0.0 && format!("{:.2}", value.abs()) != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{sign}{}", grouped(value.abs()))
}

/// `-1234.5` -> `-$1,234.50`
pub fn usd(value: f64) -> String {
    if let Some(text) = non_finite(value) {
        return text.to_string();
    }
    let formatted = number(value);
    match formatted.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${formatted}"),
    }
}

/// Full-precision value for prices and token quantities
pub fn plain(value: f64) -> String {
    match non_finite(value) {
        Some(text) => text.to_string(),
        None => value.to_string(),
    }
}

/// Optional value, `NaN` when absent
pub fn optional(value: Option<f64>) -> String {
    number(value.unwrap_or(f64::NAN))
}

/// Integer count with thousands separators
pub fn count(value: usize) -> String {
    group_digits(&value.to_string())
}

fn non_finite(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value.is_infinite() {
        Some(if value > 0.0 { "inf" } else { "-inf" })
    } else {
        None
    }
}

fn grouped(abs: f64) -> String {
    let fixed = format!("{abs:.2}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{}.{frac_part}", group_digits(int_part))
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
