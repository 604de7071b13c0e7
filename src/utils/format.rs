//! Display formatting shared by tables, cards, axis ticks and tooltips.

use thousands::Separable;

use super::time::parse_local_timestamp;

/// Placeholder shown for missing values.
pub const MISSING: &str = "-";

/// Format a number with K/M suffixes: `1500 -> "1.5K"`, `2500000 -> "2.5M"`.
///
/// The band is picked on the rounded value, so `999_999` is `"1.0M"`.
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    if (abs / 100.0).round() >= 10_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs.round() >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}

/// Format an amount as US dollars with two decimals: `"$1,234.56"`.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, whole.separate_with_commas(), cents)
}

/// Like [`format_currency`], but `"-"` when the value is missing.
pub fn format_currency_opt(amount: Option<f64>) -> String {
    amount.map(format_currency).unwrap_or_else(|| MISSING.to_string())
}

/// Dollar sign plus compact suffixing, used on revenue axes: `"$12.5K"`.
pub fn format_compact_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${}", format_compact(-amount))
    } else {
        format!("${}", format_compact(amount))
    }
}

/// Integer with thousands separators: `"12,345"`.
pub fn format_count(count: u64) -> String {
    count.separate_with_commas()
}

/// Percentage with one or two decimals.
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals.clamp(1, 2), value)
}

/// `"1h 5m"` or `"35m"`; missing or zero durations render as `"-"`.
pub fn format_duration(minutes: Option<f64>) -> String {
    match minutes {
        Some(minutes) if minutes > 0.0 => {
            let hours = (minutes / 60.0).floor() as u64;
            let mins = (minutes % 60.0).floor() as u64;
            if hours > 0 {
                format!("{}h {}m", hours, mins)
            } else {
                format!("{}m", mins)
            }
        }
        _ => MISSING.to_string(),
    }
}

pub fn format_distance(miles: Option<f64>) -> String {
    match miles {
        Some(miles) if miles != 0.0 => format!("{:.2} mi", miles),
        _ => MISSING.to_string(),
    }
}

pub fn format_speed(mph: Option<f64>) -> String {
    match mph {
        Some(mph) if mph != 0.0 => format!("{:.1} mph", mph),
        _ => MISSING.to_string(),
    }
}

/// Short local date-time such as `"Jan 1, 08:15 AM"`.
///
/// Unparsable input is shown as-is rather than hidden.
pub fn format_datetime(raw: Option<&str>) -> String {
    match raw {
        None => MISSING.to_string(),
        Some(raw) => parse_local_timestamp(raw)
            .map(|dt| dt.format("%b %-d, %I:%M %p").to_string())
            .unwrap_or_else(|| raw.to_string()),
    }
}

/// `"08:00"` for hour 8.
pub fn hour_label(hour: u32) -> String {
    format!("{:02}:00", hour)
}
