//! Display formatting for report values.

use chrono::NaiveDateTime;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Two-decimal number.
pub fn number(value: f64) -> String {
    format!("{value:.2}")
}

/// Fraction rendered as a percentage: `0.05` becomes `5.00%`.
pub fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Amount in stake currency with three decimals.
pub fn price(value: f64, currency: &str) -> String {
    format!("{value:.3} {currency}")
}

/// `numerator / denominator`, or 0 when the denominator is zero.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

pub fn timestamp(value: Option<NaiveDateTime>) -> String {
    match value {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

/// Duration given in minutes, as `1h2m3s`.
pub fn minutes(value: f64) -> String {
    duration_secs(value * 60.0)
}

/// Duration given in seconds, as `1h2m3s`.
pub fn seconds(value: f64) -> String {
    duration_secs(value)
}

fn duration_secs(secs: f64) -> String {
    if !secs.is_finite() {
        return "n/a".to_string();
    }
    let nanos = (secs * NANOS_PER_SEC as f64).round();
    let sign = if nanos < 0.0 { "-" } else { "" };
    format!("{sign}{}", duration_nanos(nanos.abs() as u128))
}

/// Hours, minutes and fractional seconds; sub-second values use ms/µs/ns.
fn duration_nanos(nanos: u128) -> String {
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < NANOS_PER_SEC {
        let (unit, scale) = match nanos {
            n if n < 1_000 => ("ns", 1),
            n if n < 1_000_000 => ("µs", 1_000),
            _ => ("ms", 1_000_000),
        };
        return format!("{}{unit}", fixed(nanos, scale));
    }

    let whole_secs = nanos / NANOS_PER_SEC;
    let hours = whole_secs / 3600;
    let mins = (whole_secs / 60) % 60;
    let secs = nanos % (60 * NANOS_PER_SEC);

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || mins > 0 {
        out.push_str(&format!("{mins}m"));
    }
    out.push_str(&format!("{}s", fixed(secs, NANOS_PER_SEC)));
    out
}

/// `value / scale` with the fraction's trailing zeros dropped.
fn fixed(value: u128, scale: u128) -> String {
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = scale.ilog10() as usize;
    let frac = format!("{frac:0digits$}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}
