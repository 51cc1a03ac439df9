//! Rendering helpers with fallbacks for absent payload fields.

pub const NOT_AVAILABLE: &str = "N/A";

pub fn fmt_text(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() && s != "None" => s.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn fmt_number(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn fmt_price(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("${v:.2}"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn fmt_signed(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:+.2}"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Percentage points with an explicit sign, e.g. `+10.00%`.
pub fn fmt_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:+.2}%"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// A 0..1 ratio shown as a percentage, e.g. accuracy `0.85` as `85.0%`.
pub fn fmt_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.1}%", v * 100.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Market caps and volumes, e.g. `2.95T`, `12.30M`.
pub fn fmt_large_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let abs = v.abs();
            if abs >= 1e12 {
                format!("{:.2}T", v / 1e12)
            } else if abs >= 1e9 {
                format!("{:.2}B", v / 1e9)
            } else if abs >= 1e6 {
                format!("{:.2}M", v / 1e6)
            } else if abs >= 1e3 {
                format!("{:.2}K", v / 1e3)
            } else {
                format!("{v:.0}")
            }
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}
