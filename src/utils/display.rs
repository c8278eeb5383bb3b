//! Human-readable size and savings figures shown next to each preview.

const UNITS: [&str; 3] = ["Bytes", "KB", "MB"];

/// Formats a byte count with base-1024 units, rounded to two decimals.
///
/// Anything at or above one megabyte stays in MB.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut exponent = 0;
    while exponent < UNITS.len() - 1 && bytes >= 1024_u64.pow(exponent as u32 + 1) {
        exponent += 1;
    }
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);
    let rounded = (value * 100.0).round() / 100.0;

    format!("{} {}", rounded, UNITS[exponent])
}

/// Percentage of the original size saved by the optimized version.
///
/// Negative when the output grew. Halves round upwards. A missing or empty
/// result counts as no savings.
pub fn savings_percent(original_size: u64, optimized_size: Option<u64>) -> i64 {
    match optimized_size {
        Some(optimized) if original_size > 0 && optimized > 0 => {
            let ratio = (original_size as f64 - optimized as f64) / original_size as f64;
            (ratio * 100.0 + 0.5).floor() as i64
        }
        _ => 0,
    }
}

/// Savings as shown in summaries: `-75%` when smaller, `+20%` when larger.
pub fn format_savings(percent: i64) -> String {
    match percent {
        0 => "0%".to_string(),
        p if p > 0 => format!("-{p}%"),
        p => format!("+{}%", p.unsigned_abs()),
    }
}
