//! Percentage helper

/// Percentage of `part` in `total`, rounded to one decimal place.
///
/// Returns `0.0` when `total` is zero rather than dividing by zero.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((part as f64 / total as f64) * 1000.0).round() / 10.0
}
