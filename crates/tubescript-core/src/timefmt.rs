/// Render an offset in seconds as `MM:SS`, or `HH:MM:SS` once it reaches an hour.
///
/// Fractional seconds are truncated, not rounded. Negative and non-finite input
/// saturates to zero (the float-to-int cast does this).
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}
