/// Converts seconds into an `m:ss` timestamp. Minutes are not capped; anything
/// that is not a finite, non-negative number reads as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_seconds_to_timestamps() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(10.0), "0:10");
        assert_eq!(format_time(60.0), "1:00");
        assert_eq!(format_time(70.0), "1:10");
        assert_eq!(format_time(3725.9), "62:05");
    }

    #[test]
    fn unknown_durations_read_as_zero() {
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
        assert_eq!(format_time(-4.0), "0:00");
    }
}
