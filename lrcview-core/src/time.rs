//! Time-tag grammar and timestamp formatting.
//!
//! A tag body is `mm:ss`, `mm:ss.fff` or `mm:ss:fff`: one to three minute
//! digits, one or two second digits, then an optional fraction of one to
//! three digits introduced by `.` or `:`. The surrounding delimiters (`[]`
//! for lines, `<>` for words) are checked by the caller.

use std::time::Duration;

const MAX_MINUTE_DIGITS: usize = 3;
const MAX_SECOND_DIGITS: usize = 2;
const MAX_FRACTION_DIGITS: usize = 3;

const FRACTION_SEPARATORS: &[char] = &['.', ':'];

fn digit_run(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

/// Scan a tag body at the start of `input`.
///
/// Returns the time in seconds and the number of bytes consumed. A fraction
/// longer than three digits is cut at three, leaving the extra digit for the
/// caller's delimiter check to reject.
#[must_use]
pub fn scan_tag_body(input: &str) -> Option<(f64, usize)> {
    let minutes_len = digit_run(input);
    if !(1..=MAX_MINUTE_DIGITS).contains(&minutes_len) {
        return None;
    }
    let minutes: u32 = input[..minutes_len].parse().ok()?;

    let after_minutes = input[minutes_len..].strip_prefix(':')?;
    let seconds_len = digit_run(after_minutes);
    if !(1..=MAX_SECOND_DIGITS).contains(&seconds_len) {
        return None;
    }

    let mut consumed = minutes_len + 1 + seconds_len;
    let mut seconds_text = after_minutes[..seconds_len].to_string();

    // The separator is normalized to a decimal point before parsing
    if let Some(fraction) = after_minutes[seconds_len..].strip_prefix(FRACTION_SEPARATORS) {
        let fraction_len = digit_run(fraction).min(MAX_FRACTION_DIGITS);
        if fraction_len > 0 {
            seconds_text.push('.');
            seconds_text.push_str(&fraction[..fraction_len]);
            consumed += 1 + fraction_len;
        }
    }

    let seconds: f64 = seconds_text.parse().ok()?;
    Some((f64::from(minutes) * 60.0 + seconds, consumed))
}

/// Format seconds as `mm:ss.xx` (hundredths), clamping negatives to zero.
#[must_use]
pub fn format_timestamp(seconds: f64) -> String {
    let duration = Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or_default();
    let centis = duration.as_millis() / 10;
    let minutes = centis / 6000;
    let secs = (centis / 100) % 60;
    let hundredths = centis % 100;
    format!("{minutes:02}:{secs:02}.{hundredths:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_minutes_seconds() {
        assert_eq!(scan_tag_body("00:00"), Some((0.0, 5)));
        assert_eq!(scan_tag_body("01:02"), Some((62.0, 5)));
        assert_eq!(scan_tag_body("1:5]"), Some((65.0, 3)));
    }

    #[test]
    fn test_scan_fraction_dot_and_colon() {
        assert_eq!(scan_tag_body("01:02.500"), Some((62.5, 9)));
        assert_eq!(scan_tag_body("01:02:500"), Some((62.5, 9)));
        assert_eq!(scan_tag_body("00:12.5"), Some((12.5, 7)));
    }

    #[test]
    fn test_scan_three_digit_minutes() {
        assert_eq!(scan_tag_body("100:00"), Some((6000.0, 6)));
        assert_eq!(scan_tag_body("1000:00"), None);
    }

    #[test]
    fn test_scan_rejects_bad_seconds() {
        assert_eq!(scan_tag_body("00:123"), None);
        assert_eq!(scan_tag_body("00:"), None);
        assert_eq!(scan_tag_body("00.12"), None);
        assert_eq!(scan_tag_body(":12"), None);
        assert_eq!(scan_tag_body(""), None);
    }

    #[test]
    fn test_scan_leaves_trailing_input() {
        // Separator without digits is not part of the body
        assert_eq!(scan_tag_body("00:05.]"), Some((5.0, 5)));
        // Only three fraction digits are consumed
        assert_eq!(scan_tag_body("00:05.1234"), Some((5.123, 9)));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00.00");
        assert_eq!(format_timestamp(62.5), "01:02.50");
        assert_eq!(format_timestamp(345.67), "05:45.67");
        assert_eq!(format_timestamp(-3.0), "00:00.00");
    }
}
