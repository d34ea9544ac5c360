use chrono::{DateTime, Utc};

/// Parse a run of ASCII digits as Unix seconds.
///
/// Returns `None` for empty input, non-digits, or values chrono cannot represent.
pub fn parse_epoch(digits: &[u8]) -> Option<DateTime<Utc>> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    // At most 19 digits fit in an i64
    if digits.len() > 19 {
        return None;
    }
    let secs = digits.iter().try_fold(0i64, |acc, &d| {
        acc.checked_mul(10)?.checked_add(i64::from(d - b'0'))
    })?;
    DateTime::from_timestamp(secs, 0)
}

/// Split a leading run of ASCII digits off `bytes`.
pub(crate) fn split_digits(bytes: &[u8]) -> (&[u8], &[u8]) {
    let end = bytes.iter().position(|b| !b.is_ascii_digit()).unwrap_or(bytes.len());
    bytes.split_at(end)
}
