//! Resolving the server's local time zone and the current local time.

use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Get the current UTC offset of the time zone `canonical_timezone`, e.g. "Pacific/Auckland".
///
/// Returns `None` if `canonical_timezone` is not a known time zone name.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The current wall-clock date and time in the time zone `canonical_timezone`.
///
/// Transactions are recorded in local time, so this is the reference time for
/// the rewards window when a caller does not provide one.
///
/// Returns `None` if `canonical_timezone` is not a known time zone name.
pub fn local_now(canonical_timezone: &str) -> Option<PrimitiveDateTime> {
    let offset = get_local_offset(canonical_timezone)?;
    let now = OffsetDateTime::now_utc().to_offset(offset);

    Some(PrimitiveDateTime::new(now.date(), now.time()))
}

#[cfg(test)]
mod tests {
    use time::UtcOffset;

    use super::{get_local_offset, local_now};

    #[test]
    fn utc_has_zero_offset() {
        assert_eq!(get_local_offset("Etc/UTC"), Some(UtcOffset::UTC));
    }

    #[test]
    fn unknown_timezone_is_none() {
        assert_eq!(get_local_offset("Middle/Earth"), None);
        assert_eq!(local_now("Middle/Earth"), None);
    }

    #[test]
    fn local_now_is_available_for_known_timezone() {
        assert!(local_now("Pacific/Auckland").is_some());
    }
}
