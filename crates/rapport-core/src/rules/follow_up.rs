use crate::error::CoreError;
use crate::rules::cadence::SECONDS_PER_DAY;
use crate::time::{end_of_local_day, local_hour};
use chrono::FixedOffset;

pub const DEFAULT_CUTOFF_HOUR: u32 = 15;

/// Deadline for a post-call follow-up: end of the local calendar day when
/// the call wrap-up still falls inside working hours (`now` before the
/// cutoff), otherwise end of the following day.
pub fn post_call_due_at(
    now_utc: i64,
    local_offset: FixedOffset,
    cutoff_hour: u32,
) -> Result<i64, CoreError> {
    if cutoff_hour >= 24 {
        return Err(CoreError::InvalidCutoffHour(cutoff_hour));
    }

    if local_hour(now_utc, local_offset) < cutoff_hour {
        Ok(end_of_local_day(now_utc, local_offset))
    } else {
        Ok(end_of_local_day(now_utc + SECONDS_PER_DAY, local_offset))
    }
}

#[cfg(test)]
mod tests {
    use super::{post_call_due_at, DEFAULT_CUTOFF_HOUR};
    use chrono::{FixedOffset, TimeZone, Utc};

    fn utc_ts(hour: u32, minute: u32) -> i64 {
        Utc.with_ymd_and_hms(2024, 5, 20, hour, minute, 0)
            .unwrap()
            .timestamp()
    }

    #[test]
    fn before_cutoff_is_same_day() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let now = utc_ts(14, 0);
        let due = post_call_due_at(now, offset, DEFAULT_CUTOFF_HOUR).unwrap();
        let expected = Utc
            .with_ymd_and_hms(2024, 5, 20, 23, 59, 59)
            .unwrap()
            .timestamp();
        assert_eq!(due, expected);
    }

    #[test]
    fn at_or_after_cutoff_is_next_day() {
        let offset = FixedOffset::east_opt(0).unwrap();
        // 15:45 local, past the 15:00 cutoff.
        let now = utc_ts(15, 45);
        let due = post_call_due_at(now, offset, DEFAULT_CUTOFF_HOUR).unwrap();
        let expected = Utc
            .with_ymd_and_hms(2024, 5, 21, 23, 59, 59)
            .unwrap()
            .timestamp();
        assert_eq!(due, expected);
    }

    #[test]
    fn cutoff_uses_local_clock_not_utc() {
        // 13:00 utc is 16:00 at +3, past the cutoff there.
        let now = utc_ts(13, 0);
        let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();
        let due = post_call_due_at(now, plus_three, DEFAULT_CUTOFF_HOUR).unwrap();
        let next_day_end = Utc
            .with_ymd_and_hms(2024, 5, 21, 23, 59, 59)
            .unwrap()
            .timestamp()
            - 3 * 3600;
        assert_eq!(due, next_day_end);
    }

    #[test]
    fn rejects_invalid_cutoff() {
        let offset = FixedOffset::east_opt(0).unwrap();
        assert!(post_call_due_at(utc_ts(12, 0), offset, 24).is_err());
    }
}
