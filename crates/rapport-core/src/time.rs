use chrono::{DateTime, Duration, FixedOffset, Local, Offset, TimeZone, Utc};

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn local_offset() -> FixedOffset {
    Local::now().offset().fix()
}

/// Half-open interval `[start, end)` of unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Window of timestamps that lie between `max_age_secs` and
    /// `min_age_secs` before `now`. Used for sliding eligibility windows
    /// where an event must be seen exactly once.
    pub fn ending_between(now_utc: i64, min_age_secs: i64, max_age_secs: i64) -> Self {
        Self {
            start: now_utc - max_age_secs,
            end: now_utc - min_age_secs,
        }
    }

    pub fn contains(&self, ts: i64) -> bool {
        ts >= self.start && ts < self.end
    }
}

/// Start of the local calendar day containing `now_utc`, and start of the
/// following day, both as utc timestamps.
pub fn day_bounds(now_utc: i64, local_offset: FixedOffset) -> (i64, i64) {
    let now = DateTime::<Utc>::from_timestamp(now_utc, 0)
        .unwrap_or_else(|| DateTime::<Utc>::from_timestamp(0, 0).unwrap());
    let local_date = now.with_timezone(&local_offset).date_naive();
    let start_of_today_local = local_date.and_hms_opt(0, 0, 0).expect("midnight is valid");
    let start_of_tomorrow_local = start_of_today_local + Duration::days(1);

    let to_utc = |naive| {
        local_offset
            .from_local_datetime(&naive)
            .single()
            .expect("fixed offset conversion")
            .with_timezone(&Utc)
            .timestamp()
    };

    (to_utc(start_of_today_local), to_utc(start_of_tomorrow_local))
}

/// 23:59:59 of the local calendar day containing `ts`, as a utc timestamp.
pub fn end_of_local_day(ts: i64, local_offset: FixedOffset) -> i64 {
    let (_, start_of_tomorrow) = day_bounds(ts, local_offset);
    start_of_tomorrow - 1
}

/// Hour-of-day (0-23) of `ts` in the given local offset.
pub fn local_hour(ts: i64, local_offset: FixedOffset) -> u32 {
    use chrono::Timelike;
    DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or_else(|| DateTime::<Utc>::from_timestamp(0, 0).unwrap())
        .with_timezone(&local_offset)
        .hour()
}

#[cfg(test)]
mod tests {
    use super::{day_bounds, end_of_local_day, local_hour, TimeWindow};
    use chrono::{FixedOffset, TimeZone, Utc};

    #[test]
    fn window_is_half_open() {
        let window = TimeWindow::new(100, 200);
        assert!(window.contains(100));
        assert!(window.contains(199));
        assert!(!window.contains(200));
        assert!(!window.contains(99));
    }

    #[test]
    fn ending_between_builds_sliding_window() {
        let now = 1_700_000_000;
        let window = TimeWindow::ending_between(now, 3_600, 7_200);
        assert_eq!(window.start, now - 7_200);
        assert_eq!(window.end, now - 3_600);
        assert!(window.contains(now - 5_000));
        assert!(!window.contains(now - 1_800));
        assert!(!window.contains(now - 7_201));
    }

    #[test]
    fn day_bounds_span_24_hours() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = Utc
            .with_ymd_and_hms(2024, 3, 10, 12, 0, 0)
            .unwrap()
            .timestamp();
        let (start, end) = day_bounds(now, offset);
        assert_eq!(end - start, 86_400);
        assert!(start <= now && now < end);
    }

    #[test]
    fn end_of_local_day_is_last_second() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let noon = Utc
            .with_ymd_and_hms(2024, 3, 10, 12, 0, 0)
            .unwrap()
            .timestamp();
        let expected = Utc
            .with_ymd_and_hms(2024, 3, 10, 23, 59, 59)
            .unwrap()
            .timestamp();
        assert_eq!(end_of_local_day(noon, offset), expected);
    }

    #[test]
    fn local_hour_respects_offset() {
        let utc_noon = Utc
            .with_ymd_and_hms(2024, 3, 10, 12, 0, 0)
            .unwrap()
            .timestamp();
        let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();
        assert_eq!(local_hour(utc_noon, plus_three), 15);
        assert_eq!(local_hour(utc_noon, FixedOffset::east_opt(0).unwrap()), 12);
    }
}
