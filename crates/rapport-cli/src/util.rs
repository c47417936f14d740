use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use rapport_core::domain::{ActionId, RelationshipId, UserId};
use rapport_core::rules::RelationshipStatus;
use rapport_core::Lane;
use std::str::FromStr;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn local_offset() -> FixedOffset {
    Local::now().offset().fix()
}

pub fn parse_local_timestamp(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("timestamp cannot be empty"));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow!("invalid date"))?;
        return local_to_utc_timestamp(naive);
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return local_to_utc_timestamp(dt);
        }
    }

    Err(anyhow!(
        "invalid datetime format: expected YYYY-MM-DD or YYYY-MM-DD HH:MM"
    ))
}

pub fn format_timestamp_date(ts: i64) -> String {
    let dt = DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or_else(|| DateTime::<Utc>::from_timestamp(0, 0).unwrap())
        .with_timezone(&Local);
    dt.format("%Y-%m-%d").to_string()
}

pub fn format_timestamp_datetime(ts: i64) -> String {
    let dt = DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or_else(|| DateTime::<Utc>::from_timestamp(0, 0).unwrap())
        .with_timezone(&Local);
    dt.format("%Y-%m-%d %H:%M").to_string()
}

pub fn parse_relationship_id(raw: &str) -> Result<RelationshipId> {
    RelationshipId::from_str(raw.trim()).map_err(|_| anyhow!("invalid relationship id: {raw}"))
}

pub fn parse_action_id(raw: &str) -> Result<ActionId> {
    ActionId::from_str(raw.trim()).map_err(|_| anyhow!("invalid action id: {raw}"))
}

pub fn parse_user_id(raw: &str) -> Result<UserId> {
    UserId::from_str(raw.trim()).map_err(|_| anyhow!("invalid user id: {raw}"))
}

pub fn status_label(status: RelationshipStatus) -> &'static str {
    match status {
        RelationshipStatus::Unestablished => "unestablished",
        RelationshipStatus::Overdue => "overdue",
        RelationshipStatus::Due => "due",
        RelationshipStatus::Upcoming => "upcoming",
        RelationshipStatus::OnTrack => "on track",
    }
}

pub fn lane_label(lane: Lane) -> &'static str {
    match lane {
        Lane::Priority => "priority",
        Lane::InMotion => "in motion",
        Lane::OnDeck => "on deck",
    }
}

fn local_to_utc_timestamp(naive: NaiveDateTime) -> Result<i64> {
    match Local.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => Ok(dt.timestamp()),
        chrono::LocalResult::Ambiguous(dt, _) => Ok(dt.timestamp()),
        chrono::LocalResult::None => Err(anyhow!("datetime not representable in local timezone")),
    }
}
