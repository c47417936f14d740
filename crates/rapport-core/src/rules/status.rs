use crate::domain::Relationship;
use crate::error::CoreError;
use crate::rules::cadence::{touch_due_at, SECONDS_PER_DAY};
use serde::{Deserialize, Serialize};

pub const DEFAULT_NEAR_DUE_DAYS: i64 = 2;

pub const MAX_NEAR_DUE_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStatus {
    Unestablished,
    Overdue,
    Due,
    Upcoming,
    OnTrack,
}

impl RelationshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipStatus::Unestablished => "unestablished",
            RelationshipStatus::Overdue => "overdue",
            RelationshipStatus::Due => "due",
            RelationshipStatus::Upcoming => "upcoming",
            RelationshipStatus::OnTrack => "on_track",
        }
    }
}

pub fn validate_near_due_days(days: i64) -> Result<i64, CoreError> {
    if days < 0 || days > MAX_NEAR_DUE_DAYS {
        return Err(CoreError::InvalidNearDueDays(days));
    }
    Ok(days)
}

/// Derives the health status of a relationship at `now`. Pure and total:
/// malformed cadence values are the caller's validation problem, never
/// an error out of this function.
///
/// First match wins:
/// 1. never contacted -> unestablished
/// 2. deadline past with an open overdue action -> overdue
/// 3. deadline past -> due
/// 4. deadline within the near-due window -> upcoming
/// 5. otherwise -> on_track
pub fn compute_status(
    relationship: &Relationship,
    now_utc: i64,
    near_due_days: i64,
) -> RelationshipStatus {
    if relationship.last_interaction_at.is_none() {
        return RelationshipStatus::Unestablished;
    }

    let due_at = match touch_due_at(relationship) {
        Some(value) => value,
        None => return RelationshipStatus::Unestablished,
    };

    if due_at < now_utc {
        if relationship.overdue_actions_count > 0 {
            return RelationshipStatus::Overdue;
        }
        return RelationshipStatus::Due;
    }

    if due_at - now_utc <= near_due_days * SECONDS_PER_DAY {
        return RelationshipStatus::Upcoming;
    }

    RelationshipStatus::OnTrack
}
