use crate::domain::Relationship;
use crate::error::CoreError;

pub const MAX_CADENCE_DAYS: i32 = 3650;

pub const SECONDS_PER_DAY: i64 = 86_400;

pub fn schedule_next(now_utc: i64, cadence_days: i32) -> Result<i64, CoreError> {
    if cadence_days <= 0 || cadence_days > MAX_CADENCE_DAYS {
        return Err(CoreError::InvalidCadenceDays(cadence_days));
    }

    Ok(now_utc + i64::from(cadence_days) * SECONDS_PER_DAY)
}

/// Effective touch deadline: the stored value wins, otherwise it is
/// derived from the last interaction plus the cadence interval. `None`
/// only when the relationship has never been contacted.
pub fn touch_due_at(relationship: &Relationship) -> Option<i64> {
    if relationship.next_touch_due_at.is_some() {
        return relationship.next_touch_due_at;
    }
    relationship
        .last_interaction_at
        .map(|last| last + i64::from(relationship.cadence_days) * SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::{schedule_next, touch_due_at, MAX_CADENCE_DAYS, SECONDS_PER_DAY};
    use crate::domain::{Cadence, Relationship, RelationshipId, Tier, UserId};

    fn relationship(last: Option<i64>, next: Option<i64>) -> Relationship {
        Relationship {
            id: RelationshipId::new(),
            user_id: UserId::new(),
            display_name: "Grace Hopper".to_string(),
            email: None,
            cadence: Cadence::Biweekly,
            cadence_days: 14,
            tier: Tier::A,
            last_interaction_at: last,
            next_touch_due_at: next,
            overdue_actions_count: 0,
            reply_rate: None,
            created_at: 0,
            updated_at: 0,
            archived_at: None,
        }
    }

    #[test]
    fn schedule_next_adds_days() {
        let now = 1_700_000_000;
        let scheduled = schedule_next(now, 7).unwrap();
        assert_eq!(scheduled, now + 7 * SECONDS_PER_DAY);
    }

    #[test]
    fn schedule_next_rejects_large_values() {
        let now = 1_700_000_000;
        assert!(schedule_next(now, MAX_CADENCE_DAYS + 1).is_err());
        assert!(schedule_next(now, 0).is_err());
    }

    #[test]
    fn touch_due_at_prefers_stored_value() {
        let rel = relationship(Some(1_700_000_000), Some(1_700_500_000));
        assert_eq!(touch_due_at(&rel), Some(1_700_500_000));
    }

    #[test]
    fn touch_due_at_falls_back_to_cadence() {
        let last = 1_700_000_000;
        let rel = relationship(Some(last), None);
        assert_eq!(touch_due_at(&rel), Some(last + 14 * SECONDS_PER_DAY));
    }

    #[test]
    fn touch_due_at_none_when_never_contacted() {
        assert_eq!(touch_due_at(&relationship(None, None)), None);
    }
}
