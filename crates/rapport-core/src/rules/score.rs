use crate::domain::{Lane, Tier};
use crate::rules::status::RelationshipStatus;

pub const MAX_SCORE: i32 = 100;

pub const DEFAULT_ENGAGEMENT_WEIGHT: i32 = 10;

/// Score a broken hard commitment on top of the status base.
pub const BROKEN_PROMISE_BOOST: i32 = 15;

const LANE_PRIORITY_FLOOR: i32 = 80;
const LANE_IN_MOTION_FLOOR: i32 = 50;

pub fn base_score(status: RelationshipStatus) -> i32 {
    match status {
        RelationshipStatus::Overdue => 80,
        RelationshipStatus::Due => 65,
        RelationshipStatus::Upcoming => 45,
        RelationshipStatus::Unestablished => 35,
        RelationshipStatus::OnTrack => 25,
    }
}

/// Urgency score on a clamped 0-100 scale, recomputed against live `now`
/// on every read. Absent reply data contributes zero, never a penalty.
pub fn next_move_score(
    status: RelationshipStatus,
    tier: Tier,
    promised_due_at: Option<i64>,
    reply_rate: Option<f64>,
    now_utc: i64,
    engagement_weight: i32,
) -> i32 {
    let mut score = base_score(status);

    if let Some(promised) = promised_due_at {
        if promised < now_utc {
            score += BROKEN_PROMISE_BOOST;
        }
    }

    score += tier.score_boost();
    score += engagement_bonus(reply_rate, engagement_weight);

    score.clamp(0, MAX_SCORE)
}

/// Diminishing bonus for historical responsiveness: square-root response
/// curve so the gap between a 0.2 and 0.4 reply rate matters more than
/// the gap between 0.7 and 0.9.
fn engagement_bonus(reply_rate: Option<f64>, weight: i32) -> i32 {
    match reply_rate {
        Some(rate) if (0.0..=1.0).contains(&rate) => {
            (f64::from(weight) * rate.sqrt()).round() as i32
        }
        _ => 0,
    }
}

/// Lower bounds are inclusive: 80 is priority, 50 is in motion.
pub fn lane_for_score(score: i32) -> Lane {
    if score >= LANE_PRIORITY_FLOOR {
        Lane::Priority
    } else if score >= LANE_IN_MOTION_FLOOR {
        Lane::InMotion
    } else {
        Lane::OnDeck
    }
}

#[cfg(test)]
mod tests {
    use super::{base_score, lane_for_score, next_move_score, DEFAULT_ENGAGEMENT_WEIGHT};
    use crate::domain::{Lane, Tier};
    use crate::rules::status::RelationshipStatus;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn base_scores_are_monotonic_in_severity() {
        assert!(base_score(RelationshipStatus::Overdue) > base_score(RelationshipStatus::Due));
        assert!(base_score(RelationshipStatus::Due) > base_score(RelationshipStatus::Upcoming));
        assert!(base_score(RelationshipStatus::Upcoming) > base_score(RelationshipStatus::OnTrack));
    }

    #[test]
    fn broken_promise_mid_tier_due_scores_85() {
        let score = next_move_score(
            RelationshipStatus::Due,
            Tier::B,
            Some(NOW - 86_400),
            None,
            NOW,
            DEFAULT_ENGAGEMENT_WEIGHT,
        );
        assert_eq!(score, 85);
        assert_eq!(lane_for_score(score), Lane::Priority);
    }

    #[test]
    fn future_promise_adds_nothing() {
        let with_promise = next_move_score(
            RelationshipStatus::Due,
            Tier::C,
            Some(NOW + 86_400),
            None,
            NOW,
            DEFAULT_ENGAGEMENT_WEIGHT,
        );
        let without = next_move_score(
            RelationshipStatus::Due,
            Tier::C,
            None,
            None,
            NOW,
            DEFAULT_ENGAGEMENT_WEIGHT,
        );
        assert_eq!(with_promise, without);
    }

    #[test]
    fn missing_reply_data_never_penalizes() {
        let absent = next_move_score(
            RelationshipStatus::Upcoming,
            Tier::C,
            None,
            None,
            NOW,
            DEFAULT_ENGAGEMENT_WEIGHT,
        );
        let zero = next_move_score(
            RelationshipStatus::Upcoming,
            Tier::C,
            None,
            Some(0.0),
            NOW,
            DEFAULT_ENGAGEMENT_WEIGHT,
        );
        assert_eq!(absent, zero);
    }

    #[test]
    fn engagement_bonus_diminishes() {
        let score_at = |rate: f64| {
            next_move_score(
                RelationshipStatus::OnTrack,
                Tier::C,
                None,
                Some(rate),
                NOW,
                DEFAULT_ENGAGEMENT_WEIGHT,
            )
        };
        let low_step = score_at(0.4) - score_at(0.2);
        let high_step = score_at(0.9) - score_at(0.7);
        assert!(low_step >= high_step);
        assert!(score_at(1.0) > score_at(0.0));
    }

    #[test]
    fn score_is_clamped_to_100() {
        let score = next_move_score(
            RelationshipStatus::Overdue,
            Tier::A,
            Some(NOW - 1),
            Some(1.0),
            NOW,
            DEFAULT_ENGAGEMENT_WEIGHT,
        );
        assert_eq!(score, 100);
    }

    #[test]
    fn lane_boundaries_are_inclusive_on_the_lower_bound() {
        assert_eq!(lane_for_score(80), Lane::Priority);
        assert_eq!(lane_for_score(79), Lane::InMotion);
        assert_eq!(lane_for_score(50), Lane::InMotion);
        assert_eq!(lane_for_score(49), Lane::OnDeck);
        assert_eq!(lane_for_score(0), Lane::OnDeck);
        assert_eq!(lane_for_score(100), Lane::Priority);
    }
}
