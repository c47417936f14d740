pub mod cadence;
pub mod follow_up;
pub mod score;
pub mod status;
pub mod transitions;

pub use cadence::{schedule_next, touch_due_at, MAX_CADENCE_DAYS, SECONDS_PER_DAY};
pub use follow_up::{post_call_due_at, DEFAULT_CUTOFF_HOUR};
pub use score::{
    base_score, lane_for_score, next_move_score, DEFAULT_ENGAGEMENT_WEIGHT, MAX_SCORE,
};
pub use status::{
    compute_status, validate_near_due_days, RelationshipStatus, DEFAULT_NEAR_DUE_DAYS,
    MAX_NEAR_DUE_DAYS,
};
pub use transitions::{can_transition, check_transition};
