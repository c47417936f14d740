use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("display name is required")]
    EmptyDisplayName,
    #[error("unknown cadence: {0}")]
    InvalidCadence(String),
    #[error("invalid cadence days: {0}")]
    InvalidCadenceDays(i32),
    #[error("unknown tier: {0}")]
    InvalidTier(String),
    #[error("unknown action type: {0}")]
    InvalidActionType(String),
    #[error("unknown action state: {0}")]
    InvalidActionState(String),
    #[error("reply rate out of range: {0}")]
    InvalidReplyRate(f64),
    #[error("action type {0} requires a relationship")]
    MissingRelationship(String),
    #[error("invalid action state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
    #[error("invalid near-due days: {0}")]
    InvalidNearDueDays(i64),
    #[error("invalid cutoff hour: {0}")]
    InvalidCutoffHour(u32),
}
