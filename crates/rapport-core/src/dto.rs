use crate::domain::{ActionId, ActionState, ActionType, Lane, RelationshipId, Tier, UserId};
use crate::rules::RelationshipStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionListItemDto {
    pub id: ActionId,
    pub lead_id: Option<RelationshipId>,
    pub title: String,
    pub action_type: ActionType,
    pub state: ActionState,
    pub lane: Lane,
    pub next_move_score: i32,
    pub promised_due_at: Option<i64>,
    pub estimated_minutes: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipListItemDto {
    pub id: RelationshipId,
    pub user_id: UserId,
    pub display_name: String,
    pub status: RelationshipStatus,
    pub tier: Tier,
    pub next_touch_due_at: Option<i64>,
    pub overdue_actions_count: i32,
    pub reply_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReportDto {
    pub success: bool,
    pub created: usize,
    pub failed: usize,
    pub skipped: usize,
    pub message: String,
}
