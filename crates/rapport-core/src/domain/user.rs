use crate::domain::ids::UserId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    /// Most recent product activity, used to gate autonomous generation.
    pub last_active_at: Option<i64>,
    pub created_at: i64,
}
