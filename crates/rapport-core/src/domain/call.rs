use crate::domain::ids::{CallId, UserId};
use serde::{Deserialize, Serialize};

/// A calendar event ingested from the user's calendar. Content extraction
/// happens upstream; the engine only cares about when it ended and which
/// attendee it can be matched against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEvent {
    pub id: CallId,
    pub user_id: UserId,
    pub attendee_email: Option<String>,
    pub started_at: i64,
    pub ended_at: i64,
    pub created_at: i64,
}
