use crate::domain::ids::{ActionId, CallId, RelationshipId, UserId};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    FollowUp,
    Outreach,
    CallPrep,
    PostCall,
    Nurture,
}

impl ActionType {
    /// Types that must be linked to a relationship at creation time.
    /// Outreach may target a prospect that is not tracked yet.
    pub fn requires_relationship(&self) -> bool {
        !matches!(self, ActionType::Outreach)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::FollowUp => "follow_up",
            ActionType::Outreach => "outreach",
            ActionType::CallPrep => "call_prep",
            ActionType::PostCall => "post_call",
            ActionType::Nurture => "nurture",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "follow_up" => Ok(ActionType::FollowUp),
            "outreach" => Ok(ActionType::Outreach),
            "call_prep" => Ok(ActionType::CallPrep),
            "post_call" => Ok(ActionType::PostCall),
            "nurture" => Ok(ActionType::Nurture),
            _ => Err(CoreError::InvalidActionType(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionState {
    New,
    Sent,
    Snoozed,
    Done,
    Replied,
    Archived,
}

impl ActionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ActionState::Done | ActionState::Replied | ActionState::Archived
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionState::New => "new",
            ActionState::Sent => "sent",
            ActionState::Snoozed => "snoozed",
            ActionState::Done => "done",
            ActionState::Replied => "replied",
            ActionState::Archived => "archived",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "new" => Ok(ActionState::New),
            "sent" => Ok(ActionState::Sent),
            "snoozed" => Ok(ActionState::Snoozed),
            "done" => Ok(ActionState::Done),
            "replied" => Ok(ActionState::Replied),
            "archived" => Ok(ActionState::Archived),
            _ => Err(CoreError::InvalidActionState(raw.to_string())),
        }
    }
}

/// Display bucket for an action. Derived from the live score on every
/// read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    Priority,
    InMotion,
    OnDeck,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    /// Owning relationship. Immutable after creation.
    pub lead_id: Option<RelationshipId>,
    pub user_id: UserId,
    pub action_type: ActionType,
    pub state: ActionState,
    pub title: String,
    pub source_call_id: Option<CallId>,
    pub promised_due_at: Option<i64>,
    pub estimated_minutes: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Action {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.action_type.requires_relationship() && self.lead_id.is_none() {
            return Err(CoreError::MissingRelationship(
                self.action_type.as_str().to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, ActionState, ActionType};
    use crate::domain::ids::{ActionId, RelationshipId, UserId};

    fn action(action_type: ActionType, lead_id: Option<RelationshipId>) -> Action {
        Action {
            id: ActionId::new(),
            lead_id,
            user_id: UserId::new(),
            action_type,
            state: ActionState::New,
            title: "Check in".to_string(),
            source_call_id: None,
            promised_due_at: None,
            estimated_minutes: None,
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
        }
    }

    #[test]
    fn nurture_requires_relationship() {
        assert!(action(ActionType::Nurture, None).validate().is_err());
        assert!(action(ActionType::Nurture, Some(RelationshipId::new()))
            .validate()
            .is_ok());
    }

    #[test]
    fn outreach_allows_missing_relationship() {
        assert!(action(ActionType::Outreach, None).validate().is_ok());
    }

    #[test]
    fn terminal_states() {
        assert!(ActionState::Done.is_terminal());
        assert!(ActionState::Replied.is_terminal());
        assert!(ActionState::Archived.is_terminal());
        assert!(!ActionState::New.is_terminal());
        assert!(!ActionState::Sent.is_terminal());
        assert!(!ActionState::Snoozed.is_terminal());
    }
}
