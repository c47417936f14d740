use crate::domain::ActionState;
use crate::error::CoreError;

/// Allowed moves in the action state machine. Terminal states have no
/// outgoing edges; a snoozed action may be woken back to new.
pub fn can_transition(from: ActionState, to: ActionState) -> bool {
    use ActionState::*;
    match from {
        New => matches!(to, Sent | Snoozed | Done | Archived),
        Sent => matches!(to, Replied | Snoozed | Done | Archived),
        Snoozed => matches!(to, New | Done | Archived),
        Done | Replied | Archived => false,
    }
}

pub fn check_transition(from: ActionState, to: ActionState) -> Result<(), CoreError> {
    if can_transition(from, to) {
        return Ok(());
    }
    Err(CoreError::InvalidTransition {
        from: from.as_str().to_string(),
        to: to.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{can_transition, check_transition};
    use crate::domain::ActionState::*;

    #[test]
    fn new_moves() {
        assert!(can_transition(New, Sent));
        assert!(can_transition(New, Snoozed));
        assert!(can_transition(New, Done));
        assert!(can_transition(New, Archived));
        assert!(!can_transition(New, Replied));
    }

    #[test]
    fn sent_moves() {
        assert!(can_transition(Sent, Replied));
        assert!(can_transition(Sent, Snoozed));
        assert!(!can_transition(Sent, New));
    }

    #[test]
    fn snoozed_can_wake() {
        assert!(can_transition(Snoozed, New));
        assert!(!can_transition(Snoozed, Sent));
        assert!(!can_transition(Snoozed, Replied));
    }

    #[test]
    fn terminal_states_are_final() {
        for terminal in [Done, Replied, Archived] {
            for target in [New, Sent, Snoozed, Done, Replied, Archived] {
                assert!(!can_transition(terminal, target));
            }
        }
    }

    #[test]
    fn check_transition_reports_both_states() {
        let err = check_transition(Done, New).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("done"));
        assert!(message.contains("new"));
    }
}
