use std::time::{Duration, Instant};

/// Wall-clock budget for one batch. Checked between candidates; when it
/// expires the batch stops cleanly and reports partial progress. Each
/// creation is independently complete, so stopping mid-iteration never
/// leaves the store inconsistent.
#[derive(Debug, Clone, Copy)]
pub struct BatchBudget {
    deadline: Option<Instant>,
}

impl BatchBudget {
    pub fn from_secs(secs: u64) -> Self {
        Self {
            deadline: Some(Instant::now() + Duration::from_secs(secs)),
        }
    }

    pub fn unlimited() -> Self {
        Self { deadline: None }
    }

    pub fn expired(&self) -> bool {
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BatchBudget;

    #[test]
    fn unlimited_never_expires() {
        assert!(!BatchBudget::unlimited().expired());
    }

    #[test]
    fn zero_budget_expires_immediately() {
        assert!(BatchBudget::from_secs(0).expired());
    }

    #[test]
    fn generous_budget_is_live() {
        assert!(!BatchBudget::from_secs(3600).expired());
    }
}
