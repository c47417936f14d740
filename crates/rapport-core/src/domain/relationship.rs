use crate::domain::ids::{RelationshipId, UserId};
use crate::error::CoreError;
use crate::rules::cadence::MAX_CADENCE_DAYS;
use serde::{Deserialize, Serialize};

/// Target contact frequency for a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
}

impl Cadence {
    pub fn days(&self) -> i32 {
        match self {
            Cadence::Weekly => 7,
            Cadence::Biweekly => 14,
            Cadence::Monthly => 30,
            Cadence::Quarterly => 90,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Weekly => "weekly",
            Cadence::Biweekly => "biweekly",
            Cadence::Monthly => "monthly",
            Cadence::Quarterly => "quarterly",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "weekly" => Ok(Cadence::Weekly),
            "biweekly" => Ok(Cadence::Biweekly),
            "monthly" => Ok(Cadence::Monthly),
            "quarterly" => Ok(Cadence::Quarterly),
            _ => Err(CoreError::InvalidCadence(raw.to_string())),
        }
    }
}

/// Relative importance classification. Does not change the status label,
/// only the scoring weight downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    A,
    B,
    C,
}

impl Tier {
    pub fn score_boost(&self) -> i32 {
        match self {
            Tier::A => 10,
            Tier::B => 5,
            Tier::C => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::A => "a",
            Tier::B => "b",
            Tier::C => "c",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "a" => Ok(Tier::A),
            "b" => Ok(Tier::B),
            "c" => Ok(Tier::C),
            _ => Err(CoreError::InvalidTier(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub user_id: UserId,
    pub display_name: String,
    pub email: Option<String>,
    pub cadence: Cadence,
    pub cadence_days: i32,
    pub tier: Tier,
    pub last_interaction_at: Option<i64>,
    pub next_touch_due_at: Option<i64>,
    pub overdue_actions_count: i32,
    pub reply_rate: Option<f64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub archived_at: Option<i64>,
}

impl Relationship {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.display_name.trim().is_empty() {
            return Err(CoreError::EmptyDisplayName);
        }

        if self.cadence_days <= 0 || self.cadence_days > MAX_CADENCE_DAYS {
            return Err(CoreError::InvalidCadenceDays(self.cadence_days));
        }

        if let Some(rate) = self.reply_rate {
            if !(0.0..=1.0).contains(&rate) || rate.is_nan() {
                return Err(CoreError::InvalidReplyRate(rate));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Cadence, Relationship, Tier};
    use crate::domain::ids::{RelationshipId, UserId};

    fn relationship() -> Relationship {
        Relationship {
            id: RelationshipId::new(),
            user_id: UserId::new(),
            display_name: "Ada Lovelace".to_string(),
            email: None,
            cadence: Cadence::Biweekly,
            cadence_days: 14,
            tier: Tier::B,
            last_interaction_at: None,
            next_touch_due_at: None,
            overdue_actions_count: 0,
            reply_rate: None,
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
            archived_at: None,
        }
    }

    #[test]
    fn validate_accepts_well_formed() {
        assert!(relationship().validate().is_ok());
    }

    #[test]
    fn validate_rejects_nonpositive_cadence() {
        let mut rel = relationship();
        rel.cadence_days = 0;
        assert!(rel.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_reply_rate() {
        let mut rel = relationship();
        rel.reply_rate = Some(1.5);
        assert!(rel.validate().is_err());
    }

    #[test]
    fn cadence_parse_round_trips() {
        for cadence in [
            Cadence::Weekly,
            Cadence::Biweekly,
            Cadence::Monthly,
            Cadence::Quarterly,
        ] {
            assert_eq!(Cadence::parse(cadence.as_str()).unwrap(), cadence);
        }
        assert!(Cadence::parse("fortnightly").is_err());
    }

    #[test]
    fn tier_boosts_are_ordered() {
        assert!(Tier::A.score_boost() > Tier::B.score_boost());
        assert!(Tier::B.score_boost() > Tier::C.score_boost());
    }
}
