use crate::error::Result;
use chrono::FixedOffset;
use rapport_core::domain::{ActionType, CallId, RelationshipId, UserId};
use rapport_core::time::day_bounds;
use rapport_store::Store;

/// Shared anti-flood and dedup policy consulted by every generator.
/// Every check goes to the store at call time; nothing is cached across
/// a batch, so overlapping or repeated invocations stay correct.
pub struct FloodGuard<'a> {
    store: &'a Store,
}

impl<'a> FloodGuard<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Actions of this type already created for the user during the
    /// current local calendar day, including rows from earlier runs.
    pub fn created_today(
        &self,
        user_id: UserId,
        action_type: ActionType,
        now_utc: i64,
        local_offset: FixedOffset,
    ) -> Result<i64> {
        let (day_start, day_end) = day_bounds(now_utc, local_offset);
        Ok(self
            .store
            .actions()
            .count_created_today(user_id, action_type, day_start, day_end)?)
    }

    pub fn has_open_for_relationship(
        &self,
        lead_id: RelationshipId,
        action_type: ActionType,
    ) -> Result<bool> {
        Ok(self
            .store
            .actions()
            .exists_open_for_relationship(lead_id, action_type)?)
    }

    pub fn has_open_for_call(&self, call_id: CallId, action_type: ActionType) -> Result<bool> {
        Ok(self
            .store
            .actions()
            .exists_open_for_call(call_id, action_type)?)
    }
}
