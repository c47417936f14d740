use crate::budget::BatchBudget;
use crate::error::Result;
use crate::flood::FloodGuard;
use crate::report::RunReport;
use chrono::FixedOffset;
use rapport_config::EngineConfig;
use rapport_core::domain::{ActionType, Relationship};
use rapport_core::rules::SECONDS_PER_DAY;
use rapport_store::repo::ActionNew;
use rapport_store::Store;
use tracing::{debug, info, warn};

/// Re-engages relationships that have gone cold: one NURTURE action per
/// stale relationship, most responsive leads first, hard-capped per user
/// per local day.
pub struct NurtureGenerator;

impl NurtureGenerator {
    pub fn run(
        store: &Store,
        config: &EngineConfig,
        now_utc: i64,
        local_offset: FixedOffset,
        budget: BatchBudget,
    ) -> Result<RunReport> {
        let guard = FloodGuard::new(store);
        let mut report = RunReport::default();

        let activity_cutoff = now_utc - config.user_activity_days * SECONDS_PER_DAY;
        let stale_cutoff = now_utc - config.stale_days * SECONDS_PER_DAY;

        // A failed read here aborts the batch with zero progress; the
        // caller can tell that apart from "no eligible users".
        let users = store.users().list_active_since(activity_cutoff)?;
        info!(users = users.len(), "nurture batch starting");

        'users: for user in users {
            // Users tracking nothing are not candidates at all.
            if store.relationships().count_active_for_user(user.id)? == 0 {
                continue;
            }

            let candidates = store.relationships().list_stale(now_utc, user.id, stale_cutoff)?;
            for relationship in candidates {
                if budget.expired() {
                    warn!(created = report.created, "nurture batch stopped on budget expiry");
                    break 'users;
                }

                if let Err(err) = relationship.validate() {
                    warn!(relationship = %relationship.id, error = %err, "skipping malformed relationship");
                    report.skipped += 1;
                    continue;
                }

                // The cap and dedup checks go back to the store right
                // before each write so concurrent runs top up to the cap
                // instead of stacking on top of it.
                let created_today = match guard.created_today(
                    user.id,
                    ActionType::Nurture,
                    now_utc,
                    local_offset,
                ) {
                    Ok(count) => count,
                    Err(err) => {
                        warn!(user = %user.id, error = %err, "flood count read failed");
                        report.failed += 1;
                        continue;
                    }
                };
                if created_today >= config.daily_nurture_cap {
                    debug!(user = %user.id, "daily nurture cap reached");
                    continue 'users;
                }

                match guard.has_open_for_relationship(relationship.id, ActionType::Nurture) {
                    Ok(true) => {
                        report.skipped += 1;
                        continue;
                    }
                    Ok(false) => {}
                    Err(err) => {
                        warn!(relationship = %relationship.id, error = %err, "dedup read failed");
                        report.failed += 1;
                        continue;
                    }
                }

                match store.actions().create(now_utc, nurture_action(&relationship)) {
                    Ok(_) => report.created += 1,
                    Err(err) => {
                        warn!(relationship = %relationship.id, error = %err, "nurture creation failed");
                        report.failed += 1;
                    }
                }
            }
        }

        info!(
            created = report.created,
            failed = report.failed,
            skipped = report.skipped,
            "nurture batch finished"
        );
        Ok(report)
    }
}

fn nurture_action(relationship: &Relationship) -> ActionNew {
    ActionNew {
        lead_id: Some(relationship.id),
        user_id: relationship.user_id,
        action_type: ActionType::Nurture,
        title: format!("Reconnect with {}", relationship.display_name),
        source_call_id: None,
        promised_due_at: None,
        estimated_minutes: Some(10),
    }
}
