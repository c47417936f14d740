use crate::budget::BatchBudget;
use crate::error::Result;
use crate::flood::FloodGuard;
use crate::report::RunReport;
use chrono::FixedOffset;
use rapport_config::EngineConfig;
use rapport_core::domain::{ActionType, CallEvent, Relationship};
use rapport_core::rules::post_call_due_at;
use rapport_core::time::TimeWindow;
use rapport_store::repo::ActionNew;
use rapport_store::Store;
use tracing::{info, warn};

/// Turns recently-ended calls into follow-up actions. A call is eligible
/// exactly once, while its end time sits in the sliding window; the
/// per-call dedup makes overlapping cron triggers harmless.
pub struct PostCallGenerator;

impl PostCallGenerator {
    pub fn run(
        store: &Store,
        config: &EngineConfig,
        now_utc: i64,
        local_offset: FixedOffset,
        budget: BatchBudget,
    ) -> Result<RunReport> {
        let guard = FloodGuard::new(store);
        let mut report = RunReport::default();

        let window = TimeWindow::ending_between(
            now_utc,
            config.post_call_window_min_hours * 3_600,
            config.post_call_window_max_hours * 3_600,
        );
        let calls = store.calls().list_ended_in(window)?;
        info!(calls = calls.len(), "post-call batch starting");

        for call in calls {
            if budget.expired() {
                warn!(created = report.created, "post-call batch stopped on budget expiry");
                break;
            }

            // No attendee to match against: not an error, just not ours.
            let attendee = match call.attendee_email.as_deref() {
                Some(email) => email,
                None => {
                    report.skipped += 1;
                    continue;
                }
            };

            let relationship =
                match store
                    .relationships()
                    .find_by_email(now_utc, call.user_id, attendee)
                {
                    Ok(Some(relationship)) => relationship,
                    Ok(None) => {
                        report.skipped += 1;
                        continue;
                    }
                    Err(err) => {
                        warn!(call = %call.id, error = %err, "relationship match read failed");
                        report.failed += 1;
                        continue;
                    }
                };

            match guard.has_open_for_call(call.id, ActionType::PostCall) {
                Ok(true) => {
                    report.skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(err) => {
                    warn!(call = %call.id, error = %err, "dedup read failed");
                    report.failed += 1;
                    continue;
                }
            }

            let promised_due_at =
                match post_call_due_at(now_utc, local_offset, config.post_call_cutoff_hour) {
                    Ok(due) => due,
                    Err(err) => {
                        warn!(call = %call.id, error = %err, "due date computation failed");
                        report.failed += 1;
                        continue;
                    }
                };

            match store
                .actions()
                .create(now_utc, follow_up_action(&call, &relationship, promised_due_at))
            {
                Ok(_) => report.created += 1,
                Err(err) => {
                    warn!(call = %call.id, error = %err, "post-call creation failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            created = report.created,
            failed = report.failed,
            skipped = report.skipped,
            "post-call batch finished"
        );
        Ok(report)
    }
}

fn follow_up_action(
    call: &CallEvent,
    relationship: &Relationship,
    promised_due_at: i64,
) -> ActionNew {
    ActionNew {
        lead_id: Some(relationship.id),
        user_id: call.user_id,
        action_type: ActionType::PostCall,
        title: format!("Send recap to {}", relationship.display_name),
        source_call_id: Some(call.id),
        promised_due_at: Some(promised_due_at),
        estimated_minutes: Some(15),
    }
}
