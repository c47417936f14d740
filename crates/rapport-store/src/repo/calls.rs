use crate::error::{Result, StoreError};
use rapport_core::domain::{normalize_email, CallEvent, CallId, UserId};
use rapport_core::time::TimeWindow;
use rusqlite::{params, Connection};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct CallNew {
    pub user_id: UserId,
    pub attendee_email: Option<String>,
    pub started_at: i64,
    pub ended_at: i64,
}

pub struct CallsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> CallsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, now_utc: i64, input: CallNew) -> Result<CallEvent> {
        let call = CallEvent {
            id: CallId::new(),
            user_id: input.user_id,
            attendee_email: input.attendee_email.as_deref().and_then(normalize_email),
            started_at: input.started_at,
            ended_at: input.ended_at,
            created_at: now_utc,
        };

        self.conn.execute(
            "INSERT INTO calls (id, user_id, attendee_email, started_at, ended_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                call.id.to_string(),
                call.user_id.to_string(),
                call.attendee_email,
                call.started_at,
                call.ended_at,
                call.created_at,
            ],
        )?;

        Ok(call)
    }

    /// Calls whose end falls inside the half-open window, oldest first.
    pub fn list_ended_in(&self, window: TimeWindow) -> Result<Vec<CallEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, attendee_email, started_at, ended_at, created_at
             FROM calls
             WHERE ended_at >= ?1 AND ended_at < ?2
             ORDER BY ended_at ASC, id ASC;",
        )?;
        let mut rows = stmt.query(params![window.start, window.end])?;
        let mut calls = Vec::new();
        while let Some(row) = rows.next()? {
            calls.push(call_from_row(row)?);
        }
        Ok(calls)
    }
}

fn call_from_row(row: &rusqlite::Row<'_>) -> Result<CallEvent> {
    let id_str: String = row.get(0)?;
    let id = CallId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str))?;
    let user_id_str: String = row.get(1)?;
    let user_id = UserId::from_str(&user_id_str).map_err(|_| StoreError::InvalidId(user_id_str))?;
    Ok(CallEvent {
        id,
        user_id,
        attendee_email: row.get(2)?,
        started_at: row.get(3)?,
        ended_at: row.get(4)?,
        created_at: row.get(5)?,
    })
}
