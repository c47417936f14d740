use crate::error::{Result, StoreError};
use rapport_core::domain::{
    Action, ActionId, ActionState, ActionType, CallId, RelationshipId, UserId,
};
use rapport_core::rules::check_transition;
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ActionNew {
    pub lead_id: Option<RelationshipId>,
    pub user_id: UserId,
    pub action_type: ActionType,
    pub title: String,
    pub source_call_id: Option<CallId>,
    pub promised_due_at: Option<i64>,
    pub estimated_minutes: Option<i32>,
}

const SELECT_COLUMNS: &str = "id, lead_id, user_id, action_type, state, title, source_call_id,
        promised_due_at, estimated_minutes, created_at, updated_at";

pub struct ActionsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> ActionsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, now_utc: i64, input: ActionNew) -> Result<Action> {
        let action = Action {
            id: ActionId::new(),
            lead_id: input.lead_id,
            user_id: input.user_id,
            action_type: input.action_type,
            state: ActionState::New,
            title: input.title,
            source_call_id: input.source_call_id,
            promised_due_at: input.promised_due_at,
            estimated_minutes: input.estimated_minutes,
            created_at: now_utc,
            updated_at: now_utc,
        };
        action.validate()?;

        self.conn.execute(
            "INSERT INTO actions
                (id, lead_id, user_id, action_type, state, title, source_call_id,
                 promised_due_at, estimated_minutes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                action.id.to_string(),
                action.lead_id.map(|id| id.to_string()),
                action.user_id.to_string(),
                action.action_type.as_str(),
                action.state.as_str(),
                action.title,
                action.source_call_id.map(|id| id.to_string()),
                action.promised_due_at,
                action.estimated_minutes,
                action.created_at,
                action.updated_at,
            ],
        )?;

        Ok(action)
    }

    pub fn get(&self, id: ActionId) -> Result<Option<Action>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {SELECT_COLUMNS} FROM actions WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(action_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn list_for_user(&self, user_id: UserId) -> Result<Vec<Action>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM actions
             WHERE user_id = ?1
             ORDER BY created_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(action_from_row(row)?);
        }
        Ok(items)
    }

    /// Applies a state transition after checking it against the state
    /// machine. The current state is read inside the same transaction as
    /// the write.
    pub fn transition(&self, now_utc: i64, id: ActionId, to: ActionState) -> Result<Action> {
        let tx = self.conn.unchecked_transaction()?;

        let state_raw: Option<String> = tx
            .query_row(
                "SELECT state FROM actions WHERE id = ?1;",
                [id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        let from = match state_raw {
            Some(raw) => ActionState::parse(&raw)?,
            None => return Err(StoreError::NotFound(id.to_string())),
        };

        check_transition(from, to)?;

        tx.execute(
            "UPDATE actions SET state = ?2, updated_at = ?3 WHERE id = ?1;",
            params![id.to_string(), to.as_str(), now_utc],
        )?;
        tx.commit()?;

        self.get(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// How many actions of this type were created for the user inside the
    /// local day `[start, end)`. Counts rows from prior runs too, which is
    /// what makes the daily cap a hard ceiling rather than per-invocation.
    pub fn count_created_today(
        &self,
        user_id: UserId,
        action_type: ActionType,
        day_start: i64,
        day_end: i64,
    ) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM actions
             WHERE user_id = ?1 AND action_type = ?2
               AND created_at >= ?3 AND created_at < ?4;",
            params![user_id.to_string(), action_type.as_str(), day_start, day_end],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn exists_open_for_relationship(
        &self,
        lead_id: RelationshipId,
        action_type: ActionType,
    ) -> Result<bool> {
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM actions
                 WHERE lead_id = ?1 AND action_type = ?2
                   AND state NOT IN ('done', 'replied', 'archived')
                 LIMIT 1;",
                params![lead_id.to_string(), action_type.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(exists.is_some())
    }

    pub fn exists_open_for_call(&self, call_id: CallId, action_type: ActionType) -> Result<bool> {
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM actions
                 WHERE source_call_id = ?1 AND action_type = ?2
                   AND state NOT IN ('done', 'replied', 'archived')
                 LIMIT 1;",
                params![call_id.to_string(), action_type.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(exists.is_some())
    }
}

fn action_from_row(row: &rusqlite::Row<'_>) -> Result<Action> {
    let id_str: String = row.get(0)?;
    let id = ActionId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str))?;
    let lead_raw: Option<String> = row.get(1)?;
    let lead_id = match lead_raw {
        Some(raw) => {
            Some(RelationshipId::from_str(&raw).map_err(|_| StoreError::InvalidId(raw))?)
        }
        None => None,
    };
    let user_id_str: String = row.get(2)?;
    let user_id = UserId::from_str(&user_id_str).map_err(|_| StoreError::InvalidId(user_id_str))?;
    let type_raw: String = row.get(3)?;
    let action_type = ActionType::parse(&type_raw)?;
    let state_raw: String = row.get(4)?;
    let state = ActionState::parse(&state_raw)?;
    let call_raw: Option<String> = row.get(6)?;
    let source_call_id = match call_raw {
        Some(raw) => Some(CallId::from_str(&raw).map_err(|_| StoreError::InvalidId(raw))?),
        None => None,
    };

    Ok(Action {
        id,
        lead_id,
        user_id,
        action_type,
        state,
        title: row.get(5)?,
        source_call_id,
        promised_due_at: row.get(7)?,
        estimated_minutes: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}
