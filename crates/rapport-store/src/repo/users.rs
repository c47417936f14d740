use crate::error::{Result, StoreError};
use rapport_core::domain::{User, UserId};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

pub struct UsersRepo<'a> {
    conn: &'a Connection,
}

impl<'a> UsersRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, now_utc: i64, display_name: &str) -> Result<User> {
        let user = User {
            id: UserId::new(),
            display_name: display_name.to_string(),
            last_active_at: None,
            created_at: now_utc,
        };
        self.conn.execute(
            "INSERT INTO users (id, display_name, last_active_at, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                user.id.to_string(),
                user.display_name,
                user.last_active_at,
                user.created_at,
            ],
        )?;
        Ok(user)
    }

    pub fn get(&self, id: UserId) -> Result<Option<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, display_name, last_active_at, created_at FROM users WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(user_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn record_activity(&self, now_utc: i64, id: UserId) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE users SET last_active_at = ?2 WHERE id = ?1;",
            params![id.to_string(), now_utc],
        )?;
        if updated != 1 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Users whose most recent product activity is at or after `cutoff`.
    /// The generators skip everyone else entirely.
    pub fn list_active_since(&self, cutoff: i64) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, display_name, last_active_at, created_at
             FROM users
             WHERE last_active_at IS NOT NULL AND last_active_at >= ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([cutoff])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(user_from_row(row)?);
        }
        Ok(users)
    }

    pub fn last_active_at(&self, id: UserId) -> Result<Option<i64>> {
        let value: Option<Option<i64>> = self
            .conn
            .query_row(
                "SELECT last_active_at FROM users WHERE id = ?1;",
                [id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        match value {
            Some(last) => Ok(last),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }
}

fn user_from_row(row: &rusqlite::Row<'_>) -> Result<User> {
    let id_str: String = row.get(0)?;
    let id = UserId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str))?;
    Ok(User {
        id,
        display_name: row.get(1)?,
        last_active_at: row.get(2)?,
        created_at: row.get(3)?,
    })
}
