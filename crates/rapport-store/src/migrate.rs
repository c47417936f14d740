use crate::error::{Result, StoreError};
use rusqlite::{Connection, OptionalExtension, Transaction};

const INIT_SQL: &str = "
CREATE TABLE users (
    id TEXT PRIMARY KEY,
    display_name TEXT NOT NULL,
    last_active_at INTEGER,
    created_at INTEGER NOT NULL
);

CREATE TABLE relationships (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id),
    display_name TEXT NOT NULL,
    email TEXT,
    cadence TEXT NOT NULL,
    cadence_days INTEGER NOT NULL,
    tier TEXT NOT NULL,
    last_interaction_at INTEGER,
    next_touch_due_at INTEGER,
    reply_rate REAL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    archived_at INTEGER
);

CREATE INDEX idx_relationships_user ON relationships(user_id);
CREATE INDEX idx_relationships_last_interaction ON relationships(last_interaction_at);
CREATE INDEX idx_relationships_email ON relationships(email);

CREATE TABLE actions (
    id TEXT PRIMARY KEY,
    lead_id TEXT REFERENCES relationships(id),
    user_id TEXT NOT NULL REFERENCES users(id),
    action_type TEXT NOT NULL,
    state TEXT NOT NULL,
    title TEXT NOT NULL,
    source_call_id TEXT,
    promised_due_at INTEGER,
    estimated_minutes INTEGER,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX idx_actions_user_type_created ON actions(user_id, action_type, created_at);
CREATE INDEX idx_actions_lead_type ON actions(lead_id, action_type);
CREATE INDEX idx_actions_call ON actions(source_call_id);

CREATE TABLE calls (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id),
    attendee_email TEXT,
    started_at INTEGER NOT NULL,
    ended_at INTEGER NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE INDEX idx_calls_ended ON calls(ended_at);
";

const MIGRATIONS: &[(&str, &str)] = &[("001_init", INIT_SQL)];

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    ensure_schema_table(&tx)?;
    let current = current_version(&tx)?;

    if current > MIGRATIONS.len() as i64 {
        return Err(StoreError::Migration(format!(
            "db version {} newer than available migrations {}",
            current,
            MIGRATIONS.len()
        )));
    }

    for (index, (_name, sql)) in MIGRATIONS.iter().enumerate() {
        let version = (index + 1) as i64;
        if current >= version {
            continue;
        }
        tx.execute_batch(sql)?;
        set_version(&tx, version)?;
    }

    tx.commit()?;
    Ok(())
}

pub fn schema_version(conn: &Connection) -> Result<i64> {
    let version: Option<i64> = conn
        .query_row("SELECT version FROM rapport_schema LIMIT 1;", [], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(version.unwrap_or(0))
}

fn ensure_schema_table(tx: &Transaction<'_>) -> Result<()> {
    tx.execute_batch("CREATE TABLE IF NOT EXISTS rapport_schema (version INTEGER NOT NULL);")?;

    let existing: Option<i64> = tx
        .query_row("SELECT version FROM rapport_schema LIMIT 1;", [], |row| {
            row.get(0)
        })
        .optional()?;

    if existing.is_none() {
        tx.execute("INSERT INTO rapport_schema (version) VALUES (0);", [])?;
    }

    Ok(())
}

fn current_version(tx: &Transaction<'_>) -> Result<i64> {
    let version: i64 = tx.query_row("SELECT version FROM rapport_schema LIMIT 1;", [], |row| {
        row.get(0)
    })?;
    Ok(version)
}

fn set_version(tx: &Transaction<'_>, version: i64) -> Result<()> {
    let updated = tx.execute("UPDATE rapport_schema SET version = ?1;", [version])?;
    if updated != 1 {
        return Err(StoreError::Migration(format!(
            "expected single schema row, updated {}",
            updated
        )));
    }
    Ok(())
}
