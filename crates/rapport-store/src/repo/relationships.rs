use crate::error::{Result, StoreError};
use rapport_core::domain::{normalize_email, Cadence, Relationship, RelationshipId, Tier, UserId};
use rapport_core::rules::schedule_next;
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct RelationshipNew {
    pub user_id: UserId,
    pub display_name: String,
    pub email: Option<String>,
    pub cadence: Cadence,
    pub tier: Tier,
    pub last_interaction_at: Option<i64>,
    pub next_touch_due_at: Option<i64>,
    pub reply_rate: Option<f64>,
}

const SELECT_COLUMNS: &str = "r.id, r.user_id, r.display_name, r.email, r.cadence, r.cadence_days,
        r.tier, r.last_interaction_at, r.next_touch_due_at, r.reply_rate,
        r.created_at, r.updated_at, r.archived_at,
        (SELECT COUNT(*) FROM actions a
          WHERE a.lead_id = r.id
            AND a.state NOT IN ('done', 'replied', 'archived')
            AND a.promised_due_at IS NOT NULL
            AND a.promised_due_at < ?1)";

pub struct RelationshipsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> RelationshipsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, now_utc: i64, input: RelationshipNew) -> Result<Relationship> {
        let relationship = Relationship {
            id: RelationshipId::new(),
            user_id: input.user_id,
            display_name: input.display_name,
            email: input.email.as_deref().and_then(normalize_email),
            cadence: input.cadence,
            cadence_days: input.cadence.days(),
            tier: input.tier,
            last_interaction_at: input.last_interaction_at,
            next_touch_due_at: input.next_touch_due_at,
            overdue_actions_count: 0,
            reply_rate: input.reply_rate,
            created_at: now_utc,
            updated_at: now_utc,
            archived_at: None,
        };
        relationship.validate()?;

        self.conn.execute(
            "INSERT INTO relationships
                (id, user_id, display_name, email, cadence, cadence_days, tier,
                 last_interaction_at, next_touch_due_at, reply_rate,
                 created_at, updated_at, archived_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13);",
            params![
                relationship.id.to_string(),
                relationship.user_id.to_string(),
                relationship.display_name,
                relationship.email,
                relationship.cadence.as_str(),
                relationship.cadence_days,
                relationship.tier.as_str(),
                relationship.last_interaction_at,
                relationship.next_touch_due_at,
                relationship.reply_rate,
                relationship.created_at,
                relationship.updated_at,
                relationship.archived_at,
            ],
        )?;

        Ok(relationship)
    }

    pub fn get(&self, now_utc: i64, id: RelationshipId) -> Result<Option<Relationship>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM relationships r WHERE r.id = ?2;"
        ))?;
        let mut rows = stmt.query(params![now_utc, id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(relationship_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// Logs a touch: stamps `last_interaction_at` and reschedules the
    /// next deadline one cadence interval out.
    pub fn record_interaction(&self, now_utc: i64, id: RelationshipId) -> Result<Relationship> {
        let cadence_days: Option<i32> = self
            .conn
            .query_row(
                "SELECT cadence_days FROM relationships WHERE id = ?1;",
                [id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        let cadence_days = match cadence_days {
            Some(value) => value,
            None => return Err(StoreError::NotFound(id.to_string())),
        };

        let next = schedule_next(now_utc, cadence_days)?;
        self.conn.execute(
            "UPDATE relationships
             SET last_interaction_at = ?2, next_touch_due_at = ?3, updated_at = ?2
             WHERE id = ?1;",
            params![id.to_string(), now_utc, next],
        )?;

        self.get(now_utc, id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn update_reply_rate(
        &self,
        now_utc: i64,
        id: RelationshipId,
        reply_rate: Option<f64>,
    ) -> Result<()> {
        if let Some(rate) = reply_rate {
            if rate.is_nan() || !(0.0..=1.0).contains(&rate) {
                return Err(rapport_core::CoreError::InvalidReplyRate(rate).into());
            }
        }
        let updated = self.conn.execute(
            "UPDATE relationships SET reply_rate = ?2, updated_at = ?3 WHERE id = ?1;",
            params![id.to_string(), reply_rate, now_utc],
        )?;
        if updated != 1 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    pub fn archive(&self, now_utc: i64, id: RelationshipId) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE relationships SET archived_at = ?2, updated_at = ?2 WHERE id = ?1;",
            params![id.to_string(), now_utc],
        )?;
        if updated != 1 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    pub fn list_for_user(&self, now_utc: i64, user_id: UserId) -> Result<Vec<Relationship>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM relationships r
             WHERE r.user_id = ?2 AND r.archived_at IS NULL
             ORDER BY r.display_name COLLATE NOCASE ASC;"
        ))?;
        let mut rows = stmt.query(params![now_utc, user_id.to_string()])?;
        collect_rows(&mut rows)
    }

    pub fn count_active_for_user(&self, user_id: UserId) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM relationships WHERE user_id = ?1 AND archived_at IS NULL;",
            [user_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Nurture candidates: active relationships silent since `cutoff`
    /// (never-contacted ones qualify too). Ordered by engagement score
    /// descending, then longest-silent first, so a capped batch spends
    /// its budget on the most responsive leads.
    pub fn list_stale(
        &self,
        now_utc: i64,
        user_id: UserId,
        cutoff: i64,
    ) -> Result<Vec<Relationship>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM relationships r
             WHERE r.user_id = ?2
               AND r.archived_at IS NULL
               AND (r.last_interaction_at IS NULL OR r.last_interaction_at <= ?3)
             ORDER BY r.reply_rate DESC,
                      r.last_interaction_at ASC,
                      r.id ASC;"
        ))?;
        let mut rows = stmt.query(params![now_utc, user_id.to_string(), cutoff])?;
        collect_rows(&mut rows)
    }

    pub fn find_by_email(
        &self,
        now_utc: i64,
        user_id: UserId,
        email: &str,
    ) -> Result<Option<Relationship>> {
        let normalized = match normalize_email(email) {
            Some(value) => value,
            None => return Ok(None),
        };
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM relationships r
             WHERE r.user_id = ?2 AND r.email = ?3 AND r.archived_at IS NULL
             ORDER BY r.updated_at DESC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query(params![now_utc, user_id.to_string(), normalized])?;
        if let Some(row) = rows.next()? {
            Ok(Some(relationship_from_row(row)?))
        } else {
            Ok(None)
        }
    }
}

fn collect_rows(rows: &mut rusqlite::Rows<'_>) -> Result<Vec<Relationship>> {
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(relationship_from_row(row)?);
    }
    Ok(items)
}

fn relationship_from_row(row: &rusqlite::Row<'_>) -> Result<Relationship> {
    let id_str: String = row.get(0)?;
    let id = RelationshipId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str))?;
    let user_id_str: String = row.get(1)?;
    let user_id = UserId::from_str(&user_id_str).map_err(|_| StoreError::InvalidId(user_id_str))?;
    let cadence_raw: String = row.get(4)?;
    let cadence = Cadence::parse(&cadence_raw)?;
    let tier_raw: String = row.get(6)?;
    let tier = Tier::parse(&tier_raw)?;

    Ok(Relationship {
        id,
        user_id,
        display_name: row.get(2)?,
        email: row.get(3)?,
        cadence,
        cadence_days: row.get(5)?,
        tier,
        last_interaction_at: row.get(7)?,
        next_touch_due_at: row.get(8)?,
        reply_rate: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
        archived_at: row.get(12)?,
        overdue_actions_count: row.get(13)?,
    })
}
