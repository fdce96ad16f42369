// SQLite persistence layer for draft state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::draft::state::{DraftState, Selection};
use crate::draft::trade::Trade;

/// Key under which the whole `DraftState` aggregate is stored.
pub const DRAFT_STATE_KEY: &str = "draft_state";

/// One row of the selections ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRecord {
    pub overall: u32,
    pub round: u32,
    pub pick_in_round: u32,
    pub team_id: String,
    pub prospect_id: u32,
    pub prospect_name: String,
    pub position: String,
}

/// SQLite-backed persistence for the draft aggregate plus append-only
/// selection and trade ledgers.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS draft_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS draft_selections (
                overall       INTEGER NOT NULL,
                round         INTEGER NOT NULL,
                pick_in_round INTEGER NOT NULL,
                team_id       TEXT NOT NULL,
                prospect_id   INTEGER NOT NULL,
                prospect_name TEXT NOT NULL,
                position      TEXT NOT NULL,
                draft_id      TEXT NOT NULL,
                timestamp     TEXT NOT NULL,
                PRIMARY KEY (overall, draft_id)
            );

            CREATE TABLE IF NOT EXISTS draft_trades (
                trade_id    TEXT NOT NULL,
                draft_id    TEXT NOT NULL,
                team_a      TEXT NOT NULL,
                team_b      TEXT NOT NULL,
                pick_number INTEGER NOT NULL,
                payload     TEXT NOT NULL,
                timestamp   TEXT NOT NULL,
                PRIMARY KEY (trade_id, draft_id)
            );

            CREATE INDEX IF NOT EXISTS idx_draft_selections_draft_id ON draft_selections(draft_id);
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection. A poisoned lock is recovered; the
    /// connection itself holds no invariant a panicking holder could break.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------
    // Key-value state
    // ------------------------------------------------------------------

    /// Persist an arbitrary JSON value under `key`. Repeated saves overwrite.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str = serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO draft_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM draft_state WHERE key = ?1")
            .context("failed to prepare load_state query")?;

        let mut rows = stmt
            .query_map(params![key], |row| row.get::<_, String>(0))
            .context("failed to query draft state")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read state row")?;
                let value: serde_json::Value =
                    serde_json::from_str(&json_str).context("failed to deserialize state value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Store the whole draft aggregate.
    pub fn save_draft(&self, draft: &DraftState) -> Result<()> {
        let value = serde_json::to_value(draft).context("failed to serialize draft state")?;
        self.save_state(DRAFT_STATE_KEY, &value)
    }

    /// Rehydrate the draft aggregate, if one has been saved.
    pub fn load_draft(&self) -> Result<Option<DraftState>> {
        match self.load_state(DRAFT_STATE_KEY)? {
            Some(value) => {
                let draft = serde_json::from_value(value).context("stored draft state is malformed")?;
                Ok(Some(draft))
            }
            None => Ok(None),
        }
    }

    // ------------------------------------------------------------------
    // Ledgers
    // ------------------------------------------------------------------

    /// Append a selection to the ledger. Re-recording the same overall pick
    /// for the same draft is a no-op.
    pub fn record_selection(&self, selection: &Selection, draft_id: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT OR IGNORE INTO draft_selections
                (overall, round, pick_in_round, team_id, prospect_id, prospect_name, position, draft_id, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                selection.pick.overall,
                selection.pick.round,
                selection.pick.pick_in_round,
                selection.team_id,
                selection.prospect.id,
                selection.prospect.name,
                selection.prospect.position.display_str(),
                draft_id,
                selection.timestamp.to_rfc3339(),
            ],
        )
        .context("failed to record selection")?;
        Ok(())
    }

    /// Ledger rows for one draft, in pick order.
    pub fn load_selections(&self, draft_id: &str) -> Result<Vec<SelectionRecord>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT overall, round, pick_in_round, team_id, prospect_id, prospect_name, position
                 FROM draft_selections WHERE draft_id = ?1 ORDER BY overall",
            )
            .context("failed to prepare load_selections query")?;

        let rows = stmt
            .query_map(params![draft_id], |row| {
                Ok(SelectionRecord {
                    overall: row.get(0)?,
                    round: row.get(1)?,
                    pick_in_round: row.get(2)?,
                    team_id: row.get(3)?,
                    prospect_id: row.get(4)?,
                    prospect_name: row.get(5)?,
                    position: row.get(6)?,
                })
            })
            .context("failed to query selections")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map selection rows")?;

        Ok(rows)
    }

    /// Append a trade to the ledger; the full record is kept as JSON.
    pub fn record_trade(&self, trade: &Trade, draft_id: &str) -> Result<()> {
        let conn = self.conn();
        let payload = serde_json::to_string(trade).context("failed to serialize trade")?;
        conn.execute(
            "INSERT OR IGNORE INTO draft_trades
                (trade_id, draft_id, team_a, team_b, pick_number, payload, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                trade.id,
                draft_id,
                trade.team_a,
                trade.team_b,
                trade.pick_number_at_time,
                payload,
                trade.timestamp.to_rfc3339(),
            ],
        )
        .context("failed to record trade")?;
        Ok(())
    }

    /// Trades recorded for one draft, oldest first.
    pub fn load_trades(&self, draft_id: &str) -> Result<Vec<Trade>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT payload FROM draft_trades WHERE draft_id = ?1 ORDER BY rowid")
            .context("failed to prepare load_trades query")?;

        let payloads = stmt
            .query_map(params![draft_id], |row| row.get::<_, String>(0))
            .context("failed to query trades")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to read trade rows")?;

        payloads
            .iter()
            .map(|p| serde_json::from_str(p).context("stored trade is malformed"))
            .collect()
    }

    /// `true` once the draft has been saved or has any ledger entries.
    pub fn has_draft_in_progress(&self, draft_id: &str) -> Result<bool> {
        let conn = self.conn();
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM draft_state WHERE key = ?1)
                     OR EXISTS(SELECT 1 FROM draft_selections WHERE draft_id = ?2)",
                params![DRAFT_STATE_KEY, draft_id],
                |row| row.get(0),
            )
            .context("failed to check for a draft in progress")?;
        Ok(exists)
    }

    /// Delete every ledger row and all stored state.
    pub fn clear_draft(&self) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute("DELETE FROM draft_selections", [])
            .context("failed to delete selections")?;
        tx.execute("DELETE FROM draft_trades", [])
            .context("failed to delete trades")?;
        tx.execute("DELETE FROM draft_state", [])
            .context("failed to delete draft state")?;
        tx.commit().context("failed to commit clear_draft")?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Draft ID management
    // ------------------------------------------------------------------

    const DRAFT_ID_KEY: &'static str = "current_draft_id";

    pub fn get_draft_id(&self) -> Result<Option<String>> {
        let value = self.load_state(Self::DRAFT_ID_KEY)?;
        Ok(value.and_then(|v| v.as_str().map(|s| s.to_string())))
    }

    pub fn set_draft_id(&self, draft_id: &str) -> Result<()> {
        self.save_state(Self::DRAFT_ID_KEY, &serde_json::Value::String(draft_id.to_string()))
    }

    /// New draft id from the current UTC time, e.g.
    /// `draft_20260415_190233_517`.
    pub fn generate_draft_id() -> String {
        chrono::Utc::now().format("draft_%Y%m%d_%H%M%S_%3f").to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::pick::Pick;
    use crate::draft::prospect::{Position, Prospect};
    use crate::draft::state::DraftSettings;
    use crate::draft::trade::TradePackage;
    use chrono::Utc;

    fn prospect(id: u32, rating: f64) -> Prospect {
        Prospect {
            id,
            name: format!("Prospect {id}"),
            position: Position::WideReceiver,
            true_rating: rating,
            scouted_rating: rating,
            potential: rating + 5.0,
            potential_gap: 5.0,
            round_projection: 1,
        }
    }

    fn selection(overall: u32, team: &str, prospect_id: u32) -> Selection {
        Selection {
            pick: Pick {
                round: 1,
                pick_in_round: overall,
                overall,
                current_owner: team.into(),
                original_owner: team.into(),
                is_compensatory: false,
            },
            prospect: prospect(prospect_id, 80.0),
            team_id: team.into(),
            timestamp: Utc::now(),
        }
    }

    // ------------------------------------------------------------------
    // Key-value state
    // ------------------------------------------------------------------

    #[test]
    fn save_and_load_state() {
        let db = Database::open(":memory:").unwrap();
        assert!(db.load_state("missing").unwrap().is_none());

        db.save_state("k", &serde_json::json!({"a": 1})).unwrap();
        db.save_state("k", &serde_json::json!({"a": 2})).unwrap();
        assert_eq!(db.load_state("k").unwrap(), Some(serde_json::json!({"a": 2})));
    }

    #[test]
    fn draft_aggregate_round_trips() {
        let db = Database::open(":memory:").unwrap();
        assert!(db.load_draft().unwrap().is_none());

        let teams = vec!["NE".to_string(), "KC".to_string()];
        let prospects = (1..=6).map(|i| prospect(i, 90.0 - i as f64 * 0.7)).collect();
        let mut draft = DraftState::initialize(
            prospects,
            teams,
            Some("NE".into()),
            2026,
            DraftSettings::default(),
            vec![],
        );
        draft.start_draft().unwrap();
        draft.make_pick(3, None).unwrap();

        db.save_draft(&draft).unwrap();
        let loaded = db.load_draft().unwrap().unwrap();
        assert_eq!(loaded, draft);
    }

    // ------------------------------------------------------------------
    // Ledgers
    // ------------------------------------------------------------------

    #[test]
    fn selections_are_idempotent_and_scoped_by_draft() {
        let db = Database::open(":memory:").unwrap();
        db.record_selection(&selection(2, "KC", 7), "d1").unwrap();
        db.record_selection(&selection(1, "NE", 4), "d1").unwrap();
        db.record_selection(&selection(1, "NE", 4), "d1").unwrap();
        db.record_selection(&selection(1, "DAL", 9), "d2").unwrap();

        let rows = db.load_selections("d1").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].overall, 1);
        assert_eq!(rows[0].team_id, "NE");
        assert_eq!(rows[0].position, "WR");
        assert_eq!(rows[1].prospect_id, 7);

        assert_eq!(db.load_selections("d2").unwrap().len(), 1);
    }

    #[test]
    fn trades_round_trip() {
        let db = Database::open(":memory:").unwrap();
        let trade = Trade {
            id: "trade_0001".into(),
            timestamp: Utc::now(),
            team_a: "NE".into(),
            team_b: "KC".into(),
            package_a: TradePackage::from_picks(vec![1]),
            package_b: TradePackage::from_picks(vec![2, 5]),
            pick_number_at_time: 1,
        };
        db.record_trade(&trade, "d1").unwrap();
        db.record_trade(&trade, "d1").unwrap();

        let loaded = db.load_trades("d1").unwrap();
        assert_eq!(loaded, vec![trade]);
        assert!(db.load_trades("d2").unwrap().is_empty());
    }

    #[test]
    fn has_draft_in_progress_and_clear() {
        let db = Database::open(":memory:").unwrap();
        assert!(!db.has_draft_in_progress("d1").unwrap());

        db.record_selection(&selection(1, "NE", 4), "d1").unwrap();
        assert!(db.has_draft_in_progress("d1").unwrap());
        assert!(!db.has_draft_in_progress("d2").unwrap());

        db.save_state(DRAFT_STATE_KEY, &serde_json::json!({})).unwrap();
        assert!(db.has_draft_in_progress("d2").unwrap());

        db.clear_draft().unwrap();
        assert!(!db.has_draft_in_progress("d1").unwrap());
        assert!(db.load_selections("d1").unwrap().is_empty());
    }

    // ------------------------------------------------------------------
    // Draft ID management
    // ------------------------------------------------------------------

    #[test]
    fn draft_id_round_trip() {
        let db = Database::open(":memory:").unwrap();
        assert!(db.get_draft_id().unwrap().is_none());
        db.set_draft_id("draft_x").unwrap();
        assert_eq!(db.get_draft_id().unwrap().as_deref(), Some("draft_x"));
    }

    #[test]
    fn generated_draft_id_format() {
        let id = Database::generate_draft_id();
        assert!(id.starts_with("draft_"));
        // draft_YYYYMMDD_HHMMSS_mmm
        assert_eq!(id.len(), "draft_20260101_000000_000".len());
    }
}
