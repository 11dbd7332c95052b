use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// One submitted score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub email: String,
    pub score: u32,
    pub total: u32,
    pub elapsed_secs: u64,
    pub test_id: String,
    pub submitted_at: DateTime<Local>,
}

#[derive(Error, Debug)]
pub enum LeaderboardError {
    #[error("leaderboard storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("cannot create leaderboard directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only score sink plus per-test ranking query. The engine only ever
/// talks to this trait; where the scores actually live is deployment detail.
pub trait Leaderboard {
    fn submit(&self, entry: &ScoreEntry) -> Result<(), LeaderboardError>;

    /// All entries for one test, best score first.
    fn entries_for(&self, test_id: &str) -> Result<Vec<ScoreEntry>, LeaderboardError>;
}

/// Local SQLite-backed leaderboard.
#[derive(Debug)]
pub struct SqliteLeaderboard {
    conn: Connection,
}

impl SqliteLeaderboard {
    /// Open (or create) the database at the given path and ensure the schema
    /// exists.
    pub fn open(db_path: &Path) -> Result<Self, LeaderboardError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS scores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL,
                score INTEGER NOT NULL,
                total INTEGER NOT NULL,
                elapsed_secs INTEGER NOT NULL,
                test_id TEXT NOT NULL,
                submitted_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_scores_test_id ON scores(test_id)",
            [],
        )?;

        Ok(Self { conn })
    }

    pub fn default_path() -> PathBuf {
        crate::app_dirs::AppDirs::db_path().unwrap_or_else(|| PathBuf::from("snapquiz_scores.db"))
    }
}

impl Leaderboard for SqliteLeaderboard {
    fn submit(&self, entry: &ScoreEntry) -> Result<(), LeaderboardError> {
        self.conn.execute(
            r#"
            INSERT INTO scores (email, score, total, elapsed_secs, test_id, submitted_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                entry.email,
                entry.score,
                entry.total,
                entry.elapsed_secs as i64,
                entry.test_id,
                entry.submitted_at.to_rfc3339(),
            ],
        )?;
        info!(test_id = %entry.test_id, score = entry.score, "score submitted");
        Ok(())
    }

    fn entries_for(&self, test_id: &str) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT email, score, total, elapsed_secs, test_id, submitted_at
            FROM scores
            WHERE test_id = ?1
            ORDER BY score DESC, submitted_at ASC
            "#,
        )?;

        let entry_iter = stmt.query_map([test_id], |row| {
            let submitted_str: String = row.get(5)?;
            let submitted_at = DateTime::parse_from_rfc3339(&submitted_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        5,
                        "submitted_at".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(ScoreEntry {
                email: row.get(0)?,
                score: row.get(1)?,
                total: row.get(2)?,
                elapsed_secs: row.get::<_, i64>(3)? as u64,
                test_id: row.get(4)?,
                submitted_at,
            })
        })?;

        let mut entries = Vec::new();
        for entry in entry_iter {
            entries.push(entry?);
        }

        Ok(entries)
    }
}
