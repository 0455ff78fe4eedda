use gif_hazard_common::verdict::Verdict;
use rusqlite::{params, Connection, Result as SqlResult};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// SQLite store for evaluation verdicts.
///
/// One row per evaluated candidate. Nothing is deduplicated: scanning the
/// same directory twice records each file twice.
pub struct VerdictDb {
    conn: Mutex<Connection>,
}

impl VerdictDb {
    /// Open (or create) the database file, creating its parent directory.
    pub fn open(path: &Path) -> SqlResult<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|_e| rusqlite::Error::InvalidPath(dir.into()))?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        let db = Self::init(conn)?;

        info!(path = path.display().to_string(), "SQLite verdict database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> SqlResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> SqlResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS verdicts (
                id                 INTEGER PRIMARY KEY AUTOINCREMENT,
                source             TEXT    NOT NULL,
                category           TEXT    NOT NULL
                    CHECK(category IN ('safe','risky','dangerous','extreme')),
                danger_level       REAL    NOT NULL,
                danger_score_total INTEGER NOT NULL,
                frame_count        INTEGER NOT NULL,
                diff_frame_count   INTEGER NOT NULL,
                total_duration_ms  INTEGER NOT NULL,
                evaluated_at       INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_verdicts_category
                ON verdicts(category);",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert a verdict for `source`. Returns the new row id.
    pub fn insert(&self, source: &str, verdict: &Verdict) -> SqlResult<i64> {
        let now = chrono::Utc::now().timestamp_millis();
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        conn.execute(
            "INSERT INTO verdicts
             (source, category, danger_level, danger_score_total, frame_count,
              diff_frame_count, total_duration_ms, evaluated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                source,
                verdict.category.as_str(),
                verdict.danger_level,
                verdict.danger_score_total as i64,
                verdict.frame_count as i64,
                verdict.diff_frame_count as i64,
                verdict.total_duration_ms as i64,
                now
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, source, category = verdict.category.as_str(), "inserted verdict");
        Ok(id)
    }

    /// Number of stored verdicts per category, most severe first.
    pub fn category_counts(&self) -> SqlResult<Vec<(String, i64)>> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stmt = conn.prepare(
            "SELECT category, COUNT(*) FROM verdicts
             GROUP BY category
             ORDER BY CASE category
                 WHEN 'extreme' THEN 0
                 WHEN 'dangerous' THEN 1
                 WHEN 'risky' THEN 2
                 ELSE 3
             END",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        rows.collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_count() {
        let db = VerdictDb::open_in_memory().unwrap();
        let dangerous = Verdict::from_totals(4, 2, 3, 300);
        let safe = Verdict::from_totals(0, 0, 1, 0);

        let first = db.insert("images_bs/a.gif", &dangerous).unwrap();
        let second = db.insert("images_bs/b.gif", &safe).unwrap();
        db.insert("images_bs/c.gif", &safe).unwrap();
        assert!(second > first);

        let counts = db.category_counts().unwrap();
        assert_eq!(
            counts,
            vec![("dangerous".to_string(), 1), ("safe".to_string(), 2)]
        );
    }

    #[test]
    fn open_creates_parent_dir() {
        let dir = std::env::temp_dir().join(format!("gif_hazard_db_{}", std::process::id()));
        let path = dir.join("nested").join("verdicts.db");
        let db = VerdictDb::open(&path).unwrap();
        db.insert("x.gif", &Verdict::from_totals(3, 3, 4, 400)).unwrap();
        assert!(path.exists());
        drop(db);
        std::fs::remove_dir_all(&dir).ok();
    }
}
