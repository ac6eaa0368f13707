use super::DbConn;
use crate::domain::{ChangeStats, Commit};
use anyhow::Result;
use rusqlite::Row;

/// Fields of a commit before the store assigns its append sequence.
#[derive(Debug)]
pub struct NewCommit<'a> {
    pub id: &'a str,
    pub path: &'a str,
    pub author: &'a str,
    pub message: &'a str,
    pub changes: ChangeStats,
    pub content: &'a str,
    pub content_hash: &'a str,
    pub created_at: &'a str,
}

/// Repository for the append-only commit log.
///
/// Rows are only ever inserted; there is no update or delete path. A
/// duplicate commit id trips the UNIQUE constraint and propagates as an
/// error rather than overwriting history.
pub struct CommitRepository {
    conn: DbConn,
}

impl CommitRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    /// Append a commit row and return its assigned sequence number.
    pub fn append(&self, commit: &NewCommit<'_>) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO commits (id, path, author, message, added, removed, modified, content, content_hash, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            (
                commit.id,
                commit.path,
                commit.author,
                commit.message,
                commit.changes.added,
                commit.changes.removed,
                commit.changes.modified,
                commit.content,
                commit.content_hash,
                commit.created_at,
            ),
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Full history for a path in chronological order (newest-last).
    /// Unknown paths produce an empty sequence, not an error.
    pub fn history(&self, path: &str) -> Result<Vec<Commit>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT seq, id, path, author, message, added, removed, modified, content, content_hash, created_at \
             FROM commits WHERE path = ?1 ORDER BY seq ASC",
        )?;
        let rows = stmt.query_map([path], map_commit_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Direct lookup by commit id across all paths.
    pub fn find_by_id(&self, id: &str) -> Result<Option<Commit>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT seq, id, path, author, message, added, removed, modified, content, content_hash, created_at \
             FROM commits WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map([id], map_commit_row)?;
        match rows.next() {
            Some(row) => row.map(Some).map_err(Into::into),
            None => Ok(None),
        }
    }

    /// Latest committed snapshot per path, for rebuilding the cache when a
    /// durable database is reopened.
    pub fn latest_snapshots(&self) -> Result<Vec<(String, String)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT path, content FROM commits \
             WHERE seq IN (SELECT MAX(seq) FROM commits GROUP BY path)",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn map_commit_row(row: &Row<'_>) -> rusqlite::Result<Commit> {
    Ok(Commit {
        seq: row.get(0)?,
        id: row.get(1)?,
        path: row.get(2)?,
        author: row.get(3)?,
        message: row.get(4)?,
        changes: ChangeStats {
            added: row.get(5)?,
            removed: row.get(6)?,
            modified: row.get(7)?,
        },
        content: row.get(8)?,
        content_hash: row.get(9)?,
        created_at: row.get(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::db::Database;

    fn repo() -> CommitRepository {
        let db = Database::open_in_memory().unwrap();
        CommitRepository::new(db.connection())
    }

    fn sample<'a>(id: &'a str, path: &'a str, content: &'a str) -> NewCommit<'a> {
        NewCommit {
            id,
            path,
            author: "a@b.com",
            message: "msg",
            changes: ChangeStats::default(),
            content,
            content_hash: "0",
            created_at: "2026-01-01T00:00:00+00:00",
        }
    }

    #[test]
    fn test_append_assigns_increasing_seq() {
        let repo = repo();
        let first = repo.append(&sample("c1", "/doc.md", "one")).unwrap();
        let second = repo.append(&sample("c2", "/doc.md", "two")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_history_is_chronological_and_scoped_to_path() {
        let repo = repo();
        repo.append(&sample("c1", "/a.md", "one")).unwrap();
        repo.append(&sample("c2", "/b.md", "other")).unwrap();
        repo.append(&sample("c3", "/a.md", "two")).unwrap();

        let history = repo.history("/a.md").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, "c1");
        assert_eq!(history[1].id, "c3");
        assert!(repo.history("/missing.md").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let repo = repo();
        repo.append(&sample("c1", "/a.md", "one")).unwrap();
        assert!(repo.append(&sample("c1", "/a.md", "two")).is_err());
    }

    #[test]
    fn test_latest_snapshots_picks_newest_per_path() {
        let repo = repo();
        repo.append(&sample("c1", "/a.md", "old")).unwrap();
        repo.append(&sample("c2", "/a.md", "new")).unwrap();
        repo.append(&sample("c3", "/b.md", "only")).unwrap();

        let mut latest = repo.latest_snapshots().unwrap();
        latest.sort();
        assert_eq!(
            latest,
            vec![
                ("/a.md".to_string(), "new".to_string()),
                ("/b.md".to_string(), "only".to_string()),
            ]
        );
    }
}
