use std::fs;
use std::path::Path;

use duckdb::Connection;
use playlog_core::error::{PlaylogError, Result};
use playlog_core::model::status::StatusResponse;
use tracing::debug;

use crate::schema::{
    ARTIST_COUNT, CREATE_TABLE_QUERIES, DROP_TABLE_QUERIES, SONG_COUNT, SONGPLAY_COUNT,
    SONGPLAY_MATCHED_COUNT, TIME_COUNT, USER_COUNT,
};
use crate::write::FileTx;

/// The single connection a run holds. Dropping the store closes it.
pub struct Store {
    conn: Connection,
    db_path: String,
}

impl Store {
    /// Opens (or creates) the database file and ensures every table exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| PlaylogError::Io(format!("failed to create db dir: {e}")))?;
        }

        let conn = Connection::open(path)
            .map_err(|e| PlaylogError::Store(format!("failed to open duckdb: {e}")))?;
        let store = Self {
            conn,
            db_path: path.display().to_string(),
        };
        store.create_tables()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| PlaylogError::Store(format!("failed to open in-memory db: {e}")))?;
        let store = Self {
            conn,
            db_path: ":memory:".to_string(),
        };
        store.create_tables()?;
        Ok(store)
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    pub fn create_tables(&self) -> Result<()> {
        for sql in CREATE_TABLE_QUERIES {
            self.conn
                .execute_batch(sql)
                .map_err(|e| PlaylogError::Store(format!("create table failed: {e}")))?;
        }
        Ok(())
    }

    pub fn drop_tables(&self) -> Result<()> {
        for sql in DROP_TABLE_QUERIES {
            self.conn
                .execute_batch(sql)
                .map_err(|e| PlaylogError::Store(format!("drop table failed: {e}")))?;
        }
        Ok(())
    }

    /// Drops and recreates the whole schema.
    pub fn reset_schema(&self) -> Result<()> {
        debug!(db = %self.db_path, "resetting schema");
        self.drop_tables()?;
        self.create_tables()
    }

    /// Starts the unit of work for one source file.
    pub fn begin(&mut self) -> Result<FileTx<'_>> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| PlaylogError::Store(format!("begin tx failed: {e}")))?;
        Ok(FileTx::new(tx))
    }

    pub fn status(&self) -> Result<StatusResponse> {
        let db_size_bytes = if self.db_path == ":memory:" {
            0
        } else {
            fs::metadata(&self.db_path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StatusResponse {
            db_path: self.db_path.clone(),
            db_size_bytes,
            time_count: scalar_usize(&self.conn, TIME_COUNT)?,
            users_count: scalar_usize(&self.conn, USER_COUNT)?,
            artists_count: scalar_usize(&self.conn, ARTIST_COUNT)?,
            songs_count: scalar_usize(&self.conn, SONG_COUNT)?,
            songplays_count: scalar_usize(&self.conn, SONGPLAY_COUNT)?,
            songplays_matched: scalar_usize(&self.conn, SONGPLAY_MATCHED_COUNT)?,
        })
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

fn scalar_usize(conn: &Connection, sql: &str) -> Result<usize> {
    conn.query_row(sql, [], |row| row.get::<_, i64>(0))
        .map(|v| v as usize)
        .map_err(|e| PlaylogError::Store(format!("query failed: {e}")))
}
