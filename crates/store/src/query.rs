use duckdb::{Connection, Params, Row, params};
use playlog_core::error::{PlaylogError, Result};
use playlog_core::model::song::{ArtistRow, SongRow};
use playlog_core::model::songplay::{SongMatch, SongplayRow};
use playlog_core::model::time::TimeRow;
use playlog_core::model::user::UserRow;

use crate::Store;
use crate::schema::{ARTIST_BY_ID, SONG_BY_ID, SONG_SELECT, SONGPLAY_ROWS, TIME_ROWS, USER_BY_ID};
use crate::write::FileTx;

impl FileTx<'_> {
    /// Resolves catalog ids for a play. `Ok(None)` is an ordinary miss.
    pub fn find_song(
        &self,
        title: &str,
        artist: &str,
        duration: f64,
    ) -> Result<Option<SongMatch>> {
        let mut stmt = self
            .tx
            .prepare_cached(SONG_SELECT)
            .map_err(|e| PlaylogError::Store(format!("prepare song lookup failed: {e}")))?;
        let mut rows = stmt
            .query(params![title, artist, duration])
            .map_err(|e| PlaylogError::Store(format!("song lookup failed: {e}")))?;

        let Some(row) = rows
            .next()
            .map_err(|e| PlaylogError::Store(format!("song lookup failed: {e}")))?
        else {
            return Ok(None);
        };

        Ok(Some(SongMatch {
            song_id: row
                .get(0)
                .map_err(|e| PlaylogError::Store(format!("bad song_id column: {e}")))?,
            artist_id: row
                .get(1)
                .map_err(|e| PlaylogError::Store(format!("bad artist_id column: {e}")))?,
        }))
    }
}

impl Store {
    pub fn fetch_artist(&self, artist_id: &str) -> Result<Option<ArtistRow>> {
        query_opt(self.conn(), ARTIST_BY_ID, params![artist_id], |row| {
            Ok(ArtistRow {
                artist_id: row.get(0)?,
                name: row.get(1)?,
                location: row.get(2)?,
                latitude: row.get(3)?,
                longitude: row.get(4)?,
            })
        })
    }

    pub fn fetch_song(&self, song_id: &str) -> Result<Option<SongRow>> {
        query_opt(self.conn(), SONG_BY_ID, params![song_id], |row| {
            Ok(SongRow {
                song_id: row.get(0)?,
                title: row.get(1)?,
                artist_id: row.get(2)?,
                year: row.get(3)?,
                duration: row.get(4)?,
            })
        })
    }

    pub fn fetch_user(&self, user_id: i64) -> Result<Option<UserRow>> {
        query_opt(self.conn(), USER_BY_ID, params![user_id], |row| {
            Ok(UserRow {
                user_id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                gender: row.get(3)?,
                level: row.get(4)?,
            })
        })
    }

    pub fn fetch_time_rows(&self) -> Result<Vec<TimeRow>> {
        query_all(self.conn(), TIME_ROWS, [], |row| {
            Ok(TimeRow {
                start_time: row.get(0)?,
                hour: row.get(1)?,
                day: row.get(2)?,
                week: row.get(3)?,
                month: row.get(4)?,
                year: row.get(5)?,
                weekday: row.get(6)?,
            })
        })
    }

    /// Fact rows in insertion order.
    pub fn fetch_songplays(&self, limit: usize) -> Result<Vec<SongplayRow>> {
        let limit = limit as i64;
        query_all(self.conn(), SONGPLAY_ROWS, params![limit], |row| {
            Ok(SongplayRow {
                start_time: row.get(0)?,
                user_id: row.get(1)?,
                level: row.get(2)?,
                song_id: row.get(3)?,
                artist_id: row.get(4)?,
                session_id: row.get(5)?,
                location: row.get(6)?,
                user_agent: row.get(7)?,
            })
        })
    }
}

fn query_opt<T, P, F>(conn: &Connection, sql: &str, params: P, f: F) -> Result<Option<T>>
where
    P: Params,
    F: FnOnce(&Row<'_>) -> duckdb::Result<T>,
{
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| PlaylogError::Store(format!("prepare query failed: {e}")))?;
    let mut rows = stmt
        .query(params)
        .map_err(|e| PlaylogError::Store(format!("query failed: {e}")))?;
    let Some(row) = rows
        .next()
        .map_err(|e| PlaylogError::Store(format!("query failed: {e}")))?
    else {
        return Ok(None);
    };
    let value = f(row).map_err(|e| PlaylogError::Store(format!("decode row failed: {e}")))?;
    Ok(Some(value))
}

fn query_all<T, P, F>(conn: &Connection, sql: &str, params: P, f: F) -> Result<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> duckdb::Result<T>,
{
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| PlaylogError::Store(format!("prepare query failed: {e}")))?;
    let rows = stmt
        .query_map(params, f)
        .map_err(|e| PlaylogError::Store(format!("query failed: {e}")))?
        .collect::<duckdb::Result<Vec<_>>>()
        .map_err(|e| PlaylogError::Store(format!("decode row failed: {e}")))?;
    Ok(rows)
}
