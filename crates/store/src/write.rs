use duckdb::{Transaction, params};
use playlog_core::error::{PlaylogError, Result};
use playlog_core::model::song::{ArtistRow, SongRow};
use playlog_core::model::songplay::SongplayRow;
use playlog_core::model::time::TimeRow;
use playlog_core::model::user::UserRow;

use crate::schema::{
    ARTIST_TABLE_INSERT, SONG_TABLE_INSERT, SONGPLAY_TABLE_INSERT, TIME_TABLE_INSERT,
    USER_TABLE_INSERT,
};

/// Statements issued for one source file. Nothing is visible to other
/// readers until [`FileTx::commit`]; dropping it rolls the file back.
pub struct FileTx<'conn> {
    pub(crate) tx: Transaction<'conn>,
}

impl<'conn> FileTx<'conn> {
    pub(crate) fn new(tx: Transaction<'conn>) -> Self {
        Self { tx }
    }

    pub fn commit(self) -> Result<()> {
        self.tx
            .commit()
            .map_err(|e| PlaylogError::Store(format!("commit failed: {e}")))
    }

    /// No-op when the artist id already exists.
    pub fn insert_artist(&self, artist: &ArtistRow) -> Result<()> {
        let mut stmt = self
            .tx
            .prepare_cached(ARTIST_TABLE_INSERT)
            .map_err(|e| PlaylogError::Store(format!("prepare insert artist failed: {e}")))?;
        stmt.execute(params![
            artist.artist_id,
            artist.name,
            artist.location,
            artist.latitude,
            artist.longitude,
        ])
        .map_err(|e| {
            PlaylogError::Store(format!("insert artist {} failed: {e}", artist.artist_id))
        })?;
        Ok(())
    }

    pub fn insert_song(&self, song: &SongRow) -> Result<()> {
        let mut stmt = self
            .tx
            .prepare_cached(SONG_TABLE_INSERT)
            .map_err(|e| PlaylogError::Store(format!("prepare insert song failed: {e}")))?;
        stmt.execute(params![
            song.song_id,
            song.title,
            song.artist_id,
            song.year,
            song.duration,
        ])
        .map_err(|e| PlaylogError::Store(format!("insert song {} failed: {e}", song.song_id)))?;
        Ok(())
    }

    pub fn insert_time(&self, time: &TimeRow) -> Result<()> {
        let mut stmt = self
            .tx
            .prepare_cached(TIME_TABLE_INSERT)
            .map_err(|e| PlaylogError::Store(format!("prepare insert time failed: {e}")))?;
        stmt.execute(params![
            time.start_time,
            time.hour,
            time.day,
            time.week,
            time.month,
            time.year,
            time.weekday,
        ])
        .map_err(|e| PlaylogError::Store(format!("insert time {} failed: {e}", time.start_time)))?;
        Ok(())
    }

    /// Inserts the user, or overwrites only `level` when the id exists.
    pub fn upsert_user(&self, user: &UserRow) -> Result<()> {
        let mut stmt = self
            .tx
            .prepare_cached(USER_TABLE_INSERT)
            .map_err(|e| PlaylogError::Store(format!("prepare upsert user failed: {e}")))?;
        stmt.execute(params![
            user.user_id,
            user.first_name,
            user.last_name,
            user.gender,
            user.level,
        ])
        .map_err(|e| PlaylogError::Store(format!("upsert user {} failed: {e}", user.user_id)))?;
        Ok(())
    }

    pub fn insert_songplay(&self, play: &SongplayRow) -> Result<()> {
        let mut stmt = self
            .tx
            .prepare_cached(SONGPLAY_TABLE_INSERT)
            .map_err(|e| PlaylogError::Store(format!("prepare insert songplay failed: {e}")))?;
        stmt.execute(params![
            play.start_time,
            play.user_id,
            play.level,
            play.song_id,
            play.artist_id,
            play.session_id,
            play.location,
            play.user_agent,
        ])
        .map_err(|e| PlaylogError::Store(format!("insert songplay failed: {e}")))?;
        Ok(())
    }
}
