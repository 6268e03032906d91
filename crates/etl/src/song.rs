use std::path::Path;

use playlog_core::error::Result;
use playlog_core::model::song::SongFileRecord;
use playlog_store::FileTx;
use tracing::debug;

use crate::loader::{FileLoader, LoadStats, read_source};

/// Loads one song-metadata file: one artist row, then one song row.
#[derive(Debug, Clone, Copy, Default)]
pub struct SongFileLoader;

impl FileLoader for SongFileLoader {
    fn kind(&self) -> &'static str {
        "song"
    }

    fn load(&self, tx: &FileTx<'_>, path: &Path) -> Result<LoadStats> {
        process_song_file(tx, path)
    }
}

pub fn process_song_file(tx: &FileTx<'_>, path: &Path) -> Result<LoadStats> {
    let raw = read_source(path)?;
    let record = SongFileRecord::parse(&raw, &path.display().to_string())?;

    let artist = record.artist();
    tx.insert_artist(&artist)?;

    let song = record.song();
    tx.insert_song(&song)?;

    debug!(
        file = %path.display(),
        artist_id = %artist.artist_id,
        song_id = %song.song_id,
        "loaded song file"
    );

    Ok(LoadStats {
        artists: 1,
        songs: 1,
        ..LoadStats::default()
    })
}
