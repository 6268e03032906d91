use std::fs;
use std::ops::AddAssign;
use std::path::Path;

use playlog_core::error::{PlaylogError, Result};
use playlog_store::FileTx;
use serde::{Deserialize, Serialize};

/// Applies one source file to the open unit of work.
pub trait FileLoader {
    /// Short name of the data domain, used in logs and summaries.
    fn kind(&self) -> &'static str;

    fn load(&self, tx: &FileTx<'_>, path: &Path) -> Result<LoadStats>;
}

/// Rows handed to the database. Conflict-skipped inserts are still counted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadStats {
    pub artists: usize,
    pub songs: usize,
    pub events: usize,
    pub plays: usize,
    pub time_rows: usize,
    pub users: usize,
    pub songplays: usize,
    pub songplays_matched: usize,
}

impl AddAssign for LoadStats {
    fn add_assign(&mut self, rhs: Self) {
        self.artists += rhs.artists;
        self.songs += rhs.songs;
        self.events += rhs.events;
        self.plays += rhs.plays;
        self.time_rows += rhs.time_rows;
        self.users += rhs.users;
        self.songplays += rhs.songplays;
        self.songplays_matched += rhs.songplays_matched;
    }
}

pub(crate) fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| PlaylogError::Io(format!("failed reading {}: {e}", path.display())))
}
