use std::collections::HashSet;
use std::path::Path;

use playlog_core::error::Result;
use playlog_core::model::event::{LogEvent, PlayEvent, parse_log_lines};
use playlog_core::model::time::TimeRow;
use playlog_core::model::user::UserRow;
use playlog_store::FileTx;
use tracing::debug;

use crate::loader::{FileLoader, LoadStats, read_source};

/// Loads one activity-log file into time, users and songplays.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFileLoader;

impl FileLoader for LogFileLoader {
    fn kind(&self) -> &'static str {
        "log"
    }

    fn load(&self, tx: &FileTx<'_>, path: &Path) -> Result<LoadStats> {
        process_log_file(tx, path)
    }
}

/// What one log file contributes, before any lookup against the catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogBatch {
    pub events: usize,
    /// One row per distinct play timestamp, first-seen order.
    pub times: Vec<TimeRow>,
    /// Distinct user tuples in first-seen order, upserted in that order. A
    /// user seen as free, then paid, then free again keeps one free and one
    /// paid tuple, so the file leaves them at `paid`: the last distinct
    /// level to appear wins, not the level of the last event.
    pub users: Vec<UserRow>,
    /// Every `NextSong` event, in file order, duplicates kept.
    pub plays: Vec<PlayEvent>,
}

pub fn transform_events(events: &[LogEvent], source: &str) -> Result<LogBatch> {
    let mut batch = LogBatch {
        events: events.len(),
        ..LogBatch::default()
    };
    let mut seen_times = HashSet::new();
    let mut seen_users = HashSet::new();

    for (idx, event) in events.iter().enumerate() {
        if !event.is_song_play() {
            continue;
        }
        let play = PlayEvent::from_event(event)
            .map_err(|e| e.context(format!("{source}: event {}", idx + 1)))?;

        if seen_times.insert(play.start_time) {
            batch.times.push(play.time_row());
        }
        let user = play.user();
        if seen_users.insert(user.clone()) {
            batch.users.push(user);
        }
        batch.plays.push(play);
    }

    Ok(batch)
}

pub fn process_log_file(tx: &FileTx<'_>, path: &Path) -> Result<LoadStats> {
    let source = path.display().to_string();
    let raw = read_source(path)?;
    let events = parse_log_lines(&raw, &source)?;
    let batch = transform_events(&events, &source)?;

    for time in &batch.times {
        tx.insert_time(time)?;
    }
    for user in &batch.users {
        tx.upsert_user(user)?;
    }

    let mut matched = 0;
    for play in &batch.plays {
        let found = match play.lookup_key() {
            Some((title, artist, length)) => tx.find_song(title, artist, length)?,
            None => None,
        };
        if found.is_some() {
            matched += 1;
        }
        tx.insert_songplay(&play.songplay(found))?;
    }

    debug!(
        file = %source,
        events = batch.events,
        plays = batch.plays.len(),
        matched,
        "loaded log file"
    );

    Ok(LoadStats {
        events: batch.events,
        plays: batch.plays.len(),
        time_rows: batch.times.len(),
        users: batch.users.len(),
        songplays: batch.plays.len(),
        songplays_matched: matched,
        ..LoadStats::default()
    })
}
