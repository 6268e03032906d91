use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Catalog ids resolved for a play through the title/artist/duration lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SongMatch {
    pub song_id: String,
    pub artist_id: String,
}

/// Fact row; `songplay_id` is assigned by the database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongplayRow {
    pub start_time: NaiveDateTime,
    pub user_id: i64,
    pub level: String,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}
