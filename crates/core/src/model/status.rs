use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub db_path: String,
    pub db_size_bytes: u64,
    pub time_count: usize,
    pub users_count: usize,
    pub artists_count: usize,
    pub songs_count: usize,
    pub songplays_count: usize,
    pub songplays_matched: usize,
}
