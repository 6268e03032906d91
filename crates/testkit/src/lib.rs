use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};

/// A song-metadata record for artist `AR1` / song `S1`.
pub fn sample_song() -> Value {
    json!({
        "num_songs": 1,
        "artist_id": "AR1",
        "artist_latitude": null,
        "artist_longitude": null,
        "artist_location": "",
        "artist_name": "X",
        "song_id": "S1",
        "title": "T",
        "duration": 180.5,
        "year": 2000
    })
}

/// A `NextSong` event for user "Sylvie Cruz" in session 345.
pub fn play_event(
    ts: i64,
    user_id: &str,
    level: &str,
    song: &str,
    artist: &str,
    length: f64,
) -> Value {
    json!({
        "artist": artist,
        "auth": "Logged In",
        "firstName": "Sylvie",
        "gender": "F",
        "itemInSession": 0,
        "lastName": "Cruz",
        "length": length,
        "level": level,
        "location": "Washington-Arlington-Alexandria, DC-VA-MD-WV",
        "method": "PUT",
        "page": "NextSong",
        "registration": 1_540_266_185_796.0,
        "sessionId": 345,
        "song": song,
        "status": 200,
        "ts": ts,
        "userAgent": "Mozilla/5.0",
        "userId": user_id
    })
}

/// A logged-out navigation event with nulls everywhere a play has data.
pub fn page_event(ts: i64, page: &str) -> Value {
    json!({
        "artist": null,
        "auth": "Logged Out",
        "firstName": null,
        "gender": null,
        "itemInSession": 0,
        "lastName": null,
        "length": null,
        "level": "free",
        "location": null,
        "method": "GET",
        "page": page,
        "registration": null,
        "sessionId": 52,
        "song": null,
        "status": 200,
        "ts": ts,
        "userAgent": null,
        "userId": ""
    })
}

pub fn write_song_file(dir: &Path, rel: &str, record: &Value) -> anyhow::Result<PathBuf> {
    write_file(dir, rel, &serde_json::to_string(record)?)
}

/// Writes one event per line, the way the activity log is laid out.
pub fn write_log_file(dir: &Path, rel: &str, events: &[Value]) -> anyhow::Result<PathBuf> {
    let mut body = String::new();
    for event in events {
        body.push_str(&serde_json::to_string(event)?);
        body.push('\n');
    }
    write_file(dir, rel, &body)
}

fn write_file(dir: &Path, rel: &str, body: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, body)?;
    Ok(path)
}
