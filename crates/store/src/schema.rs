//! Statement catalog for the songplay star schema.
//!
//! Placeholders are positional (`?`) and bound in table column order.
//! `time` is quoted everywhere since it doubles as a type name.

// DROP TABLES

pub const SONGPLAY_TABLE_DROP: &str = "DROP TABLE IF EXISTS songplays";
pub const SONGPLAY_SEQ_DROP: &str = "DROP SEQUENCE IF EXISTS songplays_id_seq";
pub const USER_TABLE_DROP: &str = "DROP TABLE IF EXISTS users";
pub const SONG_TABLE_DROP: &str = "DROP TABLE IF EXISTS songs";
pub const ARTIST_TABLE_DROP: &str = "DROP TABLE IF EXISTS artists";
pub const TIME_TABLE_DROP: &str = r#"DROP TABLE IF EXISTS "time""#;

// CREATE TABLES

pub const TIME_TABLE_CREATE: &str = r#"
CREATE TABLE IF NOT EXISTS "time" (
  start_time TIMESTAMP NOT NULL PRIMARY KEY,
  hour INTEGER NOT NULL,
  day INTEGER NOT NULL,
  week INTEGER NOT NULL,
  month INTEGER NOT NULL,
  year INTEGER NOT NULL,
  weekday INTEGER NOT NULL
)
"#;

pub const USER_TABLE_CREATE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
  user_id INTEGER PRIMARY KEY,
  first_name VARCHAR(60) NOT NULL,
  last_name VARCHAR(60) NOT NULL,
  gender CHAR(1),
  level VARCHAR(20) NOT NULL
)
"#;

pub const ARTIST_TABLE_CREATE: &str = r#"
CREATE TABLE IF NOT EXISTS artists (
  artist_id VARCHAR(25) PRIMARY KEY,
  name VARCHAR NOT NULL,
  location VARCHAR,
  latitude DOUBLE,
  longitude DOUBLE
)
"#;

pub const SONG_TABLE_CREATE: &str = r#"
CREATE TABLE IF NOT EXISTS songs (
  song_id VARCHAR(25) PRIMARY KEY,
  title VARCHAR NOT NULL,
  artist_id VARCHAR(25) NOT NULL REFERENCES artists(artist_id),
  year INTEGER NOT NULL,
  duration DECIMAL(14, 5) NOT NULL
)
"#;

pub const SONGPLAY_SEQ_CREATE: &str = "CREATE SEQUENCE IF NOT EXISTS songplays_id_seq";

pub const SONGPLAY_TABLE_CREATE: &str = r#"
CREATE TABLE IF NOT EXISTS songplays (
  songplay_id BIGINT PRIMARY KEY DEFAULT nextval('songplays_id_seq'),
  start_time TIMESTAMP NOT NULL REFERENCES "time"(start_time),
  user_id INTEGER NOT NULL REFERENCES users(user_id),
  level VARCHAR(20),
  song_id VARCHAR(25) REFERENCES songs(song_id),
  artist_id VARCHAR(25) REFERENCES artists(artist_id),
  session_id INTEGER NOT NULL,
  location VARCHAR,
  user_agent VARCHAR
)
"#;

// INSERT RECORDS

pub const SONGPLAY_TABLE_INSERT: &str = r#"
INSERT INTO songplays
  (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub const USER_TABLE_INSERT: &str = r#"
INSERT INTO users (user_id, first_name, last_name, gender, level)
VALUES (?, ?, ?, ?, ?)
ON CONFLICT (user_id) DO UPDATE SET level = excluded.level
"#;

pub const SONG_TABLE_INSERT: &str = r#"
INSERT INTO songs (song_id, title, artist_id, year, duration)
VALUES (?, ?, ?, ?, ?)
ON CONFLICT (song_id) DO NOTHING
"#;

pub const ARTIST_TABLE_INSERT: &str = r#"
INSERT INTO artists (artist_id, name, location, latitude, longitude)
VALUES (?, ?, ?, ?, ?)
ON CONFLICT (artist_id) DO NOTHING
"#;

pub const TIME_TABLE_INSERT: &str = r#"
INSERT INTO "time" (start_time, hour, day, week, month, year, weekday)
VALUES (?, ?, ?, ?, ?, ?, ?)
ON CONFLICT (start_time) DO NOTHING
"#;

// FIND SONGS

/// Exact match on title, artist name and duration. Zero rows is a miss.
pub const SONG_SELECT: &str = r#"
SELECT s.song_id, a.artist_id
FROM songs AS s
JOIN artists AS a ON s.artist_id = a.artist_id
WHERE s.title = ?
  AND a.name = ?
  AND CAST(s.duration AS DOUBLE) = ?
LIMIT 1
"#;

// QUERY LISTS

pub const CREATE_TABLE_QUERIES: &[&str] = &[
    TIME_TABLE_CREATE,
    USER_TABLE_CREATE,
    ARTIST_TABLE_CREATE,
    SONG_TABLE_CREATE,
    SONGPLAY_SEQ_CREATE,
    SONGPLAY_TABLE_CREATE,
];

pub const DROP_TABLE_QUERIES: &[&str] = &[
    SONGPLAY_TABLE_DROP,
    SONGPLAY_SEQ_DROP,
    USER_TABLE_DROP,
    SONG_TABLE_DROP,
    ARTIST_TABLE_DROP,
    TIME_TABLE_DROP,
];

// READ BACK

pub const ARTIST_BY_ID: &str =
    "SELECT artist_id, name, location, latitude, longitude FROM artists WHERE artist_id = ?";
pub const SONG_BY_ID: &str = r#"
SELECT song_id, title, artist_id, year, CAST(duration AS DOUBLE)
FROM songs
WHERE song_id = ?
"#;
pub const USER_BY_ID: &str =
    "SELECT user_id, first_name, last_name, gender, level FROM users WHERE user_id = ?";
pub const TIME_ROWS: &str = r#"
SELECT start_time, hour, day, week, month, year, weekday
FROM "time"
ORDER BY start_time
"#;
pub const SONGPLAY_ROWS: &str = r#"
SELECT start_time, user_id, level, song_id, artist_id, session_id, location, user_agent
FROM songplays
ORDER BY songplay_id
LIMIT ?
"#;

pub const TIME_COUNT: &str = r#"SELECT COUNT(*) FROM "time""#;
pub const USER_COUNT: &str = "SELECT COUNT(*) FROM users";
pub const ARTIST_COUNT: &str = "SELECT COUNT(*) FROM artists";
pub const SONG_COUNT: &str = "SELECT COUNT(*) FROM songs";
pub const SONGPLAY_COUNT: &str = "SELECT COUNT(*) FROM songplays";
pub const SONGPLAY_MATCHED_COUNT: &str =
    "SELECT COUNT(*) FROM songplays WHERE song_id IS NOT NULL";
