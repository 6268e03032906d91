use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{PlaylogError, Result};
use crate::model::songplay::{SongMatch, SongplayRow};
use crate::model::time::TimeRow;
use crate::model::user::UserRow;
use crate::time::timestamp_from_epoch_ms;

pub const NEXT_SONG_PAGE: &str = "NextSong";

/// Identifier that the activity log writes either as a number or as a
/// numeric string (`""` for logged-out sessions).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LooseId {
    Int(i64),
    Text(String),
}

impl LooseId {
    fn to_i64(&self, field: &str) -> Result<Option<i64>> {
        match self {
            Self::Int(v) => Ok(Some(*v)),
            Self::Text(s) if s.trim().is_empty() => Ok(None),
            Self::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|e| PlaylogError::Parse(format!("bad {field} {s:?}: {e}"))),
        }
    }
}

/// A single activity-log line as written, every field optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    pub artist: Option<String>,
    pub first_name: Option<String>,
    pub gender: Option<String>,
    pub last_name: Option<String>,
    pub length: Option<f64>,
    pub level: Option<String>,
    pub location: Option<String>,
    pub page: Option<String>,
    pub session_id: Option<LooseId>,
    pub song: Option<String>,
    pub ts: Option<i64>,
    pub user_agent: Option<String>,
    pub user_id: Option<LooseId>,
}

impl LogEvent {
    pub fn is_song_play(&self) -> bool {
        self.page.as_deref() == Some(NEXT_SONG_PAGE)
    }
}

/// Parses line-delimited JSON events. Blank lines are skipped.
pub fn parse_log_lines(raw: &str, source: &str) -> Result<Vec<LogEvent>> {
    let mut out = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str::<LogEvent>(line)
            .map_err(|e| PlaylogError::Parse(format!("{source}:{}: {e}", idx + 1)))?;
        out.push(event);
    }
    Ok(out)
}

/// A `NextSong` event with the fields the star schema needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayEvent {
    pub start_time: NaiveDateTime,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub level: String,
    pub session_id: i64,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl PlayEvent {
    pub fn from_event(event: &LogEvent) -> Result<Self> {
        let ts = required(event.ts, "ts")?;
        let user_id = match &event.user_id {
            Some(id) => id.to_i64("userId")?,
            None => None,
        };
        let session_id = match &event.session_id {
            Some(id) => id.to_i64("sessionId")?,
            None => None,
        };

        Ok(Self {
            start_time: timestamp_from_epoch_ms(ts)?,
            user_id: required(user_id, "userId")?,
            first_name: required(event.first_name.clone(), "firstName")?,
            last_name: required(event.last_name.clone(), "lastName")?,
            gender: event.gender.clone(),
            level: required(event.level.clone(), "level")?,
            session_id: required(session_id, "sessionId")?,
            song: event.song.clone(),
            artist: event.artist.clone(),
            length: event.length.filter(|v| !v.is_nan()),
            location: event.location.clone(),
            user_agent: event.user_agent.clone(),
        })
    }

    pub fn time_row(&self) -> TimeRow {
        TimeRow::from_start_time(self.start_time)
    }

    pub fn user(&self) -> UserRow {
        UserRow {
            user_id: self.user_id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.clone(),
            level: self.level.clone(),
        }
    }

    /// Title, artist name and duration used to resolve the catalog ids.
    /// `None` when any of the three is missing, which never matches.
    pub fn lookup_key(&self) -> Option<(&str, &str, f64)> {
        Some((self.song.as_deref()?, self.artist.as_deref()?, self.length?))
    }

    pub fn songplay(&self, matched: Option<SongMatch>) -> SongplayRow {
        let (song_id, artist_id) = match matched {
            Some(m) => (Some(m.song_id), Some(m.artist_id)),
            None => (None, None),
        };
        SongplayRow {
            start_time: self.start_time,
            user_id: self.user_id,
            level: self.level.clone(),
            song_id,
            artist_id,
            session_id: self.session_id,
            location: self.location.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| PlaylogError::Parse(format!("NextSong event missing {field}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAY: &str = r#"{"artist":"Pavement","auth":"Logged In","firstName":"Sylvie","gender":"F","itemInSession":0,"lastName":"Cruz","length":99.16036,"level":"free","location":"Washington-Arlington-Alexandria, DC-VA-MD-WV","method":"PUT","page":"NextSong","registration":1540266185796.0,"sessionId":345,"song":"Mercy:The Laundromat","status":200,"ts":1541990258796,"userAgent":"Mozilla/5.0","userId":"10"}"#;
    const HOME: &str = r#"{"artist":null,"auth":"Logged Out","firstName":null,"gender":null,"itemInSession":0,"lastName":null,"length":null,"level":"free","location":null,"method":"GET","page":"Home","registration":null,"sessionId":52,"song":null,"status":200,"ts":1541207073796,"userAgent":null,"userId":""}"#;

    #[test]
    fn parses_lines_and_skips_blanks() {
        let raw = format!("{PLAY}\n\n{HOME}\n");
        let events = parse_log_lines(&raw, "log.json").unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].is_song_play());
        assert!(!events[1].is_song_play());
        assert_eq!(events[1].user_id, Some(LooseId::Text(String::new())));
    }

    #[test]
    fn reports_line_of_malformed_json() {
        let raw = format!("{PLAY}\n{{not json\n");
        let err = parse_log_lines(&raw, "log.json").unwrap_err();
        assert!(err.to_string().contains("log.json:2"));
    }

    #[test]
    fn builds_play_event() {
        let event = serde_json::from_str::<LogEvent>(PLAY).unwrap();
        let play = PlayEvent::from_event(&event).unwrap();
        assert_eq!(play.user_id, 10);
        assert_eq!(play.session_id, 345);
        assert_eq!(play.level, "free");
        assert_eq!(
            play.lookup_key(),
            Some(("Mercy:The Laundromat", "Pavement", 99.16036))
        );
        assert_eq!(play.start_time.to_string(), "2018-11-12 02:37:38.796");

        let user = play.user();
        assert_eq!(user.first_name, "Sylvie");
        assert_eq!(user.gender.as_deref(), Some("F"));
    }

    #[test]
    fn numeric_user_id_is_accepted() {
        let event = LogEvent {
            user_id: Some(LooseId::Int(26)),
            session_id: Some(LooseId::Text("583".into())),
            ..serde_json::from_str::<LogEvent>(PLAY).unwrap()
        };
        let play = PlayEvent::from_event(&event).unwrap();
        assert_eq!(play.user_id, 26);
        assert_eq!(play.session_id, 583);
    }

    #[test]
    fn play_without_user_is_rejected() {
        let event = LogEvent {
            user_id: Some(LooseId::Text(String::new())),
            ..serde_json::from_str::<LogEvent>(PLAY).unwrap()
        };
        let err = PlayEvent::from_event(&event).unwrap_err();
        assert!(err.to_string().contains("userId"));
    }

    #[test]
    fn missing_song_fields_produce_no_lookup_key() {
        let event = LogEvent {
            length: None,
            ..serde_json::from_str::<LogEvent>(PLAY).unwrap()
        };
        let play = PlayEvent::from_event(&event).unwrap();
        assert_eq!(play.lookup_key(), None);

        let row = play.songplay(None);
        assert_eq!(row.song_id, None);
        assert_eq!(row.artist_id, None);
    }

    #[test]
    fn songplay_carries_match() {
        let event = serde_json::from_str::<LogEvent>(PLAY).unwrap();
        let play = PlayEvent::from_event(&event).unwrap();
        let row = play.songplay(Some(SongMatch {
            song_id: "S1".into(),
            artist_id: "AR1".into(),
        }));
        assert_eq!(row.song_id.as_deref(), Some("S1"));
        assert_eq!(row.artist_id.as_deref(), Some("AR1"));
        assert_eq!(row.session_id, 345);
    }
}
