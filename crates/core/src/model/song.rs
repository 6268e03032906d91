use serde::{Deserialize, Serialize};

use crate::error::{PlaylogError, Result};

/// A song-metadata document: one track and the artist performing it.
///
/// Non-`Option` fields are required; a missing or `null` value fails the
/// parse. Unknown keys (`num_songs`, ...) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongFileRecord {
    pub artist_id: String,
    pub artist_name: String,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
    pub song_id: String,
    pub title: String,
    pub year: i32,
    pub duration: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongRow {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
}

impl SongFileRecord {
    /// Parses the first JSON value in `raw`. Trailing records are ignored.
    pub fn parse(raw: &str, source: &str) -> Result<Self> {
        let mut stream = serde_json::Deserializer::from_str(raw).into_iter::<Self>();
        match stream.next() {
            Some(Ok(record)) => Ok(record),
            Some(Err(e)) => Err(PlaylogError::Parse(format!("{source}: {e}"))),
            None => Err(PlaylogError::Parse(format!("{source}: no song record found"))),
        }
    }

    pub fn artist(&self) -> ArtistRow {
        ArtistRow {
            artist_id: self.artist_id.clone(),
            name: self.artist_name.clone(),
            location: self.artist_location.clone(),
            latitude: self.artist_latitude.filter(|v| !v.is_nan()),
            longitude: self.artist_longitude.filter(|v| !v.is_nan()),
        }
    }

    pub fn song(&self) -> SongRow {
        SongRow {
            song_id: self.song_id.clone(),
            title: self.title.clone(),
            artist_id: self.artist_id.clone(),
            year: self.year,
            duration: self.duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"num_songs": 1, "artist_id": "ARD7TVE1187B99BFB1", "artist_latitude": null, "artist_longitude": null, "artist_location": "California - LA", "artist_name": "Casual", "song_id": "SOMZWCG12A8C13C480", "title": "I Didn't Mean To", "duration": 218.93179, "year": 0}"#;

    #[test]
    fn parses_song_document() {
        let record = SongFileRecord::parse(SAMPLE, "a.json").unwrap();
        let artist = record.artist();
        assert_eq!(artist.artist_id, "ARD7TVE1187B99BFB1");
        assert_eq!(artist.name, "Casual");
        assert_eq!(artist.location.as_deref(), Some("California - LA"));
        assert_eq!(artist.latitude, None);

        let song = record.song();
        assert_eq!(song.song_id, "SOMZWCG12A8C13C480");
        assert_eq!(song.artist_id, "ARD7TVE1187B99BFB1");
        assert_eq!(song.year, 0);
        assert_eq!(song.duration, 218.93179);
    }

    #[test]
    fn absent_nullable_fields_become_none() {
        let raw = r#"{"artist_id":"AR1","artist_name":"X","song_id":"S1","title":"T","year":2000,"duration":180.5}"#;
        let artist = SongFileRecord::parse(raw, "a.json").unwrap().artist();
        assert_eq!(artist.location, None);
        assert_eq!(artist.longitude, None);
    }

    #[test]
    fn uses_first_record_only() {
        let raw = r#"{"artist_id":"AR1","artist_name":"X","song_id":"S1","title":"T","year":2000,"duration":1.0}
{"artist_id":"AR2","artist_name":"Y","song_id":"S2","title":"U","year":2001,"duration":2.0}"#;
        let record = SongFileRecord::parse(raw, "a.json").unwrap();
        assert_eq!(record.song_id, "S1");
    }

    #[test]
    fn accepts_pretty_printed_document() {
        let raw = "{\n  \"artist_id\": \"AR1\",\n  \"artist_name\": \"X\",\n  \"song_id\": \"S1\",\n  \"title\": \"T\",\n  \"year\": 2000,\n  \"duration\": 1.5\n}\n";
        assert!(SongFileRecord::parse(raw, "a.json").is_ok());
    }

    #[test]
    fn rejects_missing_required_field() {
        let raw = r#"{"artist_id":"AR1","artist_name":"X","title":"T","year":2000,"duration":1.0}"#;
        let err = SongFileRecord::parse(raw, "bad.json").unwrap_err();
        assert!(err.to_string().contains("bad.json"));
        assert!(err.to_string().contains("song_id"));
    }

    #[test]
    fn rejects_null_required_field() {
        let raw = r#"{"artist_id":null,"artist_name":"X","song_id":"S1","title":"T","year":2000,"duration":1.0}"#;
        assert!(SongFileRecord::parse(raw, "a.json").is_err());
    }

    #[test]
    fn rejects_empty_document() {
        assert!(SongFileRecord::parse("  \n", "empty.json").is_err());
    }
}
