use std::io::IsTerminal;
use std::time::Duration;

use owo_colors::OwoColorize;
use playlog_core::model::songplay::SongplayRow;
use playlog_core::model::status::StatusResponse;
use playlog_etl::{PassSummary, RunSummary};

pub fn print_run_summary_human(v: &RunSummary) {
    for pass in &v.passes {
        print_pass_human(pass);
    }
    let totals = v.totals();
    println!(
        "-- {} songplays loaded ({} matched) --",
        totals.songplays, totals.songplays_matched
    );
}

fn print_pass_human(pass: &PassSummary) {
    let elapsed = humantime::format_duration(Duration::from_millis(pass.elapsed_ms));
    let kind = label(&pass.kind);
    let s = &pass.stats;
    match pass.kind.as_str() {
        "song" => println!(
            "{kind} files={} artists={} songs={} elapsed={elapsed}",
            pass.files, s.artists, s.songs
        ),
        _ => println!(
            "{kind} files={} events={} plays={} time={} users={} matched={} elapsed={elapsed}",
            pass.files, s.events, s.plays, s.time_rows, s.users, s.songplays_matched
        ),
    }
}

pub fn print_status_human(v: &StatusResponse) {
    println!("db_path={}", v.db_path);
    println!("db_size_bytes={}", v.db_size_bytes);
    println!(
        "time={} users={} artists={} songs={} songplays={}",
        v.time_count, v.users_count, v.artists_count, v.songs_count, v.songplays_count
    );
    println!("songplays_matched={}", v.songplays_matched);
}

pub fn print_songplays_human(rows: &[SongplayRow]) {
    for row in rows {
        let song = row.song_id.as_deref().unwrap_or("-");
        let artist = row.artist_id.as_deref().unwrap_or("-");
        println!(
            "{} user={} level={} session={} song={} artist={}",
            row.start_time.format("%Y-%m-%dT%H:%M:%S%.3f"),
            row.user_id,
            row.level,
            row.session_id,
            song,
            artist
        );
    }
    println!("-- {} songplays --", rows.len());
}

fn label(kind: &str) -> String {
    let text = format!("[{kind}]");
    if std::io::stdout().is_terminal() {
        text.cyan().to_string()
    } else {
        text
    }
}
