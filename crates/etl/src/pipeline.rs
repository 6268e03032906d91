use std::path::Path;
use std::time::Instant;

use playlog_core::config::Config;
use playlog_core::error::Result;
use playlog_store::Store;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::discover::discover_json_files;
use crate::loader::{FileLoader, LoadStats};
use crate::log::LogFileLoader;
use crate::song::SongFileLoader;

/// Receives the driver's progress as files are found and applied.
pub trait Progress {
    fn files_found(&mut self, root: &Path, total: usize);
    fn file_processed(&mut self, done: usize, total: usize, path: &Path);
}

/// Silent progress, for structured output and tests.
impl Progress for () {
    fn files_found(&mut self, _root: &Path, _total: usize) {}
    fn file_processed(&mut self, _done: usize, _total: usize, _path: &Path) {}
}

/// Prints the human progress lines on stdout.
#[derive(Debug, Default)]
pub struct StdoutProgress;

impl Progress for StdoutProgress {
    fn files_found(&mut self, root: &Path, total: usize) {
        println!("{total} files found in {}", root.display());
    }

    fn file_processed(&mut self, done: usize, total: usize, _path: &Path) {
        println!("{done}/{total} files processed.");
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PassSummary {
    pub kind: String,
    pub root: String,
    pub files: usize,
    pub stats: LoadStats,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub passes: Vec<PassSummary>,
}

impl RunSummary {
    pub fn totals(&self) -> LoadStats {
        let mut total = LoadStats::default();
        for pass in &self.passes {
            total += pass.stats;
        }
        total
    }
}

/// Applies `loader` to every JSON file under `root`, one committed unit of
/// work per file. Stops at the first failing file; its work is rolled back.
pub fn process_data(
    store: &mut Store,
    root: &Path,
    loader: &dyn FileLoader,
    progress: &mut dyn Progress,
) -> Result<PassSummary> {
    let started = Instant::now();
    let files = discover_json_files(root)?;
    let total = files.len();
    progress.files_found(root, total);

    let mut stats = LoadStats::default();
    for (idx, path) in files.iter().enumerate() {
        let tx = store.begin()?;
        let file_stats = loader
            .load(&tx, path)
            .map_err(|e| e.context(format!("{} file {}", loader.kind(), path.display())))?;
        tx.commit()
            .map_err(|e| e.context(format!("{} file {}", loader.kind(), path.display())))?;

        debug!(kind = loader.kind(), file = %path.display(), "committed");
        stats += file_stats;
        progress.file_processed(idx + 1, total, path);
    }

    let elapsed_ms = started.elapsed().as_millis() as u64;
    info!(
        kind = loader.kind(),
        root = %root.display(),
        files = total,
        elapsed_ms,
        "pass complete"
    );

    Ok(PassSummary {
        kind: loader.kind().to_string(),
        root: root.display().to_string(),
        files: total,
        stats,
        elapsed_ms,
    })
}

/// Song metadata first, so plays can resolve their catalog ids.
pub fn run(store: &mut Store, cfg: &Config, progress: &mut dyn Progress) -> Result<RunSummary> {
    let passes: [(&Path, &dyn FileLoader); 2] = [
        (cfg.song_data_dir.as_path(), &SongFileLoader),
        (cfg.log_data_dir.as_path(), &LogFileLoader),
    ];

    let mut summary = RunSummary::default();
    for (root, loader) in passes {
        summary
            .passes
            .push(process_data(store, root, loader, progress)?);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use playlog_core::error::PlaylogError;

    use super::*;

    const TS: i64 = 1_541_121_934_796;

    #[derive(Default)]
    struct Recorder {
        lines: Vec<String>,
    }

    impl Progress for Recorder {
        fn files_found(&mut self, _root: &Path, total: usize) {
            self.lines.push(format!("found {total}"));
        }

        fn file_processed(&mut self, done: usize, total: usize, _path: &Path) {
            self.lines.push(format!("{done}/{total}"));
        }
    }

    fn config(root: &Path) -> Config {
        Config {
            db_path: root.join("unused.duckdb"),
            song_data_dir: root.join("song_data"),
            log_data_dir: root.join("log_data"),
        }
    }

    fn seed(root: &Path) {
        testkit::write_song_file(root, "song_data/A/A/S1.json", &testkit::sample_song()).unwrap();
        let mut other = testkit::sample_song();
        other["song_id"] = "S2".into();
        other["title"] = "U".into();
        testkit::write_song_file(root, "song_data/A/B/S2.json", &other).unwrap();

        testkit::write_log_file(
            root,
            "log_data/2018/11/2018-11-01-events.json",
            &[
                testkit::play_event(TS, "10", "free", "T", "X", 180.5),
                testkit::page_event(TS, "Home"),
            ],
        )
        .unwrap();
        testkit::write_log_file(
            root,
            "log_data/2018/11/2018-11-02-events.json",
            &[
                testkit::play_event(TS + 86_400_000, "10", "paid", "Nope", "X", 3.0),
                testkit::play_event(TS + 86_400_000, "10", "paid", "U", "X", 180.5),
            ],
        )
        .unwrap();
    }

    #[test]
    fn run_loads_songs_then_logs() {
        let temp = tempfile::tempdir().unwrap();
        seed(temp.path());
        let mut store = Store::open_in_memory().unwrap();
        let mut progress = Recorder::default();

        let summary = run(&mut store, &config(temp.path()), &mut progress).unwrap();

        assert_eq!(summary.passes.len(), 2);
        assert_eq!(summary.passes[0].kind, "song");
        assert_eq!(summary.passes[0].files, 2);
        assert_eq!(summary.passes[1].kind, "log");
        assert_eq!(summary.passes[1].files, 2);
        assert_eq!(
            progress.lines,
            vec!["found 2", "1/2", "2/2", "found 2", "1/2", "2/2"]
        );

        let totals = summary.totals();
        assert_eq!(totals.songs, 2);
        assert_eq!(totals.songplays, 3);
        assert_eq!(totals.songplays_matched, 2);

        let status = store.status().unwrap();
        assert_eq!(status.artists_count, 1);
        assert_eq!(status.songs_count, 2);
        assert_eq!(status.time_count, 2);
        assert_eq!(status.users_count, 1);
        assert_eq!(status.songplays_count, 3);
        assert_eq!(status.songplays_matched, 2);
        assert_eq!(store.fetch_user(10).unwrap().unwrap().level, "paid");
    }

    #[test]
    fn rerun_duplicates_only_songplays() {
        let temp = tempfile::tempdir().unwrap();
        seed(temp.path());
        let mut store = Store::open_in_memory().unwrap();
        let cfg = config(temp.path());

        run(&mut store, &cfg, &mut ()).unwrap();
        run(&mut store, &cfg, &mut ()).unwrap();

        let status = store.status().unwrap();
        assert_eq!(status.artists_count, 1);
        assert_eq!(status.songs_count, 2);
        assert_eq!(status.time_count, 2);
        assert_eq!(status.users_count, 1);
        assert_eq!(status.songplays_count, 6);
    }

    #[test]
    fn failure_keeps_earlier_files_and_rolls_back_the_bad_one() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        testkit::write_log_file(
            root,
            "logs/a.json",
            &[testkit::play_event(TS, "10", "free", "T", "X", 1.0)],
        )
        .unwrap();
        let bad = root.join("logs/b.json");
        let good_line = serde_json::to_string(&testkit::play_event(
            TS + 1000,
            "11",
            "free",
            "T",
            "X",
            1.0,
        ))
        .unwrap();
        std::fs::write(&bad, format!("{good_line}\n{{broken\n")).unwrap();
        testkit::write_log_file(
            root,
            "logs/c.json",
            &[testkit::play_event(TS + 2000, "12", "free", "T", "X", 1.0)],
        )
        .unwrap();

        let mut store = Store::open_in_memory().unwrap();
        let mut progress = Recorder::default();
        let err = process_data(&mut store, &root.join("logs"), &LogFileLoader, &mut progress)
            .unwrap_err();

        assert!(matches!(err, PlaylogError::Parse(_)));
        assert!(err.to_string().contains("b.json:2"));
        assert_eq!(progress.lines, vec!["found 3", "1/3"]);

        let status = store.status().unwrap();
        assert_eq!(status.songplays_count, 1);
        assert_eq!(status.users_count, 1);
        assert_eq!(status.time_count, 1);
    }

    #[test]
    fn missing_root_fails_before_any_insert() {
        let temp = tempfile::tempdir().unwrap();
        testkit::write_log_file(
            temp.path(),
            "log_data/a.json",
            &[testkit::play_event(TS, "10", "free", "T", "X", 1.0)],
        )
        .unwrap();
        let cfg = Config {
            song_data_dir: PathBuf::from("/definitely/not/here"),
            ..config(temp.path())
        };

        let mut store = Store::open_in_memory().unwrap();
        let err = run(&mut store, &cfg, &mut ()).unwrap_err();
        assert!(matches!(err, PlaylogError::Discovery(_)));
        assert_eq!(store.status().unwrap().songplays_count, 0);
    }

    #[test]
    fn empty_roots_produce_empty_passes() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join("song_data")).unwrap();
        std::fs::create_dir_all(temp.path().join("log_data")).unwrap();

        let mut store = Store::open_in_memory().unwrap();
        let summary = run(&mut store, &config(temp.path()), &mut ()).unwrap();
        assert!(summary.passes.iter().all(|p| p.files == 0));
        assert_eq!(summary.totals(), LoadStats::default());
    }
}
