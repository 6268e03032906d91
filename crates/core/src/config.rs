use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PlaylogError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub song_data_dir: PathBuf,
    pub log_data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let data_root = env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(home).join(".local/share"));

        Self {
            db_path: data_root.join("playlog/playlog.duckdb"),
            song_data_dir: PathBuf::from("data/song_data"),
            log_data_dir: PathBuf::from("data/log_data"),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(file_overrides) = load_file_overrides(&config_file_path())? {
            apply_overrides(&mut cfg, file_overrides);
        }
        apply_overrides(&mut cfg, load_env_overrides());
        Ok(cfg)
    }

    pub fn with_db_path(mut self, db_path: Option<PathBuf>) -> Self {
        if let Some(v) = db_path {
            self.db_path = v;
        }
        self
    }

    pub fn with_song_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(v) = dir {
            self.song_data_dir = v;
        }
        self
    }

    pub fn with_log_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(v) = dir {
            self.log_data_dir = v;
        }
        self
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigOverrides {
    db_path: Option<PathBuf>,
    song_data_dir: Option<PathBuf>,
    log_data_dir: Option<PathBuf>,
}

fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var("PLAYLOG_CONFIG") {
        return PathBuf::from(path);
    }

    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let config_home = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(home).join(".config"));
    config_home.join("playlog/config.toml")
}

fn load_file_overrides(path: &Path) -> Result<Option<ConfigOverrides>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| PlaylogError::Config(format!("failed reading {}: {e}", path.display())))?;
    parse_overrides(&raw)
        .map(Some)
        .map_err(|e| PlaylogError::Config(format!("failed parsing {}: {e}", path.display())))
}

fn parse_overrides(raw: &str) -> std::result::Result<ConfigOverrides, toml::de::Error> {
    toml::from_str(raw)
}

fn load_env_overrides() -> ConfigOverrides {
    ConfigOverrides {
        db_path: env::var("PLAYLOG_DB_PATH").ok().map(PathBuf::from),
        song_data_dir: env::var("PLAYLOG_SONG_DATA").ok().map(PathBuf::from),
        log_data_dir: env::var("PLAYLOG_LOG_DATA").ok().map(PathBuf::from),
    }
}

fn apply_overrides(cfg: &mut Config, overrides: ConfigOverrides) {
    if let Some(v) = overrides.db_path {
        cfg.db_path = v;
    }
    if let Some(v) = overrides.song_data_dir {
        cfg.song_data_dir = v;
    }
    if let Some(v) = overrides.log_data_dir {
        cfg.log_data_dir = v;
    }
}
