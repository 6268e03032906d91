mod output;
mod telemetry;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use playlog_core::config::Config;
use playlog_etl::pipeline;
use playlog_etl::{RunSummary, StdoutProgress};
use playlog_store::Store;
use serde::Serialize;

use crate::output::{print_run_summary_human, print_songplays_human, print_status_human};
use crate::telemetry::init_cli_tracing;

#[derive(Parser, Debug)]
#[command(name = "playlog")]
#[command(about = "Load song metadata and listening logs into a DuckDB star schema")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,

    #[arg(long, global = true)]
    json: bool,
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    #[arg(long)]
    db_path: Option<PathBuf>,
    #[arg(long, help = "Root of the song-metadata tree")]
    song_data: Option<PathBuf>,
    #[arg(long, help = "Root of the activity-log tree")]
    log_data: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Load both data trees (the default command)")]
    Run(RunArgs),
    #[command(about = "Drop and recreate every table")]
    Init {
        #[arg(long)]
        db_path: Option<PathBuf>,
    },
    #[command(about = "Show row counts per table")]
    Status {
        #[arg(long)]
        db_path: Option<PathBuf>,
    },
    #[command(about = "List loaded songplays in insertion order")]
    Plays {
        #[arg(long)]
        db_path: Option<PathBuf>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Debug, Serialize)]
struct InitResponse {
    db_path: String,
    reset: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_tracing(cli.json);

    let cfg = Config::load().context("failed to load configuration")?;
    let json = cli.json;

    match cli.command.unwrap_or(Commands::Run(cli.run)) {
        Commands::Run(args) => {
            let cfg = cfg
                .with_db_path(args.db_path)
                .with_song_data_dir(args.song_data)
                .with_log_data_dir(args.log_data);
            let summary = run_pipeline(&cfg, json)?;
            print_or_json(&summary, json, print_run_summary_human)
        }
        Commands::Init { db_path } => {
            let store = open_store(&cfg.with_db_path(db_path))?;
            store.reset_schema().context("schema reset failed")?;
            let response = InitResponse {
                db_path: store.db_path().to_string(),
                reset: true,
            };
            print_or_json(&response, json, |v| {
                println!("schema reset at {}", v.db_path);
            })
        }
        Commands::Status { db_path } => {
            let store = open_store(&cfg.with_db_path(db_path))?;
            let status = store.status().context("status query failed")?;
            print_or_json(&status, json, print_status_human)
        }
        Commands::Plays { db_path, limit } => {
            let store = open_store(&cfg.with_db_path(db_path))?;
            let rows = store
                .fetch_songplays(limit)
                .context("songplay query failed")?;
            print_or_json(&rows, json, |v| print_songplays_human(v))
        }
    }
}

fn open_store(cfg: &Config) -> anyhow::Result<Store> {
    Store::open(&cfg.db_path)
        .with_context(|| format!("failed to open database {}", cfg.db_path.display()))
}

fn run_pipeline(cfg: &Config, json: bool) -> anyhow::Result<RunSummary> {
    let mut store = open_store(cfg)?;
    let summary = if json {
        pipeline::run(&mut store, cfg, &mut ())
    } else {
        pipeline::run(&mut store, cfg, &mut StdoutProgress)
    };
    Ok(summary?)
}

fn print_or_json<T: Serialize>(
    value: &T,
    json: bool,
    human: impl FnOnce(&T),
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human(value);
    }
    Ok(())
}
