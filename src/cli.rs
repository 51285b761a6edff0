// src/cli.rs
use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};

use crate::{
    config::options::{AppOptions, ExportFormat, ExportType, PipelineOptions},
    file,
    oracle::{BoxScoreFile, MinutesOracle, NoOracle},
    progress::LogProgress,
    runner::{self, Inputs},
    store,
    teams::LineupTable,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Format {
    Csv,
    Tsv,
    Jsonl,
}

impl From<Format> for ExportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Csv => ExportFormat::Csv,
            Format::Tsv => ExportFormat::Tsv,
            Format::Jsonl => ExportFormat::Jsonl,
        }
    }
}

/// Turn play-by-play transcripts into typed events with both on-court lineups.
#[derive(Parser, Debug)]
#[command(name = "bb_plays", version, about)]
pub struct Args {
    /// Transcript lines (.csv, .tsv or .jsonl) with game_id, sequence_index, raw_text[, player_ids].
    #[arg(long, short = 't')]
    pub transcript: PathBuf,

    /// Games table with game_id, home_team, away_team.
    #[arg(long, short = 'g')]
    pub games: PathBuf,

    /// Player-to-team table (game_id, player_id, team_id). Used for jump balls.
    #[arg(long)]
    pub lineups: Option<PathBuf>,

    /// Box-score minutes JSON used to backfill silent players.
    #[arg(long)]
    pub box_scores: Option<PathBuf>,

    /// Output file (single) or directory (--per-game).
    #[arg(long, short = 'o')]
    pub out: Option<String>,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    pub format: Format,

    /// One file per game instead of a single merged file.
    #[arg(long)]
    pub per_game: bool,

    /// Write a header row (CSV/TSV).
    #[arg(long)]
    pub include_headers: bool,

    /// Games assembled concurrently.
    #[arg(long, short = 'w')]
    pub workers: Option<usize>,

    /// Give up on one box-score lookup after this many milliseconds (0 waits forever).
    #[arg(long)]
    pub oracle_timeout_ms: Option<u64>,

    /// Skip the backwards-clock check.
    #[arg(long)]
    pub lenient_clock: bool,

    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Append log lines to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn options(&self) -> AppOptions {
        let mut pipeline = PipelineOptions::default();
        if let Some(w) = self.workers {
            pipeline.workers = w.max(1);
        }
        if let Some(ms) = self.oracle_timeout_ms {
            pipeline.oracle_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        pipeline.strict_clock = !self.lenient_clock;

        let mut app = AppOptions { pipeline, ..Default::default() };
        app.export.format = self.format.into();
        app.export.include_headers = self.include_headers;
        if self.per_game {
            app.export.export_type = ExportType::PerGame;
        }
        if let Some(out) = &self.out {
            app.export.set_path(out);
        }
        app
    }
}

/// Parse arguments and run the whole batch. Failing games are reported, not fatal.
pub fn run() -> Result<()> {
    let args = Args::parse();
    crate::log::init(&args.log_level, args.log_file.as_deref()).wrap_err("could not open log file")?;
    let opts = args.options();

    let lines = store::load_transcript(&args.transcript)?;
    let games = store::load_games(&args.games)?;
    let lineups = match &args.lineups {
        Some(path) => store::load_lineups(path)?,
        None => LineupTable::new(),
    };
    let oracle: Arc<dyn MinutesOracle> = match &args.box_scores {
        Some(path) => {
            let bx = BoxScoreFile::load(path)?;
            logf!("Loaded box scores for {} game(s)", bx.games());
            Arc::new(bx)
        }
        None => Arc::new(NoOracle),
    };
    logf!("Read {} transcript line(s), {} game(s), {} lineup row(s)", lines.len(), games.len(), lineups.len());

    let inputs = Inputs::new(lines, games, Arc::new(lineups), oracle);
    let mut progress = LogProgress::default();
    let summary = runner::run(inputs, &opts.pipeline, Some(&mut progress));

    let written = file::export(&opts.export, &summary.results, &summary.failures)?;
    for path in &written.events {
        logd!("Wrote {}", path.display());
    }
    logf!(
        "{} event(s) from {} game(s) → {}",
        summary.event_count(),
        summary.results.len(),
        opts.export.out_path().display()
    );
    if let Some(path) = written.failures {
        logw!("{} game(s) failed, see {}", summary.failures.len(), path.display());
    }
    Ok(())
}
