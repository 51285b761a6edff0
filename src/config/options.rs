// src/config/options.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppOptions {
    pub pipeline: PipelineOptions,
    pub export: ExportOptions,
}

/* ---------------- Pipeline ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Games processed concurrently; 1 runs everything on the caller's thread.
    pub workers: usize,
    /// Upper bound on one oracle lookup. `None` waits indefinitely.
    pub oracle_timeout: Option<Duration>,
    pub backfill: BackfillWindow,
    /// Flag clocks that run backwards within a period.
    pub strict_clock: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            workers: WORKERS,
            oracle_timeout: Some(Duration::from_millis(ORACLE_TIMEOUT_MS)),
            backfill: BackfillWindow::default(),
            strict_clock: true,
        }
    }
}

/// Seconds below/above the full period length a candidate may show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackfillWindow {
    pub below_secs: u32,
    pub above_secs: u32,
}

impl Default for BackfillWindow {
    fn default() -> Self {
        Self {
            below_secs: BACKFILL_SLACK_BELOW_SECS,
            above_secs: BACKFILL_SLACK_ABOVE_SECS,
        }
    }
}

impl BackfillWindow {
    pub fn accepts(&self, length_secs: u32, played_secs: i64) -> bool {
        let lo = i64::from(length_secs) - i64::from(self.below_secs);
        let hi = i64::from(length_secs) + i64::from(self.above_secs);
        (lo..=hi).contains(&played_secs)
    }
}

/* ---------------- Export ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportType {
    SingleFile,
    PerGame,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
    Jsonl,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Jsonl => "jsonl",
        }
    }

    /// Field separator; JSON lines have none.
    pub fn delim(&self) -> Option<char> {
        match self {
            ExportFormat::Csv => Some(','),
            ExportFormat::Tsv => Some('\t'),
            ExportFormat::Jsonl => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub export_type: ExportType,
    out_path: OutputPath,
    pub include_headers: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            export_type: ExportType::SingleFile,
            out_path: OutputPath::default(),
            include_headers: false,
        }
    }
}

impl ExportOptions {
    /// Single file: `<dir>/<stem>.<ext>`. Per game: the directory.
    pub fn out_path(&self) -> PathBuf {
        let mut path = self.out_path.dir.clone();
        if self.export_type == ExportType::SingleFile {
            let mut name = self.out_path.file_stem.clone();
            name.push(".");
            name.push(self.format.ext());
            path.push(name);
        }
        path
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_path.dir
    }

    /// Parse a user path into dir + stem. The extension follows the format.
    pub fn set_path(&mut self, text: &str) {
        let s = text.trim();

        match self.export_type {
            ExportType::SingleFile => {
                let p = Path::new(s);
                if let Some(parent) = p.parent() {
                    self.out_path.dir = parent.to_path_buf();
                }
                if let Some(stem) = p.file_stem() {
                    self.out_path.file_stem = stem.to_os_string();
                }
            }
            ExportType::PerGame => {
                self.out_path.dir = PathBuf::from(s);
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct OutputPath {
    dir: PathBuf,
    file_stem: OsString, // without extension
}

impl Default for OutputPath {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_stem: OsString::from(DEFAULT_FILE),
        }
    }
}
