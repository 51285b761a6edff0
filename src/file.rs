// src/file.rs

use std::{
    collections::HashMap,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{
    config::{
        consts::FAILURES_FILE,
        options::{ExportFormat, ExportOptions, ExportType},
    },
    core::sanitize::sanitize_filename,
    csv::{write_events, write_events_jsonl, write_row},
    error::StoreError,
    event::Event,
    game::GameResult,
    runner::GameFailure,
};

/// Paths written by one export.
#[derive(Clone, Debug, Default)]
pub struct Written {
    pub events: Vec<PathBuf>,
    pub failures: Option<PathBuf>,
}

/// Write results per `export`, plus a failure report next to them when any
/// game failed. Returns every path written.
pub fn export(
    export: &ExportOptions,
    results: &[GameResult],
    failures: &[GameFailure],
) -> Result<Written, StoreError> {
    let events = match export.export_type {
        ExportType::SingleFile => vec![write_export_single(export, results)?],
        ExportType::PerGame => write_export_per_game(export, results)?,
    };
    let failures = if failures.is_empty() {
        None
    } else {
        Some(write_failures(export.out_dir(), export.format, failures)?)
    };
    Ok(Written { events, failures })
}

/// All games into the single file named by `export.out_path()`, in input order.
pub fn write_export_single(export: &ExportOptions, results: &[GameResult]) -> Result<PathBuf, StoreError> {
    let path = export.out_path();
    ensure_parent(&path)?;

    let file = File::create(&path).map_err(|e| StoreError::io(&path, e))?;
    let mut out = BufWriter::new(file);
    let mut headers = export.include_headers;
    for result in results {
        write_game(&mut out, export.format, &result.events, headers).map_err(|e| StoreError::io(&path, e))?;
        headers = false;
    }
    if results.is_empty() {
        write_game(&mut out, export.format, &[], headers).map_err(|e| StoreError::io(&path, e))?;
    }
    out.flush().map_err(|e| StoreError::io(&path, e))?;
    Ok(path)
}

/// One file per game inside the directory implied by `export.out_path()`.
pub fn write_export_per_game(export: &ExportOptions, results: &[GameResult]) -> Result<Vec<PathBuf>, StoreError> {
    let outdir = export.out_path();
    ensure_directory(&outdir)?;

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut written = Vec::with_capacity(results.len());
    let ext = export.format.ext();

    for (n, result) in results.iter().enumerate() {
        let stem = sanitize_filename(&result.game_id, n + 1);
        let path = resolve_game_filename(&outdir, &stem, &mut seen, ext);

        let file = File::create(&path).map_err(|e| StoreError::io(&path, e))?;
        let mut out = BufWriter::new(file);
        write_game(&mut out, export.format, &result.events, export.include_headers)
            .and_then(|_| out.flush())
            .map_err(|e| StoreError::io(&path, e))?;
        written.push(path);
    }
    Ok(written)
}

fn write_game<W: Write>(w: W, format: ExportFormat, events: &[Event], headers: bool) -> std::io::Result<()> {
    match format.delim() {
        Some(sep) => write_events(w, events, headers, sep),
        None => write_events_jsonl(w, events),
    }
}

/// `failures.<ext>` with one `game_id, error` row per failed game.
pub fn write_failures(dir: &Path, format: ExportFormat, failures: &[GameFailure]) -> Result<PathBuf, StoreError> {
    ensure_directory(dir)?;
    let path = dir.join(format!("{FAILURES_FILE}.{}", format.ext()));
    let file = File::create(&path).map_err(|e| StoreError::io(&path, e))?;
    let mut out = BufWriter::new(file);

    let io = |e| StoreError::io(&path, e);
    match format.delim() {
        Some(sep) => {
            write_row(&mut out, &["game_id", "error"], sep).map_err(io)?;
            for f in failures {
                write_row(&mut out, &[f.game_id.as_str(), &f.error.to_string()], sep).map_err(io)?;
            }
        }
        None => {
            for f in failures {
                let line = serde_json::json!({ "game_id": f.game_id, "error": f.error.to_string() });
                writeln!(out, "{line}").map_err(io)?;
            }
        }
    }
    out.flush().map_err(io)?;
    Ok(path)
}

fn ensure_parent(path: &Path) -> Result<(), StoreError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory(parent),
        _ => Ok(()),
    }
}

pub fn ensure_directory(dir: &Path) -> Result<(), StoreError> {
    if dir.exists() && !dir.is_dir() {
        return Err(StoreError::NotADirectory(dir.to_path_buf()));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
    }
    Ok(())
}

/// Duplicate handling **only within this run**
pub fn resolve_game_filename(
    dir: &Path,
    stem: &str, // already sanitized, no extension
    seen_names: &mut HashMap<String, usize>,
    ext: &str,
) -> PathBuf {
    let count = seen_names.entry(stem.to_string()).or_insert(0);

    // First occurrence: "<stem>.ext"
    // Subsequent:       "<stem> (N).ext" with N starting at 2
    let filename = if *count == 0 {
        format!("{stem}.{ext}")
    } else {
        format!("{stem} ({}).{ext}", *count + 1)
    };

    *count += 1;
    dir.join(filename)
}
