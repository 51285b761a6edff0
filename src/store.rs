// src/store.rs
//
// File-backed inputs: transcript lines, games, lineup table. Each loader picks
// the reader from the file extension (`.jsonl`/`.json`, `.tsv`, else CSV).

use std::{collections::HashMap, fs, path::Path};

use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    classify::{split_player_ids, TranscriptLine},
    csv::Table,
    error::StoreError,
    teams::{GameInfo, LineupTable},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
    Tsv,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json" | "jsonl" | "ndjson") => InputFormat::Json,
            Some("tsv" | "tab") => InputFormat::Tsv,
            _ => InputFormat::Csv,
        }
    }

    fn sep(self) -> char {
        if self == InputFormat::Tsv { '\t' } else { ',' }
    }
}

fn read(path: &Path) -> Result<String, StoreError> {
    fs::read_to_string(path).map_err(|e| StoreError::io(path, e))
}

/* ---------------- JSON ---------------- */

/// A JSON array, or one JSON value per non-blank line.
fn parse_json<T: DeserializeOwned>(path: &Path, text: &str) -> Result<Vec<T>, StoreError> {
    let json_err = |line: usize, source| StoreError::Json { path: path.to_path_buf(), line, source };

    if text.trim_start().starts_with('[') {
        return serde_json::from_str(text).map_err(|e| json_err(e.line(), e));
    }
    let mut out = Vec::new();
    for (n, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        out.push(serde_json::from_str(line).map_err(|e| json_err(n + 1, e))?);
    }
    Ok(out)
}

/* ---------------- Delimited ---------------- */

struct Columns<'a> {
    path: &'a Path,
    table: Table,
}

impl<'a> Columns<'a> {
    fn new(path: &'a Path, text: &str, sep: char) -> Self {
        Self { path, table: Table::parse(text, sep) }
    }

    fn require(&self, name: &str) -> Result<usize, StoreError> {
        self.table.column(name).ok_or_else(|| StoreError::Format {
            path: self.path.to_path_buf(),
            line: 1,
            reason: format!("missing column {name:?}"),
        })
    }

    fn bad(&self, line: usize, reason: String) -> StoreError {
        StoreError::Format { path: self.path.to_path_buf(), line, reason }
    }
}

fn cell(row: &[String], ix: usize) -> &str {
    row.get(ix).map(|s| s.trim()).unwrap_or("")
}

/* ---------------- Transcript ---------------- */

pub fn load_transcript(path: &Path) -> Result<Vec<TranscriptLine>, StoreError> {
    let text = read(path)?;
    match InputFormat::from_path(path) {
        InputFormat::Json => parse_json(path, &text),
        fmt => parse_transcript_table(path, &text, fmt.sep()),
    }
}

pub fn parse_transcript_table(path: &Path, text: &str, sep: char) -> Result<Vec<TranscriptLine>, StoreError> {
    let cols = Columns::new(path, text, sep);
    let game = cols.require("game_id")?;
    let seq = cols.require("sequence_index")?;
    let raw = cols.require("raw_text")?;
    let ids = cols.table.column("player_ids");

    let mut out = Vec::with_capacity(cols.table.rows.len());
    for (n, row) in cols.table.rows.iter().enumerate() {
        let line_no = n + 2;
        let sequence_index = cell(row, seq)
            .parse()
            .map_err(|_| cols.bad(line_no, format!("bad sequence_index {:?}", cell(row, seq))))?;
        out.push(TranscriptLine {
            game_id: s!(cell(row, game)),
            sequence_index,
            // Raw text keeps its spacing; side detection depends on it.
            raw_text: row.get(raw).cloned().unwrap_or_default(),
            player_ids: ids.and_then(|ix| split_player_ids(cell(row, ix))),
        });
    }
    Ok(out)
}

/// Lines grouped per game in first-appearance order, each sorted by sequence index.
pub fn group_by_game(lines: Vec<TranscriptLine>) -> Vec<(String, Vec<TranscriptLine>)> {
    let mut order: Vec<String> = Vec::new();
    let mut by_game: HashMap<String, Vec<TranscriptLine>> = HashMap::new();
    for line in lines {
        if !by_game.contains_key(&line.game_id) {
            order.push(line.game_id.clone());
        }
        by_game.entry(line.game_id.clone()).or_default().push(line);
    }
    order
        .into_iter()
        .map(|id| {
            let mut v = by_game.remove(&id).unwrap_or_default();
            v.sort_by_key(|l| l.sequence_index);
            (id, v)
        })
        .collect()
}

/* ---------------- Games ---------------- */

pub fn load_games(path: &Path) -> Result<Vec<GameInfo>, StoreError> {
    let text = read(path)?;
    match InputFormat::from_path(path) {
        InputFormat::Json => parse_json(path, &text),
        fmt => {
            let cols = Columns::new(path, &text, fmt.sep());
            let (g, h, a) = (cols.require("game_id")?, cols.require("home_team")?, cols.require("away_team")?);
            Ok(cols
                .table
                .rows
                .iter()
                .map(|r| GameInfo {
                    game_id: s!(cell(r, g)),
                    home_team: s!(cell(r, h)),
                    away_team: s!(cell(r, a)),
                })
                .collect())
        }
    }
}

/* ---------------- Lineups ---------------- */

#[derive(Deserialize)]
struct LineupRow {
    game_id: String,
    player_id: String,
    team_id: String,
}

pub fn load_lineups(path: &Path) -> Result<LineupTable, StoreError> {
    let text = read(path)?;
    let mut table = LineupTable::new();
    match InputFormat::from_path(path) {
        InputFormat::Json => {
            for r in parse_json::<LineupRow>(path, &text)? {
                table.insert(&r.game_id, &r.player_id, &r.team_id);
            }
        }
        fmt => {
            let cols = Columns::new(path, &text, fmt.sep());
            let (g, p, t) = (cols.require("game_id")?, cols.require("player_id")?, cols.require("team_id")?);
            for r in &cols.table.rows {
                table.insert(cell(r, g), cell(r, p), cell(r, t));
            }
        }
    }
    Ok(table)
}
