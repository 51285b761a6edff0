// src/error.rs
//
// Errors are scoped the way the pipeline fails: a line, an oracle call, a
// game, or the inputs of the whole batch. Only `StoreError` stops a run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::event::Period;

/// A transcript line none of the rules recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized line #{sequence_index}: {text:?}")]
pub struct ClassifyError {
    pub sequence_index: u32,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle lookup timed out after {0} ms")]
    Timeout(u128),

    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    #[error("unparseable box score for {team_id} in {game_id} ({period}): {reason}")]
    Malformed {
        game_id: String,
        team_id: String,
        period: String,
        reason: String,
    },
}

/// Why one game could not be assembled. Never aborts the batch.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("{game_id}: {team_id} has {found} distinct players in {period}, expected 5")]
    LineupIncomplete {
        game_id: String,
        period: Period,
        team_id: String,
        found: usize,
    },

    #[error("{game_id}: backfill lookup failed for {team_id} in {period}: {source}")]
    Oracle {
        game_id: String,
        period: Period,
        team_id: String,
        #[source]
        source: OracleError,
    },

    #[error("{game_id}: no game context (home/away teams) supplied")]
    UnknownGame { game_id: String },

    #[error("{game_id}: transcript is empty")]
    EmptyTranscript { game_id: String },

    #[error("{game_id}: worker stopped before reporting a result")]
    WorkerLost { game_id: String },
}

impl GameError {
    pub fn game_id(&self) -> &str {
        match self {
            GameError::LineupIncomplete { game_id, .. }
            | GameError::Oracle { game_id, .. }
            | GameError::UnknownGame { game_id }
            | GameError::EmptyTranscript { game_id }
            | GameError::WorkerLost { game_id } => game_id,
        }
    }
}

/// Input/output failures around the pipeline.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}:{line}: {source}")]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}:{line}: {reason}")]
    Format {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io { path: path.into(), source }
    }
}
