// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod classify;
pub mod config;
pub mod core;
pub mod csv;
pub mod error;
pub mod event;
pub mod file;
pub mod game;
pub mod lineup;
pub mod oracle;
pub mod progress;
pub mod roster;
pub mod runner;
pub mod score;
pub mod store;
pub mod teams;

#[cfg(feature = "cli")]
pub mod cli;

pub use classify::{classify, TranscriptLine};
pub use error::{ClassifyError, GameError, OracleError, StoreError};
pub use event::{Clock, Detail, Event, EventKind, Period, Score};
pub use game::{assemble, GameResult, GameWarning};
pub use roster::RosterKey;
pub use teams::{GameContext, GameInfo, LineupTable, TeamLookup};
