// src/config/consts.rs

// Court
pub const ON_COURT: usize = 5;
pub const ROSTER_SEP: char = '|';

// Period lengths (seconds)
pub const QUARTER_SECS: u32 = 720;
pub const OVERTIME_SECS: u32 = 300;

// Backfill window around the period length: a player who sat the whole
// period on court shows up within these bounds in the box score.
pub const BACKFILL_SLACK_BELOW_SECS: u32 = 1;
pub const BACKFILL_SLACK_ABOVE_SECS: u32 = 2;

// Box-score period names the oracle is asked about
pub const BOX_GAME: &str = "Game";
pub const MAX_OVERTIMES: u8 = 10;

// Fouls described from the fouled player's side of the transcript
pub const REVERSED_FOULS: &[&str] = &[
    "Away from play foul",
    "Clear path foul",
    "Def 3 sec tech foul",
    "Flagrant foul",
    "Inbound foul",
    "Offensive charge foul",
    "Personal foul",
    "Personal block foul",
    "Personal take foul",
    "Shooting foul",
    "Shooting block foul",
];

// Team placeholder used by the transcript for non-player actions
pub const TEAM_ACTOR: &str = "Team";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE: &str = "plays";
pub const FAILURES_FILE: &str = "failures";
pub const PLAYER_IDS_SEP: char = ';';

// Concurrency
pub const WORKERS: usize = 4;
pub const ORACLE_TIMEOUT_MS: u64 = 30_000;
