// src/oracle.rs
//
// Minutes-played lookup used to backfill players the transcript never names.
// The lookup may be slow (a page fetch behind it); `TimedOracle` bounds it.

use std::{
    collections::HashMap,
    fs,
    path::Path,
    sync::{mpsc, Arc},
    thread,
    time::{Duration, Instant},
};

use serde::Deserialize;

use crate::{
    error::{OracleError, StoreError},
    event::PlayerId,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerMinutes {
    pub player_id: PlayerId,
    pub seconds: u32,
}

impl PlayerMinutes {
    pub fn new(player_id: &str, seconds: u32) -> Self {
        Self { player_id: s!(player_id), seconds }
    }
}

/// Per-period, per-player minutes for one team in one game.
///
/// `period` is a box-score name: `Game`, `Q1`..`Q4`, `OT1`... `Ok(None)` means
/// the period does not apply (the game never reached it), not a failure.
pub trait MinutesOracle: Send + Sync {
    fn minutes(
        &self,
        team_id: &str,
        game_id: &str,
        period: &str,
    ) -> Result<Option<Vec<PlayerMinutes>>, OracleError>;
}

/// No box scores configured: every period is "not applicable".
pub struct NoOracle;

impl MinutesOracle for NoOracle {
    fn minutes(&self, _: &str, _: &str, _: &str) -> Result<Option<Vec<PlayerMinutes>>, OracleError> {
        Ok(None)
    }
}

/* ---------------- JSON-backed box scores ---------------- */

// game_id → team_id → period → [(player_id, "m:ss")]
type RawBoxScores = HashMap<String, HashMap<String, HashMap<String, Vec<(String, String)>>>>;

#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct BoxScoreFile {
    games: RawBoxScores,
}

impl BoxScoreFile {
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let text = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        Self::from_json(&text).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            line: source.line(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn games(&self) -> usize {
        self.games.len()
    }
}

impl MinutesOracle for BoxScoreFile {
    fn minutes(
        &self,
        team_id: &str,
        game_id: &str,
        period: &str,
    ) -> Result<Option<Vec<PlayerMinutes>>, OracleError> {
        let Some(rows) = self
            .games
            .get(game_id)
            .and_then(|teams| teams.get(team_id))
            .and_then(|periods| periods.get(period))
        else {
            return Ok(None);
        };

        let mut out = Vec::with_capacity(rows.len());
        for (player_id, played) in rows {
            let seconds = parse_minutes(played).ok_or_else(|| OracleError::Malformed {
                game_id: s!(game_id),
                team_id: s!(team_id),
                period: s!(period),
                reason: format!("bad minutes {played:?} for {player_id}"),
            })?;
            out.push(PlayerMinutes { player_id: player_id.clone(), seconds });
        }
        Ok(Some(out))
    }
}

/// `m:ss` → seconds. A blank cell (did not play) is zero.
pub fn parse_minutes(text: &str) -> Option<u32> {
    let t = text.trim();
    if t.is_empty() {
        return Some(0);
    }
    let (m, s) = t.split_once(':')?;
    let m: u32 = m.trim().parse().ok()?;
    let s: u32 = s.trim().parse().ok()?;
    if s >= 60 {
        return None;
    }
    m.checked_mul(60)?.checked_add(s)
}

/* ---------------- Bounded lookups ---------------- */

/// Runs each lookup on its own thread and gives up after `timeout`.
/// An abandoned lookup finishes in the background; its answer is dropped.
pub struct TimedOracle {
    inner: Arc<dyn MinutesOracle>,
    timeout: Duration,
}

impl TimedOracle {
    pub fn new(inner: Arc<dyn MinutesOracle>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl MinutesOracle for TimedOracle {
    fn minutes(
        &self,
        team_id: &str,
        game_id: &str,
        period: &str,
    ) -> Result<Option<Vec<PlayerMinutes>>, OracleError> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let (team, game, name) = (s!(team_id), s!(game_id), s!(period));
        let started = Instant::now();

        thread::spawn(move || {
            let _ = tx.send(inner.minutes(&team, &game, &name));
        });

        match rx.recv_timeout(self.timeout) {
            Ok(result) => {
                logd!("oracle {game_id}/{team_id}/{period} answered in {:?}", started.elapsed());
                result
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                Err(OracleError::Timeout(self.timeout.as_millis()))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(OracleError::Unavailable(s!("lookup thread stopped without answering")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOX: &str = r#"{
        "g1": { "HOM": {
            "Game": [["a", "48:00"], ["b", "36:30"]],
            "Q1":   [["a", "12:00"], ["b", ""]]
        } }
    }"#;

    #[test]
    fn reads_nested_box_scores() {
        let bx = BoxScoreFile::from_json(BOX).unwrap();
        assert_eq!(bx.games(), 1);
        let q1 = bx.minutes("HOM", "g1", "Q1").unwrap().unwrap();
        assert_eq!(q1, vec![PlayerMinutes::new("a", 720), PlayerMinutes::new("b", 0)]);
        assert!(bx.minutes("HOM", "g1", "OT1").unwrap().is_none());
        assert!(bx.minutes("AWY", "g1", "Q1").unwrap().is_none());
    }

    #[test]
    fn bad_minutes_are_malformed() {
        let bx = BoxScoreFile::from_json(r#"{"g": {"T": {"Q1": [["a", "twelve"]]}}}"#).unwrap();
        assert!(matches!(bx.minutes("T", "g", "Q1"), Err(OracleError::Malformed { .. })));
    }

    struct Slow;
    impl MinutesOracle for Slow {
        fn minutes(&self, _: &str, _: &str, _: &str) -> Result<Option<Vec<PlayerMinutes>>, OracleError> {
            thread::sleep(Duration::from_millis(500));
            Ok(None)
        }
    }

    #[test]
    fn timed_oracle_gives_up() {
        let timed = TimedOracle::new(Arc::new(Slow), Duration::from_millis(20));
        assert!(matches!(timed.minutes("T", "g", "Q1"), Err(OracleError::Timeout(20))));

        let quick = TimedOracle::new(Arc::new(NoOracle), Duration::from_secs(5));
        assert!(quick.minutes("T", "g", "Q1").unwrap().is_none());
    }

    #[test]
    fn minutes_format() {
        assert_eq!(parse_minutes("11:59"), Some(719));
        assert_eq!(parse_minutes(" "), Some(0));
        assert_eq!(parse_minutes("5:75"), None);
        assert_eq!(parse_minutes("99999999:00"), None);
    }
}
