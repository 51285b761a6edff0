// src/score.rs
use crate::{
    event::{Event, Score, Side},
    teams::GameContext,
};

/// Running home/away totals over made shots.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoreTracker {
    score: Score,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Count `ev` if it is a make for a known team; returns the total including it.
    pub fn record(&mut self, ev: &Event, ctx: &GameContext<'_>) -> Score {
        if ev.kind.is_make() {
            let points = ev.value.unwrap_or(0);
            match ev.team_id.as_deref().and_then(|t| ctx.side_of(t)) {
                Some(Side::Home) => self.score.home += points,
                Some(Side::Away) => self.score.away += points,
                None => {}
            }
        }
        self.score
    }
}

/// Stamp every event with the cumulative score up to and including it.
pub fn annotate(events: &mut [Event], ctx: &GameContext<'_>) {
    let mut tracker = ScoreTracker::new();
    for ev in events.iter_mut() {
        ev.score = Some(tracker.record(ev, ctx));
    }
}
