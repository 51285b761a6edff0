// src/game.rs
//
// One game, start to finish: classify → period/boundary tidy → score →
// rosters. Everything here is synchronous; the only blocking call is the
// oracle behind the backfill.

use std::fmt;

use serde::Serialize;

use crate::{
    classify::{classify, TranscriptLine},
    config::options::PipelineOptions,
    error::GameError,
    event::{Event, EventKind, Period},
    lineup::{self, Backfilled},
    oracle::MinutesOracle,
    score,
    teams::{GameContext, GameInfo, TeamLookup},
};

/// Recoverable oddities found while assembling a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum GameWarning {
    /// A line no rule recognised; it contributes no events.
    UnrecognizedLine { sequence_index: u32, text: String },
    /// The clock ran forward within a period.
    ClockOrder { sequence_index: u32 },
    /// Events appeared before any "Start of" line; they were put in the 1st quarter.
    MissingPeriodStart,
    /// Possession team of a jump ball was not in the lineup table.
    JumpBallUnresolved { sequence_index: u32 },
}

impl fmt::Display for GameWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameWarning::UnrecognizedLine { sequence_index, text } => {
                write!(f, "line #{sequence_index} not recognized: {text:?}")
            }
            GameWarning::ClockOrder { sequence_index } => {
                write!(f, "line #{sequence_index}: clock runs backwards")
            }
            GameWarning::MissingPeriodStart => f.write_str("events before the first period start"),
            GameWarning::JumpBallUnresolved { sequence_index } => {
                write!(f, "line #{sequence_index}: jump ball team unresolved")
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct GameResult {
    pub game_id: String,
    pub events: Vec<Event>,
    pub warnings: Vec<GameWarning>,
    pub backfilled: Vec<Backfilled>,
}

/// Assemble one game. `lines` must be in transcript order.
pub fn assemble(
    game: &GameInfo,
    lines: &[TranscriptLine],
    lineups: &dyn TeamLookup,
    oracle: &dyn MinutesOracle,
    opts: &PipelineOptions,
) -> Result<GameResult, GameError> {
    let game_id = game.game_id.as_str();
    if lines.is_empty() {
        return Err(GameError::EmptyTranscript { game_id: s!(game_id) });
    }
    let ctx = GameContext::new(game, lineups);
    let mut warnings = Vec::new();

    // Sequence index of the line each event came from.
    let mut events: Vec<Event> = Vec::with_capacity(lines.len() * 2);
    let mut origin: Vec<u32> = Vec::with_capacity(lines.len() * 2);

    for line in lines {
        match classify(line, &ctx, events.last()) {
            Ok(evs) => {
                for ev in evs {
                    if ev.kind == EventKind::JumpBall && ev.team_id.is_none() {
                        logw!("{game_id} #{}: jump ball possession team not found", line.sequence_index);
                        warnings.push(GameWarning::JumpBallUnresolved { sequence_index: line.sequence_index });
                    }
                    origin.push(line.sequence_index);
                    events.push(ev);
                }
            }
            Err(e) => {
                logw!("{game_id}: {e}");
                warnings.push(GameWarning::UnrecognizedLine {
                    sequence_index: e.sequence_index,
                    text: e.text,
                });
            }
        }
    }

    if fill_periods(&mut events) {
        logw!("{game_id}: events before the first period start, assuming 1st quarter");
        warnings.push(GameWarning::MissingPeriodStart);
    }
    if opts.strict_clock {
        for ix in clock_anomalies(&events) {
            logw!("{game_id} #{}: clock runs backwards", origin[ix]);
            warnings.push(GameWarning::ClockOrder { sequence_index: origin[ix] });
        }
    }
    tidy_boundaries(&mut events, &ctx);
    score::annotate(&mut events, &ctx);

    let backfilled = lineup::assign(&mut events, &ctx, oracle, opts.backfill)?;

    Ok(GameResult { game_id: s!(game_id), events, warnings, backfilled })
}

/* ---------------- Periods and boundaries ---------------- */

/// Carry each "Start of" period forward. Returns whether any event had to
/// default to the 1st quarter.
pub fn fill_periods(events: &mut [Event]) -> bool {
    let mut current: Option<Period> = None;
    let mut defaulted = false;
    for ev in events.iter_mut() {
        if ev.kind == EventKind::PeriodStart {
            current = ev.period;
        }
        match current {
            Some(p) => ev.period = Some(p),
            None => {
                ev.period = Some(Period::Quarter(1));
                defaulted = true;
            }
        }
    }
    defaulted
}

/// Indices whose clock is later than the previous event's in the same period.
pub fn clock_anomalies(events: &[Event]) -> Vec<usize> {
    events
        .windows(2)
        .enumerate()
        .filter(|(_, w)| {
            let (prev, cur) = (&w[0], &w[1]);
            cur.kind != EventKind::PeriodStart
                && prev.period == cur.period
                && cur.clock > prev.clock
        })
        .map(|(i, _)| i + 1)
        .collect()
}

/// Give boundary events a team: a start belongs to whoever acts next; an end
/// to whoever acted last, unless that act gave the ball away.
pub fn tidy_boundaries(events: &mut [Event], ctx: &GameContext<'_>) {
    for i in 0..events.len() {
        match events[i].kind {
            EventKind::PeriodStart => {
                let team = events.get(i + 1).and_then(|n| n.team_id.clone());
                events[i].team_id = team;
            }
            EventKind::PeriodEnd if i > 0 => {
                let prev = &events[i - 1];
                let handed_over = prev.possession_flag || prev.kind == EventKind::Assist;
                let team = match prev.team_id.as_deref() {
                    Some(t) if handed_over => ctx.other_team(t).map(String::from),
                    other => other.map(String::from),
                };
                events[i].team_id = team;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Clock;
    use crate::teams::LineupTable;

    fn at(kind: EventKind, clock: &str) -> Event {
        Event::new("g1", Clock::parse(clock).unwrap(), kind)
    }

    #[test]
    fn periods_fill_forward_and_default() {
        let mut start = at(EventKind::PeriodStart, "12:00");
        start.period = Some(Period::Quarter(2));
        let mut evs = vec![at(EventKind::Violation, "12:00"), start, at(EventKind::Timeout, "11:00")];
        assert!(fill_periods(&mut evs));
        assert_eq!(evs[0].period, Some(Period::Quarter(1)));
        assert_eq!(evs[2].period, Some(Period::Quarter(2)));
    }

    #[test]
    fn clock_going_up_is_flagged() {
        let mut evs = vec![
            at(EventKind::Timeout, "11:00"),
            at(EventKind::Timeout, "11:30"),
            at(EventKind::Timeout, "10:00"),
        ];
        fill_periods(&mut evs);
        assert_eq!(clock_anomalies(&evs), vec![1]);
    }

    #[test]
    fn period_end_goes_to_team_receiving_the_ball() {
        let g = GameInfo { game_id: s!("g1"), home_team: s!("HOM"), away_team: s!("AWY") };
        let table = LineupTable::new();
        let ctx = GameContext::new(&g, &table);

        let mut make = at(EventKind::Make(crate::event::ShotType::FieldGoal), "0:01");
        make.team_id = Some(s!("HOM"));
        make.possession_flag = true;
        let mut first = at(EventKind::Violation, "11:50");
        first.team_id = Some(s!("AWY"));

        let mut evs = vec![
            at(EventKind::PeriodStart, "12:00"),
            first,
            make,
            at(EventKind::PeriodEnd, "0:00"),
        ];
        tidy_boundaries(&mut evs, &ctx);
        assert_eq!(evs[0].team_id.as_deref(), Some("AWY"));
        assert_eq!(evs[3].team_id.as_deref(), Some("AWY"));
    }
}
