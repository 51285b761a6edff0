// src/lineup/mod.rs
//
// Roster for every event: reconstruct per (period, team), validate, backfill
// what the transcript never names, then hand each event both teams' keys.

pub mod backfill;
pub mod reconstruct;
pub mod validate;

use crate::{
    config::{consts::ON_COURT, options::BackfillWindow},
    error::GameError,
    event::{Event, Period, PlayerId, Side, TeamId},
    oracle::MinutesOracle,
    roster::RosterKey,
    teams::GameContext,
};

pub use reconstruct::{apply_substitution, backward_pass, fill_down, invert_substitution, reconstruct};
pub use validate::validate;

/// Players injected from the box score for one period and team.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Backfilled {
    pub period: Period,
    pub team_id: TeamId,
    pub players: Vec<PlayerId>,
}

/// One team's events in one period and their roster slots, index-aligned.
#[derive(Clone, Debug)]
pub struct TeamPeriod {
    pub period: Period,
    pub team_id: TeamId,
    pub indices: Vec<usize>,
    pub slots: Vec<RosterKey>,
}

impl TeamPeriod {
    pub fn build(events: &[Event], period: Period, team_id: &str) -> Self {
        let indices: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.period == Some(period) && e.team_id.as_deref() == Some(team_id))
            .map(|(i, _)| i)
            .collect();
        let refs: Vec<&Event> = indices.iter().map(|&i| &events[i]).collect();
        Self {
            period,
            team_id: s!(team_id),
            slots: reconstruct(&refs),
            indices,
        }
    }
}

/// Periods in order of first appearance.
pub fn periods(events: &[Event]) -> Vec<Period> {
    let mut out: Vec<Period> = Vec::new();
    for p in events.iter().filter_map(|e| e.period) {
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}

/// Reconstruct, validate and backfill one team's period.
pub fn resolve(
    events: &[Event],
    ctx: &GameContext<'_>,
    period: Period,
    team_id: &str,
    oracle: &dyn MinutesOracle,
    window: BackfillWindow,
) -> Result<(TeamPeriod, Option<Backfilled>), GameError> {
    let mut tp = TeamPeriod::build(events, period, team_id);
    let incomplete = |found: usize| GameError::LineupIncomplete {
        game_id: s!(ctx.game_id()),
        period,
        team_id: s!(team_id),
        found,
    };

    let found = match validate(&tp.slots) {
        Ok(()) => return Ok((tp, None)),
        Err(found) => found,
    };
    if tp.indices.is_empty() || found > ON_COURT {
        return Err(incomplete(found));
    }

    let missing = backfill::missing_players(oracle, ctx.game_id(), team_id, period, &tp.slots, window)
        .map_err(|source| GameError::Oracle {
            game_id: s!(ctx.game_id()),
            period,
            team_id: s!(team_id),
            source,
        })?;

    logf!(
        "{} {period} {team_id}: {found} named on court, box score adds {:?}",
        ctx.game_id(), missing
    );
    backfill::inject(&mut tp.slots, &missing);
    validate(&tp.slots).map_err(incomplete)?;

    let note = Backfilled { period, team_id: s!(team_id), players: missing };
    Ok((tp, Some(note)))
}

/// Fill `players`/`opp_players` on every event of the game.
///
/// Each event takes its own team's slot; the other team's roster is the most
/// recent one at or before it in the same period, else the next one after.
/// Events without a team are home-aligned.
pub fn assign(
    events: &mut [Event],
    ctx: &GameContext<'_>,
    oracle: &dyn MinutesOracle,
    window: BackfillWindow,
) -> Result<Vec<Backfilled>, GameError> {
    let mut notes = Vec::new();

    for period in periods(events) {
        let mut sides: Vec<(Side, TeamPeriod)> = Vec::with_capacity(2);
        for side in [Side::Home, Side::Away] {
            let (tp, note) = resolve(events, ctx, period, ctx.team_for(side), oracle, window)?;
            notes.extend(note);
            sides.push((side, tp));
        }

        let in_period: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.period == Some(period))
            .map(|(i, _)| i)
            .collect();

        let mut home = spread(&in_period, &sides[0].1);
        let mut away = spread(&in_period, &sides[1].1);

        for (pos, &i) in in_period.iter().enumerate() {
            let (Some(h), Some(a)) = (home[pos].take(), away[pos].take()) else {
                continue;
            };
            let ev = &mut events[i];
            let acting_away = ev.team_id.as_deref().and_then(|t| ctx.side_of(t)) == Some(Side::Away);
            if acting_away {
                ev.players = Some(a);
                ev.opp_players = Some(h);
            } else {
                ev.players = Some(h);
                ev.opp_players = Some(a);
            }
        }
    }
    Ok(notes)
}

/// Slots laid over every position of the period, filled forward then back.
fn spread(in_period: &[usize], tp: &TeamPeriod) -> Vec<Option<RosterKey>> {
    let mut out: Vec<Option<RosterKey>> = vec![None; in_period.len()];
    let mut own = tp.indices.iter().zip(&tp.slots).peekable();
    for (pos, &i) in in_period.iter().enumerate() {
        if let Some((_, slot)) = own.next_if(|(ix, _)| **ix == i) {
            out[pos] = Some(slot.clone());
        }
    }

    let mut last: Option<RosterKey> = None;
    for cell in out.iter_mut() {
        if cell.is_some() {
            last = cell.clone();
        } else {
            *cell = last.clone();
        }
    }
    let mut next: Option<RosterKey> = None;
    for cell in out.iter_mut().rev() {
        if cell.is_some() {
            next = cell.clone();
        } else {
            *cell = next.clone();
        }
    }
    out
}
