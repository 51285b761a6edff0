// src/lineup/backfill.rs
//
// A player on court for a whole period without touching the ball never shows
// up in the transcript. The box score still credits them a full period.

use crate::{
    config::{
        consts::{BOX_GAME, MAX_OVERTIMES},
        options::BackfillWindow,
    },
    error::OracleError,
    event::{Period, PlayerId},
    oracle::MinutesOracle,
    roster::RosterKey,
};

/// Seconds each candidate played in `period`.
///
/// A quarter is read directly when its box score exists. Overtime segments
/// (and quarters without their own box score) are `Game` minus every other
/// reported period.
pub fn period_seconds(
    oracle: &dyn MinutesOracle,
    game_id: &str,
    team_id: &str,
    period: Period,
) -> Result<Vec<(PlayerId, i64)>, OracleError> {
    if !period.is_overtime() {
        if let Some(rows) = oracle.minutes(team_id, game_id, &period.box_name())? {
            return Ok(rows
                .into_iter()
                .map(|r| (r.player_id, i64::from(r.seconds)))
                .collect());
        }
    }
    derived_seconds(oracle, game_id, team_id, period)
}

fn derived_seconds(
    oracle: &dyn MinutesOracle,
    game_id: &str,
    team_id: &str,
    period: Period,
) -> Result<Vec<(PlayerId, i64)>, OracleError> {
    let Some(game) = oracle.minutes(team_id, game_id, BOX_GAME)? else {
        return Ok(Vec::new());
    };
    let mut played: Vec<(PlayerId, i64)> = game
        .into_iter()
        .map(|r| (r.player_id, i64::from(r.seconds)))
        .collect();

    let others = (1..=4)
        .map(Period::Quarter)
        .chain((1..=MAX_OVERTIMES).map(Period::Overtime))
        .filter(|p| *p != period);

    for other in others {
        let Some(rows) = oracle.minutes(team_id, game_id, &other.box_name())? else {
            if other.is_overtime() {
                break;
            }
            continue;
        };
        for row in rows {
            if let Some((_, secs)) = played.iter_mut().find(|(id, _)| *id == row.player_id) {
                *secs -= i64::from(row.seconds);
            }
        }
    }
    Ok(played)
}

/// Players who played the full period but appear in none of its slots.
pub fn missing_players(
    oracle: &dyn MinutesOracle,
    game_id: &str,
    team_id: &str,
    period: Period,
    slots: &[RosterKey],
    window: BackfillWindow,
) -> Result<Vec<PlayerId>, OracleError> {
    let length = period.length_secs();
    let found = period_seconds(oracle, game_id, team_id, period)?
        .into_iter()
        .filter(|(_, secs)| window.accepts(length, *secs))
        .map(|(id, _)| id)
        .filter(|id| !slots.iter().any(|k| k.contains(id)))
        .collect();
    Ok(found)
}

/// Append `players` to every slot.
pub fn inject(slots: &mut [RosterKey], players: &[PlayerId]) {
    for slot in slots.iter_mut() {
        for id in players {
            slot.insert(id);
        }
    }
}
