// src/classify/mod.rs
//
// One transcript line → one to three typed events.
//
// Dispatch is an ordered rule table (`rules::RULES`); the first predicate that
// holds owns the line. Extractors read names in textual order through
// `Line::take`, which swaps in linked player ids when the line carries them.

mod canonical;
mod plays;
pub mod rules;
mod shots;

use serde::Deserialize;

use crate::{
    config::consts::{PLAYER_IDS_SEP, TEAM_ACTOR},
    core::clean_line,
    error::ClassifyError,
    event::{Clock, Event, EventKind, PlayerId, Side, TeamId},
    teams::GameContext,
};

pub use shots::{shot_detail, shot_value};

/// One input record, in transcript order.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TranscriptLine {
    pub game_id: String,
    pub sequence_index: u32,
    pub raw_text: String,
    /// Linked player ids in order of appearance, when the source kept them.
    #[serde(default, deserialize_with = "player_ids")]
    pub player_ids: Option<Vec<PlayerId>>,
}

impl TranscriptLine {
    pub fn new(game_id: &str, sequence_index: u32, raw_text: &str) -> Self {
        Self {
            game_id: s!(game_id),
            sequence_index,
            raw_text: s!(raw_text),
            player_ids: None,
        }
    }

    pub fn with_player_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.player_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }
}

/// Accepts either a JSON array or a `;`-separated string.
fn player_ids<'de, D>(de: D) -> Result<Option<Vec<PlayerId>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Option::<Raw>::deserialize(de)? {
        None => None,
        Some(Raw::List(v)) => Some(v),
        Some(Raw::Joined(s)) => split_player_ids(&s),
    })
}

/// `a;b;c` → ids; blank → none.
pub fn split_player_ids(joined: &str) -> Option<Vec<PlayerId>> {
    let ids: Vec<PlayerId> = joined
        .split(PLAYER_IDS_SEP)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if ids.is_empty() { None } else { Some(ids) }
}

/* ---------------- Line context ---------------- */

/// A cleaned line plus everything an extractor may consult.
pub(crate) struct Line<'a> {
    pub clock: Clock,
    pub side: Option<Side>,
    pub text: &'a str,
    pub ctx: GameContext<'a>,
    /// Last event produced before this line.
    pub prev: Option<&'a Event>,
    ids: Option<std::slice::Iter<'a, PlayerId>>,
}

impl<'a> Line<'a> {
    pub fn event(&self, kind: EventKind) -> Event {
        Event::new(self.ctx.game_id(), self.clock, kind)
    }

    /// Team named by the line's position relative to the running score.
    pub fn naive_team(&self) -> Option<TeamId> {
        self.side.map(|s| s!(self.ctx.team_for(s)))
    }

    /// The opposing team; defensive credits are written on the victim's side.
    pub fn reversed_team(&self) -> Option<TeamId> {
        self.side.map(|s| s!(self.ctx.team_for(s.opposite())))
    }

    /// Resolve a captured name. `Team` is not a player and consumes no id.
    pub fn take(&mut self, captured: &str) -> Option<PlayerId> {
        let name = captured.trim();
        if name.is_empty() || name == TEAM_ACTOR {
            return None;
        }
        match self.ids.as_mut().and_then(Iterator::next) {
            Some(id) => Some(id.clone()),
            None => Some(s!(name)),
        }
    }
}

/* ---------------- Entry point ---------------- */

/// Classify one line. `prev` is the last event emitted for the game so far;
/// rebounds read their shooter from it.
pub fn classify(
    line: &TranscriptLine,
    ctx: &GameContext<'_>,
    prev: Option<&Event>,
) -> Result<Vec<Event>, ClassifyError> {
    let clean = clean_line(&line.raw_text);
    let unrecognized = || ClassifyError {
        sequence_index: line.sequence_index,
        text: clean.text.clone(),
    };

    let rule = rules::find(&clean.text).ok_or_else(unrecognized)?;

    let mut cur = Line {
        clock: clean.clock.unwrap_or(Clock::ZERO),
        side: clean.side,
        text: &clean.text,
        ctx: *ctx,
        prev,
        ids: line.player_ids.as_ref().map(|v| v.iter()),
    };

    let events = (rule.extract)(&mut cur).ok_or_else(unrecognized)?;
    logd!(
        "{} #{}: {} → {} event(s)",
        line.game_id, line.sequence_index, rule.name, events.len()
    );
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Detail, ReboundKind, ShotType, TimeoutKind};
    use crate::teams::{GameInfo, LineupTable};

    fn game() -> GameInfo {
        GameInfo { game_id: s!("g1"), home_team: s!("HOM"), away_team: s!("AWY") }
    }

    fn run(table: &LineupTable, raw: &str, prev: Option<&Event>) -> Vec<Event> {
        let g = game();
        let ctx = GameContext::new(&g, table);
        classify(&TranscriptLine::new("g1", 1, raw), &ctx, prev).unwrap()
    }

    #[test]
    fn jump_ball_winner_is_on_possession_team() {
        let mut table = LineupTable::new();
        table.insert("g1", "PlayerX", "HOM");
        table.insert("g1", "PlayerY", "AWY");
        table.insert("g1", "PlayerZ", "AWY");

        let evs = run(
            &table,
            "12:00.0 Team A jump ball: PlayerX vs. PlayerY (PlayerZ gains possession)",
            None,
        );
        assert_eq!(evs.len(), 1);
        let jb = &evs[0];
        assert_eq!(jb.kind, EventKind::JumpBall);
        assert_eq!(jb.team_id.as_deref(), Some("AWY"));
        assert_eq!(jb.primary_actor.as_deref(), Some("PlayerY"));
        assert_eq!(jb.detail, Some(Detail::Player(s!("PlayerX"))));
        assert_eq!(jb.value, Some(1));
        assert!(!jb.possession_flag);
    }

    #[test]
    fn make_with_assist_yields_three_events() {
        let table = LineupTable::new();
        let evs = run(&table, "11:30.0  2-0 +2 PlayerX makes 2-pt shot (assist by PlayerQ)", None);
        let kinds: Vec<_> = evs.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Shot(ShotType::FieldGoal),
                EventKind::Make(ShotType::FieldGoal),
                EventKind::Assist,
            ]
        );
        assert_eq!(evs[0].value, Some(2));
        assert_eq!(evs[1].value, Some(2));
        assert!(evs[1].possession_flag);
        assert_eq!(evs[2].primary_actor.as_deref(), Some("PlayerQ"));
        assert_eq!(evs[2].detail, Some(Detail::Player(s!("PlayerX"))));
        assert!(evs.iter().all(|e| e.team_id.as_deref() == Some("HOM")));
    }

    #[test]
    fn miss_with_block_credits_other_team() {
        let table = LineupTable::new();
        let evs = run(&table, "10:02.0 PlayerX misses 3-pt shot (block by PlayerR)  2-0", None);
        assert_eq!(evs.len(), 3);
        assert_eq!(evs[1].kind, EventKind::Miss(ShotType::FieldGoal));
        assert_eq!(evs[1].team_id.as_deref(), Some("AWY"));
        let block = &evs[2];
        assert_eq!(block.kind, EventKind::Block);
        assert_eq!(block.primary_actor.as_deref(), Some("PlayerR"));
        assert_eq!(block.detail, Some(Detail::Player(s!("PlayerX"))));
        assert_eq!(block.team_id.as_deref(), Some("HOM"));
    }

    #[test]
    fn rebound_reads_shooter_from_previous_event() {
        let table = LineupTable::new();
        let shot = run(&table, "10:02.0 PlayerX misses 3-pt shot (block by PlayerR)  2-0", None);
        let reb = run(&table, "10:00.0  2-0  Defensive rebound by PlayerD", shot.last());
        assert_eq!(reb[0].kind, EventKind::Rebound(ReboundKind::Defensive));
        assert_eq!(reb[0].detail, Some(Detail::Player(s!("PlayerX"))));

        let team = run(&table, "9:58.0 Offensive rebound by Team  2-0", Some(&shot[1]));
        assert_eq!(team[0].primary_actor, None);
        assert_eq!(team[0].detail, Some(Detail::Player(s!("PlayerX"))));
    }

    #[test]
    fn turnover_with_steal() {
        let table = LineupTable::new();
        let evs = run(&table, "9:40.0 Turnover by PlayerT (bad pass; steal by PlayerS)  2-0", None);
        assert_eq!(evs.len(), 2);
        assert_eq!(evs[0].detail, Some(Detail::Text(s!("bad pass"))));
        assert!(evs[0].possession_flag);
        assert_eq!(evs[1].kind, EventKind::Steal);
        assert_eq!(evs[1].team_id.as_deref(), Some("HOM"));
        assert_eq!(evs[1].detail, Some(Detail::Player(s!("PlayerT"))));
    }

    #[test]
    fn reversed_and_plain_fouls() {
        let table = LineupTable::new();
        let shooting = run(&table, "8:00.0 Shooting foul by PlayerF (drawn by PlayerG)  2-0", None);
        assert_eq!(shooting[0].kind, EventKind::Foul(s!("Shooting")));
        assert_eq!(shooting[0].team_id.as_deref(), Some("HOM"));
        assert_eq!(shooting[0].detail, Some(Detail::Player(s!("PlayerG"))));

        let loose = run(&table, "8:00.0 Loose ball foul by PlayerF (drawn by PlayerG)  2-0", None);
        assert_eq!(loose[0].team_id.as_deref(), Some("AWY"));
    }

    #[test]
    fn substitution_and_timeout() {
        let table = LineupTable::new();
        let sub = run(&table, "7:12.0  2-0  PlayerIn enters the game for PlayerOut", None);
        assert_eq!(sub[0].primary_actor.as_deref(), Some("PlayerOut"));
        assert_eq!(sub[0].incoming(), Some("PlayerIn"));

        let to = run(&table, "7:12.0 AWY full timeout  2-0", None);
        assert_eq!(to[0].kind, EventKind::Timeout);
        assert_eq!(to[0].detail, Some(Detail::Text(TimeoutKind::Full.to_string())));
        assert_eq!(to[0].primary_actor, None);
    }

    #[test]
    fn linked_ids_replace_names_in_order() {
        let g = game();
        let table = LineupTable::new();
        let ctx = GameContext::new(&g, &table);
        let line = TranscriptLine::new("g1", 4, "6:01.0  4-0  J. Doe makes 2-pt shot (assist by Q. Roe)")
            .with_player_ids(["doeja01", "roequ01"]);
        let evs = classify(&line, &ctx, None).unwrap();
        assert_eq!(evs[0].primary_actor.as_deref(), Some("doeja01"));
        assert_eq!(evs[2].primary_actor.as_deref(), Some("roequ01"));
    }

    #[test]
    fn commentary_is_unrecognized() {
        let g = game();
        let table = LineupTable::new();
        let ctx = GameContext::new(&g, &table);
        let err = classify(&TranscriptLine::new("g1", 9, "5:00.0 Instant replay (review)"), &ctx, None)
            .unwrap_err();
        assert_eq!(err.sequence_index, 9);
        assert_eq!(err.text, "Instant replay (review)");
    }

    #[test]
    fn player_ids_split_on_semicolons() {
        assert_eq!(split_player_ids("a; b;;c"), Some(vec![s!("a"), s!("b"), s!("c")]));
        assert_eq!(split_player_ids("  "), None);
    }
}
