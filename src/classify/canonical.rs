// src/classify/canonical.rs
//
// Render an event back into the cleaned transcript form it came from.

use super::plays::is_reversed_foul;
use crate::{
    config::consts::TEAM_ACTOR,
    event::{Detail, Event, EventKind, ReboundKind, ShotType, Side},
    teams::GameContext,
};

impl Event {
    /// The transcript line this event would have been read from.
    ///
    /// Derived events (assists, blocks, steals) have no line of their own and
    /// render `None`, as do boundaries with no known period.
    pub fn canonical_line(&self, ctx: &GameContext<'_>) -> Option<String> {
        let text = canonical_text(self)?;
        let clock = self.clock.to_raw();
        let score = self.score.unwrap_or_default();

        let written_side = self
            .team_id
            .as_deref()
            .and_then(|t| ctx.side_of(t))
            .map(|side| if written_reversed(&self.kind) { side.opposite() } else { side });

        Some(match written_side {
            _ if self.kind.is_boundary() => format!("{clock} {text}"),
            Some(Side::Home) => format!("{clock}  {score}  {text}"),
            Some(Side::Away) => format!("{clock} {text}  {score}"),
            None => format!("{clock} {text}"),
        })
    }
}

fn written_reversed(kind: &EventKind) -> bool {
    match kind {
        EventKind::Foul(sub) => is_reversed_foul(sub),
        EventKind::Block | EventKind::Steal => true,
        _ => false,
    }
}

fn name(actor: &Option<String>) -> &str {
    actor.as_deref().unwrap_or(TEAM_ACTOR)
}

fn canonical_text(ev: &Event) -> Option<String> {
    let actor = name(&ev.primary_actor);
    let detail = ev.detail.as_ref().map(Detail::to_string);

    Some(match &ev.kind {
        EventKind::PeriodStart => format!("Start of {}", ev.period?.phrase()),
        EventKind::PeriodEnd => match ev.period {
            Some(p) => format!("End of {}", p.phrase()),
            None => s!("End of period"),
        },
        EventKind::JumpBall => {
            format!("Jump ball: {actor} vs. {} ({actor} gains possession)", detail?)
        }
        EventKind::Shot(t) | EventKind::Make(t) => format!("{actor} makes {}", shot_text(*t, ev)),
        EventKind::Miss(t) => format!("{actor} misses {}", shot_text(*t, ev)),
        EventKind::Rebound(kind) => {
            let word = match kind {
                ReboundKind::Offensive => "Offensive",
                ReboundKind::Defensive => "Defensive",
                ReboundKind::Team => "Team",
            };
            format!("{word} rebound by {actor}")
        }
        EventKind::Turnover => match detail {
            Some(d) => format!("Turnover by {actor} ({d})"),
            None => format!("Turnover by {actor}"),
        },
        EventKind::Foul(sub) => match ev.detail.as_ref().and_then(Detail::as_player) {
            Some(d) => format!("{sub} foul by {actor} (drawn by {d})"),
            None => format!("{sub} foul by {actor}"),
        },
        EventKind::Violation => match detail {
            Some(d) => format!("Violation by {actor} ({d})"),
            None => format!("Violation by {actor}"),
        },
        EventKind::Substitution => {
            format!("{} enters the game for {actor}", ev.incoming()?)
        }
        EventKind::Timeout => match (&ev.team_id, detail) {
            (Some(team), Some(d)) => format!("{team} {} timeout", d.to_ascii_lowercase()),
            (None, Some(d)) => format!("{d} timeout"),
            (_, None) => s!("timeout"),
        },
        EventKind::Assist | EventKind::Block | EventKind::Steal => return None,
    })
}

fn shot_text(t: ShotType, ev: &Event) -> String {
    let detail = match ev.detail {
        Some(Detail::Number(n)) => n,
        _ => 0,
    };
    match t {
        ShotType::FreeThrow if detail > 0 => format!("free throw {detail} of {detail}"),
        ShotType::FreeThrow => s!("free throw"),
        ShotType::FieldGoal => {
            let mut s = match ev.value {
                Some(v) => format!("{v}-pt shot"),
                None => s!("shot"),
            };
            if detail > 0 {
                s.push_str(&format!(" from {detail} ft"));
            }
            s
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{classify, TranscriptLine};
    use crate::event::Event;
    use crate::teams::{GameContext, GameInfo, LineupTable};

    fn reclassify(ctx: &GameContext<'_>, ev: &Event, prev: Option<&Event>) -> Vec<Event> {
        let line = ev.canonical_line(ctx).unwrap();
        classify(&TranscriptLine::new("g1", 0, &line), ctx, prev).unwrap()
    }

    #[test]
    fn rendered_lines_classify_back_to_the_same_play() {
        let g = GameInfo { game_id: s!("g1"), home_team: s!("HOM"), away_team: s!("AWY") };
        let mut table = LineupTable::new();
        table.insert("g1", "X", "HOM");
        table.insert("g1", "Y", "AWY");
        let ctx = GameContext::new(&g, &table);

        let lines = [
            "12:00.0 Start of 1st quarter",
            "12:00.0 Jump ball: X vs. Y (Y gains possession)",
            "11:40.0  0-0  X makes 3-pt jump shot from 25 ft (assist by Q)",
            "11:20.0 Y misses free throw 2 of 2  3-0",
            "11:19.0  3-0  Defensive rebound by X",
            "11:02.0 Turnover by Y (lost ball; steal by X)  3-0",
            "10:50.0 Shooting foul by Y (drawn by X)  3-0",
            "10:50.0  3-0  Violation by X (kicked ball)",
            "10:40.0 Z enters the game for Y  3-0",
            "10:40.0 AWY full timeout  3-0",
            "0:00.0 End of 1st quarter",
        ];

        let mut prev: Option<Event> = None;
        for raw in lines {
            let evs = classify(&TranscriptLine::new("g1", 0, raw), &ctx, prev.as_ref()).unwrap();
            for ev in evs.iter().filter(|e| e.canonical_line(&ctx).is_some()) {
                let again = reclassify(&ctx, ev, prev.as_ref());
                assert!(
                    again.iter().any(|e| e.same_play(ev) && e.period == ev.period),
                    "{raw}: {:?} not reproduced by {:?}",
                    ev,
                    ev.canonical_line(&ctx)
                );
            }
            prev = evs.last().cloned();
        }
    }

    #[test]
    fn derived_events_have_no_line() {
        let g = GameInfo { game_id: s!("g1"), home_team: s!("HOM"), away_team: s!("AWY") };
        let table = LineupTable::new();
        let ctx = GameContext::new(&g, &table);
        let evs = classify(
            &TranscriptLine::new("g1", 0, "11:40.0  0-0  X makes 2-pt shot (assist by Q)"),
            &ctx,
            None,
        )
        .unwrap();
        assert!(evs[2].canonical_line(&ctx).is_none());
    }
}
