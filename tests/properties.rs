// tests/properties.rs
use bb_plays::event::{Clock, Detail, Event, EventKind, ShotType};
use bb_plays::lineup::{apply_substitution, invert_substitution, reconstruct};
use bb_plays::score::annotate;
use bb_plays::{classify, GameContext, GameInfo, LineupTable, RosterKey, TranscriptLine};
use proptest::prelude::*;

fn game() -> GameInfo {
    GameInfo { game_id: "g".into(), home_team: "HOM".into(), away_team: "AWY".into() }
}

fn make(home: bool, points: u32, scored: bool) -> Event {
    let kind = if scored { EventKind::Make(ShotType::FieldGoal) } else { EventKind::Miss(ShotType::FieldGoal) };
    let mut e = Event::new("g", Clock::ZERO, kind);
    e.team_id = Some(if home { "HOM" } else { "AWY" }.into());
    e.value = Some(points);
    e
}

fn play(actor: &str) -> Event {
    let mut e = Event::new("g", Clock::ZERO, EventKind::Violation);
    e.primary_actor = Some(actor.into());
    e
}

proptest! {
    #[test]
    fn score_never_decreases(shots in prop::collection::vec((any::<bool>(), 1u32..=3, any::<bool>()), 0..60)) {
        let g = game();
        let table = LineupTable::new();
        let ctx = GameContext::new(&g, &table);
        let mut events: Vec<Event> = shots.iter().map(|&(h, p, m)| make(h, p, m)).collect();
        annotate(&mut events, &ctx);

        let (mut home, mut away) = (0, 0);
        for (ev, &(h, p, m)) in events.iter().zip(&shots) {
            if m {
                if h { home += p } else { away += p }
            }
            let s = ev.score.unwrap();
            prop_assert_eq!((s.home, s.away), (home, away));
        }
    }

    #[test]
    fn five_named_players_fill_every_slot(order in prop::collection::vec(0usize..5, 0..40)) {
        let names = ["a", "b", "c", "d", "e"];
        // Every player acts at least once, in some order.
        let mut events: Vec<Event> = names.iter().map(|n| play(n)).collect();
        events.extend(order.iter().map(|&i| play(names[i])));

        let refs: Vec<&Event> = events.iter().collect();
        for slot in reconstruct(&refs) {
            prop_assert!(slot.is_complete(), "{}", slot);
        }
    }

    #[test]
    fn substitution_inverts(roster in prop::collection::hash_set("[a-e][0-9]", 1..=5), incoming in "[x-z][0-9]") {
        let before = RosterKey::from_ids(roster.iter().cloned());
        let outgoing = before.ids()[0].clone();

        let mut sub = Event::new("g", Clock::ZERO, EventKind::Substitution);
        sub.primary_actor = Some(outgoing.clone());
        sub.detail = Some(Detail::Player(incoming.clone()));

        let mut after = before.clone();
        apply_substitution(&mut after, &sub);
        prop_assert!(after.contains(&incoming) && !after.contains(&outgoing));
        prop_assert_eq!(after.len(), before.len());

        invert_substitution(&mut after, &sub);
        prop_assert_eq!(&after, &before);
        prop_assert_eq!(after.ids(), before.ids());
    }

    #[test]
    fn any_text_classifies_or_is_rejected(raw in ".{0,80}") {
        let g = game();
        let table = LineupTable::new();
        let ctx = GameContext::new(&g, &table);
        match classify(&TranscriptLine::new("g", 1, &raw), &ctx, None) {
            Ok(events) => prop_assert!(!events.is_empty() && events.len() <= 3),
            Err(e) => prop_assert_eq!(e.sequence_index, 1),
        }
    }
}
