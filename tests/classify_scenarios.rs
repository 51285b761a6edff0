// tests/classify_scenarios.rs
use bb_plays::config::options::PipelineOptions;
use bb_plays::event::{EventKind, Period};
use bb_plays::game::{assemble, GameResult, GameWarning};
use bb_plays::oracle::NoOracle;
use bb_plays::{GameInfo, LineupTable, TranscriptLine};

const BASE: &[&str] = &[
    "12:00.0 Start of 1st quarter",
    "11:40.0  2-0 +2 H1 makes 2-pt shot (assist by H2)",
    "11:20.0 A1 misses 2-pt shot  2-0",
    "11:18.0  2-0  Defensive rebound by H3",
    "11:00.0  2-0  Turnover by H4 (bad pass; steal by A2)",
    "10:40.0 A3 makes 3-pt shot (assist by A4) +3  2-3",
    "10:20.0  2-3  Personal foul by A5 (drawn by H1)",
    "10:10.0  2-3  Violation by H5 (kicked ball)",
    "0:00.0 End of 1st quarter",
];

fn game() -> GameInfo {
    GameInfo { game_id: "g1".into(), home_team: "HOM".into(), away_team: "AWY".into() }
}

fn lines(raw: &[&str]) -> Vec<TranscriptLine> {
    raw.iter()
        .enumerate()
        .map(|(i, r)| TranscriptLine::new("g1", i as u32 + 1, r))
        .collect()
}

fn run(raw: &[&str], table: &LineupTable, opts: &PipelineOptions) -> GameResult {
    assemble(&game(), &lines(raw), table, &NoOracle, opts).unwrap()
}

fn with(at: usize, extra: &str) -> Vec<&str> {
    let mut v = BASE.to_vec();
    v.insert(at, extra);
    v
}

#[test]
fn clean_quarter_has_no_warnings() {
    let r = run(BASE, &LineupTable::new(), &PipelineOptions::default());
    assert!(r.warnings.is_empty(), "{:?}", r.warnings);
    assert!(r.events.iter().all(|e| e.period == Some(Period::Quarter(1))));
    assert_eq!(r.events.first().unwrap().team_id.as_deref(), Some("HOM"));
}

#[test]
fn commentary_line_is_a_warning_not_a_failure() {
    let raw = with(3, "11:19.0 Instant replay (request: challenge)  2-0");
    let r = run(&raw, &LineupTable::new(), &PipelineOptions::default());
    assert_eq!(
        r.warnings,
        vec![GameWarning::UnrecognizedLine {
            sequence_index: 4,
            text: "Instant replay (request: challenge)".into(),
        }]
    );
    let clean = run(BASE, &LineupTable::new(), &PipelineOptions::default());
    assert_eq!(r.events.len(), clean.events.len());
}

#[test]
fn jump_ball_without_lineups_keeps_text_order() {
    let raw = with(1, "12:00.0 Jump ball: H1 vs. A1 (H2 gains possession)");
    let r = run(&raw, &LineupTable::new(), &PipelineOptions::default());
    assert_eq!(r.warnings, vec![GameWarning::JumpBallUnresolved { sequence_index: 2 }]);

    let jb = r.events.iter().find(|e| e.kind == EventKind::JumpBall).unwrap();
    assert_eq!(jb.team_id, None);
    assert_eq!(jb.primary_actor.as_deref(), Some("H1"));
    // Team-less events take the home roster.
    assert!(jb.players.as_ref().unwrap().contains("H5"));
}

#[test]
fn jump_ball_with_lineups_goes_to_the_possession_team() {
    let mut table = LineupTable::new();
    for p in ["H1", "H2"] {
        table.insert("g1", p, "HOM");
    }
    table.insert("g1", "A1", "AWY");
    let raw = with(1, "12:00.0 Jump ball: A1 vs. H1 (H2 gains possession)");
    let r = run(&raw, &table, &PipelineOptions::default());
    assert!(r.warnings.is_empty());

    let jb = r.events.iter().find(|e| e.kind == EventKind::JumpBall).unwrap();
    assert_eq!(jb.team_id.as_deref(), Some("HOM"));
    assert_eq!(jb.primary_actor.as_deref(), Some("H1"));
    // The period start now follows the jump ball's team.
    assert_eq!(r.events[0].team_id.as_deref(), Some("HOM"));
}

#[test]
fn events_before_any_period_start_default_to_the_first_quarter() {
    let r = run(&BASE[1..], &LineupTable::new(), &PipelineOptions::default());
    assert_eq!(r.warnings, vec![GameWarning::MissingPeriodStart]);
    assert!(r.events.iter().all(|e| e.period == Some(Period::Quarter(1))));
}

#[test]
fn backwards_clock_is_flagged_only_when_strict() {
    let raw = with(4, "11:30.0  2-0  HOM full timeout");
    let strict = run(&raw, &LineupTable::new(), &PipelineOptions::default());
    assert_eq!(strict.warnings, vec![GameWarning::ClockOrder { sequence_index: 5 }]);

    let lenient = PipelineOptions { strict_clock: false, ..Default::default() };
    assert!(run(&raw, &LineupTable::new(), &lenient).warnings.is_empty());
}

#[test]
fn linked_ids_flow_through_to_rosters() {
    let mut ls = lines(BASE);
    ls[1] = ls[1].clone().with_player_ids(["h1id", "h2id"]);
    let r = assemble(&game(), &ls, &LineupTable::new(), &NoOracle, &PipelineOptions::default()).unwrap();

    let make = r.events.iter().find(|e| e.kind.is_make()).unwrap();
    assert_eq!(make.primary_actor.as_deref(), Some("h1id"));
    let players = make.players.as_ref().unwrap();
    assert!(players.contains("h1id") && players.contains("h2id"));
    assert!(!players.contains("H2"));
}

#[test]
fn rendered_lines_reclassify_to_the_same_plays() {
    let g = game();
    let table = LineupTable::new();
    let ctx = bb_plays::GameContext::new(&g, &table);
    let r = run(BASE, &table, &PipelineOptions::default());

    let mut prev = None;
    for ev in &r.events {
        // Boundary teams are assigned after classification.
        if ev.kind.is_boundary() {
            prev = Some(ev);
            continue;
        }
        if let Some(line) = ev.canonical_line(&ctx) {
            let again = bb_plays::classify(&TranscriptLine::new("g1", 0, &line), &ctx, prev).unwrap();
            assert!(again.iter().any(|e| e.same_play(ev)), "{line}");
        }
        prev = Some(ev);
    }
}
