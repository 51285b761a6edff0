// src/classify/rules.rs
//
// Ordered dispatch table. Predicates are cheap substring tests and are
// mutually exclusive by position: a line belongs to the first rule it matches.

use super::{plays, shots, Line};
use crate::event::Event;

pub(crate) type Extract = fn(&mut Line<'_>) -> Option<Vec<Event>>;

pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub(crate) extract: Extract,
}

pub(crate) static RULES: &[Rule] = &[
    Rule { name: "period start", matches: is_period_start, extract: plays::period_start },
    Rule { name: "period end",   matches: is_period_end,   extract: plays::period_end },
    Rule { name: "jump ball",    matches: is_jump_ball,    extract: plays::jump_ball },
    Rule { name: "shot",         matches: is_shot,         extract: shots::shot },
    Rule { name: "rebound",      matches: is_rebound,      extract: plays::rebound },
    Rule { name: "turnover",     matches: is_turnover,     extract: plays::turnover },
    Rule { name: "foul",         matches: is_foul,         extract: plays::foul },
    Rule { name: "violation",    matches: is_violation,    extract: plays::violation },
    Rule { name: "substitution", matches: is_substitution, extract: plays::substitution },
    Rule { name: "timeout",      matches: is_timeout,      extract: plays::timeout },
];

/// First rule whose predicate holds for the cleaned text.
pub fn find(text: &str) -> Option<&'static Rule> {
    RULES.iter().find(|r| (r.matches)(text))
}

/// Name of the rule that would own `text`, for diagnostics.
pub fn rule_name(text: &str) -> Option<&'static str> {
    find(text).map(|r| r.name)
}

/* ---------------- Predicates ---------------- */

fn is_period_start(t: &str) -> bool {
    t.contains("Start of ")
}

fn is_period_end(t: &str) -> bool {
    t.contains("End of ")
}

fn is_jump_ball(t: &str) -> bool {
    let lower = t.to_ascii_lowercase();
    lower.contains("jump ball") && lower.contains("possession")
}

fn is_shot(t: &str) -> bool {
    t.contains(" makes ") || t.contains(" misses ")
}

fn is_rebound(t: &str) -> bool {
    t.contains(" rebound ") || t.starts_with("rebound ")
}

fn is_turnover(t: &str) -> bool {
    t.contains("Turnover ")
}

fn is_foul(t: &str) -> bool {
    t.contains(" foul ")
}

fn is_violation(t: &str) -> bool {
    t.contains("Violation")
}

fn is_substitution(t: &str) -> bool {
    t.contains("enters the game")
}

fn is_timeout(t: &str) -> bool {
    t.contains("timeout")
}
