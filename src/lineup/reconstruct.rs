// src/lineup/reconstruct.rs
//
// Two passes over one team's events in one period. Slots are index-aligned
// with the events handed in; the running key is the only state.

use crate::{
    config::consts::ON_COURT,
    event::{Event, EventKind},
    roster::RosterKey,
};

/// Undo `sub` on a roster that sits after it in time.
pub fn invert_substitution(roster: &mut RosterKey, sub: &Event) {
    if let (Some(incoming), Some(outgoing)) = (sub.incoming(), sub.outgoing()) {
        roster.replace(incoming, outgoing);
    } else if let Some(outgoing) = sub.outgoing() {
        roster.insert(outgoing);
    }
}

/// Apply `sub` to the roster just before it.
pub fn apply_substitution(roster: &mut RosterKey, sub: &Event) {
    if let (Some(incoming), Some(outgoing)) = (sub.incoming(), sub.outgoing()) {
        roster.replace(outgoing, incoming);
    } else if let Some(incoming) = sub.incoming() {
        roster.insert(incoming);
    }
}

/// Last event to first: un-apply each substitution we walk back through,
/// then add the event's roster-bearing actor.
pub fn backward_pass(events: &[&Event]) -> Vec<RosterKey> {
    let mut slots = vec![RosterKey::new(); events.len()];
    let mut running = RosterKey::new();

    for i in (0..events.len()).rev() {
        if let Some(next) = events.get(i + 1) {
            if next.kind == EventKind::Substitution {
                invert_substitution(&mut running, next);
            }
        }
        if let Some(actor) = events[i].roster_actor() {
            running.insert(actor);
        }
        slots[i] = running.clone();
    }
    slots
}

/// First to last: a slot shorter than its predecessor inherits the
/// predecessor's trailing positions, up to five.
pub fn fill_down(slots: &mut [RosterKey]) {
    for i in 1..slots.len() {
        let (done, rest) = slots.split_at_mut(i);
        let prev = &done[i - 1];
        let cur = &mut rest[0];
        if prev.len() <= cur.len() {
            continue;
        }
        for id in prev.tail(cur.len()) {
            if cur.len() >= ON_COURT {
                break;
            }
            cur.insert(id);
        }
    }
}

pub fn reconstruct(events: &[&Event]) -> Vec<RosterKey> {
    let mut slots = backward_pass(events);
    fill_down(&mut slots);
    slots
}
