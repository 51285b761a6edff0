// src/classify/plays.rs
//
// Extractors for everything that is not a shot.

use super::Line;
use crate::{
    config::consts::REVERSED_FOULS,
    event::{Clock, Detail, Event, EventKind, Period, ReboundKind, TimeoutKind},
};

/* ---------------- Boundaries ---------------- */

pub(crate) fn period_start(line: &mut Line<'_>) -> Option<Vec<Event>> {
    let caps = rx!(r"Start of (.+)$").captures(line.text)?;
    let period = Period::from_phrase(&caps[1])?;
    let mut ev = line.event(EventKind::PeriodStart);
    ev.period = Some(period);
    Some(vec![ev])
}

pub(crate) fn period_end(line: &mut Line<'_>) -> Option<Vec<Event>> {
    let mut ev = line.event(EventKind::PeriodEnd);
    ev.clock = Clock::ZERO;
    ev.period = rx!(r"End of (.+)$")
        .captures(line.text)
        .and_then(|c| Period::from_phrase(&c[1]));
    ev.possession_flag = true;
    Some(vec![ev])
}

/* ---------------- Jump ball ---------------- */

/// Winner is whichever participant shares a team with the player who gained
/// possession. Unresolvable lookups leave the team empty and keep text order.
pub(crate) fn jump_ball(line: &mut Line<'_>) -> Option<Vec<Event>> {
    let caps = rx!(r"(?i)jump ball:\s*(.+?)\s+vs\.\s+(.+?)\s*\((.+?)\s+gains possession\)")
        .captures(line.text)?;
    let first = line.take(&caps[1]);
    let second = line.take(&caps[2]);
    let gainer = line.take(&caps[3]);

    let ctx = line.ctx;
    let team = gainer.as_deref().and_then(|p| ctx.team_of_player(p));

    let first_wins = match (&team, first.as_deref()) {
        (Some(t), Some(p)) => ctx.team_of_player(p).as_ref() == Some(t),
        _ => true,
    };
    let (winner, loser) = if first_wins { (first, second) } else { (second, first) };

    let mut ev = line.event(EventKind::JumpBall);
    ev.team_id = team;
    ev.primary_actor = winner;
    ev.value = Some(1);
    ev.detail = loser.map(Detail::Player);
    Some(vec![ev])
}

/* ---------------- Rebound ---------------- */

pub(crate) fn rebound(line: &mut Line<'_>) -> Option<Vec<Event>> {
    let kind_word = rx!(r"(?i)^(\w*)\s*rebound")
        .captures(line.text)
        .map(|c| c[1].to_ascii_lowercase())
        .unwrap_or_default();
    let kind = match kind_word.as_str() {
        "offensive" => ReboundKind::Offensive,
        "defensive" => ReboundKind::Defensive,
        _ => ReboundKind::Team,
    };

    let actor = rx!(r"rebound by (.+)$")
        .captures(line.text)
        .and_then(|c| line.take(&c[1]));

    // Shooter of the miss being rebounded; a block carries it as detail.
    let shooter = line.prev.and_then(|p| match p.kind {
        EventKind::Miss(_) => p.primary_actor.clone(),
        EventKind::Block => p.detail.as_ref().and_then(Detail::as_player).map(String::from),
        _ => None,
    });

    let mut ev = line.event(EventKind::Rebound(kind));
    ev.team_id = line.naive_team();
    ev.primary_actor = actor;
    ev.value = Some(1);
    ev.detail = shooter.map(Detail::Player);
    Some(vec![ev])
}

/* ---------------- Turnover / steal ---------------- */

pub(crate) fn turnover(line: &mut Line<'_>) -> Option<Vec<Event>> {
    let text = line.text;
    let actor = rx!(r"Turnover by (.+?)(?: \(|$)")
        .captures(text)
        .and_then(|c| line.take(&c[1]));

    let reason = rx!(r"\((.*);")
        .captures(text)
        .or_else(|| rx!(r"\((.*)\)").captures(text))
        .map(|c| c[1].trim().to_string());

    let mut ev = line.event(EventKind::Turnover);
    ev.team_id = line.naive_team();
    ev.primary_actor = actor.clone();
    ev.value = Some(1);
    ev.detail = reason.map(Detail::Text);
    ev.possession_flag = true;

    let mut out = vec![ev];

    if let Some(c) = rx!(r"steal by ([^)]+)\)").captures(text) {
        let mut steal = line.event(EventKind::Steal);
        steal.team_id = line.reversed_team();
        steal.primary_actor = line.take(&c[1]);
        steal.value = Some(1);
        steal.detail = actor.map(Detail::Player);
        out.push(steal);
    }
    Some(out)
}

/* ---------------- Foul ---------------- */

pub fn is_reversed_foul(subtype: &str) -> bool {
    let name = format!("{subtype} foul");
    REVERSED_FOULS.iter().any(|f| name.contains(f))
}

pub(crate) fn foul(line: &mut Line<'_>) -> Option<Vec<Event>> {
    let text = line.text;
    let subtype = rx!(r"^(.*?) foul\b").captures(text)?[1].trim().to_string();

    let fouler = rx!(r"foul by (.+?)(?: \(|$)")
        .captures(text)
        .and_then(|c| line.take(&c[1]));
    let drawn = rx!(r"drawn by ([^)]+)\)")
        .captures(text)
        .and_then(|c| line.take(&c[1]));

    let team = if is_reversed_foul(&subtype) {
        line.reversed_team()
    } else {
        line.naive_team()
    };

    let mut ev = line.event(EventKind::Foul(subtype));
    ev.team_id = team;
    ev.primary_actor = fouler;
    ev.value = Some(1);
    ev.detail = drawn.map(Detail::Player);
    Some(vec![ev])
}

/* ---------------- Violation / substitution / timeout ---------------- */

pub(crate) fn violation(line: &mut Line<'_>) -> Option<Vec<Event>> {
    let text = line.text;
    let actor = rx!(r"Violation by (.+?)(?: \(|$)")
        .captures(text)
        .and_then(|c| line.take(&c[1]));
    let reason = rx!(r"\((.*)\)").captures(text).map(|c| c[1].trim().to_string());

    let mut ev = line.event(EventKind::Violation);
    ev.team_id = line.naive_team();
    ev.primary_actor = actor;
    ev.value = Some(1);
    ev.detail = reason.map(Detail::Text);
    Some(vec![ev])
}

/// `<in> enters the game for <out>`: the outgoing player is the actor.
pub(crate) fn substitution(line: &mut Line<'_>) -> Option<Vec<Event>> {
    let caps = rx!(r"^(.+?) enters the game for (.+)$").captures(line.text)?;
    let incoming = line.take(&caps[1]);
    let outgoing = line.take(&caps[2]);

    let mut ev = line.event(EventKind::Substitution);
    ev.team_id = line.naive_team();
    ev.primary_actor = outgoing;
    ev.value = Some(1);
    ev.detail = incoming.map(Detail::Player);
    Some(vec![ev])
}

pub(crate) fn timeout(line: &mut Line<'_>) -> Option<Vec<Event>> {
    let kind = rx!(r"(?i)(20 second|full|official) timeout")
        .captures(line.text)
        .and_then(|c| TimeoutKind::from_phrase(&c[1]));

    let mut ev = line.event(EventKind::Timeout);
    ev.team_id = line.naive_team();
    ev.value = Some(1);
    ev.detail = kind.map(|k| Detail::Text(k.to_string()));
    Some(vec![ev])
}
