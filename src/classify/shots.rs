// src/classify/shots.rs
use super::Line;
use crate::event::{Detail, Event, EventKind, ShotType};

/// Points a shot is worth: free throws 1, field goals per `N-pt`.
pub fn shot_value(text: &str) -> Option<u32> {
    if text.contains("free throw") {
        return Some(1);
    }
    rx!(r"(\d)-pt")
        .captures(text)
        .and_then(|c| c[1].parse().ok())
}

/// Free-throw number in its sequence, 1 for technicals, else distance in feet.
pub fn shot_detail(text: &str) -> u32 {
    if let Some(c) = rx!(r"free throw (\d)").captures(text) {
        return c[1].parse().unwrap_or(0);
    }
    if text.contains("technical") {
        return 1;
    }
    rx!(r"(\d+) ft")
        .captures(text)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(0)
}

/// Attempt, then make or miss, then an assist or block when credited.
pub(crate) fn shot(line: &mut Line<'_>) -> Option<Vec<Event>> {
    let text = line.text;
    let caps = rx!(r"^(.+?) (makes|misses) ").captures(text)?;
    let shooter = line.take(&caps[1]);
    let made = &caps[2] == "makes";

    let shot_type = if text.contains("free throw") {
        ShotType::FreeThrow
    } else {
        ShotType::FieldGoal
    };
    let value = shot_value(text);
    let detail = shot_detail(text);
    let team = line.naive_team();

    let base = |kind: EventKind, possession: bool| {
        let mut ev = line.event(kind);
        ev.team_id = team.clone();
        ev.primary_actor = shooter.clone();
        ev.value = value;
        ev.detail = Some(Detail::Number(detail));
        ev.possession_flag = possession;
        ev
    };

    let mut out = vec![base(EventKind::Shot(shot_type), false)];
    if made {
        out.push(base(EventKind::Make(shot_type), true));
    } else {
        out.push(base(EventKind::Miss(shot_type), true));
    }

    let credit = if made {
        rx!(r"assist by ([^)]+)\)")
            .captures(text)
            .map(|c| (EventKind::Assist, c[1].to_string(), line.naive_team()))
    } else {
        rx!(r"block by ([^)]+)\)")
            .captures(text)
            .map(|c| (EventKind::Block, c[1].to_string(), line.reversed_team()))
    };

    if let Some((kind, name, credit_team)) = credit {
        let mut ev = line.event(kind);
        ev.team_id = credit_team;
        ev.primary_actor = line.take(&name);
        ev.value = Some(1);
        ev.detail = shooter.map(Detail::Player);
        out.push(ev);
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values() {
        assert_eq!(shot_value("makes 3-pt jump shot from 25 ft"), Some(3));
        assert_eq!(shot_value("misses free throw 2 of 2"), Some(1));
        assert_eq!(shot_value("makes layup"), None);
    }

    #[test]
    fn details() {
        assert_eq!(shot_detail("makes free throw 2 of 3"), 2);
        assert_eq!(shot_detail("makes technical free throw"), 1);
        assert_eq!(shot_detail("misses 2-pt hook shot from 7 ft"), 7);
        assert_eq!(shot_detail("makes 2-pt layup at rim"), 0);
    }
}
