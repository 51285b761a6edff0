// src/core/sanitize.rs
//
// Raw transcript line → clock, side and bare play text.
// Order matters: score deltas go before the clock, the clock before the
// running score is located, since the score's offset is read off what's left.

use crate::event::{Clock, Side};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CleanLine {
    pub clock: Option<Clock>,
    /// Side inferred from where the running score sits; `None` when absent.
    pub side: Option<Side>,
    pub text: String,
}

pub fn clean_line(raw: &str) -> CleanLine {
    let s = remove_line_breaks(raw);
    let s = remove_score_added(&s);
    let clock = extract_clock(&s);
    let s = remove_clock(&s);
    let side = score_offset(&s).map(side_from_offset);
    let s = remove_score(&s);
    CleanLine { clock, side, text: normalize_ws(&s) }
}

pub fn remove_line_breaks(s: &str) -> String {
    s.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

/// Drop the `+2` style point deltas next to the running score.
pub fn remove_score_added(s: &str) -> String {
    rx!(r"\+[0-9]").replace_all(s, "").into_owned()
}

pub fn extract_clock(s: &str) -> Option<Clock> {
    rx!(r"\d+:\d+\.\d")
        .find(s)
        .and_then(|m| Clock::parse(m.as_str()))
}

pub fn remove_clock(s: &str) -> String {
    rx!(r"\d+:\d+\.\d").replace_all(s, "").into_owned()
}

/// Character offset of the running score (`12-9`), if any.
pub fn score_offset(s: &str) -> Option<usize> {
    rx!(r"\d+-+\d+")
        .find(s)
        .map(|m| s[..m.start()].chars().count())
}

/// Home plays sit right of the score: two separators then the score.
fn side_from_offset(offset: usize) -> Side {
    if offset == 2 { Side::Home } else { Side::Away }
}

pub fn remove_score(s: &str) -> String {
    rx!(r"\d+-+\d+").replace_all(s, "").into_owned()
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// File stem from a game id: alphanumerics, `-` and `_`; whitespace runs become `_`.
pub fn sanitize_filename(name: &str, fallback: usize) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() { out.push(ch); last_us = false; }
        else if ch.is_whitespace() { if !last_us { out.push('_'); last_us = true; } }
        else if ch == '-' || ch == '_' { if !(last_us && ch == '_') { out.push(ch); } last_us = ch == '_'; }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { format!("game_{fallback}") } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stems_are_path_safe() {
        assert_eq!(sanitize_filename("202310240DEN", 0), "202310240DEN");
        assert_eq!(sanitize_filename("a b/../c", 3), "a_bc");
        assert_eq!(sanitize_filename("///", 3), "game_3");
    }

    #[test]
    fn home_line_has_score_at_offset_two() {
        let c = clean_line("11:30.0  2-2 +2 J. Doe makes 2-pt jump shot from 8 ft");
        assert_eq!(c.clock, Clock::parse("11:30"));
        assert_eq!(c.side, Some(Side::Home));
        assert_eq!(c.text, "J. Doe makes 2-pt jump shot from 8 ft");
    }

    #[test]
    fn away_line_has_score_after_text() {
        let c = clean_line("11:48.0 A. Roe makes 3-pt jump shot from 24 ft +3\n 3-0 ");
        assert_eq!(c.side, Some(Side::Away));
        assert_eq!(c.text, "A. Roe makes 3-pt jump shot from 24 ft");
    }

    #[test]
    fn boundary_line_has_no_side() {
        let c = clean_line("12:00.0 Start of 1st quarter");
        assert_eq!(c.side, None);
        assert_eq!(c.clock.map(|c| c.to_string()), Some(s!("12:00")));
        assert_eq!(c.text, "Start of 1st quarter");
    }

    #[test]
    fn point_value_is_not_a_score() {
        assert_eq!(score_offset("misses 2-pt shot"), None);
        assert_eq!(score_offset("  10--8"), Some(2));
    }
}
