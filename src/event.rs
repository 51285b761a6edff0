// src/event.rs
//
// The typed event log. One transcript line becomes one to three `Event`s;
// later pipeline stages fill in period, score and rosters in place.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::roster::RosterKey;

pub type PlayerId = String;
pub type TeamId = String;

/* ---------------- Period ---------------- */

/// Regulation quarter (1..=4) or overtime segment (1..).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    Quarter(u8),
    Overtime(u8),
}

impl Period {
    /// Parse the tail of a "Start of …" phrase: `1st quarter`, `2nd overtime`.
    pub fn from_phrase(phrase: &str) -> Option<Period> {
        let phrase = phrase.trim().to_ascii_lowercase();
        let n: u8 = phrase
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse()
            .ok()?;
        if n == 0 {
            return None;
        }
        if phrase.contains("overtime") {
            Some(Period::Overtime(n))
        } else if phrase.contains("quarter") && n <= 4 {
            Some(Period::Quarter(n))
        } else {
            None
        }
    }

    /// Tab name used by box scores: `Q1`..`Q4`, `OT1`..
    pub fn box_name(&self) -> String {
        match self {
            Period::Quarter(n) => format!("Q{n}"),
            Period::Overtime(n) => format!("OT{n}"),
        }
    }

    pub fn is_overtime(&self) -> bool {
        matches!(self, Period::Overtime(_))
    }

    /// The phrase a transcript uses after "Start of": `1st quarter`, `2nd overtime`.
    pub fn phrase(&self) -> String {
        match self {
            Period::Quarter(n) => format!("{} quarter", ordinal(*n)),
            Period::Overtime(n) => format!("{} overtime", ordinal(*n)),
        }
    }

    /// Full length of the period in seconds.
    pub fn length_secs(&self) -> u32 {
        match self {
            Period::Quarter(_) => crate::config::consts::QUARTER_SECS,
            Period::Overtime(_) => crate::config::consts::OVERTIME_SECS,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Quarter(n) => f.write_str(&ordinal(*n)),
            Period::Overtime(n) => write!(f, "OT{n}"),
        }
    }
}

fn ordinal(n: u8) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_str(self)
    }
}

/* ---------------- Clock ---------------- */

/// Game clock, counting down, in tenths of a second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Clock {
    tenths: u32,
}

impl Clock {
    pub const ZERO: Clock = Clock { tenths: 0 };

    pub fn tenths(&self) -> u32 {
        self.tenths
    }

    /// `11:48.0`, `0:24.5`, `12:00`
    pub fn parse(text: &str) -> Option<Clock> {
        let (mins, rest) = text.trim().split_once(':')?;
        let (secs, frac) = match rest.split_once('.') {
            Some((s, f)) => (s, f),
            None => (rest, "0"),
        };
        let mins: u32 = mins.parse().ok()?;
        let secs: u32 = secs.parse().ok()?;
        let frac: u32 = frac.get(..1)?.parse().ok()?;
        if secs >= 60 {
            return None;
        }
        let tenths = mins.checked_mul(600)?.checked_add(secs * 10 + frac)?;
        Some(Clock { tenths })
    }

    /// Transcript form, tenths always present: `11:48.0`.
    pub fn to_raw(&self) -> String {
        let secs = self.tenths / 10;
        format!("{}:{:02}.{}", secs / 60, secs % 60, self.tenths % 10)
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.tenths / 10;
        let frac = self.tenths % 10;
        if frac == 0 {
            write!(f, "{}:{:02}", secs / 60, secs % 60)
        } else {
            write!(f, "{}:{:02}.{}", secs / 60, secs % 60, frac)
        }
    }
}

impl Serialize for Clock {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_str(self)
    }
}

/* ---------------- Score / sides ---------------- */

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_str(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/* ---------------- Kinds ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShotType {
    FieldGoal,
    FreeThrow,
}

impl fmt::Display for ShotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShotType::FieldGoal => "FG",
            ShotType::FreeThrow => "FT",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReboundKind {
    Offensive,
    Defensive,
    Team,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeoutKind {
    TwentySecond,
    Full,
    Official,
}

impl TimeoutKind {
    pub fn from_phrase(s: &str) -> Option<TimeoutKind> {
        match s.to_ascii_lowercase().as_str() {
            "20 second" => Some(TimeoutKind::TwentySecond),
            "full" => Some(TimeoutKind::Full),
            "official" => Some(TimeoutKind::Official),
            _ => None,
        }
    }
}

impl fmt::Display for TimeoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeoutKind::TwentySecond => "20 second",
            TimeoutKind::Full => "Full",
            TimeoutKind::Official => "Official",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    PeriodStart,
    PeriodEnd,
    JumpBall,
    Shot(ShotType),
    Make(ShotType),
    Miss(ShotType),
    Assist,
    Block,
    Rebound(ReboundKind),
    Turnover,
    Steal,
    /// Subtype as written before "foul", e.g. `Shooting`, `Personal take`.
    Foul(String),
    Violation,
    Substitution,
    Timeout,
}

impl EventKind {
    pub fn is_boundary(&self) -> bool {
        matches!(self, EventKind::PeriodStart | EventKind::PeriodEnd)
    }

    pub fn is_make(&self) -> bool {
        matches!(self, EventKind::Make(_))
    }

    pub fn is_technical_foul(&self) -> bool {
        matches!(self, EventKind::Foul(sub) if sub.eq_ignore_ascii_case("technical"))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::PeriodStart => f.write_str("Period Start"),
            EventKind::PeriodEnd => f.write_str("Period End"),
            EventKind::JumpBall => f.write_str("Jump Ball"),
            EventKind::Shot(t) => write!(f, "{t} Shot"),
            EventKind::Make(t) => write!(f, "{t} Make"),
            EventKind::Miss(t) => write!(f, "{t} Miss"),
            EventKind::Assist => f.write_str("Assist"),
            EventKind::Block => f.write_str("Block"),
            EventKind::Rebound(ReboundKind::Offensive) => f.write_str("Offensive Rebound"),
            EventKind::Rebound(ReboundKind::Defensive) => f.write_str("Defensive Rebound"),
            EventKind::Rebound(ReboundKind::Team) => f.write_str("Team Rebound"),
            EventKind::Turnover => f.write_str("Turnover"),
            EventKind::Steal => f.write_str("Steal"),
            EventKind::Foul(sub) => write!(f, "{sub} foul"),
            EventKind::Violation => f.write_str("Violation"),
            EventKind::Substitution => f.write_str("Substitution"),
            EventKind::Timeout => f.write_str("Timeout"),
        }
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_str(self)
    }
}

/// Secondary actor or descriptive payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Detail {
    Player(PlayerId),
    Text(String),
    Number(u32),
}

impl Detail {
    pub fn as_player(&self) -> Option<&str> {
        match self {
            Detail::Player(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detail::Player(s) | Detail::Text(s) => f.write_str(s),
            Detail::Number(n) => write!(f, "{n}"),
        }
    }
}

/* ---------------- Event ---------------- */

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Event {
    pub game_id: String,
    pub period: Option<Period>,
    #[serde(rename = "time")]
    pub clock: Clock,
    pub score: Option<Score>,
    pub team_id: Option<TeamId>,
    pub players: Option<RosterKey>,
    pub opp_players: Option<RosterKey>,
    #[serde(rename = "player_id")]
    pub primary_actor: Option<PlayerId>,
    #[serde(rename = "event")]
    pub kind: EventKind,
    #[serde(rename = "event_value")]
    pub value: Option<u32>,
    #[serde(rename = "event_detail")]
    pub detail: Option<Detail>,
    #[serde(rename = "possession")]
    pub possession_flag: bool,
}

impl Event {
    /// Event with only the identity fields set; extractors fill the rest.
    pub fn new(game_id: &str, clock: Clock, kind: EventKind) -> Self {
        Self {
            game_id: s!(game_id),
            period: None,
            clock,
            score: None,
            team_id: None,
            players: None,
            opp_players: None,
            primary_actor: None,
            kind,
            value: None,
            detail: None,
            possession_flag: false,
        }
    }

    /// The player whose presence this event proves for its team.
    ///
    /// A substitution proves the incoming player (its roster is the
    /// post-substitution one). Technical fouls prove nothing: benches get them too.
    pub fn roster_actor(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Substitution => self.incoming(),
            k if k.is_technical_foul() => None,
            _ => self.primary_actor.as_deref(),
        }
    }

    /// Substitution only: the player entering.
    pub fn incoming(&self) -> Option<&str> {
        match self.kind {
            EventKind::Substitution => self.detail.as_ref().and_then(Detail::as_player),
            _ => None,
        }
    }

    /// Substitution only: the player leaving.
    pub fn outgoing(&self) -> Option<&str> {
        match self.kind {
            EventKind::Substitution => self.primary_actor.as_deref(),
            _ => None,
        }
    }

    /// Same play, ignoring the fields later stages fill in.
    pub fn same_play(&self, other: &Event) -> bool {
        self.kind == other.kind
            && self.team_id == other.team_id
            && self.primary_actor == other.primary_actor
            && self.value == other.value
            && self.detail == other.detail
            && self.possession_flag == other.possession_flag
    }
}
