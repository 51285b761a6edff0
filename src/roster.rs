// src/roster.rs
// On-court roster for one team at one event.

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::config::consts::{ON_COURT, ROSTER_SEP};

/// Player ids in insertion order.
///
/// Encoded as `a|b|c|d|e`: the first four carry the separator, the fifth is
/// bare. Shorter rosters keep a trailing separator (`a|b|`), so a complete
/// key is recognisable at a glance. Equality is on the set of ids.
#[derive(Clone, Debug, Default)]
pub struct RosterKey {
    ids: Vec<String>,
}

impl RosterKey {
    pub fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Build from ids, dropping repeats.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut key = Self::new();
        for id in ids {
            key.insert(&id.into());
        }
        key
    }

    /// Parse an encoded key; empty segments are ignored.
    pub fn parse(encoded: &str) -> Self {
        Self::from_ids(encoded.split(ROSTER_SEP).filter(|s| !s.is_empty()))
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Exactly five distinct players.
    pub fn is_complete(&self) -> bool {
        self.distinct() == ON_COURT
    }

    /// Distinct-id count; the invariant check never trusts the encoding.
    pub fn distinct(&self) -> usize {
        self.ids.iter().collect::<HashSet<_>>().len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|p| p == id)
    }

    /// Append when absent. Returns whether the key changed.
    pub fn insert(&mut self, id: &str) -> bool {
        if id.is_empty() || self.contains(id) {
            return false;
        }
        self.ids.push(s!(id));
        true
    }

    /// Swap `from` for `to` in place, keeping its position.
    /// When `from` is absent, `to` is appended (if absent itself).
    pub fn replace(&mut self, from: &str, to: &str) {
        match self.ids.iter().position(|p| p == from) {
            Some(ix) if self.contains(to) => {
                self.ids.remove(ix);
            }
            Some(ix) => self.ids[ix] = s!(to),
            None => {
                self.insert(to);
            }
        }
    }

    /// Ids at positions `from..`, for positional fill-down.
    pub fn tail(&self, from: usize) -> &[String] {
        self.ids.get(from..).unwrap_or(&[])
    }

    pub fn encode(&self) -> String {
        let mut out = s!();
        for (i, id) in self.ids.iter().enumerate() {
            out.push_str(id);
            let last_of_five = i == ON_COURT - 1 && self.ids.len() == ON_COURT;
            let last_of_many = i + 1 == self.ids.len() && self.ids.len() > ON_COURT;
            if !(last_of_five || last_of_many) {
                out.push(ROSTER_SEP);
            }
        }
        out
    }
}

impl PartialEq for RosterKey {
    fn eq(&self, other: &Self) -> bool {
        let a: HashSet<&str> = self.ids.iter().map(String::as_str).collect();
        let b: HashSet<&str> = other.ids.iter().map(String::as_str).collect();
        a == b
    }
}

impl Eq for RosterKey {}

impl fmt::Display for RosterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl Serialize for RosterKey {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&self.encode())
    }
}
