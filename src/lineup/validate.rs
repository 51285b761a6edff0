// src/lineup/validate.rs
use crate::{config::consts::ON_COURT, roster::RosterKey};

/// `Err(found)` with the distinct-player count of the first slot that is not
/// exactly five. An empty sequence means the team never appeared: `Err(0)`.
pub fn validate(slots: &[RosterKey]) -> Result<(), usize> {
    if slots.is_empty() {
        return Err(0);
    }
    match slots.iter().map(RosterKey::distinct).find(|n| *n != ON_COURT) {
        Some(found) => Err(found),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_five_distinct() {
        let full = RosterKey::from_ids(["a", "b", "c", "d", "e"]);
        let four = RosterKey::from_ids(["a", "b", "c", "d"]);
        let six = RosterKey::from_ids(["a", "b", "c", "d", "e", "f"]);

        assert_eq!(validate(&[full.clone(), full.clone()]), Ok(()));
        assert_eq!(validate(&[full, four]), Err(4));
        assert_eq!(validate(&[six]), Err(6));
        assert_eq!(validate(&[]), Err(0));
    }

    #[test]
    fn ids_without_a_common_marker_still_count() {
        // Distinct count does not depend on what the ids look like.
        let odd = RosterKey::from_ids(["x", "yy", "z9", "w_1", "v"]);
        assert_eq!(validate(&[odd]), Ok(()));
    }
}
