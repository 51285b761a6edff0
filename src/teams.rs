// src/teams.rs
//
// Per-game team identity. Every stage that needs to know who is home or
// away gets a `GameContext` handed in; nothing is stored globally.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::event::{Side, TeamId};

/// One row of the games table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    pub game_id: String,
    pub home_team: TeamId,
    pub away_team: TeamId,
}

/// Which team a player was rostered to for a game.
pub trait TeamLookup: Send + Sync {
    fn team_of(&self, game_id: &str, player_id: &str) -> Option<TeamId>;
}

/// In-memory lineup table keyed by (game, player).
#[derive(Clone, Debug, Default)]
pub struct LineupTable {
    by_player: HashMap<(String, String), TeamId>,
}

impl LineupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, game_id: &str, player_id: &str, team_id: &str) {
        self.by_player
            .insert((s!(game_id), s!(player_id)), s!(team_id));
    }

    pub fn len(&self) -> usize {
        self.by_player.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_player.is_empty()
    }
}

impl TeamLookup for LineupTable {
    fn team_of(&self, game_id: &str, player_id: &str) -> Option<TeamId> {
        self.by_player
            .get(&(s!(game_id), s!(player_id)))
            .cloned()
    }
}

/// Everything the classifier and assembler need to know about one game.
#[derive(Clone, Copy)]
pub struct GameContext<'a> {
    game: &'a GameInfo,
    lineups: &'a dyn TeamLookup,
}

impl<'a> GameContext<'a> {
    pub fn new(game: &'a GameInfo, lineups: &'a dyn TeamLookup) -> Self {
        Self { game, lineups }
    }

    pub fn game_id(&self) -> &'a str {
        &self.game.game_id
    }

    pub fn home(&self) -> &'a str {
        &self.game.home_team
    }

    pub fn away(&self) -> &'a str {
        &self.game.away_team
    }

    pub fn team_for(&self, side: Side) -> &'a str {
        match side {
            Side::Home => self.home(),
            Side::Away => self.away(),
        }
    }

    pub fn side_of(&self, team_id: &str) -> Option<Side> {
        if team_id == self.home() {
            Some(Side::Home)
        } else if team_id == self.away() {
            Some(Side::Away)
        } else {
            None
        }
    }

    pub fn other_team(&self, team_id: &str) -> Option<&'a str> {
        self.side_of(team_id).map(|s| self.team_for(s.opposite()))
    }

    /// Team the player was rostered to, per the lineup table.
    pub fn team_of_player(&self, player_id: &str) -> Option<TeamId> {
        self.lineups.team_of(self.game_id(), player_id)
    }
}
