use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{Error, Result};

/// One participant: where they stand and how many times they have rolled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub position: Cell,
    pub moves: u32,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: FIRST_CELL,
            moves: 0,
        }
    }
}

/// Whole-game state, passed into and returned from the move engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub players: Vec<Player>,
    /// Index into `players` of whoever rolls next.
    pub current_turn: usize,
    /// Set once a player reaches [`GOAL_CELL`]; no turns are processed after.
    pub is_over: bool,
}

impl GameState {
    /// Fresh game: everyone on cell 1, first player to move.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        if names.is_empty() {
            return Err(Error::NoPlayers);
        }
        let mut players = Vec::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(Error::EmptyPlayerName { index });
            }
            players.push(Player::new(name));
        }
        Ok(Self {
            players,
            current_turn: 0,
            is_over: false,
        })
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_turn]
    }

    /// The player standing on the goal, if the game is over.
    pub fn winner(&self) -> Option<(usize, &Player)> {
        self.players
            .iter()
            .enumerate()
            .find(|(_, p)| p.position == GOAL_CELL)
    }
}

/// How a roll moved the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Movement {
    Plain,
    Ladder,
    Snake,
    /// Roll would pass 100; the player stays put.
    Overshoot,
}

/// Emitted once, when a roll lands a player on [`GOAL_CELL`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinEvent {
    pub player_index: usize,
    pub name: String,
    pub moves: u32,
}

impl WinEvent {
    /// History payload for this win: the score is the number of rolls taken.
    pub fn to_history_record(&self) -> NewHistoryRecord {
        NewHistoryRecord {
            username: self.name.clone(),
            score: i64::from(self.moves),
            result: DEFAULT_RESULT.to_string(),
        }
    }
}

/// Everything that happened during one die roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    pub player_index: usize,
    pub player_name: String,
    pub die_value: u8,
    pub from: Cell,
    /// `from + die_value`; may exceed 100 on an overshoot.
    pub tentative: u8,
    pub landed_cell: Cell,
    pub movement: Movement,
    pub win: Option<WinEvent>,
}

impl Roll {
    pub fn transitioned(&self) -> bool {
        matches!(self.movement, Movement::Ladder | Movement::Snake)
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rolled {}", self.player_name, self.die_value)?;
        match self.movement {
            Movement::Plain => Ok(()),
            Movement::Ladder => write!(f, " (Ladder)"),
            Movement::Snake => write!(f, " (Snake)"),
            Movement::Overshoot => write!(f, " (Overshoot)"),
        }
    }
}

/// Result of a move-engine call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollOutcome {
    /// `None` when the game was already over and nothing was rolled.
    pub roll: Option<Roll>,
    pub state: GameState,
}

/// Fewest-rolls route from a cell to [`GOAL_CELL`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    /// Starts at the query cell, ends at 100.
    pub path: Vec<Cell>,
    /// `path.len() - 1`
    pub move_count: usize,
}

impl PathResult {
    pub fn from_path(path: Vec<Cell>) -> Self {
        let move_count = path.len().saturating_sub(1);
        Self { path, move_count }
    }

    /// Position of `cell` along the path (0 = start).
    pub fn step_of(&self, cell: Cell) -> Option<usize> {
        self.path.iter().position(|&c| c == cell)
    }
}

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} moves: ", self.move_count)?;
        for (i, cell) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{cell}")?;
        }
        Ok(())
    }
}

/// A stored game result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Assigned by the history service; local fallback records have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub username: String,
    pub score: i64,
    pub result: String,
    pub played_on: DateTime<Utc>,
}

/// Payload of a history write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHistoryRecord {
    pub username: String,
    pub score: i64,
    pub result: String,
}

impl NewHistoryRecord {
    /// Stamp the record with a time and optional id.
    pub fn into_record(self, id: Option<i64>, played_on: DateTime<Utc>) -> HistoryRecord {
        HistoryRecord {
            id,
            username: self.username,
            score: self.score,
            result: self.result,
            played_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(&["Ann", "Bo"]).unwrap();
        assert_eq!(state.players.len(), 2);
        assert!(state.players.iter().all(|p| p.position == 1 && p.moves == 0));
        assert_eq!(state.current_turn, 0);
        assert!(!state.is_over);
        assert!(state.winner().is_none());
    }

    #[test]
    fn test_new_game_state_rejects_bad_players() {
        let none: [&str; 0] = [];
        assert!(matches!(GameState::new(&none), Err(Error::NoPlayers)));
        assert!(matches!(
            GameState::new(&["Ann", "  "]),
            Err(Error::EmptyPlayerName { index: 1 })
        ));
    }

    #[test]
    fn test_path_result_display() {
        let path = PathResult::from_path(vec![94, 100]);
        assert_eq!(path.move_count, 1);
        assert_eq!(path.to_string(), "1 moves: 94 -> 100");
        assert_eq!(path.step_of(100), Some(1));
    }

    #[test]
    fn test_win_event_record() {
        let win = WinEvent {
            player_index: 0,
            name: "Ann".into(),
            moves: 17,
        };
        let rec = win.to_history_record();
        assert_eq!(rec.username, "Ann");
        assert_eq!(rec.score, 17);
        assert_eq!(rec.result, "win");
    }
}
