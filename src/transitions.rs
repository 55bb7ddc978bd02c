//! Transition graph: the fixed snake and ladder edges of the board.
//!
//! A transition moves a player from its source cell to its destination as soon
//! as they land on the source. Destination above source is a ladder, below is a
//! snake. The graph is validated once at construction and never mutated.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{Error, Result};

/// Direction of a transition edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Ladder,
    Snake,
}

impl TransitionKind {
    /// Classify the edge `from -> to`.
    pub fn of(from: Cell, to: Cell) -> Self {
        if to > from {
            TransitionKind::Ladder
        } else {
            TransitionKind::Snake
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransitionKind::Ladder => "Ladder",
            TransitionKind::Snake => "Snake",
        }
    }
}

/// One snake or ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Transition {
    pub from: Cell,
    pub to: Cell,
}

impl Transition {
    pub fn kind(&self) -> TransitionKind {
        TransitionKind::of(self.from, self.to)
    }
}

/// Immutable source -> destination mapping over cells 1..=100.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionGraph {
    edges: HashMap<Cell, Cell>,
}

impl Default for TransitionGraph {
    fn default() -> Self {
        Self::standard()
    }
}

impl TransitionGraph {
    /// Build a graph from `(source, destination)` pairs.
    ///
    /// Rejects cells off the board, self-loops and a source used twice.
    pub fn new<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        let mut edges = HashMap::new();
        for (from, to) in pairs {
            let invalid = |reason: &str| Error::InvalidTransition {
                from,
                to,
                reason: reason.to_string(),
            };
            if !is_on_board(from) || !is_on_board(to) {
                return Err(invalid("cells must be 1-100"));
            }
            if from == to {
                return Err(invalid("a cell cannot map to itself"));
            }
            if edges.insert(from as Cell, to as Cell).is_some() {
                return Err(invalid("source already has a transition"));
            }
        }
        Ok(Self { edges })
    }

    /// The board every game uses unless configured otherwise.
    pub fn standard() -> Self {
        Self {
            edges: STANDARD_TRANSITIONS.iter().copied().collect(),
        }
    }

    /// Load a board from a JSON file of `[[from, to], ...]` pairs.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("read board file {}", path.display()), e))?;
        let pairs: Vec<(i64, i64)> = serde_json::from_str(&content)?;
        Self::new(pairs)
    }

    /// Destination of `cell` if it is a transition source, else `cell`.
    #[inline(always)]
    pub fn resolve(&self, cell: Cell) -> Cell {
        self.edges.get(&cell).copied().unwrap_or(cell)
    }

    /// The transition starting at `from`, if any.
    pub fn get(&self, from: Cell) -> Option<Transition> {
        self.edges.get(&from).map(|&to| Transition { from, to })
    }

    /// All edges ordered by source cell.
    pub fn transitions(&self) -> Vec<Transition> {
        let mut all: Vec<Transition> = self
            .edges
            .iter()
            .map(|(&from, &to)| Transition { from, to })
            .collect();
        all.sort_by_key(|t| t.from);
        all
    }

    pub fn ladder_count(&self) -> usize {
        self.edges.iter().filter(|(f, t)| t > f).count()
    }

    pub fn snake_count(&self) -> usize {
        self.edges.iter().filter(|(f, t)| t < f).count()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
