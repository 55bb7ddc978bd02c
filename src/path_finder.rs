//! Fewest-rolls path to the goal.
//!
//! Every cell `n` has up to six out-edges, one per die face: `n -> resolve(n + d)`
//! for `n + d <= 100`. All edges cost one roll, so breadth-first search from the
//! query cell finds a minimal path. Parent pointers rebuild it from 100 back to
//! the start.

use std::collections::VecDeque;

use crate::constants::*;
use crate::error::{Error, Result};
use crate::transitions::TransitionGraph;
use crate::types::PathResult;

/// Cells reachable from `cell` in a single roll, following transitions.
pub fn successors(graph: &TransitionGraph, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
    (1..=DIE_FACES)
        .map(move |d| cell as u16 + d as u16)
        .filter(|&next| next <= GOAL_CELL as u16)
        .map(move |next| graph.resolve(next as Cell))
}

/// Shortest path (in die rolls) from `from` to cell 100.
///
/// Fails with [`Error::PathNotFound`] when the goal cannot be reached, which
/// only happens on a misconfigured board.
pub fn shortest_path(graph: &TransitionGraph, from: Cell) -> Result<PathResult> {
    if !is_on_board(from as i64) {
        return Err(Error::InvalidCell { cell: from as i64 });
    }
    if from == GOAL_CELL {
        return Ok(PathResult::from_path(vec![GOAL_CELL]));
    }

    let mut visited = [false; BOARD_CELLS + 1];
    let mut parent: [Option<Cell>; BOARD_CELLS + 1] = [None; BOARD_CELLS + 1];
    let mut queue = VecDeque::with_capacity(BOARD_CELLS);

    visited[from as usize] = true;
    queue.push_back(from);

    while let Some(node) = queue.pop_front() {
        if node == GOAL_CELL {
            break;
        }
        for next in successors(graph, node) {
            if !visited[next as usize] {
                visited[next as usize] = true;
                parent[next as usize] = Some(node);
                queue.push_back(next);
            }
        }
    }

    if !visited[GOAL_CELL as usize] {
        return Err(Error::PathNotFound { from });
    }

    let mut path = vec![GOAL_CELL];
    let mut cur = GOAL_CELL;
    while let Some(prev) = parent[cur as usize] {
        path.push(prev);
        cur = prev;
    }
    path.reverse();
    Ok(PathResult::from_path(path))
}
