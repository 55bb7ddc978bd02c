//! Move engine: one die roll applied to the player whose turn it is.
//!
//! The engine is a pure function of (state, board, die value). It never
//! mutates its input; the caller receives the successor state in a
//! [`RollOutcome`] and decides when to redraw or persist.

use tracing::debug;

use crate::constants::*;
use crate::dice::DieRoller;
use crate::error::{Error, Result};
use crate::transitions::TransitionGraph;
use crate::types::{GameState, Movement, Roll, RollOutcome, WinEvent};

/// Roll the die for the current player and apply the result.
///
/// A finished game is returned unchanged and the die is not consulted.
pub fn roll_dice<D: DieRoller + ?Sized>(
    state: &GameState,
    graph: &TransitionGraph,
    die: &mut D,
) -> Result<RollOutcome> {
    if state.is_over {
        return Ok(RollOutcome {
            roll: None,
            state: state.clone(),
        });
    }
    apply_die(state, graph, die.roll())
}

/// Apply an already-chosen die value to the current player.
///
/// Overshooting 100 leaves the position unchanged but still counts as a move.
/// Landing on a transition source follows it once. Reaching 100 ends the game
/// without advancing the turn; otherwise the turn passes round-robin.
pub fn apply_die(state: &GameState, graph: &TransitionGraph, die_value: u8) -> Result<RollOutcome> {
    if !(1..=DIE_FACES).contains(&die_value) {
        return Err(Error::InvalidDieValue { value: die_value });
    }
    if state.is_over {
        return Ok(RollOutcome {
            roll: None,
            state: state.clone(),
        });
    }

    let mut next = state.clone();
    let player_index = next.current_turn;
    let player = &mut next.players[player_index];
    let from = player.position;
    let tentative = from + die_value;

    let (landed_cell, movement) = if tentative > GOAL_CELL {
        (from, Movement::Overshoot)
    } else {
        let resolved = graph.resolve(tentative);
        let movement = match resolved.cmp(&tentative) {
            std::cmp::Ordering::Greater => Movement::Ladder,
            std::cmp::Ordering::Less => Movement::Snake,
            std::cmp::Ordering::Equal => Movement::Plain,
        };
        (resolved, movement)
    };

    player.position = landed_cell;
    player.moves += 1;

    let win = (landed_cell == GOAL_CELL).then(|| WinEvent {
        player_index,
        name: player.name.clone(),
        moves: player.moves,
    });

    let roll = Roll {
        player_index,
        player_name: player.name.clone(),
        die_value,
        from,
        tentative,
        landed_cell,
        movement,
        win,
    };
    debug!(
        player = %roll.player_name,
        die = die_value,
        from,
        to = landed_cell,
        ?movement,
        "roll applied"
    );

    if roll.win.is_some() {
        next.is_over = true;
    } else {
        next.current_turn = (next.current_turn + 1) % next.players.len();
    }

    Ok(RollOutcome {
        roll: Some(roll),
        state: next,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDie;

    fn state_at(positions: &[Cell]) -> GameState {
        let names: Vec<String> = (0..positions.len()).map(default_player_name).collect();
        let mut state = GameState::new(&names).unwrap();
        for (p, &pos) in state.players.iter_mut().zip(positions) {
            p.position = pos;
        }
        state
    }

    #[test]
    fn test_overshoot_keeps_position_counts_move() {
        let graph = TransitionGraph::standard();
        let state = state_at(&[97]);
        let out = apply_die(&state, &graph, 5).unwrap();
        let roll = out.roll.unwrap();
        assert_eq!(roll.movement, Movement::Overshoot);
        assert_eq!(roll.tentative, 102);
        assert_eq!(out.state.players[0].position, 97);
        assert_eq!(out.state.players[0].moves, 1);
        assert!(!out.state.is_over);
    }

    #[test]
    fn test_ladder_from_start() {
        let graph = TransitionGraph::standard();
        let out = apply_die(&state_at(&[1]), &graph, 2).unwrap();
        let roll = out.roll.unwrap();
        assert_eq!(roll.tentative, 3);
        assert_eq!(roll.landed_cell, 22);
        assert_eq!(roll.movement, Movement::Ladder);
        assert!(roll.transitioned());
        assert_eq!(out.state.players[0].position, 22);
    }

    #[test]
    fn test_snake_back_to_start() {
        let graph = TransitionGraph::standard();
        let out = apply_die(&state_at(&[22]), &graph, 5).unwrap();
        let roll = out.roll.unwrap();
        assert_eq!(roll.tentative, 27);
        assert_eq!(roll.movement, Movement::Snake);
        assert_eq!(out.state.players[0].position, 1);
    }

    #[test]
    fn test_plain_move() {
        let graph = TransitionGraph::standard();
        let out = apply_die(&state_at(&[40]), &graph, 4).unwrap();
        let roll = out.roll.unwrap();
        assert_eq!(roll.movement, Movement::Plain);
        assert_eq!(out.state.players[0].position, 44);
        assert_eq!(roll.to_string(), "Player 1 rolled 4");
    }

    #[test]
    fn test_win_stops_game_and_turn() {
        let graph = TransitionGraph::standard();
        let state = state_at(&[96, 10]);
        let out = apply_die(&state, &graph, 4).unwrap();
        let win = out.roll.unwrap().win.unwrap();
        assert_eq!(win.player_index, 0);
        assert_eq!(win.moves, 1);
        assert!(out.state.is_over);
        assert_eq!(out.state.current_turn, 0);

        let mut die = ScriptedDie::new(vec![3]).unwrap();
        let after = roll_dice(&out.state, &graph, &mut die).unwrap();
        assert!(after.roll.is_none());
        assert_eq!(after.state, out.state);
        assert_eq!(die.rolls(), 0);
    }

    #[test]
    fn test_turn_wraps_round_robin() {
        let graph = TransitionGraph::standard();
        let mut state = state_at(&[40, 40, 40]);
        state.current_turn = 2;
        let out = apply_die(&state, &graph, 1).unwrap();
        assert_eq!(out.state.current_turn, 0);
        assert_eq!(out.state.players[2].position, 41);
    }

    #[test]
    fn test_input_state_untouched() {
        let graph = TransitionGraph::standard();
        let state = state_at(&[1]);
        let _ = apply_die(&state, &graph, 6).unwrap();
        assert_eq!(state.players[0].position, 1);
        assert_eq!(state.players[0].moves, 0);
    }

    #[test]
    fn test_rejects_bad_die_value() {
        let graph = TransitionGraph::standard();
        let state = state_at(&[1]);
        assert!(matches!(
            apply_die(&state, &graph, 0),
            Err(Error::InvalidDieValue { value: 0 })
        ));
        assert!(apply_die(&state, &graph, 7).is_err());
    }

    #[test]
    fn test_roll_dice_uses_injected_die() {
        let graph = TransitionGraph::standard();
        let mut die = ScriptedDie::new(vec![4, 6]).unwrap();
        let s1 = roll_dice(&state_at(&[1, 1]), &graph, &mut die).unwrap().state;
        let s2 = roll_dice(&s1, &graph, &mut die).unwrap().state;
        // 1 + 4 = 5 -> ladder to 8; 1 + 6 = 7 plain
        assert_eq!(s2.players[0].position, 8);
        assert_eq!(s2.players[1].position, 7);
        assert_eq!(s2.current_turn, 0);
    }
}
