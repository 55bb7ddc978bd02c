//! Property-based tests for the board, move engine and path finder.

use proptest::prelude::*;

use ladders::constants::*;
use ladders::game_mechanics::apply_die;
use ladders::path_finder::{shortest_path, successors};
use ladders::transitions::TransitionGraph;
use ladders::types::{GameState, Movement};

/// Strategy: a cell a player can stand on before the goal.
fn cell_strategy() -> impl Strategy<Value = Cell> {
    FIRST_CELL..GOAL_CELL
}

/// Strategy: a die face (1-6).
fn die_strategy() -> impl Strategy<Value = u8> {
    1..=DIE_FACES
}

fn state_for(players: usize, turn: usize, position: Cell) -> GameState {
    let names: Vec<String> = (0..players).map(default_player_name).collect();
    let mut state = GameState::new(&names).unwrap();
    state.current_turn = turn;
    state.players[turn].position = position;
    state
}

/// Minimum rolls to 100 from every cell by value iteration (independent of BFS).
fn rolls_to_goal(graph: &TransitionGraph) -> Vec<Option<usize>> {
    let mut dist: Vec<Option<usize>> = vec![None; BOARD_CELLS + 1];
    dist[GOAL_CELL as usize] = Some(0);
    loop {
        let mut changed = false;
        for cell in FIRST_CELL..GOAL_CELL {
            let best = successors(graph, cell)
                .filter_map(|next| dist[next as usize])
                .min()
                .map(|d| d + 1);
            if let Some(best) = best {
                if dist[cell as usize].map_or(true, |cur| best < cur) {
                    dist[cell as usize] = Some(best);
                    changed = true;
                }
            }
        }
        if !changed {
            return dist;
        }
    }
}

proptest! {
    // 1. resolve(c + d) stays on the board and is deterministic
    #[test]
    fn resolve_on_board(c in 1..=94u8, d in die_strategy()) {
        let graph = TransitionGraph::standard();
        let r1 = graph.resolve(c + d);
        let r2 = graph.resolve(c + d);
        prop_assert!((FIRST_CELL..=GOAL_CELL).contains(&r1), "resolve({})={r1}", c + d);
        prop_assert_eq!(r1, r2);
    }

    // 2. Every roll counts as a move and lands on the board
    #[test]
    fn roll_counts_and_stays_on_board(pos in cell_strategy(), d in die_strategy()) {
        let graph = TransitionGraph::standard();
        let out = apply_die(&state_for(1, 0, pos), &graph, d).unwrap();
        let player = &out.state.players[0];
        prop_assert_eq!(player.moves, 1);
        prop_assert!((FIRST_CELL..=GOAL_CELL).contains(&player.position));
    }

    // 3. Overshoot never moves the player
    #[test]
    fn overshoot_is_noop(pos in 95..GOAL_CELL, d in die_strategy()) {
        prop_assume!(pos + d > GOAL_CELL);
        let graph = TransitionGraph::standard();
        let out = apply_die(&state_for(1, 0, pos), &graph, d).unwrap();
        prop_assert_eq!(out.roll.unwrap().movement, Movement::Overshoot);
        prop_assert_eq!(out.state.players[0].position, pos);
    }

    // 4. Turn advances round-robin unless the roll wins
    #[test]
    fn turn_rotation(players in 1..6usize, turn_seed in 0..6usize, pos in 1..90u8, d in die_strategy()) {
        let turn = turn_seed % players;
        let graph = TransitionGraph::standard();
        let out = apply_die(&state_for(players, turn, pos), &graph, d).unwrap();
        prop_assert!(!out.state.is_over);
        prop_assert_eq!(out.state.current_turn, (turn + 1) % players);
    }

    // 5. BFS path length matches an independent value-iteration distance
    #[test]
    fn shortest_path_is_minimal(start in 1..=GOAL_CELL) {
        let graph = TransitionGraph::standard();
        let dist = rolls_to_goal(&graph);
        let result = shortest_path(&graph, start).unwrap();
        prop_assert_eq!(Some(result.move_count), dist[start as usize]);
        prop_assert_eq!(result.path[0], start);
        prop_assert_eq!(*result.path.last().unwrap(), GOAL_CELL);
    }

    // 6. Paths on random valid boards are consistent whenever one exists
    #[test]
    fn random_board_paths(
        edges in prop::collection::hash_map(2..GOAL_CELL, FIRST_CELL..=GOAL_CELL, 0..12),
        start in 1..=GOAL_CELL,
    ) {
        let pairs: Vec<(i64, i64)> = edges
            .into_iter()
            .filter(|(f, t)| f != t)
            .map(|(f, t)| (f as i64, t as i64))
            .collect();
        let graph = TransitionGraph::new(pairs).unwrap();
        let dist = rolls_to_goal(&graph);
        match shortest_path(&graph, start) {
            Ok(result) => {
                prop_assert_eq!(Some(result.move_count), dist[start as usize]);
                for w in result.path.windows(2) {
                    prop_assert!(successors(&graph, w[0]).any(|c| c == w[1]));
                }
            }
            Err(_) => prop_assert_eq!(dist[start as usize], None),
        }
    }
}

#[test]
fn worked_examples() {
    let graph = TransitionGraph::standard();

    let out = apply_die(&state_for(1, 0, 97), &graph, 5).unwrap();
    assert_eq!(out.state.players[0].position, 97);
    assert_eq!(out.state.players[0].moves, 1);

    let out = apply_die(&state_for(1, 0, 1), &graph, 2).unwrap();
    assert_eq!(out.state.players[0].position, 22);

    let out = apply_die(&state_for(1, 0, 24), &graph, 3).unwrap();
    assert_eq!(out.state.players[0].position, 1);

    let path = shortest_path(&graph, 94).unwrap();
    assert_eq!(path.path, vec![94, 100]);
    assert_eq!(path.move_count, 1);
}
