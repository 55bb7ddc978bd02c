//! A running game: state, board, die source and the current view.
//!
//! The session owns the [`GameState`] exclusively. Every mutating call runs the
//! move engine or changes a view setting, then redraws from scratch so the
//! stored [`BoardView`] always matches the state.

use tracing::{debug, info};

use crate::board::{render_board, BoardView, DetailLevel, Highlights, Hover, RenderOptions};
use crate::constants::*;
use crate::dice::DieRoller;
use crate::error::Result;
use crate::game_mechanics::roll_dice;
use crate::path_finder::shortest_path;
use crate::transitions::TransitionGraph;
use crate::types::{GameState, PathResult, RollOutcome};

/// Player names for a new session.
///
/// The lobby supplies the player count and the primary player's name; the
/// remaining names come from `extra` in order, and any that are missing or
/// blank become `Player i`.
pub fn lobby_names<I, S>(player_count: usize, primary: &str, extra: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let count = player_count.max(1);
    let mut names = Vec::with_capacity(count);
    let primary = primary.trim();
    names.push(if primary.is_empty() {
        default_player_name(0)
    } else {
        primary.to_string()
    });
    let mut extra = extra.into_iter();
    for index in 1..count {
        let name = extra
            .next()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default_player_name(index));
        names.push(name);
    }
    names
}

/// One row of the scoreboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreRow {
    pub name: String,
    pub position: Cell,
    pub moves: u32,
    pub to_move: bool,
}

pub struct Session<D: DieRoller> {
    state: GameState,
    graph: TransitionGraph,
    die: D,
    options: RenderOptions,
    highlights: Highlights,
    view: BoardView,
}

impl<D: DieRoller> Session<D> {
    pub fn new<S: AsRef<str>>(names: &[S], graph: TransitionGraph, die: D) -> Result<Self> {
        let state = GameState::new(names)?;
        info!(players = state.players.len(), "new session");
        let options = RenderOptions::default();
        let highlights = Highlights::default();
        let view = render_board(&state, &graph, &options, &highlights);
        Ok(Self {
            state,
            graph,
            die,
            options,
            highlights,
            view,
        })
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self.redraw();
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn graph(&self) -> &TransitionGraph {
        &self.graph
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn highlighted_path(&self) -> Option<&PathResult> {
        self.highlights.path.as_ref()
    }

    /// Last rendered board.
    pub fn view(&self) -> &BoardView {
        &self.view
    }

    /// Rebuild the view from the current state and settings.
    pub fn redraw(&mut self) -> &BoardView {
        self.view = render_board(&self.state, &self.graph, &self.options, &self.highlights);
        &self.view
    }

    /// Roll for the current player. A stale path highlight is dropped.
    ///
    /// After the game is over this is a no-op and the outcome carries no roll.
    pub fn roll(&mut self) -> Result<RollOutcome> {
        let outcome = roll_dice(&self.state, &self.graph, &mut self.die)?;
        if outcome.roll.is_some() {
            self.state = outcome.state.clone();
            self.highlights.path = None;
            self.redraw();
        }
        if let Some(win) = outcome.roll.as_ref().and_then(|r| r.win.as_ref()) {
            info!(player = %win.name, moves = win.moves, "game won");
        }
        Ok(outcome)
    }

    /// Fewest-rolls path for the player whose turn it is; highlighted on success.
    pub fn shortest_path(&mut self) -> Result<PathResult> {
        let from = self.state.current_player().position;
        let path = shortest_path(&self.graph, from)?;
        debug!(from, moves = path.move_count, "path highlighted");
        self.highlights.path = Some(path.clone());
        self.redraw();
        Ok(path)
    }

    pub fn clear_path(&mut self) {
        self.highlights.path = None;
        self.redraw();
    }

    /// Flip overlay visibility; returns the new setting.
    pub fn toggle_overlay(&mut self) -> bool {
        self.options.overlay_enabled = !self.options.overlay_enabled;
        if !self.options.overlay_enabled {
            self.highlights.hover = None;
        }
        self.redraw();
        self.options.overlay_enabled
    }

    pub fn set_detail(&mut self, detail: DetailLevel) {
        self.options.detail = detail;
        self.redraw();
    }

    /// Pointer enters the overlay of the transition starting at `from`.
    ///
    /// Returns the tooltip, or `None` if no visible overlay starts there.
    pub fn hover(&mut self, from: Cell) -> Option<String> {
        if !self.options.overlay_enabled {
            return None;
        }
        let transition = self.graph.get(from)?;
        let hover = Hover::enter(transition);
        self.highlights.hover = Some(hover);
        self.redraw();
        Some(hover.tooltip())
    }

    /// Pointer leaves the hovered overlay.
    pub fn leave(&mut self) {
        self.highlights.hover = None;
        self.redraw();
    }

    pub fn scoreboard(&self) -> Vec<ScoreRow> {
        self.state
            .players
            .iter()
            .enumerate()
            .map(|(index, p)| ScoreRow {
                name: p.name.clone(),
                position: p.position,
                moves: p.moves,
                to_move: !self.state.is_over && index == self.state.current_turn,
            })
            .collect()
    }

    pub fn turn_label(&self) -> String {
        match self.state.winner() {
            Some((_, player)) => format!("Winner: {}", player.name),
            None => format!("Turn: {}", self.state.current_player().name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDie;
    use crate::error::Error;

    fn session(names: &[&str], faces: Vec<u8>) -> Session<ScriptedDie> {
        Session::new(names, TransitionGraph::standard(), ScriptedDie::new(faces).unwrap()).unwrap()
    }

    #[test]
    fn test_lobby_names() {
        let names = lobby_names(3, "host", ["  ", "Cy"]);
        assert_eq!(names, vec!["host", "Player 2", "Cy"]);
        let names = lobby_names(3, "host", ["Bo"]);
        assert_eq!(names, vec!["host", "Bo", "Player 3"]);
        let names = lobby_names(0, "", Vec::<String>::new());
        assert_eq!(names, vec!["Player 1"]);
    }

    #[test]
    fn test_roll_updates_view() {
        let mut s = session(&["Ann", "Bo"], vec![2]);
        let outcome = s.roll().unwrap();
        assert_eq!(outcome.roll.unwrap().landed_cell, 22);
        assert_eq!(s.state().players[0].position, 22);
        assert_eq!(s.view().tokens[0].cell, 22);
        assert_eq!(s.turn_label(), "Turn: Bo");
    }

    #[test]
    fn test_roll_after_win_is_noop() {
        let mut s = session(&["Ann"], vec![6]);
        s.state.players[0].position = 94;
        let win = s.roll().unwrap().roll.unwrap().win.unwrap();
        assert_eq!(win.name, "Ann");
        assert_eq!(s.turn_label(), "Winner: Ann");
        let before = s.state().clone();
        let outcome = s.roll().unwrap();
        assert!(outcome.roll.is_none());
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn test_path_highlight_and_clear() {
        let mut s = session(&["Ann"], vec![1]);
        s.state.players[0].position = 94;
        let path = s.shortest_path().unwrap();
        assert_eq!(path.path, vec![94, 100]);
        assert_eq!(s.view().cell(100).unwrap().path_step, Some(1));
        s.clear_path();
        assert!(s.highlighted_path().is_none());
        assert!(s.view().cells.iter().all(|c| c.path_step.is_none()));
    }

    #[test]
    fn test_roll_drops_stale_path() {
        let mut s = session(&["Ann"], vec![1]);
        s.shortest_path().unwrap();
        s.roll().unwrap();
        assert!(s.highlighted_path().is_none());
    }

    #[test]
    fn test_unreachable_path_is_reported() {
        let graph = TransitionGraph::new((94..=99).map(|c| (c, 10))).unwrap();
        let mut s = Session::new(&["Ann"], graph, ScriptedDie::new(vec![1]).unwrap()).unwrap();
        assert!(matches!(s.shortest_path(), Err(Error::PathNotFound { from: 1 })));
        assert!(s.highlighted_path().is_none());
    }

    #[test]
    fn test_overlay_toggle_and_detail() {
        let mut s = session(&["Ann"], vec![1]);
        assert_eq!(s.view().overlays.len(), 9);
        assert!(!s.toggle_overlay());
        assert!(s.view().overlays.is_empty());
        assert_eq!(s.hover(3), None);
        assert!(s.toggle_overlay());
        s.set_detail(DetailLevel::Full);
        assert_eq!(s.view().detail, DetailLevel::Full);
        assert_eq!(s.view().overlay(3).unwrap().connector_count(), 6);
    }

    #[test]
    fn test_hover_and_leave() {
        let mut s = session(&["Ann"], vec![1]);
        assert_eq!(s.hover(27).as_deref(), Some("27 to 1 (Snake)"));
        assert!(s.view().cell(27).unwrap().highlight_start);
        assert!(s.view().cell(1).unwrap().highlight_end);
        assert_eq!(s.hover(50), None);
        s.leave();
        assert!(s.view().tooltip.is_none());
        assert!(!s.view().cell(27).unwrap().highlight_start);
    }

    #[test]
    fn test_redraw_idempotent() {
        let mut s = session(&["Ann", "Bo"], vec![3, 4]);
        s.roll().unwrap();
        let first = s.redraw().clone();
        let second = s.redraw().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_scoreboard() {
        let mut s = session(&["Ann", "Bo", "Cy"], vec![1]);
        s.roll().unwrap();
        let rows = s.scoreboard();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].position, 2);
        assert_eq!(rows[0].moves, 1);
        assert!(rows[1].to_move);
        assert!(!rows[0].to_move);
    }
}
