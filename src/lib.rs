//! # Ladders: Snakes & Ladders engine and history service
//!
//! A 100-cell Snakes & Ladders board with a pure move engine, a breadth-first
//! shortest-path finder, a board renderer that projects game state into a
//! render description, and a small HTTP service that records finished games.
//!
//! ## Layers
//!
//! | Layer | Module | Description |
//! |-------|--------|-------------|
//! | Board | [`transitions`] | Fixed snake/ladder mapping, `resolve(cell)` |
//! | Rules | [`game_mechanics`] | One die roll applied to the active player |
//! | Search | [`path_finder`] | Fewest-rolls path from a cell to 100 |
//! | View | [`board`] | Grid, tokens and overlay per detail level, SVG/text output |
//! | Session | [`session`] | Owns the `GameState`, redraws after every mutation |
//! | History | [`history`] | SQLite store, remote client, local fallback |
//! | HTTP | [`server`] | Axum router for `/history` and static assets |
//!
//! ## Game state
//!
//! [`types::GameState`] is a plain value. The move engine takes a state and
//! returns the next one; nothing in the crate keeps game state in globals.
//! Randomness enters only through [`dice::DieRoller`], so tests can script
//! every roll.

pub mod board;
pub mod constants;
pub mod dice;
pub mod env_config;
pub mod error;
pub mod game_mechanics;
pub mod history;
pub mod path_finder;
pub mod server;
pub mod session;
pub mod transitions;
pub mod types;

pub use error::{Error, Result};
