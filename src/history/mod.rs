//! Finished-game history.
//!
//! - [`store`]: SQLite-backed record list used by the HTTP service.
//! - [`client`]: what a game front end uses to save and list records. It tries
//!   the HTTP service first and falls back to a local JSON file.

pub mod client;
pub mod store;

pub use client::{DurableHistory, HistorySource, LocalHistory, RemoteHistory, Saved};
pub use store::HistoryStore;
