//! Board constants and cell geometry.
//!
//! Cells are numbered 1..=100. Cell 100 is the goal and sits in the top-left
//! corner of the grid for every layout.

/// Cell type: a board square in [`FIRST_CELL`]..=[`GOAL_CELL`].
pub type Cell = u8;

/// Number of squares on the board.
pub const BOARD_CELLS: usize = 100;

/// Squares per row (and rows per board).
pub const BOARD_COLUMNS: usize = 10;

/// Every player starts here.
pub const FIRST_CELL: Cell = 1;

/// Landing exactly here wins the game.
pub const GOAL_CELL: Cell = 100;

/// Faces on the die: rolls are uniform in 1..=DIE_FACES.
pub const DIE_FACES: u8 = 6;

/// Standard board: (source, destination). Ladders first, then snakes.
pub const STANDARD_TRANSITIONS: [(Cell, Cell); 9] = [
    (3, 22),
    (5, 8),
    (11, 26),
    (20, 29),
    (27, 1),
    (21, 9),
    (17, 4),
    (19, 7),
    (99, 78),
];

/// Maximum number of records returned by a history read.
pub const HISTORY_LIMIT: usize = 100;

/// Default `result` stored when a history write omits it.
pub const DEFAULT_RESULT: &str = "win";

/// Default TCP port of the history service.
pub const DEFAULT_PORT: u16 = 3000;

/// Default pixel edge of one rendered cell.
pub const DEFAULT_CELL_SIZE: f64 = 60.0;

/// Test whether `cell` is a square on the board.
#[inline(always)]
pub fn is_on_board(cell: i64) -> bool {
    (FIRST_CELL as i64..=GOAL_CELL as i64).contains(&cell)
}

/// Display name for the `index`-th player (0-based) when none was supplied.
pub fn default_player_name(index: usize) -> String {
    format!("Player {}", index + 1)
}
