//! Board renderer: a pure projection of game state into a render description.
//!
//! [`render_board`] takes the state, the transition graph and the view options
//! and produces a [`BoardView`]: the 10×10 grid, one token per player and one
//! overlay per snake or ladder. Nothing is cached between calls, so redrawing
//! with unchanged inputs yields an identical view.
//!
//! ## Layout
//!
//! Cell 100 is always top-left. [`BoardLayout::RowMajor`] fills every row left
//! to right (100..91, 90..81, …, 10..1). [`BoardLayout::Serpentine`] is the
//! printed-board convention: 1 bottom-left, rows alternate direction.
//!
//! ## Detail levels
//!
//! | Level | Ladder | Snake |
//! |-------|--------|-------|
//! | `icons` | midpoint icon | head icon + tail dot |
//! | `simple` | icon + straight line | icon + straight line with arrowhead |
//! | `full` | icon + two rails + four rungs | icon + curve with arrowhead |
//!
//! Every level labels both endpoints.

use std::borrow::Cow;
use std::fmt::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::transitions::{Transition, TransitionGraph, TransitionKind};
use crate::types::{GameState, PathResult};

/// Overlay richness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    #[default]
    Icons,
    Simple,
    Full,
}

impl DetailLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DetailLevel::Icons => "icons",
            DetailLevel::Simple => "simple",
            DetailLevel::Full => "full",
        }
    }
}

impl FromStr for DetailLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "icons" => Ok(DetailLevel::Icons),
            "simple" => Ok(DetailLevel::Simple),
            "full" => Ok(DetailLevel::Full),
            other => Err(format!(
                "unknown detail level '{other}' (expected icons, simple or full)"
            )),
        }
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cell numbering convention on the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardLayout {
    #[default]
    RowMajor,
    Serpentine,
}

impl BoardLayout {
    /// (row, col) of `cell`, row 0 at the top.
    pub fn position(self, cell: Cell) -> (usize, usize) {
        let n = BOARD_COLUMNS;
        match self {
            BoardLayout::RowMajor => {
                let offset = GOAL_CELL as usize - cell as usize;
                (offset / n, offset % n)
            }
            BoardLayout::Serpentine => {
                let idx = cell as usize - 1;
                let from_bottom = idx / n;
                let col = if from_bottom % 2 == 0 {
                    idx % n
                } else {
                    n - 1 - idx % n
                };
                (n - 1 - from_bottom, col)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn lerp(self, to: Point, t: f64) -> Point {
        Point::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }

    fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// View settings that persist across redraws.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RenderOptions {
    pub detail: DetailLevel,
    pub layout: BoardLayout,
    pub cell_size: f64,
    pub overlay_enabled: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            detail: DetailLevel::Icons,
            layout: BoardLayout::RowMajor,
            cell_size: DEFAULT_CELL_SIZE,
            overlay_enabled: true,
        }
    }
}

impl RenderOptions {
    pub fn cell_center(&self, cell: Cell) -> Point {
        let (row, col) = self.layout.position(cell);
        Point::new(
            (col as f64 + 0.5) * self.cell_size,
            (row as f64 + 0.5) * self.cell_size,
        )
    }
}

/// Pointer currently resting on one overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hover {
    pub transition: Transition,
}

impl Hover {
    /// Pointer entered the overlay drawn for `transition`.
    pub fn enter(transition: Transition) -> Self {
        Self { transition }
    }

    /// `"3 to 22 (Ladder)"`
    pub fn tooltip(&self) -> String {
        tooltip_text(&self.transition)
    }
}

fn tooltip_text(t: &Transition) -> String {
    format!("{} to {} ({})", t.from, t.to, t.kind().label())
}

/// Transient marks layered on top of the board.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Highlights {
    pub path: Option<PathResult>,
    pub hover: Option<Hover>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CellView {
    pub number: Cell,
    pub row: usize,
    pub col: usize,
    /// Top-left corner in pixels.
    pub origin: Point,
    /// Source end of the hovered overlay.
    pub highlight_start: bool,
    /// Destination end of the hovered overlay.
    pub highlight_end: bool,
    /// Step index when the cell lies on the highlighted path.
    pub path_step: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TokenView {
    pub player_index: usize,
    pub name: String,
    pub cell: Cell,
    /// Top-left corner in pixels.
    pub origin: Point,
    pub colour: &'static str,
}

/// Drawing primitive. Renderers may map these onto any technology.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rail { from: Point, to: Point },
    Rung { from: Point, to: Point },
    Line { from: Point, to: Point, arrow: bool },
    Curve { from: Point, c1: Point, c2: Point, to: Point, arrow: bool },
    Icon { asset: &'static str, center: Point, size: f64, angle: f64 },
    Label { at: Point, text: String },
    Dot { center: Point, radius: f64 },
}

/// Everything drawn for one transition edge.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Overlay {
    pub from: Cell,
    pub to: Cell,
    pub kind: TransitionKind,
    pub tooltip: String,
    pub shapes: Vec<Shape>,
}

impl Overlay {
    pub fn transition(&self) -> Transition {
        Transition {
            from: self.from,
            to: self.to,
        }
    }

    /// Count of connector shapes (rails, rungs, lines, curves).
    pub fn connector_count(&self) -> usize {
        self.shapes
            .iter()
            .filter(|s| {
                matches!(
                    s,
                    Shape::Rail { .. } | Shape::Rung { .. } | Shape::Line { .. } | Shape::Curve { .. }
                )
            })
            .count()
    }
}

/// Complete render description of the board.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoardView {
    pub width: f64,
    pub height: f64,
    pub cell_size: f64,
    pub detail: DetailLevel,
    /// Ordered top-left to bottom-right.
    pub cells: Vec<CellView>,
    pub tokens: Vec<TokenView>,
    pub overlays: Vec<Overlay>,
    pub tooltip: Option<String>,
}

pub const TOKEN_COLOURS: [&str; 6] = [
    "#e63946", "#1d3557", "#2a9d8f", "#f4a261", "#6a4c93", "#ffb703",
];

pub const LADDER_ICON: &str = "assets/ladder-icon.svg";
pub const SNAKE_HEAD_ICON: &str = "assets/snake-head.svg";

const LADDER_ICON_SIZE: f64 = 36.0;
const SNAKE_HEAD_SIZE: f64 = 20.0;
const RAIL_OFFSET: f64 = 8.0;
const RUNG_COUNT: usize = 4;
const TOKEN_SIZE: f64 = 12.0;

/// Project the game onto the board.
pub fn render_board(
    state: &GameState,
    graph: &TransitionGraph,
    options: &RenderOptions,
    highlights: &Highlights,
) -> BoardView {
    let size = options.cell_size;
    let span = size * BOARD_COLUMNS as f64;

    let hovered = highlights.hover.map(|h| h.transition);
    let mut cells = Vec::with_capacity(BOARD_CELLS);
    for number in (FIRST_CELL..=GOAL_CELL).rev() {
        let (row, col) = options.layout.position(number);
        cells.push(CellView {
            number,
            row,
            col,
            origin: Point::new(col as f64 * size, row as f64 * size),
            highlight_start: hovered.is_some_and(|t| t.from == number),
            highlight_end: hovered.is_some_and(|t| t.to == number),
            path_step: highlights.path.as_ref().and_then(|p| p.step_of(number)),
        });
    }
    cells.sort_by_key(|c| (c.row, c.col));

    let tokens = state
        .players
        .iter()
        .enumerate()
        .map(|(index, player)| {
            let (row, col) = options.layout.position(player.position);
            let slot = 4.0 + index as f64 * 16.0;
            TokenView {
                player_index: index,
                name: player.name.clone(),
                cell: player.position,
                origin: Point::new(col as f64 * size + slot, row as f64 * size + slot),
                colour: TOKEN_COLOURS[index % TOKEN_COLOURS.len()],
            }
        })
        .collect();

    let overlays = if options.overlay_enabled {
        graph
            .transitions()
            .iter()
            .map(|t| build_overlay(t, options))
            .collect()
    } else {
        Vec::new()
    };

    BoardView {
        width: span,
        height: span,
        cell_size: size,
        detail: options.detail,
        cells,
        tokens,
        overlays,
        tooltip: highlights.hover.map(|h| h.tooltip()),
    }
}

fn build_overlay(t: &Transition, options: &RenderOptions) -> Overlay {
    let a = options.cell_center(t.from);
    let b = options.cell_center(t.to);
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len = (dx * dx + dy * dy).sqrt().max(f64::EPSILON);
    // unit normal to the edge
    let (nx, ny) = (-dy / len, dx / len);
    let angle = dy.atan2(dx).to_degrees();
    let kind = t.kind();

    let mut shapes = Vec::new();
    match (kind, options.detail) {
        (_, DetailLevel::Icons) => {}
        (TransitionKind::Ladder, DetailLevel::Simple) => {
            shapes.push(Shape::Line {
                from: a,
                to: b,
                arrow: false,
            });
        }
        (TransitionKind::Ladder, DetailLevel::Full) => {
            let (ox, oy) = (nx * RAIL_OFFSET, ny * RAIL_OFFSET);
            shapes.push(Shape::Rail {
                from: a.offset(-ox, -oy),
                to: b.offset(-ox, -oy),
            });
            shapes.push(Shape::Rail {
                from: a.offset(ox, oy),
                to: b.offset(ox, oy),
            });
            for i in 1..=RUNG_COUNT {
                let mid = a.lerp(b, i as f64 / (RUNG_COUNT + 1) as f64);
                shapes.push(Shape::Rung {
                    from: mid.offset(-ox, -oy),
                    to: mid.offset(ox, oy),
                });
            }
        }
        (TransitionKind::Snake, DetailLevel::Simple) => {
            shapes.push(Shape::Line {
                from: a,
                to: b,
                arrow: true,
            });
        }
        (TransitionKind::Snake, DetailLevel::Full) => {
            let m = a.lerp(b, 0.5);
            shapes.push(Shape::Curve {
                from: a,
                c1: Point::new(m.x + dy * 0.12, m.y - dx * 0.08),
                c2: Point::new(m.x - dy * 0.12, m.y + dx * 0.08),
                to: b,
                arrow: true,
            });
        }
    }

    match kind {
        TransitionKind::Ladder => shapes.push(Shape::Icon {
            asset: LADDER_ICON,
            center: a.lerp(b, 0.5),
            size: LADDER_ICON_SIZE,
            angle,
        }),
        TransitionKind::Snake => {
            shapes.push(Shape::Icon {
                asset: SNAKE_HEAD_ICON,
                center: a,
                size: SNAKE_HEAD_SIZE,
                angle,
            });
            shapes.push(Shape::Dot {
                center: b,
                radius: 4.0,
            });
        }
    }

    shapes.push(Shape::Label {
        at: a.offset(-6.0, -12.0),
        text: t.from.to_string(),
    });
    shapes.push(Shape::Label {
        at: b.offset(-6.0, -12.0),
        text: t.to.to_string(),
    });

    Overlay {
        from: t.from,
        to: t.to,
        kind,
        tooltip: tooltip_text(t),
        shapes,
    }
}

fn kind_colour(kind: TransitionKind) -> &'static str {
    match kind {
        TransitionKind::Ladder => "#2e8b57",
        TransitionKind::Snake => "#b22222",
    }
}

impl BoardView {
    pub fn cell(&self, number: Cell) -> Option<&CellView> {
        self.cells.iter().find(|c| c.number == number)
    }

    pub fn overlay(&self, from: Cell) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.from == from)
    }

    /// Standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_svg(&mut out);
        out
    }

    fn write_svg(&self, out: &mut String) -> fmt::Result {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        )?;
        writeln!(
            out,
            r##"<defs><marker id="arrow" markerWidth="10" markerHeight="10" refX="5" refY="5" orient="auto"><path d="M0,0 L10,5 L0,10 z" fill="#b22222"/></marker></defs>"##
        )?;

        writeln!(out, r#"<g class="cells">"#)?;
        for cell in &self.cells {
            let mut class = String::from("cell");
            if cell.highlight_start {
                class.push_str(" highlight-start");
            }
            if cell.highlight_end {
                class.push_str(" highlight-end");
            }
            if cell.path_step.is_some() {
                class.push_str(" path-cell");
            }
            writeln!(
                out,
                r##"<rect id="cell-{n}" class="{class}" x="{x}" y="{y}" width="{s}" height="{s}" fill="#fdf6e3" stroke="#999"/>"##,
                n = cell.number,
                x = cell.origin.x,
                y = cell.origin.y,
                s = self.cell_size,
            )?;
            writeln!(
                out,
                r#"<text x="{}" y="{}" font-size="11">{}</text>"#,
                cell.origin.x + 3.0,
                cell.origin.y + self.cell_size - 4.0,
                cell.number
            )?;
            if let Some(step) = cell.path_step {
                writeln!(
                    out,
                    r#"<text class="path-step" x="{}" y="{}" font-size="10">{}</text>"#,
                    cell.origin.x + self.cell_size - 14.0,
                    cell.origin.y + 12.0,
                    step
                )?;
            }
        }
        writeln!(out, "</g>")?;

        let overlay_class = if self.detail == DetailLevel::Icons {
            "overlay icons-only"
        } else {
            "overlay"
        };
        writeln!(out, r#"<g id="s-l-svg" class="{overlay_class}">"#)?;
        for overlay in &self.overlays {
            let colour = kind_colour(overlay.kind);
            let class = match overlay.kind {
                TransitionKind::Ladder => "ladder",
                TransitionKind::Snake => "snake",
            };
            writeln!(
                out,
                r#"<g class="{class}" data-from="{}" data-to="{}"><title>{}</title>"#,
                overlay.from,
                overlay.to,
                escape_xml(&overlay.tooltip)
            )?;
            for shape in &overlay.shapes {
                write_shape(out, shape, colour)?;
            }
            writeln!(out, "</g>")?;
        }
        writeln!(out, "</g>")?;

        writeln!(out, r#"<g class="tokens">"#)?;
        for token in &self.tokens {
            let r = TOKEN_SIZE / 2.0;
            writeln!(
                out,
                r#"<circle class="token token{}" cx="{}" cy="{}" r="{r}" fill="{}"><title>{}</title></circle>"#,
                token.player_index + 1,
                token.origin.x + r,
                token.origin.y + r,
                token.colour,
                escape_xml(&token.name)
            )?;
        }
        writeln!(out, "</g>")?;

        if let Some(tip) = &self.tooltip {
            writeln!(
                out,
                r#"<text id="overlayTooltip" x="4" y="{}" font-size="12">{}</text>"#,
                self.height - 4.0,
                escape_xml(tip)
            )?;
        }
        writeln!(out, "</svg>")
    }

    /// Plain-text grid for terminals.
    ///
    /// Each cell shows its number followed by a marker: a player digit (or `*`
    /// when several share the cell), `+` on the highlighted path, `<`/`>` on
    /// the ends of the hovered overlay.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for row in self.cells.chunks(BOARD_COLUMNS) {
            for cell in row {
                let here: Vec<&TokenView> =
                    self.tokens.iter().filter(|t| t.cell == cell.number).collect();
                let marker = match here.as_slice() {
                    [one] => char::from_digit((one.player_index as u32 + 1) % 10, 10).unwrap_or('?'),
                    [_, _, ..] => '*',
                    [] if cell.highlight_start => '<',
                    [] if cell.highlight_end => '>',
                    [] if cell.path_step.is_some() => '+',
                    [] => ' ',
                };
                let _ = write!(out, "{:>4}{}", cell.number, marker);
            }
            out.push('\n');
        }
        for overlay in &self.overlays {
            let _ = writeln!(out, "  {}", overlay.tooltip);
        }
        if let Some(tip) = &self.tooltip {
            let _ = writeln!(out, "> {tip}");
        }
        out
    }
}

/// Escape text for use in SVG character data and attribute values.
fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn write_shape(out: &mut String, shape: &Shape, colour: &str) -> fmt::Result {
    match shape {
        Shape::Rail { from, to } => writeln!(
            out,
            r#"<line class="ladder-line" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{colour}" stroke-width="3"/>"#,
            from.x, from.y, to.x, to.y
        ),
        Shape::Rung { from, to } => writeln!(
            out,
            r#"<line class="ladder-rung" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{colour}" stroke-width="2"/>"#,
            from.x, from.y, to.x, to.y
        ),
        Shape::Line { from, to, arrow } => writeln!(
            out,
            r#"<line class="simple-line" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{colour}" stroke-dasharray="6 4"{}/>"#,
            from.x,
            from.y,
            to.x,
            to.y,
            if *arrow { r#" marker-end="url(#arrow)""# } else { "" }
        ),
        Shape::Curve {
            from,
            c1,
            c2,
            to,
            arrow,
        } => writeln!(
            out,
            r#"<path class="snake-path" d="M {} {} C {} {}, {} {}, {} {}" fill="none" stroke="{colour}" stroke-width="4"{}/>"#,
            from.x,
            from.y,
            c1.x,
            c1.y,
            c2.x,
            c2.y,
            to.x,
            to.y,
            if *arrow { r#" marker-end="url(#arrow)""# } else { "" }
        ),
        Shape::Icon {
            asset,
            center,
            size,
            angle,
        } => writeln!(
            out,
            r#"<image href="{}" x="{}" y="{}" width="{size}" height="{size}" transform="rotate({angle} {} {})"/>"#,
            escape_xml(asset),
            center.x - size / 2.0,
            center.y - size / 2.0,
            center.x,
            center.y
        ),
        Shape::Label { at, text } => writeln!(
            out,
            r#"<text x="{}" y="{}" font-size="10" fill="{colour}">{}</text>"#,
            at.x,
            at.y,
            escape_xml(text)
        ),
        Shape::Dot { center, radius } => writeln!(
            out,
            r#"<circle cx="{}" cy="{}" r="{radius}" fill="{colour}"/>"#,
            center.x, center.y
        ),
    }
}
