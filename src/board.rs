//! The row-major grid of cells being searched, plus the identifier bitset
//! tracking which pieces are already placed.
//!
//! A board owns exactly one extra "dummy" cell past the real grid. Every
//! cell on the right border points its right-neighbor offset at the dummy
//! cell instead of off the edge of the grid, and likewise for the bottom
//! border; the dummy cell's fields are written but never read. This removes
//! a bounds check from the hottest loop in the program (see SPEC_FULL.md
//! §3, "Key trick — dummy cell").

use crate::counter::BoardCounters;
use crate::index::CellClass;
use crate::puzzle::{Color, Puzzle, MAX_PIECES};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A piece placement: which piece, and in which of its four rotations.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Identifier {
    pub piece_id: u8,
    pub rotation: u8,
}

/// One grid position. `left_color`/`top_color` are written by this cell's
/// left/top neighbors (or left at `EDGE_COLOR` for border cells, since
/// nothing ever writes them); `identifier` is this cell's own placement.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cell {
    pub identifier: Identifier,
    pub left_color: Color,
    pub top_color: Color,
    pub right_neighbor: usize,
    pub bottom_neighbor: usize,
    pub class: CellClassTag,
}

/// A cheap copy of [`CellClass`] usable in a `Default`-able `Cell`.
#[derive(Clone, Copy, Debug, Default)]
pub enum CellClassTag {
    #[default]
    Inner,
    BorderBottom,
    BorderRight,
}

impl From<CellClassTag> for CellClass {
    fn from(tag: CellClassTag) -> CellClass {
        match tag {
            CellClassTag::Inner => CellClass::Inner,
            CellClassTag::BorderBottom => CellClass::BorderBottom,
            CellClassTag::BorderRight => CellClass::BorderRight,
        }
    }
}

/// A single worker's search state: its own grid, its own used-piece bitmap,
/// its own counters. Workers never share a `Board`.
pub struct Board {
    pub width: usize,
    pub height: usize,
    pub total_cells: usize,
    /// `2 * total_cells + 1` cells: the active grid, one dummy cell, then a
    /// shadow copy of the active grid used to snapshot the deepest partial
    /// state reached so far.
    pub cells: Vec<Cell>,
    pub used: [bool; MAX_PIECES],
    /// Shared via `Arc` so the Reporter can read it without holding any
    /// borrow of the rest of the board, which stays privately owned by
    /// whichever worker thread is searching it.
    pub counters: Arc<BoardCounters>,
    /// Shared via `Arc` with every other board and the Reporter: one flag,
    /// one stop decision, observed by all workers at once.
    pub done: Arc<AtomicBool>,
}

impl Board {
    pub fn new(puzzle: &Puzzle) -> Board {
        let width = puzzle.width;
        let height = puzzle.height;
        let total_cells = width * height;
        let dummy = total_cells;

        let mut cells = vec![Cell::default(); 2 * total_cells + 1];

        for y in 0..height {
            for x in 0..width {
                let i = y * width + x;
                let last_col = x + 1 == width;
                let last_row = y + 1 == height;

                // The bottom-right cell is BorderRight by convention: it is
                // the last cell visited.
                let class = if last_col {
                    CellClassTag::BorderRight
                } else if last_row {
                    CellClassTag::BorderBottom
                } else {
                    CellClassTag::Inner
                };

                cells[i] = Cell {
                    identifier: Identifier::default(),
                    left_color: 0,
                    top_color: 0,
                    right_neighbor: if last_col { dummy } else { i + 1 },
                    bottom_neighbor: if last_row { dummy } else { i + width },
                    class,
                };
            }
        }

        Board {
            width,
            height,
            total_cells,
            cells,
            used: [false; MAX_PIECES],
            counters: Arc::new(BoardCounters::zero()),
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Hands out a clone of this board's `done` flag so the Reporter can
    /// abort this board's current recursion without ever touching the rest
    /// of the board, which stays privately owned by its worker.
    pub fn done_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.done)
    }

    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    pub fn set_done(&self, done: bool) {
        self.done.store(done, Ordering::Relaxed);
    }

    /// Clears all piece-usage flags, the active grid's colors, and this
    /// board's own `done` flag, readying the board to receive a fresh prefix
    /// from the work queue. Safe even if the Reporter raised `done` to abort
    /// the previous prefix's recursion: that abort has already unwound by
    /// the time a worker gets back here, and the separate, never-reset
    /// global `done` flag is what actually stops a worker from looping back
    /// around to pop another prefix.
    pub fn reset_for_prefix(&mut self) {
        self.used = [false; MAX_PIECES];
        for cell in &mut self.cells[..self.total_cells] {
            cell.identifier = Identifier::default();
            cell.left_color = 0;
            cell.top_color = 0;
        }
        self.set_done(false);
    }

    /// Copies the active grid into the shadow area past the dummy cell.
    pub fn snapshot(&mut self) {
        let (active, shadow) = self.cells.split_at_mut(self.total_cells + 1);
        shadow.copy_from_slice(&active[..self.total_cells]);
    }

    pub fn shadow_cell(&self, index: usize) -> &Cell {
        &self.cells[self.total_cells + 1 + index]
    }
}
