//! The depth-first search itself: cells are visited in row-major order,
//! each admissible variant is tried and undone, and the board's counters
//! and shadow snapshot are updated along the way.

use crate::board::{Board, Identifier};
use crate::index::PieceIndex;

/// Places `variant`'s piece at `cell_index`, propagating its right and
/// bottom colors to the appropriate neighbors (the real neighbor, or the
/// dummy cell if `cell_index` is on the border). Marks the piece used.
fn place(board: &mut Board, cell_index: usize, variant: &crate::index::PieceVariant) {
    let cell = &board.cells[cell_index];
    let right_neighbor = cell.right_neighbor;
    let bottom_neighbor = cell.bottom_neighbor;

    board.cells[cell_index].identifier = Identifier {
        piece_id: variant.piece_id,
        rotation: variant.rotation,
    };
    board.cells[right_neighbor].left_color = variant.right_color;
    board.cells[bottom_neighbor].top_color = variant.bottom_color;
    board.used[variant.piece_id as usize] = true;
}

fn unplace(board: &mut Board, piece_id: u8) {
    board.used[piece_id as usize] = false;
}

/// Runs the depth-first search from `depth` onward, calling `on_solution`
/// for every complete placement found. `depth` cells `0..depth` must
/// already hold a consistent placement (as set up by a prefix, or because
/// this is a fresh board and `depth == 0`).
pub fn backtrack(
    board: &mut Board,
    index: &PieceIndex,
    depth: usize,
    on_solution: &mut impl FnMut(&mut Board),
) {
    if board.counters.raise_max_depth(depth as u64) {
        board.snapshot();
    }

    if depth == board.total_cells {
        board.counters.increment_solutions();
        on_solution(board);
        return;
    }

    if board.is_done() {
        return;
    }

    let cell = board.cells[depth];
    let variants = index.lookup(cell.class.into(), cell.left_color, cell.top_color);

    for variant in variants {
        board.counters.increment_checked();

        if board.used[variant.piece_id as usize] {
            continue;
        }

        board.counters.increment_placed();
        place(board, depth, variant);

        backtrack(board, index, depth + 1, on_solution);

        unplace(board, variant.piece_id);

        if board.is_done() {
            return;
        }
    }
}
