//! Splits the search tree into disjoint row-prefixes so that `P` workers
//! can each explore a separate subtree without overlapping or duplicating
//! work.

use smallvec::SmallVec;

use crate::board::Board;
use crate::index::PieceIndex;

/// An ordered list of variants specifying placements for cells `0..d`. A
/// worker applies a prefix by placing each variant in order, without
/// recursion, then resumes the ordinary backtracker at `prefix.len()`.
/// Inline storage covers the depths prefixes are actually generated at in
/// practice, since `d` rarely needs to exceed single digits before the
/// queue has enough work to hand every thread a share.
pub type Prefix = SmallVec<[crate::index::PieceVariant; 8]>;

const MAX_DEPTH_ITERATIONS: usize = 20;

/// Generates at least `target_count` disjoint prefixes (fewer only if the
/// search tree itself is smaller), by depth-limited enumeration starting
/// from the fixed top-left corner placement.
///
/// Deterministic: since the piece index preserves insertion order, the same
/// puzzle always yields the same prefixes in the same order.
pub fn generate(puzzle_width: usize, index: &PieceIndex, board: &mut Board, target_count: usize) -> Vec<Prefix> {
    let target_count = target_count.max(1);
    let mut prefixes = Vec::new();
    let mut depth = 1;
    let mut iterations = 0;

    while prefixes.len() < target_count && depth < puzzle_width && iterations < MAX_DEPTH_ITERATIONS {
        prefixes.clear();
        board.reset_for_prefix();

        enumerate(board, index, 0, depth, &mut Prefix::new(), &mut prefixes);

        depth += 1;
        iterations += 1;
    }

    board.reset_for_prefix();

    // A puzzle only one cell wide never enters the loop above (there is no
    // depth between 0 and `puzzle_width` to enumerate at), leaving
    // `prefixes` empty. An empty prefix still drives a full search: a
    // worker applies zero placements and resumes the backtracker at depth
    // 0, so hand out exactly one to seed the queue instead of leaving every
    // worker with nothing to pop.
    if prefixes.is_empty() {
        prefixes.push(Prefix::new());
    }

    prefixes
}

fn enumerate(
    board: &mut Board,
    index: &PieceIndex,
    cell_index: usize,
    max_depth: usize,
    stack: &mut Prefix,
    out: &mut Vec<Prefix>,
) {
    if cell_index == max_depth {
        out.push(stack.clone());
        return;
    }

    let cell = board.cells[cell_index];
    let variants = index.lookup(cell.class.into(), cell.left_color, cell.top_color);

    for variant in variants {
        if board.used[variant.piece_id as usize] {
            continue;
        }

        stack.push(*variant);
        apply_one(board, cell_index, variant);

        enumerate(board, index, cell_index + 1, max_depth, stack, out);

        board.used[variant.piece_id as usize] = false;
        stack.pop();
    }
}

fn apply_one(board: &mut Board, cell_index: usize, variant: &crate::index::PieceVariant) {
    let cell = &board.cells[cell_index];
    let right_neighbor = cell.right_neighbor;
    let bottom_neighbor = cell.bottom_neighbor;

    board.cells[cell_index].identifier = crate::board::Identifier {
        piece_id: variant.piece_id,
        rotation: variant.rotation,
    };
    board.cells[right_neighbor].left_color = variant.right_color;
    board.cells[bottom_neighbor].top_color = variant.bottom_color;
    board.used[variant.piece_id as usize] = true;
}

/// Applies a previously generated prefix to a freshly reset board, placing
/// each of its variants in row-major order without recursion. Returns the
/// depth the board is now primed to resume searching from.
pub fn apply_prefix(board: &mut Board, prefix: &Prefix) -> usize {
    for (cell_index, variant) in prefix.iter().enumerate() {
        apply_one(board, cell_index, variant);
    }
    prefix.len()
}
