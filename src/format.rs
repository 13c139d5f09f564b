//! Presentation helpers: human-readable counters, a plain-text board dump,
//! and the viewer URL encoding understood by e2.bucas.name.

use crate::board::Board;
use crate::puzzle::{Puzzle, Side};

/// Renders large counters as e.g. `1.2M` instead of `1200000`, the way a
/// progress line needs to stay a fixed, glanceable width.
pub fn humanize(value: u64) -> String {
    const UNITS: &[(u64, &str)] = &[
        (1_000_000_000_000, "T"),
        (1_000_000_000, "B"),
        (1_000_000, "M"),
        (1_000, "K"),
    ];

    for &(threshold, suffix) in UNITS {
        if value >= threshold {
            let scaled = value as f64 / threshold as f64;
            return format!("{:.1}{}", scaled, suffix);
        }
    }
    value.to_string()
}

/// Renders a board's current placements as `id(rotation)` tokens, one row
/// per line, for quick visual inspection on a terminal.
pub fn print_board(board: &Board) -> String {
    let mut out = String::new();
    for y in 0..board.height {
        for x in 0..board.width {
            let cell = board.cells[y * board.width + x];
            out.push_str(&format!("{:>3}({}) ", cell.identifier.piece_id, cell.identifier.rotation));
        }
        out.push('\n');
    }
    out
}

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Maps a color index onto a single lowercase letter, as the viewer expects.
fn color_letter(color: crate::puzzle::Color) -> char {
    ALPHABET[color as usize % ALPHABET.len()] as char
}

/// Builds the `board_edges`/`board_pieces` query parameters understood by
/// the e2.bucas.name viewer. `board_edges` holds four color letters per
/// placed cell in TOP, RIGHT, BOTTOM, LEFT order; `board_pieces` holds a
/// zero-padded three-digit piece id per cell. Only the first `depth` cells
/// (row-major) are emitted, since a partial snapshot has nothing placed
/// beyond its deepest reached cell.
pub fn viewer_url(board: &Board, puzzle: &Puzzle, depth: usize) -> String {
    let mut edges = String::new();
    let mut pieces = String::new();

    for cell in &board.cells[..depth.min(board.total_cells)] {
        let piece = &puzzle.pieces[cell.identifier.piece_id as usize];
        let oriented = piece.oriented(cell.identifier.rotation);

        edges.push(color_letter(oriented[Side::Top as usize]));
        edges.push(color_letter(oriented[Side::Right as usize]));
        edges.push(color_letter(oriented[Side::Bottom as usize]));
        edges.push(color_letter(oriented[Side::Left as usize]));

        pieces.push_str(&format!("{:03}", cell.identifier.piece_id));
    }

    format!(
        "https://e2.bucas.name/view?w={}&h={}&board_edges={}&board_pieces={}",
        board.width, board.height, edges, pieces
    )
}
