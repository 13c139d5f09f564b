//! The immutable puzzle definition: dimensions and pieces, as loaded from
//! the input file.

use std::io::BufRead;
use std::path::Path;

use crate::error::PuzzleError;

/// A small unsigned edge color. `0` is reserved for [`EDGE_COLOR`], the
/// outer frame.
pub type Color = u8;

/// The color marking the outer frame of the puzzle.
pub const EDGE_COLOR: Color = 0;

/// The maximum number of pieces a puzzle may have, fixed by the width of the
/// used-piece bitmap in [`crate::board::Board`].
pub const MAX_PIECES: usize = 256;

/// Which side of a piece a color belongs to, in the piece's canonical
/// (unrotated) orientation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Side {
    Left = 0,
    Top = 1,
    Right = 2,
    Bottom = 3,
}

/// A piece's role in the grid, derived from how many of its canonical colors
/// are [`EDGE_COLOR`].
///
/// The reference implementation's `is_corner` counts *any* two edge-colored
/// sides, including the degenerate case of three or four edge sides; that
/// behavior is kept here rather than "fixed".
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PieceClass {
    Corner,
    Edge,
    Inner,
}

/// An immutable puzzle piece: its unique id and its four canonical colors.
#[derive(Clone, Copy, Debug)]
pub struct Piece {
    pub id: u8,
    pub colors: [Color; 4],
    pub class: PieceClass,
}

impl Piece {
    fn new(id: u8, colors: [Color; 4]) -> Piece {
        let edge_count = colors.iter().filter(|&&c| c == EDGE_COLOR).count();
        let class = match edge_count {
            0 => PieceClass::Inner,
            1 => PieceClass::Edge,
            _ => PieceClass::Corner,
        };
        Piece { id, colors, class }
    }

    pub fn color(&self, side: Side) -> Color {
        self.colors[side as usize]
    }

    /// The piece's colors after rotating `rotation` times (0..4): the color
    /// that was on side `side + rotation` (mod 4) ends up on side `side`.
    /// For `rotation == 1`, what was on top becomes the new left, matching
    /// a single clockwise turn.
    pub fn oriented(&self, rotation: u8) -> [Color; 4] {
        let mut out = [0; 4];
        for (side, slot) in out.iter_mut().enumerate() {
            let source = (side + rotation as usize) % 4;
            *slot = self.colors[source];
        }
        out
    }
}

/// The loaded, validated puzzle: dimensions and pieces.
#[derive(Debug)]
pub struct Puzzle {
    pub width: usize,
    pub height: usize,
    pub pieces: Vec<Piece>,
    pub max_color: Color,
}

impl Puzzle {
    pub fn total_cells(&self) -> usize {
        self.width * self.height
    }

    /// Parses a puzzle from an already-opened reader, following the
    /// line-oriented format from SPEC_FULL.md §6.
    pub fn parse(reader: impl BufRead) -> Result<Puzzle, PuzzleError> {
        let mut lines = reader.lines();

        let header = lines
            .next()
            .ok_or_else(|| PuzzleError::MalformedHeader { line: String::new() })
            .and_then(|l| {
                l.map_err(|source| PuzzleError::Io {
                    path: Path::new("<puzzle>").to_path_buf(),
                    source,
                })
            })?;

        let mut header_fields = header.split_whitespace();
        let width: usize = header_fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| PuzzleError::MalformedHeader { line: header.clone() })?;
        let height: usize = match header_fields.next() {
            Some(s) => s
                .parse()
                .map_err(|_| PuzzleError::MalformedHeader { line: header.clone() })?,
            None => width,
        };

        let expected = width * height;
        let mut pieces = Vec::with_capacity(expected);
        let mut max_color: Color = 0;

        for (idx, line) in lines.enumerate() {
            let line = line.map_err(|source| PuzzleError::Io {
                path: Path::new("<puzzle>").to_path_buf(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let mut fields = line.split_whitespace();
            let mut colors = [0 as Color; 4];
            for slot in &mut colors {
                let value: u32 = fields
                    .next()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| PuzzleError::MalformedPieceLine {
                        line_number: idx + 2,
                        text: line.clone(),
                    })?;
                *slot = value
                    .try_into()
                    .map_err(|_| PuzzleError::MalformedPieceLine {
                        line_number: idx + 2,
                        text: line.clone(),
                    })?;
                max_color = max_color.max(*slot);
            }

            if pieces.len() >= MAX_PIECES {
                return Err(PuzzleError::TooManyPieces(pieces.len() + 1));
            }

            pieces.push(Piece::new(pieces.len() as u8, colors));
        }

        if pieces.len() != expected {
            return Err(PuzzleError::PieceCountMismatch {
                expected,
                found: pieces.len(),
            });
        }

        Ok(Puzzle {
            width,
            height,
            pieces,
            max_color,
        })
    }

    pub fn load(path: &Path) -> Result<Puzzle, PuzzleError> {
        let file = std::fs::File::open(path).map_err(|source| PuzzleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Puzzle::parse(std::io::BufReader::new(file))
    }
}
