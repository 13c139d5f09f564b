//! The precomputed piece index: for a cell's class and its incoming
//! left/top colors, an O(1) lookup into the (piece, rotation) variants that
//! may legally be placed there.
//!
//! All colour-matching work happens once, here, at construction time. The
//! backtracker itself never compares colors against a piece's table — it
//! only walks the slice this index hands back.

use crate::puzzle::{Color, Piece, PieceClass, Puzzle, Side, EDGE_COLOR};

/// Which border rules apply to a cell, determining which bucket of the
/// index supplies its candidates.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CellClass {
    Inner,
    BorderBottom,
    BorderRight,
}

impl CellClass {
    const COUNT: usize = 3;

    fn bucket(self) -> usize {
        match self {
            CellClass::Inner => 0,
            CellClass::BorderBottom => 1,
            CellClass::BorderRight => 2,
        }
    }
}

/// A single placeable `(piece, rotation)` pairing, with the colors it would
/// contribute to its right and bottom neighbors. The left/top colors that
/// select this variant are the index key, not stored here.
#[derive(Clone, Copy, Debug)]
pub struct PieceVariant {
    pub piece_id: u8,
    pub rotation: u8,
    pub right_color: Color,
    pub bottom_color: Color,
}

/// The three-level `index[cell_class][left, top] -> [PieceVariant]` mapping,
/// stored as one contiguous arena plus `(start, len)` ranges per bucket —
/// avoiding one heap allocation per `(class, left, top)` triple.
pub struct PieceIndex {
    stride: usize,
    ranges: Vec<(u32, u32)>,
    arena: Vec<PieceVariant>,
}

impl PieceIndex {
    /// Builds the index from every piece's four rotations.
    pub fn build(puzzle: &Puzzle) -> PieceIndex {
        let stride = puzzle.max_color as usize + 1;
        let bucket_size = stride * stride;
        let mut buckets: Vec<Vec<PieceVariant>> =
            vec![Vec::new(); bucket_size * CellClass::COUNT];

        for piece in &puzzle.pieces {
            for rotation in 0..4u8 {
                insert_variant(&mut buckets, stride, piece, rotation);
            }
        }

        let mut ranges = Vec::with_capacity(buckets.len());
        let mut arena = Vec::new();
        for bucket in buckets {
            let start = arena.len() as u32;
            let len = bucket.len() as u32;
            arena.extend(bucket);
            ranges.push((start, len));
        }

        PieceIndex {
            stride,
            ranges,
            arena,
        }
    }

    /// The candidate variants admissible at a cell of class `class` whose
    /// already-placed left and top neighbors contributed `left` and `top`.
    pub fn lookup(&self, class: CellClass, left: Color, top: Color) -> &[PieceVariant] {
        let key = class.bucket() * self.stride * self.stride
            + left as usize * self.stride
            + top as usize;
        let (start, len) = self.ranges[key];
        &self.arena[start as usize..(start + len) as usize]
    }
}

fn insert_variant(buckets: &mut [Vec<PieceVariant>], stride: usize, piece: &Piece, rotation: u8) {
    let oriented = piece.oriented(rotation);
    let left = oriented[Side::Left as usize];
    let top = oriented[Side::Top as usize];
    let right = oriented[Side::Right as usize];
    let bottom = oriented[Side::Bottom as usize];

    let class = match piece.class {
        PieceClass::Inner => CellClass::Inner,
        PieceClass::Corner | PieceClass::Edge => {
            if right == EDGE_COLOR {
                CellClass::BorderRight
            } else if bottom == EDGE_COLOR {
                CellClass::BorderBottom
            } else {
                CellClass::Inner
            }
        }
    };

    let bucket_size = stride * stride;
    let key = class.bucket() * bucket_size + left as usize * stride + top as usize;

    buckets[key].push(PieceVariant {
        piece_id: piece.id,
        rotation,
        right_color: right,
        bottom_color: bottom,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Puzzle;

    fn build(text: &str) -> PieceIndex {
        let puzzle = Puzzle::parse(text.as_bytes()).unwrap();
        PieceIndex::build(&puzzle)
    }

    #[test]
    fn single_piece_four_rotations_all_border_right() {
        // 1x1: the only cell is BorderRight by convention, and every
        // rotation of an all-edge piece satisfies right == EDGE.
        let index = build("1\n0 0 0 0\n");
        let variants = index.lookup(CellClass::BorderRight, 0, 0);
        assert_eq!(variants.len(), 4);
        for rotation in 0..4 {
            assert!(variants.iter().any(|v| v.rotation == rotation));
        }
    }

    #[test]
    fn inner_piece_never_appears_in_border_buckets() {
        let index = build("2 2\n1 1 1 1\n0 0 1 1\n1 1 0 0\n0 0 0 0\n");
        assert!(index.lookup(CellClass::BorderRight, 1, 1).is_empty());
        assert!(index.lookup(CellClass::BorderBottom, 1, 1).is_empty());
    }

    #[test]
    fn insertion_order_is_piece_id_then_rotation() {
        let index = build("1\n0 0 0 0\n");
        let variants = index.lookup(CellClass::BorderRight, 0, 0);
        let rotations: Vec<u8> = variants.iter().map(|v| v.rotation).collect();
        assert_eq!(rotations, vec![0, 1, 2, 3]);
    }

    #[test]
    fn empty_bucket_lookup_returns_empty_slice() {
        let index = build("1\n0 0 0 0\n");
        assert!(index.lookup(CellClass::Inner, 5, 5).is_empty());
    }
}
