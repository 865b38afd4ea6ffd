//! Pseudo-legal move generation and legality filtering

use crate::board::Board;
use crate::geometry;
use crate::moves::Move;
use crate::types::{Color, Coord, File, PieceKind};

use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;

const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const LINE_DIRS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAG_DIRS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ALL_DIRS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Sink for generated moves
pub trait MovePush {
    fn push(&mut self, m: Move);
}

impl MovePush for Vec<Move> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

/// Fixed-capacity move buffer
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, 256>);

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

impl Deref for MoveList {
    type Target = ArrayVec<Move, 256>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl MovePush for MoveList {
    fn push(&mut self, m: Move) {
        self.0.push(m);
    }
}

fn gen_king(b: &Board, src: Coord, color: Color, out: &mut impl MovePush) {
    for df in -1..=1_isize {
        for dr in -1..=1_isize {
            if df == 0 && dr == 0 {
                continue;
            }
            if let Some(dst) = src.try_shift(df, dr) {
                if !b.is_own_piece(dst, color) {
                    out.push(Move::new(src, dst));
                }
            }
        }
    }

    // Castling candidates: an unmoved king, not currently in check, with an
    // unmoved rook, empty squares between them, and no attacked transit square.
    // The move itself is just the two-file king step; the rook relocation is
    // part of applying it.
    let king = match b.get(src) {
        Some(p) => p,
        None => return,
    };
    let enemy = color.inv();
    if king.has_moved || b.is_square_attacked(src, enemy) {
        return;
    }
    let rank = geometry::home_rank(color);
    let at = |file: File| Coord::from_parts(file, rank);

    let rook_h = b.get(at(File::H));
    if b.get(at(File::F)).is_none()
        && b.get(at(File::G)).is_none()
        && rook_h.map_or(false, |p| p.is(color, PieceKind::Rook) && !p.has_moved)
        && !b.is_square_attacked(at(File::F), enemy)
        && !b.is_square_attacked(at(File::G), enemy)
    {
        out.push(Move::new(src, at(File::G)));
    }

    let rook_a = b.get(at(File::A));
    if b.get(at(File::D)).is_none()
        && b.get(at(File::C)).is_none()
        && b.get(at(File::B)).is_none()
        && rook_a.map_or(false, |p| p.is(color, PieceKind::Rook) && !p.has_moved)
        && !b.is_square_attacked(at(File::D), enemy)
        && !b.is_square_attacked(at(File::C), enemy)
    {
        out.push(Move::new(src, at(File::C)));
    }
}

fn gen_rays(
    b: &Board,
    src: Coord,
    color: Color,
    dirs: &[(isize, isize)],
    out: &mut impl MovePush,
) {
    for &(df, dr) in dirs {
        let mut cur = src;
        while let Some(dst) = cur.try_shift(df, dr) {
            cur = dst;
            match b.get(dst) {
                None => out.push(Move::new(src, dst)),
                Some(p) => {
                    if p.color != color {
                        out.push(Move::new(src, dst));
                    }
                    break;
                }
            }
        }
    }
}

fn gen_knight(b: &Board, src: Coord, color: Color, out: &mut impl MovePush) {
    for (df, dr) in KNIGHT_OFFSETS {
        if let Some(dst) = src.try_shift(df, dr) {
            if !b.is_own_piece(dst, color) {
                out.push(Move::new(src, dst));
            }
        }
    }
}

fn gen_pawn(b: &Board, src: Coord, color: Color, out: &mut impl MovePush) {
    let dir = geometry::pawn_forward(color);

    if let Some(one) = src.try_shift(0, dir) {
        if b.get(one).is_none() {
            out.push(Move::new(src, one));
            if src.rank() == geometry::pawn_start_rank(color) {
                if let Some(two) = src.try_shift(0, 2 * dir) {
                    if b.get(two).is_none() {
                        out.push(Move::new(src, two));
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        let diag = match src.try_shift(df, dir) {
            Some(c) => c,
            None => continue,
        };
        match b.get(diag) {
            Some(target) => {
                if target.color != color {
                    out.push(Move::new(src, diag));
                }
            }
            None => {
                // En passant: the enemy pawn passed over `diag` on the move
                // that was just played, and sits beside this pawn
                if let Some((passed, pawn)) = b.ep_passed_square() {
                    if diag == passed
                        && pawn.rank() == src.rank()
                        && pawn.file().index().abs_diff(src.file().index()) == 1
                    {
                        out.push(Move::new(src, diag));
                    }
                }
            }
        }
    }
}

/// Generates pseudo-legal moves for the piece on `src`
///
/// Pseudo-legal moves obey piece geometry and never capture an own piece, but
/// may still leave the mover's king under attack; [`legal_moves()`] adds that
/// filter. Nothing is generated for an empty square.
pub fn pseudo_legal_moves(b: &Board, src: Coord, out: &mut impl MovePush) {
    let piece = match b.get(src) {
        Some(p) => p,
        None => return,
    };
    match piece.kind {
        PieceKind::King => gen_king(b, src, piece.color, out),
        PieceKind::Queen => gen_rays(b, src, piece.color, &ALL_DIRS, out),
        PieceKind::Rook => gen_rays(b, src, piece.color, &LINE_DIRS, out),
        PieceKind::Bishop => gen_rays(b, src, piece.color, &DIAG_DIRS, out),
        PieceKind::Knight => gen_knight(b, src, piece.color, out),
        PieceKind::Pawn => gen_pawn(b, src, piece.color, out),
    }
}

/// Generates fully legal moves for the piece on `src`
pub fn legal_moves(b: &Board, src: Coord) -> MoveList {
    let color = match b.get(src) {
        Some(p) => p.color,
        None => return MoveList::new(),
    };
    let mut pseudo = MoveList::new();
    pseudo_legal_moves(b, src, &mut pseudo);
    let mut res = MoveList::new();
    for &mv in &pseudo {
        if !b.move_leaves_king_exposed(mv, color) {
            res.push(mv);
        }
    }
    res
}

/// Checks whether `color` has at least one legal move
pub fn has_legal_moves(b: &Board, color: Color) -> bool {
    for src in Coord::iter() {
        if !b.is_own_piece(src, color) {
            continue;
        }
        let mut pseudo = MoveList::new();
        pseudo_legal_moves(b, src, &mut pseudo);
        if pseudo
            .iter()
            .any(|&mv| !b.move_leaves_king_exposed(mv, color))
        {
            return true;
        }
    }
    false
}
