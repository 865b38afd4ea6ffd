//! Board representation and move application

use crate::geometry;
use crate::moves::Move;
use crate::types::{Color, Coord, File, Piece, PieceKind, Rank};

use std::fmt;

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

/// 8×8 mailbox board
///
/// Each square holds at most one [`Piece`]. `last_move` always mirrors the most
/// recent successful [`Board::apply_move()`] call; it is what makes en passant
/// decidable without a separate en-passant field.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    last_move: Option<Move>,
}

impl Board {
    pub const fn empty() -> Board {
        Board {
            squares: [None; 64],
            last_move: None,
        }
    }

    /// Returns a board with the standard starting position
    pub fn initial() -> Board {
        let mut res = Board::empty();
        for file in File::iter() {
            res.put2(file, Rank::R2, Piece::new(Color::White, PieceKind::Pawn));
            res.put2(file, Rank::R7, Piece::new(Color::Black, PieceKind::Pawn));
        }
        for (color, rank) in [(Color::White, Rank::R1), (Color::Black, Rank::R8)] {
            res.put2(File::A, rank, Piece::new(color, PieceKind::Rook));
            res.put2(File::B, rank, Piece::new(color, PieceKind::Knight));
            res.put2(File::C, rank, Piece::new(color, PieceKind::Bishop));
            res.put2(File::D, rank, Piece::new(color, PieceKind::Queen));
            res.put2(File::E, rank, Piece::new(color, PieceKind::King));
            res.put2(File::F, rank, Piece::new(color, PieceKind::Bishop));
            res.put2(File::G, rank, Piece::new(color, PieceKind::Knight));
            res.put2(File::H, rank, Piece::new(color, PieceKind::Rook));
        }
        res
    }

    #[inline]
    pub fn get(&self, c: Coord) -> Option<Piece> {
        self.squares[c.index()]
    }

    #[inline]
    pub fn put(&mut self, c: Coord, piece: Option<Piece>) {
        self.squares[c.index()] = piece;
    }

    #[inline]
    pub fn put2(&mut self, file: File, rank: Rank, piece: Piece) {
        self.put(Coord::from_parts(file, rank), Some(piece));
    }

    /// The most recently applied move, if any
    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn is_own_piece(&self, c: Coord, color: Color) -> bool {
        self.get(c).map_or(false, |p| p.color == color)
    }

    /// Checks that every square strictly between `from` and `to` is empty
    ///
    /// Valid only for straight or diagonal lines; any other pair yields `false`.
    pub fn path_clear(&self, from: Coord, to: Coord) -> bool {
        let df = to.file().index() as isize - from.file().index() as isize;
        let dr = to.rank().index() as isize - from.rank().index() as isize;
        if df != 0 && dr != 0 && df.abs() != dr.abs() {
            return false;
        }
        let (step_f, step_r) = (df.signum(), dr.signum());
        let mut cur = from;
        loop {
            cur = match cur.try_shift(step_f, step_r) {
                Some(c) => c,
                None => return false,
            };
            if cur == to {
                return true;
            }
            if self.get(cur).is_some() {
                return false;
            }
        }
    }

    /// Checks whether `target` is attacked by any piece of `by_color`
    ///
    /// This is a direct geometric scan over attack patterns. It deliberately does
    /// not go through move generation: king move generation calls this function
    /// to test castling safety, and a generator-based check would recurse.
    pub fn is_square_attacked(&self, target: Coord, by_color: Color) -> bool {
        // Pawn attacks: look one rank back from the pawn's point of view
        let pawn_dir = geometry::pawn_forward(by_color);
        for df in [-1, 1] {
            if let Some(c) = target.try_shift(df, -pawn_dir) {
                if self.get(c).map_or(false, |p| p.is(by_color, PieceKind::Pawn)) {
                    return true;
                }
            }
        }

        for (df, dr) in KNIGHT_OFFSETS {
            if let Some(c) = target.try_shift(df, dr) {
                if self
                    .get(c)
                    .map_or(false, |p| p.is(by_color, PieceKind::Knight))
                {
                    return true;
                }
            }
        }

        for df in -1..=1_isize {
            for dr in -1..=1_isize {
                if df == 0 && dr == 0 {
                    continue;
                }
                if let Some(c) = target.try_shift(df, dr) {
                    if self.get(c).map_or(false, |p| p.is(by_color, PieceKind::King)) {
                        return true;
                    }
                }
            }
        }

        for (dirs, kinds) in [
            (LINE_DIRS, [PieceKind::Rook, PieceKind::Queen]),
            (DIAG_DIRS, [PieceKind::Bishop, PieceKind::Queen]),
        ] {
            for (df, dr) in dirs {
                let mut cur = target;
                while let Some(c) = cur.try_shift(df, dr) {
                    cur = c;
                    if let Some(p) = self.get(cur) {
                        if p.color == by_color && kinds.contains(&p.kind) {
                            return true;
                        }
                        break;
                    }
                }
            }
        }

        false
    }

    /// Locates the king of `color`
    pub fn king_of(&self, color: Color) -> Option<Coord> {
        Coord::iter().find(|&c| self.get(c).map_or(false, |p| p.is(color, PieceKind::King)))
    }

    /// The square a double pawn push just passed over, with the pawn's square
    ///
    /// `Some` only when the immediately preceding move was a two-square pawn
    /// advance; this is the single turn on which en passant is available.
    pub(crate) fn ep_passed_square(&self) -> Option<(Coord, Coord)> {
        let lm = self.last_move?;
        let pawn = self.get(lm.dst)?;
        if pawn.kind != PieceKind::Pawn {
            return None;
        }
        let (src_rank, dst_rank) = (lm.src.rank().index(), lm.dst.rank().index());
        if src_rank.abs_diff(dst_rank) != 2 {
            return None;
        }
        let passed = Coord::from_parts(lm.dst.file(), Rank::from_index((src_rank + dst_rank) / 2));
        Some((passed, lm.dst))
    }

    fn is_en_passant(&self, mv: Move, moving: Piece) -> bool {
        if moving.kind != PieceKind::Pawn || self.get(mv.dst).is_some() {
            return false;
        }
        let df = mv.dst.file().index().abs_diff(mv.src.file().index());
        let dr = mv.dst.rank().index().abs_diff(mv.src.rank().index());
        if df != 1 || dr != 1 {
            return false;
        }
        match self.ep_passed_square() {
            Some((passed, pawn)) => {
                mv.dst == passed
                    && pawn.rank() == mv.src.rank()
                    && pawn.file().index().abs_diff(mv.src.file().index()) == 1
            }
            None => false,
        }
    }

    /// Applies `mv`, handling capture, en passant, castling and promotion
    ///
    /// Returns the captured piece, or `None` if nothing was captured. When the
    /// source square is empty the board is left untouched. The move is recorded
    /// as [`Board::last_move()`] on success.
    ///
    /// A pawn reaching the last rank is replaced using the explicit promotion on
    /// the move, or a queen when no promotion was supplied.
    pub fn apply_move(&mut self, mv: Move) -> Option<Piece> {
        let mut moving = self.get(mv.src)?;

        let captured = if self.is_en_passant(mv, moving) {
            // The captured pawn sits on its own square, not on the destination
            let victim_sq = self.last_move.map(|lm| lm.dst)?;
            let victim = self.get(victim_sq);
            self.put(victim_sq, None);
            victim
        } else {
            self.get(mv.dst)
        };

        moving.has_moved = true;
        self.put(mv.dst, Some(moving));
        self.put(mv.src, None);

        // A two-file king step is castling; relocate the matching rook
        if moving.kind == PieceKind::King {
            let df = mv.dst.file().index() as isize - mv.src.file().index() as isize;
            let rank = mv.src.rank();
            let (rook_from, rook_to) = match df {
                2 => (Some(File::H), File::F),
                -2 => (Some(File::A), File::D),
                _ => (None, File::A),
            };
            if let Some(rook_from) = rook_from {
                let rook_sq = Coord::from_parts(rook_from, rank);
                if let Some(mut rook) = self.get(rook_sq).filter(|p| p.kind == PieceKind::Rook) {
                    rook.has_moved = true;
                    self.put(Coord::from_parts(rook_to, rank), Some(rook));
                    self.put(rook_sq, None);
                }
            }
        }

        if moving.kind == PieceKind::Pawn && mv.dst.rank() == geometry::promote_rank(moving.color) {
            let kind = mv.promote.map(PieceKind::from).unwrap_or(PieceKind::Queen);
            let mut promoted = Piece::new(moving.color, kind);
            promoted.has_moved = true;
            self.put(mv.dst, Some(promoted));
        }

        self.last_move = Some(mv);
        captured
    }

    /// Simulates `mv` on a clone and reports whether the king of `color` would
    /// be left under attack
    pub fn move_leaves_king_exposed(&self, mv: Move, color: Color) -> bool {
        let mut copy = self.clone();
        copy.apply_move(mv);
        match copy.king_of(color) {
            Some(king) => copy.is_square_attacked(king, color.inv()),
            None => false,
        }
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::initial()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in (0..8).rev().map(Rank::from_index) {
            for file in File::iter() {
                let ch = match self.get(Coord::from_parts(file, rank)) {
                    None => '.',
                    Some(p) => {
                        let c = p.kind.as_char();
                        match p.color {
                            Color::White => c,
                            Color::Black => c.to_ascii_lowercase(),
                        }
                    }
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
