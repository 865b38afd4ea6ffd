//! SAN token resolution and generation against a live board

use crate::board::Board;
use crate::geometry;
use crate::moves::Move;
use crate::types::{Color, Coord, File, Piece, PieceKind, PromotePiece, Rank};

use std::str::FromStr;

/// Checks whether the piece on `from` geometrically reaches `to`
///
/// Pure reach: piece movement rules, path clearance and en passant, but no
/// self-check filtering and no castling (castling tokens are resolved
/// separately). Mirrors the reach rules used by the pseudo-legal generator.
fn can_reach(b: &Board, piece: Piece, from: Coord, to: Coord) -> bool {
    let df = to.file().index() as isize - from.file().index() as isize;
    let dr = to.rank().index() as isize - from.rank().index() as isize;
    let (adf, adr) = (df.abs(), dr.abs());

    let target = b.get(to);
    if target.map_or(false, |p| p.color == piece.color) {
        return false;
    }

    match piece.kind {
        PieceKind::Pawn => {
            let dir = geometry::pawn_forward(piece.color);
            if adf == 1 && dr == dir {
                if target.is_some() {
                    return true;
                }
                // Diagonal onto an empty square is only en passant
                return match b.ep_passed_square() {
                    Some((passed, pawn)) => {
                        to == passed
                            && pawn.rank() == from.rank()
                            && pawn.file().index().abs_diff(from.file().index()) == 1
                    }
                    None => false,
                };
            }
            if df == 0 && target.is_none() {
                if dr == dir {
                    return true;
                }
                if dr == 2 * dir && from.rank() == geometry::pawn_start_rank(piece.color) {
                    return from
                        .try_shift(0, dir)
                        .map_or(false, |mid| b.get(mid).is_none());
                }
            }
            false
        }
        PieceKind::Knight => (adf == 1 && adr == 2) || (adf == 2 && adr == 1),
        PieceKind::Bishop => adf == adr && adf != 0 && b.path_clear(from, to),
        PieceKind::Rook => (df == 0) != (dr == 0) && b.path_clear(from, to),
        PieceKind::Queen => {
            if df == 0 && dr == 0 {
                return false;
            }
            (df == 0 || dr == 0 || adf == adr) && b.path_clear(from, to)
        }
        PieceKind::King => adf <= 1 && adr <= 1 && adf + adr > 0,
    }
}

fn resolve_castling(b: &Board, color: Color, kingside: bool) -> Option<Move> {
    let rank = geometry::home_rank(color);
    for file in File::iter() {
        let src = Coord::from_parts(file, rank);
        if b.get(src).map_or(false, |p| p.is(color, PieceKind::King)) {
            let delta = if kingside { 2 } else { -2 };
            let dst = src.try_shift(delta, 0)?;
            return Some(Move::new(src, dst));
        }
    }
    None
}

/// Resolves a SAN token to a concrete move for `color` on `b`
///
/// Accepts the usual grammar: `O-O`/`O-O-O` (also with zeroes), an optional
/// piece letter, optional file/rank disambiguation, an optional `x`, the
/// destination square, an optional `=X` promotion suffix, and trailing
/// check/mate/annotation marks. Returns `None` for malformed tokens and for
/// tokens matching no legal move. When several pieces match an
/// under-disambiguated token, the first one found wins.
pub fn resolve(b: &Board, token: &str, color: Color) -> Option<Move> {
    if token.is_empty() {
        return None;
    }
    if token.starts_with("O-O-O") || token.starts_with("0-0-0") {
        return resolve_castling(b, color, false);
    }
    if token.starts_with("O-O") || token.starts_with("0-0") {
        return resolve_castling(b, color, true);
    }

    let mut token = token.trim_end_matches(&['+', '#', '!', '?'][..]);

    let mut promote = None;
    if let Some((head, tail)) = token.split_once('=') {
        if let Some(pc) = tail.chars().next() {
            promote = PieceKind::from_char(pc).and_then(|k| PromotePiece::try_from(k).ok());
            token = head;
        }
    }

    // A leading capital other than 'O' must be a piece letter
    let mut kind = PieceKind::Pawn;
    let first = token.chars().next()?;
    if first.is_ascii_uppercase() && first != 'O' {
        kind = PieceKind::from_char(first)?;
        token = &token[1..];
    }

    let token: String = token.chars().filter(|&c| c != 'x').collect();
    if token.len() < 2 || !token.is_ascii() {
        return None;
    }

    let (hints, dst_str) = token.split_at(token.len() - 2);
    let dst = Coord::from_str(dst_str).ok()?;

    let mut hint_file = None;
    let mut hint_rank = None;
    for c in hints.chars() {
        if let Some(f) = File::from_char(c) {
            hint_file = Some(f);
        } else if let Some(r) = Rank::from_char(c) {
            hint_rank = Some(r);
        }
    }

    for src in Coord::iter() {
        let piece = match b.get(src) {
            Some(p) if p.is(color, kind) => p,
            _ => continue,
        };
        if hint_file.map_or(false, |f| src.file() != f) {
            continue;
        }
        if hint_rank.map_or(false, |r| src.rank() != r) {
            continue;
        }
        if !can_reach(b, piece, src, dst) {
            continue;
        }
        let mv = Move {
            src,
            dst,
            promote,
        };
        if !b.move_leaves_king_exposed(mv, color) {
            return Some(mv);
        }
    }
    None
}

/// Renders `mv` in SAN against the pre-move position `b`
///
/// Disambiguation file/rank characters are appended only when another piece of
/// the same kind and color could legally reach the destination. Returns `None`
/// when the source square is empty.
pub fn move_to_san(b: &Board, mv: Move, color: Color) -> Option<String> {
    let mover = b.get(mv.src)?;

    if mover.kind == PieceKind::King
        && mv.dst.file().index().abs_diff(mv.src.file().index()) == 2
    {
        return Some(if mv.dst.file() > mv.src.file() {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        });
    }

    let mut san = String::new();

    if mover.kind != PieceKind::Pawn {
        san.push(mover.kind.as_char());

        let mut need_file = false;
        let mut need_rank = false;
        for other in Coord::iter() {
            if other == mv.src {
                continue;
            }
            let p = match b.get(other) {
                Some(p) if p.is(color, mover.kind) => p,
                _ => continue,
            };
            if can_reach(b, p, other, mv.dst)
                && !b.move_leaves_king_exposed(Move::new(other, mv.dst), color)
            {
                if other.file() != mv.src.file() {
                    need_file = true;
                } else {
                    need_rank = true;
                }
            }
        }
        if need_file {
            san.push(mv.src.file().as_char());
        }
        if need_rank {
            san.push(mv.src.rank().as_char());
        }
    } else if mv.src.file() != mv.dst.file() {
        san.push(mv.src.file().as_char());
    }

    let is_capture = b.get(mv.dst).is_some()
        || (mover.kind == PieceKind::Pawn && mv.src.file() != mv.dst.file());
    if is_capture {
        san.push('x');
    }

    san.push(mv.dst.file().as_char());
    san.push(mv.dst.rank().as_char());

    // Only an actual promotion earns the suffix, whatever the move carries
    if let Some(promote) = mv.promote {
        if mover.kind == PieceKind::Pawn && mv.dst.rank() == geometry::promote_rank(mover.color) {
            san.push('=');
            san.push(PieceKind::from(promote).as_char());
        }
    }

    Some(san)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen;

    fn coord(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    fn mv(s: &str) -> Move {
        Move::from_str(s).unwrap()
    }

    #[test]
    fn test_resolve_simple() {
        let b = Board::initial();
        assert_eq!(resolve(&b, "e4", Color::White), Some(mv("e2e4")));
        assert_eq!(resolve(&b, "e3", Color::White), Some(mv("e2e3")));
        assert_eq!(resolve(&b, "Nf3", Color::White), Some(mv("g1f3")));
        assert_eq!(resolve(&b, "Nc6", Color::Black), Some(mv("b8c6")));
        assert_eq!(resolve(&b, "e5", Color::Black), Some(mv("e7e5")));
        // No piece reaches these
        assert_eq!(resolve(&b, "e6", Color::White), None);
        assert_eq!(resolve(&b, "Ke2", Color::White), None);
        // Malformed input
        assert_eq!(resolve(&b, "", Color::White), None);
        assert_eq!(resolve(&b, "x", Color::White), None);
        assert_eq!(resolve(&b, "Zf3", Color::White), None);
        assert_eq!(resolve(&b, "e9", Color::White), None);
    }

    #[test]
    fn test_resolve_markers_stripped() {
        let mut b = Board::initial();
        b.apply_move(mv("e2e4"));
        b.apply_move(mv("e7e5"));
        b.apply_move(mv("d1h5"));
        b.apply_move(mv("b8c6"));
        assert_eq!(resolve(&b, "Qxf7+", Color::White), Some(mv("h5f7")));
        assert_eq!(resolve(&b, "Qxf7#", Color::White), Some(mv("h5f7")));
        assert_eq!(resolve(&b, "Qxf7!?", Color::White), Some(mv("h5f7")));
    }

    #[test]
    fn test_resolve_capture() {
        let mut b = Board::initial();
        b.apply_move(mv("e2e4"));
        b.apply_move(mv("d7d5"));
        assert_eq!(resolve(&b, "exd5", Color::White), Some(mv("e4d5")));
    }

    #[test]
    fn test_resolve_castling() {
        let mut b = Board::initial();
        b.put(coord("f1"), None);
        b.put(coord("g1"), None);
        assert_eq!(resolve(&b, "O-O", Color::White), Some(mv("e1g1")));
        assert_eq!(resolve(&b, "0-0", Color::White), Some(mv("e1g1")));
        assert_eq!(resolve(&b, "O-O-O", Color::Black), Some(mv("e8c8")));
    }

    #[test]
    fn test_resolve_promotion() {
        let mut b = Board::empty();
        b.put2(File::A, Rank::R7, Piece::new(Color::White, PieceKind::Pawn));
        b.put2(File::E, Rank::R1, Piece::new(Color::White, PieceKind::King));
        b.put2(File::E, Rank::R8, Piece::new(Color::Black, PieceKind::King));
        assert_eq!(
            resolve(&b, "a8=Q", Color::White),
            Some(Move::with_promote(coord("a7"), coord("a8"), PromotePiece::Queen))
        );
        assert_eq!(
            resolve(&b, "a8=N+", Color::White),
            Some(Move::with_promote(coord("a7"), coord("a8"), PromotePiece::Knight))
        );
    }

    #[test]
    fn test_resolve_disambiguation() {
        // Two knights can reach d2; hints pick the source
        let mut b = Board::empty();
        b.put2(File::B, Rank::R1, Piece::new(Color::White, PieceKind::Knight));
        b.put2(File::F, Rank::R1, Piece::new(Color::White, PieceKind::Knight));
        b.put2(File::A, Rank::R5, Piece::new(Color::White, PieceKind::King));
        b.put2(File::H, Rank::R8, Piece::new(Color::Black, PieceKind::King));
        assert_eq!(resolve(&b, "Nbd2", Color::White), Some(mv("b1d2")));
        assert_eq!(resolve(&b, "Nfd2", Color::White), Some(mv("f1d2")));

        // Rank disambiguation
        let mut b = Board::empty();
        b.put2(File::A, Rank::R1, Piece::new(Color::White, PieceKind::Rook));
        b.put2(File::A, Rank::R5, Piece::new(Color::White, PieceKind::Rook));
        b.put2(File::E, Rank::R2, Piece::new(Color::White, PieceKind::King));
        b.put2(File::H, Rank::R8, Piece::new(Color::Black, PieceKind::King));
        assert_eq!(resolve(&b, "R1a3", Color::White), Some(mv("a1a3")));
        assert_eq!(resolve(&b, "R5a3", Color::White), Some(mv("a5a3")));
        // Full square disambiguation also parses
        assert_eq!(resolve(&b, "Ra1a3", Color::White), Some(mv("a1a3")));
    }

    #[test]
    fn test_resolve_skips_pinned_candidate() {
        // Both knights touch d2, but the e4 knight is pinned to its king
        let mut b = Board::empty();
        b.put2(File::E, Rank::R1, Piece::new(Color::White, PieceKind::King));
        b.put2(File::E, Rank::R4, Piece::new(Color::White, PieceKind::Knight));
        b.put2(File::B, Rank::R1, Piece::new(Color::White, PieceKind::Knight));
        b.put2(File::E, Rank::R8, Piece::new(Color::Black, PieceKind::Queen));
        b.put2(File::A, Rank::R8, Piece::new(Color::Black, PieceKind::King));
        assert_eq!(resolve(&b, "Nd2", Color::White), Some(mv("b1d2")));
    }

    #[test]
    fn test_resolve_en_passant() {
        let mut b = Board::initial();
        b.apply_move(mv("e2e4"));
        b.apply_move(mv("a7a6"));
        b.apply_move(mv("e4e5"));
        b.apply_move(mv("d7d5"));
        assert_eq!(resolve(&b, "exd6", Color::White), Some(mv("e5d6")));
    }

    #[test]
    fn test_san_simple() {
        let b = Board::initial();
        assert_eq!(move_to_san(&b, mv("e2e4"), Color::White).unwrap(), "e4");
        assert_eq!(move_to_san(&b, mv("g1f3"), Color::White).unwrap(), "Nf3");
        assert_eq!(move_to_san(&b, mv("e4e5"), Color::White), None);
    }

    #[test]
    fn test_san_captures() {
        let mut b = Board::initial();
        b.apply_move(mv("e2e4"));
        b.apply_move(mv("d7d5"));
        assert_eq!(move_to_san(&b, mv("e4d5"), Color::White).unwrap(), "exd5");
    }

    #[test]
    fn test_san_en_passant_capture_marker() {
        let mut b = Board::initial();
        b.apply_move(mv("e2e4"));
        b.apply_move(mv("a7a6"));
        b.apply_move(mv("e4e5"));
        b.apply_move(mv("d7d5"));
        // Diagonal pawn move onto an empty square still renders as a capture
        assert_eq!(move_to_san(&b, mv("e5d6"), Color::White).unwrap(), "exd6");
    }

    #[test]
    fn test_san_castling() {
        let mut b = Board::initial();
        b.put(coord("f1"), None);
        b.put(coord("g1"), None);
        b.put(coord("b1"), None);
        b.put(coord("c1"), None);
        b.put(coord("d1"), None);
        assert_eq!(move_to_san(&b, mv("e1g1"), Color::White).unwrap(), "O-O");
        assert_eq!(move_to_san(&b, mv("e1c1"), Color::White).unwrap(), "O-O-O");
    }

    #[test]
    fn test_san_promotion() {
        let mut b = Board::empty();
        b.put2(File::A, Rank::R7, Piece::new(Color::White, PieceKind::Pawn));
        b.put2(File::E, Rank::R1, Piece::new(Color::White, PieceKind::King));
        b.put2(File::E, Rank::R8, Piece::new(Color::Black, PieceKind::King));
        assert_eq!(
            move_to_san(
                &b,
                Move::with_promote(coord("a7"), coord("a8"), PromotePiece::Rook),
                Color::White
            )
            .unwrap(),
            "a8=R"
        );
    }

    #[test]
    fn test_san_promote_flag_ignored_off_last_rank() {
        let mut b = Board::empty();
        b.put2(File::A, Rank::R1, Piece::new(Color::White, PieceKind::Rook));
        b.put2(File::E, Rank::R2, Piece::new(Color::White, PieceKind::King));
        b.put2(File::A, Rank::R6, Piece::new(Color::White, PieceKind::Pawn));
        b.put2(File::H, Rank::R8, Piece::new(Color::Black, PieceKind::King));
        // A stray promote flag on a non-pawn or mid-board pawn move is dropped
        assert_eq!(
            move_to_san(
                &b,
                Move::with_promote(coord("a1"), coord("a3"), PromotePiece::Queen),
                Color::White
            )
            .unwrap(),
            "Ra3"
        );
        assert_eq!(
            move_to_san(
                &b,
                Move::with_promote(coord("a6"), coord("a7"), PromotePiece::Queen),
                Color::White
            )
            .unwrap(),
            "a7"
        );
    }

    #[test]
    fn test_san_disambiguation() {
        let mut b = Board::empty();
        b.put2(File::B, Rank::R1, Piece::new(Color::White, PieceKind::Knight));
        b.put2(File::F, Rank::R1, Piece::new(Color::White, PieceKind::Knight));
        b.put2(File::A, Rank::R5, Piece::new(Color::White, PieceKind::King));
        b.put2(File::H, Rank::R8, Piece::new(Color::Black, PieceKind::King));
        assert_eq!(move_to_san(&b, mv("b1d2"), Color::White).unwrap(), "Nbd2");

        let mut b = Board::empty();
        b.put2(File::A, Rank::R1, Piece::new(Color::White, PieceKind::Rook));
        b.put2(File::A, Rank::R5, Piece::new(Color::White, PieceKind::Rook));
        b.put2(File::E, Rank::R2, Piece::new(Color::White, PieceKind::King));
        b.put2(File::H, Rank::R8, Piece::new(Color::Black, PieceKind::King));
        assert_eq!(move_to_san(&b, mv("a1a3"), Color::White).unwrap(), "R1a3");

        // A lone reacher needs no disambiguation
        let b = Board::initial();
        assert_eq!(move_to_san(&b, mv("b1c3"), Color::White).unwrap(), "Nc3");
    }

    #[test]
    fn test_round_trip_legal_moves() {
        // Every legal move in a middlegame position survives SAN round-trip
        let mut b = Board::initial();
        for s in ["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "g8f6", "e1g1"] {
            b.apply_move(mv(s));
        }
        let color = Color::Black;
        for src in Coord::iter() {
            if !b.is_own_piece(src, color) {
                continue;
            }
            for &m in &movegen::legal_moves(&b, src) {
                let san = move_to_san(&b, m, color).unwrap();
                let back = resolve(&b, &san, color).unwrap();
                assert_eq!((back.src, back.dst), (m.src, m.dst), "token {}", san);
            }
        }
    }
}
