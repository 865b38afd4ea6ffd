//! The [`Move`] value and its coordinate-pair text form

use crate::types::{Coord, CoordParseError, PromotePiece};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing [`Move`] from coordinate-pair notation
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MoveParseError {
    #[error("bad string length")]
    BadLength,
    #[error("bad source: {0}")]
    BadSrc(CoordParseError),
    #[error("bad destination: {0}")]
    BadDst(CoordParseError),
    #[error("bad promote char {0:?}")]
    BadPromote(char),
}

/// Chess move, described by its endpoints
///
/// A `Move` is a plain value and carries no legality guarantees by itself;
/// [`Game::make_move()`](crate::game::Game::make_move) validates it against the
/// position. `promote` is set only for pawn moves onto the last rank; when it is
/// absent for such a move, applying it promotes to a queen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub src: Coord,
    pub dst: Coord,
    pub promote: Option<PromotePiece>,
}

impl Move {
    pub const fn new(src: Coord, dst: Coord) -> Move {
        Move {
            src,
            dst,
            promote: None,
        }
    }

    pub const fn with_promote(src: Coord, dst: Coord, promote: PromotePiece) -> Move {
        Move {
            src,
            dst,
            promote: Some(promote),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)?;
        match self.promote {
            Some(PromotePiece::Knight) => write!(f, "n")?,
            Some(PromotePiece::Bishop) => write!(f, "b")?,
            Some(PromotePiece::Rook) => write!(f, "r")?,
            Some(PromotePiece::Queen) => write!(f, "q")?,
            None => {}
        };
        Ok(())
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    /// Parses `e2e4`, `e2 e4`, and promoting forms like `e7e8q`
    fn from_str(s: &str) -> Result<Move, Self::Err> {
        let compact: String;
        let s = if s.contains(char::is_whitespace) {
            compact = s.split_whitespace().collect();
            &compact
        } else {
            s
        };
        if !s.is_ascii() || !matches!(s.len(), 4 | 5) {
            return Err(MoveParseError::BadLength);
        }
        let src = Coord::from_str(&s[0..2]).map_err(MoveParseError::BadSrc)?;
        let dst = Coord::from_str(&s[2..4]).map_err(MoveParseError::BadDst)?;
        let promote = if s.len() == 5 {
            Some(match s.as_bytes()[4].to_ascii_lowercase() {
                b'n' => PromotePiece::Knight,
                b'b' => PromotePiece::Bishop,
                b'r' => PromotePiece::Rook,
                b'q' => PromotePiece::Queen,
                b => return Err(MoveParseError::BadPromote(b as char)),
            })
        } else {
            None
        };
        Ok(Move { src, dst, promote })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};

    #[test]
    fn test_parse() {
        let e2 = Coord::from_parts(File::E, Rank::R2);
        let e4 = Coord::from_parts(File::E, Rank::R4);
        assert_eq!(Move::from_str("e2e4").unwrap(), Move::new(e2, e4));
        assert_eq!(Move::from_str("e2 e4").unwrap(), Move::new(e2, e4));

        let e7 = Coord::from_parts(File::E, Rank::R7);
        let e8 = Coord::from_parts(File::E, Rank::R8);
        assert_eq!(
            Move::from_str("e7e8q").unwrap(),
            Move::with_promote(e7, e8, PromotePiece::Queen)
        );
        assert_eq!(
            Move::from_str("e7e8N").unwrap(),
            Move::with_promote(e7, e8, PromotePiece::Knight)
        );

        assert_eq!(Move::from_str("e2"), Err(MoveParseError::BadLength));
        // Multi-byte input must error out, not split mid-character
        assert_eq!(Move::from_str("a\u{e9}4q"), Err(MoveParseError::BadLength));
        assert_eq!(Move::from_str("e2e4\u{2605}"), Err(MoveParseError::BadLength));
        assert!(matches!(
            Move::from_str("i2e4"),
            Err(MoveParseError::BadSrc(_))
        ));
        assert!(matches!(
            Move::from_str("e2i4"),
            Err(MoveParseError::BadDst(_))
        ));
        assert_eq!(Move::from_str("e7e8x"), Err(MoveParseError::BadPromote('x')));
    }

    #[test]
    fn test_display() {
        for s in ["e2e4", "g8f6", "e7e8q", "a2a1n"] {
            assert_eq!(Move::from_str(s).unwrap().to_string(), s.to_string());
        }
    }
}
