//! Chess rules engine with SAN and PGN support
//!
//! The crate is built around three layers:
//!
//! - [`Board`]: an 8x8 mailbox of optional pieces. It applies moves with
//!   their side effects (captures, en passant, castling rook relocation,
//!   promotion) and answers attack queries by direct geometric scan.
//! - [`Game`]: the state machine above the board. It validates moves for the
//!   side to move, detects check, mate and stalemate, runs the draw-offer
//!   handshake and resignation, and records the SAN history.
//! - [`san`] and [`pgn`]: the notation layer. SAN tokens resolve against a
//!   live position and moves render back to SAN; PGN documents parse into
//!   tags and movetext and replay onto a board.
//!
//! Legality is king safety: a move is legal when it is in the moving piece's
//! move set and does not leave the mover's king attacked. Rules that require
//! counters beyond the last move (fifty-move rule, threefold repetition,
//! insufficient material) are out of scope; draws happen by agreement.
//!
//! # Examples
//!
//! ```
//! use rookery::{Color, Game, GameState, Move};
//! use std::str::FromStr;
//!
//! let mut game = Game::new();
//! for s in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     assert!(game.make_move(Move::from_str(s).unwrap()));
//! }
//! assert_eq!(game.state(), GameState::Checkmate);
//! assert_eq!(game.winner(), Some(Color::Black));
//! assert_eq!(game.history(), &["f3", "e5", "g4", "Qh4"]);
//! ```

pub mod board;
pub mod game;
pub mod geometry;
pub mod movegen;
pub mod moves;
pub mod pgn;
pub mod san;
pub mod types;

pub use board::Board;
pub use game::{Game, GameState};
pub use movegen::{MoveList, MovePush};
pub use moves::{Move, MoveParseError};
pub use types::{Color, Coord, CoordParseError, File, Piece, PieceKind, PromotePiece, Rank};
