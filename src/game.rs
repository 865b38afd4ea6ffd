//! Game state machine on top of [`Board`]
//!
//! [`Game`] tracks whose turn it is, validates and applies moves, keeps the
//! SAN history, and arbitrates the end of the game: mate, stalemate, the
//! draw-offer handshake and resignation.

use crate::board::Board;
use crate::moves::Move;
use crate::movegen;
use crate::pgn::{self, ReplayError};
use crate::san;
use crate::types::Color;

use std::fmt;

/// Status of a game in progress or finished
///
/// `Ongoing` and `Check` are the live states; the other four are terminal and
/// reject further moves.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GameState {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
    Draw,
    Resigned,
}

impl GameState {
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            GameState::Checkmate | GameState::Stalemate | GameState::Draw | GameState::Resigned
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            GameState::Ongoing => "Ongoing",
            GameState::Check => "Check",
            GameState::Checkmate => "Checkmate",
            GameState::Stalemate => "Stalemate",
            GameState::Draw => "Draw",
            GameState::Resigned => "Resigned",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}

/// A chess game: board, side to move, status, draw offer and SAN history
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    side: Color,
    state: GameState,
    draw_offered_by: Option<Color>,
    history: Vec<String>,
}

impl Game {
    /// Game at the standard starting position, White to move
    pub fn new() -> Game {
        Game {
            board: Board::initial(),
            side: Color::White,
            state: GameState::Ongoing,
            draw_offered_by: None,
            history: Vec::new(),
        }
    }

    /// Rebuilds a game from PGN text
    ///
    /// Tags are ignored beyond parsing; the movetext is replayed in full and
    /// becomes the history. Fails with the first unresolvable token.
    pub fn from_pgn(text: &str) -> Result<Game, ReplayError> {
        let mut game = Game::new();
        let count = pgn::replay(&mut game.board, text)?;
        game.history = pgn::tokenize_moves(text);
        if count % 2 == 1 {
            game.side = Color::Black;
        }
        game.update_state();
        Ok(game)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side(&self) -> Color {
        self.side
    }

    /// Sets the side to move and recomputes the status
    ///
    /// Meant for rebuilding a replayed game around an externally prepared
    /// board; normal play flips the side through [`Game::make_move()`].
    pub fn set_side(&mut self, side: Color) {
        self.side = side;
        self.update_state();
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// SAN tokens of the moves played so far, in order
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Replaces the move history, for rebuilding a replayed game
    pub fn set_history(&mut self, history: Vec<String>) {
        self.history = history;
    }

    /// The winning side, for the two states that have one
    pub fn winner(&self) -> Option<Color> {
        match self.state {
            GameState::Checkmate | GameState::Resigned => Some(self.side.inv()),
            _ => None,
        }
    }

    pub fn is_draw_offered(&self) -> bool {
        self.draw_offered_by.is_some()
    }

    pub fn draw_offered_by(&self) -> Option<Color> {
        self.draw_offered_by
    }

    /// Validates and plays a move for the side to move
    ///
    /// Returns `false` without touching the game when the game is over, the
    /// source square does not hold a piece of the side to move, the move is
    /// not in the piece's move set, or it would leave the mover's king in
    /// check. On success the SAN token is recorded, a stale draw offer from
    /// the opponent is withdrawn, the turn passes and the status is updated.
    pub fn make_move(&mut self, mv: Move) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        if !self.board.is_own_piece(mv.src, self.side) {
            return false;
        }
        let mut candidates = movegen::MoveList::new();
        movegen::pseudo_legal_moves(&self.board, mv.src, &mut candidates);
        if !candidates.iter().any(|m| m.dst == mv.dst) {
            return false;
        }
        if self.board.move_leaves_king_exposed(mv, self.side) {
            return false;
        }
        // The token describes the move against the pre-move position
        let Some(san) = san::move_to_san(&self.board, mv, self.side) else {
            return false;
        };

        self.board.apply_move(mv);
        self.history.push(san);
        if self.draw_offered_by.map_or(false, |c| c != self.side) {
            self.draw_offered_by = None;
        }
        self.side = self.side.inv();
        self.update_state();
        true
    }

    /// Resigns on behalf of the side to move
    pub fn resign(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = GameState::Resigned;
        true
    }

    /// Offers a draw on behalf of the side to move
    ///
    /// The offer stands until the opponent accepts, declines, or plays a move.
    pub fn offer_draw(&mut self) -> bool {
        if self.state.is_terminal() || self.draw_offered_by.is_some() {
            return false;
        }
        self.draw_offered_by = Some(self.side);
        true
    }

    /// Accepts the opponent's pending draw offer
    pub fn accept_draw(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        match self.draw_offered_by {
            Some(offerer) if offerer != self.side => {
                self.state = GameState::Draw;
                self.draw_offered_by = None;
                true
            }
            _ => false,
        }
    }

    /// Declines the opponent's pending draw offer
    pub fn decline_draw(&mut self) -> bool {
        match self.draw_offered_by {
            Some(offerer) if offerer != self.side && !self.state.is_terminal() => {
                self.draw_offered_by = None;
                true
            }
            _ => false,
        }
    }

    fn update_state(&mut self) {
        let in_check = match self.board.king_of(self.side) {
            Some(king) => self.board.is_square_attacked(king, self.side.inv()),
            None => false,
        };
        let has_moves = movegen::has_legal_moves(&self.board, self.side);
        self.state = match (in_check, has_moves) {
            (true, true) => GameState::Check,
            (true, false) => GameState::Checkmate,
            (false, false) => GameState::Stalemate,
            (false, true) => GameState::Ongoing,
        };
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}
