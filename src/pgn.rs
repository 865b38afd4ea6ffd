//! PGN import and export
//!
//! Covers the tag-pair section and the movetext section: comments, variations
//! and move numbers are stripped, the remaining SAN tokens are resolved against
//! a replayed board. Game termination markers (`1-0`, `0-1`, `1/2-1/2`, `*`)
//! end the movetext.

use crate::board::Board;
use crate::game::{Game, GameState};
use crate::san;
use crate::types::Color;

use thiserror::Error;

const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// Error replaying PGN movetext onto a board
///
/// `index` is the zero-based position of the offending token in the move list.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
#[error("cannot resolve move #{}: `{}`", .index + 1, .token)]
pub struct ReplayError {
    pub index: usize,
    pub token: String,
}

/// Extracts tag pairs like `[Event "Casual Game"]` from `text`
///
/// Pairs come back in source order. A repeated tag name keeps its original
/// position and takes the last value seen.
pub fn parse_tags(text: &str) -> Vec<(String, String)> {
    let mut tags: Vec<(String, String)> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        let Some(inner) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) else {
            continue;
        };
        let Some((key, rest)) = inner.split_once(char::is_whitespace) else {
            continue;
        };
        let rest = rest.trim();
        let Some(value) = rest.strip_prefix('"').and_then(|v| v.strip_suffix('"')) else {
            continue;
        };
        match tags.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value.to_string(),
            None => tags.push((key.to_string(), value.to_string())),
        }
    }
    tags
}

/// Splits movetext into bare SAN tokens
///
/// Removes tag pairs, brace comments, `;` comments, parenthesized variations
/// (with nesting) and move numbers. Tokenizing stops at the first game
/// termination marker, which is not included in the output.
pub fn tokenize_moves(text: &str) -> Vec<String> {
    let mut cleaned = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut paren_depth = 0usize;
    while let Some(c) = chars.next() {
        match c {
            '[' => {
                for c in chars.by_ref() {
                    if c == ']' {
                        break;
                    }
                }
                cleaned.push(' ');
            }
            '{' => {
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                }
                cleaned.push(' ');
            }
            ';' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
                cleaned.push(' ');
            }
            '(' => paren_depth += 1,
            ')' => paren_depth = paren_depth.saturating_sub(1),
            _ if paren_depth > 0 => {}
            _ => cleaned.push(c),
        }
    }

    let mut tokens = Vec::new();
    'words: for word in cleaned.split_whitespace() {
        if RESULT_TOKENS.contains(&word) {
            break;
        }
        // Move numbers: digits followed by dots, possibly glued to the move
        // itself ("1.e4", "3...Nf6")
        let digits = word.len() - word.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        let mut word = word;
        if digits > 0 && digits < word.len() && word.as_bytes()[digits] == b'.' {
            word = word[digits..].trim_start_matches('.');
        }
        if word.is_empty() || word.chars().all(|c| c.is_ascii_digit()) {
            continue 'words;
        }
        tokens.push(word.to_string());
    }
    tokens
}

/// Replays PGN `text` onto `board` and returns the number of moves applied
///
/// The board is reset to the initial position first; White moves on the first
/// token and colors alternate from there. On an unresolvable token the error
/// names it, and the board keeps every move applied before the failure.
pub fn replay(board: &mut Board, text: &str) -> Result<usize, ReplayError> {
    *board = Board::initial();
    let tokens = tokenize_moves(text);
    let mut color = Color::White;
    for (index, token) in tokens.iter().enumerate() {
        let mv = san::resolve(board, token, color).ok_or_else(|| ReplayError {
            index,
            token: token.clone(),
        })?;
        board.apply_move(mv);
        color = color.inv();
    }
    Ok(tokens.len())
}

/// Renders a PGN document from tag pairs and SAN move tokens
///
/// Tag pairs come first, one per line, then a blank line, then the numbered
/// movetext with `result` (if any) appended after the final move.
pub fn generate(tags: &[(String, String)], san_moves: &[String], result: Option<&str>) -> String {
    let mut out = String::new();
    for (key, value) in tags {
        out.push_str(&format!("[{} \"{}\"]\n", key, value));
    }
    if !tags.is_empty() {
        out.push('\n');
    }
    for (i, pair) in san_moves.chunks(2).enumerate() {
        out.push_str(&format!("{}. ", i + 1));
        for token in pair {
            out.push_str(token);
            out.push(' ');
        }
    }
    if let Some(result) = result {
        out.push_str(result);
    }
    let mut out = out.trim_end().to_string();
    out.push('\n');
    out
}

/// The PGN result token for a finished game, or `None` while play continues
pub fn game_result_token(game: &Game) -> Option<&'static str> {
    match game.state() {
        GameState::Checkmate | GameState::Resigned => match game.winner() {
            Some(Color::White) => Some("1-0"),
            Some(Color::Black) => Some("0-1"),
            None => None,
        },
        GameState::Stalemate | GameState::Draw => Some("1/2-1/2"),
        GameState::Ongoing | GameState::Check => None,
    }
}
