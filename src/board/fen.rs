//! FEN parsing and serialization.

use super::fen_tables::{CHAR_TO_PC, PC_TO_CHAR};
use super::{Board, Color, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use crate::error::{EngineError, EngineResult};
use crate::square::Square;

fn parse_error(detail: impl Into<String>) -> EngineError {
    EngineError::ParseError {
        detail: detail.into(),
    }
}

impl Board {
    /// Overwrite `self` from a FEN string. On error `self` is left as an
    /// empty board — callers that need the previous position preserved
    /// should clone before calling this.
    pub fn set_fen(&mut self, fen: &str) -> EngineResult<()> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(parse_error(format!(
                "expected at least 4 space-separated FEN fields, got {}",
                fields.len()
            )));
        }

        let mut board = Board::new_empty();

        // 1. Piece placement, ranks 8 down to 1.
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(parse_error(format!(
                "expected 8 ranks in piece placement, got {}",
                ranks.len()
            )));
        }
        for (rank_from_top, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_from_top;
            let mut file = 0usize;
            for ch in rank_str.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    file += skip as usize;
                    if file > 8 {
                        return Err(parse_error(format!(
                            "rank '{}' overflows the board",
                            rank_str
                        )));
                    }
                    continue;
                }
                if file >= 8 {
                    return Err(parse_error(format!(
                        "rank '{}' overflows the board",
                        rank_str
                    )));
                }
                let (piece, color) = CHAR_TO_PC[ch as usize]
                    .ok_or_else(|| parse_error(format!("unrecognised piece glyph '{}'", ch)))?;
                let sq = Square::from_file_rank(file as u8, rank as u8);
                let bb = board.bb(color, piece) | sq.bit();
                board.set_bb(color, piece, bb);
                file += 1;
            }
            if file != 8 {
                return Err(parse_error(format!(
                    "rank '{}' does not cover all 8 files",
                    rank_str
                )));
            }
        }

        // 2. Side to move.
        board.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(parse_error(format!("invalid side to move '{}'", other))),
        };

        // 3. Castling rights.
        board.castling_rights = 0;
        if fields[2] != "-" {
            for ch in fields[2].chars() {
                board.castling_rights |= match ch {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    other => {
                        return Err(parse_error(format!(
                            "invalid castling availability char '{}'",
                            other
                        )));
                    }
                };
            }
        }

        // 4. En passant target square.
        board.en_passant = match fields[3] {
            "-" => None,
            s => Some(
                s.parse::<Square>()
                    .map_err(|_| parse_error(format!("invalid en passant square '{}'", s)))?,
            ),
        };

        // 5/6. Halfmove clock / fullmove number: both optional for a lenient
        // FEN parse; default to 0 and 1 when absent.
        board.halfmove_clock = match fields.get(4) {
            Some(s) => s
                .parse()
                .map_err(|_| parse_error(format!("invalid halfmove clock '{}'", s)))?,
            None => 0,
        };
        board.fullmove_number = match fields.get(5) {
            Some(s) => s
                .parse()
                .map_err(|_| parse_error(format!("invalid fullmove number '{}'", s)))?,
            None => 1,
        };

        board.history.clear();
        board.refresh_zobrist();
        *self = board;
        Ok(())
    }

    /// Serialize the current position to FEN.
    pub fn to_fen(&self) -> String {
        let mut placement = String::with_capacity(64);
        for rank in (0..8).rev() {
            let mut empty_run = 0u32;
            for file in 0..8 {
                let sq = Square::from_file_rank(file, rank);
                match self.piece_at(sq) {
                    None => empty_run += 1,
                    Some((color, piece)) => {
                        if empty_run > 0 {
                            placement.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        let idx = (color as usize) * 6 + (piece as usize);
                        placement.push(PC_TO_CHAR[idx]);
                    }
                }
            }
            if empty_run > 0 {
                placement.push_str(&empty_run.to_string());
            }
            if rank != 0 {
                placement.push('/');
            }
        }

        let side = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };

        let mut castling = String::new();
        if self.castling_rights & CASTLE_WK != 0 {
            castling.push('K');
        }
        if self.castling_rights & CASTLE_WQ != 0 {
            castling.push('Q');
        }
        if self.castling_rights & CASTLE_BK != 0 {
            castling.push('k');
        }
        if self.castling_rights & CASTLE_BQ != 0 {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = match self.en_passant {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };

        format!(
            "{} {} {} {} {} {}",
            placement, side, castling, ep, self.halfmove_clock, self.fullmove_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_round_trips() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let mut board = Board::new_empty();
        board.set_fen(fen).unwrap();
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn en_passant_square_round_trips() {
        let fen = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
        let mut board = Board::new_empty();
        board.set_fen(fen).unwrap();
        assert_eq!(board.en_passant.unwrap().to_string(), "d6");
    }

    #[test]
    fn missing_fields_are_a_parse_error() {
        let mut board = Board::new_empty();
        assert!(board.set_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").is_err());
    }

    #[test]
    fn bad_piece_glyph_is_a_parse_error() {
        let mut board = Board::new_empty();
        assert!(
            board
                .set_fen("rnbqkbnx/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .is_err()
        );
    }

    #[test]
    fn halfmove_and_fullmove_default_when_absent() {
        let mut board = Board::new_empty();
        board
            .set_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -")
            .unwrap();
        assert_eq!(board.halfmove_clock, 0);
        assert_eq!(board.fullmove_number, 1);
    }
}
