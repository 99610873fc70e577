//! The programmatic engine API: `newEngine`/`search`/`stop`/
//! `isSearching`/`setOption`, plus an optional per-depth progress callback.
//! This is the language-neutral surface a UCI loop or FFI bridge would be
//! built on top of; neither is implemented here.
//!
//! `Engine` owns exactly one board and the transposition table backing its
//! searches. Cancellation is cooperative: `stop()` flips a shared
//! `AtomicBool` that `TimeManager::check_time` polls every 64 nodes inside
//! the search with release/acquire semantics.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::board::Board;
use crate::error::EngineResult;
use crate::moves::execute::{make_move_basic, undo_move_basic};
use crate::moves::magic::loader::load_magic_tables;
use crate::moves::magic::MagicTables;
use crate::moves::types::Move;
use crate::options::SearchOptions;
use crate::search::context::SearchContext;
use crate::search::search::{alpha_beta, TimeManager};
use crate::search::tt::TranspositionTable;

const INF: i32 = 32000;
const MATE_SCORE: i32 = 31000;
const MATE_THRESHOLD: i32 = MATE_SCORE - 1000;
const ASPIRATION_WINDOW: i32 = 25;
const ASPIRATION_MIN_DEPTH: i32 = 4;
const ASPIRATION_SKIP_ABOVE: i32 = 1000;
const MAX_PV_LEN: usize = 64;

/// Caller-specified stopping conditions for one `search()` call. At least
/// one of `max_depth`/`max_nodes`/`max_time_ms` should be set unless
/// `infinite` is true, in which case the search runs until `stop()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchLimits {
    pub max_depth: Option<i32>,
    pub max_nodes: Option<u64>,
    pub max_time_ms: Option<u64>,
    pub infinite: bool,
}

impl SearchLimits {
    pub fn depth(max_depth: i32) -> Self {
        Self {
            max_depth: Some(max_depth),
            ..Default::default()
        }
    }

    pub fn time(max_time_ms: u64) -> Self {
        Self {
            max_time_ms: Some(max_time_ms),
            ..Default::default()
        }
    }
}

/// What one completed (or cancelled) `search()` call returns.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub ponder_move: Option<Move>,
    pub score: i32,
    pub depth: i32,
    pub nodes: u64,
    pub time_ms: u128,
    pub pv: Vec<Move>,
}

/// Reported once per completed iterative-deepening depth.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    pub depth: i32,
    pub score: i32,
    pub nodes: u64,
    pub time_ms: u128,
    pub nps: u64,
    pub pv: Vec<Move>,
}

/// A search handle tied to one board. `Engine::search` blocks the calling
/// thread until the search completes, fails its limits, or `stop()` is
/// observed.
pub struct Engine {
    board: Board,
    tables: MagicTables,
    tt: TranspositionTable,
    options: SearchOptions,
    stop_flag: Arc<AtomicBool>,
    searching: Arc<AtomicBool>,
}

impl Engine {
    pub fn new(board: Board) -> Self {
        let options = SearchOptions::default();
        Self {
            board,
            tables: load_magic_tables(),
            tt: TranspositionTable::new(options.hash_mb),
            options,
            stop_flag: Arc::new(AtomicBool::new(false)),
            searching: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn from_fen(fen: &str) -> EngineResult<Self> {
        Ok(Self::new(Board::from_str(fen)?))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn set_position(&mut self, board: Board) {
        self.board = board;
    }

    /// `setOption(handle, name, value)`: out-of-range numeric values are
    /// clamped (and logged) rather than rejected; an unknown name is an
    /// error. `HashMB` additionally resizes the transposition table.
    pub fn set_option(&mut self, name: &str, value: &str) -> EngineResult<()> {
        self.options.set_option(name, value)?;
        if name == "HashMB" {
            self.tt = TranspositionTable::new(self.options.hash_mb);
        }
        Ok(())
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Idempotent: setting the flag when already stopped (or not currently
    /// searching) is a no-op.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Release);
    }

    pub fn is_searching(&self) -> bool {
        self.searching.load(Ordering::Acquire)
    }

    /// Blocking search entry point with no progress callback.
    pub fn search(&mut self, limits: SearchLimits) -> SearchResult {
        self.search_with_progress(limits, |_| {})
    }

    /// Blocking search entry point. `on_progress` is invoked after each
    /// completed iterative-deepening depth.
    pub fn search_with_progress(
        &mut self,
        limits: SearchLimits,
        mut on_progress: impl FnMut(&ProgressInfo),
    ) -> SearchResult {
        self.stop_flag.store(false, Ordering::Release);
        self.searching.store(true, Ordering::Release);
        self.tt.new_search();

        let max_depth = if limits.infinite {
            i32::MAX
        } else {
            limits.max_depth.unwrap_or(64)
        };
        let time_limit = if limits.infinite {
            None
        } else {
            limits.max_time_ms.map(Duration::from_millis)
        };

        let mut ctx = SearchContext::with_options(&self.options);
        let mut nodes = 0u64;
        let start = Instant::now();

        let mut last_score = 0;
        let mut last_move = None;
        let mut last_depth = 0;

        for depth in 1..=max_depth {
            let mut time = TimeManager::new(time_limit)
                .with_node_limit(limits.max_nodes)
                .with_external_stop(Some(self.stop_flag.clone()));

            let (mut alpha, mut beta) = if depth <= ASPIRATION_MIN_DEPTH
                || last_score.abs() > ASPIRATION_SKIP_ABOVE
            {
                (-INF, INF)
            } else {
                (last_score - ASPIRATION_WINDOW, last_score + ASPIRATION_WINDOW)
            };

            let (score, mv) = loop {
                let (score, mv) = alpha_beta(
                    &mut self.board,
                    &self.tables,
                    &mut ctx,
                    &mut self.tt,
                    depth,
                    0,
                    alpha,
                    beta,
                    &mut nodes,
                    &mut time,
                );

                if time.stop_signal {
                    break (score, mv);
                }
                if score <= alpha {
                    alpha = -INF;
                    continue;
                }
                if score >= beta {
                    beta = INF;
                    continue;
                }
                break (score, mv);
            };

            if time.stop_signal && depth > 1 {
                break;
            }

            last_score = score;
            last_move = mv.or(last_move);
            last_depth = depth;

            let pv = self.extract_pv(last_move);
            let elapsed = start.elapsed();
            let info = ProgressInfo {
                depth,
                score,
                nodes,
                time_ms: elapsed.as_millis(),
                nps: if elapsed.as_millis() > 0 {
                    (nodes as u128 * 1000 / elapsed.as_millis()) as u64
                } else {
                    0
                },
                pv: pv.clone(),
            };
            on_progress(&info);

            if time.stop_signal {
                break;
            }
            if score.abs() >= MATE_THRESHOLD {
                break;
            }
        }

        self.searching.store(false, Ordering::Release);

        let pv = self.extract_pv(last_move);
        SearchResult {
            best_move: last_move,
            ponder_move: pv.get(1).copied(),
            score: last_score,
            depth: last_depth,
            nodes,
            time_ms: start.elapsed().as_millis(),
            pv,
        }
    }

    /// One-shot static evaluation of the current position (no search),
    /// used by callers that just want `evaluate(board, sideToMove)`.
    pub fn evaluate(&self) -> i32 {
        let evaluator = crate::search::evaluator::make_evaluator(&self.options);
        evaluator.evaluate(&self.board, &self.tables, -INF, INF)
    }

    /// Walk the TT from the root, making/unmaking each stored best move, to
    /// reconstruct the principal variation. Stops at the first miss, a
    /// repeated position (cycle guard), or `MAX_PV_LEN`.
    fn extract_pv(&mut self, root_move: Option<Move>) -> Vec<Move> {
        let mut pv = Vec::new();
        let Some(first) = root_move else {
            return pv;
        };

        let mut undone = Vec::new();
        let undo = make_move_basic(&mut self.board, first);
        undone.push(undo);
        pv.push(first);

        let mut seen_keys = vec![self.board.zobrist];

        while pv.len() < MAX_PV_LEN {
            let hash = self.board.zobrist;
            let Some((Some(mv), _, _, _)) = self.tt.probe(hash, 0, -INF, INF, 0) else {
                break;
            };
            let next_undo = make_move_basic(&mut self.board, mv);
            if seen_keys.contains(&self.board.zobrist) {
                undo_move_basic(&mut self.board, next_undo);
                break;
            }
            seen_keys.push(self.board.zobrist);
            undone.push(next_undo);
            pv.push(mv);
        }

        for undo in undone.into_iter().rev() {
            undo_move_basic(&mut self.board, undo);
        }
        pv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_returns_a_legal_move_from_the_start_position() {
        let mut engine = Engine::from_fen(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        )
        .unwrap();
        let result = engine.search(SearchLimits::depth(3));
        assert!(result.best_move.is_some());
        assert!(result.depth >= 1);
    }

    #[test]
    fn mate_in_one_is_found_and_reported_above_threshold() {
        let mut engine = Engine::from_fen("k7/8/1K6/8/8/8/8/7R w - - 0 1").unwrap();
        let result = engine.search(SearchLimits::depth(3));
        assert!(result.score > MATE_THRESHOLD);
        assert_eq!(result.best_move.unwrap().to_uci(), "h1h8");
    }

    #[test]
    fn a_forced_mate_against_the_side_to_move_scores_below_the_threshold() {
        // Black to move, mated on the back rank (Rh8 is mate-in-1 for White
        // from the mirror of this position); from Black's own side-to-move
        // perspective the position must score as a loss past -MATE_THRESHOLD.
        let mut engine = Engine::from_fen("7r/8/8/8/8/8/1k6/K7 b - - 0 1").unwrap();
        let result = engine.search(SearchLimits::depth(3));
        assert!(
            result.score < -MATE_THRESHOLD,
            "expected a losing mate score, got {}",
            result.score
        );
    }

    #[test]
    fn self_play_for_forty_half_moves_never_produces_an_illegal_move() {
        use crate::moves::execute::generate_legal;
        use crate::moves::magic::loader::load_magic_tables;

        let mut engine =
            Engine::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        let tables = load_magic_tables();

        for ply in 0..40 {
            let result = engine.search(SearchLimits::depth(4));
            let Some(best) = result.best_move else {
                break; // checkmate or stalemate reached before 40 plies
            };

            let mut legal = Vec::with_capacity(256);
            let mut scratch = Vec::with_capacity(256);
            let mut board = engine.board().clone();
            generate_legal(&mut board, &tables, &mut legal, &mut scratch);
            assert!(
                legal.iter().any(|m| m.from == best.from && m.to == best.to),
                "move {} at ply {} is not legal in the current position",
                best.to_uci(),
                ply
            );

            let mut next = engine.board().clone();
            make_move_basic(&mut next, best);
            engine.set_position(next);
        }
    }

    #[test]
    fn stop_is_idempotent_and_observed_on_next_search() {
        let mut engine = Engine::new(Board::new());
        engine.stop();
        engine.stop();
        assert!(!engine.is_searching());
    }

    #[test]
    fn set_option_rejects_unknown_names() {
        let mut engine = Engine::new(Board::new());
        assert!(engine.set_option("NotReal", "1").is_err());
    }

    #[test]
    fn set_option_hash_mb_resizes_table() {
        let mut engine = Engine::new(Board::new());
        assert!(engine.set_option("HashMB", "4").is_ok());
        assert_eq!(engine.options().hash_mb, 4);
    }

    #[test]
    fn evaluate_is_symmetric_at_the_start_position() {
        let engine = Engine::new(Board::new());
        assert_eq!(engine.evaluate(), 0);
    }
}
