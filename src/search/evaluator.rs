//! The pluggable evaluator capability set: `evaluate` plus
//! `configure_options`, with optional incremental hooks the search is not
//! required to call. Two concrete variants are provided, selected at
//! engine construction time from `SearchOptions::use_morphy_style`.
//!
//! The search's hot recursive path (`search::search::alpha_beta`/
//! `quiescence`) doesn't call through `dyn Evaluator`: it reads
//! `SearchContext::config.eval_mode` (`search::context::EvalMode`), a plain
//! enum matched inline, so selecting the Morphy variant still changes what
//! the search evaluates without adding a vtable call to every node.
//! `Evaluator` is the capability-set boundary used at the root
//! (`Engine::evaluate`) and wherever a caller wants to swap evaluators
//! without touching the search internals; `EvalMode` carries the same
//! selection into the hot path.

use crate::board::Board;
use crate::moves::magic::MagicTables;
use crate::options::SearchOptions;
use crate::search::eval::{morphy_eval, static_eval};

/// A pluggable static evaluator. `evaluate` must return a side-independent
/// (positive = white-favourable) centipawn score. The three `on_*` hooks
/// default to no-ops; callers must not rely on them being invoked.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, board: &Board, tables: &MagicTables, alpha: i32, beta: i32) -> i32;

    /// Apply the evaluator-relevant subset of `SearchOptions` (currently
    /// just `MorphyBias`). Called once at engine construction / option
    /// update, never mid-search.
    fn configure_options(&mut self, _options: &SearchOptions) {}

    fn on_move_made(&mut self, _board: &Board) {}
    fn on_move_undone(&mut self, _board: &Board) {}
    fn on_position_reset(&mut self, _board: &Board) {}
}

/// The handcrafted baseline: tapered PeSTO material/PSQT plus mobility,
/// pawn structure, king safety, and mop-up terms. See `eval::static_eval`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HandcraftedEvaluator;

impl Evaluator for HandcraftedEvaluator {
    fn evaluate(&self, board: &Board, tables: &MagicTables, alpha: i32, beta: i32) -> i32 {
        static_eval(board, tables, alpha, beta)
    }
}

/// The Morphy-biased variant: independently scales development,
/// king-attack, and mobility contributions by `bias` and adds the
/// opponent-uncastled-king and sacrifice-compensation terms. See
/// `eval::morphy_eval`.
#[derive(Debug, Clone, Copy)]
pub struct MorphyEvaluator {
    pub bias: f64,
}

impl Default for MorphyEvaluator {
    fn default() -> Self {
        Self { bias: 1.0 }
    }
}

impl Evaluator for MorphyEvaluator {
    fn evaluate(&self, board: &Board, tables: &MagicTables, alpha: i32, beta: i32) -> i32 {
        morphy_eval(board, tables, alpha, beta, self.bias)
    }

    fn configure_options(&mut self, options: &SearchOptions) {
        self.bias = options.morphy_bias;
    }
}

/// Select and configure the evaluator named by `options`.
pub fn make_evaluator(options: &SearchOptions) -> Box<dyn Evaluator> {
    if options.use_morphy_style {
        let mut e = MorphyEvaluator {
            bias: options.morphy_bias,
        };
        e.configure_options(options);
        Box::new(e)
    } else {
        Box::new(HandcraftedEvaluator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::magic::loader::load_magic_tables;
    use std::str::FromStr;

    #[test]
    fn handcrafted_evaluator_matches_static_eval() {
        let board = Board::from_str("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .unwrap();
        let tables = load_magic_tables();
        let e = HandcraftedEvaluator;
        assert_eq!(
            e.evaluate(&board, &tables, -i32::MAX, i32::MAX),
            static_eval(&board, &tables, -i32::MAX, i32::MAX)
        );
    }

    #[test]
    fn make_evaluator_selects_morphy_from_options() {
        let mut opts = SearchOptions::default();
        opts.use_morphy_style = true;
        opts.morphy_bias = 1.5;
        let board = Board::from_str("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .unwrap();
        let tables = load_magic_tables();

        let e = make_evaluator(&opts);
        assert_eq!(
            e.evaluate(&board, &tables, -i32::MAX, i32::MAX),
            morphy_eval(&board, &tables, -i32::MAX, i32::MAX, 1.5)
        );
    }

    #[test]
    fn default_options_select_handcrafted() {
        let opts = SearchOptions::default();
        let board = Board::from_str("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .unwrap();
        let tables = load_magic_tables();

        let e = make_evaluator(&opts);
        assert_eq!(
            e.evaluate(&board, &tables, -i32::MAX, i32::MAX),
            static_eval(&board, &tables, -i32::MAX, i32::MAX)
        );
    }
}
