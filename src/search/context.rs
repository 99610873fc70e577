use crate::board::Board;
use crate::moves::magic::MagicTables;
use crate::moves::types::Move;
use crate::options::SearchOptions;
use crate::search::eval::{morphy_eval, static_eval};

/// Which evaluator `alpha_beta`/`quiescence` call at their leaves. A plain
/// enum matched inline rather than a `dyn Evaluator` call, so selecting the
/// Morphy variant through `UseMorphyStyle` doesn't add a vtable call to the
/// search's hottest path (see `search::evaluator` for the capability-set
/// version of the same choice, used at the root).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvalMode {
    Handcrafted,
    Morphy(f64),
}

impl EvalMode {
    #[inline(always)]
    pub fn evaluate(&self, board: &Board, tables: &MagicTables, alpha: i32, beta: i32) -> i32 {
        match *self {
            EvalMode::Handcrafted => static_eval(board, tables, alpha, beta),
            EvalMode::Morphy(bias) => morphy_eval(board, tables, alpha, beta, bias),
        }
    }
}

/// A snapshot of the `setOption`-tunable search knobs (§6/§10.3), taken once
/// at the start of a search — options aren't read again mid-search, matching
/// the evaluator interface's "don't call `configure_options` during search"
/// contract that `options.rs` already documents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub eval_mode: EvalMode,
    pub null_move_reduction: i32,
    pub min_depth_for_nmp: i32,
    pub lmr_full_depth_moves: i32,
    pub lmr_reduction_limit: i32,
    pub min_depth_for_lmr: i32,
    pub futility_margin: i32,
    pub min_depth_for_futility: i32,
    pub razoring_margin: i32,
    pub min_depth_for_razoring: i32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::from_options(&SearchOptions::default())
    }
}

impl SearchConfig {
    pub fn from_options(options: &SearchOptions) -> Self {
        Self {
            eval_mode: if options.use_morphy_style {
                EvalMode::Morphy(options.morphy_bias)
            } else {
                EvalMode::Handcrafted
            },
            null_move_reduction: options.null_move_reduction,
            min_depth_for_nmp: options.min_depth_for_nmp,
            lmr_full_depth_moves: options.lmr_full_depth_moves,
            lmr_reduction_limit: options.lmr_reduction_limit,
            min_depth_for_lmr: options.min_depth_for_lmr,
            futility_margin: options.futility_margin,
            min_depth_for_futility: options.min_depth_for_futility,
            razoring_margin: options.razoring_margin,
            min_depth_for_razoring: options.min_depth_for_razoring,
        }
    }
}

pub struct SearchContext {
    pub killer_moves: Vec<[Option<Move>; 2]>,
    pub history: [[i32; 64]; 64],
    pub config: SearchConfig,
}

impl Default for SearchContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchContext {
    /// A context with every tunable at its spec default and the handcrafted
    /// evaluator selected; used by callers (CLI, most tests) that don't go
    /// through `Engine`/`SearchOptions`.
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    /// Build a context whose pruning/reduction knobs and evaluator selection
    /// are taken from `options`, per §6's `setOption` surface.
    pub fn with_options(options: &SearchOptions) -> Self {
        Self::with_config(SearchConfig::from_options(options))
    }

    fn with_config(config: SearchConfig) -> Self {
        Self {
            killer_moves: vec![[None; 2]; 64],
            history: [[0; 64]; 64],
            config,
        }
    }

    pub fn update_killer(&mut self, ply: usize, mv: Move) {
        if self.killer_moves[ply][0] != Some(mv) {
            self.killer_moves[ply][1] = self.killer_moves[ply][0];
            self.killer_moves[ply][0] = Some(mv);
        }
    }

    pub fn update_history(&mut self, mv: Move, depth: i32) {
        let bonus = (depth * depth).min(400);
        self.history[mv.from.index() as usize][mv.to.index() as usize] += bonus;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_selects_the_handcrafted_evaluator() {
        assert_eq!(SearchConfig::default().eval_mode, EvalMode::Handcrafted);
    }

    #[test]
    fn with_options_picks_up_morphy_style_and_bias() {
        let mut options = SearchOptions::default();
        options.set_option("UseMorphyStyle", "true").unwrap();
        options.set_option("MorphyBias", "1.5").unwrap();

        let ctx = SearchContext::with_options(&options);
        assert_eq!(ctx.config.eval_mode, EvalMode::Morphy(1.5));
    }

    #[test]
    fn with_options_threads_the_named_tunables() {
        let mut options = SearchOptions::default();
        options.set_option("NullMoveReduction", "4").unwrap();
        options.set_option("LMRFullDepthMoves", "6").unwrap();
        options.set_option("FutilityMargin", "150").unwrap();
        options.set_option("RazoringMargin", "250").unwrap();
        options.set_option("MinDepthForRazoring", "3").unwrap();

        let ctx = SearchContext::with_options(&options);
        assert_eq!(ctx.config.null_move_reduction, 4);
        assert_eq!(ctx.config.lmr_full_depth_moves, 6);
        assert_eq!(ctx.config.futility_margin, 150);
        assert_eq!(ctx.config.razoring_margin, 250);
        assert_eq!(ctx.config.min_depth_for_razoring, 3);
    }
}
