//! The `setOption`-style tunables surface: `HashMB`, `Threads`,
//! `NullMoveReduction`, `LMRFullDepthMoves`, `LMRReductionLimit`,
//! `FutilityMargin`, `RazoringMargin`, the four `MinDepthFor*` knobs, and
//! the evaluator's `MorphyBias`/`UseMorphyStyle` pair.
//!
//! Out-of-range numeric values are clamped into a documented valid range
//! and logged; an unknown option name is rejected rather than silently
//! ignored, since a silently-ignored typo is worse than a rejected one.
//! `PawnStructureWeight`/`KingSafetyWeight`/`MobilityWeight` are accepted
//! (and value-checked) but currently have no effect: they're names the
//! evaluator interface reserves for future per-term weighting, not yet
//! wired into `morphy_eval`.
//! Every other field here is live: `Engine::search_with_progress` snapshots
//! `SearchOptions` into a `search::context::SearchConfig` once per `search()`
//! call (via `SearchContext::with_options`), and `alpha_beta`/`quiescence`
//! read that snapshot at their NMP/razoring/futility/LMR decision points and
//! at every leaf evaluation. Options are read at the start of `search()` —
//! mutating them mid-search is unsupported, matching the evaluator
//! interface's "do not call `configure_options` during search" contract.

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub hash_mb: usize,
    pub threads: usize,
    pub null_move_reduction: i32,
    pub lmr_full_depth_moves: i32,
    pub lmr_reduction_limit: i32,
    pub futility_margin: i32,
    pub razoring_margin: i32,
    pub min_depth_for_nmp: i32,
    pub min_depth_for_lmr: i32,
    pub min_depth_for_futility: i32,
    pub min_depth_for_razoring: i32,
    pub morphy_bias: f64,
    pub use_morphy_style: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            hash_mb: 64,
            threads: 1,
            null_move_reduction: 3,
            lmr_full_depth_moves: 4,
            lmr_reduction_limit: 3,
            futility_margin: 100,
            razoring_margin: 300,
            min_depth_for_nmp: 3,
            min_depth_for_lmr: 3,
            min_depth_for_futility: 1,
            min_depth_for_razoring: 2,
            morphy_bias: 0.0,
            use_morphy_style: false,
        }
    }
}

const MIN_HASH_MB: usize = 1;
const MAX_HASH_MB: usize = 4096;
const MAX_THREADS: usize = 64;

impl SearchOptions {
    /// Apply a single stringly-typed UCI-style option. Numeric values outside
    /// their valid range are clamped (and a warning logged); an unrecognised
    /// option name is rejected.
    pub fn set_option(&mut self, name: &str, value: &str) -> EngineResult<()> {
        let invalid = || EngineError::InvalidOption {
            name: name.to_string(),
            value: value.to_string(),
        };

        match name {
            "HashMB" => self.hash_mb = clamp_parse_usize(name, value, MIN_HASH_MB, MAX_HASH_MB)?,
            "Threads" => self.threads = clamp_parse_usize(name, value, 1, MAX_THREADS)?,
            "NullMoveReduction" => self.null_move_reduction = clamp_parse(name, value, 0, 6)?,
            "LMRFullDepthMoves" => self.lmr_full_depth_moves = clamp_parse(name, value, 0, 32)?,
            "LMRReductionLimit" => self.lmr_reduction_limit = clamp_parse(name, value, 0, 8)?,
            "FutilityMargin" => self.futility_margin = clamp_parse(name, value, 0, 2000)?,
            "RazoringMargin" => self.razoring_margin = clamp_parse(name, value, 0, 2000)?,
            "MinDepthForNMP" => self.min_depth_for_nmp = clamp_parse(name, value, 0, 16)?,
            "MinDepthForLMR" => self.min_depth_for_lmr = clamp_parse(name, value, 0, 16)?,
            "MinDepthForFutility" => self.min_depth_for_futility = clamp_parse(name, value, 0, 16)?,
            "MinDepthForRazoring" => self.min_depth_for_razoring = clamp_parse(name, value, 0, 16)?,
            "MorphyBias" => {
                let parsed: f64 = value.parse().map_err(|_| invalid())?;
                let clamped = parsed.clamp(0.0, 2.0);
                if clamped != parsed {
                    tracing::warn!(option = name, requested = parsed, clamped, "option clamped");
                }
                self.morphy_bias = clamped;
            }
            "UseMorphyStyle" => {
                self.use_morphy_style = match value.to_ascii_lowercase().as_str() {
                    "true" | "1" | "on" => true,
                    "false" | "0" | "off" => false,
                    _ => return Err(invalid()),
                };
            }
            // Reserved evaluator knobs the interface names for future use but
            // morphy_eval doesn't yet read; accepted (and value-validated) as
            // known names rather than rejected, per a typo-vs-future-knob
            // distinction, but otherwise no-ops beyond the documented
            // defaults.
            "PawnStructureWeight" | "KingSafetyWeight" | "MobilityWeight" => {
                value.parse::<f64>().map_err(|_| invalid())?;
            }
            _ => return Err(invalid()),
        }
        Ok(())
    }
}

fn clamp_parse(name: &str, value: &str, lo: i32, hi: i32) -> EngineResult<i32> {
    let parsed: i64 = value.parse().map_err(|_| EngineError::InvalidOption {
        name: name.to_string(),
        value: value.to_string(),
    })?;
    let clamped = parsed.clamp(lo as i64, hi as i64) as i32;
    if clamped as i64 != parsed {
        tracing::warn!(option = name, requested = parsed, clamped, "option clamped");
    }
    Ok(clamped)
}

fn clamp_parse_usize(name: &str, value: &str, lo: usize, hi: usize) -> EngineResult<usize> {
    let parsed: i64 = value.parse().map_err(|_| EngineError::InvalidOption {
        name: name.to_string(),
        value: value.to_string(),
    })?;
    let clamped = parsed.clamp(lo as i64, hi as i64) as usize;
    if clamped as i64 != parsed {
        tracing::warn!(option = name, requested = parsed, clamped, "option clamped");
    }
    Ok(clamped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_option_name_is_rejected() {
        let mut opts = SearchOptions::default();
        assert!(opts.set_option("NotARealOption", "1").is_err());
    }

    #[test]
    fn out_of_range_value_is_clamped_not_rejected() {
        let mut opts = SearchOptions::default();
        opts.set_option("HashMB", "999999").unwrap();
        assert_eq!(opts.hash_mb, MAX_HASH_MB);
    }

    #[test]
    fn morphy_bias_clamps_to_documented_range() {
        let mut opts = SearchOptions::default();
        opts.set_option("MorphyBias", "3.5").unwrap();
        assert_eq!(opts.morphy_bias, 2.0);
    }

    #[test]
    fn reserved_evaluator_weight_knobs_are_accepted_as_no_ops() {
        let mut opts = SearchOptions::default();
        let before = opts.clone();
        assert!(opts.set_option("PawnStructureWeight", "1.5").is_ok());
        assert!(opts.set_option("KingSafetyWeight", "0.8").is_ok());
        assert!(opts.set_option("MobilityWeight", "1.0").is_ok());
        assert_eq!(opts, before);
        assert!(opts.set_option("PawnStructureWeight", "not-a-number").is_err());
    }

    #[test]
    fn use_morphy_style_accepts_boolean_spellings() {
        let mut opts = SearchOptions::default();
        opts.set_option("UseMorphyStyle", "true").unwrap();
        assert!(opts.use_morphy_style);
        opts.set_option("UseMorphyStyle", "0").unwrap();
        assert!(!opts.use_morphy_style);
    }
}
