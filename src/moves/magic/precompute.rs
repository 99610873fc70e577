//! Magic-number search: builds a full set of rook/bishop magic tables from
//! scratch by brute-force searching for collision-free magics per square.

use super::attacks::{bishop_attacks_per_square, rook_attacks_per_square};
use super::search::find_magic_number_for_square;
use super::structs::{BishopMagicTables, MagicEntry, MagicTables, RookMagicTables};
use rand::{RngCore, SeedableRng, rngs::StdRng};

#[cfg(feature = "deterministic_magic")]
const MAGIC_SEED: u64 = 0xD1B5_4A32_D192_ED03;

/// How to seed the RNG driving the magic-number search.
pub enum MagicTableSeed {
    /// OS-seeded randomness (or, under `deterministic_magic`, a fixed internal seed).
    Random,
    /// An explicit seed, for reproducible tests and benchmarks.
    Fixed(u64),
}

fn rng_for_seed(seed: MagicTableSeed) -> StdRng {
    match seed {
        MagicTableSeed::Fixed(s) => StdRng::seed_from_u64(s),
        MagicTableSeed::Random => {
            #[cfg(feature = "deterministic_magic")]
            {
                StdRng::seed_from_u64(MAGIC_SEED)
            }
            #[cfg(not(feature = "deterministic_magic"))]
            {
                let mut seed_bytes = [0u8; 32];
                rand::rng().fill_bytes(&mut seed_bytes);
                StdRng::from_seed(seed_bytes)
            }
        }
    }
}

const NOT_EDGE_FILES: u64 = !(0x0101_0101_0101_0101 | (0x0101_0101_0101_0101 << 7));
const NOT_EDGE_RANKS: u64 = !(0xFF | (0xFF << 56));
const NOT_EDGES: u64 = NOT_EDGE_FILES & NOT_EDGE_RANKS;

/// The subset of squares reachable by a rook from `square` on an empty board,
/// excluding the board edge (the edge square is always either occupied or
/// irrelevant to the attack set, so magic indexing can ignore it).
fn rook_relevant_mask(square: usize) -> u64 {
    rook_attacks_per_square(square, 0) & relevant_edge_mask(square)
}

fn bishop_relevant_mask(square: usize) -> u64 {
    bishop_attacks_per_square(square, 0) & NOT_EDGES
}

/// Rook relevance additionally keeps the far edge square along the rook's own
/// file/rank, except where that edge coincides with the board border in the
/// perpendicular direction.
fn relevant_edge_mask(square: usize) -> u64 {
    let rank = square / 8;
    let file = square % 8;
    let mut mask = !0u64;
    if rank != 0 {
        mask &= !0xFFu64;
    }
    if rank != 7 {
        mask &= !(0xFFu64 << 56);
    }
    if file != 0 {
        mask &= !0x0101_0101_0101_0101u64;
    }
    if file != 7 {
        mask &= !(0x0101_0101_0101_0101u64 << 7);
    }
    mask
}

/// Enumerate every subset of `mask` via the standard Carry-Rippler trick.
fn subsets_of(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::with_capacity(1 << mask.count_ones());
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

fn build_entry(
    square: usize,
    relevant_mask: u64,
    attacks_fn: impl Fn(usize, u64) -> u64,
    rng: &mut StdRng,
) -> Result<MagicEntry, String> {
    let blockers = subsets_of(relevant_mask);
    let attacks: Vec<u64> = blockers.iter().map(|&b| attacks_fn(square, b)).collect();
    let shift = 64 - relevant_mask.count_ones();

    let magic = find_magic_number_for_square(&blockers, &attacks, shift, rng)?;

    let mut table = vec![0u64; 1usize << relevant_mask.count_ones()];
    for (&b, &a) in blockers.iter().zip(attacks.iter()) {
        let index = (b.wrapping_mul(magic) >> shift) as usize;
        table[index] = a;
    }

    Ok(MagicEntry {
        magic,
        shift,
        mask: relevant_mask,
        table: table.into_boxed_slice(),
    })
}

#[cfg(feature = "cli")]
fn progress_bar(len: u64, label: &str) -> indicatif::ProgressBar {
    let bar = indicatif::ProgressBar::new(len);
    bar.set_style(
        indicatif::ProgressStyle::with_template(
            "{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len}",
        )
        .unwrap()
        .progress_chars("=>-"),
    );
    bar.set_prefix(label.to_string());
    bar
}

/// Build complete rook and bishop magic tables for all 64 squares.
pub fn generate_magic_tables(seed: MagicTableSeed) -> Result<MagicTables, String> {
    let mut rng = rng_for_seed(seed);

    #[cfg(feature = "cli")]
    let rook_bar = progress_bar(64, "rook magics");
    let mut rook_entries = Vec::with_capacity(64);
    for square in 0..64 {
        rook_entries.push(build_entry(
            square,
            rook_relevant_mask(square),
            rook_attacks_per_square,
            &mut rng,
        )?);
        #[cfg(feature = "cli")]
        rook_bar.inc(1);
    }
    #[cfg(feature = "cli")]
    rook_bar.finish_and_clear();

    #[cfg(feature = "cli")]
    let bishop_bar = progress_bar(64, "bishop magics");
    let mut bishop_entries = Vec::with_capacity(64);
    for square in 0..64 {
        bishop_entries.push(build_entry(
            square,
            bishop_relevant_mask(square),
            bishop_attacks_per_square,
            &mut rng,
        )?);
        #[cfg(feature = "cli")]
        bishop_bar.inc(1);
    }
    #[cfg(feature = "cli")]
    bishop_bar.finish_and_clear();

    Ok(MagicTables {
        rook: RookMagicTables {
            entries: rook_entries,
        },
        bishop: BishopMagicTables {
            entries: bishop_entries,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsets_of_empty_mask_is_a_single_empty_subset() {
        assert_eq!(subsets_of(0), vec![0u64]);
    }

    #[test]
    fn subsets_of_mask_has_two_to_the_popcount_entries() {
        let mask = 0b1011u64;
        let subsets = subsets_of(mask);
        assert_eq!(subsets.len(), 1 << mask.count_ones());
        for s in &subsets {
            assert_eq!(s & !mask, 0);
        }
    }

    #[test]
    fn rook_relevant_mask_excludes_corners_for_a1() {
        let mask = rook_relevant_mask(0);
        // a8 and h1 rays trimmed at the far edge.
        assert_eq!(mask & (1u64 << 56), 0);
        assert_eq!(mask & (1u64 << 7), 0);
    }

    #[test]
    fn fixed_seed_reproduces_working_tables() {
        let tables = generate_magic_tables(MagicTableSeed::Fixed(0x45)).unwrap();
        let blockers = (1u64 << 19) | (1u64 << 35);
        let expected = rook_attacks_per_square(27, blockers);
        assert_eq!(tables.rook.get_attacks(27, blockers), expected);
    }
}
