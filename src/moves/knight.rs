//! Precomputed knight-attack bitboards, one entry per origin square.

use once_cell::sync::Lazy;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

fn build_knight_attacks() -> [u64; 64] {
    let mut table = [0u64; 64];
    for (sq, slot) in table.iter_mut().enumerate() {
        let rank = (sq / 8) as i8;
        let file = (sq % 8) as i8;
        let mut attacks = 0u64;
        for &(dr, df) in KNIGHT_OFFSETS.iter() {
            let r = rank + dr;
            let f = file + df;
            if (0..8).contains(&r) && (0..8).contains(&f) {
                attacks |= 1u64 << (r * 8 + f);
            }
        }
        *slot = attacks;
    }
    table
}

/// `KNIGHT_ATTACKS[sq]` is the set of squares a knight on `sq` attacks.
pub static KNIGHT_ATTACKS: Lazy<[u64; 64]> = Lazy::new(build_knight_attacks);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_knight_has_two_targets() {
        assert_eq!(KNIGHT_ATTACKS[0].count_ones(), 2); // a1
    }

    #[test]
    fn center_knight_has_eight_targets() {
        assert_eq!(KNIGHT_ATTACKS[27].count_ones(), 8); // d4
    }

    #[test]
    fn attacks_are_symmetric() {
        // a knight on b1 attacks a3, c3, d2
        let b1 = 1;
        let targets = KNIGHT_ATTACKS[b1];
        for target in [16usize, 18, 11] {
            assert!(targets & (1u64 << target) != 0);
        }
    }
}
