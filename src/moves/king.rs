//! Precomputed king-attack bitboards, one entry per origin square.

use once_cell::sync::Lazy;

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

fn build_king_attacks() -> [u64; 64] {
    let mut table = [0u64; 64];
    for (sq, slot) in table.iter_mut().enumerate() {
        let rank = (sq / 8) as i8;
        let file = (sq % 8) as i8;
        let mut attacks = 0u64;
        for &(dr, df) in KING_OFFSETS.iter() {
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

/// `KING_ATTACKS[sq]` is the set of squares a king on `sq` attacks (castling not included).
pub static KING_ATTACKS: Lazy<[u64; 64]> = Lazy::new(build_king_attacks);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_king_has_three_targets() {
        assert_eq!(KING_ATTACKS[0].count_ones(), 3); // a1
    }

    #[test]
    fn center_king_has_eight_targets() {
        assert_eq!(KING_ATTACKS[27].count_ones(), 8); // d4
    }
}
