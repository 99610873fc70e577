use super::*;

#[test]
fn new_board_has_32_pieces_and_matches_full_hash() {
    let board = Board::new();
    assert_eq!(board.occupied().count_ones(), 32);
    assert_eq!(board.occ_white.count_ones(), 16);
    assert_eq!(board.occ_black.count_ones(), 16);
    assert_eq!(board.zobrist, board.compute_zobrist_full());
}

#[test]
fn new_empty_board_has_no_pieces() {
    let board = Board::new_empty();
    assert_eq!(board.occupied(), 0);
    assert!(board.validate().is_ok());
}

#[test]
fn king_square_finds_both_kings_on_the_start_position() {
    let board = Board::new();
    assert_eq!(board.king_square(Color::White).index(), 4); // e1
    assert_eq!(board.king_square(Color::Black).index(), 60); // e8
}

#[test]
fn set_bb_keeps_occupancy_and_hash_in_sync() {
    let mut board = Board::new_empty();
    board.set_bb(Color::White, Piece::Knight, 1u64 << 27); // d4
    assert_eq!(board.occ_white, 1u64 << 27);
    assert_eq!(board.occ_all, 1u64 << 27);
    assert_eq!(board.piece_type_at(Square::from_index(27)), Some(Piece::Knight));
    assert_eq!(board.zobrist, board.compute_zobrist_full());
}

#[test]
fn repetition_count_starts_at_one_for_the_current_position() {
    let board = Board::new();
    assert_eq!(board.repetition_count(), 1);
    assert!(!board.is_threefold());
}

#[test]
fn repetition_count_includes_history_matches() {
    let mut board = Board::new();
    board.history.push(board.zobrist);
    board.history.push(board.zobrist);
    assert_eq!(board.repetition_count(), 3);
    assert!(board.is_threefold());
}

#[test]
fn has_major_pieces_is_false_once_only_pawns_and_king_remain() {
    let mut board = Board::new_empty();
    board.set_bb(Color::White, Piece::King, 1u64 << 4);
    board.set_bb(Color::White, Piece::Pawn, 0x0000_0000_0000_FF00);
    assert!(!board.has_major_pieces(Color::White));
    board.set_bb(Color::White, Piece::Rook, 1);
    assert!(board.has_major_pieces(Color::White));
}

#[test]
fn color_opposite_round_trips() {
    assert_eq!(Color::White.opposite(), Color::Black);
    assert_eq!(Color::Black.opposite().opposite(), Color::Black);
}

#[test]
fn piece_values_are_in_ascending_material_order() {
    assert!(Piece::Pawn.value() < Piece::Knight.value());
    assert!(Piece::Knight.value() < Piece::Rook.value());
    assert!(Piece::Rook.value() < Piece::Queen.value());
}

#[test]
fn board_display_matches_to_fen() {
    let board = Board::new();
    assert_eq!(board.to_string(), board.to_fen());
}
