#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::Rng;
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;

    use crate::moves::candidate_jump_count;
    use crate::{
        apply_move, legal_moves, legal_moves_into, new_board, ApplyError, Board, Cell, Direction,
        Move, Pos, CENTER,
    };

    fn as_set(moves: &[Move]) -> HashSet<Move> {
        moves.iter().copied().collect()
    }

    #[test]
    fn english_board_has_76_geometric_jumps() {
        assert_eq!(candidate_jump_count(), 76);
    }

    #[test]
    fn initial_board_has_four_symmetric_moves() {
        let moves = legal_moves(&new_board());
        assert_eq!(moves.len(), 4);
        for m in &moves {
            assert_eq!(m.to, CENTER);
        }
        let dirs: HashSet<Direction> = moves.iter().filter_map(|m| m.direction()).collect();
        assert_eq!(dirs.len(), 4);

        let want: HashSet<Move> = [
            Move { from: Pos::new(1, 3), over: Pos::new(2, 3), to: CENTER },
            Move { from: Pos::new(5, 3), over: Pos::new(4, 3), to: CENTER },
            Move { from: Pos::new(3, 1), over: Pos::new(3, 2), to: CENTER },
            Move { from: Pos::new(3, 5), over: Pos::new(3, 4), to: CENTER },
        ]
        .into_iter()
        .collect();
        assert_eq!(as_set(&moves), want);
    }

    #[test]
    fn jump_geometry_is_collinear_and_evenly_spaced() {
        let m = Move::jump(Pos::new(2, 0), Direction::East).unwrap();
        assert_eq!(m.over, Pos::new(2, 1));
        assert_eq!(m.to, Pos::new(2, 2));
        assert_eq!(m.direction(), Some(Direction::East));

        // Landing off the cross.
        assert_eq!(Move::jump(Pos::new(0, 2), Direction::West), None);
        assert_eq!(Move::jump(Pos::new(1, 3), Direction::North), None);
    }

    #[test]
    fn legal_moves_is_idempotent() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut b = new_board();
        for _ in 0..10 {
            let a = legal_moves(&b);
            let c = legal_moves(&b);
            assert_eq!(as_set(&a), as_set(&c));
            if a.is_empty() {
                break;
            }
            b.apply(&a[rng.gen_range(0..a.len())]).unwrap();
        }
    }

    #[test]
    fn legal_moves_has_no_duplicates_and_all_are_valid() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut b = new_board();
        loop {
            let moves = legal_moves(&b);
            assert_eq!(as_set(&moves).len(), moves.len());
            for m in &moves {
                assert_eq!(b.get(m.from), Cell::Peg);
                assert_eq!(b.get(m.over), Cell::Peg);
                assert_eq!(b.get(m.to), Cell::Empty);
                assert!(m.direction().is_some());
            }
            if moves.is_empty() {
                break;
            }
            b.apply(&moves[rng.gen_range(0..moves.len())]).unwrap();
        }
    }

    #[test]
    fn every_legal_move_removes_exactly_one_peg() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _game in 0..50 {
            let mut b = new_board();
            loop {
                let moves = legal_moves(&b);
                if moves.is_empty() {
                    break;
                }
                let before = b.remaining_pegs();
                for m in &moves {
                    let next = apply_move(b, m).unwrap();
                    assert_eq!(next.remaining_pegs(), before - 1);
                    assert_eq!(next.get(m.from), Cell::Empty);
                    assert_eq!(next.get(m.over), Cell::Empty);
                    assert_eq!(next.get(m.to), Cell::Peg);
                }
                b.apply(&moves[rng.gen_range(0..moves.len())]).unwrap();
            }
        }
    }

    #[test]
    fn isolated_pegs_have_no_moves() {
        let b = Board::with_pegs(&[Pos::new(0, 2), Pos::new(3, 3), Pos::new(6, 4)]).unwrap();
        assert!(legal_moves(&b).is_empty());
    }

    #[test]
    fn legal_moves_into_clears_buffer() {
        let mut buf = legal_moves(&new_board());
        legal_moves_into(&Board::empty(), &mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn apply_rejects_moves_not_generated() {
        let b = new_board();

        // Landing on a peg.
        let onto_peg = Move::jump(Pos::new(2, 0), Direction::East).unwrap();
        let err = apply_move(b, &onto_peg).unwrap_err();
        assert!(matches!(err, ApplyError::IllegalMove { .. }));

        // Jumping over the hole.
        let over_hole = Move::jump(Pos::new(3, 2), Direction::East).unwrap();
        let err = apply_move(b, &over_hole).unwrap_err();
        assert!(matches!(err, ApplyError::IllegalMove { .. }));

        // Not a straight two-cell jump.
        let diagonal = Move {
            from: Pos::new(1, 2),
            over: Pos::new(2, 3),
            to: CENTER,
        };
        let err = apply_move(b, &diagonal).unwrap_err();
        assert_eq!(err, ApplyError::NotAJump { mv: diagonal });

        // Hand-built jumps starting in a corner or below the grid.
        for (from, over, to) in [
            (Pos::new(1, 1), Pos::new(1, 2), Pos::new(1, 3)),
            (Pos::new(7, 3), Pos::new(6, 3), Pos::new(5, 3)),
        ] {
            let mv = Move { from, over, to };
            let err = apply_move(b, &mv).unwrap_err();
            assert_eq!(err, ApplyError::NotAJump { mv });
        }
    }

    #[test]
    fn jump_requires_source_on_board() {
        assert_eq!(Move::jump(Pos::new(1, 1), Direction::East), None);
        assert_eq!(Move::jump(Pos::new(7, 3), Direction::North), None);
        assert_eq!(Move::jump(Pos::new(0, 0), Direction::South), None);
        assert!(Move::jump(Pos::new(6, 3), Direction::North).is_some());
    }

    #[test]
    fn get_outside_grid_is_out_of_bounds() {
        let b = new_board();
        assert_eq!(b.get(Pos::new(7, 3)), Cell::OutOfBounds);
        assert_eq!(b.get(Pos::new(3, 9)), Cell::OutOfBounds);
        assert_eq!(b.get(Pos::new(3, 4)), Cell::Peg);
    }

    #[test]
    fn failed_apply_leaves_board_untouched() {
        let mut b = new_board();
        let bad = Move::jump(Pos::new(2, 0), Direction::East).unwrap();
        assert!(b.apply(&bad).is_err());
        assert_eq!(b, new_board());
    }
}
