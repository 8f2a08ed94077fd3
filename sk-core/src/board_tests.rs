#[cfg(test)]
mod tests {
    use crate::{is_on_board, new_board, Board, BoardError, Cell, Pos, CENTER, SIZE};

    const CORNERS: [(usize, usize); 4] = [(0, 0), (0, 5), (5, 0), (5, 5)];

    #[test]
    fn initial_layout_has_32_pegs_and_one_hole() {
        let b = new_board();
        let mut pegs = 0;
        let mut empty = Vec::new();
        for r in 0..SIZE {
            for c in 0..SIZE {
                match b.get(Pos::new(r, c)) {
                    Cell::Peg => pegs += 1,
                    Cell::Empty => empty.push(Pos::new(r, c)),
                    Cell::OutOfBounds => {}
                }
            }
        }
        assert_eq!(pegs, 32);
        assert_eq!(empty, vec![CENTER]);
        assert_eq!(b.remaining_pegs(), 32);
    }

    #[test]
    fn corner_blocks_are_off_board() {
        let b = new_board();
        for (r0, c0) in CORNERS {
            for r in r0..r0 + 2 {
                for c in c0..c0 + 2 {
                    assert!(!is_on_board(r, c), "({r},{c}) should be off-board");
                    assert_eq!(b.get(Pos::new(r, c)), Cell::OutOfBounds);
                }
            }
        }
    }

    #[test]
    fn topology_has_33_cells() {
        let n = (0..SIZE)
            .flat_map(|r| (0..SIZE).map(move |c| (r, c)))
            .filter(|&(r, c)| is_on_board(r, c))
            .count();
        assert_eq!(n, 33);
        assert!(!is_on_board(7, 3));
        assert!(!is_on_board(3, 7));
    }

    #[test]
    fn new_board_is_deterministic() {
        assert_eq!(new_board(), new_board());
        assert_eq!(Board::default(), new_board());
    }

    #[test]
    fn empty_board_keeps_topology() {
        let b = Board::empty();
        assert_eq!(b.remaining_pegs(), 0);
        for r in 0..SIZE {
            for c in 0..SIZE {
                let want = if is_on_board(r, c) {
                    Cell::Empty
                } else {
                    Cell::OutOfBounds
                };
                assert_eq!(b.get(Pos::new(r, c)), want);
            }
        }
    }

    #[test]
    fn with_pegs_places_exactly_those_pegs() {
        let pegs = [Pos::new(3, 1), Pos::new(3, 2), Pos::new(0, 2)];
        let b = Board::with_pegs(&pegs).unwrap();
        assert_eq!(b.remaining_pegs(), 3);
        let mut want = pegs.to_vec();
        want.sort();
        assert_eq!(b.pegs(), want);
    }

    #[test]
    fn with_pegs_rejects_corner() {
        let err = Board::with_pegs(&[Pos::new(0, 0)]).unwrap_err();
        assert_eq!(err, BoardError::OffBoard(Pos::new(0, 0)));
    }

    #[test]
    fn text_layout_roundtrips_initial_board() {
        let b = new_board();
        let text = b.to_string();
        assert_eq!(text.lines().nth(3), Some("ooo.ooo"));
        assert_eq!(Board::parse(&text).unwrap(), b);
    }

    #[test]
    fn parse_accepts_trimmed_rows_and_hash_corners() {
        let text = "##ooo##\n  ooo\nooooooo\nooo.ooo\nooooooo\n  ooo\n##ooo##\n";
        assert_eq!(Board::parse(text).unwrap(), new_board());
    }

    #[test]
    fn parse_rejects_bad_layouts() {
        assert_eq!(
            Board::parse("ooo").unwrap_err(),
            BoardError::RowCount(1)
        );

        let peg_in_corner = "o ooo  \n  ooo\nooooooo\nooo.ooo\nooooooo\n  ooo\n  ooo\n";
        assert_eq!(
            Board::parse(peg_in_corner).unwrap_err(),
            BoardError::CornerNotOffBoard { row: 0, col: 0 }
        );

        let hole_in_cross = "  ooo\n  ooo\nooo ooo\nooo.ooo\nooooooo\n  ooo\n  ooo\n";
        assert_eq!(
            Board::parse(hole_in_cross).unwrap_err(),
            BoardError::MissingCell { row: 2, col: 3 }
        );

        let bad_char = "  ooo\n  ooo\nooooooo\nooo?ooo\nooooooo\n  ooo\n  ooo\n";
        assert_eq!(
            Board::parse(bad_char).unwrap_err(),
            BoardError::BadChar {
                row: 3,
                col: 3,
                ch: '?'
            }
        );
    }
}
