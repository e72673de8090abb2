use quickcheck::{Arbitrary, Gen};

use crate::{Board, SquareId, Symbol};

/// A random board together with a streak length that fits on it.
#[derive(Clone, Debug)]
pub struct ArbitraryBoard {
    pub board: Board,
    pub streak: usize,
    /// The symbols that may appear on the board.
    pub symbols: Vec<Symbol>,
}

impl Arbitrary for ArbitraryBoard {
    fn arbitrary(g: &mut Gen) -> Self {
        let size = usize::arbitrary(g) % 5 + 1;
        let streak = usize::arbitrary(g) % size + 1;
        // Few symbols and dense boards, so that streaks actually show up
        let symbols: Vec<Symbol> = "abc"[..usize::arbitrary(g) % 3 + 1]
            .chars()
            .map(Symbol::new)
            .collect();
        let fill_percentage = u8::arbitrary(g) % 101;

        let mut board = Board::new(size);
        for y in 0..size {
            for x in 0..size {
                if u8::arbitrary(g) % 100 < fill_percentage {
                    board.set(SquareId { x, y }, g.choose(&symbols).copied());
                }
            }
        }
        ArbitraryBoard {
            board,
            streak,
            symbols,
        }
    }
}

/// Builds a board from rows of characters, where `.` is an empty cell.
pub fn board_from_rows(rows: &[&str]) -> Board {
    let mut board = Board::new(rows.len());
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.chars().count(), rows.len(), "row {} is not square", y);
        for (x, c) in row.chars().enumerate() {
            if c != '.' {
                board.set(SquareId { x, y }, Some(Symbol::new(c)));
            }
        }
    }
    board
}
