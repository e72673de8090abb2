use std::collections::BTreeSet;

use gridgame::{winning_moves, Board, SquareId, Symbol};

/// The symbols currently on the board.
pub fn symbols_on_board(board: &Board) -> BTreeSet<Symbol> {
    board.rows().iter().flatten().flatten().copied().collect()
}

/// Options that some other symbol on the board would win with next.
///
/// Playing one of them blocks that win. In games with more than two players
/// there may be more threats than can be blocked in one move.
pub fn blocking_moves(
    board: &Board,
    streak: usize,
    me: Symbol,
    options: &[SquareId],
) -> Vec<SquareId> {
    let mut blocks = BTreeSet::new();
    for symbol in symbols_on_board(board) {
        if symbol != me {
            blocks.extend(winning_moves(board, streak, symbol, options));
        }
    }
    blocks.into_iter().collect()
}
