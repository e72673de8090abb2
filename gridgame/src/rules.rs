//! Pure functions deciding what may be played and who has won.

use crate::{Board, SquareId, Symbol};

/// The four directions a streak is looked for in, starting from its origin cell:
/// horizontal, vertical, and the two diagonals.
const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (-1, 1)];

/// Returns the symbol of a streak of `streak` equal symbols, if there is one.
///
/// Every occupied cell is tried as the origin of a streak, in reverse
/// row-major order. A streak that would run off the board does not count.
pub fn check_for_win(board: &Board, streak: usize) -> Option<Symbol> {
    board
        .square_ids()
        .rev()
        .find_map(|origin| check_for_win_at(board, streak, origin))
}

/// Returns the symbol at `origin` if a streak of `streak` starts there in any direction.
pub fn check_for_win_at(board: &Board, streak: usize, origin: SquareId) -> Option<Symbol> {
    let symbol = board.get(origin)?;
    DIRECTIONS
        .iter()
        .any(|&direction| streak_in_direction(board, streak, origin, direction))
        .then_some(symbol)
}

fn streak_in_direction(
    board: &Board,
    streak: usize,
    origin: SquareId,
    (dx, dy): (isize, isize),
) -> bool {
    let symbol = board.get(origin);
    (0..streak as isize).all(|k| {
        let x = origin.x as isize + k * dx;
        let y = origin.y as isize + k * dy;
        board.get_checked(x, y) == Some(symbol)
    })
}

/// Is the game a draw ("cat's game")?
///
/// True iff every cell is occupied and nobody has won.
pub fn check_for_cat(board: &Board, streak: usize) -> bool {
    board.is_full() && check_for_win(board, streak).is_none()
}

/// The squares that may be played next.
///
/// Columns are visited from right to left and each column from bottom to
/// top. Without gravity every empty cell is an option. With gravity only the
/// lowest empty cell of each column is, and full columns contribute nothing.
pub fn get_options(board: &Board, gravity: bool) -> Vec<SquareId> {
    let size = board.size();
    let mut options = Vec::new();
    for x in (0..size).rev() {
        for y in (0..size).rev() {
            let square = SquareId { x, y };
            if board.get(square).is_none() {
                options.push(square);
                if gravity {
                    break;
                }
            }
        }
    }
    options
}

/// The options that would give `symbol` a streak right away.
pub fn winning_moves(
    board: &Board,
    streak: usize,
    symbol: Symbol,
    options: &[SquareId],
) -> Vec<SquareId> {
    let mut board = board.clone();
    options
        .iter()
        .copied()
        .filter(|&square| {
            board.set(square, Some(symbol));
            let wins = check_for_win(&board, streak) == Some(symbol);
            board.set(square, None);
            wins
        })
        .collect()
}

/// Renders a list of options the way they appear on the wire, for logging.
pub fn format_options(options: &[SquareId]) -> String {
    options
        .iter()
        .map(SquareId::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
