use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{InvalidSquareId, MalformedBoard};

/// Separates the two coordinates in the string form of a [`SquareId`].
pub const DELIMITER: char = '|';

/// A player's mark on the board.
///
/// Serialized as a one-character string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(char);

impl Symbol {
    pub const fn new(c: char) -> Self {
        Self(c)
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a cell by column (`x`) and row (`y`).
///
/// Rows grow downwards, so `y == size - 1` is the bottom row. The string
/// form is `"{x}|{y}"`, which is also how it is serialized.
///
/// Ordering is row-major: first by `y`, then by `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SquareId {
    pub x: usize,
    pub y: usize,
}

impl SquareId {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl Ord for SquareId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for SquareId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SquareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.x, DELIMITER, self.y)
    }
}

impl FromStr for SquareId {
    type Err = InvalidSquareId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidSquareId(String::from(s));
        let (x, y) = s.split_once(DELIMITER).ok_or_else(invalid)?;
        Ok(Self {
            x: x.trim().parse().map_err(|_| invalid())?,
            y: y.trim().parse().map_err(|_| invalid())?,
        })
    }
}

impl TryFrom<String> for SquareId {
    type Error = InvalidSquareId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SquareId> for String {
    fn from(id: SquareId) -> String {
        id.to_string()
    }
}

/// A square grid of cells that are either empty or hold a [`Symbol`].
///
/// The dimensions are fixed at creation. Serialized as its list of rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Option<Symbol>>>", into = "Vec<Vec<Option<Symbol>>>")]
pub struct Board {
    rows: Vec<Vec<Option<Symbol>>>,
}

impl Board {
    /// Creates an empty `size` x `size` board.
    pub fn new(size: usize) -> Self {
        Self {
            rows: vec![vec![None; size]; size],
        }
    }

    /// The number of rows, which is also the number of columns.
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn contains(&self, square: SquareId) -> bool {
        square.x < self.size() && square.y < self.size()
    }

    /// The value of a cell.
    ///
    /// Panics if the square is not on the board.
    pub fn get(&self, square: SquareId) -> Option<Symbol> {
        self.rows[square.y][square.x]
    }

    /// Like [`Self::get()`], but with signed coordinates that may lie off the board.
    pub fn get_checked(&self, x: isize, y: isize) -> Option<Option<Symbol>> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    /// Overwrites a cell.
    ///
    /// Panics if the square is not on the board.
    pub fn set(&mut self, square: SquareId, value: Option<Symbol>) {
        self.rows[square.y][square.x] = value;
    }

    pub fn rows(&self) -> &[Vec<Option<Symbol>>] {
        &self.rows
    }

    /// All coordinates of the board, in row-major order.
    pub fn square_ids(&self) -> impl DoubleEndedIterator<Item = SquareId> + '_ {
        let size = self.size();
        (0..size).flat_map(move |y| (0..size).map(move |x| SquareId { x, y }))
    }

    pub fn is_full(&self) -> bool {
        self.rows.iter().flatten().all(Option::is_some)
    }
}

impl TryFrom<Vec<Vec<Option<Symbol>>>> for Board {
    type Error = MalformedBoard;

    fn try_from(rows: Vec<Vec<Option<Symbol>>>) -> Result<Self, Self::Error> {
        let expected = rows.len();
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(MalformedBoard {
                row,
                len: cells.len(),
                expected,
            });
        }
        Ok(Self { rows })
    }
}

impl From<Board> for Vec<Vec<Option<Symbol>>> {
    fn from(board: Board) -> Self {
        board.rows
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Column header, last digit only
        write!(f, "    ")?;
        for x in 0..self.size() {
            write!(f, "{:<2}", x % 10)?;
        }
        write!(f, "\n   ╭")?;
        for _ in 0..self.size() {
            write!(f, "──")?;
        }
        writeln!(f, "╮")?;
        for (y, row) in self.rows.iter().enumerate() {
            write!(f, "{:>2} │", y)?;
            for cell in row {
                match cell {
                    Some(symbol) => write!(f, "{} ", symbol)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f, "│")?;
        }
        write!(f, "   ╰")?;
        for _ in 0..self.size() {
            write!(f, "──")?;
        }
        write!(f, "╯")
    }
}

/// A single cell as seen by move selection: where it is and what it holds.
///
/// Squares mirror the [`Board`] they were created from, but are not kept in
/// sync automatically. Whoever writes to a square must copy the values back
/// into the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Square {
    id: SquareId,
    value: Option<Symbol>,
}

impl Square {
    pub fn id(&self) -> SquareId {
        self.id
    }

    pub fn x(&self) -> usize {
        self.id.x
    }

    pub fn y(&self) -> usize {
        self.id.y
    }

    pub fn value(&self) -> Option<Symbol> {
        self.value
    }

    pub(crate) fn set_value(&mut self, value: Option<Symbol>) {
        self.value = value;
    }
}

/// Creates one [`Square`] per cell of the board, keyed by coordinate.
pub fn create_squares(board: &Board) -> BTreeMap<SquareId, Square> {
    board
        .square_ids()
        .map(|id| {
            (
                id,
                Square {
                    id,
                    value: board.get(id),
                },
            )
        })
        .collect()
}
