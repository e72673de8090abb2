use crate::SquareId;

/// The error type for setting up a game.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    ZeroStreak,
    GridSmallerThanStreak { grid_size: usize, streak: usize },
    DuplicatePlayerName { name: String },
    TooManyPlayers { players: usize, symbols_left: usize },
    AgentCountMismatch { agents: usize, players: usize },
}

impl std::error::Error for ConfigurationError {}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::ZeroStreak => write!(f, "The streak needed to win must be at least 1"),
            ConfigurationError::GridSmallerThanStreak { grid_size, streak } => write!(
                f,
                "A {0}x{0} grid cannot hold a streak of {1}",
                grid_size, streak
            ),
            ConfigurationError::DuplicatePlayerName { name } => {
                write!(f, "More than one player is named '{}'", name)
            }
            ConfigurationError::TooManyPlayers {
                players,
                symbols_left,
            } => write!(
                f,
                "{} players need symbols, but only {} symbols are left",
                players, symbols_left
            ),
            ConfigurationError::AgentCountMismatch { agents, players } => write!(
                f,
                "Got {} agents for {} players",
                agents, players
            ),
        }
    }
}

/// The error type for a rejected [`select_square`](crate::GameController::select_square) call.
///
/// Validation happens before anything is written, so a rejected move leaves
/// the game untouched.
#[derive(Debug, PartialEq, Eq)]
pub enum IllegalMove {
    GameNotInProgress,
    UnknownPlayer { player_idx: usize },
    NotCurrentPlayer { player_idx: usize, current_idx: usize },
    UnknownSquare { square: SquareId },
    SquareTaken { square: SquareId },
    NotAnOption { square: SquareId },
    NoSymbolAssigned { player_idx: usize },
}

impl std::error::Error for IllegalMove {}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMove::GameNotInProgress => write!(f, "No game is in progress"),
            IllegalMove::UnknownPlayer { player_idx } => {
                write!(f, "There is no player with index {}", player_idx)
            }
            IllegalMove::NotCurrentPlayer {
                player_idx,
                current_idx,
            } => write!(
                f,
                "Player {} tried to move, but it is player {}'s turn",
                player_idx, current_idx
            ),
            IllegalMove::UnknownSquare { square } => {
                write!(f, "Square {} is not on the board", square)
            }
            IllegalMove::SquareTaken { square } => write!(f, "Square {} is already taken", square),
            IllegalMove::NotAnOption { square } => {
                write!(f, "Square {} is not an option this turn", square)
            }
            IllegalMove::NoSymbolAssigned { player_idx } => {
                write!(f, "Player {} has not been assigned a symbol", player_idx)
            }
        }
    }
}

/// Every symbol of a [`SymbolPool`](crate::SymbolPool) has been handed out.
#[derive(Debug, PartialEq, Eq)]
pub struct SymbolPoolExhausted;

impl std::error::Error for SymbolPoolExhausted {}

impl std::fmt::Display for SymbolPoolExhausted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "The symbol pool is exhausted")
    }
}

/// A string that is not of the form `"{x}|{y}"`.
#[derive(Debug, PartialEq, Eq)]
pub struct InvalidSquareId(pub String);

impl std::error::Error for InvalidSquareId {}

impl std::fmt::Display for InvalidSquareId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' is not a coordinate id of the form x|y", self.0)
    }
}

/// A list of rows that does not form a square grid.
#[derive(Debug, PartialEq, Eq)]
pub struct MalformedBoard {
    pub row: usize,
    pub len: usize,
    pub expected: usize,
}

impl std::error::Error for MalformedBoard {}

impl std::fmt::Display for MalformedBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Row {} has {} cells, but the board has {} rows",
            self.row, self.len, self.expected
        )
    }
}

/// The error type for handling a signal from an agent.
#[derive(Debug, PartialEq, Eq)]
pub enum GameError {
    IllegalMove { player_idx: usize, err: IllegalMove },
    UnknownPlayer { player_idx: usize },
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::IllegalMove { err, .. } => Some(err),
            GameError::UnknownPlayer { .. } => None,
        }
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::IllegalMove { player_idx, .. } => {
                write!(f, "Illegal move by player {}", player_idx)
            }
            GameError::UnknownPlayer { player_idx } => {
                write!(f, "Signal from unknown player {}", player_idx)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn game_error_chains_to_illegal_move() {
        let err = GameError::IllegalMove {
            player_idx: 1,
            err: IllegalMove::SquareTaken {
                square: SquareId::new(0, 2),
            },
        };
        assert_eq!(err.to_string(), "Illegal move by player 1");
        assert_eq!(
            err.source().unwrap().to_string(),
            "Square 0|2 is already taken"
        );
    }

    #[test]
    fn configuration_error_display() {
        let err = ConfigurationError::GridSmallerThanStreak {
            grid_size: 3,
            streak: 4,
        };
        assert_eq!(err.to_string(), "A 3x3 grid cannot hold a streak of 4");
    }
}
