use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

use crate::{winning_moves, Board, Notification, Player, Signal, SquareId, Symbol};

/// A participant in a game: something that reacts to notifications from the
/// controller by sending signals back.
pub trait Agent {
    /// The roster entry for this agent.
    fn player(&self) -> Player;

    /// Reacts to a notification. Errors are reserved for communication
    /// failures; an agent that has nothing to say returns an empty list.
    fn notify(&mut self, notification: &Notification) -> anyhow::Result<Vec<Signal>>;
}

/// An in-process agent that is either driven by a human through the UI, or
/// automated.
///
/// When automated, it takes a move that wins right away if there is one,
/// except that with probability `discover` it explores a random option instead.
pub struct LocalAgent {
    name: String,
    computer: bool,
    discover: f64,
    streak: usize,
    symbol: Option<Symbol>,
    rng: StdRng,
}

impl LocalAgent {
    pub fn human(name: &str) -> Self {
        Self::new(name, false, StdRng::from_entropy())
    }

    pub fn computer(name: &str, rng: StdRng) -> Self {
        Self::new(name, true, rng)
    }

    fn new(name: &str, computer: bool, rng: StdRng) -> Self {
        Self {
            name: String::from(name),
            computer,
            discover: 0.0,
            streak: 0,
            symbol: None,
            rng,
        }
    }

    pub fn is_computer(&self) -> bool {
        self.computer
    }

    pub fn symbol(&self) -> Option<Symbol> {
        self.symbol
    }

    fn choose_square(&mut self, board: &Board, options: &[SquareId]) -> Option<SquareId> {
        let explore = self.rng.gen::<f64>() < self.discover;
        if !explore {
            if let Some(symbol) = self.symbol {
                let winning = winning_moves(board, self.streak, symbol, options);
                if let Some(&square) = winning.first() {
                    return Some(square);
                }
            }
        }
        options.choose(&mut self.rng).copied()
    }
}

impl Agent for LocalAgent {
    fn player(&self) -> Player {
        if self.computer {
            Player::computer(&self.name)
        } else {
            Player::human(&self.name)
        }
    }

    fn notify(&mut self, notification: &Notification) -> anyhow::Result<Vec<Signal>> {
        trace!(agent = self.name, ?notification, "Local agent notified");
        let signals = match notification {
            Notification::Start { config, .. } => {
                self.streak = config.streak;
                vec![
                    Signal::RequestSymbol,
                    Signal::InsertScorecard {
                        label: self.name.clone(),
                    },
                ]
            }
            Notification::TakeSymbol { symbol } => {
                self.symbol = Some(*symbol);
                vec![]
            }
            Notification::YourTurn { board, options } => {
                if !self.computer {
                    return Ok(vec![]);
                }
                self.choose_square(board, options)
                    .map(|square| Signal::SelectSquare { square })
                    .into_iter()
                    .collect()
            }
            Notification::YouWon | Notification::YouLose | Notification::Cat => {
                debug!(agent = self.name, outcome = ?notification.outcome(), "Game over");
                vec![]
            }
            Notification::SetDiscover { value } => {
                match value.trim().parse::<f64>() {
                    Ok(discover) if (0.0..=1.0).contains(&discover) => self.discover = discover,
                    _ => warn!(agent = self.name, value, "Ignoring invalid discover value"),
                }
                vec![]
            }
            Notification::ClearQ => {
                debug!(agent = self.name, "Nothing learned to clear");
                vec![]
            }
            Notification::ToggleComputer => {
                self.computer = !self.computer;
                vec![]
            }
            Notification::Bye => vec![],
        };
        Ok(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::board_from_rows;
    use crate::{get_options, GameConfig};

    fn started(mut agent: LocalAgent, symbol: char) -> LocalAgent {
        agent
            .notify(&Notification::Start {
                player_idx: 0,
                name: agent.name.clone(),
                config: GameConfig::default(),
            })
            .unwrap();
        agent
            .notify(&Notification::TakeSymbol {
                symbol: Symbol::new(symbol),
            })
            .unwrap();
        agent
    }

    #[test]
    fn start_requests_symbol_and_scorecard() {
        let mut agent = LocalAgent::human("h");
        let signals = agent
            .notify(&Notification::Start {
                player_idx: 0,
                name: String::from("h"),
                config: GameConfig::default(),
            })
            .unwrap();
        assert_eq!(
            signals,
            [
                Signal::RequestSymbol,
                Signal::InsertScorecard {
                    label: String::from("h")
                }
            ]
        );
    }

    #[test]
    fn computer_takes_the_win() {
        let mut agent = started(LocalAgent::computer("c", StdRng::seed_from_u64(3)), 'a');
        let board = board_from_rows(&["aa.", "bb.", "..."]);
        let options = get_options(&board, false);
        let signals = agent
            .notify(&Notification::YourTurn { board, options })
            .unwrap();
        assert_eq!(
            signals,
            [Signal::SelectSquare {
                square: SquareId::new(2, 0)
            }]
        );
    }

    #[test]
    fn human_waits_for_the_ui() {
        let mut agent = started(LocalAgent::human("h"), 'a');
        let board = Board::new(3);
        let options = get_options(&board, false);
        let turn = Notification::YourTurn { board, options };
        assert!(agent.notify(&turn).unwrap().is_empty());

        agent.notify(&Notification::ToggleComputer).unwrap();
        assert!(agent.is_computer());
        assert!(agent.player().computer);
        assert_eq!(agent.notify(&turn).unwrap().len(), 1);
    }

    #[test]
    fn validates_discover() {
        let mut agent = started(LocalAgent::human("h"), 'a');
        agent
            .notify(&Notification::SetDiscover {
                value: String::from("0.25"),
            })
            .unwrap();
        assert_eq!(agent.discover, 0.25);
        agent
            .notify(&Notification::SetDiscover {
                value: String::from("lots"),
            })
            .unwrap();
        assert_eq!(agent.discover, 0.25);
    }
}
