use serde::{Deserialize, Serialize};

use crate::{Board, GameConfig, SquareId, Symbol};

/// Message from the controller to an agent.
///
/// An agent answers every notification with a possibly empty list of
/// [`Signal`]s.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// Sent once when the controller is set up.
    ///
    /// This is the agent's chance to send [`Signal::RequestSymbol`] and
    /// [`Signal::InsertScorecard`], both of which are honoured only once.
    Start {
        player_idx: usize,
        name: String,
        config: GameConfig,
    },
    /// It is this agent's turn.
    ///
    /// The response should contain a [`Signal::SelectSquare`] naming one of
    /// the options, either now or later through the UI.
    YourTurn {
        board: Board,
        options: Vec<SquareId>,
    },
    /// The reply to [`Signal::RequestSymbol`].
    TakeSymbol { symbol: Symbol },
    YouWon,
    YouLose,
    /// The game ended in a draw.
    Cat,
    /// Free-text tuning value for automated agents.
    SetDiscover { value: String },
    /// Automated agents should forget what they learned.
    ClearQ,
    /// Switch between human-driven and automated play.
    ToggleComputer,
    /// The host is shutting down.
    Bye,
}

/// Message from an agent to the controller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Signal {
    SelectSquare { square: SquareId },
    RequestSymbol,
    /// Ask for a new game. Ignored while a game is in progress.
    NewGame,
    /// A label for the agent's scorecard, shown by the renderer.
    InsertScorecard { label: String },
    SetDiscover { value: String },
    ClearQ,
    ToggleComputer,
}

/// How a game ended, from one agent's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Won,
    Lost,
    Cat,
}

impl Notification {
    /// The outcome carried by a terminal notification.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Notification::YouWon => Some(Outcome::Won),
            Notification::YouLose => Some(Outcome::Lost),
            Notification::Cat => Some(Outcome::Cat),
            _ => None,
        }
    }
}
