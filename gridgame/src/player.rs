use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Outcome, Symbol};

/// A participant as the controller sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    /// Automated players ignore clicks on the board.
    pub computer: bool,
    symbol: Option<Symbol>,
}

impl Player {
    pub fn human(name: &str) -> Self {
        Self {
            name: String::from(name),
            computer: false,
            symbol: None,
        }
    }

    pub fn computer(name: &str) -> Self {
        Self {
            name: String::from(name),
            computer: true,
            symbol: None,
        }
    }

    /// `None` until the player's agent has requested a symbol.
    pub fn symbol(&self) -> Option<Symbol> {
        self.symbol
    }

    pub(crate) fn assign_symbol(&mut self, symbol: Symbol) {
        self.symbol = Some(symbol);
    }
}

/// Tally of finished games for one agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    pub won: usize,
    pub lost: usize,
    pub cat: usize,
}

impl Scorecard {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Won => self.won += 1,
            Outcome::Lost => self.lost += 1,
            Outcome::Cat => self.cat += 1,
        }
    }

    pub fn games(&self) -> usize {
        self.won + self.lost + self.cat
    }
}

impl fmt::Display for Scorecard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} won, {} lost, {} cat", self.won, self.lost, self.cat)
    }
}
