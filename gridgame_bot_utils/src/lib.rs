mod threats;
pub use threats::*;

use std::io::{BufRead, Write};

use gridgame::{Board, GameConfig, Notification, Outcome, Signal, SquareId, Symbol};

/// A trait to simplify writing bots.
///
/// Only move selection is mandatory. Requesting a symbol, answering turns and
/// the line-based JSON communication are taken care of by [`Bot::run()`].
pub trait Bot {
    fn start(&mut self, _player_idx: usize, _config: GameConfig) {}
    fn take_symbol(&mut self, symbol: Symbol);
    /// Picks one of the options. Returning `None` passes, which the judge
    /// will wait on forever, so only do that if there are no options.
    fn play_turn(&mut self, board: Board, options: Vec<SquareId>) -> Option<SquareId>;
    fn game_ended(&mut self, _outcome: Outcome) {}
    fn set_discover(&mut self, _value: &str) {}
    fn clear_q(&mut self) {}

    /// Computes the reply to one notification, or `None` if the bot should exit.
    fn respond(&mut self, notification: Notification) -> Option<Vec<Signal>> {
        let signals = match notification {
            Notification::Start {
                player_idx, config, ..
            } => {
                self.start(player_idx, config);
                vec![Signal::RequestSymbol]
            }
            Notification::TakeSymbol { symbol } => {
                self.take_symbol(symbol);
                vec![]
            }
            Notification::YourTurn { board, options } => self
                .play_turn(board, options)
                .map(|square| Signal::SelectSquare { square })
                .into_iter()
                .collect(),
            Notification::YouWon => {
                self.game_ended(Outcome::Won);
                vec![]
            }
            Notification::YouLose => {
                self.game_ended(Outcome::Lost);
                vec![]
            }
            Notification::Cat => {
                self.game_ended(Outcome::Cat);
                vec![]
            }
            Notification::SetDiscover { value } => {
                self.set_discover(&value);
                vec![]
            }
            Notification::ClearQ => {
                self.clear_q();
                vec![]
            }
            // Bots are always automated
            Notification::ToggleComputer => vec![],
            Notification::Bye => return None,
        };
        Some(signals)
    }

    fn run(&mut self) -> anyhow::Result<()> {
        // Communication happens through stdin/stdout.
        // Stderr can be used for logging.
        let stdin = std::io::stdin().lock();
        let stdout = std::io::stdout().lock();
        self.run_with(stdin, stdout)
    }

    /// Answers one JSON notification per line with one JSON array of signals
    /// per line, until EOF or [`Notification::Bye`].
    fn run_with(&mut self, mut reader: impl BufRead, mut writer: impl Write) -> anyhow::Result<()> {
        let mut buf = String::new();

        loop {
            // Read the next line into buf
            buf.clear(); // because read_line() appends to the buffer
            let num_bytes_read = reader.read_line(&mut buf)?;
            if num_bytes_read == 0 {
                // 0 bytes read means EOF - the judge has exited.
                break Ok(());
            }

            let notification = serde_json::from_str::<Notification>(buf.trim_end())?;
            let Some(signals) = self.respond(notification) else {
                break Ok(());
            };
            serde_json::to_writer(&mut writer, &signals)?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }
}
