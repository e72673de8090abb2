use gridgame::{GameError, GameStatus, IllegalMove, Session};
use tracing::debug;

#[derive(Debug, PartialEq, Eq)]
pub enum GameResult {
    WonByPlayer { player_idx: usize },
    Tie,
    IllegalMoveByPlayer { player_idx: usize, err: IllegalMove },
}

/// Plays one game to the end. A game that is over or paused is reset first.
///
/// Returns an error only on communication failure, not when an
/// illegal move is played. After an illegal move the game is paused, so the
/// next call starts a fresh one.
pub fn play_game(session: &mut Session) -> anyhow::Result<GameResult> {
    if !session.controller().is_playing() {
        session.controller_mut().reset();
    }

    if let Err(err) = session.pump() {
        return match err.downcast::<GameError>() {
            Ok(GameError::IllegalMove { player_idx, err }) => {
                session.controller_mut().stop_play();
                Ok(GameResult::IllegalMoveByPlayer { player_idx, err })
            }
            Ok(game_err) => Err(game_err.into()),
            Err(err) => Err(err),
        };
    }

    match session.controller().status() {
        GameStatus::Won { player_idx } => Ok(GameResult::WonByPlayer { player_idx }),
        GameStatus::Draw => Ok(GameResult::Tie),
        status => {
            debug!(?status, "Nobody answered the turn announcement");
            session.controller_mut().stop_play();
            anyhow::bail!("The game stalled, is every player automated?")
        }
    }
}
