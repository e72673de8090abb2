use std::io::{BufRead, Write};

use gridgame::{format_options, GameError, IllegalMove, Session, SquareId};

const HELP: &str = "Commands: x|y (play a square), new, pause, toggle, discover <value>, clear, quit";

/// Lets a person at the terminal play against, or watch, the agents of a
/// session. Reads one command per line until `quit` or end of input.
pub fn run_interactive(
    session: &mut Session,
    mut input: impl BufRead,
    mut output: impl Write,
) -> anyhow::Result<()> {
    writeln!(output, "{}", HELP)?;
    render(session, &mut output)?;
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let command = line.trim();
        let (word, rest) = command.split_once(' ').unwrap_or((command, ""));
        match word {
            "" => continue,
            "quit" | "q" => break,
            "new" => {
                if !session.reset()? {
                    writeln!(output, "Finish or pause the current game first")?;
                }
            }
            "pause" => session.toggle_play()?,
            "toggle" => session.toggle_computer()?,
            "discover" => session.set_discover(rest.trim())?,
            "clear" => session.clear_q()?,
            _ => match word.parse::<SquareId>() {
                Ok(square) => click(session, square, &mut output)?,
                Err(err) => writeln!(output, "{}. {}", err, HELP)?,
            },
        }
        render(session, &mut output)?;
    }
    Ok(())
}

fn click(session: &mut Session, square: SquareId, output: &mut impl Write) -> anyhow::Result<()> {
    match session.click_square(square) {
        Ok(true) => {}
        Ok(false) => writeln!(output, "It is not your turn")?,
        Err(err) => match err.downcast_ref::<IllegalMove>() {
            Some(illegal) => writeln!(output, "{}", illegal)?,
            None => match err.downcast_ref::<GameError>() {
                Some(GameError::IllegalMove {
                    player_idx,
                    err: illegal,
                }) => {
                    // An agent misbehaved in response to the click
                    writeln!(output, "Illegal move by player {}: {}", player_idx, illegal)?;
                    session.controller_mut().stop_play();
                }
                _ => return Err(err),
            },
        },
    }
    Ok(())
}

fn render(session: &Session, output: &mut impl Write) -> anyhow::Result<()> {
    let controller = session.controller();
    writeln!(output, "{}", controller.board())?;
    for (player_idx, label) in controller.scorecards() {
        writeln!(output, "  {}: {}", label, controller.results()[*player_idx])?;
    }
    if let Some(text) = controller.notification_text() {
        writeln!(output, "{}", text)?;
    } else if controller.is_playing() {
        let player = controller.current_player();
        let symbol = player
            .symbol()
            .map(|s| s.to_string())
            .unwrap_or_else(|| String::from("?"));
        writeln!(
            output,
            "{} ({}) to move: {}",
            player.name,
            symbol,
            format_options(&controller.options())
        )?;
    } else {
        writeln!(output, "Paused")?;
    }
    output.flush()?;
    Ok(())
}
