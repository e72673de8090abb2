use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use anyhow::Context;
use gridgame::{Agent, Notification, Player, Signal};
use serde::Deserialize;
use tracing::trace;

/// How to launch a bot, read from a JSON file.
#[derive(Clone, Debug, Deserialize)]
pub struct PlayerConfig {
    /// Display name, must be unique among the players of a game.
    pub nick: String,
    /// The executable followed by its arguments.
    pub cmd: Vec<String>,
}

impl PlayerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Could not open player config '{}'", path.display()))?;
        let config: PlayerConfig = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Could not parse player config '{}'", path.display()))?;
        if config.cmd.is_empty() {
            anyhow::bail!("Player config '{}' has an empty cmd", path.display());
        }
        Ok(config)
    }
}

/// A bot running as a child process, speaking line-delimited JSON.
pub struct ProcessAgent {
    pub name: String,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    // A re-usable buffer for IO.
    // Should always be empty before and after notify().
    buf: String,
}

impl ProcessAgent {
    pub fn new(name: &str, program: &str, args: &[String]) -> anyhow::Result<Self> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("Could not start '{}'", program))?;

        let stdin = child.stdin.take().context("Could not access stdin")?;
        let stdout = child.stdout.take().context("Could not access stdout")?;
        Ok(Self {
            name: String::from(name),
            child,
            stdin,
            stdout: BufReader::new(stdout),
            buf: String::new(),
        })
    }

    pub fn from_config(config: &PlayerConfig) -> anyhow::Result<Self> {
        let (program, args) = config
            .cmd
            .split_first()
            .context("Player config has an empty cmd")?;
        Self::new(&config.nick, program, args)
    }
}

impl Agent for ProcessAgent {
    fn player(&self) -> Player {
        Player::computer(&self.name)
    }

    fn notify(&mut self, notification: &Notification) -> anyhow::Result<Vec<Signal>> {
        let mut notification_json = serde_json::to_string(notification)?;
        trace!(name: "Sending notification", player = &self.name, notification = %notification_json);
        notification_json.push('\n');
        self.stdin.write_all(notification_json.as_bytes())?;
        self.stdin.flush()?;
        if *notification == Notification::Bye {
            // Bots exit without answering
            return Ok(vec![]);
        }

        self.buf.clear();
        let num_bytes_read = self.stdout.read_line(&mut self.buf)?;
        if num_bytes_read == 0 {
            anyhow::bail!("Player {} exited unexpectedly", self.name);
        }
        let serialized_response = self.buf.trim_end();
        let signals = serde_json::from_str::<Vec<Signal>>(serialized_response)
            .with_context(|| format!("Invalid response from {}: {}", self.name, serialized_response))?;
        trace!(name: "Received response", player = &self.name, response = %serialized_response);
        self.buf.clear();
        Ok(signals)
    }
}

impl Drop for ProcessAgent {
    fn drop(&mut self) {
        // The bot has normally exited after Bye already
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use gridgame::{GameConfig, SquareId};

    use super::*;

    fn shell_agent(script: &str) -> ProcessAgent {
        let args = [String::from("-c"), String::from(script)];
        ProcessAgent::new("sh", "sh", &args).unwrap()
    }

    #[test]
    fn exchanges_json_lines() {
        let mut agent = shell_agent(
            r#"read line; echo '[{"type":"request_symbol"}]'; read line; echo '[{"type":"select_square","square":"0|2"}]'"#,
        );
        let start = Notification::Start {
            player_idx: 0,
            name: String::from("sh"),
            config: GameConfig::default(),
        };
        assert_eq!(agent.notify(&start).unwrap(), [Signal::RequestSymbol]);
        assert_eq!(
            agent.notify(&Notification::Cat).unwrap(),
            [Signal::SelectSquare {
                square: SquareId::new(0, 2)
            }]
        );
        assert!(agent.notify(&Notification::Cat).is_err());
    }

    #[test]
    fn garbage_response_is_an_error() {
        let mut agent = shell_agent("read line; echo nonsense");
        assert!(agent.notify(&Notification::ClearQ).is_err());
    }
}
