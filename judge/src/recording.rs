use std::cell::RefCell;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::rc::Rc;

use gridgame::{Agent, Notification, Player, Signal};
use serde::{Deserialize, Serialize};

/// Collects the exchanges of one game and writes them to a numbered JSON file.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
    exchanges: Vec<Exchange>,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            num: 1,
            directory,
            exchanges: Vec::new(),
        })
    }

    pub fn store_exchange(&mut self, player: &str, notification: &Notification, signals: &[Signal]) {
        self.exchanges.push(Exchange {
            player: String::from(player),
            notification: notification.clone(),
            signals: signals.to_vec(),
        });
    }

    /// Writes `game_000001.json`, `game_000002.json`, ... and starts over
    /// with an empty recording.
    pub fn write_game_recording(&mut self) -> anyhow::Result<PathBuf> {
        let filepath = self.directory.join(format!("game_{:0>6}.json", self.num));
        let writer = BufWriter::new(File::create(&filepath)?);
        serde_json::to_writer_pretty(writer, &std::mem::take(&mut self.exchanges))?;
        self.num += 1;
        Ok(filepath)
    }
}

/// One notification and the signals the agent answered with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub player: String,
    pub notification: Notification,
    pub signals: Vec<Signal>,
}

/// Passes everything through to the wrapped agent and records it.
pub struct RecordingAgent {
    inner: Box<dyn Agent>,
    name: String,
    recorder: Rc<RefCell<Recorder>>,
}

impl RecordingAgent {
    pub fn new(inner: Box<dyn Agent>, recorder: Rc<RefCell<Recorder>>) -> Self {
        let name = inner.player().name;
        Self {
            inner,
            name,
            recorder,
        }
    }
}

impl Agent for RecordingAgent {
    fn player(&self) -> Player {
        self.inner.player()
    }

    fn notify(&mut self, notification: &Notification) -> anyhow::Result<Vec<Signal>> {
        let signals = self.inner.notify(notification)?;
        self.recorder
            .borrow_mut()
            .store_exchange(&self.name, notification, &signals);
        Ok(signals)
    }
}
