use anyhow::Context;
use rand::rngs::StdRng;
use tracing::trace;

use crate::{
    Agent, ConfigurationError, GameConfig, GameController, LocalAgent, Signal, SquareId,
    SymbolPool,
};

/// Connects a [`GameController`] with one agent per player.
///
/// All work happens in [`Self::pump()`]: queued notifications are delivered
/// one at a time, and each agent's reply is handed to the controller before
/// the next notification goes out. The other methods are the inputs a
/// renderer forwards, each followed by a pump.
pub struct Session {
    controller: GameController,
    agents: Vec<Box<dyn Agent>>,
}

impl Session {
    /// Builds the roster from the agents, adding human [`LocalAgent`]s if
    /// there are fewer than two, and delivers the setup notifications.
    pub fn new(
        config: GameConfig,
        mut agents: Vec<Box<dyn Agent>>,
        pool: SymbolPool,
        rng: StdRng,
    ) -> anyhow::Result<Self> {
        let players = agents.iter().map(|agent| agent.player()).collect();
        let controller = GameController::new(config, players, pool, rng)?;
        for player in &controller.players()[agents.len()..] {
            agents.push(Box::new(LocalAgent::human(&player.name)));
        }
        let mut session = Self::from_parts(controller, agents)?;
        session.pump()?;
        Ok(session)
    }

    /// Pairs an existing controller with agents, by index. Does not pump.
    pub fn from_parts(
        controller: GameController,
        agents: Vec<Box<dyn Agent>>,
    ) -> Result<Self, ConfigurationError> {
        if agents.len() != controller.players().len() {
            return Err(ConfigurationError::AgentCountMismatch {
                agents: agents.len(),
                players: controller.players().len(),
            });
        }
        Ok(Self { controller, agents })
    }

    /// Delivers notifications until none are left.
    ///
    /// Stops at the first error. An illegal move is returned as a
    /// [`GameError`](crate::GameError) inside the [`anyhow::Error`].
    pub fn pump(&mut self) -> anyhow::Result<()> {
        while let Some((player_idx, notification)) = self.controller.pop_notification() {
            let agent = &mut self.agents[player_idx];
            let signals = agent.notify(&notification).with_context(|| {
                format!("Agent {} failed to handle {:?}", player_idx, notification)
            })?;
            for signal in signals {
                trace!(player_idx, ?signal, "Signal from agent");
                self.controller.handle_signal(player_idx, signal)?;
            }
        }
        Ok(())
    }

    /// Forwards a signal as if the agent had sent it.
    pub fn signal(&mut self, player_idx: usize, signal: Signal) -> anyhow::Result<()> {
        self.controller.handle_signal(player_idx, signal)?;
        self.pump()
    }

    /// Returns whether the click was taken, see [`GameController::click_square()`].
    pub fn click_square(&mut self, square: SquareId) -> anyhow::Result<bool> {
        let taken = self.controller.click_square(square)?;
        self.pump()?;
        Ok(taken)
    }

    pub fn reset(&mut self) -> anyhow::Result<bool> {
        let started = self.controller.reset();
        self.pump()?;
        Ok(started)
    }

    pub fn toggle_play(&mut self) -> anyhow::Result<()> {
        self.controller.toggle_play();
        self.pump()
    }

    pub fn toggle_computer(&mut self) -> anyhow::Result<()> {
        self.controller.toggle_computer();
        self.pump()
    }

    pub fn set_discover(&mut self, value: &str) -> anyhow::Result<()> {
        self.controller.set_discover(value);
        self.pump()
    }

    pub fn clear_q(&mut self) -> anyhow::Result<()> {
        self.controller.clear_q();
        self.pump()
    }

    /// Sends [`Notification::Bye`](crate::Notification::Bye) to every agent and gives the controller back.
    pub fn finish(mut self) -> anyhow::Result<GameController> {
        self.controller.say_goodbye();
        self.pump()?;
        Ok(self.controller)
    }

    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    /// For hosts that recover from an illegal move, e.g. by pausing and resetting.
    pub fn controller_mut(&mut self) -> &mut GameController {
        &mut self.controller
    }

    pub fn agents(&self) -> &[Box<dyn Agent>] {
        &self.agents
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.controller.status())
            .field("agents", &self.agents.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use rand::SeedableRng;

    use super::*;
    use crate::{check_for_win, GameError, GameStatus, IllegalMove, Notification, Player};

    type Log = Rc<RefCell<Vec<Notification>>>;

    /// Plays a fixed list of squares and records what it was told.
    struct ScriptedAgent {
        name: &'static str,
        moves: VecDeque<SquareId>,
        log: Log,
    }

    impl ScriptedAgent {
        fn new(name: &'static str, moves: &[(usize, usize)]) -> (Self, Log) {
            let log = Log::default();
            let agent = Self {
                name,
                moves: moves.iter().map(|&(x, y)| SquareId::new(x, y)).collect(),
                log: log.clone(),
            };
            (agent, log)
        }
    }

    impl Agent for ScriptedAgent {
        fn player(&self) -> Player {
            Player::computer(self.name)
        }

        fn notify(&mut self, notification: &Notification) -> anyhow::Result<Vec<Signal>> {
            self.log.borrow_mut().push(notification.clone());
            Ok(match notification {
                Notification::Start { .. } => vec![Signal::RequestSymbol],
                Notification::YourTurn { .. } => self
                    .moves
                    .pop_front()
                    .map(|square| Signal::SelectSquare { square })
                    .into_iter()
                    .collect(),
                _ => vec![],
            })
        }
    }

    fn session(config: GameConfig, agents: Vec<Box<dyn Agent>>) -> anyhow::Result<Session> {
        Session::new(
            config,
            agents,
            SymbolPool::from_seed(5),
            StdRng::seed_from_u64(6),
        )
    }

    fn outcomes(log: &Log) -> Vec<Notification> {
        log.borrow()
            .iter()
            .filter(|n| n.outcome().is_some())
            .cloned()
            .collect()
    }

    #[test]
    fn scripted_diagonal_win() {
        let (a, a_log) = ScriptedAgent::new("a", &[(0, 0), (1, 1), (2, 2)]);
        let (b, b_log) = ScriptedAgent::new("b", &[(1, 0), (2, 0)]);
        let session = session(GameConfig::default(), vec![Box::new(a), Box::new(b)]).unwrap();

        let controller = session.controller();
        let a_symbol = controller.players()[0].symbol().unwrap();
        assert_eq!(check_for_win(controller.board(), 3), Some(a_symbol));
        assert_eq!(controller.status(), GameStatus::Won { player_idx: 0 });
        assert_eq!(outcomes(&a_log), [Notification::YouWon]);
        assert_eq!(outcomes(&b_log), [Notification::YouLose]);
        assert!(a_log.borrow().contains(&Notification::TakeSymbol { symbol: a_symbol }));
    }

    #[test]
    fn scripted_draw_is_announced_once() {
        let (a, a_log) = ScriptedAgent::new("a", &[(0, 0), (2, 0), (0, 1), (1, 2), (2, 2)]);
        let (b, b_log) = ScriptedAgent::new("b", &[(1, 0), (1, 1), (2, 1), (0, 2)]);
        let session = session(GameConfig::default(), vec![Box::new(a), Box::new(b)]).unwrap();
        assert_eq!(session.controller().status(), GameStatus::Draw);
        assert_eq!(outcomes(&a_log), [Notification::Cat]);
        assert_eq!(outcomes(&b_log), [Notification::Cat]);
    }

    #[test]
    fn illegal_move_is_fatal_and_leaves_board_unchanged() {
        let (a, _) = ScriptedAgent::new("a", &[(1, 1)]);
        let (b, _) = ScriptedAgent::new("b", &[(1, 1)]);
        let err = session(GameConfig::default(), vec![Box::new(a), Box::new(b)]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<GameError>(),
            Some(&GameError::IllegalMove {
                player_idx: 1,
                err: IllegalMove::SquareTaken {
                    square: SquareId::new(1, 1)
                }
            })
        );
    }

    #[test]
    fn move_out_of_turn_is_rejected() {
        let (a, _) = ScriptedAgent::new("a", &[]);
        let (b, _) = ScriptedAgent::new("b", &[]);
        let mut session = session(GameConfig::default(), vec![Box::new(a), Box::new(b)]).unwrap();
        let before = session.controller().board().clone();
        let err = session
            .signal(
                1,
                Signal::SelectSquare {
                    square: SquareId::new(0, 0),
                },
            )
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GameError>(),
            Some(GameError::IllegalMove {
                err: IllegalMove::NotCurrentPlayer { .. },
                ..
            })
        ));
        assert_eq!(session.controller().board(), &before);
    }

    #[test]
    fn default_agents_are_humans_driven_by_clicks() {
        let mut session = session(GameConfig::default(), vec![]).unwrap();
        assert_eq!(session.agents().len(), 2);
        assert!(session.controller().players().iter().all(|p| !p.computer));
        assert!(session.controller().players().iter().all(|p| p.symbol().is_some()));
        assert_eq!(
            session.controller().scorecards(),
            [(0, String::from("Player 1")), (1, String::from("Player 2"))]
        );

        for (x, y) in [(0, 0), (0, 1), (1, 0), (1, 1), (2, 0)] {
            assert!(session.click_square(SquareId::new(x, y)).unwrap());
        }
        assert_eq!(session.controller().status(), GameStatus::Won { player_idx: 0 });
        assert_eq!(session.controller().notification_text(), Some("Player 1 won!"));
        assert!(session.reset().unwrap());
        assert!(session.controller().is_playing());
    }

    #[test]
    fn computer_answers_within_the_same_pump() {
        let computer = LocalAgent::computer("cpu", StdRng::seed_from_u64(9));
        let human = LocalAgent::human("me");
        let mut session = session(
            GameConfig::default(),
            vec![Box::new(human), Box::new(computer)],
        )
        .unwrap();
        session.click_square(SquareId::new(1, 1)).unwrap();
        // The computer has already replied
        let occupied = session
            .controller()
            .squares()
            .values()
            .filter(|s| s.value().is_some())
            .count();
        assert_eq!(occupied, 2);
        assert_eq!(session.controller().current_player_idx(), 0);
    }

    #[test]
    fn late_symbol_request_is_ignored() {
        let (a, a_log) = ScriptedAgent::new("a", &[]);
        let (b, _) = ScriptedAgent::new("b", &[]);
        let mut session = session(GameConfig::default(), vec![Box::new(a), Box::new(b)]).unwrap();
        let symbol = session.controller().players()[0].symbol();
        session.signal(0, Signal::RequestSymbol).unwrap();
        assert_eq!(session.controller().players()[0].symbol(), symbol);
        let take_symbols = a_log
            .borrow()
            .iter()
            .filter(|n| matches!(n, Notification::TakeSymbol { .. }))
            .count();
        assert_eq!(take_symbols, 1);
    }

    #[test]
    fn finish_says_bye() {
        let (a, a_log) = ScriptedAgent::new("a", &[]);
        let session = session(GameConfig::default(), vec![Box::new(a)]).unwrap();
        let controller = session.finish().unwrap();
        assert!(!controller.is_playing());
        assert_eq!(a_log.borrow().last(), Some(&Notification::Bye));
    }

    #[test]
    fn symbol_arrives_before_the_first_turn() {
        let (a, a_log) = ScriptedAgent::new("a", &[]);
        let (b, b_log) = ScriptedAgent::new("b", &[]);
        let _session = session(GameConfig::default(), vec![Box::new(a), Box::new(b)]).unwrap();
        let a_log = a_log.borrow();
        assert!(matches!(
            a_log.as_slice(),
            [
                Notification::Start { .. },
                Notification::TakeSymbol { .. },
                Notification::YourTurn { .. }
            ]
        ));
        assert!(matches!(
            b_log.borrow().as_slice(),
            [Notification::Start { .. }, Notification::TakeSymbol { .. }]
        ));
    }

    /// Switches everyone to automated play right at the start, then always
    /// takes the first option.
    struct Toggler;

    impl Agent for Toggler {
        fn player(&self) -> Player {
            Player::computer("toggler")
        }

        fn notify(&mut self, notification: &Notification) -> anyhow::Result<Vec<Signal>> {
            Ok(match notification {
                Notification::Start { .. } => vec![Signal::RequestSymbol, Signal::ToggleComputer],
                Notification::YourTurn { options, .. } => options
                    .first()
                    .map(|&square| Signal::SelectSquare { square })
                    .into_iter()
                    .collect(),
                _ => vec![],
            })
        }
    }

    #[test]
    fn control_signals_do_not_duplicate_turns() {
        let (b, _) = ScriptedAgent::new("b", &[]);
        let agents: Vec<Box<dyn Agent>> = vec![Box::new(Toggler), Box::new(b)];
        let mut session = session(GameConfig::default(), agents).unwrap();
        // Toggler moved once, now it is b's turn
        assert_eq!(session.controller().current_player_idx(), 1);
        let occupied = session.controller().board().rows().iter().flatten().flatten().count();
        assert_eq!(occupied, 1);

        session.toggle_play().unwrap();
        session.toggle_play().unwrap();
        session.toggle_computer().unwrap();
        let square = SquareId::new(0, 0);
        session.signal(1, Signal::SelectSquare { square }).unwrap();
        let occupied = session.controller().board().rows().iter().flatten().flatten().count();
        assert_eq!(occupied, 3);
        assert_eq!(session.controller().current_player_idx(), 1);
    }

    #[test]
    fn automated_agents_play_through_a_toggle() {
        let agents: Vec<Box<dyn Agent>> = vec![Box::new(Toggler), Box::new(Toggler)];
        let players = vec![Player::computer("t1"), Player::computer("t2")];
        let controller = GameController::new(
            GameConfig::default(),
            players,
            SymbolPool::from_seed(8),
            StdRng::seed_from_u64(8),
        )
        .unwrap();
        let mut session = Session::from_parts(controller, agents).unwrap();
        session.pump().unwrap();
        assert!(!session.controller().is_playing());
    }
}
