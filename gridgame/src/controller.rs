use std::collections::{BTreeMap, VecDeque};

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, trace};

use crate::{
    check_for_cat, check_for_win, create_squares, get_options, Board, ConfigurationError,
    GameConfig, GameError, IllegalMove, Notification, Outcome, Player, Scorecard, Signal, Square,
    SquareId, Symbol, SymbolPool,
};

/// Where a game is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// Stopped by [`GameController::stop_play()`], can be resumed.
    Paused,
    Won { player_idx: usize },
    Draw,
}

/// What happens after a move, in order of precedence.
enum TurnDecision {
    Won { player_idx: usize },
    Draw,
    Continue,
}

/// Runs games on one board for a fixed roster of players.
///
/// The controller never calls agents directly. Everything it has to tell
/// them is queued as `(player_idx, Notification)` pairs, to be fetched with
/// [`Self::pop_notification()`] and delivered by the host (see
/// [`Session`](crate::Session)). Agents answer by calling back into the
/// controller, most importantly through [`Self::select_square()`].
pub struct GameController {
    config: GameConfig,
    players: Vec<Player>,
    /// Symbols drawn for each player at setup, handed out on request.
    symbols: Vec<Symbol>,
    /// Whether a player's symbol request has been served. Only the first one is.
    symbol_requested: Vec<bool>,
    scorecards: Vec<(usize, String)>,
    results: Vec<Scorecard>,
    rng: StdRng,
    board: Board,
    squares: BTreeMap<SquareId, Square>,
    current_idx: usize,
    status: GameStatus,
    outbox: VecDeque<(usize, Notification)>,
    notification_text: Option<String>,
}

impl GameController {
    /// Validates the configuration, sets up the board and starts the first game.
    ///
    /// If fewer than two players are given, human players are added. One
    /// symbol per player is drawn from `pool` right away, so a roster the pool
    /// cannot serve is rejected here. The first player gets the first turn.
    /// Every player is sent a [`Notification::Start`] before the first
    /// [`Notification::YourTurn`].
    pub fn new(
        config: GameConfig,
        players: Vec<Player>,
        mut pool: SymbolPool,
        rng: StdRng,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let players = fill_roster(players);
        for (idx, player) in players.iter().enumerate() {
            if players[..idx].iter().any(|p| p.name == player.name) {
                return Err(ConfigurationError::DuplicatePlayerName {
                    name: player.name.clone(),
                });
            }
        }
        let symbols_left = pool.remaining();
        let symbols = (0..players.len())
            .map(|_| pool.draw())
            .collect::<Result<Vec<Symbol>, _>>()
            .map_err(|_| ConfigurationError::TooManyPlayers {
                players: players.len(),
                symbols_left,
            })?;

        let board = Board::new(config.grid_size);
        let squares = create_squares(&board);
        let mut controller = Self {
            config,
            symbols,
            symbol_requested: vec![false; players.len()],
            results: vec![Scorecard::default(); players.len()],
            players,
            scorecards: Vec::new(),
            rng,
            board,
            squares,
            current_idx: 0,
            status: GameStatus::Paused,
            outbox: VecDeque::new(),
            notification_text: None,
        };
        controller.start();
        Ok(controller)
    }

    fn start(&mut self) {
        self.status = GameStatus::Playing;
        for (player_idx, player) in self.players.iter().enumerate() {
            self.outbox.push_back((
                player_idx,
                Notification::Start {
                    player_idx,
                    name: player.name.clone(),
                    config: self.config.clone(),
                },
            ));
        }
        debug!(
            grid_size = self.config.grid_size,
            streak = self.config.streak,
            gravity = self.config.gravity,
            players = self.players.len(),
            "Game set up"
        );
        self.announce_turn();
    }

    /// Starts a new game with a random player, unless a game is in progress.
    ///
    /// Returns whether a new game was started. The board is cleared, but
    /// players keep their symbols. Turn announcements that have not been
    /// delivered yet are dropped, since they show the old board.
    pub fn reset(&mut self) -> bool {
        if self.is_playing() {
            debug!("Ignoring reset during a game");
            return false;
        }
        self.notification_text = None;
        self.drop_pending_turns();
        self.board = Board::new(self.config.grid_size);
        self.squares = create_squares(&self.board);
        self.current_idx = self.rng.gen_range(0..self.players.len());
        self.status = GameStatus::Playing;
        debug!(current_idx = self.current_idx, "Game reset");
        self.next_turn();
        true
    }

    /// Plays the current player's symbol on `square`.
    ///
    /// Nothing is changed if the move is rejected.
    pub fn select_square(&mut self, player_idx: usize, square: SquareId) -> Result<(), IllegalMove> {
        let symbol = self.validate_move(player_idx, square)?;
        if let Some(target) = self.squares.get_mut(&square) {
            target.set_value(Some(symbol));
        }
        self.update_board();
        debug!(player_idx, %square, %symbol, "Square selected");
        self.next_turn();
        Ok(())
    }

    fn validate_move(&self, player_idx: usize, square: SquareId) -> Result<Symbol, IllegalMove> {
        let player = self
            .players
            .get(player_idx)
            .ok_or(IllegalMove::UnknownPlayer { player_idx })?;
        if !self.is_playing() {
            return Err(IllegalMove::GameNotInProgress);
        }
        if player_idx != self.current_idx {
            return Err(IllegalMove::NotCurrentPlayer {
                player_idx,
                current_idx: self.current_idx,
            });
        }
        let target = self
            .squares
            .get(&square)
            .ok_or(IllegalMove::UnknownSquare { square })?;
        if target.value().is_some() {
            return Err(IllegalMove::SquareTaken { square });
        }
        if !get_options(&self.board, self.config.gravity).contains(&square) {
            return Err(IllegalMove::NotAnOption { square });
        }
        player
            .symbol()
            .ok_or(IllegalMove::NoSymbolAssigned { player_idx })
    }

    /// The UI path for a move: selects `square` for the current player.
    ///
    /// Clicks are ignored while an automated player is on turn, in which
    /// case `Ok(false)` is returned.
    pub fn click_square(&mut self, square: SquareId) -> Result<bool, IllegalMove> {
        if self.current_player().computer {
            debug!(%square, "Ignoring click, an automated player is on turn");
            return Ok(false);
        }
        self.select_square(self.current_idx, square)?;
        Ok(true)
    }

    /// Copies the square values into the board.
    fn update_board(&mut self) {
        for square in self.squares.values() {
            self.board.set(square.id(), square.value());
        }
    }

    /// Ends the game if it is won or drawn, else hands the turn to the next player.
    ///
    /// Does nothing unless a game is in progress.
    pub fn next_turn(&mut self) {
        if !self.is_playing() {
            return;
        }
        match self.decide_turn() {
            TurnDecision::Won { player_idx } => {
                self.drop_pending_turns();
                self.status = GameStatus::Won { player_idx };
                self.notification_text = Some(format!("{} won!", self.players[player_idx].name));
                debug!(winner = self.players[player_idx].name, "Game won");
                for idx in 0..self.players.len() {
                    let notification = if idx == player_idx {
                        Notification::YouWon
                    } else {
                        Notification::YouLose
                    };
                    if let Some(outcome) = notification.outcome() {
                        self.results[idx].record(outcome);
                    }
                    self.outbox.push_back((idx, notification));
                }
            }
            TurnDecision::Draw => {
                self.drop_pending_turns();
                self.status = GameStatus::Draw;
                self.notification_text = Some(String::from("CAT!"));
                debug!("Game drawn");
                for idx in 0..self.players.len() {
                    self.results[idx].record(Outcome::Cat);
                    self.outbox.push_back((idx, Notification::Cat));
                }
            }
            TurnDecision::Continue => {
                self.current_idx = (self.current_idx + 1) % self.players.len();
                self.announce_turn();
            }
        }
    }

    /// A win takes precedence over a full board.
    fn decide_turn(&self) -> TurnDecision {
        let winner = check_for_win(&self.board, self.config.streak)
            .and_then(|symbol| self.player_by_symbol(symbol));
        if let Some(player_idx) = winner {
            return TurnDecision::Won { player_idx };
        }
        if check_for_cat(&self.board, self.config.streak) {
            return TurnDecision::Draw;
        }
        TurnDecision::Continue
    }

    /// At most one turn announcement is pending at any time, for the
    /// current board and player.
    fn announce_turn(&mut self) {
        self.drop_pending_turns();
        let options = get_options(&self.board, self.config.gravity);
        trace!(current_idx = self.current_idx, options = options.len(), "Announcing turn");
        self.outbox.push_back((
            self.current_idx,
            Notification::YourTurn {
                board: self.board.clone(),
                options,
            },
        ));
    }

    fn drop_pending_turns(&mut self) {
        self.outbox
            .retain(|(_, n)| !matches!(n, Notification::YourTurn { .. }));
    }

    /// Assigns the player's symbol.
    ///
    /// Only the first request of each player is served, later ones return
    /// `Ok(None)`. The symbol is also sent as [`Notification::TakeSymbol`],
    /// ahead of a turn announcement for that player that is still pending.
    pub fn request_symbol(&mut self, player_idx: usize) -> Result<Option<Symbol>, GameError> {
        match self.symbol_requested.get(player_idx) {
            None => return Err(GameError::UnknownPlayer { player_idx }),
            Some(true) => {
                debug!(player_idx, "Ignoring repeated symbol request");
                return Ok(None);
            }
            Some(false) => {}
        }
        let symbol = self.symbols[player_idx];
        self.symbol_requested[player_idx] = true;
        self.players[player_idx].assign_symbol(symbol);
        let notification = (player_idx, Notification::TakeSymbol { symbol });
        let pending_turn = self.outbox.iter().position(|(idx, n)| {
            *idx == player_idx && matches!(n, Notification::YourTurn { .. })
        });
        match pending_turn {
            Some(pos) => self.outbox.insert(pos, notification),
            None => self.outbox.push_back(notification),
        }
        debug!(player_idx, %symbol, "Symbol assigned");
        Ok(Some(symbol))
    }

    /// Stores a label for the renderer's score area, once per player.
    pub fn insert_scorecard(&mut self, player_idx: usize, label: String) -> Result<(), GameError> {
        if player_idx >= self.players.len() {
            return Err(GameError::UnknownPlayer { player_idx });
        }
        if self.scorecards.iter().any(|(idx, _)| *idx == player_idx) {
            debug!(player_idx, "Ignoring repeated scorecard");
        } else {
            self.scorecards.push((player_idx, label));
        }
        Ok(())
    }

    /// Pauses a game in progress, or resumes a paused one.
    ///
    /// Finished games stay finished, see [`Self::reset()`].
    pub fn toggle_play(&mut self) {
        match self.status {
            GameStatus::Playing => self.stop_play(),
            GameStatus::Paused => {
                self.status = GameStatus::Playing;
                self.announce_turn();
            }
            GameStatus::Won { .. } | GameStatus::Draw => {}
        }
    }

    pub fn stop_play(&mut self) {
        if self.is_playing() {
            debug!("Game paused");
            self.status = GameStatus::Paused;
        }
    }

    /// Switches every player between human-driven and automated play.
    pub fn toggle_computer(&mut self) {
        for (idx, player) in self.players.iter_mut().enumerate() {
            player.computer = !player.computer;
            self.outbox.push_back((idx, Notification::ToggleComputer));
        }
        if self.is_playing() {
            self.announce_turn();
        }
    }

    pub fn set_discover(&mut self, value: &str) {
        for idx in 0..self.players.len() {
            self.outbox.push_back((
                idx,
                Notification::SetDiscover {
                    value: String::from(value),
                },
            ));
        }
    }

    /// Tells the automated players to forget what they learned.
    pub fn clear_q(&mut self) {
        for (idx, player) in self.players.iter().enumerate() {
            if player.computer {
                self.outbox.push_back((idx, Notification::ClearQ));
            }
        }
    }

    /// Sends [`Notification::Bye`] to every player.
    pub fn say_goodbye(&mut self) {
        self.stop_play();
        for idx in 0..self.players.len() {
            self.outbox.push_back((idx, Notification::Bye));
        }
    }

    /// Acts on a signal sent by an agent.
    pub fn handle_signal(&mut self, player_idx: usize, signal: Signal) -> Result<(), GameError> {
        if player_idx >= self.players.len() {
            return Err(GameError::UnknownPlayer { player_idx });
        }
        trace!(player_idx, ?signal, "Handling signal");
        match signal {
            Signal::SelectSquare { square } => self
                .select_square(player_idx, square)
                .map_err(|err| GameError::IllegalMove { player_idx, err })?,
            Signal::RequestSymbol => {
                self.request_symbol(player_idx)?;
            }
            Signal::NewGame => {
                self.reset();
            }
            Signal::InsertScorecard { label } => self.insert_scorecard(player_idx, label)?,
            Signal::SetDiscover { value } => self.set_discover(&value),
            Signal::ClearQ => self.clear_q(),
            Signal::ToggleComputer => self.toggle_computer(),
        }
        Ok(())
    }

    pub fn pop_notification(&mut self) -> Option<(usize, Notification)> {
        self.outbox.pop_front()
    }

    pub fn player_by_symbol(&self, symbol: Symbol) -> Option<usize> {
        self.players.iter().position(|p| p.symbol() == Some(symbol))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn squares(&self) -> &BTreeMap<SquareId, Square> {
        &self.squares
    }

    /// The legal moves right now.
    pub fn options(&self) -> Vec<SquareId> {
        get_options(&self.board, self.config.gravity)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn current_player_idx(&self) -> usize {
        self.current_idx
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_idx]
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// `"{name} won!"` or `"CAT!"` once a game has ended.
    pub fn notification_text(&self) -> Option<&str> {
        self.notification_text.as_deref()
    }

    /// Scorecard labels in the order they were inserted.
    pub fn scorecards(&self) -> &[(usize, String)] {
        &self.scorecards
    }

    /// Finished games per player, indexed like [`Self::players()`].
    pub fn results(&self) -> &[Scorecard] {
        &self.results
    }
}

/// Pads the roster with human players up to two.
fn fill_roster(mut players: Vec<Player>) -> Vec<Player> {
    let mut n = 1;
    while players.len() < 2 {
        let name = format!("Player {}", n);
        if !players.iter().any(|p| p.name == name) {
            players.push(Player::human(&name));
        }
        n += 1;
    }
    players
}
