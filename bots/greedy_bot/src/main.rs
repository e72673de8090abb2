use clap::Parser;
use gridgame::{winning_moves, Board, GameConfig, SquareId, Symbol};
use gridgame_bot_utils::{blocking_moves, Bot};
use rand::rngs::StdRng;
use rand::{seq::SliceRandom, Rng, SeedableRng};

#[derive(Parser)]
struct Args {
    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Probability of playing a random option instead of a greedy one
    #[arg(long, default_value_t = 0.0)]
    discover: f64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let rng = StdRng::seed_from_u64(seed);

    GreedyBot::new(rng, args.discover).run()
}

/// Wins if it can, blocks if it must, and plays randomly otherwise.
struct GreedyBot {
    rng: StdRng,
    discover: f64,
    streak: usize,
    symbol: Option<Symbol>,
}

impl GreedyBot {
    fn new(rng: StdRng, discover: f64) -> Self {
        Self {
            rng,
            discover: discover.clamp(0.0, 1.0),
            streak: GameConfig::default().streak,
            symbol: None,
        }
    }

    fn best_square(&mut self, board: &Board, options: &[SquareId]) -> Option<SquareId> {
        let symbol = self.symbol?;
        let mut top_choices = winning_moves(board, self.streak, symbol, options);
        if top_choices.is_empty() {
            top_choices = blocking_moves(board, self.streak, symbol, options);
        }
        top_choices.choose(&mut self.rng).copied()
    }
}

impl Bot for GreedyBot {
    fn start(&mut self, _player_idx: usize, config: GameConfig) {
        self.streak = config.streak;
    }

    fn take_symbol(&mut self, symbol: Symbol) {
        self.symbol = Some(symbol);
    }

    fn play_turn(&mut self, board: Board, options: Vec<SquareId>) -> Option<SquareId> {
        if self.rng.gen::<f64>() >= self.discover {
            if let Some(square) = self.best_square(&board, &options) {
                return Some(square);
            }
        }
        options.choose(&mut self.rng).copied()
    }

    fn set_discover(&mut self, value: &str) {
        match value.trim().parse::<f64>() {
            Ok(discover) if (0.0..=1.0).contains(&discover) => self.discover = discover,
            _ => eprintln!("greedy_bot: ignoring discover value '{}'", value),
        }
    }
}
