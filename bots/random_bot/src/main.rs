use clap::Parser;
use gridgame::{Board, SquareId, Symbol};
use gridgame_bot_utils::Bot;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

#[derive(Parser)]
struct Args {
    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let rng = StdRng::seed_from_u64(seed);

    RandomBot { rng }.run()
}

struct RandomBot {
    rng: StdRng,
}

impl Bot for RandomBot {
    fn take_symbol(&mut self, _symbol: Symbol) {}

    fn play_turn(&mut self, _board: Board, options: Vec<SquareId>) -> Option<SquareId> {
        options.choose(&mut self.rng).copied()
    }
}
