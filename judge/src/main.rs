use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use gridgame::{Agent, GameConfig, GameController, LocalAgent, Session, SymbolPool};
use judge::{
    play_game, run_interactive, GameResult, PlayerConfig, ProcessAgent, Recorder, RecordingAgent,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Path to the config JSON files of players
    #[clap(num_args(0..), value_delimiter = ' ')]
    player_configs: Vec<PathBuf>,

    /// How many built-in computer players to add
    #[arg(short, long, default_value_t = 0)]
    computers: usize,

    /// Path to a JSON file with the game settings
    #[arg(long)]
    game_config: Option<PathBuf>,

    /// Side length of the board, overrides the game config
    #[arg(long)]
    grid_size: Option<usize>,

    /// How many symbols in a row win, overrides the game config
    #[arg(long)]
    streak: Option<usize>,

    /// Symbols drop to the lowest free square of a column
    #[arg(long, default_value_t = false)]
    gravity: bool,

    /// How many games to play
    #[arg(short, long, default_value_t = 100)]
    num_games: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Stop the tournament as soon as one player makes an illegal move
    #[arg(short, long, default_value_t = false)]
    stop_on_illegal_move: bool,

    /// Record the game's interactions as JSON files into this directory
    #[arg(short, long)]
    record_games_to_directory: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,

    /// Play in the terminal instead of running a tournament
    #[arg(short, long, default_value_t = false)]
    interactive: bool,
}

/// Someone who can take part in a game without a person at the keyboard.
enum Entrant {
    Process(PlayerConfig),
    Local(String),
}

impl Entrant {
    fn name(&self) -> &str {
        match self {
            Entrant::Process(config) => &config.nick,
            Entrant::Local(name) => name,
        }
    }

    fn spawn(
        &self,
        rng: &mut StdRng,
        recorder: &Option<Rc<RefCell<Recorder>>>,
    ) -> anyhow::Result<Box<dyn Agent>> {
        let agent: Box<dyn Agent> = match self {
            Entrant::Process(config) => Box::new(ProcessAgent::from_config(config)?),
            Entrant::Local(name) => Box::new(LocalAgent::computer(
                name,
                StdRng::seed_from_u64(rng.gen()),
            )),
        };
        Ok(match recorder {
            Some(recorder) => Box::new(RecordingAgent::new(agent, recorder.clone())),
            None => agent,
        })
    }
}

#[derive(Default)]
struct MatchScore {
    wins: [usize; 2],
    illegal_moves: [usize; 2],
    ties: usize,
}

fn play_matchup(
    entrants: [&Entrant; 2],
    config: &GameConfig,
    num_games: usize,
    rng: &mut StdRng,
    stop_on_illegal_move: bool,
    recorder: &Option<Rc<RefCell<Recorder>>>,
) -> anyhow::Result<MatchScore> {
    let player_names = [entrants[0].name(), entrants[1].name()];
    let agents = vec![entrants[0].spawn(rng, recorder)?, entrants[1].spawn(rng, recorder)?];
    let players = agents.iter().map(|agent| agent.player()).collect();
    let controller = GameController::new(
        config.clone(),
        players,
        SymbolPool::from_seed(rng.gen()),
        StdRng::seed_from_u64(rng.gen()),
    )?;
    let mut session = Session::from_parts(controller, agents)?;
    let mut match_score = MatchScore::default();

    for game_idx in 0..num_games {
        let game_result = play_game(&mut session)?;
        if let Some(rec) = recorder {
            let path = rec.borrow_mut().write_game_recording()?;
            debug!(game_idx, path = %path.display(), "Recorded game");
        }
        match game_result {
            GameResult::WonByPlayer { player_idx } => {
                debug!(winner = player_names[player_idx], game_idx);
                match_score.wins[player_idx] += 1;
            }
            GameResult::Tie => {
                debug!(game_idx, "Tie");
                match_score.ties += 1;
            }
            GameResult::IllegalMoveByPlayer { player_idx, err } => {
                info!(
                    player = player_names[player_idx],
                    game_idx, "Illegal move by player"
                );
                info!("{}", err);
                if stop_on_illegal_move {
                    break;
                } else {
                    match_score.wins[1 - player_idx] += 1;
                    match_score.illegal_moves[player_idx] += 1;
                }
            }
        }
    }
    session.finish()?;

    let paren = |idx: usize| {
        if match_score.illegal_moves[idx] > 0 {
            format!(
                " ({} through illegal moves by player {})",
                match_score.illegal_moves[idx],
                idx + 1
            )
        } else {
            String::new()
        }
    };
    eprintln!(
        "End result:\n- {} wins by {}{}\n- {} wins by {}{}\n- {} ties",
        match_score.wins[0],
        player_names[0],
        paren(1),
        match_score.wins[1],
        player_names[1],
        paren(0),
        match_score.ties
    );

    Ok(match_score)
}

// prints an upper triangular matrix of the results of the tournament
fn print_tournament_results(entrants: &[Entrant], match_results: &HashMap<(usize, usize), MatchScore>) {
    println!("\nTournament results (p1 win %, p2 win %, tie %):\n");
    print!(" {:19} |", "p1 ↓           p2 →");
    for j in (0..entrants.len()).rev() {
        print!(" {:19} |", entrants[j].name());
    }
    println!();
    for i in 0..entrants.len() {
        for _ in 0..entrants.len() - i + 1 {
            print!("---------------------|");
        }
        println!();
        print!(" {:19} |", entrants[i].name());
        for j in (0..entrants.len()).rev() {
            if i >= j {
                print!("    ");
            } else if let Some(score) = match_results.get(&(i, j)) {
                let num_games = score.wins[0] + score.wins[1] + score.ties;
                let percentage = |n: usize| n as f32 / num_games.max(1) as f32 * 100.0;
                print!(
                    "{:5.1}% {:5.1}% {:5.1}% |",
                    percentage(score.wins[0]),
                    percentage(score.wins[1]),
                    percentage(score.ties)
                );
            } else {
                print!(" {:19} |", "N/A");
            }
        }
        println!();
    }
    println!("---------------------|");
}

fn load_game_config(args: &Args) -> anyhow::Result<GameConfig> {
    let mut config = match &args.game_config {
        Some(path) => read_game_config(path)?,
        None => GameConfig::default(),
    };
    if let Some(grid_size) = args.grid_size {
        config.grid_size = grid_size;
    }
    if let Some(streak) = args.streak {
        config.streak = streak;
    }
    config.gravity |= args.gravity;
    config.validate()?;
    Ok(config)
}

fn read_game_config(path: &Path) -> anyhow::Result<GameConfig> {
    let file = File::open(path)
        .with_context(|| format!("Could not open game config '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Could not parse game config '{}'", path.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let config = load_game_config(&args)?;
    debug!(?config);

    let recorder = if let Some(dir_path) = &args.record_games_to_directory {
        Some(Rc::new(RefCell::new(Recorder::new(dir_path.clone())?)))
    } else {
        None
    };

    let mut entrants = args
        .player_configs
        .iter()
        .map(|path| PlayerConfig::load(path).map(Entrant::Process))
        .collect::<Result<Vec<Entrant>, anyhow::Error>>()?;
    entrants.extend((1..=args.computers).map(|n| Entrant::Local(format!("Computer {}", n))));

    if args.interactive {
        let agents = entrants
            .iter()
            .map(|entrant| entrant.spawn(&mut rng, &recorder))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let mut session = Session::new(
            config,
            agents,
            SymbolPool::from_seed(rng.gen()),
            StdRng::seed_from_u64(rng.gen()),
        )?;
        run_interactive(&mut session, std::io::stdin().lock(), std::io::stdout().lock())?;
        session.finish()?;
        if let Some(rec) = &recorder {
            rec.borrow_mut().write_game_recording()?;
        }
        return Ok(());
    }

    if entrants.len() < 2 {
        anyhow::bail!("A tournament needs at least two players, add player configs or --computers");
    }

    let mut match_results: HashMap<(usize, usize), MatchScore> = HashMap::new();
    for i1 in 0..entrants.len() {
        for i2 in i1 + 1..entrants.len() {
            let match_score = play_matchup(
                [&entrants[i1], &entrants[i2]],
                &config,
                args.num_games,
                &mut rng,
                args.stop_on_illegal_move,
                &recorder,
            )?;
            match_results.insert((i1, i2), match_score);
        }
    }

    if entrants.len() > 2 {
        print_tournament_results(&entrants, &match_results);
    }

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().event_format(format))
        .with(filter)
        .init();
}
