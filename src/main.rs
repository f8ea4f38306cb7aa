//! Command line interface to the minimax chess player.
//!
//! `selfplay` lets two engine players play each other. `play` pits a human,
//! entering moves in coordinate notation, against one engine player.

use std::io::{self, Write};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use minimax_engine::coretypes::Color;
use minimax_engine::error;
use minimax_engine::info;
use minimax_engine::{
    Depth, Evaluator, FixedVector, Game, MaterialEvaluator, NoiseEvaluator, Player, PlayerBuilder,
    Position, Score,
};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum EvaluatorKind {
    /// Piece count with standard values.
    Material,
    /// Deterministic pseudo-random scores.
    Noise,
}

/// Evaluator selected on the command line.
#[derive(Debug, Copy, Clone)]
enum CliEvaluator {
    Material(MaterialEvaluator),
    Noise(NoiseEvaluator),
}

impl CliEvaluator {
    fn new(kind: EvaluatorKind, seed: u64) -> Self {
        match kind {
            EvaluatorKind::Material => Self::Material(MaterialEvaluator::default()),
            EvaluatorKind::Noise => Self::Noise(NoiseEvaluator::new(seed)),
        }
    }
}

impl Evaluator for CliEvaluator {
    fn evaluate(&self, features: &FixedVector) -> Score {
        match self {
            Self::Material(evaluator) => evaluator.evaluate(features),
            Self::Noise(evaluator) => evaluator.evaluate(features),
        }
    }
}

#[derive(Parser, Debug, Clone)]
struct SearchParams {
    /// Search depth in plies.
    #[arg(short, long, default_value = "2")]
    depth: Depth,

    /// Seed for tie-breaking. Omit for a different game every run.
    #[arg(long)]
    seed: Option<u64>,

    /// Start from this position instead of the standard one.
    #[arg(long)]
    fen: Option<String>,

    #[arg(long, value_enum, default_value_t = EvaluatorKind::Material)]
    evaluator: EvaluatorKind,

    /// Print search details after every move.
    #[arg(long)]
    debug: bool,
}

impl SearchParams {
    fn builder(&self) -> PlayerBuilder {
        let builder = PlayerBuilder::new().depth(self.depth);
        match self.seed {
            Some(seed) => builder.seed(seed),
            None => builder,
        }
    }

    fn game(&self) -> error::Result<Game> {
        match &self.fen {
            Some(fen) => Game::from_fen(fen),
            None => Ok(Game::start_position()),
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Depth-limited minimax chess player")]
struct Cli {
    #[command(subcommand)]
    command: SubCommands,
}

#[derive(Debug, Subcommand)]
enum SubCommands {
    /// Two engine players play each other.
    Selfplay {
        /// Stop after this many plies even if the game is not over.
        #[arg(long, default_value = "200")]
        max_plies: usize,

        #[command(flatten)]
        params: SearchParams,
    },
    /// Play against the engine.
    Play {
        /// Color played by the human.
        #[arg(long, value_enum, default_value_t = HumanColor::White)]
        color: HumanColor,

        #[command(flatten)]
        params: SearchParams,
    },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum HumanColor {
    White,
    Black,
}

impl From<HumanColor> for Color {
    fn from(color: HumanColor) -> Self {
        match color {
            HumanColor::White => Color::White,
            HumanColor::Black => Color::Black,
        }
    }
}

fn main() {
    let args = Cli::parse();
    let result = match args.command {
        SubCommands::Selfplay { max_plies, params } => selfplay(&params, max_plies),
        SubCommands::Play { color, params } => play(&params, color.into()),
    };

    if let Err(err) = result {
        let _ = info::error(&err.to_string());
        process::exit(1);
    }
}

fn selfplay(params: &SearchParams, max_plies: usize) -> error::Result<()> {
    let builder = params.builder();
    // Different noise seeds so the two sides do not share one opinion.
    let seed = params.seed.unwrap_or_default();
    let mut white = builder.build(CliEvaluator::new(params.evaluator, seed));
    let mut black = builder.build(CliEvaluator::new(params.evaluator, seed.wrapping_add(1)));
    let mut game = params.game()?;

    println!("{}", game.position());
    let outcome = game.play_out(&mut white, &mut black, params.depth, max_plies, params.debug)?;
    println!("{}", game.position());
    match outcome {
        Some(outcome) => println!("{outcome}"),
        None => println!("stopped after {max_plies} plies"),
    }
    println!("{}", game.movetext());
    Ok(())
}

enum InputKind {
    Exit,
    Newgame,
    Help,
    Undo,
    GameMove(String),
}

impl From<&str> for InputKind {
    fn from(s: &str) -> Self {
        match s {
            "exit" | "quit" => Self::Exit,
            "newgame" | "ng" => Self::Newgame,
            "help" => Self::Help,
            "undo" => Self::Undo,
            _ => Self::GameMove(s.to_string()),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("newgame | ng => Begin a new game.");
    println!("undo => Take back your last move and the engine's reply.");
    println!("help => Print this help text.");
    println!("exit => end CLI.");
    println!("\nTo make a move, enter a move in coordinate form.");
    println!("Examples: d2d4, e7e8q");
}

fn engine_turn<E: Evaluator>(
    game: &mut Game,
    engine: &mut Player<E>,
    params: &SearchParams,
) -> error::Result<()> {
    println!("thinking...");
    let result = game.play_turn(engine, params.depth)?;
    if let Some(best_move) = result.best_move() {
        println!("Engine played move {best_move}.");
    }
    info::debug(params.debug, &result.to_string())?;
    Ok(())
}

/// Print the final position and wait for Enter before a new game starts.
/// Returns false once input is closed.
fn finish_game(game: &Game) -> error::Result<bool> {
    println!("{}", game.position());
    if let Some(outcome) = game.outcome() {
        println!("Game over: {outcome}.");
    }
    println!("{}", game.movetext());
    println!("Press Enter to start a new game.");
    let mut input = String::new();
    Ok(io::stdin().read_line(&mut input)? > 0)
}

fn play(params: &SearchParams, human: Color) -> error::Result<()> {
    let mut engine = params
        .builder()
        .build(CliEvaluator::new(params.evaluator, params.seed.unwrap_or_default()));
    let mut game = params.game()?;
    let mut input = String::new();

    println!("Minimax chess {}\n", env!("CARGO_PKG_VERSION"));
    print_help();

    loop {
        if game.is_over() {
            if !finish_game(&game)? {
                break;
            }
            game = params.game()?;
            continue;
        }
        if game.position().side_to_move() != human {
            engine_turn(&mut game, &mut engine, params)?;
            continue;
        }

        println!("{}", game.position());
        print!("> ");
        io::stdout().flush()?;
        input.clear();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        match InputKind::from(input.trim()) {
            InputKind::Exit => break,
            InputKind::Newgame => {
                game = params.game()?;
                println!("Starting new game...");
            }
            InputKind::Help => print_help(),
            InputKind::Undo => {
                // Undo both the engine's reply and the human's move.
                for _ in 0..2 {
                    if let Some(move_) = game.undo() {
                        println!("Undo move {move_}.");
                    }
                }
            }
            InputKind::GameMove(text) => match game.apply_move(&text) {
                Ok(_) => (),
                Err(err) => println!("{err}. No action taken."),
            },
        }
    }
    Ok(())
}
