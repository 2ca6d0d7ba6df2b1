//! Terminal frontend for the minkampo engine. Reads one command per line,
//! prints the board after every change, and keeps a wall clock on the side.

use std::fmt::Write as _;
use std::io::{self, Write as _};
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use minkampo_core::{
    Board, BoardConfig, CellCount, Coord, GameState, RandomMinePlacer, RevealOutcome,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    fn config(self) -> BoardConfig {
        match self {
            Self::Easy => BoardConfig::easy(),
            Self::Medium => BoardConfig::medium(),
            Self::Hard => BoardConfig::hard(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "minkampo", version, about = "Minesweeper for the terminal")]
struct Args {
    /// Stock board layout
    #[arg(short, long, value_enum, default_value = "easy")]
    difficulty: Difficulty,

    /// Custom row count, overrides the difficulty
    #[arg(long, requires = "columns", requires = "mines")]
    rows: Option<Coord>,

    /// Custom column count
    #[arg(long, requires = "rows")]
    columns: Option<Coord>,

    /// Custom mine count
    #[arg(long, requires = "rows")]
    mines: Option<CellCount>,

    /// Seed for a reproducible board
    #[arg(short, long)]
    seed: Option<u64>,
}

impl Args {
    fn board_config(&self) -> BoardConfig {
        match (self.rows, self.columns, self.mines) {
            (Some(rows), Some(columns), Some(mines)) => BoardConfig::new(rows, columns, mines),
            _ => self.difficulty.config(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Command {
    Reveal(Coord, Coord),
    Flag(Coord, Coord),
    New,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["r" | "reveal", row, col] => Some(Command::Reveal(row.parse().ok()?, col.parse().ok()?)),
        ["f" | "flag", row, col] => Some(Command::Flag(row.parse().ok()?, col.parse().ok()?)),
        ["n" | "new"] => Some(Command::New),
        ["h" | "help" | "?"] => Some(Command::Help),
        ["q" | "quit"] => Some(Command::Quit),
        _ => None,
    }
}

/// Wall clock for the status line. Purely an observer: it watches the engine
/// and never feeds anything back into it.
struct GameClock {
    started: Instant,
    stopped: Option<Instant>,
}

impl GameClock {
    fn start() -> Self {
        Self {
            started: Instant::now(),
            stopped: None,
        }
    }

    /// Freezes the clock the first time the game is seen finished.
    fn observe(&mut self, game_over: bool) {
        if game_over && self.stopped.is_none() {
            self.stopped = Some(Instant::now());
        }
    }

    fn elapsed_secs(&self) -> u64 {
        self.stopped
            .unwrap_or_else(Instant::now)
            .duration_since(self.started)
            .as_secs()
    }
}

fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn status_label(state: GameState) -> &'static str {
    match state {
        GameState::InProgress => "in progress",
        GameState::Won => "you won",
        GameState::Lost => "you lost",
    }
}

fn render(board: &Board, clock: &GameClock) -> String {
    let mut out = String::new();

    out.push_str("    ");
    for col in 0..board.columns() {
        let _ = write!(out, "{col:>2} ");
    }
    out.push('\n');
    out.push_str("   +");
    out.push_str(&"-".repeat(usize::from(board.columns()) * 3));
    out.push('\n');

    for row in 0..board.rows() {
        let _ = write!(out, "{row:>2} |");
        for col in 0..board.columns() {
            let text = board.cell_text((row, col)).unwrap_or(" ");
            let _ = write!(out, " {text} ");
        }
        out.push('\n');
    }

    let _ = write!(
        out,
        "flags {}/{} | cells {}/{} | {} | {}",
        board.flagged_count(),
        board.mine_count(),
        board.explored_count(),
        board.total_cells(),
        format_clock(clock.elapsed_secs()),
        status_label(board.state()),
    );
    out.push('\n');
    out
}

fn print_help() {
    println!("commands:");
    println!("  r ROW COL   reveal a cell");
    println!("  f ROW COL   place or remove a flag");
    println!("  n           start a new game");
    println!("  h           show this help");
    println!("  q           quit");
}

fn random_seed() -> u64 {
    use rand::Rng as _;
    rand::rng().random()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = args.board_config();
    let seed = args.seed.unwrap_or_else(random_seed);
    log::info!("starting game with seed {seed}");

    let mut board = Board::from_seed(config, seed)?;
    let mut clock = GameClock::start();

    print_help();
    print!("{}", render(&board, &clock));

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let Some(command) = parse_command(&line) else {
            println!("unrecognized command: {}", line.trim());
            print_help();
            continue;
        };

        match command {
            Command::Reveal(row, col) => match board.reveal((row, col)) {
                Ok(outcome) => {
                    report_reveal(outcome);
                    clock.observe(board.is_game_over());
                    if outcome.has_update() {
                        print!("{}", render(&board, &clock));
                    }
                }
                Err(err) => println!("{err}"),
            },
            Command::Flag(row, col) => match board.toggle_flag((row, col)) {
                Ok(outcome) => {
                    if outcome.has_update() {
                        print!("{}", render(&board, &clock));
                    } else {
                        println!("no flag change there");
                    }
                }
                Err(err) => println!("{err}"),
            },
            Command::New => {
                let seed = args.seed.unwrap_or_else(random_seed);
                board.new_game(config, RandomMinePlacer::new(seed))?;
                clock = GameClock::start();
                log::info!("new game with seed {seed}");
                print!("{}", render(&board, &clock));
            }
            Command::Help => print_help(),
            Command::Quit => break,
        }
    }

    Ok(())
}

fn report_reveal(outcome: RevealOutcome) {
    match outcome {
        RevealOutcome::NoChange => println!("nothing to reveal there"),
        RevealOutcome::Revealed => {}
        RevealOutcome::HitMine => println!("boom, that was a mine"),
        RevealOutcome::Won => println!("all clear, you win"),
    }
}
