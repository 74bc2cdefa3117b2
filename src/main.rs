mod config;
mod game;
mod sim;
mod snake;
mod term;

use anyhow::Result;
use clap::Parser;

use crate::config::Config;
use crate::game::SnakeGame;

pub type TermInt = u16;
pub type Coords = (u16, u16);

/// A cell on the playing field, (column, row), 0-based. Signed so that
/// out-of-bounds candidate positions are representable.
pub type GridPos = (i16, i16);

#[derive(Parser)]
#[command(name = "gridsnake", version, about = "Single-player grid snake for the terminal")]
struct Cli {
    /// Milliseconds between simulation ticks
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Cap the playing field width, in cells (defaults to the terminal width)
    #[arg(long)]
    width: Option<u16>,

    /// Cap the playing field height, in cells (defaults to the terminal height)
    #[arg(long)]
    height: Option<u16>,
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let config = Config::new(cli.tick_ms, cli.width, cli.height)?;

    SnakeGame::new(config)?.run()
}
