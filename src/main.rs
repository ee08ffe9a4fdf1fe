use anyhow::Result;
use clap::{Parser, ValueEnum};

use klondike_rs::config::{Config, DrawMode};
use klondike_rs::game::Game;
use klondike_rs::renderer::CliRenderer;
use klondike_rs::state::GameState;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DrawArg {
    One,
    Three,
}

/// Klondike Solitaire in the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Deal a reproducible game from this seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Cards turned per draw; overrides the saved option for this session.
    #[arg(long, value_enum)]
    draw: Option<DrawArg>,

    /// How many times the talon may be turned back into the stock.
    #[arg(long)]
    recycle_limit: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    println!(
        r#"
┌─────────────────────────────────────────┐
│     Klondike Solitaire (CLI Edition)    │
│   Type 'help' or '?' for commands.      │
└─────────────────────────────────────────┘
"#
    );

    let mut config = Config::load();
    if let Some(draw) = cli.draw {
        config.draw_mode = match draw {
            DrawArg::One => DrawMode::One,
            DrawArg::Three => DrawMode::Three,
        };
    }
    if cli.recycle_limit.is_some() {
        config.recycle_limit = cli.recycle_limit;
    }

    let mut state = GameState::new(config);
    match cli.seed {
        Some(seed) => state.deal_seeded(seed),
        None => state.deal_random(),
    }

    let mut game = Game::new(state, CliRenderer::new()).persist_options(true);
    game.run()
}
