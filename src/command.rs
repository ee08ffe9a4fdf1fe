use crate::config::DrawMode;
use crate::pile::PileId;

/// All commands a player can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Move the top `count` cards of `src` onto `dst`.
    Move { src: PileId, dst: PileId, count: usize },
    /// Turn cards from the stock, or recycle the talon when the stock is empty.
    Draw,
    /// Send every playable card to the foundations.
    AutoComplete,
    /// Undo the last step.
    Undo,
    /// Change how many cards a draw turns; saved for later sessions.
    SetDrawMode(DrawMode),
    /// Give up and start a new game.
    NewGame,
    /// Quit the game.
    Quit,
    /// Print help.
    Help,
}

/// Parse a single line of text input into a `Command`.
///
/// Syntax reference (case-insensitive):
/// ```text
/// mv <src> <dst> [n]    -- Move n cards (default 1) from src to dst
///                          piles: s, w, f1..f4, 1..7
/// d | draw              -- Draw from the stock / recycle the talon
/// auto                  -- Move everything possible to the foundations
/// undo                  -- Undo last step
/// draw1 | draw3         -- Switch draw mode
/// new                   -- New game
/// quit | q              -- Quit
/// help | h | ?          -- Help
/// ```
pub fn parse_command(input: &str) -> Result<Command, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Empty input".to_string());
    }

    let tokens: Vec<&str> = input.split_whitespace().collect();
    let cmd = tokens[0].to_lowercase();

    match cmd.as_str() {
        "mv" | "m" => {
            if tokens.len() < 3 {
                return Err("Usage: mv <src> <dst> [count]".to_string());
            }
            let src: PileId = tokens[1].parse()?;
            let dst: PileId = tokens[2].parse()?;
            let count = match tokens.get(3) {
                Some(n) => n
                    .parse()
                    .map_err(|_| format!("'{}' is not a valid card count", n))?,
                None => 1,
            };
            Ok(Command::Move { src, dst, count })
        }
        "d" | "draw" => Ok(Command::Draw),
        "auto" | "a" => Ok(Command::AutoComplete),
        "draw1" => Ok(Command::SetDrawMode(DrawMode::One)),
        "draw3" => Ok(Command::SetDrawMode(DrawMode::Three)),

        "undo" | "u" => Ok(Command::Undo),
        "new" | "n" => Ok(Command::NewGame),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        "help" | "h" | "?" => Ok(Command::Help),
        _ => Err(format!("Unknown command '{}'. Type 'help' for help.", tokens[0])),
    }
}
