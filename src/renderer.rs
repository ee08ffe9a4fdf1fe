use crossterm::style::Stylize;

use crate::card::{Card, Color};
use crate::pile::{NUM_FOUNDATIONS, NUM_TABLEAUS, PileId};
use crate::state::GameState;

/// Trait that abstracts the rendering layer. The game loop only talks to
/// the player through it.
pub trait Renderer {
    /// Render the whole table.
    fn render(&mut self, state: &GameState);
    /// Display an informational message.
    fn info(&mut self, msg: &str);
    /// Display an error message.
    fn error(&mut self, msg: &str);
    /// Display the help text.
    fn help(&mut self);
    /// Display the win screen.
    fn win(&mut self);
}

// ---------------------------------------------------------------------------
// CLI Renderer
// ---------------------------------------------------------------------------

/// A simple colored terminal renderer.
#[derive(Default)]
pub struct CliRenderer;

impl CliRenderer {
    pub fn new() -> Self {
        CliRenderer
    }

    fn card_str(&self, card: Card) -> String {
        if !card.is_face_up() {
            return format!("{}", "###".dark_grey());
        }
        let label = format!("{:>3}", card.label());
        match card.color() {
            Color::Red => format!("{}", label.red()),
            Color::Black => format!("{}", label.white()),
        }
    }

    fn top_str(&self, state: &GameState, id: PileId) -> String {
        match state.pile(id).and_then(|p| p.top()) {
            Some(card) => format!("[{}]", self.card_str(*card)),
            None => "[   ]".to_string(),
        }
    }
}

impl Renderer for CliRenderer {
    fn render(&mut self, state: &GameState) {
        println!();

        // ---- Top row: stock | talon | foundations ----
        let stock = state.cards_of(PileId::Stock);
        let stock_str = if stock.is_empty() {
            "[   ]".to_string()
        } else {
            format!("[{}]", "###".dark_grey())
        };
        print!("  s:{} ({:>2})   ", stock_str, stock.len());
        print!("w:{} ({:>2})   ", self.top_str(state, PileId::Talon), state.cards_of(PileId::Talon).len());

        for i in 0..NUM_FOUNDATIONS {
            let id = PileId::Foundation(i);
            print!("{}:{} ", id, self.top_str(state, id));
        }
        println!();

        // ---- Column indices header ----
        println!();
        print!("   ");
        for i in 0..NUM_TABLEAUS {
            print!("  {:^5}", i + 1);
        }
        println!();

        // ---- Tableau ----
        let max_len = (0..NUM_TABLEAUS)
            .map(|i| state.cards_of(PileId::Tableau(i)).len())
            .max()
            .unwrap_or(0);

        for row in 0..max_len {
            print!("   ");
            for i in 0..NUM_TABLEAUS {
                let cards = state.cards_of(PileId::Tableau(i));
                if row < cards.len() {
                    print!("  [{}]", self.card_str(cards[row]));
                } else {
                    print!("       ");
                }
            }
            println!();
        }

        if max_len == 0 {
            println!("  (all columns empty)");
        }

        println!(
            "\n  moves: {}   draw: {}   passes: {}",
            state.moves_made(),
            state.config().draw_mode.count(),
            state.recycles()
        );
    }

    fn info(&mut self, msg: &str) {
        println!("{} {}", "[INFO]".cyan(), msg);
    }

    fn error(&mut self, msg: &str) {
        println!("{} {}", "[ERR ]".red(), msg);
    }

    fn help(&mut self) {
        println!(
            r#"
╔══════════════════════════════════════════════════════════════╗
║               Klondike Solitaire – CLI Help                  ║
╠══════════════════════════════════════════════════════════════╣
║  GOAL: Build all four foundations from Ace to King by suit.  ║
║                                                              ║
║  RULES:                                                      ║
║    · Columns build down in alternating colors                ║
║      e.g. a red 7 goes on a black 8                          ║
║    · Only a King (or a run led by one) fills an empty column ║
║    · Foundations build up by suit: A → 2 → ... → K           ║
║    · The stock turns 1 or 3 cards onto the talon; when it    ║
║      runs out, the talon turns back into the stock           ║
╠══════════════════════════════════════════════════════════════╣
║  PILES:  s stock   w talon   f1..f4 foundations   1..7 cols  ║
║                                                              ║
║  COMMANDS (case-insensitive):                                ║
║                                                              ║
║  mv <src> <dst> [n]      Move n cards (default 1)            ║
║  d | draw                Draw from the stock                 ║
║  auto                    Move all playable cards up          ║
║  undo                    Undo last step                      ║
║  draw1 | draw3           Switch draw mode (saved)            ║
║  new                     Start a new random game             ║
║  quit                    Exit                                ║
║  help | h | ?            Show this help                      ║
╠══════════════════════════════════════════════════════════════╣
║  Example: mv 4 7 3  →  move the top 3 cards of col 4 to 7    ║
╚══════════════════════════════════════════════════════════════╝
"#
        );
    }

    fn win(&mut self) {
        println!(
            "\n{}\n\n  Congratulations! You solved it!  Type 'new' for another game.\n",
            "  ★ ★ ★  YOU WIN  ★ ★ ★".yellow().bold()
        );
    }
}
