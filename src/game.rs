use std::io::{self, BufRead, Write};

use anyhow::Result;
use log::warn;

use crate::command::{Command, parse_command};
use crate::config::Config;
use crate::renderer::Renderer;
use crate::state::{GameState, HistoryEntry, StockAction};

/// The main game loop.  `renderer` is injected so the loop stays
/// renderer-agnostic.
pub struct Game<R: Renderer> {
    state: GameState,
    renderer: R,
    /// Options are written back to disk when the player changes them.
    persist_options: bool,
}

impl<R: Renderer> Game<R> {
    pub fn new(state: GameState, renderer: R) -> Self {
        Game {
            state,
            renderer,
            persist_options: false,
        }
    }

    /// Save option changes made during play.
    pub fn persist_options(mut self, persist: bool) -> Self {
        self.persist_options = persist;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Run the interactive game loop on stdin until the player quits.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        self.run_with(stdin.lock(), io::stdout())
    }

    /// Run the loop over any line source; the prompt goes to `prompt`.
    pub fn run_with<I: BufRead, O: Write>(&mut self, mut input: I, mut prompt: O) -> Result<()> {
        self.renderer.render(&self.state);

        loop {
            write!(prompt, "> ")?;
            prompt.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                // EOF
                break;
            }

            match parse_command(&line) {
                Err(e) => self.renderer.error(&e),
                Ok(cmd) => {
                    if self.handle(cmd) {
                        break;
                    }

                    if self.state.is_won() {
                        self.renderer.render(&self.state);
                        self.renderer.win();
                        continue;
                    }

                    self.renderer.render(&self.state);
                }
            }
        }

        Ok(())
    }

    /// Dispatch a command.  Returns `true` if the game should exit.
    fn handle(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Quit => {
                self.renderer.info("Thanks for playing. Goodbye!");
                return true;
            }
            Command::Help => {
                self.renderer.help();
            }
            Command::NewGame => {
                self.state.deal_random();
                self.renderer.info("A new game has been dealt.");
            }
            Command::Undo => match self.state.undo() {
                Ok(HistoryEntry::Move(mv)) if mv.revealed => {
                    self.renderer.info("Undo successful (card turned back over).");
                }
                Ok(_) => self.renderer.info("Undo successful."),
                Err(e) => self.renderer.error(&e.to_string()),
            },
            Command::Draw => match self.state.draw() {
                Ok(StockAction::Drew(n)) => self.renderer.info(&format!("Drew {} card(s).", n)),
                Ok(StockAction::Recycled(n)) => self
                    .renderer
                    .info(&format!("Turned {} card(s) back into the stock.", n)),
                Err(e) => self.renderer.error(&e.to_string()),
            },
            Command::AutoComplete => {
                let n = self.state.auto_complete();
                if n > 0 {
                    self.renderer
                        .info(&format!("Auto-moved {} card(s) to foundation.", n));
                } else {
                    self.renderer.error("No card can go to a foundation.");
                }
            }
            Command::Move { src, dst, count } => {
                match self.state.attempt_move(src, count, dst) {
                    Ok(report) if report.revealed => {
                        self.renderer.info("A hidden card was turned over.");
                    }
                    Ok(_) => {}
                    Err(e) => self.renderer.error(&e.to_string()),
                }
            }
            Command::SetDrawMode(mode) => {
                let config = Config {
                    draw_mode: mode,
                    ..self.state.config().clone()
                };
                if self.persist_options {
                    if let Err(e) = config.save() {
                        warn!("could not save options: {:#}", e);
                    }
                }
                self.state.set_config(config);
                self.renderer
                    .info(&format!("Now drawing {} card(s) at a time.", mode.count()));
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::full_deck;
    use crate::config::DrawMode;
    use crate::pile::PileId;

    /// Records what the loop asked to show.
    #[derive(Default)]
    struct Recorder {
        renders: usize,
        infos: Vec<String>,
        errors: Vec<String>,
        wins: usize,
    }

    impl Renderer for Recorder {
        fn render(&mut self, _state: &GameState) {
            self.renders += 1;
        }
        fn info(&mut self, msg: &str) {
            self.infos.push(msg.to_string());
        }
        fn error(&mut self, msg: &str) {
            self.errors.push(msg.to_string());
        }
        fn help(&mut self) {}
        fn win(&mut self) {
            self.wins += 1;
        }
    }

    fn game() -> Game<Recorder> {
        let mut state = GameState::default();
        state.deal(full_deck()).unwrap();
        Game::new(state, Recorder::default())
    }

    fn play(game: &mut Game<Recorder>, script: &str) {
        game.run_with(script.as_bytes(), Vec::new()).unwrap();
    }

    #[test]
    fn draw_and_undo_through_the_loop() {
        let mut game = game();
        play(&mut game, "d\nd\nundo\nq\n");
        assert_eq!(game.state().cards_of(PileId::Talon).len(), 1);
        assert_eq!(game.renderer.infos.len(), 4);
        assert!(game.renderer.errors.is_empty());
    }

    #[test]
    fn illegal_moves_are_reported() {
        let mut game = game();
        play(&mut game, "mv 1 2\nbogus\n");
        assert_eq!(game.renderer.errors.len(), 2);
        assert_eq!(game.state().moves_made(), 0);
    }

    #[test]
    fn draw_mode_switch_applies_immediately() {
        let mut game = game();
        play(&mut game, "draw3\nd\n");
        assert_eq!(game.state().config().draw_mode, DrawMode::Three);
        assert_eq!(game.state().cards_of(PileId::Talon).len(), 3);
    }

    #[test]
    fn eof_ends_the_loop() {
        let mut game = game();
        play(&mut game, "");
        assert_eq!(game.renderer.renders, 1);
        assert_eq!(game.renderer.wins, 0);
    }
}
