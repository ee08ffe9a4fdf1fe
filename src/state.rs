use std::collections::HashSet;
use std::error::Error;
use std::fmt;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::card::{Card, DECK_SIZE, Rank, seeded_deck, shuffled_deck};
use crate::config::Config;
use crate::pile::{InsufficientCards, NUM_FOUNDATIONS, NUM_TABLEAUS, Pile, PileId, PileKind};
use crate::rules::{self, IllegalReason};

/// One applied player move, enough to play it backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub source: PileId,
    pub destination: PileId,
    pub count: usize,
    /// The move turned the source's new top card face-up.
    pub revealed: bool,
}

/// An undoable step of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEntry {
    Move(Move),
    /// `count` cards went from the stock to the talon.
    Draw { count: usize },
    /// `count` talon cards were turned back into the stock.
    Recycle { count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won,
}

/// What a successful [`GameState::attempt_move`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub count: usize,
    pub revealed: bool,
    pub won: bool,
    /// The source pile after the move.
    pub source: Vec<Card>,
    /// The destination pile after the move.
    pub destination: Vec<Card>,
}

/// Outcome of a click on the stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAction {
    Drew(usize),
    Recycled(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    Illegal(IllegalReason),
    Insufficient(InsufficientCards),
    SamePile,
    GameOver,
    /// The id names a foundation or tableau slot that does not exist.
    UnknownPile(PileId),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::Illegal(reason) => write!(f, "illegal move: {}", reason),
            MoveError::Insufficient(e) => write!(f, "{}", e),
            MoveError::SamePile => write!(f, "source and destination are the same pile"),
            MoveError::GameOver => write!(f, "the game is already won"),
            MoveError::UnknownPile(id) => write!(f, "there is no pile {}", id),
        }
    }
}

impl Error for MoveError {}

impl From<IllegalReason> for MoveError {
    fn from(reason: IllegalReason) -> Self {
        MoveError::Illegal(reason)
    }
}

impl From<InsufficientCards> for MoveError {
    fn from(e: InsufficientCards) -> Self {
        MoveError::Insufficient(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoError {
    EmptyHistory,
    GameOver,
    /// The last history entry no longer matches the piles; nothing was undone.
    HistoryMismatch,
}

impl fmt::Display for UndoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UndoError::EmptyHistory => write!(f, "nothing to undo"),
            UndoError::GameOver => write!(f, "undo is disabled once the game is won"),
            UndoError::HistoryMismatch => write!(f, "the move history does not match the table"),
        }
    }
}

impl Error for UndoError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockError {
    /// Both stock and talon are empty.
    Empty,
    RecycleLimitReached,
    GameOver,
}

impl fmt::Display for StockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockError::Empty => write!(f, "the stock and talon are both empty"),
            StockError::RecycleLimitReached => write!(f, "no more passes through the stock"),
            StockError::GameOver => write!(f, "the game is already won"),
        }
    }
}

impl Error for StockError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealError {
    WrongSize(usize),
    DuplicateCard(Card),
}

impl fmt::Display for DealError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DealError::WrongSize(n) => write!(f, "a deal needs {} cards, got {}", DECK_SIZE, n),
            DealError::DuplicateCard(c) => write!(f, "card {} appears twice in the deck", c),
        }
    }
}

impl Error for DealError {}

/// A game of Klondike: the single source of truth for all piles.
#[derive(Debug, Clone)]
pub struct GameState {
    stock: Pile,
    talon: Pile,
    foundations: [Pile; NUM_FOUNDATIONS],
    tableaus: [Pile; NUM_TABLEAUS],
    history: Vec<HistoryEntry>,
    status: GameStatus,
    recycles: u32,
    config: Config,
}

impl GameState {
    /// An empty table; call one of the `deal` methods to start playing.
    pub fn new(config: Config) -> Self {
        GameState {
            stock: Pile::new(PileKind::Stock),
            talon: Pile::new(PileKind::Talon),
            foundations: std::array::from_fn(|_| Pile::new(PileKind::Foundation)),
            tableaus: std::array::from_fn(|_| Pile::new(PileKind::Tableau)),
            history: Vec::new(),
            status: GameStatus::InProgress,
            recycles: 0,
            config,
        }
    }

    // -------------------------------------------------------------------------
    // Dealing
    // -------------------------------------------------------------------------

    /// Deal a fresh game from an OS-seeded shuffle.
    pub fn deal_random(&mut self) {
        let mut rng = SmallRng::from_os_rng();
        let deck = shuffled_deck(&mut rng);
        self.deal_unchecked(deck);
    }

    /// Deal a reproducible game from a seed.
    pub fn deal_seeded(&mut self, seed: u64) {
        debug!("dealing seeded game {}", seed);
        self.deal_unchecked(seeded_deck(seed));
    }

    /// Reset every pile and deal `deck` in Klondike layout: row by row,
    /// tableau `i` ends with `i + 1` cards and only its top face-up; the
    /// remaining 24 cards form the stock, face-down, last card on top.
    pub fn deal(&mut self, deck: Vec<Card>) -> Result<(), DealError> {
        if deck.len() != DECK_SIZE {
            return Err(DealError::WrongSize(deck.len()));
        }
        let mut seen = HashSet::with_capacity(DECK_SIZE);
        for card in &deck {
            if !seen.insert(card.identity()) {
                return Err(DealError::DuplicateCard(*card));
            }
        }
        self.deal_unchecked(deck);
        Ok(())
    }

    fn deal_unchecked(&mut self, deck: Vec<Card>) {
        self.stock.clear();
        self.talon.clear();
        for pile in self.foundations.iter_mut().chain(self.tableaus.iter_mut()) {
            pile.clear();
        }
        self.history.clear();
        self.status = GameStatus::InProgress;
        self.recycles = 0;

        let mut cards = deck.into_iter().map(|mut c| {
            c.set_face_up(false);
            c
        });

        for row in 0..NUM_TABLEAUS {
            for col in row..NUM_TABLEAUS {
                if let Some(mut card) = cards.next() {
                    card.set_face_up(col == row);
                    self.tableaus[col].push_run([card]);
                }
            }
        }
        self.stock.push_run(cards);

        info!(
            "dealt new game: {} in stock, draw {}",
            self.stock.len(),
            self.config.draw_mode.count()
        );
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The pile `id` names, or `None` for a slot past the last foundation
    /// or tableau.
    pub fn pile(&self, id: PileId) -> Option<&Pile> {
        match id {
            PileId::Stock => Some(&self.stock),
            PileId::Talon => Some(&self.talon),
            PileId::Foundation(i) => self.foundations.get(i),
            PileId::Tableau(i) => self.tableaus.get(i),
        }
    }

    fn pile_mut(&mut self, id: PileId) -> Option<&mut Pile> {
        match id {
            PileId::Stock => Some(&mut self.stock),
            PileId::Talon => Some(&mut self.talon),
            PileId::Foundation(i) => self.foundations.get_mut(i),
            PileId::Tableau(i) => self.tableaus.get_mut(i),
        }
    }

    /// A copy of the cards of pile `id`; empty for an unknown id.
    pub fn cards_of(&self, id: PileId) -> Vec<Card> {
        self.pile(id).map(|p| p.cards().to_vec()).unwrap_or_default()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_won(&self) -> bool {
        self.status == GameStatus::Won
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Number of undoable steps taken so far.
    pub fn moves_made(&self) -> usize {
        self.history.len()
    }

    pub fn recycles(&self) -> u32 {
        self.recycles
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty() && (!self.is_won() || self.config.undo_after_win)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the options. A new draw mode applies from the next draw.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    // -------------------------------------------------------------------------
    // Moves
    // -------------------------------------------------------------------------

    /// Move the top `count` cards of `source` onto `destination`. Either the
    /// whole move happens or nothing changes.
    pub fn attempt_move(
        &mut self,
        source: PileId,
        count: usize,
        destination: PileId,
    ) -> Result<MoveReport, MoveError> {
        if self.is_won() {
            return Err(MoveError::GameOver);
        }
        let from = self.pile(source).ok_or(MoveError::UnknownPile(source))?;
        let to = self
            .pile(destination)
            .ok_or(MoveError::UnknownPile(destination))?;
        if source == destination {
            return Err(MoveError::SamePile);
        }

        let run = from.peek_run(count)?;
        rules::validate(from, run, to)?;

        let popped = self
            .pile_mut(source)
            .ok_or(MoveError::UnknownPile(source))?
            .pop_run(count)?;
        self.pile_mut(destination)
            .ok_or(MoveError::UnknownPile(destination))?
            .push_run(popped.cards);

        let mv = Move {
            source,
            destination,
            count,
            revealed: popped.revealed,
        };
        self.history.push(HistoryEntry::Move(mv));
        self.refresh_status();
        debug!("move {} card(s) {} -> {} (revealed: {})", count, source, destination, mv.revealed);

        Ok(MoveReport {
            count,
            revealed: mv.revealed,
            won: self.is_won(),
            source: self.cards_of(source),
            destination: self.cards_of(destination),
        })
    }

    /// Click on the stock: turn over up to the draw count onto the talon, or,
    /// once the stock is empty, turn the whole talon back into the stock.
    pub fn draw(&mut self) -> Result<StockAction, StockError> {
        if self.is_won() {
            return Err(StockError::GameOver);
        }

        if !self.stock.is_empty() {
            let count = self.config.draw_mode.count().min(self.stock.len());
            Self::transfer_flipped(&mut self.stock, &mut self.talon, count, true)
                .map_err(|_| StockError::Empty)?;
            self.history.push(HistoryEntry::Draw { count });
            debug!("drew {} card(s) from the stock", count);
            return Ok(StockAction::Drew(count));
        }

        if self.talon.is_empty() {
            return Err(StockError::Empty);
        }
        if self
            .config
            .recycle_limit
            .is_some_and(|limit| self.recycles >= limit)
        {
            return Err(StockError::RecycleLimitReached);
        }

        let count = self.talon.len();
        Self::transfer_flipped(&mut self.talon, &mut self.stock, count, false)
            .map_err(|_| StockError::Empty)?;
        self.recycles += 1;
        self.history.push(HistoryEntry::Recycle { count });
        debug!("recycled {} talon card(s) into the stock", count);
        Ok(StockAction::Recycled(count))
    }

    /// Revert the most recent step exactly, including face flags. If the
    /// entry no longer fits the piles, nothing changes and the entry stays
    /// in the history.
    pub fn undo(&mut self) -> Result<HistoryEntry, UndoError> {
        if self.is_won() && !self.config.undo_after_win {
            return Err(UndoError::GameOver);
        }
        let entry = self.history.last().copied().ok_or(UndoError::EmptyHistory)?;

        let reverted = match entry {
            HistoryEntry::Move(mv) => self.revert_move(mv),
            HistoryEntry::Draw { count } => {
                Self::transfer_flipped(&mut self.talon, &mut self.stock, count, false)
            }
            HistoryEntry::Recycle { count } => {
                Self::transfer_flipped(&mut self.stock, &mut self.talon, count, true).map(|()| {
                    self.recycles = self.recycles.saturating_sub(1);
                })
            }
        };
        if let Err(e) = reverted {
            warn!("cannot undo {:?}: {}", entry, e);
            return Err(UndoError::HistoryMismatch);
        }

        self.history.pop();
        self.refresh_status();
        debug!("undid {:?}", entry);
        Ok(entry)
    }

    /// Send every card a foundation will take from the talon and tableau
    /// tops, until nothing more fits. Each card is a separate undoable move.
    pub fn auto_complete(&mut self) -> usize {
        let mut moved = 0;

        loop {
            let before = moved;

            let sources: Vec<PileId> = std::iter::once(PileId::Talon)
                .chain((0..NUM_TABLEAUS).map(PileId::Tableau))
                .collect();

            for src in sources {
                if self.is_won() {
                    return moved;
                }
                let Some(&card) = self.pile(src).and_then(|p| p.top()) else {
                    continue;
                };
                if !card.is_face_up() {
                    continue;
                }
                let target = (0..NUM_FOUNDATIONS)
                    .map(PileId::Foundation)
                    .find(|&f| {
                        let top = self.pile(f).and_then(|p| p.top()).copied();
                        rules::can_build_on_foundation(card, top)
                    });
                if let Some(dst) = target {
                    if self.attempt_move(src, 1, dst).is_ok() {
                        moved += 1;
                    }
                }
            }

            if moved == before {
                break;
            }
        }

        moved
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    /// Put the cards of `mv` back on its source. Fails without touching
    /// anything when the destination no longer holds `mv.count` cards.
    fn revert_move(&mut self, mv: Move) -> Result<(), MoveError> {
        if self.pile(mv.source).is_none() {
            return Err(MoveError::UnknownPile(mv.source));
        }
        let popped = self
            .pile_mut(mv.destination)
            .ok_or(MoveError::UnknownPile(mv.destination))?
            .pop_run(mv.count)?;

        let source = self
            .pile_mut(mv.source)
            .ok_or(MoveError::UnknownPile(mv.source))?;
        if mv.revealed {
            source.conceal_top();
        }
        source.push_run(popped.cards);
        Ok(())
    }

    /// Move `count` cards one at a time from the top of `from` to `to`,
    /// setting each one's face to `face_up`. Drawing and recycling both
    /// reverse the order of the cards moved.
    fn transfer_flipped(
        from: &mut Pile,
        to: &mut Pile,
        count: usize,
        face_up: bool,
    ) -> Result<(), MoveError> {
        let cards = from.pop_run(count)?.cards;
        to.push_run(cards.into_iter().rev().map(|mut c| {
            c.set_face_up(face_up);
            c
        }));
        Ok(())
    }

    fn refresh_status(&mut self) {
        let won = self.foundations.iter().all(|f| is_complete_foundation(f.cards()));
        self.status = if won {
            GameStatus::Won
        } else {
            GameStatus::InProgress
        };
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new(Config::default())
    }
}

/// Ace through King of a single suit, in order.
fn is_complete_foundation(cards: &[Card]) -> bool {
    cards.len() == Rank::ALL.len()
        && cards
            .iter()
            .zip(Rank::ALL)
            .all(|(c, rank)| c.rank() == rank && c.is_same_suit(cards[0]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Suit, full_deck};
    use crate::config::DrawMode;

    fn snapshot(state: &GameState) -> Vec<Vec<Card>> {
        PileId::all().map(|id| state.cards_of(id)).collect()
    }

    /// A dealt game from the canonical (unshuffled) deck.
    fn canonical_game() -> GameState {
        let mut state = GameState::default();
        state.deal(full_deck()).unwrap();
        state
    }

    /// A game with every card in the foundations except the King of Spades,
    /// which sits alone on the first tableau.
    fn nearly_won() -> GameState {
        let mut state = GameState::default();
        for (i, suit) in Suit::ALL.into_iter().enumerate() {
            let ranks = if suit == Suit::Spades {
                &Rank::ALL[..12]
            } else {
                &Rank::ALL[..]
            };
            state.foundations[i].push_run(ranks.iter().map(|&r| Card::face_up(suit, r)));
        }
        state.tableaus[0].push_run([Card::face_up(Suit::Spades, Rank::King)]);
        state
    }

    #[test]
    fn deal_lays_out_klondike() {
        let state = canonical_game();
        for (i, pile) in state.tableaus.iter().enumerate() {
            assert_eq!(pile.len(), i + 1);
            let (top, buried) = pile.cards().split_last().unwrap();
            assert!(top.is_face_up());
            assert!(buried.iter().all(|c| !c.is_face_up()));
        }
        assert_eq!(state.stock.len(), 24);
        assert!(state.stock.cards().iter().all(|c| !c.is_face_up()));
        assert!(state.talon.is_empty());
        assert!(state.foundations.iter().all(Pile::is_empty));
        assert_eq!(state.status(), GameStatus::InProgress);
    }

    #[test]
    fn deal_is_deterministic_in_deck_order() {
        let deck = full_deck();
        let mut a = GameState::default();
        let mut b = GameState::default();
        a.deal(deck.clone()).unwrap();
        b.deal(deck).unwrap();
        assert_eq!(snapshot(&a), snapshot(&b));

        // Row by row: the first seven cards are the bottoms of the seven columns.
        assert_eq!(a.tableaus[0].cards()[0].identity(), (Suit::Clubs, Rank::Ace));
        assert_eq!(a.tableaus[6].cards()[0].identity(), (Suit::Clubs, Rank::Seven));
        assert_eq!(a.tableaus[1].cards()[1].identity(), (Suit::Clubs, Rank::Eight));
    }

    #[test]
    fn deal_rejects_bad_decks() {
        let mut state = GameState::default();
        let mut short = full_deck();
        short.pop();
        assert_eq!(state.deal(short), Err(DealError::WrongSize(51)));

        let mut dup = full_deck();
        dup[1] = dup[0];
        assert_eq!(
            state.deal(dup),
            Err(DealError::DuplicateCard(Card::new(Suit::Clubs, Rank::Ace)))
        );
    }

    #[test]
    fn queen_on_empty_tableau_is_rejected_king_accepted() {
        let mut state = GameState::default();
        state.tableaus[1].push_run([Card::face_up(Suit::Hearts, Rank::Queen)]);
        state.tableaus[2].push_run([Card::face_up(Suit::Clubs, Rank::King)]);

        let before = snapshot(&state);
        assert_eq!(
            state.attempt_move(PileId::Tableau(1), 1, PileId::Tableau(0)),
            Err(MoveError::Illegal(IllegalReason::EmptyTableauRequiresKing))
        );
        assert_eq!(snapshot(&state), before);

        let report = state
            .attempt_move(PileId::Tableau(2), 1, PileId::Tableau(0))
            .unwrap();
        assert_eq!(report.destination.len(), 1);
        assert_eq!(state.tableaus[0].len(), 1);
    }

    #[test]
    fn rejection_is_repeatable_and_pure() {
        let mut state = canonical_game();
        let before = snapshot(&state);
        let first = state.attempt_move(PileId::Tableau(0), 1, PileId::Tableau(1));
        let second = state.attempt_move(PileId::Tableau(0), 1, PileId::Tableau(1));
        assert!(first.is_err());
        assert_eq!(first, second);
        assert_eq!(snapshot(&state), before);
        assert!(state.history().is_empty());

        assert_eq!(
            state.attempt_move(PileId::Tableau(3), 5, PileId::Tableau(1)),
            Err(MoveError::Insufficient(InsufficientCards {
                requested: 5,
                available: 4
            }))
        );
        assert_eq!(
            state.attempt_move(PileId::Tableau(3), 1, PileId::Tableau(3)),
            Err(MoveError::SamePile)
        );
    }

    #[test]
    fn move_and_undo_restore_reveal() {
        let mut state = GameState::default();
        state.tableaus[0].push_run([
            Card::new(Suit::Diamonds, Rank::Two),
            Card::face_up(Suit::Hearts, Rank::Seven),
        ]);
        state.tableaus[1].push_run([Card::face_up(Suit::Spades, Rank::Eight)]);
        let before = snapshot(&state);

        let report = state
            .attempt_move(PileId::Tableau(0), 1, PileId::Tableau(1))
            .unwrap();
        assert!(report.revealed);
        assert!(state.tableaus[0].top().unwrap().is_face_up());
        assert_eq!(report.destination.len(), 2);

        let entry = state.undo().unwrap();
        assert_eq!(
            entry,
            HistoryEntry::Move(Move {
                source: PileId::Tableau(0),
                destination: PileId::Tableau(1),
                count: 1,
                revealed: true,
            })
        );
        assert_eq!(snapshot(&state), before);
    }

    #[test]
    fn undo_with_empty_history_fails() {
        let mut state = canonical_game();
        let before = snapshot(&state);
        assert_eq!(state.undo(), Err(UndoError::EmptyHistory));
        assert!(!state.can_undo());
        assert_eq!(snapshot(&state), before);
    }

    #[test]
    fn unknown_piles_are_rejected_without_mutation() {
        let mut state = canonical_game();
        let before = snapshot(&state);

        assert_eq!(
            state.attempt_move(PileId::Tableau(0), 1, PileId::Tableau(7)),
            Err(MoveError::UnknownPile(PileId::Tableau(7)))
        );
        assert_eq!(
            state.attempt_move(PileId::Foundation(4), 1, PileId::Tableau(0)),
            Err(MoveError::UnknownPile(PileId::Foundation(4)))
        );
        assert_eq!(snapshot(&state), before);
        assert!(state.history().is_empty());

        assert!(state.pile(PileId::Foundation(4)).is_none());
        assert!(state.pile(PileId::Tableau(7)).is_none());
        assert!(state.cards_of(PileId::Tableau(7)).is_empty());
        assert_eq!(state.cards_of(PileId::Tableau(6)).len(), 7);
    }

    #[test]
    fn undo_refuses_a_history_that_no_longer_fits() {
        let mut state = GameState::default();
        state.tableaus[0].push_run([
            Card::new(Suit::Diamonds, Rank::Two),
            Card::face_up(Suit::Hearts, Rank::Seven),
        ]);
        state.tableaus[1].push_run([Card::face_up(Suit::Spades, Rank::Eight)]);
        state
            .attempt_move(PileId::Tableau(0), 1, PileId::Tableau(1))
            .unwrap();

        // Take the moved run away behind the history's back.
        state.tableaus[1].pop_run(2).unwrap();
        let before = snapshot(&state);

        assert_eq!(state.undo(), Err(UndoError::HistoryMismatch));
        assert_eq!(snapshot(&state), before);
        assert!(state.tableaus[0].top().unwrap().is_face_up());
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn undo_refuses_a_draw_whose_cards_are_gone() {
        let mut state = canonical_game();
        state.draw().unwrap();
        state.talon.pop_run(1).unwrap();
        let stock_len = state.stock.len();

        assert_eq!(state.undo(), Err(UndoError::HistoryMismatch));
        assert_eq!(state.stock.len(), stock_len);
        assert_eq!(state.history(), &[HistoryEntry::Draw { count: 1 }]);
    }

    #[test]
    fn draw_one_then_recycle_restores_stock_order() {
        let mut state = canonical_game();
        let stock_before = state.stock.cards().to_vec();

        for _ in 0..24 {
            assert_eq!(state.draw(), Ok(StockAction::Drew(1)));
        }
        assert!(state.stock.is_empty());
        assert!(state.talon.cards().iter().all(|c| c.is_face_up()));
        assert_eq!(
            state.talon.top().unwrap().identity(),
            stock_before[0].identity()
        );

        assert_eq!(state.draw(), Ok(StockAction::Recycled(24)));
        assert_eq!(state.stock.cards(), &stock_before[..]);
        assert_eq!(state.recycles(), 1);

        state.undo().unwrap();
        assert_eq!(state.talon.len(), 24);
        assert_eq!(state.recycles(), 0);
    }

    #[test]
    fn draw_three_moves_three_cards() {
        let mut state = GameState::new(Config {
            draw_mode: DrawMode::Three,
            ..Config::default()
        });
        state.deal(full_deck()).unwrap();
        let before = snapshot(&state);
        let top_three: Vec<Card> = state.stock.peek_run(3).unwrap().to_vec();

        assert_eq!(state.draw(), Ok(StockAction::Drew(3)));
        assert_eq!(state.talon.len(), 3);
        // The stock's top card is turned first and ends up at the bottom.
        assert_eq!(state.talon.cards()[0].identity(), top_three[2].identity());
        assert_eq!(state.talon.top().unwrap().identity(), top_three[0].identity());

        state.undo().unwrap();
        assert_eq!(snapshot(&state), before);
    }

    #[test]
    fn recycle_limit_is_enforced() {
        let mut state = GameState::new(Config {
            draw_mode: DrawMode::Three,
            recycle_limit: Some(1),
            ..Config::default()
        });
        state.deal(full_deck()).unwrap();
        for _ in 0..8 {
            assert!(matches!(state.draw(), Ok(StockAction::Drew(3))));
        }
        assert_eq!(state.draw(), Ok(StockAction::Recycled(24)));
        for _ in 0..8 {
            state.draw().unwrap();
        }
        assert_eq!(state.draw(), Err(StockError::RecycleLimitReached));
    }

    #[test]
    fn drawing_from_nothing_fails() {
        let mut state = GameState::default();
        assert_eq!(state.draw(), Err(StockError::Empty));
    }

    #[test]
    fn win_is_detected_and_undoable() {
        let mut state = nearly_won();
        assert!(!state.is_won());

        let report = state
            .attempt_move(PileId::Tableau(0), 1, PileId::Foundation(3))
            .unwrap();
        assert!(report.won);
        assert_eq!(state.status(), GameStatus::Won);
        assert_eq!(state.draw(), Err(StockError::GameOver));

        state.undo().unwrap();
        assert_eq!(state.status(), GameStatus::InProgress);
    }

    #[test]
    fn undo_after_win_can_be_disabled() {
        let mut state = nearly_won();
        state.set_config(Config {
            undo_after_win: false,
            ..Config::default()
        });
        state
            .attempt_move(PileId::Tableau(0), 1, PileId::Foundation(3))
            .unwrap();
        assert!(!state.can_undo());
        assert_eq!(state.undo(), Err(UndoError::GameOver));
        assert_eq!(
            state.attempt_move(PileId::Foundation(3), 1, PileId::Tableau(0)),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn foundation_out_of_order_is_not_a_win() {
        let mut cards: Vec<Card> = Rank::ALL
            .iter()
            .map(|&r| Card::face_up(Suit::Hearts, r))
            .collect();
        assert!(is_complete_foundation(&cards));
        cards.swap(3, 4);
        assert!(!is_complete_foundation(&cards));
        assert!(!is_complete_foundation(&cards[..12]));
    }

    #[test]
    fn auto_complete_finishes_a_solved_layout() {
        let mut state = GameState::default();
        for (i, suit) in Suit::ALL.into_iter().enumerate() {
            // Each suit stacked King at the bottom so the Ace is on top.
            state.tableaus[i].push_run(Rank::ALL.iter().rev().map(|&r| Card::face_up(suit, r)));
        }
        assert_eq!(state.auto_complete(), 52);
        assert!(state.is_won());
        assert_eq!(state.moves_made(), 52);
    }
}
