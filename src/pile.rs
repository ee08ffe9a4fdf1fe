use std::error::Error;
use std::fmt;
use std::str::FromStr;

use crate::card::Card;

/// Number of tableau piles.
pub const NUM_TABLEAUS: usize = 7;
/// Number of foundation piles (one per suit).
pub const NUM_FOUNDATIONS: usize = 4;

/// What a pile is used for; decides which moves it takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PileKind {
    Talon,
    Foundation,
    Tableau,
    Stock,
}

impl PileKind {
    /// Whether a player move may drop cards onto a pile of this kind.
    /// Stock and talon are only filled by dealing and drawing.
    pub fn accepts_player_moves(self) -> bool {
        matches!(self, PileKind::Foundation | PileKind::Tableau)
    }
}

/// Address of one of the 13 piles of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PileId {
    Stock,
    Talon,
    /// Foundation slot, 0-indexed.
    Foundation(usize),
    /// Tableau column, 0-indexed; column `i` is dealt `i + 1` cards.
    Tableau(usize),
}

impl PileId {
    pub fn kind(self) -> PileKind {
        match self {
            PileId::Stock => PileKind::Stock,
            PileId::Talon => PileKind::Talon,
            PileId::Foundation(_) => PileKind::Foundation,
            PileId::Tableau(_) => PileKind::Tableau,
        }
    }

    /// Every pile of a game: stock, talon, foundations, tableaus.
    pub fn all() -> impl Iterator<Item = PileId> {
        [PileId::Stock, PileId::Talon]
            .into_iter()
            .chain((0..NUM_FOUNDATIONS).map(PileId::Foundation))
            .chain((0..NUM_TABLEAUS).map(PileId::Tableau))
    }

    fn in_range(self) -> bool {
        match self {
            PileId::Foundation(i) => i < NUM_FOUNDATIONS,
            PileId::Tableau(i) => i < NUM_TABLEAUS,
            PileId::Stock | PileId::Talon => true,
        }
    }
}

impl fmt::Display for PileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PileId::Stock => write!(f, "s"),
            PileId::Talon => write!(f, "w"),
            PileId::Foundation(i) => write!(f, "f{}", i + 1),
            PileId::Tableau(i) => write!(f, "{}", i + 1),
        }
    }
}

impl FromStr for PileId {
    type Err = String;

    /// `s` stock, `w`/`t` talon, `f1`..`f4` foundations, `1`..`7` tableaus.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let id = match s.as_str() {
            "s" | "stock" => PileId::Stock,
            "w" | "t" | "talon" | "waste" => PileId::Talon,
            _ => {
                if let Some(rest) = s.strip_prefix('f') {
                    let n: usize = rest
                        .parse()
                        .map_err(|_| format!("'{}' is not a valid foundation", s))?;
                    PileId::Foundation(n.wrapping_sub(1))
                } else {
                    let n: usize = s
                        .parse()
                        .map_err(|_| format!("'{}' is not a valid pile", s))?;
                    PileId::Tableau(n.wrapping_sub(1))
                }
            }
        };
        if !id.in_range() {
            return Err(format!(
                "Pile '{}' out of range (tableaus 1–{}, foundations f1–f{})",
                s, NUM_TABLEAUS, NUM_FOUNDATIONS
            ));
        }
        Ok(id)
    }
}

/// A run was requested that is longer than the pile holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsufficientCards {
    pub requested: usize,
    pub available: usize,
}

impl fmt::Display for InsufficientCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requested {} card(s) but the pile holds {}",
            self.requested, self.available
        )
    }
}

impl Error for InsufficientCards {}

/// Cards removed by [`Pile::pop_run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popped {
    /// The removed cards, bottom-to-top.
    pub cards: Vec<Card>,
    /// Set when a tableau's new top card was turned face-up by the pop.
    pub revealed: bool,
}

/// An ordered stack of cards, bottom-to-top (the top card is the last one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pile {
    kind: PileKind,
    cards: Vec<Card>,
}

impl Pile {
    pub fn new(kind: PileKind) -> Self {
        Pile {
            kind,
            cards: Vec::new(),
        }
    }

    pub fn kind(&self) -> PileKind {
        self.kind
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The top card, if any.
    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }

    /// Append `run` in order. Legality is the caller's business.
    pub fn push_run<I: IntoIterator<Item = Card>>(&mut self, run: I) {
        self.cards.extend(run);
    }

    /// The top `count` cards without removing them.
    pub fn peek_run(&self, count: usize) -> Result<&[Card], InsufficientCards> {
        let start = self.run_start(count)?;
        Ok(&self.cards[start..])
    }

    /// Remove the top `count` cards, keeping their order. A tableau whose
    /// new top card is face-down gets it turned face-up.
    pub fn pop_run(&mut self, count: usize) -> Result<Popped, InsufficientCards> {
        let start = self.run_start(count)?;
        let cards: Vec<Card> = self.cards.drain(start..).collect();

        let mut revealed = false;
        if self.kind == PileKind::Tableau {
            if let Some(top) = self.cards.last_mut() {
                if !top.is_face_up() {
                    top.set_face_up(true);
                    revealed = true;
                }
            }
        }

        Ok(Popped { cards, revealed })
    }

    /// Turn the top card face-down again. Returns `false` on an empty pile.
    pub fn conceal_top(&mut self) -> bool {
        match self.cards.last_mut() {
            Some(top) => {
                top.set_face_up(false);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.cards.clear();
    }

    fn run_start(&self, count: usize) -> Result<usize, InsufficientCards> {
        self.cards
            .len()
            .checked_sub(count)
            .ok_or(InsufficientCards {
                requested: count,
                available: self.cards.len(),
            })
    }
}
