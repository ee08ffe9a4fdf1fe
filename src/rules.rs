//! Move legality. Everything here is a pure function of the piles involved;
//! nothing is mutated.

use std::error::Error;
use std::fmt;

use crate::card::{Card, Rank};
use crate::pile::{Pile, PileKind};

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IllegalReason {
    /// The run is not face-up, descending and alternating in color, or is
    /// not the top of its source pile.
    RunNotOrdered,
    EmptyTableauRequiresKing,
    TableauRankColorMismatch,
    EmptyFoundationRequiresAce,
    FoundationSuitRankMismatch,
    /// Stock and talon never receive cards from a player move.
    InvalidDestinationKind,
    MultiCardToFoundation,
    /// A move of zero cards.
    EmptyRun,
    /// Cards cannot be moved directly out of the stock; they have to be drawn.
    InvalidSourceKind,
    /// Only the top card of the talon is playable.
    MultiCardFromTalon,
}

impl fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            IllegalReason::RunNotOrdered => "those cards do not form a movable run",
            IllegalReason::EmptyTableauRequiresKing => "only a King can go on an empty column",
            IllegalReason::TableauRankColorMismatch => {
                "a column builds down by one rank in alternating colors"
            }
            IllegalReason::EmptyFoundationRequiresAce => "a foundation must start with an Ace",
            IllegalReason::FoundationSuitRankMismatch => {
                "a foundation builds up by one rank in the same suit"
            }
            IllegalReason::InvalidDestinationKind => "cards cannot be moved onto the stock or talon",
            IllegalReason::MultiCardToFoundation => "only one card at a time goes to a foundation",
            IllegalReason::EmptyRun => "no cards selected",
            IllegalReason::InvalidSourceKind => "draw from the stock instead of moving from it",
            IllegalReason::MultiCardFromTalon => "only the top talon card can be played",
        };
        f.write_str(msg)
    }
}

impl Error for IllegalReason {}

/// Can `card` be placed on a foundation whose top card is `top` (or which
/// is empty)?
pub fn can_build_on_foundation(card: Card, top: Option<Card>) -> bool {
    foundation_check(card, top).is_ok()
}

/// A run is valid when every card is face-up and each card sits one rank
/// below, and in the opposite color to, the card beneath it.
pub fn is_valid_run(run: &[Card]) -> bool {
    run.iter().all(|c| c.is_face_up())
        && run
            .windows(2)
            .all(|w| w[1].is_ranked_before(w[0]) && w[1].is_opposite_color(w[0]))
}

/// Decide whether `run` may move from `source` to `destination`.
///
/// `run` is bottom-to-top and must be exactly the top of `source`.
pub fn validate(source: &Pile, run: &[Card], destination: &Pile) -> Result<(), IllegalReason> {
    let Some(&bottom) = run.first() else {
        return Err(IllegalReason::EmptyRun);
    };

    match source.kind() {
        PileKind::Stock => return Err(IllegalReason::InvalidSourceKind),
        PileKind::Talon if run.len() > 1 => return Err(IllegalReason::MultiCardFromTalon),
        _ => {}
    }

    if !destination.kind().accepts_player_moves() {
        return Err(IllegalReason::InvalidDestinationKind);
    }

    if source.peek_run(run.len()).ok() != Some(run) {
        return Err(IllegalReason::RunNotOrdered);
    }

    let top = destination.top().copied();
    match destination.kind() {
        PileKind::Tableau => {
            if !is_valid_run(run) {
                return Err(IllegalReason::RunNotOrdered);
            }
            tableau_check(bottom, top)
        }
        PileKind::Foundation => {
            if run.len() != 1 {
                return Err(IllegalReason::MultiCardToFoundation);
            }
            if !bottom.is_face_up() {
                return Err(IllegalReason::RunNotOrdered);
            }
            foundation_check(bottom, top)
        }
        PileKind::Stock | PileKind::Talon => Err(IllegalReason::InvalidDestinationKind),
    }
}

fn tableau_check(card: Card, top: Option<Card>) -> Result<(), IllegalReason> {
    match top {
        None if card.rank() == Rank::King => Ok(()),
        None => Err(IllegalReason::EmptyTableauRequiresKing),
        Some(top) if card.is_ranked_before(top) && card.is_opposite_color(top) => Ok(()),
        Some(_) => Err(IllegalReason::TableauRankColorMismatch),
    }
}

fn foundation_check(card: Card, top: Option<Card>) -> Result<(), IllegalReason> {
    match top {
        None if card.rank() == Rank::Ace => Ok(()),
        None => Err(IllegalReason::EmptyFoundationRequiresAce),
        Some(top) if top.is_ranked_before(card) && top.is_same_suit(card) => Ok(()),
        Some(_) => Err(IllegalReason::FoundationSuitRankMismatch),
    }
}
