//! Bravewength: a word-association team game for Parlor rooms.
//!
//! Two teams, teal and purple, share a 5x5 board of words. Each team has a
//! *knower* who sees which words belong to whom and gives one-word clues,
//! and *seekers* who reveal cards based on those clues. Nine teal
//! discoveries win for teal, eight for purple; the lone black card loses
//! on the spot. Everyone else can watch as a spectator.
//!
//! The crate exports a single entry point, [`Bravewength`], which plugs
//! into a room's game registry.

mod board;
mod deck;
mod events;
mod game_state;
mod requests;
mod role;
mod state_messages;

use std::sync::Arc;

use parlor_room::{Game, GameState};

pub use board::{CardType, BOARD_SIZE};
pub use events::{EventKind, GameEvent};
pub use requests::{
    REQ_END_GAME, REQ_END_TURN, REQ_GIVE_CLUE, REQ_NEW_GAME, REQ_RANDOMIZE_TEAMS,
    REQ_REVEAL_CARD, REQ_SET_ROLE,
};
pub use role::{Role, Team};
pub use state_messages::{STATE_BOARD, STATE_ROLES};

use deck::{DEFAULT_DECK, MIN_DECK_SIZE};
use game_state::BravewengthState;

/// The registered game. One value serves every room; each boot deals an
/// independent instance.
pub struct Bravewength {
    deck: Arc<[String]>,
}

impl Bravewength {
    /// Builds the game around a word deck. An empty deck means "use the
    /// built-in one"; a custom deck shorter than the 200-word minimum is
    /// topped up from the built-in deck so boards stay varied.
    pub fn new(deck: Vec<String>) -> Bravewength {
        let deck: Arc<[String]> = if deck.is_empty() {
            DEFAULT_DECK.iter().map(|w| (*w).to_owned()).collect()
        } else if deck.len() >= MIN_DECK_SIZE {
            deck.into()
        } else {
            let mut padded = deck;
            padded.extend(
                DEFAULT_DECK
                    .iter()
                    .take(MIN_DECK_SIZE - padded.len())
                    .map(|w| (*w).to_owned()),
            );
            padded.into()
        };
        Bravewength { deck }
    }
}

impl Default for Bravewength {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Game for Bravewength {
    fn id(&self) -> &'static str {
        "bravewength"
    }

    fn version(&self) -> u32 {
        0
    }

    fn new_instance(&self) -> Box<dyn GameState> {
        Box::new(BravewengthState::new(Arc::clone(&self.deck)))
    }
}
