//! Skull: a bidding and bluffing game for Parlor rooms.
//!
//! Up to six seats, each holding three roses and one skull, all face
//! down. Players take turns playing cards until someone bids how many
//! cards they can flip without hitting a skull. Win the flip, score a
//! point — two points wins the game. Flip a skull and its owner takes one
//! of your cards away, unseen.
//!
//! The crate exports a single entry point, [`Skull`], which plugs into a
//! room's game registry.

mod game_state;
mod hand;
mod requests;
mod state_messages;

use parlor_room::{Game, GameState};

pub use game_state::{Phase, MAX_PLAYERS};
pub use hand::{HandStatus, SkullStatus};
pub use requests::{
    REQ_ABORT, REQ_BID, REQ_DONE_SHUFFLING, REQ_JOIN, REQ_LEAVE, REQ_MOVE_CARD, REQ_PASS,
    REQ_PICK, REQ_PLAY, REQ_RESTART, REQ_TAKE_CARD,
};
pub use state_messages::{SKULL_NO_POS, SKULL_UNKNOWN, STATE_FULL};

use game_state::SkullState;

/// The registered game. One value serves every room; each boot deals an
/// independent table.
pub struct Skull;

impl Game for Skull {
    fn id(&self) -> &'static str {
        "skull"
    }

    fn version(&self) -> u32 {
        0
    }

    fn new_instance(&self) -> Box<dyn GameState> {
        Box::new(SkullState::new())
    }
}
