//! Room runtime for Parlor.
//!
//! A room is an isolated Tokio task that owns everything inside it: the
//! member list, the chat scrollback, and at most one running game instance.
//! The outside world talks to it through three channels (register,
//! unregister, requests) and the room answers by pushing encoded frames
//! onto each member's bounded send queue. Nothing in a room needs a lock —
//! the loop is the only writer.

mod error;
mod game;
mod member;
mod room;

pub use error::RoomClosed;
pub use game::{Game, GameRegistry, GameState};
pub use member::{Member, SEND_QUEUE_CAPACITY};
pub use room::{Request, Room, RoomHandle, ROOM_MEMBER_CAP};
