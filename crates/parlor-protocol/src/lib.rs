//! Wire protocol for Parlor rooms.
//!
//! Every frame that crosses the wire — in either direction — starts with a
//! one-byte *scope* that says who interprets the rest:
//!
//! - [`SCOPE_ROOM`]: the room runtime itself (membership, chat, game
//!   lifecycle). Byte 1 is an opcode ([`room_op`]) on the way in and a
//!   state kind ([`room_state`]) on the way out.
//! - [`SCOPE_GAME`]: the game instance currently booted into the room.
//!   Everything after the scope byte is the game's private contract.
//!
//! Room-scope messages are hand-encoded binary: big-endian integers,
//! single-byte length prefixes for strings, no delimiters. The encoders in
//! this crate are pure functions from state to `Vec<u8>` so they can be
//! tested byte-for-byte without a room in sight.

mod chat;
mod messages;

pub use chat::{ChatBuffer, CHAT_LINE_MAX, CHAT_SCROLLBACK};
pub use messages::{
    alloc_game_frame, encode_all_chat, encode_delete_members, encode_init, encode_new_chat,
    encode_set_game, encode_set_members,
};

/// Scope byte for frames handled by the room runtime.
pub const SCOPE_ROOM: u8 = 0;

/// Scope byte for frames handed to the current game instance.
pub const SCOPE_GAME: u8 = 1;

/// Client-to-server opcodes within room scope (frame byte 1).
pub mod room_op {
    /// Body is the member's new display name (UTF-8, 1..=255 bytes).
    pub const SET_NAME: u8 = 0;
    /// Body is the id of a registered game to boot into the room.
    pub const BOOT_GAME: u8 = 1;
    /// No body. Tears down the current game, if any.
    pub const KILL_GAME: u8 = 2;
    /// Body is the chat line (1..=100 bytes).
    pub const CHAT_MESSAGE: u8 = 3;
}

/// Server-to-client message kinds within room scope (frame byte 1).
pub mod room_state {
    /// Room id, the recipient's client id, room name, current game id.
    pub const INIT: u8 = 0;
    /// One or more `(client id, name)` entries that joined or renamed.
    pub const SET_MEMBERS: u8 = 1;
    /// Client ids of members that left the room.
    pub const DELETE_MEMBERS: u8 = 2;
    /// Chat counter plus the retained scrollback, oldest line first.
    pub const ALL_CHAT: u8 = 3;
    /// One freshly accepted chat line.
    pub const NEW_CHAT: u8 = 4;
    /// Id of the game now running in the room; empty means none.
    pub const SET_GAME: u8 = 5;
}
