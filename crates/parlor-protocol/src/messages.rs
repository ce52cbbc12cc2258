//! Encoders for every room-scope message a room sends to clients.
//!
//! Each encoder sizes its buffer up front so a message is a single
//! allocation; broadcast fan-out then clones the finished bytes per
//! recipient instead of re-encoding.

use uuid::Uuid;

use crate::chat::ChatBuffer;
use crate::{room_state, SCOPE_GAME, SCOPE_ROOM};

/// First message a member receives after admission: which room this is,
/// which client id the server knows them by, the room's display name, and
/// the id of the game currently running (empty when there is none).
pub fn encode_init(room_id: u32, client_id: Uuid, room_name: &str, game_id: &str) -> Vec<u8> {
    let mut msg = Vec::with_capacity(2 + 4 + 16 + 1 + room_name.len() + 1 + game_id.len());
    msg.push(SCOPE_ROOM);
    msg.push(room_state::INIT);
    msg.extend_from_slice(&room_id.to_be_bytes());
    msg.extend_from_slice(client_id.as_bytes());
    msg.push(room_name.len() as u8);
    msg.extend_from_slice(room_name.as_bytes());
    msg.push(game_id.len() as u8);
    msg.extend_from_slice(game_id.as_bytes());
    msg
}

/// Announces members that joined or changed names. Names must already be
/// within the 255-byte bound enforced at the edges.
pub fn encode_set_members(members: &[(Uuid, &str)]) -> Vec<u8> {
    let body: usize = members.iter().map(|(_, name)| 16 + 1 + name.len()).sum();
    let mut msg = Vec::with_capacity(2 + body);
    msg.push(SCOPE_ROOM);
    msg.push(room_state::SET_MEMBERS);
    for (id, name) in members {
        msg.extend_from_slice(id.as_bytes());
        msg.push(name.len() as u8);
        msg.extend_from_slice(name.as_bytes());
    }
    msg
}

/// Announces members that left the room.
pub fn encode_delete_members(ids: &[Uuid]) -> Vec<u8> {
    let mut msg = Vec::with_capacity(2 + ids.len() * 16);
    msg.push(SCOPE_ROOM);
    msg.push(room_state::DELETE_MEMBERS);
    for id in ids {
        msg.extend_from_slice(id.as_bytes());
    }
    msg
}

/// The full retained chat history, sent once on admission.
pub fn encode_all_chat(chat: &ChatBuffer) -> Vec<u8> {
    let mut msg = Vec::with_capacity(2 + chat.encoded_len());
    msg.push(SCOPE_ROOM);
    msg.push(room_state::ALL_CHAT);
    chat.append_history(&mut msg);
    msg
}

/// A single accepted chat line.
pub fn encode_new_chat(sender: Uuid, content: &[u8]) -> Vec<u8> {
    let mut msg = Vec::with_capacity(2 + 16 + 1 + content.len());
    msg.push(SCOPE_ROOM);
    msg.push(room_state::NEW_CHAT);
    msg.extend_from_slice(sender.as_bytes());
    msg.push(content.len() as u8);
    msg.extend_from_slice(content);
    msg
}

/// The id of the game now occupying the room; an empty id means the room
/// has gone back to the lobby.
pub fn encode_set_game(game_id: &str) -> Vec<u8> {
    let mut msg = Vec::with_capacity(2 + 1 + game_id.len());
    msg.push(SCOPE_ROOM);
    msg.push(room_state::SET_GAME);
    msg.push(game_id.len() as u8);
    msg.extend_from_slice(game_id.as_bytes());
    msg
}

/// Allocates a buffer for a game-scope message with the scope byte already
/// in place. Game implementations push their own kind byte and payload, and
/// should pass the payload size so the frame stays a single allocation.
pub fn alloc_game_frame(payload_len: usize) -> Vec<u8> {
    let mut msg = Vec::with_capacity(1 + payload_len);
    msg.push(SCOPE_GAME);
    msg
}
