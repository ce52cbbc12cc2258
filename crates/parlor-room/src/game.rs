//! The game host contract: how a room hosts a pluggable turn-based game.

use std::collections::HashMap;
use std::sync::Arc;

use crate::Member;

/// A live game instance, owned by exactly one room.
///
/// Every method runs on the owning room's loop, never concurrently.
/// Member references are borrowed for the duration of the call only —
/// implementations must not stash them. Outbound state goes straight to
/// [`Member::send`]; frames should carry the game scope byte (use
/// `parlor_protocol::alloc_game_frame`) because the room forwards them
/// untouched.
pub trait GameState: Send + 'static {
    /// Called once, right after the factory produced this instance, with
    /// every member currently in the room.
    fn initialize(&mut self, members: &[Arc<Member>]);

    /// Called when a member joins the room mid-game so they can be brought
    /// up to speed.
    fn admit(&mut self, member: &Member);

    /// Called for each inbound game-scope frame. `payload` is the frame
    /// minus the scope byte; byte 0 is the game's own opcode. Invalid
    /// payloads are dropped without feedback.
    fn handle(&mut self, members: &[Arc<Member>], source: &Member, payload: &[u8]);

    /// Called when the game is killed, before the instance is dropped.
    fn teardown(&mut self);
}

/// A registered game implementation: a stable id plus a factory that makes
/// an independent [`GameState`] per room. Instances never share memory;
/// the factory itself must be freely shareable across rooms.
pub trait Game: Send + Sync + 'static {
    /// Identifies the game on the wire (`boot-game` body, `set-game`
    /// payload). Must be unique within a registry and at most 255 bytes.
    fn id(&self) -> &'static str;

    /// Bumped whenever the game's request/state wire contract changes.
    fn version(&self) -> u32;

    /// Produces a fresh instance for one room.
    fn new_instance(&self) -> Box<dyn GameState>;
}

/// Read-only map from game id to implementation, shared by every room.
pub struct GameRegistry {
    games: HashMap<&'static str, Arc<dyn Game>>,
}

impl GameRegistry {
    pub fn new(games: impl IntoIterator<Item = Arc<dyn Game>>) -> Self {
        let mut map = HashMap::new();
        for game in games {
            map.insert(game.id(), game);
        }
        Self { games: map }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Game>> {
        self.games.get(id)
    }

    /// Ids of every registered game, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.games.keys().copied()
    }
}
