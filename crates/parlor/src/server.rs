//! The server: a directory of live rooms behind a reader/writer lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use parking_lot::RwLock;

use parlor_room::{Game, GameRegistry, Room, RoomHandle};

use crate::handler;

/// Top-level server state. Create one, mount [`Server::router`] on a
/// listener, and rooms take care of themselves: each one registers here
/// at creation and removes itself when its loop exits.
pub struct Server {
    registry: Arc<GameRegistry>,
    directory: RwLock<HashMap<u32, RoomHandle>>,
    next_room_id: AtomicU32,
}

impl Server {
    /// Builds a server hosting the given games.
    pub fn new(games: impl IntoIterator<Item = Arc<dyn Game>>) -> Arc<Server> {
        Arc::new(Server {
            registry: Arc::new(GameRegistry::new(games)),
            directory: RwLock::new(HashMap::new()),
            next_room_id: AtomicU32::new(1),
        })
    }

    /// The HTTP surface: `GET /join` upgrades to the room transport,
    /// `GET /rooms` lists what is open.
    pub fn router(self: &Arc<Server>) -> Router {
        Router::new()
            .route("/join", get(handler::join))
            .route("/rooms", get(handler::rooms))
            .with_state(Arc::clone(self))
    }

    /// Spawns a new room and tracks it until its loop exits.
    pub(crate) fn create_room(self: &Arc<Server>, name: String) -> RoomHandle {
        let id = self.next_room_id.fetch_add(1, Ordering::Relaxed);
        let (room, handle) = Room::new(id, name, Arc::clone(&self.registry));

        self.directory.write().insert(id, handle.clone());

        let server = Arc::clone(self);
        tokio::spawn(async move {
            room.run().await;
            server.directory.write().remove(&id);
            tracing::debug!(room_id = id, "room dropped from directory");
        });

        handle
    }

    pub(crate) fn lookup_room(&self, id: u32) -> Option<RoomHandle> {
        self.directory.read().get(&id).cloned()
    }

    pub(crate) fn room_exists(&self, id: u32) -> bool {
        self.directory.read().contains_key(&id)
    }

    /// Snapshot of open rooms as id → display name.
    pub fn room_listing(&self) -> HashMap<u32, String> {
        self.directory
            .read()
            .values()
            .map(|handle| (handle.id(), handle.name().to_owned()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> Arc<Server> {
        Server::new(std::iter::empty())
    }

    #[tokio::test]
    async fn test_room_ids_are_monotonic() {
        let server = server();
        let a = server.create_room("first".into());
        let b = server.create_room("second".into());
        assert!(b.id() > a.id());
    }

    #[tokio::test]
    async fn test_listing_reflects_directory() {
        let server = server();
        assert!(server.room_listing().is_empty());

        let handle = server.create_room("Lounge".into());
        let listing = server.room_listing();
        assert_eq!(listing.get(&handle.id()), Some(&"Lounge".to_owned()));
        assert!(server.room_exists(handle.id()));
        assert!(server.lookup_room(handle.id()).is_some());
        assert!(server.lookup_room(handle.id() + 100).is_none());
    }
}
