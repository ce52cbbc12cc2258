//! Error types for the room layer.

/// Returned when handing work to a room whose event loop has already
/// exited. The caller should treat the connection as orphaned and drop it;
/// there is nothing to retry.
#[derive(Debug, thiserror::Error)]
#[error("room {0} is closed")]
pub struct RoomClosed(pub u32);
