//! Errors surfaced by the HTTP join endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// A join request that never made it to the WebSocket upgrade. These map
/// straight onto HTTP status codes; once the upgrade has happened, errors
/// no longer have a channel and connections are simply closed.
#[derive(Debug, thiserror::Error)]
pub enum JoinError {
    #[error("missing or empty `name` query parameter")]
    EmptyName,

    #[error("display name is longer than 255 bytes")]
    NameTooLong,

    #[error("bad `room`: expected `new` or a decimal unsigned 32-bit id")]
    BadRoomId,

    #[error("room {0} does not exist")]
    RoomNotFound(u32),

    #[error("`room-name` is required when creating a room")]
    MissingRoomName,

    #[error("room name is longer than 255 bytes")]
    RoomNameTooLong,
}

impl JoinError {
    fn status(&self) -> StatusCode {
        match self {
            JoinError::RoomNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for JoinError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(JoinError::EmptyName.status(), StatusCode::BAD_REQUEST);
        assert_eq!(JoinError::BadRoomId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(JoinError::RoomNotFound(3).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_messages_name_the_parameter() {
        assert!(JoinError::EmptyName.to_string().contains("name"));
        assert!(JoinError::MissingRoomName.to_string().contains("room-name"));
        assert!(JoinError::RoomNotFound(7).to_string().contains('7'));
    }
}
