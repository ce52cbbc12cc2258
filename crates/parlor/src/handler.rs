//! HTTP handlers: the join upgrade and the room listing.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use parlor_room::Member;

use crate::server::Server;
use crate::socket;
use crate::JoinError;

/// Display names (member and room) are length-prefixed with one byte on
/// the wire.
const MAX_NAME_LEN: usize = 255;

#[derive(Deserialize)]
pub(crate) struct JoinQuery {
    /// Display name for the joining member.
    name: String,
    /// `new` to create a room, else a decimal room id.
    room: String,
    /// Display name for the room; required with `room=new`.
    #[serde(rename = "room-name")]
    room_name: Option<String>,
}

enum RoomTarget {
    New(String),
    Existing(u32),
}

/// `GET /join?name=...&room=new&room-name=...` (or `room=<id>`).
///
/// Everything that can be validated is validated before the upgrade so
/// the client still gets a proper HTTP status. The `id` cookie carries
/// the client's stable identity; a missing or unreadable one gets a
/// fresh UUID issued on the upgrade response.
pub(crate) async fn join(
    State(server): State<Arc<Server>>,
    Query(query): Query<JoinQuery>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, JoinError> {
    if query.name.is_empty() {
        return Err(JoinError::EmptyName);
    }
    if query.name.len() > MAX_NAME_LEN {
        return Err(JoinError::NameTooLong);
    }

    let target = if query.room == "new" {
        match query.room_name.as_deref() {
            None | Some("") => return Err(JoinError::MissingRoomName),
            Some(name) if name.len() > MAX_NAME_LEN => return Err(JoinError::RoomNameTooLong),
            Some(name) => RoomTarget::New(name.to_owned()),
        }
    } else {
        let id: u32 = query.room.parse().map_err(|_| JoinError::BadRoomId)?;
        if !server.room_exists(id) {
            return Err(JoinError::RoomNotFound(id));
        }
        RoomTarget::Existing(id)
    };

    let (client_id, issue_cookie) = match cookie_client_id(&headers) {
        Some(id) => (id, false),
        None => (Uuid::new_v4(), true),
    };

    let name = query.name;
    let mut response = ws
        .max_message_size(socket::MAX_FRAME_SIZE)
        .on_upgrade(move |ws| serve_joined(server, ws, target, client_id, name))
        .into_response();

    if issue_cookie {
        // Hand the fresh identity back so a reconnect is the same person.
        let cookie = format!("id={client_id}; Path=/; SameSite=Strict; Secure");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    Ok(response)
}

/// Post-upgrade half of the join: resolve the room, register, serve.
async fn serve_joined(
    server: Arc<Server>,
    ws: WebSocket,
    target: RoomTarget,
    client_id: Uuid,
    name: String,
) {
    let room = match target {
        RoomTarget::New(room_name) => server.create_room(room_name),
        RoomTarget::Existing(id) => match server.lookup_room(id) {
            Some(handle) => handle,
            // Emptied and collected since the pre-upgrade check; the
            // client will see the close and can list rooms again.
            None => return,
        },
    };

    let (member, queue) = Member::new(client_id, name);
    if room.register(Arc::clone(&member)).await.is_err() {
        return;
    }

    tracing::debug!(client_id = %client_id, room_id = room.id(), "connection joined room");
    socket::run_session(ws, member, queue, room).await;
}

/// `GET /rooms` — id → display name of every open room.
pub(crate) async fn rooms(State(server): State<Arc<Server>>) -> Json<HashMap<u32, String>> {
    Json(server.room_listing())
}

/// Pulls the client id out of the `id` cookie, if it parses.
fn cookie_client_id(headers: &HeaderMap) -> Option<Uuid> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == "id").then(|| value.trim().parse().ok()).flatten()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_cookie_client_id_parses_among_other_cookies() {
        let id = Uuid::new_v4();
        let headers = headers_with_cookie(&format!("theme=dark; id={id}; lang=en"));
        assert_eq!(cookie_client_id(&headers), Some(id));
    }

    #[test]
    fn test_cookie_client_id_rejects_garbage() {
        assert_eq!(cookie_client_id(&HeaderMap::new()), None);
        assert_eq!(
            cookie_client_id(&headers_with_cookie("id=not-a-uuid")),
            None
        );
        assert_eq!(cookie_client_id(&headers_with_cookie("other=1")), None);
    }
}
