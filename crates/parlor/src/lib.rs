//! # Parlor
//!
//! A multi-room, multi-game real-time server. Clients connect over a
//! WebSocket, join or create a room, chat, and can boot any registered
//! turn-based game into the room. Each room runs as its own task and
//! serves its members until the last one leaves.
//!
//! This crate is the outer shell: the room directory, the HTTP join and
//! listing surface, and the per-connection reader/writer tasks. The room
//! runtime itself lives in `parlor-room`, the wire format in
//! `parlor-protocol`, and the reference games in `parlor-bravewength`
//! and `parlor-skull`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use parlor::{Game, Server};
//!
//! # async fn run(games: Vec<Arc<dyn Game>>) -> Result<(), Box<dyn std::error::Error>> {
//! let server = Server::new(games);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, server.router()).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod handler;
mod server;
mod socket;

pub use error::JoinError;
pub use server::Server;

// The types a host application needs to register and implement games.
pub use parlor_room::{Game, GameRegistry, GameState, Member};
