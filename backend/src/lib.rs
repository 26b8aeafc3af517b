//! Live session server for two-player chess
//!
//! - `registry` - per-game groups of live connections, broadcast and inform
//! - `session` - command dispatch (CONNECT, MAKE_MOVE, LEAVE, RESIGN)
//! - `store` - identity, user and game persistence behind async traits
//! - `transport` - the outbound handle a connection is reached through
//! - `api` / `auth` / `ws` - HTTP and WebSocket surface

pub mod api;
pub mod auth;
pub mod error;
pub mod registry;
pub mod session;
pub mod store;
pub mod transport;
pub mod ws;

pub use api::{router, AppState};
pub use registry::ConnectionRegistry;
pub use session::SessionHandler;
pub use store::Stores;
