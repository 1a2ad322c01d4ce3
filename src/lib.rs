//! EOS game server library.
//!
//! Hosts EOS games for two remote players. The rules live in
//! [`eos_rules`]; this crate seats players, routes their actions to the
//! authoritative engine and answers every accepted action with a full
//! snapshot.
//!
//! # Architecture
//!
//! - **Config**: TOML server settings, rule table and layout paths, scoring
//! - **Session**: per-game seats, turn ownership, resignation and timeouts
//! - **Server**: axum HTTP routes over the session manager
//!
//! # Example
//!
//! ```
//! use eos::SessionManager;
//! use eos_rules::{Action, PieceId};
//!
//! # fn main() -> Result<(), eos::SessionError> {
//! let manager = SessionManager::standard()?;
//! let id = manager.create_session(None)?;
//! manager.register_player(&id, "alice".into(), "Alice".into())?;
//! manager.register_player(&id, "bob".into(), "Bob".into())?;
//!
//! let snapshot = manager.act(&id, "alice", Action::Select { piece: PieceId(10) })?;
//! assert_eq!(snapshot.active_piece, Some(PieceId(10)));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod server;
mod session;

// Crate-level exports - Configuration
pub use config::{CONFIG_ENV, ConfigError, EosConfig};

// Crate-level exports - Sessions
pub use session::{
    GameSession, Player, PlayerId, Scores, SessionError, SessionId, SessionManager,
};

// Crate-level exports - HTTP server
pub use server::{
    ActionRequest, CreateSessionRequest, CreateSessionResponse, ErrorBody, JoinRequest,
    ResignRequest, router, serve,
};
