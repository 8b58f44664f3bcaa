//! Explicit login session for dashboard and CLI front-ends.
//!
//! A [`Session`] is a plain value: restore it from a [`SessionStore`] at startup, pass it
//! to whatever needs the current user, and clear it on logout.

pub mod error;
pub mod session;
pub mod store;

pub use error::SessionError;
pub use session::{AuthProvider, Session, User};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
