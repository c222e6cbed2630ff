//! Stateless session handling.
//!
//! - [`token`] - Signing and verifying session tokens
//! - [`cookie`] - Session cookie construction
//! - [`gate`] - Per-request authentication decision

pub mod cookie;
pub mod gate;
pub mod token;

// Re-export commonly used items for convenience
pub use cookie::{expired_session_cookie, session_cookie, SESSION_COOKIE};
pub use gate::{AuthenticatedUser, SessionGate};
pub use token::SessionCodec;
