#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the authgate application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod session;
pub mod settings;

/// Re-export commonly used items
pub use error::AuthError;
pub use models::{CanonicalIdentity, Provider};
pub use providers::ProviderRegistry;
pub use session::{AuthenticatedUser, SessionCodec, SessionGate};
pub use settings::AuthgateSettings;
