//! Sys AI Box Mock Server
//!
//! A stand-in for the Sys AI Box used in SwiftSweep integration tests. It
//! implements a device-authorization flow in the style of OAuth 2.0 device
//! grants: a client obtains a user code, a human approves it in a web
//! console, and the client exchanges its device code for tokens.
//!
//! Tokens are random strings, not credentials; nothing is persisted.
//!
//! # Example
//!
//! ```no_run
//! use sysaibox_mock::{config::Config, server::MockServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     MockServer::new(config).run_http().await
//! }
//! ```

pub mod config;
pub mod error;
pub mod server;

pub use config::{Config, RedemptionPolicy};
pub use error::{PairingError, PairingResult};
pub use server::MockServer;
pub use server::pairing::{PairingStatus, PairingStore};
