//! Device pairing (OAuth 2.0 device flow style) for the mock box.
//!
//! ## Flow
//! 1. Client calls `POST /api/v1/auth/device/start` and shows the user code
//! 2. Client polls `GET /api/v1/auth/device/status` every `interval` seconds
//! 3. A human enters the user code at `/console`
//! 4. Client exchanges the device code at `POST /api/v1/auth/device/token`

pub mod handlers;
pub mod pages;
pub mod store;
pub mod types;

pub use store::{PairingSettings, PairingStore};
pub use types::{ApproveOutcome, PairingGrant, PairingStatus, PairingSummary, TokenPair};
