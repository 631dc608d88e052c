//! Device pairing types.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;

/// Lifecycle state of a pairing.
///
/// `Pending → Authorized → Consumed`, plus `Pending → Expired` once the
/// device code outlives its TTL. `Expired` and `Consumed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingStatus {
    Pending,
    Authorized,
    Expired,
    Consumed,
}

impl PairingStatus {
    /// Wire representation used in JSON bodies.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Authorized => "authorized",
            Self::Expired => "expired",
            Self::Consumed => "consumed",
        }
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Expired | Self::Consumed)
    }
}

impl std::fmt::Display for PairingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One device pairing attempt.
#[derive(Debug, Clone)]
pub struct PairingRecord {
    pub device_code: String,
    pub user_code: String,
    /// Stored status. Expiry is never written here; see [`Self::effective_status`].
    pub status: PairingStatus,
    pub created_at: Instant,
    /// Wall-clock creation time, for display only.
    pub issued_at: DateTime<Utc>,
    pub expires_in: Duration,
}

impl PairingRecord {
    /// Check if the device code has outlived its TTL.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.expires_in
    }

    /// Stored status with time-based expiry applied to pending records.
    pub fn effective_status(&self) -> PairingStatus {
        if self.status == PairingStatus::Pending && self.is_expired() {
            PairingStatus::Expired
        } else {
            self.status
        }
    }

    /// Seconds left before the device code expires, floored at zero.
    pub fn remaining_secs(&self) -> u64 {
        self.expires_in.saturating_sub(self.created_at.elapsed()).as_secs()
    }
}

/// What an approval did to the matched pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApproveOutcome {
    /// `Pending → Authorized` happened now.
    Authorized,
    /// An earlier approval already authorized it.
    AlreadyAuthorized,
    Expired,
    Consumed,
}

impl ApproveOutcome {
    /// Status of the pairing after the approval.
    #[must_use]
    pub const fn status(self) -> PairingStatus {
        match self {
            Self::Authorized | Self::AlreadyAuthorized => PairingStatus::Authorized,
            Self::Expired => PairingStatus::Expired,
            Self::Consumed => PairingStatus::Consumed,
        }
    }
}

/// Result of starting a pairing, handed back to the client.
#[derive(Debug, Clone)]
pub struct PairingGrant {
    pub device_code: String,
    pub user_code: String,
    pub expires_in: u64,
    pub interval: u64,
}

/// A token pair returned from redemption or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

/// Read-only view of a live pairing for the landing page.
#[derive(Debug, Clone)]
pub struct PairingSummary {
    pub user_code: String,
    pub status: PairingStatus,
    pub issued_at: DateTime<Utc>,
    pub remaining_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(expires_in: Duration) -> PairingRecord {
        PairingRecord {
            device_code: "dc".into(),
            user_code: "SWIFT-0000".into(),
            status: PairingStatus::Pending,
            created_at: Instant::now(),
            issued_at: Utc::now(),
            expires_in,
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_value(PairingStatus::Authorized).unwrap(), "authorized");
        assert_eq!(PairingStatus::Expired.to_string(), "expired");
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_only_applies_to_pending() {
        let mut rec = record(Duration::from_secs(10));
        assert_eq!(rec.effective_status(), PairingStatus::Pending);
        assert_eq!(rec.remaining_secs(), 10);

        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(rec.effective_status(), PairingStatus::Expired);
        assert_eq!(rec.remaining_secs(), 0);

        rec.status = PairingStatus::Authorized;
        assert_eq!(rec.effective_status(), PairingStatus::Authorized);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_expired_at_exact_ttl() {
        let rec = record(Duration::from_secs(10));
        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(!rec.is_expired());
    }
}
