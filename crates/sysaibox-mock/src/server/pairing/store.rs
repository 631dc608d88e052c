//! In-memory device pairing store.
//!
//! One `RwLock` guards both the record map and the user-code index, so every
//! read-modify-write (start, approve, redeem, purge) runs as a single
//! critical section.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::types::{
    ApproveOutcome, PairingGrant, PairingRecord, PairingStatus, PairingSummary, TokenPair,
};
use crate::config::{Config, RedemptionPolicy};
use crate::error::{PairingError, PairingResult};

/// Random user-code candidates drawn before `start_pairing` gives up.
const MAX_USER_CODE_ATTEMPTS: usize = 32;

/// Upper bound on user-code width; a simple UUID has 12 random leading digits.
const MAX_USER_CODE_LEN: usize = 12;

/// Parameters of the device flow, copied out of [`Config`].
#[derive(Debug, Clone)]
pub struct PairingSettings {
    pub user_code_prefix: String,
    /// Hex digits after the prefix, clamped to `1..=12`.
    pub user_code_len: usize,
    pub device_code_ttl: Duration,
    pub poll_interval: Duration,
    pub token_ttl: Duration,
    pub redemption: RedemptionPolicy,
}

impl From<&Config> for PairingSettings {
    fn from(config: &Config) -> Self {
        Self {
            user_code_prefix: config.user_code_prefix.clone(),
            user_code_len: config.user_code_len,
            device_code_ttl: config.device_code_ttl,
            poll_interval: config.poll_interval,
            token_ttl: config.token_ttl,
            redemption: config.redemption,
        }
    }
}

impl Default for PairingSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

#[derive(Default)]
struct Records {
    by_device: HashMap<String, PairingRecord>,
    /// user code → device code
    by_user_code: HashMap<String, String>,
}

impl Records {
    /// A user code is free unless a live (non-terminal) pairing holds it.
    fn is_claimable(&self, user_code: &str) -> bool {
        self.by_user_code
            .get(user_code)
            .and_then(|device_code| self.by_device.get(device_code))
            .is_none_or(|r| r.effective_status().is_terminal())
    }
}

/// In-memory pairing state store.
#[derive(Clone)]
pub struct PairingStore {
    records: Arc<RwLock<Records>>,
    settings: Arc<PairingSettings>,
}

impl PairingStore {
    /// Create an empty store. The user-code prefix is stored uppercase.
    #[must_use]
    pub fn new(mut settings: PairingSettings) -> Self {
        settings.user_code_prefix = settings.user_code_prefix.trim().to_ascii_uppercase();
        settings.user_code_len = settings.user_code_len.clamp(1, MAX_USER_CODE_LEN);

        Self {
            records: Arc::new(RwLock::new(Records::default())),
            settings: Arc::new(settings),
        }
    }

    fn generate_device_code() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// `PREFIX-XXXX` where `XXXX` are uppercase hex digits of a random UUID.
    fn generate_user_code(&self) -> String {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        format!(
            "{}-{}",
            self.settings.user_code_prefix,
            hex[..self.settings.user_code_len].to_ascii_uppercase()
        )
    }

    fn generate_token(kind: &str) -> String {
        format!("{kind}_{}", uuid::Uuid::new_v4().simple())
    }

    fn mint_tokens(&self) -> TokenPair {
        TokenPair {
            access_token: Self::generate_token("access"),
            refresh_token: Self::generate_token("refresh"),
            expires_in: self.settings.token_ttl.as_secs(),
        }
    }

    /// Start a new pairing attempt.
    ///
    /// User codes held by expired or consumed pairings are reused. Fails with
    /// `CodeSpaceExhausted` when every drawn candidate belongs to a live pairing.
    pub async fn start_pairing(&self) -> PairingResult<PairingGrant> {
        let device_code = Self::generate_device_code();

        let mut records = self.records.write().await;

        let Some(user_code) = (0..MAX_USER_CODE_ATTEMPTS)
            .map(|_| self.generate_user_code())
            .find(|candidate| records.is_claimable(candidate))
        else {
            tracing::warn!(
                attempts = MAX_USER_CODE_ATTEMPTS,
                indexed = records.by_user_code.len(),
                "No free user code"
            );
            return Err(PairingError::CodeSpaceExhausted {
                attempts: MAX_USER_CODE_ATTEMPTS,
            });
        };

        records.by_user_code.insert(user_code.clone(), device_code.clone());
        records.by_device.insert(
            device_code.clone(),
            PairingRecord {
                device_code: device_code.clone(),
                user_code: user_code.clone(),
                status: PairingStatus::Pending,
                created_at: Instant::now(),
                issued_at: Utc::now(),
                expires_in: self.settings.device_code_ttl,
            },
        );

        tracing::info!(user_code = %user_code, "New device pairing started");

        Ok(PairingGrant {
            device_code,
            user_code,
            expires_in: self.settings.device_code_ttl.as_secs(),
            interval: self.settings.poll_interval.as_secs(),
        })
    }

    /// Current status of a device code.
    ///
    /// Unknown device codes report `Pending`, so a client polling before its
    /// record is visible sees a benign state.
    pub async fn status(&self, device_code: &str) -> PairingStatus {
        let records = self.records.read().await;
        let status = records
            .by_device
            .get(device_code)
            .map_or(PairingStatus::Pending, PairingRecord::effective_status);

        tracing::debug!(device_code = %device_code, status = %status, "Polled pairing status");
        status
    }

    /// Approve the pairing that carries `user_code` (case-insensitive).
    ///
    /// Only a live `Pending` record transitions to `Authorized`. Any other
    /// matched record is left as is; the outcome says which case applied.
    pub async fn approve(&self, user_code: &str) -> PairingResult<ApproveOutcome> {
        let code = user_code.trim().to_ascii_uppercase();

        let mut records = self.records.write().await;
        let Records {
            by_device,
            by_user_code,
        } = &mut *records;

        let Some(record) = by_user_code.get(&code).and_then(|dc| by_device.get_mut(dc)) else {
            tracing::warn!(user_code = %code, "Approval for unknown user code");
            return Err(PairingError::not_found(code));
        };

        let outcome = match record.effective_status() {
            PairingStatus::Pending => {
                record.status = PairingStatus::Authorized;
                tracing::info!(user_code = %code, "Device authorized");
                return Ok(ApproveOutcome::Authorized);
            }
            PairingStatus::Authorized => ApproveOutcome::AlreadyAuthorized,
            PairingStatus::Expired => ApproveOutcome::Expired,
            PairingStatus::Consumed => ApproveOutcome::Consumed,
        };

        tracing::info!(
            user_code = %code,
            outcome = ?outcome,
            "Approval left pairing unchanged"
        );
        Ok(outcome)
    }

    /// Exchange an authorized device code for a token pair.
    pub async fn redeem(&self, device_code: &str) -> PairingResult<TokenPair> {
        let mut records = self.records.write().await;

        let Some(record) = records.by_device.get_mut(device_code) else {
            tracing::warn!(device_code = %device_code, "Token request for unknown device code");
            return Err(PairingError::NotAuthorized);
        };

        let status = record.effective_status();
        if status != PairingStatus::Authorized {
            tracing::warn!(
                user_code = %record.user_code,
                status = %status,
                "Token request rejected"
            );
            return Err(PairingError::NotAuthorized);
        }

        if self.settings.redemption == RedemptionPolicy::SingleUse {
            record.status = PairingStatus::Consumed;
        }

        tracing::info!(user_code = %record.user_code, "Tokens issued for device");
        Ok(self.mint_tokens())
    }

    /// Issue a fresh token pair. The presented refresh token is not checked.
    #[must_use]
    pub fn refresh(&self) -> TokenPair {
        tracing::info!("Refreshed token pair");
        self.mint_tokens()
    }

    /// Revoke a token. Always succeeds; nothing is tracked.
    #[must_use]
    pub fn revoke(&self) -> bool {
        tracing::info!("Token revoked");
        true
    }

    /// Pending and authorized pairings, newest first.
    pub async fn active_pairings(&self) -> Vec<PairingSummary> {
        let records = self.records.read().await;
        let mut active: Vec<(Instant, PairingSummary)> = records
            .by_device
            .values()
            .filter(|r| !r.effective_status().is_terminal())
            .map(|r| {
                (
                    r.created_at,
                    PairingSummary {
                        user_code: r.user_code.clone(),
                        status: r.effective_status(),
                        issued_at: r.issued_at,
                        remaining_secs: r.remaining_secs(),
                    },
                )
            })
            .collect();

        active.sort_by(|a, b| b.0.cmp(&a.0));
        active.into_iter().map(|(_, summary)| summary).collect()
    }

    /// Number of retained records.
    pub async fn len(&self) -> usize {
        self.records.read().await.by_device.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.by_device.is_empty()
    }

    /// Drop expired and consumed records older than twice the device code TTL.
    ///
    /// Returns the number of records removed.
    pub async fn purge_stale(&self) -> usize {
        let retention = self.settings.device_code_ttl.saturating_mul(2);

        let mut records = self.records.write().await;
        let Records {
            by_device,
            by_user_code,
        } = &mut *records;

        let before = by_device.len();
        by_device.retain(|_, r| {
            let stale = r.effective_status().is_terminal() && r.created_at.elapsed() > retention;
            // A reused user code points at the newer pairing; leave that entry alone
            if stale && by_user_code.get(&r.user_code) == Some(&r.device_code) {
                by_user_code.remove(&r.user_code);
            }
            !stale
        });
        let removed = before - by_device.len();

        if removed > 0 {
            tracing::debug!(count = removed, "Cleaned up stale pairings");
        }
        removed
    }

    /// Start a background task that purges stale records every `interval`.
    pub fn start_cleanup_task(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                store.purge_stale().await;
            }
        })
    }
}

impl Default for PairingStore {
    fn default() -> Self {
        Self::new(PairingSettings::default())
    }
}

impl std::fmt::Debug for PairingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairingStore")
            .field("settings", &self.settings)
            .finish()
    }
}
