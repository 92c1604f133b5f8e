//! Time-based one-time-password issuance and verification.
//!
//! Port of the standalone OTP microservice. The original derived its TOTP
//! secret in a way that did not actually bind the code to the requester,
//! and verification scanned several hard-coded intervals; both are known
//! weaknesses, corrected here: the per-request key is an HMAC of the
//! server secret over `otp:<purpose>:<target>`, and verification uses the
//! single configured interval with a small drift window.
//!
//! The service is stateless: nothing is persisted between calls, so codes
//! do not survive a process restart unless the server secret is
//! configured externally.

use anyhow::{bail, Result};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

/// Accepted TTL bounds for generation requests, in seconds.
pub const MIN_TTL_SECS: u64 = 60;
pub const MAX_TTL_SECS: u64 = 1800;
pub const DEFAULT_TTL_SECS: u64 = 600;

const CODE_DIGITS: u32 = 6;

/// What the code authorizes. Closed set; anything else is rejected at the
/// request boundary.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OtpPurpose {
    Login,
    Signup,
}

impl fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtpPurpose::Login => f.write_str("login"),
            OtpPurpose::Signup => f.write_str("signup"),
        }
    }
}

/// A generated code and its advisory expiry timestamp.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OtpGrant {
    pub code: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: u64,
}

/// Stateless TOTP issuer/verifier.
#[derive(Clone)]
pub struct OtpService {
    secret: Vec<u8>,
    interval_secs: u64,
    drift_steps: u32,
}

impl OtpService {
    pub fn new(secret: Vec<u8>, interval_secs: u64, drift_steps: u32) -> Self {
        Self {
            secret,
            interval_secs,
            drift_steps,
        }
    }

    /// Generate a code for (target, purpose).
    ///
    /// `ttl_seconds` bounds the advisory `expiresAt`; the code itself is
    /// valid for the service's configured interval window.
    pub fn generate(&self, target: &str, purpose: OtpPurpose, ttl_seconds: u64) -> Result<OtpGrant> {
        if !(MIN_TTL_SECS..=MAX_TTL_SECS).contains(&ttl_seconds) {
            bail!(
                "ttl_seconds must be within {MIN_TTL_SECS}..={MAX_TTL_SECS}, got {ttl_seconds}"
            );
        }
        let now = unix_now()?;
        Ok(self.generate_at(target, purpose, ttl_seconds, now))
    }

    /// Verify a code for (target, purpose) against the configured interval,
    /// accepting `drift_steps` steps of clock skew in either direction.
    pub fn verify(&self, target: &str, purpose: OtpPurpose, code: &str) -> Result<bool> {
        let now = unix_now()?;
        Ok(self.verify_at(target, purpose, code, now))
    }

    fn generate_at(&self, target: &str, purpose: OtpPurpose, ttl_seconds: u64, now: u64) -> OtpGrant {
        let key = self.request_key(target, purpose);
        let counter = now / self.interval_secs;
        OtpGrant {
            code: code_for(&key, counter),
            expires_at: now + ttl_seconds,
        }
    }

    fn verify_at(&self, target: &str, purpose: OtpPurpose, code: &str, now: u64) -> bool {
        if code.len() != CODE_DIGITS as usize || !code.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        let key = self.request_key(target, purpose);
        let counter = now / self.interval_secs;
        let drift = u64::from(self.drift_steps);
        let lo = counter.saturating_sub(drift);
        let hi = counter + drift;
        (lo..=hi).any(|c| code_for(&key, c) == code)
    }

    /// Per-request key bound to both target and purpose.
    fn request_key(&self, target: &str, purpose: OtpPurpose) -> [u8; 32] {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("hmac accepts any key length");
        mac.update(format!("otp:{purpose}:{target}").as_bytes());
        mac.finalize().into_bytes().into()
    }
}

/// Standard TOTP dynamic truncation over the time counter.
fn code_for(key: &[u8; 32], counter: u64) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("hmac accepts any key length");
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = (u32::from(digest[offset]) & 0x7f) << 24
        | u32::from(digest[offset + 1]) << 16
        | u32::from(digest[offset + 2]) << 8
        | u32::from(digest[offset + 3]);
    format!("{:06}", binary % 10u32.pow(CODE_DIGITS))
}

fn unix_now() -> Result<u64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}
