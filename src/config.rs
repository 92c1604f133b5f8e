use anyhow::{anyhow, Result};
use rand::RngCore;
use serde::Deserialize;
use std::path::Path;

use crate::otp::{MAX_TTL_SECS, MIN_TTL_SECS};

const DEFAULT_OTP_ADDR: &str = "127.0.0.1:8077";
const DEFAULT_OTP_INTERVAL_SECS: u64 = 600;
const DEFAULT_OTP_DRIFT_STEPS: u32 = 1;
const MIN_SECRET_BYTES: usize = 16;

#[derive(Debug, Deserialize, Default)]
struct OtpdConfigFile {
    addr: Option<String>,
    secret_hex: Option<String>,
    interval_secs: Option<u64>,
    drift_steps: Option<u32>,
}

/// Runtime configuration for the OTP daemon.
///
/// Loaded from an optional JSON file (`CIVIC_OTP_CONFIG`), then overridden
/// by environment variables, then validated. When no secret is configured
/// a random one is generated for the process lifetime; codes then do not
/// survive a restart.
#[derive(Debug, Clone)]
pub struct OtpdConfig {
    pub addr: String,
    pub secret: Vec<u8>,
    pub interval_secs: u64,
    pub drift_steps: u32,
    /// True when the secret was generated rather than configured.
    pub generated_secret: bool,
}

impl OtpdConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("CIVIC_OTP_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: OtpdConfigFile) -> Result<Self> {
        let addr = file.addr.unwrap_or_else(|| DEFAULT_OTP_ADDR.to_string());
        let (secret, generated_secret) = match file.secret_hex.as_deref() {
            Some(raw) => (decode_secret(raw)?, false),
            None => (Vec::new(), true),
        };
        Ok(Self {
            addr,
            secret,
            interval_secs: file.interval_secs.unwrap_or(DEFAULT_OTP_INTERVAL_SECS),
            drift_steps: file.drift_steps.unwrap_or(DEFAULT_OTP_DRIFT_STEPS),
            generated_secret,
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(addr) = std::env::var("CIVIC_OTP_ADDR") {
            self.addr = addr;
        }
        if let Ok(secret) = std::env::var("CIVIC_OTP_SECRET") {
            self.secret = decode_secret(secret.trim())?;
            self.generated_secret = false;
        }
        if let Ok(interval) = std::env::var("CIVIC_OTP_INTERVAL_SECS") {
            self.interval_secs = interval
                .parse()
                .map_err(|_| anyhow!("CIVIC_OTP_INTERVAL_SECS must be an integer"))?;
        }
        if let Ok(drift) = std::env::var("CIVIC_OTP_DRIFT_STEPS") {
            self.drift_steps = drift
                .parse()
                .map_err(|_| anyhow!("CIVIC_OTP_DRIFT_STEPS must be an integer"))?;
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        if !(MIN_TTL_SECS..=MAX_TTL_SECS).contains(&self.interval_secs) {
            return Err(anyhow!(
                "otp interval must be within {MIN_TTL_SECS}..={MAX_TTL_SECS} seconds, got {}",
                self.interval_secs
            ));
        }
        if self.drift_steps > 4 {
            return Err(anyhow!(
                "otp drift window of {} steps is too permissive (max 4)",
                self.drift_steps
            ));
        }
        if self.secret.is_empty() {
            let mut secret = vec![0u8; 32];
            rand::thread_rng().fill_bytes(&mut secret);
            self.secret = secret;
            self.generated_secret = true;
        }
        Ok(())
    }
}

fn decode_secret(raw: &str) -> Result<Vec<u8>> {
    let secret = hex::decode(raw).map_err(|e| anyhow!("otp secret is not valid hex: {e}"))?;
    if secret.len() < MIN_SECRET_BYTES {
        return Err(anyhow!(
            "otp secret must be at least {MIN_SECRET_BYTES} bytes, got {}",
            secret.len()
        ));
    }
    Ok(secret)
}

fn read_config_file(path: &Path) -> Result<OtpdConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
