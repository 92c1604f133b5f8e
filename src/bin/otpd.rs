//! otpd - one-time-password microservice daemon.
//!
//! Serves `POST /generate`, `POST /verify` and `GET /health` on the
//! configured address. Independent of the analysis pipeline; hosted by
//! the same process boundary only.

use anyhow::Result;
use std::sync::mpsc;

use civic_lens::api::{ApiConfig, ApiServer};
use civic_lens::config::OtpdConfig;
use civic_lens::otp::OtpService;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = OtpdConfig::load()?;
    if cfg.generated_secret {
        log::warn!(
            "no otp secret configured; generated a process-lifetime secret \
             (codes will not survive a restart - set CIVIC_OTP_SECRET to persist)"
        );
    }

    let otp = OtpService::new(cfg.secret.clone(), cfg.interval_secs, cfg.drift_steps);
    let handle = ApiServer::new(ApiConfig { addr: cfg.addr }, otp).spawn()?;
    log::info!(
        "otp api listening on {} (interval {}s, drift {} steps)",
        handle.addr,
        cfg.interval_secs,
        cfg.drift_steps
    );

    let (tx, rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })
    .expect("error setting Ctrl-C handler");

    log::info!("otpd waiting for shutdown signal (Ctrl-C)...");
    let _ = rx.recv();
    log::info!("shutdown signal received, stopping otp api...");
    handle.stop()?;

    Ok(())
}
