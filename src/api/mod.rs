//! Minimal HTTP surface for the OTP service.
//!
//! Deliberately framework-free: a blocking accept loop over `TcpListener`
//! with a bounded request reader. The service is loopback-oriented; the
//! default bind address only accepts local peers.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::otp::{OtpPurpose, OtpService, DEFAULT_TTL_SECS};

const MAX_REQUEST_BYTES: usize = 8192;

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub addr: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8077".to_string(),
        }
    }
}

/// Running server handle. Dropping it leaks the thread; call
/// [`ApiHandle::stop`] for an orderly shutdown.
#[derive(Debug)]
pub struct ApiHandle {
    pub addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl ApiHandle {
    pub fn stop(mut self) -> Result<()> {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(join) = self.join.take() {
            join.join()
                .map_err(|_| anyhow!("otp api server thread panicked"))?;
        }
        Ok(())
    }
}

pub struct ApiServer {
    cfg: ApiConfig,
    otp: OtpService,
}

impl ApiServer {
    pub fn new(cfg: ApiConfig, otp: OtpService) -> Self {
        Self { cfg, otp }
    }

    pub fn spawn(self) -> Result<ApiHandle> {
        let configured_addr: SocketAddr = self.cfg.addr.parse()?;
        let listener = TcpListener::bind(configured_addr)?;
        let addr = listener.local_addr()?;
        listener.set_nonblocking(true)?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_thread = shutdown.clone();
        let otp = self.otp;
        let join = std::thread::spawn(move || {
            if let Err(err) = run_api(listener, otp, shutdown_thread) {
                log::error!("otp api stopped: {}", err);
            }
        });

        Ok(ApiHandle {
            addr,
            shutdown,
            join: Some(join),
        })
    }
}

fn run_api(listener: TcpListener, otp: OtpService, shutdown: Arc<AtomicBool>) -> Result<()> {
    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }
        match listener.accept() {
            Ok((stream, _)) => {
                if let Err(err) = handle_connection(stream, &otp) {
                    log::warn!("otp api request rejected: {}", err);
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                std::thread::sleep(Duration::from_millis(50));
                continue;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    target: String,
    purpose: OtpPurpose,
    #[serde(default = "default_ttl")]
    ttl_seconds: u64,
}

fn default_ttl() -> u64 {
    DEFAULT_TTL_SECS
}

#[derive(Debug, Deserialize)]
struct VerifyRequest {
    target: String,
    purpose: OtpPurpose,
    code: String,
}

fn handle_connection(mut stream: TcpStream, otp: &OtpService) -> Result<()> {
    let request = read_request(&mut stream)?;
    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/health") => {
            write_json_response(&mut stream, 200, r#"{"status":"ok"}"#)?;
        }
        ("POST", "/generate") => {
            let parsed: GenerateRequest = match serde_json::from_slice(&request.body) {
                Ok(parsed) => parsed,
                Err(err) => {
                    write_json_response(
                        &mut stream,
                        400,
                        &json!({ "detail": format!("invalid request body: {err}") }).to_string(),
                    )?;
                    return Ok(());
                }
            };
            match otp.generate(&parsed.target, parsed.purpose, parsed.ttl_seconds) {
                Ok(grant) => {
                    let body = json!({
                        "status": "success",
                        "code": grant.code,
                        "expiresAt": grant.expires_at,
                    });
                    write_json_response(&mut stream, 200, &body.to_string())?;
                }
                Err(err) => {
                    write_json_response(
                        &mut stream,
                        400,
                        &json!({ "detail": err.to_string() }).to_string(),
                    )?;
                }
            }
        }
        ("POST", "/verify") => {
            let parsed: VerifyRequest = match serde_json::from_slice(&request.body) {
                Ok(parsed) => parsed,
                Err(err) => {
                    write_json_response(
                        &mut stream,
                        400,
                        &json!({ "detail": format!("invalid request body: {err}") }).to_string(),
                    )?;
                    return Ok(());
                }
            };
            if otp.verify(&parsed.target, parsed.purpose, &parsed.code)? {
                write_json_response(&mut stream, 200, r#"{"status":"success"}"#)?;
            } else {
                write_json_response(&mut stream, 400, r#"{"detail":"Invalid or expired OTP"}"#)?;
            }
        }
        (_, "/health" | "/generate" | "/verify") => {
            write_json_response(&mut stream, 405, r#"{"detail":"method_not_allowed"}"#)?;
        }
        _ => {
            write_json_response(&mut stream, 404, r#"{"detail":"not_found"}"#)?;
        }
    }
    Ok(())
}

fn read_request(stream: &mut TcpStream) -> Result<HttpRequest> {
    stream.set_read_timeout(Some(Duration::from_secs(2)))?;
    let mut buf = [0u8; 1024];
    let mut data = Vec::new();
    let header_end = loop {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            return Err(anyhow!("connection closed mid-request"));
        }
        data.extend_from_slice(&buf[..n]);
        if data.len() > MAX_REQUEST_BYTES {
            return Err(anyhow!("request too large"));
        }
        if let Some(end) = find_header_end(&data) {
            break end;
        }
    };

    let header_text = String::from_utf8_lossy(&data[..header_end]).into_owned();
    let mut lines = header_text.split("\r\n");
    let request_line = lines.next().ok_or_else(|| anyhow!("empty request"))?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().ok_or_else(|| anyhow!("missing method"))?;
    let raw_path = parts.next().ok_or_else(|| anyhow!("missing path"))?;
    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((k, v)) = line.split_once(':') {
            headers.insert(k.trim().to_lowercase(), v.trim().to_string());
        }
    }

    let content_length: usize = headers
        .get("content-length")
        .map(|v| v.parse())
        .transpose()
        .map_err(|_| anyhow!("invalid content-length"))?
        .unwrap_or(0);
    let body_start = header_end + 4;
    if body_start + content_length > MAX_REQUEST_BYTES {
        return Err(anyhow!("request too large"));
    }
    while data.len() < body_start + content_length {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            return Err(anyhow!("connection closed mid-body"));
        }
        data.extend_from_slice(&buf[..n]);
    }
    let body = data[body_start..body_start + content_length].to_vec();

    let path = raw_path.split('?').next().unwrap_or(raw_path).to_string();
    Ok(HttpRequest {
        method: method.to_string(),
        path,
        body,
    })
}

fn find_header_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|w| w == b"\r\n\r\n")
}

fn write_json_response(stream: &mut TcpStream, status: u16, body: &str) -> Result<()> {
    let status_line = match status {
        200 => "HTTP/1.1 200 OK",
        400 => "HTTP/1.1 400 Bad Request",
        404 => "HTTP/1.1 404 Not Found",
        405 => "HTTP/1.1 405 Method Not Allowed",
        _ => "HTTP/1.1 500 Internal Server Error",
    };
    let header = format!(
        "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {len}\r\nCache-Control: no-store\r\n\r\n",
        len = body.len()
    );
    stream.write_all(header.as_bytes())?;
    stream.write_all(body.as_bytes())?;
    Ok(())
}

#[derive(Debug)]
struct HttpRequest {
    method: String,
    path: String,
    body: Vec<u8>,
}
