//! OTP HTTP round trip against a spawned server.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use civic_lens::api::{ApiConfig, ApiServer};
use civic_lens::otp::OtpService;

fn spawn_server() -> civic_lens::api::ApiHandle {
    let otp = OtpService::new(b"integration-test-secret".to_vec(), 600, 1);
    let cfg = ApiConfig {
        // Port 0: let the OS pick, the handle reports the bound address.
        addr: "127.0.0.1:0".to_string(),
    };
    ApiServer::new(cfg, otp).spawn().expect("spawn otp api")
}

fn request(addr: std::net::SocketAddr, method: &str, path: &str, body: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).expect("connect");
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let raw = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(raw.as_bytes()).expect("write request");
    let mut response = String::new();
    stream.read_to_string(&mut response).expect("read response");
    let status: u16 = response
        .split_whitespace()
        .nth(1)
        .expect("status code")
        .parse()
        .expect("numeric status");
    let payload = response
        .split("\r\n\r\n")
        .nth(1)
        .unwrap_or_default()
        .to_string();
    (status, payload)
}

#[test]
fn health_endpoint() {
    let handle = spawn_server();
    let (status, body) = request(handle.addr, "GET", "/health", "");
    assert_eq!(status, 200);
    assert_eq!(body, r#"{"status":"ok"}"#);
    handle.stop().unwrap();
}

#[test]
fn generate_then_verify_round_trip() {
    let handle = spawn_server();

    let (status, body) = request(
        handle.addr,
        "POST",
        "/generate",
        r#"{"target":"user@example.com","purpose":"login"}"#,
    );
    assert_eq!(status, 200, "generate failed: {body}");
    let grant: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(grant["status"], "success");
    let code = grant["code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 6);
    assert!(grant["expiresAt"].as_u64().unwrap() > 0);

    let verify_body = format!(
        r#"{{"target":"user@example.com","purpose":"login","code":"{code}"}}"#
    );
    let (status, body) = request(handle.addr, "POST", "/verify", &verify_body);
    assert_eq!(status, 200, "verify failed: {body}");
    assert_eq!(body, r#"{"status":"success"}"#);

    // Same code for a different purpose must not verify.
    let cross_body = format!(
        r#"{{"target":"user@example.com","purpose":"signup","code":"{code}"}}"#
    );
    let (status, body) = request(handle.addr, "POST", "/verify", &cross_body);
    assert_eq!(status, 400);
    assert_eq!(body, r#"{"detail":"Invalid or expired OTP"}"#);

    handle.stop().unwrap();
}

#[test]
fn generate_rejects_out_of_range_ttl() {
    let handle = spawn_server();
    let (status, body) = request(
        handle.addr,
        "POST",
        "/generate",
        r#"{"target":"t","purpose":"login","ttl_seconds":30}"#,
    );
    assert_eq!(status, 400);
    assert!(body.contains("ttl_seconds"));
    handle.stop().unwrap();
}

#[test]
fn invalid_purpose_is_a_bad_request() {
    let handle = spawn_server();
    let (status, _body) = request(
        handle.addr,
        "POST",
        "/generate",
        r#"{"target":"t","purpose":"reset"}"#,
    );
    assert_eq!(status, 400);
    handle.stop().unwrap();
}

#[test]
fn unknown_route_and_method() {
    let handle = spawn_server();
    let (status, _) = request(handle.addr, "POST", "/nope", "{}");
    assert_eq!(status, 404);
    let (status, _) = request(handle.addr, "GET", "/nope", "");
    assert_eq!(status, 404);
    // Known paths with the wrong method are 405, not 404.
    let (status, _) = request(handle.addr, "PUT", "/generate", "{}");
    assert_eq!(status, 405);
    let (status, _) = request(handle.addr, "GET", "/generate", "");
    assert_eq!(status, 405);
    let (status, _) = request(handle.addr, "POST", "/health", "{}");
    assert_eq!(status, 405);
    handle.stop().unwrap();
}
