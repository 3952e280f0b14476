//! Transport seam for the Toggl API.
//!
//! The pipeline consumes the API as "fetch JSON given endpoint + query
//! params"; `TogglApi` is that seam, and `TogglHttpApi` is the blocking ureq
//! implementation behind it. Tests inject their own implementations.

use std::time::Duration;

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Blocking JSON GET against a Toggl endpoint. A failed request propagates as
/// an error; there is no retry at this layer.
pub trait TogglApi {
  fn get_json(&self, endpoint: &str, params: &[(&str, String)]) -> Result<serde_json::Value>;
}

/// Basic-auth header per the Toggl API docs: base64 of `<api_key>:api_token`.
pub fn build_api_auth(api_key: &str) -> String {
  let raw = format!("{api_key}:api_token");
  format!("Basic {}", STANDARD.encode(raw))
}

pub struct TogglHttpApi {
  agent: ureq::Agent,
  auth_header: String,
}

impl TogglHttpApi {
  /// The upstream API has no documented server-side deadline, so the agent
  /// carries an explicit request timeout.
  pub fn new(api_key: &str, timeout: Duration) -> Self {
    let agent = ureq::AgentBuilder::new().timeout(timeout).build();
    TogglHttpApi {
      agent,
      auth_header: build_api_auth(api_key),
    }
  }
}

impl TogglApi for TogglHttpApi {
  fn get_json(&self, endpoint: &str, params: &[(&str, String)]) -> Result<serde_json::Value> {
    let mut req = self
      .agent
      .get(endpoint)
      .set("Authorization", &self.auth_header)
      .set("Content-Type", "application/json");

    for (k, v) in params {
      req = req.query(k, v);
    }

    let response = req.call().with_context(|| format!("requesting {endpoint}"))?;

    response
      .into_json::<serde_json::Value>()
      .with_context(|| format!("decoding JSON from {endpoint}"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn api_auth_matches_known_value() {
    // base64("secret:api_token")
    assert_eq!(build_api_auth("secret"), "Basic c2VjcmV0OmFwaV90b2tlbg==");
  }

  #[test]
  fn http_error_path_is_an_error() {
    let api = TogglHttpApi::new("key", Duration::from_millis(250));
    let err = api
      .get_json("http://invalid.localdomain.invalid/", &[])
      .unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("invalid.localdomain.invalid"));
  }

  #[test]
  fn get_json_success_path_from_local_http() {
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    fn handle_client(mut stream: TcpStream) {
      let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(1)));
      let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(1)));
      let mut buf = [0u8; 1024];
      let _ = stream.read(&mut buf);
      let body = b"{\"total_count\":0,\"per_page\":50,\"data\":[]}";
      let resp = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        std::str::from_utf8(body).unwrap()
      );
      let _ = stream.write_all(resp.as_bytes());
    }

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
      if let Ok((stream, _)) = listener.accept() {
        handle_client(stream);
      }
    });

    let api = TogglHttpApi::new("key", Duration::from_secs(1));
    let url = format!("http://{}", addr);
    let v = api.get_json(&url, &[("page", "1".to_string())]).unwrap();
    handle.join().unwrap();
    assert_eq!(v.get("total_count").and_then(|c| c.as_u64()), Some(0));
  }
}
