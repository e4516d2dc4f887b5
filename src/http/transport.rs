// transport.rs
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

// The hosting API rejects requests without a user agent.
const USER_AGENT: &str = concat!("miizy_sync/", env!("CARGO_PKG_VERSION"));

/// One outbound call: where to go, who we are, and what we accept back.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub url: String,
    pub bearer: String,
    pub accept: String,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(url: impl Into<String>, bearer: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bearer: bearer.into(),
            accept: mime::APPLICATION_JSON.to_string(),
            query: Vec::new(),
        }
    }

    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }
}

/// Status and raw body. Interpreting the status is left to the caller.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Debug, Error)]
#[error("network error: {0}")]
pub struct TransportError(pub String);

/// Blocking request/response seam shared by the fetcher and the publisher.
pub trait Transport {
    fn get(&self, req: &ApiRequest) -> Result<HttpReply, TransportError>;
    fn put_json(&self, req: &ApiRequest, body: &Value) -> Result<HttpReply, TransportError>;
}

pub struct ReqwestTransport {
    client: Client,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// `None` means calls have no deadline; the feed can take minutes to render.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        // reqwest's blocking client falls back to 30s unless told otherwise
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    fn send(&self, builder: RequestBuilder, req: &ApiRequest) -> Result<HttpReply, TransportError> {
        debug!(url = %req.url, timeout = ?self.timeout, "sending request");
        let resp = builder
            .bearer_auth(&req.bearer)
            .header(ACCEPT, req.accept.as_str())
            .query(&req.query)
            .send()
            .map_err(|e| TransportError(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().map_err(|e| TransportError(e.to_string()))?;

        Ok(HttpReply { status, body })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, req: &ApiRequest) -> Result<HttpReply, TransportError> {
        self.send(self.client.get(&req.url), req)
    }

    fn put_json(&self, req: &ApiRequest, body: &Value) -> Result<HttpReply, TransportError> {
        self.send(self.client.put(&req.url).json(body), req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serves one response whose body arrives `delay` after the headers.
    fn slow_server(delay: Duration) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/feed", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let body = r#"{"data":[]}"#;
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.flush().unwrap();
            thread::sleep(delay);
            // The client may already have hung up.
            let _ = stream.write_all(body.as_bytes());
        });

        (url, handle)
    }

    #[test]
    fn default_client_has_no_deadline() {
        let transport = ReqwestTransport::new(None).unwrap();
        assert_eq!(transport.timeout, None);

        let (url, server) = slow_server(Duration::from_millis(1500));
        let reply = transport.get(&ApiRequest::new(url, "token")).unwrap();
        server.join().unwrap();

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, r#"{"data":[]}"#);
    }

    #[test]
    fn explicit_timeout_cuts_a_slow_body() {
        let transport = ReqwestTransport::new(Some(Duration::from_millis(200))).unwrap();

        let (url, server) = slow_server(Duration::from_millis(1500));
        let result = transport.get(&ApiRequest::new(url, "token"));
        server.join().unwrap();

        assert!(result.is_err());
    }
}
