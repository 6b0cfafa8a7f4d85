//! Outbound mail relay.

use reqwest::blocking::Client;
use serde::Serialize;
use url::Url;

use super::ContactSubmission;
use crate::config::RelayConfig;
use crate::error::RelayError;

/// Delivers one contact submission.
///
/// Implementations are shared with the worker thread that performs the
/// request, hence `Send + Sync`.
pub trait RelayTransport: Send + Sync {
    fn send(&self, submission: &ContactSubmission) -> Result<(), RelayError>;
}

#[derive(Debug, Serialize)]
struct TemplateParams<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

/// Transactional email API client (EmailJS wire format).
#[derive(Debug, Clone)]
pub struct EmailRelay {
    client: Client,
    endpoint: Url,
    service_id: String,
    template_id: String,
    public_key: String,
}

impl EmailRelay {
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("spark-folio/", env!("CARGO_PKG_VERSION")));
        // Loopback relays (local testing) bypass system proxies.
        if is_loopback(&config.endpoint) {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(RelayError::Client)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            service_id: config.service_id.clone(),
            template_id: config.template_id.clone(),
            public_key: config.public_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request<'a>(&'a self, submission: &'a ContactSubmission) -> RelayRequest<'a> {
        RelayRequest {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: &self.public_key,
            template_params: TemplateParams {
                name: &submission.name,
                email: &submission.email,
                message: &submission.message,
            },
        }
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

impl RelayTransport for EmailRelay {
    fn send(&self, submission: &ContactSubmission) -> Result<(), RelayError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&self.request(submission))
            .send()?;

        let status = response.status();
        if status.is_success() {
            log::debug!("relay accepted message ({status})");
            return Ok(());
        }

        let body = response.text().unwrap_or_default();
        Err(RelayError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn config(endpoint: &str) -> RelayConfig {
        RelayConfig {
            endpoint: Url::parse(endpoint).unwrap(),
            service_id: "service_x".into(),
            template_id: "template_y".into(),
            public_key: "key_z".into(),
            timeout: Duration::from_secs(5),
        }
    }

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "Hello".into(),
        }
    }

    /// One-shot HTTP server: answers `status` and hands back the request body.
    fn serve_once(status: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).unwrap();
            tx.send(String::from_utf8(body).unwrap()).unwrap();

            let mut stream = stream;
            let reply = format!(
                "HTTP/1.1 {status}\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK"
            );
            stream.write_all(reply.as_bytes()).unwrap();
        });

        (format!("http://{addr}/api/v1.0/email/send"), rx)
    }

    #[test]
    fn test_request_shape() {
        let endpoint = "https://api.emailjs.com/api/v1.0/email/send";
        let relay = EmailRelay::new(&config(endpoint)).unwrap();
        let sub = submission();
        let json = serde_json::to_value(relay.request(&sub)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "service_id": "service_x",
                "template_id": "template_y",
                "user_id": "key_z",
                "template_params": {
                    "name": "Ada",
                    "email": "ada@example.com",
                    "message": "Hello"
                }
            })
        );
    }

    #[test]
    fn test_success_response() {
        let (url, body) = serve_once("200 OK");
        let relay = EmailRelay::new(&config(&url)).unwrap();
        relay.send(&submission()).unwrap();

        let received: serde_json::Value = serde_json::from_str(&body.recv().unwrap()).unwrap();
        assert_eq!(received["template_params"]["message"], "Hello");
    }

    #[test]
    fn test_non_success_is_rejected() {
        let (url, _body) = serve_once("400 Bad Request");
        let relay = EmailRelay::new(&config(&url)).unwrap();
        let err = relay.send(&submission()).unwrap_err();
        assert!(matches!(err, RelayError::Rejected { status: 400, ref body } if body == "OK"));
    }

    #[test]
    fn test_unreachable_is_network_error() {
        // Bind then drop to get a port nobody listens on.
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let relay = EmailRelay::new(&config(&format!("http://127.0.0.1:{port}/"))).unwrap();
        let err = relay.send(&submission()).unwrap_err();
        assert!(matches!(err, RelayError::Network(_) | RelayError::Timeout));
    }
}
