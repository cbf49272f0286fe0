//! Blocking `Transport` backed by a `ureq` agent.

use tracing::debug;

use crate::config::ClientConfig;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

/// Executes requests with a shared `ureq::Agent`.
///
/// The agent is configured with `http_status_as_error(false)` so 4xx/5xx
/// responses come back as data and the client classifies them itself.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    user_agent: String,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout()))
            .build()
            .new_agent();
        Self {
            agent,
            user_agent: config.user_agent.clone(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match (req.method, req.body.as_deref()) {
            (HttpMethod::Get, _) => {
                let mut builder = self.agent.get(&req.url).header("user-agent", &self.user_agent);
                for (name, value) in &req.headers {
                    builder = builder.header(name, value);
                }
                builder.call()
            }
            (HttpMethod::Post, body) => {
                let mut builder = self.agent.post(&req.url).header("user-agent", &self.user_agent);
                for (name, value) in &req.headers {
                    builder = builder.header(name, value);
                }
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError(format!("reading response body: {e}")))?;
        debug!(status, bytes = body.len(), "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
