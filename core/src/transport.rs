//! Executes `HttpRequest`s against the network.
//!
//! The client is generic over `Transport` so the HTTP library stays an
//! external collaborator: tests plug in a recording transport and hosts with
//! their own HTTP stack can plug in theirs. Transport errors are returned
//! as-is and never reinterpreted as API errors.

use crate::http::{HttpRequest, HttpResponse};

/// Error produced by a transport below the HTTP layer.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

pub trait Transport {
    /// Performs one HTTP exchange. Non-2xx statuses are a successful
    /// exchange and must come back as `Ok`.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(feature = "ureq-transport")]
pub use self::ureq_transport::UreqTransport;

#[cfg(feature = "ureq-transport")]
mod ureq_transport {
    use std::fmt;
    use std::time::Duration;

    use ureq::Agent;

    use super::{Transport, TransportError};
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Largest response body read into memory. ureq's own default (10 MB)
    /// would turn a large error page into a transport failure.
    const MAX_BODY_BYTES: u64 = 256 * 1024 * 1024;

    /// Blocking transport over a single reused `ureq::Agent`.
    ///
    /// The agent keeps its connection pool for the transport's lifetime;
    /// clones share it.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: Agent,
    }

    impl UreqTransport {
        pub fn new(timeout: Option<Duration>) -> Self {
            let agent = Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(timeout)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new(None)
        }
    }

    impl From<Agent> for UreqTransport {
        /// Wraps a caller-configured agent. It must have
        /// `http_status_as_error(false)` so error statuses reach the parser.
        fn from(agent: Agent) -> Self {
            Self { agent }
        }
    }

    impl fmt::Debug for UreqTransport {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("UreqTransport").finish_non_exhaustive()
        }
    }

    fn with_parts<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        for (key, value) in &request.query {
            builder = builder.query(key.as_str(), value.as_str());
        }
        builder
    }

    impl Transport for UreqTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            let url = request.url.as_str();
            let body = request.body.as_deref().unwrap_or_default().as_bytes();

            let mut response = match request.method {
                HttpMethod::Get => with_parts(self.agent.get(url), request).call(),
                HttpMethod::Delete => with_parts(self.agent.delete(url), request).force_send_body().send(body),
                HttpMethod::Post => with_parts(self.agent.post(url), request).send(body),
                HttpMethod::Put => with_parts(self.agent.put(url), request).send(body),
            }?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response.body_mut().with_config().limit(MAX_BODY_BYTES).read_to_vec()?;

            Ok(HttpResponse { status, headers, body })
        }
    }
}
