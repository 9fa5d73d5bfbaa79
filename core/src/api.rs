//! The user-facing OneSignal client.

use std::fmt;

use serde_json::Value;
use tracing::{debug, trace};

use crate::client::OneSignalCore;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::HttpMethod;
use crate::transport::Transport;
#[cfg(feature = "ureq-transport")]
use crate::transport::UreqTransport;
use crate::types::Params;

/// Blocking client bound to one API key and, optionally, one app.
///
/// Each call is independent: build the request, send it over the
/// transport, decode the reply. Nothing changes between calls.
pub struct OneSignal<T> {
    config: ClientConfig,
    core: OneSignalCore,
    transport: T,
}

#[cfg(feature = "ureq-transport")]
impl OneSignal<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.get_timeout());
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> OneSignal<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let core = OneSignalCore::new(&config);
        Self {
            config,
            core,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `params` merged over the default app id to `url_or_path` and
    /// returns the decoded body of a 200 response.
    pub fn request(&self, method: HttpMethod, url_or_path: &str, params: Params) -> Result<Value> {
        let request = self.core.build_request(method, url_or_path, params)?;
        debug!(method = %request.method, url = %request.url, "sending OneSignal request");
        trace!(query = ?request.query, body = ?request.body, "request payload");

        let response = self.transport.send(&request).map_err(Error::Transport)?;
        trace!(status = response.status, body = %response.body_text(), "response received");

        self.core.parse_response(&response).map_err(|err| {
            debug!(status = response.status, error = %err, "OneSignal request failed");
            Error::Api(err)
        })
    }

    pub fn get(&self, url_or_path: &str, params: Params) -> Result<Value> {
        self.request(HttpMethod::Get, url_or_path, params)
    }

    pub fn post(&self, url_or_path: &str, params: Params) -> Result<Value> {
        self.request(HttpMethod::Post, url_or_path, params)
    }

    pub fn put(&self, url_or_path: &str, params: Params) -> Result<Value> {
        self.request(HttpMethod::Put, url_or_path, params)
    }

    pub fn delete(&self, url_or_path: &str, params: Params) -> Result<Value> {
        self.request(HttpMethod::Delete, url_or_path, params)
    }

    /// Default app id for requests and `apps_details`.
    pub(crate) fn app_id(&self) -> Option<&str> {
        self.core.app_id()
    }
}

impl<T: fmt::Debug> fmt::Debug for OneSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneSignal")
            .field("config", &self.config)
            .field("transport", &self.transport)
            .finish()
    }
}
