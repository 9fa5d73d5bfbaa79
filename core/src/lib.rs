//! Blocking client for the OneSignal push-notification REST API.
//!
//! # Overview
//! `OneSignal` sends JSON requests authenticated with a REST API key and
//! returns decoded JSON bodies. Payloads are open parameter maps merged over
//! the configured app id; every failure the API reports comes back as one
//! `ApiError`.
//!
//! # Design
//! - `OneSignalCore` builds `HttpRequest` values and parses `HttpResponse`
//!   values without I/O, so the request/response pipeline is tested as data.
//! - `Transport` is the seam to the HTTP library. `UreqTransport` (feature
//!   `ureq-transport`, on by default) reuses one agent for every call.
//! - Endpoint methods (`notifications_create`, `devices`, ...) only pick a
//!   verb and a path.
//!
//! ```no_run
//! use onesignal_core::{params, ClientConfig, OneSignal};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), onesignal_core::Error> {
//! let client = OneSignal::new(ClientConfig::new("rest-api-key").app_id("app-id"));
//! let sent = client.notifications_create(params(json!({
//!     "included_segments": ["Subscribed Users"],
//!     "contents": {"en": "English Message"},
//! })))?;
//! println!("{}", sent["id"]);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
mod endpoints;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::OneSignal;
pub use client::OneSignalCore;
pub use config::ClientConfig;
pub use error::{ApiError, ApiErrorKind, Error, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, TransportError};
#[cfg(feature = "ureq-transport")]
pub use transport::UreqTransport;
pub use types::{params, DeviceType, Params};
