//! In-memory transport that records requests and replays canned responses.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use onesignal_core::{ClientConfig, HttpRequest, HttpResponse, OneSignal, Transport, TransportError};
use serde_json::Value;

#[derive(Default)]
pub struct RecordingTransport {
    requests: RefCell<Vec<HttpRequest>>,
    responses: RefCell<VecDeque<HttpResponse>>,
}

impl RecordingTransport {
    pub fn reply(&self, status: u16, body: &str) {
        self.responses.borrow_mut().push_back(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn last(&self) -> HttpRequest {
        self.requests.borrow().last().cloned().expect("no request was sent")
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| "connection refused".into())
    }
}

pub const API_KEY: &str = "X";
pub const APP_ID: &str = "app-1";

pub fn client() -> OneSignal<RecordingTransport> {
    OneSignal::with_transport(
        ClientConfig::new(API_KEY).app_id(APP_ID),
        RecordingTransport::default(),
    )
}

/// Decoded JSON body of a non-GET request.
pub fn body(request: &HttpRequest) -> Value {
    serde_json::from_str(request.body.as_deref().expect("request has no body")).unwrap()
}

/// Query pairs sorted for order-independent comparison.
pub fn sorted_query(request: &HttpRequest) -> Vec<(String, String)> {
    let mut query = request.query.clone();
    query.sort();
    query
}
