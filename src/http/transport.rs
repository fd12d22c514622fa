//! Transport collaborator contract
//!
//! The fetchers and classifiers never talk to the network directly. They
//! build a [`FetchRequest`] and hand it to a [`Transport`], which is either
//! the reqwest-backed [`StandardHttpClient`](super::client::StandardHttpClient)
//! or a test double.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::disguise::HeaderSet;
use crate::errors::TransportResult;

/// How the caller wants the response body delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    #[default]
    Text,
    Binary,
}

/// A single request. Constructed per call and not retained.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub url: String,
    pub method: Method,
    pub headers: HeaderSet,
    pub body: Option<Value>,
    pub response_type: ResponseType,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, method: Method) -> Self {
        Self {
            url: url.into(),
            method,
            headers: HeaderSet::new(),
            body: None,
            response_type: ResponseType::Text,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(url, Method::GET)
    }

    pub fn head(url: impl Into<String>) -> Self {
        Self::new(url, Method::HEAD)
    }

    pub fn with_headers(mut self, headers: HeaderSet) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }
}

/// Response payload of a body request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    Text(String),
    Bytes(Vec<u8>),
}

impl ResponseBody {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Bytes(bytes) => bytes.is_empty(),
        }
    }

    /// Text view of the payload; bytes are decoded as lossy UTF-8
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Bytes(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.into_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }
}

/// Status and header metadata of a completed request. Header names are
/// lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseMeta {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
}

impl ResponseMeta {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a request and return its body. Fails on network errors and on
    /// non-success statuses.
    async fn request(&self, request: FetchRequest) -> TransportResult<ResponseBody>;

    /// Issue a request and return status and headers only. A non-success
    /// status is not an error here.
    async fn request_complete(&self, request: FetchRequest) -> TransportResult<ResponseMeta>;
}
