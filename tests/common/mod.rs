//! Scripted in-memory transport for integration tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use media_probe::errors::{TransportError, TransportResult};
use media_probe::http::{FetchRequest, ResponseBody, ResponseMeta, Transport};

#[derive(Debug, Clone)]
pub enum Reply {
    Body(ResponseBody),
    Meta(ResponseMeta),
    Fail(TransportError),
}

/// Answers requests from a per-URL script and records every request it sees.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: HashMap<String, Reply>,
    seen: Mutex<Vec<FetchRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, url: &str, body: &str) -> Self {
        self.replies
            .insert(url.to_string(), Reply::Body(ResponseBody::Text(body.to_string())));
        self
    }

    pub fn bytes(mut self, url: &str, body: &[u8]) -> Self {
        self.replies
            .insert(url.to_string(), Reply::Body(ResponseBody::Bytes(body.to_vec())));
        self
    }

    pub fn head(mut self, url: &str, status: u16, headers: &[(&str, &str)]) -> Self {
        let headers: BTreeMap<String, String> = headers
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
            .collect();
        self.replies
            .insert(url.to_string(), Reply::Meta(ResponseMeta { status, headers }));
        self
    }

    pub fn fail(mut self, url: &str) -> Self {
        self.replies.insert(
            url.to_string(),
            Reply::Fail(TransportError::request(url, "connection refused")),
        );
        self
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> FetchRequest {
        self.requests().pop().expect("no request was issued")
    }

    fn reply_for(&self, request: &FetchRequest) -> Reply {
        self.seen.lock().unwrap().push(request.clone());
        self.replies
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| Reply::Fail(TransportError::request(&request.url, "no route scripted")))
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(&self, request: FetchRequest) -> TransportResult<ResponseBody> {
        match self.reply_for(&request) {
            Reply::Body(body) => Ok(body),
            Reply::Meta(meta) if (200..300).contains(&meta.status) => {
                Ok(ResponseBody::Text(String::new()))
            }
            Reply::Meta(meta) => Err(TransportError::Status {
                url: request.url,
                status: meta.status,
            }),
            Reply::Fail(e) => Err(e),
        }
    }

    async fn request_complete(&self, request: FetchRequest) -> TransportResult<ResponseMeta> {
        match self.reply_for(&request) {
            Reply::Meta(meta) => Ok(meta),
            Reply::Body(_) => Ok(ResponseMeta {
                status: 200,
                headers: BTreeMap::new(),
            }),
            Reply::Fail(e) => Err(e),
        }
    }
}
