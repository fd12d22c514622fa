use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

use super::disguise::{self, HeaderSet};
use super::transport::{FetchRequest, ResponseBody, ResponseMeta, ResponseType, Transport};
use crate::config::HttpConfig;
use crate::errors::{AppError, AppResult, TransportError, TransportResult};
use crate::utils::UrlUtils;

/// reqwest-backed implementation of [`Transport`]
#[derive(Debug, Clone)]
pub struct StandardHttpClient {
    client: Client,
    restore_disguised_headers: bool,
}

impl StandardHttpClient {
    /// Create a client from transport configuration
    pub fn new(config: &HttpConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            restore_disguised_headers: config.restore_disguised_headers,
        })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client, restore_disguised_headers: bool) -> Self {
        Self {
            client,
            restore_disguised_headers,
        }
    }

    fn wire_headers(&self, headers: &HeaderSet, url: &str) -> TransportResult<HeaderMap> {
        let headers = if self.restore_disguised_headers {
            disguise::reveal(headers)
        } else {
            headers.clone()
        };

        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers.iter() {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                TransportError::request(UrlUtils::obfuscate_credentials(url), format!("invalid header name '{name}': {e}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                TransportError::request(UrlUtils::obfuscate_credentials(url), format!("invalid value for header '{name}': {e}"))
            })?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }

    fn build(&self, request: &FetchRequest) -> TransportResult<RequestBuilder> {
        let headers = self.wire_headers(&request.headers, &request.url)?;
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.as_str())
            .headers(headers);

        builder = match &request.body {
            None => builder,
            Some(Value::String(text)) => builder.body(text.clone()),
            Some(body) => builder.json(body),
        };
        Ok(builder)
    }

    async fn send(&self, request: &FetchRequest) -> TransportResult<Response> {
        debug!(
            "{} {}",
            request.method,
            UrlUtils::obfuscate_credentials(&request.url)
        );

        self.build(request)?.send().await.map_err(|e| {
            TransportError::request(
                UrlUtils::obfuscate_credentials(&request.url),
                UrlUtils::obfuscate_credentials(&e.to_string()),
            )
        })
    }
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        collected
            .entry(name.as_str().to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    collected
}

#[async_trait]
impl Transport for StandardHttpClient {
    async fn request(&self, request: FetchRequest) -> TransportResult<ResponseBody> {
        let response = self.send(&request).await?;
        let url = UrlUtils::obfuscate_credentials(&request.url);

        if !response.status().is_success() {
            return Err(TransportError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        let body = match request.response_type {
            ResponseType::Text => response
                .text()
                .await
                .map(ResponseBody::Text)
                .map_err(|e| TransportError::Body {
                    url: url.clone(),
                    message: e.to_string(),
                })?,
            ResponseType::Binary => response
                .bytes()
                .await
                .map(|bytes| ResponseBody::Bytes(bytes.to_vec()))
                .map_err(|e| TransportError::Body {
                    url: url.clone(),
                    message: e.to_string(),
                })?,
        };

        debug!("Fetched response body from {} (empty={})", url, body.is_empty());
        Ok(body)
    }

    async fn request_complete(&self, request: FetchRequest) -> TransportResult<ResponseMeta> {
        let response = self.send(&request).await?;

        Ok(ResponseMeta {
            status: response.status().as_u16(),
            headers: collect_headers(response.headers()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(restore: bool) -> StandardHttpClient {
        StandardHttpClient::with_client(Client::new(), restore)
    }

    #[test]
    fn test_restores_disguised_headers_on_the_wire() {
        let masked = disguise::mask(&HeaderSet::from_pairs([
            ("User-Agent", "Mozilla/5.0"),
            ("Referer", "https://site.test/"),
        ]));

        let map = client(true).wire_headers(&masked, "http://x.test/").unwrap();
        assert_eq!(map.get("user-agent").unwrap(), "Mozilla/5.0");
        assert_eq!(map.get("referer").unwrap(), "https://site.test/");
        assert!(map.get("custom-ua").is_none());
    }

    #[test]
    fn test_keeps_masked_names_when_restore_is_off() {
        let masked = disguise::mask(&HeaderSet::from_pairs([("Cookie", "a=b")]));

        let map = client(false).wire_headers(&masked, "http://x.test/").unwrap();
        assert_eq!(map.get("custom-cookie").unwrap(), "a=b");
        assert!(map.get("cookie").is_none());
    }

    #[test]
    fn test_invalid_header_values_are_transport_errors() {
        let headers = HeaderSet::from_pairs([("x-bad", "line\nbreak")]);
        let err = client(true).wire_headers(&headers, "http://x.test/").unwrap_err();
        assert!(matches!(err, TransportError::Request { .. }));
    }

    #[test]
    fn test_repeated_response_headers_are_joined() {
        let mut map = HeaderMap::new();
        map.append("set-cookie", HeaderValue::from_static("a=1"));
        map.append("set-cookie", HeaderValue::from_static("b=2"));
        map.insert("content-type", HeaderValue::from_static("video/mp4"));

        let collected = collect_headers(&map);
        assert_eq!(collected["set-cookie"], "a=1, b=2");
        assert_eq!(collected["content-type"], "video/mp4");
    }
}
