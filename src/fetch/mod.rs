//! Disguised fetchers
//!
//! Both fetchers lower-case and mask the caller's headers, forward a body
//! only for non-GET methods, and let transport failures propagate. They
//! differ in what they do with the payload:
//!
//!   - [`fetch_config`] asks for text and parses it leniently (JSON5). Text
//!     that does not parse comes back unchanged.
//!   - [`fetch_raw_text`] asks for bytes and decodes them with a caller
//!     supplied character encoding.

use encoding_rs::Encoding;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::context::is_truthy;
use crate::errors::{AppError, AppResult};
use crate::http::disguise::{self, HeaderSet};
use crate::http::transport::{FetchRequest, ResponseType, Transport};
use crate::utils::UrlUtils;

/// Method, headers and body of a fetch
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub method: Method,
    pub headers: HeaderSet,
    pub body: Option<Value>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderSet::new(),
            body: None,
        }
    }
}

impl FetchOptions {
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn headers(mut self, headers: HeaderSet) -> Self {
        self.headers = headers;
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Result of a config fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigPayload {
    /// Body parsed as (lenient) JSON
    Structured(Value),
    /// Body that did not parse, or the empty string
    Text(String),
}

impl ConfigPayload {
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }

    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            Self::Structured(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Structured(_) => None,
        }
    }
}

fn build_request(url: &str, options: FetchOptions, response_type: ResponseType) -> FetchRequest {
    let body = if options.method == Method::GET {
        None
    } else {
        options.body
    };

    FetchRequest::new(url, options.method)
        .with_headers(disguise::mask(&options.headers))
        .with_body(body)
        .with_response_type(response_type)
}

/// Deepest array/object nesting accepted by [`parse_lenient`]
pub const MAX_NESTING_DEPTH: usize = 128;

/// True when brackets in `text` nest deeper than `limit`. String literals
/// and comments are skipped.
fn nesting_exceeds(text: &str, limit: usize) -> bool {
    let mut depth = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                while let Some(next) = chars.next() {
                    match next {
                        '\\' => {
                            chars.next();
                        }
                        _ if next == c => break,
                        _ => {}
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            '[' | '{' => {
                depth += 1;
                if depth > limit {
                    return true;
                }
            }
            ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    false
}

fn parse_value(text: &str) -> Option<Value> {
    match json5::from_str::<Value>(text) {
        Ok(value) => Some(value),
        // json5 reads integer literals as i64; plain JSON also covers u64
        // and wider values (as f64).
        Err(e) => match serde_json::from_str::<Value>(text) {
            Ok(value) => Some(value),
            Err(_) => {
                debug!("Response is not JSON5 ({}), returning raw text", e);
                None
            }
        },
    }
}

/// Parse text leniently; anything that does not parse is returned as text.
///
/// Falsy results (empty text, null, false, 0, "") collapse to the empty
/// string. Documents nested deeper than [`MAX_NESTING_DEPTH`] are not parsed
/// and come back as text.
pub fn parse_lenient(text: String) -> ConfigPayload {
    if text.is_empty() {
        return ConfigPayload::empty();
    }
    if nesting_exceeds(&text, MAX_NESTING_DEPTH) {
        debug!(
            "Response nests deeper than {} levels, returning raw text",
            MAX_NESTING_DEPTH
        );
        return ConfigPayload::Text(text);
    }

    match parse_value(&text) {
        Some(value) if is_truthy(&value) => ConfigPayload::Structured(value),
        Some(_) => ConfigPayload::empty(),
        None => ConfigPayload::Text(text),
    }
}

/// Fetch a remote configuration document.
///
/// Headers in `options` are lower-cased and masked before they reach the
/// transport, and the body is only sent for non-GET methods.
///
/// # Arguments
/// * `transport` - Transport used for the request
/// * `url` - Document location
/// * `options` - Method, headers and optional body
///
/// # Returns
/// The parsed document, the raw text when it does not parse, or
/// [`ConfigPayload::empty`] for an empty or falsy body. Transport failures
/// propagate; parse failures never do.
///
/// # Examples
/// ```rust,no_run
/// use media_probe::fetch::{fetch_config, FetchOptions};
/// use media_probe::http::{HeaderSet, Transport};
///
/// # async fn run(transport: &dyn Transport) -> media_probe::AppResult<()> {
/// let options = FetchOptions::default()
///     .headers(HeaderSet::from_pairs([("User-Agent", "okhttp/3.12")]));
/// let payload = fetch_config(transport, "https://cfg.example/api.json", options).await?;
/// if let Some(doc) = payload.as_structured() {
///     println!("{}", doc["sites"]);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn fetch_config(
    transport: &dyn Transport,
    url: &str,
    options: FetchOptions,
) -> AppResult<ConfigPayload> {
    debug!("Fetching config from {}", UrlUtils::obfuscate_credentials(url));

    let request = build_request(url, options, ResponseType::Text);
    let body = transport.request(request).await?;

    if body.is_empty() {
        return Ok(ConfigPayload::empty());
    }
    Ok(parse_lenient(body.into_text()))
}

/// Decode bytes with a WHATWG encoding label ("utf-8", "gbk", "big5", ...).
///
/// Unknown labels are an error; malformed sequences become U+FFFD. A BOM
/// matching the encoding is stripped.
pub fn decode_with_label(bytes: &[u8], label: &str) -> AppResult<String> {
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| AppError::decode(label, "encoding not recognized"))?;

    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        debug!(
            "Malformed {} sequences replaced while decoding {} bytes",
            encoding.name(),
            bytes.len()
        );
    }
    Ok(text.into_owned())
}

/// Fetch a page as bytes and decode it with `encoding`.
///
/// Transport failures and unknown encodings propagate to the caller.
pub async fn fetch_raw_text(
    transport: &dyn Transport,
    url: &str,
    encoding: &str,
    options: FetchOptions,
) -> AppResult<String> {
    debug!(
        "Fetching raw text from {} as {}",
        UrlUtils::obfuscate_credentials(url),
        encoding
    );

    let request = build_request(url, options, ResponseType::Binary);
    let bytes = transport.request(request).await?.into_bytes();

    decode_with_label(&bytes, encoding)
}
