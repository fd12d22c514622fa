//! Service facade over the fetchers and classifiers
//!
//! `MediaProbe` owns a shared transport and the read-only application
//! context, and exposes the operations the rest of a playback client calls.
//! It is cheap to clone and safe to share across tasks.

use std::sync::Arc;

use tracing::debug;

use crate::classification::{
    self, AddressFamily, LivenessVerdict, MediaFormat, ProbeOutcome,
};
use crate::config::Config;
use crate::context::AppContext;
use crate::errors::AppResult;
use crate::fetch::{self, ConfigPayload, FetchOptions};
use crate::http::{StandardHttpClient, Transport};

#[derive(Clone)]
pub struct MediaProbe {
    transport: Arc<dyn Transport>,
    context: Arc<AppContext>,
    default_encoding: String,
}

impl MediaProbe {
    pub fn new(transport: Arc<dyn Transport>, context: AppContext) -> Self {
        Self {
            transport,
            context: Arc::new(context),
            default_encoding: crate::config::defaults::DEFAULT_ENCODING.to_string(),
        }
    }

    /// Build the reqwest transport and context from configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let transport = StandardHttpClient::new(&config.http)?;
        debug!(
            "Creating media probe (connect timeout {:?}, request timeout {:?})",
            config.http.connect_timeout, config.http.request_timeout
        );

        Ok(Self::new(Arc::new(transport), AppContext::new(&config.context))
            .with_default_encoding(config.fetch.default_encoding.clone()))
    }

    pub fn with_default_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.default_encoding = encoding.into();
        self
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    fn layered(&self, mut options: FetchOptions) -> FetchOptions {
        if !self.context.default_headers().is_empty() {
            options.headers = self.context.headers_for(&options.headers);
        }
        options
    }

    /// Fetch and leniently parse a remote configuration document
    pub async fn fetch_config(&self, url: &str, options: FetchOptions) -> AppResult<ConfigPayload> {
        fetch::fetch_config(self.transport.as_ref(), url, self.layered(options)).await
    }

    /// Fetch a page and decode it; `None` uses the configured default encoding
    pub async fn fetch_raw_text(
        &self,
        url: &str,
        encoding: Option<&str>,
        options: FetchOptions,
    ) -> AppResult<String> {
        let encoding = encoding.unwrap_or(self.default_encoding.as_str());
        fetch::fetch_raw_text(self.transport.as_ref(), url, encoding, self.layered(options)).await
    }

    pub async fn classify_media_type(&self, url: &str) -> MediaFormat {
        classification::classify_media_type(self.transport.as_ref(), url).await
    }

    pub async fn probe_content_type(&self, url: &str) -> ProbeOutcome {
        classification::probe_content_type(self.transport.as_ref(), url).await
    }

    pub fn classify_host_family(&self, url: &str) -> AppResult<AddressFamily> {
        classification::classify_host_family(url)
    }

    pub async fn classify_playlist_liveness(&self, url: &str) -> bool {
        classification::classify_playlist_liveness(self.transport.as_ref(), url).await
    }

    /// Like [`classify_playlist_liveness`](Self::classify_playlist_liveness)
    /// but reports the deciding rule and any failure
    pub async fn check_playlist_liveness(&self, url: &str) -> AppResult<LivenessVerdict> {
        classification::check_playlist_liveness(self.transport.as_ref(), url).await
    }
}
