//! Fetching recent messages from the Discord REST API.
//!
//! # Architecture
//!
//! - [`MessageSource`]: the seam the pipeline depends on
//! - [`DiscordClient`]: the production source, one GET per run
//!
//! There is no retry and no pagination: a run reads the first page of the
//! channel (newest first) and a failed request fails the run.

use crate::config::Config;
use crate::error::{SyncError, SyncResult};
use crate::models::RawMessage;
use crate::utils::truncate_for_log;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::fmt;
use std::time::Instant;
use tracing::{debug, error, info, instrument};
use url::Url;

/// Characters of the response body echoed to the log.
const BODY_PREVIEW_CHARS: usize = 120;

/// Something that can produce the channel's recent messages.
pub trait MessageSource {
    /// Fetch one page of messages, newest first.
    async fn fetch_messages(&self) -> SyncResult<Vec<RawMessage>>;
}

/// Client for `GET /channels/{channel.id}/messages`.
pub struct DiscordClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl DiscordClient {
    /// Build a client from the run configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if the token is not a valid header value
    /// and [`SyncError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &Config) -> SyncResult<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bot {}", config.token))
            .map_err(|_| SyncError::Config("bot token contains invalid characters".into()))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!(
                "DiscordBot (",
                env!("CARGO_PKG_NAME"),
                ", ",
                env!("CARGO_PKG_VERSION"),
                ")"
            ))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: messages_url(&config.api_base, &config.channel_id, config.limit)?,
        })
    }
}

impl fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl MessageSource for DiscordClient {
    #[instrument(level = "info", skip_all, fields(endpoint = %self.endpoint))]
    async fn fetch_messages(&self) -> SyncResult<Vec<RawMessage>> {
        let t0 = Instant::now();
        let response = self.http.get(self.endpoint.clone()).send().await.map_err(|e| {
            error!(error = %e, "Messages request failed");
            SyncError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await?;
        info!(
            status = status.as_u16(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            head = %truncate_for_log(&body, BODY_PREVIEW_CHARS).replace('\n', "\\n"),
            "Discord responded"
        );

        if !status.is_success() {
            return Err(SyncError::Transport(format!(
                "{} returned HTTP {}",
                self.endpoint.path(),
                status
            )));
        }

        let messages: Vec<RawMessage> = serde_json::from_str(&body)
            .map_err(|e| SyncError::Transport(format!("undecodable messages body: {e}")))?;
        debug!(count = messages.len(), "Decoded messages");
        Ok(messages)
    }
}

/// `{api_base}/channels/{channel_id}/messages?limit={limit}`
fn messages_url(api_base: &Url, channel_id: &str, limit: u32) -> SyncResult<Url> {
    let mut url = api_base.clone();
    url.path_segments_mut()
        .map_err(|_| SyncError::Config(format!("api base {api_base} cannot carry a path")))?
        .pop_if_empty()
        .extend(["channels", channel_id, "messages"]);
    url.query_pairs_mut()
        .clear()
        .append_pair("limit", &limit.to_string());
    Ok(url)
}
