//! HTTP delivery of composed messages to the Flowdock push API
//!
//! One POST per push, no retries. Proxy settings and credentials are bound
//! to this client's transport only; nothing process-wide is touched.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, error, info};
use url::Url;

use crate::chat::ChatMessage;
use crate::error::{DeliveryError, Result};
use crate::inbox::InboxMessage;
use crate::message::FlowdockMessage;
use crate::DeliveryConfig;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Client for pushing build notifications to one flow.
#[derive(Debug, Clone)]
pub struct FlowdockClient {
    http: reqwest::Client,
    api_url: String,
    flow_token: String,
}

impl FlowdockClient {
    /// Build a client from the delivery configuration.
    ///
    /// The flow token is normalized here (all whitespace removed) so every
    /// push uses the same endpoint. Fails with `Endpoint` when the proxy
    /// address cannot be parsed, or `Protocol` when the transport cannot be
    /// constructed.
    pub fn new(config: &DeliveryConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT);

        if let Some(proxy_url) = config.proxy_url() {
            debug!("Using proxy: {}", proxy_url);
            let mut proxy = reqwest::Proxy::all(&proxy_url)
                .map_err(|e| DeliveryError::Endpoint(format!("{}: {}", proxy_url, e)))?;
            if let Some((user, password)) = config.proxy_auth() {
                proxy = proxy.basic_auth(user, password);
            }
            builder = builder.proxy(proxy);
        }

        let http = builder.build().map_err(DeliveryError::from_reqwest)?;
        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            flow_token: config.trimmed_flow_token(),
        })
    }

    /// Push a chat message; returns normally only on HTTP 200.
    pub async fn push_chat_message(&self, msg: &ChatMessage) -> Result<()> {
        self.push(&FlowdockMessage::Chat(msg.clone())).await
    }

    /// Push a team inbox message; returns normally only on HTTP 200.
    pub async fn push_inbox_message(&self, msg: &InboxMessage) -> Result<()> {
        self.push(&FlowdockMessage::Inbox(msg.clone())).await
    }

    /// Encode and POST one message. Any failure is terminal for this
    /// attempt; the message is either fully accepted or not delivered.
    pub async fn push(&self, msg: &FlowdockMessage) -> Result<()> {
        let endpoint = format!("{}{}{}", self.api_url, msg.api_path(), self.flow_token);
        let url = Url::parse(&endpoint)
            .map_err(|_| DeliveryError::Endpoint(endpoint.clone()))?;
        let body = msg.as_post_data();

        debug!("POST {} ({} bytes)", endpoint, body.len());
        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(DeliveryError::from_reqwest)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            // Best effort only; an unreadable body must not mask the
            // response error itself.
            let body = response.text().await.unwrap_or_default();
            error!("Flowdock rejected message: {} {}", status.as_u16(), body);
            return Err(DeliveryError::Response {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
                body,
                url: endpoint,
            });
        }

        info!("Message accepted by {}", msg.api_path());
        Ok(())
    }
}
