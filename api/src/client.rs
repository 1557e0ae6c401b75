//! HTTP client for a node's `/nxt` API endpoint.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use dioxus_logger::tracing;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::account::AccountId;
use crate::peers::PeerPool;
use crate::service::AccountInfo;
use crate::service::SendMoneyReceipt;
use crate::service::SendMoneyRequest;
use crate::service::WalletService;
use crate::ApiError;

/// How long a single request may take before the peer counts as unreachable.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks to whichever peer the shared [`PeerPool`] currently points at.
///
/// Cloning is cheap; clones share the connection pool and the peer choice.
#[derive(Clone)]
pub struct NxtClient {
    http: reqwest::Client,
    peers: Arc<Mutex<PeerPool>>,
    timeout: Duration,
}

impl NxtClient {
    pub fn new(peers: PeerPool) -> Self {
        Self::with_timeout(peers, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(peers: PeerPool, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            peers: Arc::new(Mutex::new(peers)),
            timeout,
        }
    }

    pub fn current_peer(&self) -> Option<String> {
        self.peers().current().map(str::to_owned)
    }

    fn peers(&self) -> MutexGuard<'_, PeerPool> {
        // A panic elsewhere cannot leave a PeerPool half-updated.
        self.peers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        request_type: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let peer = self.current_peer().ok_or(ApiError::NoPeers)?;
        let url = format!("{}/nxt", peer.trim_end_matches('/'));
        tracing::debug!("{request_type} -> {url}");

        let builder = self
            .http
            .request(method.clone(), &url)
            .timeout(self.timeout)
            .query(&[("requestType", request_type)]);
        let builder = if method == Method::POST {
            builder.form(params)
        } else {
            builder.query(params)
        };

        let connection_error = |e: reqwest::Error| ApiError::Connection {
            peer: peer.clone(),
            reason: e.to_string(),
        };
        let body = builder
            .send()
            .await
            .map_err(connection_error)?
            .text()
            .await
            .map_err(connection_error)?;

        let result = parse_response(&peer, &body);
        if let Err(e) = &result {
            tracing::warn!("{request_type} failed: {e}");
        }
        result
    }
}

impl WalletService for NxtClient {
    async fn get_account(&self, account: AccountId) -> Result<AccountInfo, ApiError> {
        self.request(Method::GET, "getAccount", &[("account", account.to_string())])
            .await
    }

    async fn send_money(&self, request: &SendMoneyRequest) -> Result<SendMoneyReceipt, ApiError> {
        self.request(Method::POST, "sendMoney", &request.to_params())
            .await
    }

    fn rotate_peer(&self) {
        let mut peers = self.peers();
        let previous = peers.current().map(str::to_owned);
        let next = peers.rotate().map(str::to_owned);
        tracing::info!("peer rotated: {previous:?} -> {next:?}");
    }
}

/// Decodes a node reply. A body carrying `errorCode` is a remote error
/// regardless of what else it contains.
pub fn parse_response<T: DeserializeOwned>(peer: &str, body: &str) -> Result<T, ApiError> {
    let decode_error = |e: serde_json::Error| ApiError::Decode {
        peer: peer.to_string(),
        reason: e.to_string(),
    };

    let value: Value = serde_json::from_str(body).map_err(decode_error)?;

    if let Some(code) = value.get("errorCode") {
        let code = match code {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
        .unwrap_or(ApiError::CONNECTION_FAILED);
        let description = value
            .get("errorDescription")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string();
        return Err(ApiError::Remote { code, description });
    }

    serde_json::from_value(value).map_err(decode_error)
}
