//! This crate contains the wallet-side logic shared by every platform:
//! account derivation, NXT addresses and amounts, and the HTTP client used to
//! talk to a node.

pub mod account;
pub mod address;
pub mod amount;
pub mod client;
pub mod i18n;
pub mod input_filter;
pub mod peers;
pub mod prefs;
pub mod service;

use thiserror::Error;

pub use service::WalletService;

/// Errors produced while talking to a node.
///
/// The screen layer only cares about the flat numeric code returned by
/// [`ApiError::error_code`] and the human readable description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a usable response from the peer.
    #[error("could not connect to {peer}: {reason}")]
    Connection { peer: String, reason: String },

    /// The node answered with an `errorCode`.
    #[error("{description}")]
    Remote { code: i64, description: String },

    /// The node answered, but not with the JSON we expected.
    #[error("unexpected response from {peer}: {reason}")]
    Decode { peer: String, reason: String },

    #[error("no peers configured")]
    NoPeers,
}

impl ApiError {
    /// Error code reported for any failure to reach a peer.
    pub const CONNECTION_FAILED: i64 = -1;

    /// The flat error code, `-1` for everything that happened before a node
    /// could give a well-formed answer.
    pub fn error_code(&self) -> i64 {
        match self {
            Self::Remote { code, .. } => *code,
            Self::Connection { .. } | Self::Decode { .. } | Self::NoPeers => {
                Self::CONNECTION_FAILED
            }
        }
    }

    pub fn is_connection_failure(&self) -> bool {
        self.error_code() == Self::CONNECTION_FAILED
    }

    pub fn description(&self) -> String {
        self.to_string()
    }
}
