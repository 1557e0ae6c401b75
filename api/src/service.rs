//! The wallet operations the send screen depends on.

use serde::Deserialize;
use serde::Serialize;

use crate::account::AccountId;
use crate::account::SecretPhrase;
use crate::address::AccountAddress;
use crate::amount::NqtAmount;
use crate::ApiError;

/// Transaction expiry passed with every transfer, in minutes.
pub const DEFAULT_DEADLINE_MINUTES: u16 = 1440;

/// Account state as reported by `getAccount`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub account: AccountId,
    #[serde(rename = "accountRS")]
    pub account_rs: String,
    #[serde(rename = "balanceNQT", default)]
    pub balance_nqt: NqtAmount,
    #[serde(rename = "unconfirmedBalanceNQT", default)]
    pub unconfirmed_balance_nqt: NqtAmount,
    #[serde(default)]
    pub public_key: Option<String>,
}

/// A money transfer, ready to be handed to a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendMoneyRequest {
    pub recipient: AccountAddress,
    pub amount: NqtAmount,
    pub fee: NqtAmount,
    pub deadline_minutes: u16,
    pub secret_phrase: SecretPhrase,
}

impl SendMoneyRequest {
    /// Form parameters in the node's wire naming.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("recipient", self.recipient.to_string()),
            ("amountNQT", self.amount.as_nqt().to_string()),
            ("feeNQT", self.fee.as_nqt().to_string()),
            ("deadline", self.deadline_minutes.to_string()),
            ("secretPhrase", self.secret_phrase.expose().to_string()),
        ]
    }
}

/// What a node reports after accepting a `sendMoney` call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMoneyReceipt {
    #[serde(default)]
    pub broadcasted: bool,
    #[serde(default)]
    pub transaction: Option<String>,
    #[serde(default)]
    pub full_hash: Option<String>,
}

/// A trait for any backend that can serve the send screen.
pub trait WalletService {
    async fn get_account(&self, account: AccountId) -> Result<AccountInfo, ApiError>;

    async fn send_money(&self, request: &SendMoneyRequest) -> Result<SendMoneyReceipt, ApiError>;

    /// Moves future requests to a different randomly chosen peer.
    /// Fire and forget: nothing is retried.
    fn rotate_peer(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_info_reads_node_json() {
        let json = r#"{
            "account": "1739068987193023818",
            "accountRS": "NXT-MRCC-2YLS-8M54-3CMAJ",
            "balanceNQT": "250000000",
            "unconfirmedBalanceNQT": "150000000",
            "publicKey": "ab",
            "requestProcessingTime": 1
        }"#;
        let info: AccountInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.account, AccountId::new(1739068987193023818));
        assert_eq!(info.account_rs, "NXT-MRCC-2YLS-8M54-3CMAJ");
        assert_eq!(info.unconfirmed_balance_nqt, NqtAmount::from_nqt(150_000_000));
    }

    #[test]
    fn send_params_use_wire_names() {
        let request = SendMoneyRequest {
            recipient: AccountAddress::from(AccountId::new(1739068987193023818)),
            amount: NqtAmount::from_nqt(1_250_000_000),
            fee: NqtAmount::from_coins(1).unwrap(),
            deadline_minutes: DEFAULT_DEADLINE_MINUTES,
            secret_phrase: SecretPhrase::new("s"),
        };
        let params = request.to_params();
        assert!(params.contains(&("recipient", "NXT-MRCC-2YLS-8M54-3CMAJ".into())));
        assert!(params.contains(&("amountNQT", "1250000000".into())));
        assert!(params.contains(&("feeNQT", "100000000".into())));
        assert!(params.contains(&("deadline", "1440".into())));
    }
}
