//! State of the send screen, independent of how it is rendered.
//!
//! Every method here is synchronous. The async drivers in
//! [`crate::send_flow`] call into a [`api::WalletService`] between them.

use api::account::AccountId;
use api::account::AccountIdentity;
use api::account::SecretPhrase;
use api::address::AccountAddress;
use api::amount::BalanceDisplay;
use api::amount::NqtAmount;
use api::i18n::Translations;
use api::input_filter::DecimalFilter;
use api::input_filter::Keystroke;
use api::service::AccountInfo;
use api::service::SendMoneyReceipt;
use api::service::SendMoneyRequest;
use api::service::DEFAULT_DEADLINE_MINUTES;
use api::ApiError;
use dioxus_logger::tracing;
use std::ops::Range;

use crate::scanner::ScanOutcome;

/// Flat fee attached to every transfer, in whole NXT.
pub const FEE_COINS: i64 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumIs)]
pub enum SendPhase {
    LoadingBalance,
    Ready,
    Submitting,
    ResultShown,
}

/// A message for the toast line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// Translation key.
    Text(&'static str),
    /// Description passed through from the node.
    Remote(String),
}

impl Notice {
    pub fn render(&self, translations: &Translations) -> String {
        match self {
            Self::Text(key) => translations.t(key).to_string(),
            Self::Remote(text) => text.clone(),
        }
    }
}

/// What the screen must do after a response was applied to the form.
/// Peer rotation, when requested, happens before the notice is shown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reaction {
    pub notice: Option<Notice>,
    pub rotate_peer: bool,
    pub refresh_balance: bool,
}

impl Reaction {
    fn notice(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            ..Self::default()
        }
    }

    /// The shared handling for a failed request.
    fn for_error(error: &ApiError) -> Self {
        if error.is_connection_failure() {
            Self {
                notice: Some(Notice::Text("error_server_connect")),
                rotate_peer: true,
                refresh_balance: false,
            }
        } else {
            Self::notice(Notice::Remote(error.description()))
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SendForm {
    pub address: String,
    pub amount: String,
    identity: AccountIdentity,
    secret: SecretPhrase,
    balance: Option<BalanceDisplay>,
    balance_loading: bool,
    phase: SendPhase,
    amount_filter: DecimalFilter,
    /// Caret or selection in the amount field; `None` means the end.
    amount_selection: Option<Range<usize>>,
}

impl SendForm {
    /// Derives the account from `secret`. The caller is expected to start a
    /// balance refresh right away.
    pub fn new(secret: SecretPhrase) -> Self {
        let identity = AccountIdentity::derive(&secret);
        tracing::info!("send form opened for {}", identity.address);
        Self {
            address: String::new(),
            amount: String::new(),
            identity,
            secret,
            balance: None,
            balance_loading: false,
            phase: SendPhase::LoadingBalance,
            amount_filter: DecimalFilter::default(),
            amount_selection: None,
        }
    }

    pub fn identity(&self) -> &AccountIdentity {
        &self.identity
    }

    pub fn balance(&self) -> Option<&BalanceDisplay> {
        self.balance.as_ref()
    }

    pub fn is_balance_loading(&self) -> bool {
        self.balance_loading
    }

    pub fn phase(&self) -> SendPhase {
        self.phase
    }

    pub fn set_address(&mut self, address: String) {
        self.address = address;
        self.touch();
    }

    pub fn set_amount(&mut self, amount: String) {
        self.amount = amount;
        self.amount_selection = None;
        self.touch();
    }

    /// Records where the caret is in the amount field, as reported by the
    /// view after the last key or click.
    pub fn set_amount_selection(&mut self, start: usize, end: usize) {
        self.amount_selection = Some(start.min(end)..start.max(end));
    }

    pub fn accepts_amount_key(&self, key: Keystroke) -> bool {
        match &self.amount_selection {
            Some(selection) => self.amount_filter.accepts_at(&self.amount, key, selection.clone()),
            None => self.amount_filter.accepts(&self.amount, key),
        }
    }

    /// Marks the balance as loading and returns the account to query.
    pub fn begin_balance_refresh(&mut self) -> AccountId {
        self.balance_loading = true;
        if self.phase.is_ready() {
            self.phase = SendPhase::LoadingBalance;
        }
        self.identity.id
    }

    /// Applies a `getAccount` response. The displayed balance only changes
    /// when the response is about this form's account.
    pub fn apply_balance(&mut self, result: Result<AccountInfo, ApiError>) -> Reaction {
        self.balance_loading = false;
        if self.phase.is_loading_balance() {
            self.phase = SendPhase::Ready;
        }

        match result {
            Ok(info) => {
                if info.account != self.identity.id
                    || info.account_rs != self.identity.address.to_string()
                {
                    tracing::warn!(
                        "balance response for {} ({}) does not match {}",
                        info.account_rs,
                        info.account,
                        self.identity.address
                    );
                    return Reaction::notice(Notice::Text("error_account_id"));
                }
                self.balance = Some(info.unconfirmed_balance_nqt.to_balance_display());
                Reaction::default()
            }
            Err(e) => Reaction::for_error(&e),
        }
    }

    /// Validates the form and builds the transfer. On failure the form is
    /// left as it was and nothing should be sent.
    pub fn prepare_send(&mut self) -> Result<SendMoneyRequest, Notice> {
        let result = self.build_request();
        self.phase = match result {
            Ok(_) => SendPhase::Submitting,
            Err(_) => SendPhase::ResultShown,
        };
        result
    }

    fn build_request(&self) -> Result<SendMoneyRequest, Notice> {
        if self.address.is_empty() || self.amount.is_empty() {
            return Err(Notice::Text("error_invalid_input"));
        }
        let recipient = AccountAddress::parse(&self.address).map_err(|e| {
            tracing::debug!("recipient {:?} rejected: {e}", self.address);
            Notice::Text("recipient_malformed")
        })?;
        let amount = NqtAmount::from_coins_str(&self.amount).map_err(|e| {
            tracing::debug!("amount {:?} rejected: {e}", self.amount);
            Notice::Text("error_invalid_input")
        })?;
        let fee = NqtAmount::from_coins(FEE_COINS).ok_or(Notice::Text("error_invalid_input"))?;

        Ok(SendMoneyRequest {
            recipient,
            amount,
            fee,
            deadline_minutes: DEFAULT_DEADLINE_MINUTES,
            secret_phrase: self.secret.clone(),
        })
    }

    /// Applies a `sendMoney` response.
    pub fn apply_send_result(&mut self, result: Result<SendMoneyReceipt, ApiError>) -> Reaction {
        self.phase = SendPhase::ResultShown;
        match result {
            Ok(receipt) if receipt.broadcasted => {
                tracing::info!("transaction {:?} broadcasted", receipt.transaction);
                self.address.clear();
                self.amount.clear();
                Reaction {
                    notice: Some(Notice::Text("success_send_money")),
                    rotate_peer: false,
                    refresh_balance: true,
                }
            }
            Ok(receipt) => {
                tracing::warn!("transaction {:?} not broadcasted", receipt.transaction);
                Reaction::notice(Notice::Text("error_not_broadcasted"))
            }
            Err(e) => Reaction::for_error(&e),
        }
    }

    /// Puts a scanned QR code into the recipient field. Anything other than
    /// a completed QR scan leaves the field alone.
    pub fn apply_scan(&mut self, outcome: ScanOutcome) {
        if !outcome.cancelled && outcome.format.is_qr_code() {
            self.set_address(outcome.text);
        }
    }

    fn touch(&mut self) {
        if self.phase.is_result_shown() {
            self.phase = SendPhase::Ready;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::BarcodeFormat;

    const GENESIS_RS: &str = "NXT-MRCC-2YLS-8M54-3CMAJ";

    fn form() -> SendForm {
        SendForm::new(SecretPhrase::new("secret phrase"))
    }

    fn own_account(form: &SendForm, unconfirmed: i64) -> AccountInfo {
        AccountInfo {
            account: form.identity().id,
            account_rs: form.identity().address.to_string(),
            balance_nqt: NqtAmount::from_nqt(unconfirmed),
            unconfirmed_balance_nqt: NqtAmount::from_nqt(unconfirmed),
            public_key: None,
        }
    }

    #[test]
    fn starts_empty_and_loading() {
        let form = form();
        assert!(form.address.is_empty());
        assert!(form.amount.is_empty());
        assert_eq!(form.phase(), SendPhase::LoadingBalance);
        assert_eq!(form.identity().address.to_string(), "NXT-V54L-TZ5X-V2SL-8D33L");
        assert!(form.balance().is_none());
    }

    #[test]
    fn balance_refresh_formats_unconfirmed_balance() {
        let mut form = form();
        let id = form.begin_balance_refresh();
        assert_eq!(id, form.identity().id);
        assert!(form.is_balance_loading());

        let info = own_account(&form, 123_450_000_000);
        let reaction = form.apply_balance(Ok(info));
        assert_eq!(reaction, Reaction::default());
        assert!(!form.is_balance_loading());
        assert_eq!(form.phase(), SendPhase::Ready);
        let balance = form.balance().unwrap();
        assert_eq!(balance.whole, "1,234.");
        assert_eq!(balance.fraction.as_deref(), Some("5"));
    }

    #[test]
    fn mismatched_account_leaves_balance_alone() {
        let mut form = form();
        form.begin_balance_refresh();
        form.apply_balance(Ok(own_account(&form, 500_000_000)));
        let before = form.balance().cloned();

        let mut other = own_account(&form, 9_900_000_000);
        other.account = AccountId::new(1739068987193023818);
        other.account_rs = GENESIS_RS.to_string();
        let reaction = form.apply_balance(Ok(other));
        assert_eq!(reaction.notice, Some(Notice::Text("error_account_id")));
        assert_eq!(form.balance().cloned(), before);

        // Right id, wrong RS string is still a mismatch.
        let mut half = own_account(&form, 9_900_000_000);
        half.account_rs = GENESIS_RS.to_string();
        form.apply_balance(Ok(half));
        assert_eq!(form.balance().cloned(), before);
    }

    #[test]
    fn balance_failure_routes_through_shared_toast() {
        let mut form = form();
        form.begin_balance_refresh();
        let reaction = form.apply_balance(Err(ApiError::Remote {
            code: 5,
            description: "Unknown account".into(),
        }));
        assert_eq!(reaction.notice, Some(Notice::Remote("Unknown account".into())));
        assert!(!reaction.rotate_peer);
        assert!(!form.is_balance_loading());
    }

    #[test]
    fn empty_fields_are_invalid_input() {
        for (address, amount) in [("", ""), (GENESIS_RS, ""), ("", "1")] {
            let mut form = form();
            form.set_address(address.into());
            form.set_amount(amount.into());
            assert_eq!(form.prepare_send(), Err(Notice::Text("error_invalid_input")));
            assert_eq!(form.phase(), SendPhase::ResultShown);
        }
    }

    #[test]
    fn bad_checksum_is_malformed_recipient() {
        let mut form = form();
        form.set_address("NXT-MRCC-2YLS-8M54-3CMAK".into());
        form.set_amount("1".into());
        assert_eq!(form.prepare_send(), Err(Notice::Text("recipient_malformed")));
    }

    #[test]
    fn builds_transfer_with_fixed_fee_and_deadline() {
        let mut form = form();
        form.set_address("nxt-mrcc-2yls-8m54-3cmaj".into());
        form.set_amount("12.5".into());
        let request = form.prepare_send().unwrap();
        assert_eq!(request.recipient.to_string(), GENESIS_RS);
        assert_eq!(request.amount.as_nqt(), 1_250_000_000);
        assert_eq!(request.fee.as_nqt(), 100_000_000);
        assert_eq!(request.deadline_minutes, 1440);
        assert_eq!(request.secret_phrase.expose(), "secret phrase");
        assert_eq!(form.phase(), SendPhase::Submitting);
    }

    #[test]
    fn unparseable_amount_is_invalid_input() {
        let mut form = form();
        form.set_address(GENESIS_RS.into());
        form.set_amount("1.2.3".into());
        assert_eq!(form.prepare_send(), Err(Notice::Text("error_invalid_input")));
    }

    #[test]
    fn broadcast_clears_fields_and_asks_for_refresh() {
        let mut form = form();
        form.set_address(GENESIS_RS.into());
        form.set_amount("1".into());
        let receipt = SendMoneyReceipt {
            broadcasted: true,
            transaction: Some("123".into()),
            full_hash: None,
        };
        let reaction = form.apply_send_result(Ok(receipt));
        assert_eq!(reaction.notice, Some(Notice::Text("success_send_money")));
        assert!(reaction.refresh_balance);
        assert!(!reaction.rotate_peer);
        assert!(form.address.is_empty());
        assert!(form.amount.is_empty());
    }

    #[test]
    fn connection_failure_requests_rotation() {
        let mut form = form();
        form.set_address(GENESIS_RS.into());
        form.set_amount("1".into());
        let reaction = form.apply_send_result(Err(ApiError::Connection {
            peer: "http://localhost:7876".into(),
            reason: "refused".into(),
        }));
        assert!(reaction.rotate_peer);
        assert!(!reaction.refresh_balance);
        assert_eq!(reaction.notice, Some(Notice::Text("error_server_connect")));
        assert_eq!(form.address, GENESIS_RS);
    }

    #[test]
    fn remote_minus_one_also_rotates() {
        let mut form = form();
        let reaction = form.apply_send_result(Err(ApiError::Remote {
            code: -1,
            description: "x".into(),
        }));
        assert!(reaction.rotate_peer);
    }

    #[test]
    fn scan_only_accepts_completed_qr_codes() {
        let mut form = form();
        form.apply_scan(ScanOutcome {
            cancelled: true,
            format: BarcodeFormat::QrCode,
            text: "ignored".into(),
        });
        form.apply_scan(ScanOutcome {
            cancelled: false,
            format: BarcodeFormat::Other("EAN_13".into()),
            text: "ignored".into(),
        });
        assert!(form.address.is_empty());

        form.set_address("typed".into());
        form.apply_scan(ScanOutcome {
            cancelled: false,
            format: BarcodeFormat::QrCode,
            text: GENESIS_RS.into(),
        });
        assert_eq!(form.address, GENESIS_RS);
    }

    #[test]
    fn amount_filter_uses_eight_decimals() {
        let mut form = form();
        form.set_amount("12.34567890".into());
        assert!(!form.accepts_amount_key(Keystroke::Char('1')));
        assert!(form.accepts_amount_key(Keystroke::Control));
        form.set_amount("12.3456789".into());
        assert!(form.accepts_amount_key(Keystroke::Char('0')));
    }

    #[test]
    fn amount_filter_follows_the_caret() {
        let mut form = form();
        form.set_amount("12.34567890".into());
        form.set_amount_selection(0, 0);
        assert!(form.accepts_amount_key(Keystroke::Char('1')));
        form.set_amount_selection(11, 0);
        assert!(form.accepts_amount_key(Keystroke::Char('5')));

        // A new value puts the caret back at the end.
        form.set_amount("12.34567890".into());
        assert!(!form.accepts_amount_key(Keystroke::Char('1')));
    }

    #[test]
    fn editing_after_a_result_returns_to_ready() {
        let mut form = form();
        let _ = form.prepare_send();
        assert_eq!(form.phase(), SendPhase::ResultShown);
        form.set_amount("1".into());
        assert_eq!(form.phase(), SendPhase::Ready);
    }

    #[test]
    fn notices_render_through_translations() {
        let t = Translations::default();
        assert_eq!(
            Notice::Text("recipient_malformed").render(&t),
            "The recipient account is malformed."
        );
        assert_eq!(Notice::Remote("boom".into()).render(&t), "boom");
    }
}
