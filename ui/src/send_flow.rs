//! Async steps of the send screen.
//!
//! Each driver reads and writes the form through a [`FormCell`] and reports
//! to the user through [`Feedback`], so the same code runs against Dioxus
//! signals and against plain values in tests.

use api::WalletService;
use dioxus::prelude::*;
use dioxus_logger::tracing;

use crate::scanner::Scanner;
use crate::send_form::Notice;
use crate::send_form::Reaction;
use crate::send_form::SendForm;

/// Shared access to a [`SendForm`].
pub trait FormCell {
    fn update<R>(&mut self, f: impl FnOnce(&mut SendForm) -> R) -> R;
}

impl FormCell for Signal<SendForm> {
    fn update<R>(&mut self, f: impl FnOnce(&mut SendForm) -> R) -> R {
        self.with_mut(f)
    }
}

impl FormCell for SendForm {
    fn update<R>(&mut self, f: impl FnOnce(&mut SendForm) -> R) -> R {
        f(self)
    }
}

/// Toasts and the blocking loading indicator.
pub trait Feedback {
    fn toast(&mut self, notice: Notice);
    fn show_loading(&mut self);
    fn hide_loading(&mut self);
}

fn react<S: WalletService, B: Feedback>(service: &S, feedback: &mut B, reaction: &Reaction) {
    if reaction.rotate_peer {
        service.rotate_peer();
    }
    if let Some(notice) = &reaction.notice {
        feedback.toast(notice.clone());
    }
}

/// Fetches the account and updates the displayed balance.
pub async fn refresh_balance<S, F, B>(service: &S, form: &mut F, feedback: &mut B)
where
    S: WalletService,
    F: FormCell,
    B: Feedback,
{
    let account = form.update(SendForm::begin_balance_refresh);
    let result = service.get_account(account).await;
    let reaction = form.update(|f| f.apply_balance(result));
    react(service, feedback, &reaction);
}

/// Validates the form and sends the transfer. A broadcast transfer triggers
/// exactly one balance refresh.
pub async fn submit<S, F, B>(service: &S, form: &mut F, feedback: &mut B)
where
    S: WalletService,
    F: FormCell,
    B: Feedback,
{
    let request = match form.update(SendForm::prepare_send) {
        Ok(request) => request,
        Err(notice) => {
            feedback.toast(notice);
            return;
        }
    };

    feedback.show_loading();
    let result = service.send_money(&request).await;
    feedback.hide_loading();

    let reaction = form.update(|f| f.apply_send_result(result));
    react(service, feedback, &reaction);

    if reaction.refresh_balance {
        refresh_balance(service, form, feedback).await;
    }
}

/// Fills the recipient from a scan. Scanner failures are logged and
/// otherwise ignored.
pub async fn scan_recipient<Sc: Scanner, F: FormCell>(scanner: &Sc, form: &mut F) {
    match scanner.scan().await {
        Ok(outcome) => form.update(|f| f.apply_scan(outcome)),
        Err(e) => tracing::debug!("scan failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ScanError;
    use crate::scanner::ScanOutcome;
    use crate::send_form::SendPhase;
    use api::account::AccountId;
    use api::account::SecretPhrase;
    use api::amount::NqtAmount;
    use api::service::AccountInfo;
    use api::service::SendMoneyReceipt;
    use api::service::SendMoneyRequest;
    use api::ApiError;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    const GENESIS_RS: &str = "NXT-MRCC-2YLS-8M54-3CMAJ";

    #[derive(Debug, PartialEq)]
    enum Event {
        GetAccount(AccountId),
        SendMoney(i64),
        Rotate,
        Toast(Notice),
        ShowLoading,
        HideLoading,
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct MockWallet {
        log: Log,
        accounts: RefCell<VecDeque<Result<AccountInfo, ApiError>>>,
        sends: RefCell<VecDeque<Result<SendMoneyReceipt, ApiError>>>,
    }

    impl WalletService for MockWallet {
        async fn get_account(&self, account: AccountId) -> Result<AccountInfo, ApiError> {
            self.log.borrow_mut().push(Event::GetAccount(account));
            self.accounts
                .borrow_mut()
                .pop_front()
                .expect("unexpected getAccount")
        }

        async fn send_money(
            &self,
            request: &SendMoneyRequest,
        ) -> Result<SendMoneyReceipt, ApiError> {
            self.log.borrow_mut().push(Event::SendMoney(request.amount.as_nqt()));
            self.sends.borrow_mut().pop_front().expect("unexpected sendMoney")
        }

        fn rotate_peer(&self) {
            self.log.borrow_mut().push(Event::Rotate);
        }
    }

    struct RecordingFeedback(Log);

    impl Feedback for RecordingFeedback {
        fn toast(&mut self, notice: Notice) {
            self.0.borrow_mut().push(Event::Toast(notice));
        }
        fn show_loading(&mut self) {
            self.0.borrow_mut().push(Event::ShowLoading);
        }
        fn hide_loading(&mut self) {
            self.0.borrow_mut().push(Event::HideLoading);
        }
    }

    struct Fixture {
        log: Log,
        wallet: MockWallet,
        feedback: RecordingFeedback,
        form: SendForm,
    }

    impl Fixture {
        fn new() -> Self {
            let log = Log::default();
            Self {
                wallet: MockWallet {
                    log: log.clone(),
                    accounts: RefCell::default(),
                    sends: RefCell::default(),
                },
                feedback: RecordingFeedback(log.clone()),
                form: SendForm::new(SecretPhrase::new("secret phrase")),
                log,
            }
        }

        fn own_account(&self, unconfirmed: i64) -> AccountInfo {
            AccountInfo {
                account: self.form.identity().id,
                account_rs: self.form.identity().address.to_string(),
                balance_nqt: NqtAmount::from_nqt(unconfirmed),
                unconfirmed_balance_nqt: NqtAmount::from_nqt(unconfirmed),
                public_key: None,
            }
        }

        fn fill(&mut self, address: &str, amount: &str) {
            self.form.set_address(address.into());
            self.form.set_amount(amount.into());
        }

        fn refresh(&mut self) {
            block_on(refresh_balance(&self.wallet, &mut self.form, &mut self.feedback));
        }

        fn submit(&mut self) {
            block_on(submit(&self.wallet, &mut self.form, &mut self.feedback));
        }

        fn events(&self) -> Vec<Event> {
            self.log.take()
        }
    }

    fn connection_error() -> ApiError {
        ApiError::Connection {
            peer: "http://localhost:7876".into(),
            reason: "connection refused".into(),
        }
    }

    #[test]
    fn refresh_shows_balance() {
        let mut fx = Fixture::new();
        let info = fx.own_account(250_000_000);
        fx.wallet.accounts.borrow_mut().push_back(Ok(info));
        fx.refresh();

        let id = fx.form.identity().id;
        assert_eq!(fx.events(), vec![Event::GetAccount(id)]);
        assert_eq!(fx.form.balance().unwrap().to_string(), "2.5");
        assert_eq!(fx.form.phase(), SendPhase::Ready);
    }

    #[test]
    fn refresh_failure_rotates_then_toasts() {
        let mut fx = Fixture::new();
        fx.wallet.accounts.borrow_mut().push_back(Err(connection_error()));
        fx.refresh();

        let id = fx.form.identity().id;
        assert_eq!(
            fx.events(),
            vec![
                Event::GetAccount(id),
                Event::Rotate,
                Event::Toast(Notice::Text("error_server_connect")),
            ]
        );
        assert!(!fx.form.is_balance_loading());
    }

    #[test]
    fn invalid_form_sends_nothing() {
        let mut fx = Fixture::new();
        fx.fill(GENESIS_RS, "");
        fx.submit();
        assert_eq!(fx.events(), vec![Event::Toast(Notice::Text("error_invalid_input"))]);

        fx.fill("NXT-MRCC-2YLS-8M54", "1");
        fx.submit();
        assert_eq!(fx.events(), vec![Event::Toast(Notice::Text("recipient_malformed"))]);
    }

    #[test]
    fn broadcast_refreshes_balance_once() {
        let mut fx = Fixture::new();
        fx.fill(GENESIS_RS, "1.5");
        fx.wallet.sends.borrow_mut().push_back(Ok(SendMoneyReceipt {
            broadcasted: true,
            transaction: Some("1".into()),
            full_hash: None,
        }));
        let info = fx.own_account(100_000_000);
        fx.wallet.accounts.borrow_mut().push_back(Ok(info));
        fx.submit();

        let id = fx.form.identity().id;
        assert_eq!(
            fx.events(),
            vec![
                Event::ShowLoading,
                Event::SendMoney(150_000_000),
                Event::HideLoading,
                Event::Toast(Notice::Text("success_send_money")),
                Event::GetAccount(id),
            ]
        );
        assert!(fx.form.address.is_empty());
        assert!(fx.form.amount.is_empty());
        assert_eq!(fx.form.balance().unwrap().to_string(), "1");
    }

    #[test]
    fn connection_failure_rotates_once_before_toast() {
        let mut fx = Fixture::new();
        fx.fill(GENESIS_RS, "1");
        fx.wallet.sends.borrow_mut().push_back(Err(connection_error()));
        fx.submit();

        assert_eq!(
            fx.events(),
            vec![
                Event::ShowLoading,
                Event::SendMoney(100_000_000),
                Event::HideLoading,
                Event::Rotate,
                Event::Toast(Notice::Text("error_server_connect")),
            ]
        );
        assert_eq!(fx.form.address, GENESIS_RS);
    }

    #[test]
    fn node_error_is_shown_verbatim() {
        let mut fx = Fixture::new();
        fx.fill(GENESIS_RS, "1");
        fx.wallet.sends.borrow_mut().push_back(Err(ApiError::Remote {
            code: 6,
            description: "Not enough funds".into(),
        }));
        fx.submit();

        let events = fx.events();
        assert_eq!(
            events.last(),
            Some(&Event::Toast(Notice::Remote("Not enough funds".into())))
        );
        assert!(!events.contains(&Event::Rotate));
    }

    #[test]
    fn unbroadcast_transfer_is_reported() {
        let mut fx = Fixture::new();
        fx.fill(GENESIS_RS, "1");
        fx.wallet
            .sends
            .borrow_mut()
            .push_back(Ok(SendMoneyReceipt::default()));
        fx.submit();

        assert_eq!(
            fx.events().last(),
            Some(&Event::Toast(Notice::Text("error_not_broadcasted")))
        );
        assert_eq!(fx.form.amount, "1");
    }

    struct FixedScanner(Option<ScanOutcome>);

    impl Scanner for FixedScanner {
        async fn scan(&self) -> Result<ScanOutcome, ScanError> {
            self.0.clone().ok_or(ScanError::NotFound)
        }
    }

    #[test]
    fn scan_fills_recipient() {
        let mut form = SendForm::new(SecretPhrase::new("secret phrase"));
        let scanner = FixedScanner(Some(ScanOutcome::qr_code(GENESIS_RS.into())));
        block_on(scan_recipient(&scanner, &mut form));
        assert_eq!(form.address, GENESIS_RS);
    }

    #[test]
    fn failed_or_cancelled_scan_keeps_recipient() {
        let mut form = SendForm::new(SecretPhrase::new("secret phrase"));
        form.set_address("typed".into());
        block_on(scan_recipient(&FixedScanner(None), &mut form));
        block_on(scan_recipient(&FixedScanner(Some(ScanOutcome::cancelled())), &mut form));
        assert_eq!(form.address, "typed");
    }
}
