//=============================================================================
// File: src/screens/send.rs
//=============================================================================
use crate::components::pico::{Button, ButtonType, Card, Input, LoadingOverlay, Toast};
use crate::components::qr_code::AccountQrModal;
use crate::hooks::use_feedback::use_feedback;
use crate::scanner::DeviceScanner;
use crate::send_flow;
use crate::send_form::SendForm;
use crate::AppState;
use api::account::SecretPhrase;
use api::input_filter::Keystroke;
use dioxus::html::input_data::keyboard_types::{Key, Modifiers};
use dioxus::prelude::*;

const AMOUNT_INPUT_ID: &str = "amount-input";

/// Caret or selection of the amount field, in characters.
async fn amount_caret() -> Option<(usize, usize)> {
    let js = format!(
        "const el = document.getElementById('{AMOUNT_INPUT_ID}');
         return el ? [el.selectionStart ?? 0, el.selectionEnd ?? 0] : null;"
    );
    document::eval(&js)
        .join::<Option<(usize, usize)>>()
        .await
        .ok()
        .flatten()
}

/// Maps a key event onto what the amount filter needs to know about it.
fn keystroke(evt: &KeyboardEvent) -> Keystroke {
    let modifiers = evt.modifiers();
    if modifiers.contains(Modifiers::CONTROL) || modifiers.contains(Modifiers::META) {
        return Keystroke::Chord;
    }
    match evt.key() {
        Key::Character(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Keystroke::Char(c),
                _ => Keystroke::Control,
            }
        }
        _ => Keystroke::Control,
    }
}

#[component]
pub fn SendScreen(secret: SecretPhrase) -> Element {
    let app_state = use_context::<AppState>();
    let form = use_signal(|| SendForm::new(secret.clone()));
    let feedback = use_feedback();
    let show_qr = use_signal(|| false);

    // Balance is fetched once per screen entry.
    let load_state = app_state.clone();
    use_hook(move || {
        spawn(async move {
            let (mut form, mut feedback) = (form, feedback);
            send_flow::refresh_balance(&load_state.client, &mut form, &mut feedback).await;
        });
    });

    let t = &app_state.translations;
    let (address, amount, account_rs, balance, balance_loading) = {
        let f = form.read();
        (
            f.address.clone(),
            f.amount.clone(),
            f.identity().address.to_string(),
            f.balance().cloned(),
            f.is_balance_loading(),
        )
    };

    let submit_state = app_state.clone();
    let cancel_label = t.t("cancel").to_string();

    rsx! {
        Card {
            h3 { {t.t("send_nxt")} }

            section {
                small { {t.t("account")} }
                p {
                    style: "margin-bottom: 0.25rem;",
                    strong { style: "word-break: break-all;", "{account_rs}" }
                }
                small { {t.t("balance")} }
                p {
                    "aria-busy": if balance_loading { "true" } else { "false" },
                    if let Some(balance) = &balance {
                        span { style: "font-size: 1.5rem;", "{balance.whole}" }
                        if let Some(fraction) = &balance.fraction {
                            small { "{fraction}" }
                        }
                        " NXT"
                    }
                }
                Button {
                    button_type: ButtonType::Secondary,
                    outline: true,
                    on_click: move |_| {
                        let mut show_qr = show_qr;
                        show_qr.set(true);
                    },
                    {t.t("show_qr_code")}
                }
            }

            form {
                onsubmit: move |evt: FormEvent| evt.prevent_default(),

                Input {
                    label: t.t("recipient_account").to_string(),
                    name: "recipient",
                    placeholder: "NXT-____-____-____-_____".to_string(),
                    value: address,
                    on_input: move |evt: FormEvent| {
                        let mut form = form;
                        form.with_mut(|f| f.set_address(evt.value()));
                    },
                }
                Button {
                    button_type: ButtonType::Secondary,
                    outline: true,
                    on_click: move |_| {
                        let scanner = DeviceScanner::new(cancel_label.clone());
                        spawn(async move {
                            let mut form = form;
                            send_flow::scan_recipient(&scanner, &mut form).await;
                        });
                    },
                    {t.t("scan_qr_code")}
                }

                Input {
                    label: t.t("amount").to_string(),
                    name: "amount",
                    id: AMOUNT_INPUT_ID.to_string(),
                    input_mode: "decimal".to_string(),
                    placeholder: "0.0".to_string(),
                    value: amount,
                    on_keydown: move |evt: KeyboardEvent| {
                        if !form.read().accepts_amount_key(keystroke(&evt)) {
                            evt.prevent_default();
                        }
                    },
                    on_input: move |evt: FormEvent| {
                        let mut form = form;
                        form.with_mut(|f| f.set_amount(evt.value()));
                    },
                    on_caret_change: move |_| {
                        spawn(async move {
                            if let Some((start, end)) = amount_caret().await {
                                let mut form = form;
                                form.with_mut(|f| f.set_amount_selection(start, end));
                            }
                        });
                    },
                }

                Button {
                    on_click: move |_| {
                        let state = submit_state.clone();
                        spawn(async move {
                            let (mut form, mut feedback) = (form, feedback);
                            send_flow::submit(&state.client, &mut form, &mut feedback).await;
                        });
                    },
                    {t.t("send_nxt")}
                }
            }
        }

        AccountQrModal { is_open: show_qr, address: account_rs.clone() }

        if feedback.is_loading() {
            LoadingOverlay { message: t.t("loading_please_wait").to_string() }
        }
        if let Some(toast) = feedback.current_toast() {
            Toast { key: "{toast.id}", message: toast.notice.render(t) }
        }
    }
}
