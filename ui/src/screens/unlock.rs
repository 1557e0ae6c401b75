//=============================================================================
// File: src/screens/unlock.rs
//=============================================================================
use crate::components::pico::{Button, Card, Input};
use crate::AppState;
use api::account::SecretPhrase;
use dioxus::prelude::*;

/// Asks for the secret phrase. Nothing is stored; the phrase only lives as
/// long as the send screen that receives it.
#[component]
pub fn UnlockScreen(on_unlock: EventHandler<SecretPhrase>) -> Element {
    let app_state = use_context::<AppState>();
    let t = &app_state.translations;
    let mut phrase = use_signal(String::new);

    rsx! {
        Card {
            h3 { {t.t("unlock")} }
            form {
                onsubmit: move |evt: FormEvent| evt.prevent_default(),
                Input {
                    label: t.t("secret_phrase").to_string(),
                    name: "secret_phrase",
                    input_type: "password".to_string(),
                    value: phrase(),
                    on_input: move |evt: FormEvent| phrase.set(evt.value()),
                }
                Button {
                    disabled: phrase.read().is_empty(),
                    on_click: move |_| {
                        let secret = SecretPhrase::new(phrase.take());
                        if !secret.is_empty() {
                            on_unlock.call(secret);
                        }
                    },
                    {t.t("unlock")}
                }
            }
        }
    }
}
