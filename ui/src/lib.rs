// The client-side Dioxus application logic.

use dioxus::prelude::*;

mod app_state;
pub mod compat;
mod components;
pub mod hooks;
pub mod scanner;
mod screens;
pub mod send_flow;
pub mod send_form;

use api::account::SecretPhrase;
use api::prefs::user_prefs::UserPrefs;
use app_state::AppState;
use components::pico::Button;
use components::pico::ButtonType;
use components::pico::Container;
use screens::send::SendScreen;
use screens::unlock::UnlockScreen;

const PICO_CSS: &str = "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.cyan.min.css";

/// Enum to represent the different screens in our application.
#[derive(Clone, PartialEq, Default)]
enum Screen {
    #[default]
    Unlock,
    Send(SecretPhrase),
}

//=============================================================================
// MAIN APPLICATION COMPONENT (Client-side)
//=============================================================================

#[allow(non_snake_case)]
pub fn App() -> Element {
    let responsive_css = r#"
    * { box-sizing: border-box; }

    html, body {
        height: 100%;
        width: 100%;
        margin: 0;
        padding: 0;
        background-color: var(--pico-muted-border-color);
    }

    .app-main-container {
        min-height: 100%;
        max-width: 480px;
        margin: 0 auto;
        padding: 10px;
        display: flex;
        flex-direction: column;
        background-color: var(--pico-background-color);
    }

    .app-main-container header {
        flex-shrink: 0;
        padding: 0 1rem;
        --pico-nav-element-spacing-vertical: 0.5rem;
    }

    .app-main-container .content {
        flex: 1;
        padding: 0 1rem;
    }

    .toast {
        position: fixed;
        left: 50%;
        bottom: 1.5rem;
        transform: translateX(-50%);
        max-width: 90%;
        padding: 0.75rem 1.25rem;
        border-radius: var(--pico-border-radius);
        background-color: var(--pico-contrast-background);
        color: var(--pico-contrast-inverse);
        z-index: 1000;
    }
"#;

    rsx! {
        document::Meta {
            name: "viewport",
            content: "width=device-width, initial-scale=1.0",
        }
        document::Stylesheet {
            href: PICO_CSS,
        }
        style {
            "{responsive_css}"
        }
        AppBody {}
    }
}

#[component]
fn AppBody() -> Element {
    // Configuration is read once, before the first screen is shown.
    let app_state = use_hook(|| {
        let prefs = UserPrefs::from_env();
        dioxus_logger::tracing::info!("prefs: {:#?}", prefs);
        AppState::new(&prefs)
    });

    rsx! {
        LoadedApp { app_state }
    }
}

/// This component holds the main app logic once the shared state exists.
#[component]
fn LoadedApp(app_state: AppState) -> Element {
    // Provide the stable, non-reactive AppState.
    use_context_provider(|| app_state.clone());

    let mut active_screen = use_signal(Screen::default);
    let lock_label = app_state.translations.t("lock").to_string();

    rsx! {
        div {
            class: "app-main-container",
            Container {
                header {
                    nav {
                        ul {
                            li {
                                h1 {
                                    style: "margin: 0; font-size: 1.5rem;",
                                    "NXT Pocket"
                                }
                            }
                        }
                        if matches!(active_screen(), Screen::Send(_)) {
                            ul {
                                li {
                                    Button {
                                        button_type: ButtonType::Contrast,
                                        outline: true,
                                        on_click: move |_| active_screen.set(Screen::Unlock),
                                        "{lock_label}"
                                    }
                                }
                            }
                        }
                    }
                }
                div {
                    class: "content",
                    match active_screen() {
                        Screen::Unlock => rsx! {
                            UnlockScreen {
                                on_unlock: move |secret: SecretPhrase| {
                                    active_screen.set(Screen::Send(secret))
                                },
                            }
                        },
                        Screen::Send(secret) => rsx! {
                            SendScreen {
                                secret,
                            }
                        },
                    }
                }
            }
        }
    }
}
