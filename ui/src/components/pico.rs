//! A set of reusable, lifetime-free Dioxus components for the Pico.css framework.
//! To use, ensure you have pico.min.css linked in your main application.

#![allow(non_snake_case)] // Allow PascalCase for component function names

use dioxus::html::input_data::keyboard_types::Key;
use dioxus::prelude::*;

//=============================================================================
// Layout Components
//=============================================================================

/// A centered container for your content.
/// Wraps content in a `<main class="container">` element.
#[component]
pub fn Container(children: Element) -> Element {
    rsx! { main { class: "container", {children} } }
}

/// A card for grouping related content.
/// Wraps content in an `<article>` element.
#[component]
pub fn Card(children: Element) -> Element {
    rsx! { article { {children} } }
}

//=============================================================================
// Interactive Components
//=============================================================================

#[derive(PartialEq, Clone, Copy, Default)]
pub enum ButtonType {
    #[default]
    Primary,
    Secondary,
    Contrast,
}

impl ButtonType {
    fn theme(&self) -> &'static str {
        match self {
            ButtonType::Primary => "primary",
            ButtonType::Secondary => "secondary",
            ButtonType::Contrast => "contrast",
        }
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct ButtonProps {
    children: Element,
    #[props(optional)]
    on_click: Option<EventHandler<MouseEvent>>,
    #[props(default)]
    button_type: ButtonType,
    #[props(default = false)]
    outline: bool,
    #[props(default = false)]
    disabled: bool,
}

/// A versatile button component.
pub fn Button(props: ButtonProps) -> Element {
    let class_str = match (props.outline, props.button_type) {
        (false, ButtonType::Primary) => "",
        (true, ButtonType::Primary) => "outline",
        (false, other) => other.theme(),
        (true, ButtonType::Secondary) => "secondary outline",
        (true, ButtonType::Contrast) => "contrast outline",
    };
    rsx! {
        button {
            class: "{class_str}",
            "data-theme": props.button_type.theme(),
            disabled: props.disabled,
            onclick: move |evt| {
                if let Some(handler) = &props.on_click {
                    handler.call(evt);
                }
            },
            {props.children}
        }
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct InputProps {
    label: String,
    name: String,
    #[props(optional)]
    id: Option<String>,
    #[props(default = "text".to_string())]
    input_type: String,
    #[props(optional)]
    placeholder: Option<String>,
    /// Hint for the on-screen keyboard, e.g. `decimal`.
    #[props(optional)]
    input_mode: Option<String>,
    #[props(default)]
    value: String,
    #[props(optional)]
    on_input: Option<EventHandler<FormEvent>>,
    #[props(optional)]
    on_keydown: Option<EventHandler<KeyboardEvent>>,
    /// Fired after anything that may have moved the caret.
    #[props(optional)]
    on_caret_change: Option<EventHandler<()>>,
    #[props(default = false)]
    disabled: bool,
}

/// A labeled form input field.
pub fn Input(props: InputProps) -> Element {
    let on_input = props.on_input;
    let on_keydown = props.on_keydown;
    let on_caret_change = props.on_caret_change;
    let caret_moved = move || {
        if let Some(handler) = &on_caret_change {
            handler.call(());
        }
    };
    rsx! {
        label {
            "{props.label}",
            input {
                r#type: "{props.input_type}",
                id: props.id.clone(),
                name: "{props.name}",
                value: "{props.value}",
                placeholder: "{props.placeholder.as_deref().unwrap_or(\"\")}",
                inputmode: props.input_mode.clone(),
                autocomplete: "off",
                disabled: props.disabled,
                oninput: move |evt| {
                    if let Some(handler) = &on_input {
                        handler.call(evt);
                    }
                },
                onkeydown: move |evt| {
                    if let Some(handler) = &on_keydown {
                        handler.call(evt);
                    }
                },
                onkeyup: move |_| caret_moved(),
                onclick: move |_| caret_moved(),
            }
        }
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct ModalProps {
    is_open: Signal<bool>,
    title: String,
    children: Element,
}

/// A dialog with a title bar. Closes from the header or on Escape.
pub fn Modal(mut props: ModalProps) -> Element {
    rsx! {
        if (props.is_open)() {
            dialog {
                open: true,
                onkeydown: move |evt| {
                    if evt.key() == Key::Escape {
                        props.is_open.set(false);
                    }
                },
                article {
                    header {
                        a {
                            href: "#",
                            "aria-label": "Close",
                            class: "close",
                            onclick: move |evt| {
                                evt.prevent_default();
                                props.is_open.set(false);
                            }
                        }
                        h3 { style: "margin-bottom: 0;", "{props.title}" }
                    }
                    {props.children}
                }
            }
        }
    }
}

//=============================================================================
// Feedback Components
//=============================================================================

/// A one-line message pinned to the bottom of the screen.
#[component]
pub fn Toast(message: String) -> Element {
    rsx! {
        div {
            class: "toast",
            role: "status",
            "aria-live": "polite",
            "{message}"
        }
    }
}

/// Covers the screen with a busy indicator, blocking input underneath.
#[component]
pub fn LoadingOverlay(message: String) -> Element {
    rsx! {
        dialog {
            open: true,
            article {
                "aria-busy": "true",
                "{message}"
            }
        }
    }
}
