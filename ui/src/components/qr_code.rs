//=============================================================================
// File: src/components/qr_code.rs
//=============================================================================
use crate::app_state::AppState;
use crate::components::pico::Button;
use crate::components::pico::Modal;
use dioxus::prelude::*;
use qrcode::render::svg;
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode, Version};

/// Fixed symbol size for account addresses. Large enough for any RS address.
pub const ADDRESS_QR_VERSION: Version = Version::Normal(3);
pub const ADDRESS_QR_LEVEL: EcLevel = EcLevel::M;
/// Pixels per module when rendered.
pub const ADDRESS_QR_SCALE: u32 = 6;

/// Encodes an address, ignoring surrounding whitespace (including the
/// ideographic space U+3000).
pub fn address_qr_code(address: &str) -> Result<QrCode, QrError> {
    QrCode::with_version(address.trim().as_bytes(), ADDRESS_QR_VERSION, ADDRESS_QR_LEVEL)
}

pub fn address_qr_svg(address: &str) -> Result<String, QrError> {
    let code = address_qr_code(address)?;
    Ok(code
        .render::<svg::Color>()
        .module_dimensions(ADDRESS_QR_SCALE, ADDRESS_QR_SCALE)
        .build())
}

/// Shows the account address as text and as a QR code.
#[component]
pub fn AccountQrModal(is_open: Signal<bool>, address: String) -> Element {
    let app_state = use_context::<AppState>();
    let t = &app_state.translations;

    let image = match address_qr_svg(&address) {
        Ok(svg) => Some(svg),
        Err(e) => {
            dioxus_logger::tracing::warn!("cannot encode {address:?} as QR code: {e}");
            None
        }
    };
    let close_label = t.t("close").to_string();
    let mut open = is_open;

    rsx! {
        Modal {
            is_open,
            title: t.t("account_qr_code").to_string(),
            p {
                style: "text-align: center;",
                strong { style: "word-break: break-all;", "{address}" }
            }
            if let Some(image) = image {
                figure {
                    style: "margin: 0; text-align: center;",
                    div {
                        title: "{address}",
                        dangerous_inner_html: "{image}"
                    }
                }
            }
            footer {
                Button {
                    on_click: move |_| open.set(false),
                    "{close_label}"
                }
            }
        }
    }
}
