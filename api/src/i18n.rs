//! Display text lookup.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

/// Built-in English text, keyed the same way locale files are.
const ENGLISH: &[(&str, &str)] = &[
    ("account", "Account"),
    ("account_qr_code", "Account QR Code"),
    ("amount", "Amount"),
    ("balance", "Balance"),
    ("cancel", "Cancel"),
    ("close", "Close"),
    ("error_account_id", "Invalid account ID."),
    ("error_invalid_input", "Invalid input."),
    ("error_not_broadcasted", "The transaction was not broadcasted."),
    (
        "error_server_connect",
        "Could not connect to server. Switching to another node, please try again.",
    ),
    ("loading_please_wait", "Loading, please wait..."),
    ("lock", "Lock"),
    ("recipient_account", "Recipient Account"),
    ("recipient_malformed", "The recipient account is malformed."),
    ("scan_qr_code", "Scan QR Code"),
    ("secret_phrase", "Secret Phrase"),
    ("send_nxt", "Send NXT"),
    ("show_qr_code", "Show QR Code"),
    ("success_send_money", "NXT has been sent!"),
    ("unlock", "Unlock"),
];

/// Translated strings. Missing keys render as the key itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Translations {
    entries: HashMap<String, String>,
}

impl Translations {
    /// Reads a flat JSON object of `key: text` pairs over the English defaults.
    pub fn with_overrides_json(json: &str) -> anyhow::Result<Self> {
        let overrides: HashMap<String, String> =
            serde_json::from_str(json).context("locale file is not a flat JSON object of strings")?;
        let mut translations = Self::default();
        translations.entries.extend(overrides);
        Ok(translations)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading locale file {}", path.display()))?;
        Self::with_overrides_json(&json)
    }

    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map(String::as_str).unwrap_or(key)
    }
}

impl Default for Translations {
    fn default() -> Self {
        Self {
            entries: ENGLISH
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_defaults_and_unknown_keys() {
        let t = Translations::default();
        assert_eq!(t.t("send_nxt"), "Send NXT");
        assert_eq!(t.t("no_such_key"), "no_such_key");
    }

    #[test]
    fn overrides_replace_only_given_keys() {
        let t = Translations::with_overrides_json(r#"{"send_nxt":"NXT senden"}"#).unwrap();
        assert_eq!(t.t("send_nxt"), "NXT senden");
        assert_eq!(t.t("close"), "Close");
    }

    #[test]
    fn rejects_nested_json() {
        assert!(Translations::with_overrides_json(r#"{"a":{"b":"c"}}"#).is_err());
    }
}
