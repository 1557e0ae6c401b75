use super::peer_preference::PeerPreference;
use crate::i18n::Translations;
use dioxus_logger::tracing;
use serde::Deserialize;
use serde::Serialize;
use std::path::PathBuf;

/// Represents all user prefs. Intended for saving to a file. editing in settings dialog, etc.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct UserPrefs {
    peer_preference: PeerPreference,
    /// JSON file overriding the built-in English text (`NXT_LOCALE_FILE`).
    locale_file: Option<PathBuf>,
}

impl UserPrefs {
    pub fn from_env() -> Self {
        Self {
            peer_preference: PeerPreference::from_env(),
            locale_file: std::env::var_os("NXT_LOCALE_FILE").map(PathBuf::from),
        }
    }

    pub fn peer_preference(&self) -> &PeerPreference {
        &self.peer_preference
    }

    pub fn locale_file(&self) -> Option<&PathBuf> {
        self.locale_file.as_ref()
    }

    /// The configured translations. A locale file that cannot be read is
    /// logged and replaced by the English defaults.
    pub fn translations(&self) -> Translations {
        let Some(path) = self.locale_file() else {
            return Translations::default();
        };
        match Translations::load(path) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("falling back to English text: {e:#}");
                Translations::default()
            }
        }
    }
}

impl Default for UserPrefs {
    fn default() -> Self {
        Self::from_env()
    }
}
