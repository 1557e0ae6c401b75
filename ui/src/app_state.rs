use api::client::NxtClient;
use api::i18n::Translations;
use api::prefs::user_prefs::UserPrefs;
use std::ops::Deref;
use std::sync::Arc;

pub struct AppStateData {
    pub client: NxtClient,
    pub translations: Translations,
}

/// Read-only state shared by every screen through the Dioxus context.
#[derive(Clone)]
pub struct AppState(Arc<AppStateData>);

impl Deref for AppState {
    type Target = AppStateData;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for AppState {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl AppState {
    pub fn new(prefs: &UserPrefs) -> Self {
        Self(Arc::new(AppStateData {
            client: NxtClient::new(prefs.peer_preference().to_pool()),
            translations: prefs.translations(),
        }))
    }
}
