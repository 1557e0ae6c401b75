pub mod peer_preference;
pub mod user_prefs;
