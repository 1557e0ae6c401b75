//! The set of nodes the client may talk to, and failover between them.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use serde::Serialize;

/// Two lists of node base URLs and the one currently in use.
///
/// Open-API peers are preferred for failover; CORS peers are the fallback
/// list when no open-API peer is known.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerPool {
    open_api: Vec<String>,
    cors: Vec<String>,
    current: Option<String>,
}

impl PeerPool {
    pub fn new(open_api: Vec<String>, cors: Vec<String>) -> Self {
        let current = open_api.first().or_else(|| cors.first()).cloned();
        Self {
            open_api,
            cors,
            current,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The list rotation draws from.
    pub fn candidates(&self) -> &[String] {
        if self.open_api.is_empty() {
            &self.cors
        } else {
            &self.open_api
        }
    }

    /// Switches to a random peer, different from the current one whenever
    /// the candidate list has more than one entry. Returns the new peer.
    pub fn rotate_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&str> {
        let current = self.current.clone();
        let others: Vec<&String> = self
            .candidates()
            .iter()
            .filter(|p| Some(p.as_str()) != current.as_deref())
            .collect();

        let next = match others.choose(rng) {
            Some(peer) => Some((*peer).clone()),
            None => self.candidates().choose(rng).cloned(),
        };
        if next.is_some() {
            self.current = next;
        }
        self.current.as_deref()
    }

    pub fn rotate(&mut self) -> Option<&str> {
        self.rotate_with(&mut rand::thread_rng())
    }
}
