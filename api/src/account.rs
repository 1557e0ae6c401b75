//! Secret phrase → public key → account id derivation.

use std::fmt;
use std::str::FromStr;

use curve25519_dalek::montgomery::MontgomeryPoint;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use sha2::Digest;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::address::AccountAddress;

/// The passphrase an account is derived from.
///
/// The text is wiped from memory when the last copy is dropped and never
/// shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretPhrase(Zeroizing<String>);

impl SecretPhrase {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self(Zeroizing::new(phrase.into()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// X25519 public key of `SHA-256(phrase)`.
    pub fn public_key(&self) -> PublicKey {
        let seed: [u8; 32] = Sha256::digest(self.0.as_bytes()).into();
        PublicKey(MontgomeryPoint::mul_base_clamped(seed).to_bytes())
    }
}

impl fmt::Debug for SecretPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretPhrase(..)")
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.as_bytes().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// First eight bytes of `SHA-256(public key)`, little endian.
    pub fn account_id(&self) -> AccountId {
        let hash = Sha256::digest(self.as_bytes());
        let mut id = [0u8; 8];
        id.copy_from_slice(&hash[..8]);
        AccountId(u64::from_le_bytes(id))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

/// Numeric account identifier. Nodes send it as a decimal string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct AccountId(u64);

impl AccountId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Everything the send screen knows about the unlocked account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountIdentity {
    pub id: AccountId,
    pub address: AccountAddress,
    pub public_key: PublicKey,
}

impl AccountIdentity {
    pub fn derive(secret: &SecretPhrase) -> Self {
        let public_key = secret.public_key();
        let id = public_key.account_id();
        Self {
            id,
            address: AccountAddress::from(id),
            public_key,
        }
    }
}
