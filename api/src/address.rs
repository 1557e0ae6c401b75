//! Reed-Solomon account addresses (`NXT-XXXX-XXXX-XXXX-XXXXX`).
//!
//! An address is the account id written as 13 base-32 symbols, least
//! significant first, followed by 4 parity symbols over GF(32). The 17
//! symbols are then printed in a fixed, shuffled order.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::account::AccountId;

const PREFIX: &str = "NXT-";
const ALPHABET: &[u8; 32] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";
const DATA_LEN: usize = 13;
const CODEWORD_LEN: usize = 17;
const CODEWORD_MAP: [usize; CODEWORD_LEN] = [
    3, 2, 1, 0, 7, 6, 5, 4, 13, 14, 15, 16, 12, 8, 9, 10, 11,
];

const GEXP: [u8; 32] = [
    1, 2, 4, 8, 16, 5, 10, 20, 13, 26, 17, 7, 14, 28, 29, 31, 27, 19, 3, 6, 12, 24, 21, 15, 30,
    25, 23, 11, 22, 9, 18, 1,
];
const GLOG: [u8; 32] = [
    0, 0, 1, 18, 2, 5, 19, 11, 3, 29, 6, 27, 20, 8, 12, 23, 4, 10, 30, 17, 7, 22, 28, 26, 21, 25,
    9, 16, 13, 14, 24, 15,
];

/// An error that can occur when parsing a recipient string.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseAddressError {
    #[error("address is empty")]
    Empty,
    #[error("address must have 17 symbols, found {0}")]
    WrongLength(usize),
    #[error("address checksum does not match")]
    BadChecksum,
    #[error("account number is out of range")]
    OutOfRange,
}

/// A checksummed account address.
///
/// `Display` yields the canonical upper-case form with the `NXT-` prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct AccountAddress {
    id: AccountId,
}

impl AccountAddress {
    pub fn account_id(&self) -> AccountId {
        self.id
    }

    /// Parses either an RS address (prefix optional, any case, separators
    /// ignored) or a plain decimal account number.
    pub fn parse(input: &str) -> Result<Self, ParseAddressError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseAddressError::Empty);
        }

        if trimmed.len() <= 20 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return trimmed
                .parse::<u64>()
                .map(|id| Self::from(AccountId::new(id)))
                .map_err(|_| ParseAddressError::OutOfRange);
        }

        let upper = trimmed.to_ascii_uppercase();
        let body = upper.strip_prefix(PREFIX).unwrap_or(&upper);

        let mut codeword = [0u8; CODEWORD_LEN];
        let mut count = 0;
        for c in body.bytes() {
            let Some(symbol) = ALPHABET.iter().position(|&a| a == c) else {
                continue;
            };
            if count < CODEWORD_LEN {
                codeword[CODEWORD_MAP[count]] = symbol as u8;
            }
            count += 1;
        }
        if count != CODEWORD_LEN {
            return Err(ParseAddressError::WrongLength(count));
        }
        if !is_codeword_valid(&codeword) {
            return Err(ParseAddressError::BadChecksum);
        }

        let mut id: u64 = 0;
        for &digit in codeword[..DATA_LEN].iter().rev() {
            id = id
                .checked_mul(32)
                .and_then(|v| v.checked_add(u64::from(digit)))
                .ok_or(ParseAddressError::OutOfRange)?;
        }
        Ok(Self::from(AccountId::new(id)))
    }

    fn codeword(&self) -> [u8; CODEWORD_LEN] {
        let mut codeword = [0u8; CODEWORD_LEN];
        let value = self.id.get();
        for (i, slot) in codeword.iter_mut().take(DATA_LEN).enumerate() {
            // 13 * 5 = 65 bits; symbol 12 covers bits 60..64 and holds the top 4.
            *slot = ((value >> (5 * i)) & 31) as u8;
        }

        let mut p = [0u8; 4];
        for i in (0..DATA_LEN).rev() {
            let fb = codeword[i] ^ p[3];
            p[3] = p[2] ^ gmult(30, fb);
            p[2] = p[1] ^ gmult(6, fb);
            p[1] = p[0] ^ gmult(9, fb);
            p[0] = gmult(17, fb);
        }
        codeword[DATA_LEN..].copy_from_slice(&p);
        codeword
    }
}

impl From<AccountId> for AccountAddress {
    fn from(id: AccountId) -> Self {
        Self { id }
    }
}

impl FromStr for AccountAddress {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codeword = self.codeword();
        let mut out = String::with_capacity(PREFIX.len() + CODEWORD_LEN + 3);
        out.push_str(PREFIX);
        for (i, &index) in CODEWORD_MAP.iter().enumerate() {
            out.push(ALPHABET[codeword[index] as usize] as char);
            if i & 3 == 3 && i < DATA_LEN {
                out.push('-');
            }
        }
        f.write_str(&out)
    }
}

fn gmult(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let idx = (GLOG[a as usize] as usize + GLOG[b as usize] as usize) % 31;
    GEXP[idx]
}

fn is_codeword_valid(codeword: &[u8; CODEWORD_LEN]) -> bool {
    let mut sum = 0;
    for i in 1..5 {
        let mut t = 0;
        for j in 0..31usize {
            if j > 12 && j < 27 {
                continue;
            }
            let pos = if j > 26 { j - 14 } else { j };
            t ^= gmult(codeword[pos], GEXP[(i * j) % 31]);
        }
        sum |= t;
    }
    sum == 0
}
