//! Validated `DDLLDD` keys and the two hash functions used for double hashing.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Length of every key in bytes.
pub const KEY_LEN: usize = 6;

const HASH1_BASE: usize = 31;
const HASH2_BASE: usize = 17;

/// Per-position shape of a key: `true` for an ASCII digit, `false` for an
/// uppercase ASCII letter.
const DIGIT_POSITIONS: [bool; KEY_LEN] = [true, true, false, false, true, true];

/// A key of the form `DDLLDD`: two ASCII digits, two uppercase ASCII letters,
/// two ASCII digits.
///
/// Public constructors validate their input, so every key held by a table is
/// well-formed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key([u8; KEY_LEN]);

/// Returns `true` if `input` matches `^[0-9]{2}[A-Z]{2}[0-9]{2}$`.
pub fn is_valid_key(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == KEY_LEN && shape_matches(bytes)
}

#[inline]
fn shape_matches(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .zip(DIGIT_POSITIONS)
        .all(|(&b, digit)| if digit { b.is_ascii_digit() } else { b.is_ascii_uppercase() })
}

impl Key {
    /// Validates `input` and wraps it as a key.
    pub fn parse(input: &str) -> Result<Self> {
        if !is_valid_key(input) {
            return Err(Error::InvalidKey(input.to_owned()));
        }
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(input.as_bytes());
        Ok(Self(bytes))
    }

    /// Builds a key from two digit pairs in `0..=99` and two uppercase letters.
    pub(crate) fn from_parts(head: u8, letters: [u8; 2], tail: u8) -> Self {
        debug_assert!(head <= 99 && tail <= 99);
        debug_assert!(letters.iter().all(u8::is_ascii_uppercase));
        Self([
            b'0' + head / 10,
            b'0' + head % 10,
            letters[0],
            letters[1],
            b'0' + tail / 10,
            b'0' + tail % 10,
        ])
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Primary hash: Horner fold with base 31, reduced modulo `modulus` after
    /// every step. Result is in `[0, modulus)`.
    #[inline]
    pub fn primary_hash(&self, modulus: usize) -> usize {
        fold(&self.0, HASH1_BASE, modulus)
    }

    /// Probe step: Horner fold with base 17 modulo `modulus - 1`, plus one.
    /// Result is in `[1, modulus - 1]`, never zero.
    #[inline]
    pub fn step_hash(&self, modulus: usize) -> usize {
        debug_assert!(modulus >= 2);
        fold(&self.0, HASH2_BASE, modulus - 1) + 1
    }
}

#[inline]
fn fold(bytes: &[u8], base: usize, modulus: usize) -> usize {
    bytes
        .iter()
        .fold(0usize, |acc, &b| (acc * base + b as usize) % modulus)
}

impl FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Key::parse(s)
    }
}

impl TryFrom<&str> for Key {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Key::parse(s)
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.as_str())
    }
}
