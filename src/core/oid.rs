//! OID derivation from device identifiers.
//!
//! The tracking database correlates a vehicle to its telemetry records
//! through a 32-bit object identifier. Providers hand us IMEIs, which do
//! not fit, so an OID is carved out of the identifier's digits according
//! to a per-invocation strategy.

use std::fmt;
use std::str::FromStr;

use crate::utils::error::{Result, ToolError};

/// Largest value the 32-bit OID column can hold.
pub const OID_LIMIT: u64 = u32::MAX as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidMode {
    /// Take a fixed number of digit characters and parse them.
    Digits,
    /// Take a fixed number of bytes from the big-endian form of the
    /// full numeric value.
    Bytes,
    /// Take the longest digit window whose value still fits the OID.
    MaxDigits,
}

impl fmt::Display for OidMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OidMode::Digits => "digits",
            OidMode::Bytes => "bytes",
            OidMode::MaxDigits => "max_digits",
        };
        f.write_str(s)
    }
}

impl FromStr for OidMode {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "digits" => Ok(OidMode::Digits),
            "bytes" => Ok(OidMode::Bytes),
            "max_digits" => Ok(OidMode::MaxDigits),
            other => Err(ToolError::UnknownStrategy {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Start,
    End,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Start => "start",
            Direction::End => "end",
        };
        f.write_str(s)
    }
}

impl FromStr for Direction {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "start" => Ok(Direction::Start),
            "end" => Ok(Direction::End),
            other => Err(ToolError::UnknownStrategy {
                value: other.to_string(),
            }),
        }
    }
}

/// How to turn an identifier into an OID. Supplied once per invocation
/// and applied uniformly to every identifier in the run.
#[derive(Debug, Clone, Copy)]
pub struct OidStrategy {
    pub mode: OidMode,
    pub direction: Direction,
    pub count: Option<usize>,
}

/// Derives the OID value for `identifier` according to `strategy`.
///
/// Non-digit characters are stripped first. `digits` mode performs no
/// bound check against [`OID_LIMIT`]; the caller picks a count that
/// matches the OID domain. `max_digits` always prefers the longest
/// window that fits.
pub fn derive_oid(identifier: &str, strategy: &OidStrategy) -> Result<u64> {
    let digits: String = identifier.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(ToolError::EmptyIdentifier {
            identifier: identifier.to_string(),
        });
    }

    match strategy.mode {
        OidMode::Digits => {
            let count = require_count(strategy)?;
            let window = digit_window(&digits, strategy.direction, count);
            parse_window(window, identifier)
        }
        OidMode::Bytes => {
            let count = require_count(strategy)?;
            let value: u128 = digits.parse().map_err(|_| ToolError::Config {
                message: format!("identifier {:?} is too long for bytes mode", identifier),
            })?;
            let bytes = minimal_be_bytes(value);
            let take = count.min(bytes.len());
            let slice = match strategy.direction {
                Direction::Start => &bytes[..take],
                Direction::End => &bytes[bytes.len() - take..],
            };
            let joined = slice.iter().fold(0u128, |acc, b| (acc << 8) | *b as u128);
            u64::try_from(joined).map_err(|_| ToolError::Config {
                message: format!("byte window of {:?} exceeds 8 bytes", identifier),
            })
        }
        OidMode::MaxDigits => {
            for n in (1..=digits.len()).rev() {
                let window = digit_window(&digits, strategy.direction, n);
                if let Ok(value) = window.parse::<u64>() {
                    if value <= OID_LIMIT {
                        return Ok(value);
                    }
                }
            }
            // Unreachable for decimal input: every single digit fits.
            Err(ToolError::NoFittingWindow {
                identifier: identifier.to_string(),
            })
        }
    }
}

fn require_count(strategy: &OidStrategy) -> Result<usize> {
    strategy.count.ok_or_else(|| ToolError::MissingCount {
        mode: strategy.mode.to_string(),
    })
}

fn digit_window(digits: &str, direction: Direction, count: usize) -> &str {
    // `digits` is ASCII only, so byte slicing is safe.
    let count = count.min(digits.len());
    match direction {
        Direction::Start => &digits[..count],
        Direction::End => &digits[digits.len() - count..],
    }
}

fn parse_window(window: &str, identifier: &str) -> Result<u64> {
    window.parse::<u64>().map_err(|_| ToolError::Config {
        message: format!(
            "digit window {:?} of {:?} does not fit an unsigned 64-bit value",
            window, identifier
        ),
    })
}

fn minimal_be_bytes(value: u128) -> Vec<u8> {
    let bit_len = 128 - value.leading_zeros() as usize;
    let byte_len = bit_len.div_ceil(8).max(1);
    value.to_be_bytes()[16 - byte_len..].to_vec()
}

/// One suffix of an identifier that fits the OID domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailCandidate {
    pub text: String,
    pub value: u64,
}

/// Lazy enumeration of identifier suffixes used for fuzzy lookups.
///
/// Yields suffixes of length `min(10, len)` down to 1, longest first,
/// skipping any that do not parse as an unsigned integer within
/// [`OID_LIMIT`]. The iterator is `Clone`; a fresh, fully rewound
/// sequence is obtained by calling [`tails`] again.
#[derive(Debug, Clone)]
pub struct TailCandidates {
    chars: Vec<char>,
    next_len: usize,
}

pub fn tails(identifier: &str) -> TailCandidates {
    let chars: Vec<char> = identifier.trim().chars().collect();
    let next_len = chars.len().min(10);
    TailCandidates { chars, next_len }
}

impl Iterator for TailCandidates {
    type Item = TailCandidate;

    fn next(&mut self) -> Option<TailCandidate> {
        while self.next_len > 0 {
            let k = self.next_len;
            self.next_len -= 1;
            let text: String = self.chars[self.chars.len() - k..].iter().collect();
            if let Ok(value) = text.parse::<u64>() {
                if value <= OID_LIMIT {
                    return Some(TailCandidate { text, value });
                }
            }
        }
        None
    }
}
