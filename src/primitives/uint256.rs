// Data Structures: 256-bit hash values
//
// Bytes are kept in internal order (the order the hash function emits them),
// which reads as a little-endian integer. Hex strings are written the other
// way round, most significant byte first.
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use serde::{Serialize, Serializer};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Uint256(pub [u8; 32]);

impl Uint256 {
    pub const ZERO: Uint256 = Uint256([0u8; 32]);

    /// Parses a hex literal in display order at compile time.
    ///
    /// Accepts an optional `0x` prefix and fewer than 64 digits, in which case
    /// the value is left-padded with zeros. Used for the parameter tables, so a
    /// malformed literal is a build error rather than a runtime one.
    pub const fn from_static_hex(s: &'static str) -> Self {
        let bytes = s.as_bytes();
        let mut start = 0;
        if bytes.len() >= 2 && bytes[0] == b'0' && (bytes[1] == b'x' || bytes[1] == b'X') {
            start = 2;
        }
        let digits = bytes.len() - start;
        if digits > 64 {
            panic!("hex literal wider than 256 bits");
        }

        let mut out = [0u8; 32];
        let mut i = 0;
        while i < digits {
            let c = bytes[bytes.len() - 1 - i];
            let v = match c {
                b'0'..=b'9' => c - b'0',
                b'a'..=b'f' => c - b'a' + 10,
                b'A'..=b'F' => c - b'A' + 10,
                _ => panic!("invalid hex digit in literal"),
            };
            if i % 2 == 0 {
                out[i / 2] |= v;
            } else {
                out[i / 2] |= v << 4;
            }
            i += 1;
        }
        Uint256(out)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Numeric view for difficulty comparisons.
    pub fn to_u256(&self) -> U256 {
        U256::from_little_endian(&self.0)
    }

    pub fn from_u256(value: U256) -> Self {
        let mut out = [0u8; 32];
        value.to_little_endian(&mut out);
        Uint256(out)
    }
}

impl From<[u8; 32]> for Uint256 {
    fn from(bytes: [u8; 32]) -> Self {
        Uint256(bytes)
    }
}

/// Runtime parsing of a full 64-digit display-order hex string.
impl FromStr for Uint256 {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut out = [0u8; 32];
        hex::decode_to_slice(s, &mut out)?;
        out.reverse();
        Ok(Uint256(out))
    }
}

impl Ord for Uint256 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_u256().cmp(&other.to_u256())
    }
}

impl PartialOrd for Uint256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut display = self.0;
        display.reverse();
        f.write_str(&hex::encode(display))
    }
}

impl fmt::Debug for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uint256({self})")
    }
}

impl Serialize for Uint256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
