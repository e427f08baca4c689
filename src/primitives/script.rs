// Data Structures: Script
//
// Only the push and opcode operations needed to build coinbase unlock scripts
// and pay-to-pubkey outputs. Scripts are never evaluated here.
use std::fmt;

use serde::{Serialize, Serializer};

pub const OP_0: u8 = 0x00;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_1: u8 = 0x51;
pub const OP_CHECKSIG: u8 = 0xac;

#[derive(Clone, PartialEq, Eq, Default)]
pub struct Script(Vec<u8>);

impl Script {
    pub fn new() -> Self {
        Script(Vec::new())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pushes an integer, using the small-integer opcodes for -1 and 0..=16.
    pub fn push_int(mut self, value: i64) -> Self {
        match value {
            0 => self.0.push(OP_0),
            -1 => self.0.push(OP_1NEGATE),
            1..=16 => self.0.push(OP_1 + (value as u8 - 1)),
            _ => return self.push_slice(&script_num_bytes(value)),
        }
        self
    }

    /// Pushes the minimal script-number encoding as data, never as a
    /// small-integer opcode.
    pub fn push_num(self, value: i64) -> Self {
        self.push_slice(&script_num_bytes(value))
    }

    pub fn push_slice(mut self, data: &[u8]) -> Self {
        let len = data.len();
        if len < OP_PUSHDATA1 as usize {
            self.0.push(len as u8);
        } else if len <= 0xff {
            self.0.push(OP_PUSHDATA1);
            self.0.push(len as u8);
        } else if len <= 0xffff {
            self.0.push(OP_PUSHDATA2);
            self.0.extend_from_slice(&(len as u16).to_le_bytes());
        } else {
            self.0.push(OP_PUSHDATA4);
            self.0.extend_from_slice(&(len as u32).to_le_bytes());
        }
        self.0.extend_from_slice(data);
        self
    }

    pub fn push_opcode(mut self, opcode: u8) -> Self {
        self.0.push(opcode);
        self
    }
}

// Little-endian magnitude with the sign carried in the top bit of the last byte.
fn script_num_bytes(value: i64) -> Vec<u8> {
    if value == 0 {
        return Vec::new();
    }

    let negative = value < 0;
    let mut magnitude = value.unsigned_abs();
    let mut out = Vec::with_capacity(9);
    while magnitude > 0 {
        out.push((magnitude & 0xff) as u8);
        magnitude >>= 8;
    }

    let last = out.len() - 1;
    if out[last] & 0x80 != 0 {
        out.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        out[last] |= 0x80;
    }
    out
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", hex::encode(&self.0))
    }
}

impl Serialize for Script {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_ints_use_opcodes() {
        let script = Script::new().push_int(0).push_int(-1).push_int(1).push_int(16);
        assert_eq!(script.as_bytes(), &[OP_0, OP_1NEGATE, 0x51, 0x60]);
    }

    #[test]
    fn test_large_int_is_pushed_as_data() {
        // 0x1f0fffff has a clear sign bit, so it stays four bytes wide
        let script = Script::new().push_int(521142271);
        assert_eq!(hex::encode(script.as_bytes()), "04ffff0f1f");
    }

    #[test]
    fn test_push_num_never_uses_small_int_opcode() {
        let script = Script::new().push_num(4);
        assert_eq!(script.as_bytes(), &[0x01, 0x04]);
    }

    #[test]
    fn test_script_num_sign_handling() {
        assert_eq!(script_num_bytes(0x80), vec![0x80, 0x00]);
        assert_eq!(script_num_bytes(-0x80), vec![0x80, 0x80]);
        assert_eq!(script_num_bytes(-1), vec![0x81]);
        assert!(script_num_bytes(0).is_empty());
    }

    #[test]
    fn test_pushdata_thresholds() {
        let short = Script::new().push_slice(&[0u8; 75]);
        assert_eq!(short.as_bytes()[0], 75);

        let medium = Script::new().push_slice(&[0u8; 76]);
        assert_eq!(&medium.as_bytes()[..2], &[OP_PUSHDATA1, 76]);

        let long = Script::new().push_slice(&[0u8; 300]);
        assert_eq!(&long.as_bytes()[..3], &[OP_PUSHDATA2, 0x2c, 0x01]);
        assert_eq!(long.len(), 303);
    }
}
