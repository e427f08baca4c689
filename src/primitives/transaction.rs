// Data Structures: Transaction
use serde::Serialize;

use super::script::Script;
use super::uint256::Uint256;
use crate::crypto::hash::hash_sha256d;

/// Amounts are counted in the smallest unit.
pub type Amount = i64;

pub const COIN: Amount = 100_000_000;

/// Reference to an earlier output. Coinbase inputs carry the null outpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutPoint {
    pub txid: Uint256,
    pub vout: u32,
}

impl OutPoint {
    pub const fn null() -> Self {
        OutPoint {
            txid: Uint256::ZERO,
            vout: u32::MAX,
        }
    }

    pub fn is_null(&self) -> bool {
        self.txid.is_zero() && self.vout == u32::MAX
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxIn {
    pub prevout: OutPoint,
    pub script_sig: Script,
    pub sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxOut {
    pub value: Amount,
    pub script_pubkey: Script,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub lock_time: u32,
}

impl Transaction {
    /// Legacy wire encoding: version, inputs, outputs, lock time.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&self.version.to_le_bytes());

        write_compact_size(&mut buffer, self.inputs.len() as u64);
        for input in &self.inputs {
            buffer.extend_from_slice(input.prevout.txid.as_bytes());
            buffer.extend_from_slice(&input.prevout.vout.to_le_bytes());
            write_script(&mut buffer, &input.script_sig);
            buffer.extend_from_slice(&input.sequence.to_le_bytes());
        }

        write_compact_size(&mut buffer, self.outputs.len() as u64);
        for output in &self.outputs {
            buffer.extend_from_slice(&output.value.to_le_bytes());
            write_script(&mut buffer, &output.script_pubkey);
        }

        buffer.extend_from_slice(&self.lock_time.to_le_bytes());
        buffer
    }

    /// Double SHA-256 of the serialized transaction.
    pub fn txid(&self) -> Uint256 {
        Uint256(hash_sha256d(&self.serialize()))
    }

    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].prevout.is_null()
    }

    pub fn total_output_value(&self) -> Amount {
        self.outputs.iter().map(|o| o.value).sum()
    }
}

fn write_script(buffer: &mut Vec<u8>, script: &Script) {
    write_compact_size(buffer, script.len() as u64);
    buffer.extend_from_slice(script.as_bytes());
}

pub(crate) fn write_compact_size(buffer: &mut Vec<u8>, n: u64) {
    match n {
        0..=0xfc => buffer.push(n as u8),
        0xfd..=0xffff => {
            buffer.push(0xfd);
            buffer.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            buffer.push(0xfe);
            buffer.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            buffer.push(0xff);
            buffer.extend_from_slice(&n.to_le_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::script::OP_CHECKSIG;

    fn mock_tx() -> Transaction {
        Transaction {
            version: 1,
            inputs: vec![TxIn {
                prevout: OutPoint::null(),
                script_sig: Script::new().push_slice(b"mock"),
                sequence: u32::MAX,
            }],
            outputs: vec![TxOut {
                value: 50 * COIN,
                script_pubkey: Script::new().push_slice(&[2u8; 33]).push_opcode(OP_CHECKSIG),
            }],
            lock_time: 0,
        }
    }

    #[test]
    fn test_compact_size_boundaries() {
        let mut buf = Vec::new();
        write_compact_size(&mut buf, 0xfc);
        assert_eq!(buf, vec![0xfc]);

        buf.clear();
        write_compact_size(&mut buf, 0xfd);
        assert_eq!(buf, vec![0xfd, 0xfd, 0x00]);

        buf.clear();
        write_compact_size(&mut buf, 0x1_0000);
        assert_eq!(buf, vec![0xfe, 0x00, 0x00, 0x01, 0x00]);

        buf.clear();
        write_compact_size(&mut buf, 0x1_0000_0000);
        assert_eq!(buf.len(), 9);
        assert_eq!(buf[0], 0xff);
    }

    #[test]
    fn test_serialized_layout() {
        let tx = mock_tx();
        let bytes = tx.serialize();
        // version(4) + count(1) + outpoint(36) + script(1+5) + seq(4)
        //   + count(1) + value(8) + script(1+35) + locktime(4)
        assert_eq!(bytes.len(), 4 + 1 + 36 + 6 + 4 + 1 + 8 + 36 + 4);
        assert_eq!(&bytes[..4], &[1, 0, 0, 0]);
        assert_eq!(&bytes[bytes.len() - 4..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_txid_is_double_sha_of_encoding() {
        let tx = mock_tx();
        assert_eq!(tx.txid(), Uint256(hash_sha256d(&tx.serialize())));
    }

    #[test]
    fn test_coinbase_detection() {
        let mut tx = mock_tx();
        assert!(tx.is_coinbase());
        tx.inputs[0].prevout.vout = 0;
        assert!(!tx.is_coinbase());
    }

    #[test]
    fn test_total_output_value() {
        let mut tx = mock_tx();
        tx.outputs.push(TxOut {
            value: COIN,
            script_pubkey: Script::new(),
        });
        assert_eq!(tx.total_output_value(), 51 * COIN);
    }
}
