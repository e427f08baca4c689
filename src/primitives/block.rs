// Data Structures: Block
use std::fmt;

use serde::Serialize;

use super::transaction::Transaction;
use super::uint256::Uint256;
use crate::crypto::hash::{hash_sha256d, hash_sha256d_concat};
use crate::crypto::pow::PowHasher;

pub const BLOCK_HEADER_BYTES: usize = 80;

/// Block Header (80 bytes on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockHeader {
    pub version: i32,              // 4 bytes
    pub prev_blockhash: Uint256,   // 32 bytes
    pub merkle_root: Uint256,      // 32 bytes
    pub time: u32,                 // 4 bytes (Unix timestamp)
    pub bits: u32,                 // 4 bytes (compact difficulty)
    pub nonce: u32,                // 4 bytes
}

impl BlockHeader {
    pub fn serialize(&self) -> [u8; BLOCK_HEADER_BYTES] {
        let mut buffer = [0u8; BLOCK_HEADER_BYTES];
        buffer[0..4].copy_from_slice(&self.version.to_le_bytes());
        buffer[4..36].copy_from_slice(self.prev_blockhash.as_bytes());
        buffer[36..68].copy_from_slice(self.merkle_root.as_bytes());
        buffer[68..72].copy_from_slice(&self.time.to_le_bytes());
        buffer[72..76].copy_from_slice(&self.bits.to_le_bytes());
        buffer[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        buffer
    }

    /// Block identity hash (double SHA-256 of the header)
    pub fn block_hash(&self) -> Uint256 {
        Uint256(hash_sha256d(&self.serialize()))
    }

    /// Proof-of-work hash, compared against the difficulty ceiling
    pub fn pow_hash<H: PowHasher + ?Sized>(&self, hasher: &H) -> Uint256 {
        hasher.pow_hash(&self.serialize())
    }
}

/// A Full Block containing the header and ordered transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub header: BlockHeader,
    // The first transaction must always be the coinbase transaction.
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn block_hash(&self) -> Uint256 {
        self.header.block_hash()
    }

    /// Compute the Merkle Root using double SHA-256.
    ///
    /// A single transaction is its own root; odd levels pair the last node
    /// with itself.
    pub fn compute_merkle_root(transactions: &[Transaction]) -> Uint256 {
        if transactions.is_empty() {
            return Uint256::ZERO;
        }

        let mut current_level: Vec<[u8; 32]> = transactions.iter().map(|tx| tx.txid().0).collect();

        while current_level.len() > 1 {
            let next_level = current_level
                .chunks(2)
                .map(|pair| {
                    let right = if pair.len() == 2 { &pair[1] } else { &pair[0] };
                    hash_sha256d_concat(&pair[0], right)
                })
                .collect();
            current_level = next_level;
        }

        Uint256(current_level[0])
    }

    /// Header merkle root agrees with the transaction list
    pub fn check_merkle_root(&self) -> bool {
        self.header.merkle_root == Self::compute_merkle_root(&self.transactions)
    }

    /// Full block encoding: header, transaction count, transactions.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buffer = self.header.serialize().to_vec();
        super::transaction::write_compact_size(&mut buffer, self.transactions.len() as u64);
        for tx in &self.transactions {
            buffer.extend_from_slice(&tx.serialize());
        }
        buffer
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Block(hash={}, ver=0x{:08x}, prev={}, merkle_root={}, time={}, bits={:08x}, nonce={}, txs={})",
            self.block_hash(),
            self.header.version,
            self.header.prev_blockhash,
            self.header.merkle_root,
            self.header.time,
            self.header.bits,
            self.header.nonce,
            self.transactions.len()
        )?;
        for tx in &self.transactions {
            writeln!(
                f,
                "  Transaction(txid={}, ver={}, inputs={}, outputs={}, lock_time={})",
                tx.txid(),
                tx.version,
                tx.inputs.len(),
                tx.outputs.len(),
                tx.lock_time
            )?;
            for input in &tx.inputs {
                writeln!(
                    f,
                    "    TxIn(prevout={}:{}, script_sig={})",
                    input.prevout.txid,
                    input.prevout.vout,
                    hex::encode(input.script_sig.as_bytes())
                )?;
            }
            for output in &tx.outputs {
                writeln!(
                    f,
                    "    TxOut(value={}.{:08}, script_pubkey={})",
                    output.value / super::transaction::COIN,
                    output.value % super::transaction::COIN,
                    hex::encode(output.script_pubkey.as_bytes())
                )?;
            }
        }
        Ok(())
    }
}
