// Genesis block definition
//
// Every network starts from the same coinbase: the timestamp text below paid
// to a fixed public key. The output cannot be spent since it never existed in
// the UTXO database. Networks differ only in header time, bits and nonce.

use std::sync::atomic::AtomicBool;

use serde::Serialize;
use tracing::info;

use crate::config::SearchConfig;
use crate::crypto::pow::{PowHasher, meets_target};
use crate::error::{ChainParamsError, GenesisField, Result};
use crate::miner::search::{SearchOutcome, SearchResult, search_nonce};
use crate::primitives::block::{Block, BlockHeader};
use crate::primitives::script::{OP_CHECKSIG, Script};
use crate::primitives::transaction::{Amount, OutPoint, Transaction, TxIn, TxOut};
use crate::primitives::uint256::Uint256;

/// Text embedded in the genesis coinbase unlock script
pub const GENESIS_TIMESTAMP: &str = "July/17th/2024";

/// Uncompressed public key the genesis reward is paid to
const GENESIS_OUTPUT_PUBKEY: [u8; 65] = [
    0x04, 0xc8, 0x7d, 0x66, 0xac, 0xdc, 0xda, 0x47,
    0x65, 0x75, 0x1a, 0x47, 0x83, 0x97, 0x02, 0xec,
    0x12, 0x24, 0x5a, 0xce, 0x92, 0x45, 0xec, 0x55,
    0xe7, 0xb6, 0xbc, 0xaa, 0xb4, 0xcc, 0x21, 0x44,
    0xae, 0xc1, 0xc4, 0xe3, 0xdb, 0x68, 0x0b, 0x7b,
    0x4c, 0x6e, 0xd6, 0xac, 0x4a, 0xae, 0xa1, 0x8c,
    0x39, 0x99, 0xfa, 0xfa, 0xba, 0x34, 0x43, 0xaf,
    0xb8, 0xb5, 0x88, 0x3f, 0x57, 0xf6, 0x34, 0xb9,
    0x7e,
];

// Marker values pushed ahead of the timestamp text in the unlock script
const COINBASE_MARKER_BITS: i64 = 521142271;
const COINBASE_MARKER_EXTRA: i64 = 4;

/// Pay-to-pubkey script for the genesis reward.
pub fn genesis_output_script() -> Script {
    Script::new().push_slice(&GENESIS_OUTPUT_PUBKEY).push_opcode(OP_CHECKSIG)
}

/// Builds the single coinbase transaction of a genesis block.
pub fn create_genesis_transaction(timestamp: &str, output_script: &Script, reward: Amount) -> Transaction {
    let script_sig = Script::new()
        .push_int(COINBASE_MARKER_BITS)
        .push_num(COINBASE_MARKER_EXTRA)
        .push_slice(timestamp.as_bytes());

    Transaction {
        version: 1,
        inputs: vec![TxIn {
            prevout: OutPoint::null(),
            script_sig,
            sequence: u32::MAX,
        }],
        outputs: vec![TxOut {
            value: reward,
            script_pubkey: output_script.clone(),
        }],
        lock_time: 0,
    }
}

pub fn create_genesis_block_with(
    timestamp: &str,
    output_script: &Script,
    time: u32,
    nonce: u32,
    bits: u32,
    version: i32,
    reward: Amount,
) -> Block {
    let coinbase = create_genesis_transaction(timestamp, output_script, reward);
    let transactions = vec![coinbase];
    let merkle_root = Block::compute_merkle_root(&transactions);

    Block {
        header: BlockHeader {
            version,
            prev_blockhash: Uint256::ZERO,
            merkle_root,
            time,
            bits,
            nonce,
        },
        transactions,
    }
}

/// Genesis block with this chain's fixed timestamp text and payout script.
pub fn create_genesis_block(time: u32, nonce: u32, bits: u32, version: i32, reward: Amount) -> Block {
    create_genesis_block_with(GENESIS_TIMESTAMP, &genesis_output_script(), time, nonce, bits, version, reward)
}

/// Values a known genesis block has to reproduce exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KnownGenesis {
    pub nonce: u32,
    pub hash: Uint256,
    pub merkle_root: Uint256,
}

/// How the genesis nonce is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GenesisNonce {
    /// Nonce already mined; the block is assembled once and checked.
    Known(KnownGenesis),
    /// Nonce not yet known; brute-force it at construction time.
    Search,
}

/// Header inputs of a network's genesis block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenesisParams {
    pub time: u32,
    pub bits: u32,
    pub version: i32,
    pub reward: Amount,
    pub nonce: GenesisNonce,
}

impl GenesisParams {
    pub fn assemble(&self, nonce: u32) -> Block {
        create_genesis_block(self.time, nonce, self.bits, self.version, self.reward)
    }
}

/// Assembles the genesis block from a known nonce and checks it against the
/// table. Any disagreement means the parameter table is corrupt.
pub fn verify_known_genesis<H: PowHasher + ?Sized>(
    network: &'static str,
    params: &GenesisParams,
    known: &KnownGenesis,
    pow_limit: &Uint256,
    hasher: &H,
) -> Result<Block> {
    let block = params.assemble(known.nonce);

    if block.header.merkle_root != known.merkle_root {
        return Err(ChainParamsError::GenesisMismatch {
            network,
            field: GenesisField::MerkleRoot,
            expected: known.merkle_root,
            actual: block.header.merkle_root,
        });
    }

    let hash = block.block_hash();
    if hash != known.hash {
        return Err(ChainParamsError::GenesisMismatch {
            network,
            field: GenesisField::BlockHash,
            expected: known.hash,
            actual: hash,
        });
    }

    let pow_hash = block.header.pow_hash(hasher);
    if !meets_target(&pow_hash, pow_limit) {
        return Err(ChainParamsError::GenesisMismatch {
            network,
            field: GenesisField::ProofOfWork,
            expected: *pow_limit,
            actual: pow_hash,
        });
    }

    info!(network, %hash, nonce = known.nonce, "genesis block verified");
    Ok(block)
}

/// Searches for the genesis nonce and reports the result to the operator.
pub fn discover_genesis<H: PowHasher + ?Sized>(
    network: &'static str,
    params: &GenesisParams,
    pow_limit: &Uint256,
    hasher: &H,
    config: &SearchConfig,
    stop: &AtomicBool,
) -> Result<SearchOutcome> {
    // Nonce 0 marks the template as not yet mined
    let template = params.assemble(0);

    match search_nonce(&template, pow_limit, hasher, config, stop) {
        SearchResult::Found(outcome) => {
            info!(
                network,
                nonce = outcome.nonce,
                hash = %outcome.block.block_hash(),
                pow_hash = %outcome.pow_hash,
                attempts = outcome.attempts,
                "genesis nonce found\n{}",
                outcome.block
            );
            Ok(outcome)
        }
        SearchResult::Cancelled { attempts } => Err(ChainParamsError::SearchCancelled { attempts }),
        SearchResult::Exhausted => Err(ChainParamsError::NonceSpaceExhausted),
    }
}
