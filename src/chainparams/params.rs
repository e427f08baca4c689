// Per-network parameter set: network identity, consensus rules, the genesis
// block and the address prefixes nodes on that network agree on.
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;

use serde::Serialize;

use super::network::Network;
use crate::config::SearchConfig;
use crate::consensus::genesis::{GenesisNonce, GenesisParams, discover_genesis, verify_known_genesis};
use crate::consensus::params::{ConsensusParams, DeploymentPos};
use crate::crypto::pow::PowHasher;
use crate::error::Result;
use crate::primitives::block::Block;
use crate::primitives::uint256::Uint256;

/// Wire and node-policy settings that identify a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkIdentity {
    pub network: Network,
    /// Prefix of every P2P message; unlikely to occur in normal data
    pub message_start: [u8; 4],
    pub default_port: u16,
    pub prune_after_height: u64,
    pub default_consistency_checks: bool,
    pub require_standard: bool,
    pub mine_blocks_on_demand: bool,
    pub mining_requires_peers: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Base58Type {
    PubkeyAddress,
    ScriptAddress,
    SecretKey,
    ExtPublicKey,
    ExtSecretKey,
}

/// Version prefixes for base58 encodings. Stored, never interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Base58Prefixes {
    pub pubkey_address: Vec<u8>,
    pub script_address: Vec<u8>,
    pub secret_key: Vec<u8>,
    pub ext_public_key: Vec<u8>,
    pub ext_secret_key: Vec<u8>,
}

impl Base58Prefixes {
    pub fn get(&self, kind: Base58Type) -> &[u8] {
        match kind {
            Base58Type::PubkeyAddress => &self.pubkey_address,
            Base58Type::ScriptAddress => &self.script_address,
            Base58Type::SecretKey => &self.secret_key,
            Base58Type::ExtPublicKey => &self.ext_public_key,
            Base58Type::ExtSecretKey => &self.ext_secret_key,
        }
    }
}

/// Height → block hash pairs the chain must pass through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckpointData {
    pub checkpoints: BTreeMap<u32, Uint256>,
}

impl CheckpointData {
    pub fn last_height(&self) -> Option<u32> {
        self.checkpoints.keys().next_back().copied()
    }
}

/// Transaction-count statistics used to estimate verification progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChainTxData {
    /// UNIX timestamp of the last known transaction count
    pub time: i64,
    /// Total transactions between genesis and that timestamp
    pub tx_count: i64,
    /// Estimated transactions per second after that timestamp
    pub tx_rate: f64,
}

/// Unbuilt description of a network, as written in the parameter tables.
#[derive(Debug, Clone)]
pub struct NetworkSpec {
    pub identity: NetworkIdentity,
    pub consensus: ConsensusParams,
    pub genesis: GenesisParams,
    pub base58_prefixes: Base58Prefixes,
    pub checkpoints: CheckpointData,
    pub chain_tx_data: ChainTxData,
}

/// Built parameter set. Read-only once constructed, apart from deployment
/// windows which the registry may override.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainParams {
    identity: NetworkIdentity,
    consensus: ConsensusParams,
    genesis: Block,
    base58_prefixes: Base58Prefixes,
    checkpoints: CheckpointData,
    chain_tx_data: ChainTxData,
}

impl ChainParams {
    pub fn build<H: PowHasher + ?Sized>(spec: NetworkSpec, hasher: &H) -> Result<Self> {
        Self::build_with(spec, hasher, &SearchConfig::default())
    }

    /// Builds the genesis block, checking a known nonce or searching for one,
    /// and caches its hash in the consensus parameters.
    pub fn build_with<H: PowHasher + ?Sized>(spec: NetworkSpec, hasher: &H, search: &SearchConfig) -> Result<Self> {
        let NetworkSpec {
            identity,
            mut consensus,
            genesis,
            base58_prefixes,
            checkpoints,
            chain_tx_data,
        } = spec;
        let network = identity.network.as_str();

        let block = match &genesis.nonce {
            GenesisNonce::Known(known) => {
                verify_known_genesis(network, &genesis, known, &consensus.pow_limit, hasher)?
            }
            GenesisNonce::Search => {
                let never = AtomicBool::new(false);
                discover_genesis(network, &genesis, &consensus.pow_limit, hasher, search, &never)?.block
            }
        };
        consensus.hash_genesis_block = block.block_hash();

        Ok(ChainParams {
            identity,
            consensus,
            genesis: block,
            base58_prefixes,
            checkpoints,
            chain_tx_data,
        })
    }

    pub fn network(&self) -> Network {
        self.identity.network
    }

    pub fn network_id(&self) -> &'static str {
        self.identity.network.as_str()
    }

    pub fn identity(&self) -> &NetworkIdentity {
        &self.identity
    }

    pub fn consensus(&self) -> &ConsensusParams {
        &self.consensus
    }

    pub fn genesis_block(&self) -> &Block {
        &self.genesis
    }

    pub fn genesis_hash(&self) -> Uint256 {
        self.consensus.hash_genesis_block
    }

    pub fn message_start(&self) -> [u8; 4] {
        self.identity.message_start
    }

    pub fn default_port(&self) -> u16 {
        self.identity.default_port
    }

    pub fn prune_after_height(&self) -> u64 {
        self.identity.prune_after_height
    }

    pub fn require_standard(&self) -> bool {
        self.identity.require_standard
    }

    pub fn mine_blocks_on_demand(&self) -> bool {
        self.identity.mine_blocks_on_demand
    }

    pub fn mining_requires_peers(&self) -> bool {
        self.identity.mining_requires_peers
    }

    pub fn default_consistency_checks(&self) -> bool {
        self.identity.default_consistency_checks
    }

    pub fn base58_prefix(&self, kind: Base58Type) -> &[u8] {
        self.base58_prefixes.get(kind)
    }

    pub fn checkpoints(&self) -> &CheckpointData {
        &self.checkpoints
    }

    pub fn chain_tx_data(&self) -> &ChainTxData {
        &self.chain_tx_data
    }

    pub(crate) fn update_deployment_window(&mut self, pos: DeploymentPos, start_time: i64, timeout: i64) {
        self.consensus.set_deployment_window(pos, start_time, timeout);
    }
}
