// Parameter tables for main, test and regtest. The three differ only in
// constants; all of them go through the same `ChainParams::build`.
//
// What makes a good checkpoint block?
// + Is surrounded by blocks with reasonable timestamps
//   (no blocks before with a timestamp after, none after with
//    timestamp before)
// + Contains no strange transactions

use super::network::Network;
use super::params::{Base58Prefixes, ChainParams, ChainTxData, CheckpointData, NetworkIdentity, NetworkSpec};
use crate::consensus::genesis::{GenesisNonce, GenesisParams, KnownGenesis};
use crate::consensus::params::{Bip9Deployment, ConsensusParams};
use crate::crypto::pow::{PowHasher, ScryptPow};
use crate::error::Result;
use crate::primitives::transaction::COIN;
use crate::primitives::uint256::Uint256;

/// Genesis header time shared by every network: Jul 17 2024 15:06:14 UTC
const GENESIS_TIME: u32 = 1721228774;

/// The genesis coinbase is identical on every network, so is its txid
const GENESIS_MERKLE_ROOT: Uint256 =
    Uint256::from_static_hex("0xb878d2ba72742d90114db17c9708956b9f72c5e668515b103dbdbfa3f94ec683");

const MAIN_GENESIS_HASH: Uint256 =
    Uint256::from_static_hex("0x198bed01be8afc0e13555b8aa4bbe9817342b2eed91081708791d8188fbd2694");
const MAIN_GENESIS_NONCE: u32 = 5572;

const REGTEST_GENESIS_HASH: Uint256 =
    Uint256::from_static_hex("0xef746b384e6686c46f7152559ab5d45283d34c4430589686b3cb6389fa97e2b9");
const REGTEST_GENESIS_NONCE: u32 = 25;

const MAIN_POW_LIMIT: Uint256 =
    Uint256::from_static_hex("0x000fffff00000000000000000000000000000000000000000000000000000000");
const REGTEST_POW_LIMIT: Uint256 =
    Uint256::from_static_hex("0x0fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff");

/// 3.5 days
const POW_TARGET_TIMESPAN: i64 = 7 * 12 * 60 * 60;
/// 2.5 minutes
const POW_TARGET_SPACING: i64 = 150;

/// Jan 1 2008 .. Dec 31 2008: the test deployment is never active on public chains
const TESTDUMMY_WINDOW: (i64, i64) = (1199145601, 1230767999);
/// Jun 10 2024 .. Jun 10 2025
const SOFT_FORK_WINDOW: (i64, i64) = (1718046043, 1749582043);
/// Open from the start and never timing out, for regtest
const ALWAYS_OPEN_WINDOW: (i64, i64) = (0, 999999999999);

fn deployments(testdummy: (i64, i64), soft_forks: (i64, i64)) -> [Bip9Deployment; 3] {
    [
        Bip9Deployment { bit: 28, start_time: testdummy.0, timeout: testdummy.1 },
        Bip9Deployment { bit: 0, start_time: soft_forks.0, timeout: soft_forks.1 },
        Bip9Deployment { bit: 1, start_time: soft_forks.0, timeout: soft_forks.1 },
    ]
}

fn test_base58_prefixes() -> Base58Prefixes {
    Base58Prefixes {
        pubkey_address: vec![111],
        script_address: vec![196],
        secret_key: vec![239],
        ext_public_key: vec![0x04, 0x35, 0x87, 0xCF],
        ext_secret_key: vec![0x04, 0x35, 0x83, 0x94],
    }
}

fn main_genesis(bits: u32) -> GenesisParams {
    GenesisParams {
        time: GENESIS_TIME,
        bits,
        version: 1,
        reward: 50 * COIN,
        nonce: GenesisNonce::Known(KnownGenesis {
            nonce: MAIN_GENESIS_NONCE,
            hash: MAIN_GENESIS_HASH,
            merkle_root: GENESIS_MERKLE_ROOT,
        }),
    }
}

/// Main network
pub fn main_spec() -> NetworkSpec {
    NetworkSpec {
        identity: NetworkIdentity {
            network: Network::Main,
            message_start: [0x67, 0x10, 0x85, 0x34],
            default_port: 9876,
            prune_after_height: 1_000_000,
            default_consistency_checks: false,
            require_standard: true,
            mine_blocks_on_demand: false,
            mining_requires_peers: true,
        },
        consensus: ConsensusParams {
            hash_genesis_block: Uint256::ZERO,
            subsidy_halving_interval: 840_000,
            bip34_height: 0,
            bip34_hash: MAIN_GENESIS_HASH,
            bip65_height: 0,
            bip66_height: 0,
            rule_change_activation_threshold: 1512, // 75% of 2016
            miner_confirmation_window: 2016,        // pow_target_timespan / pow_target_spacing
            deployments: deployments(TESTDUMMY_WINDOW, SOFT_FORK_WINDOW),
            pow_limit: MAIN_POW_LIMIT,
            pow_allow_min_difficulty_blocks: false,
            pow_no_retargeting: false,
            pow_target_spacing: POW_TARGET_SPACING,
            pow_target_timespan: POW_TARGET_TIMESPAN,
            minimum_chain_work: Uint256::ZERO,
            default_assume_valid: MAIN_GENESIS_HASH,
        },
        genesis: main_genesis(0x1f0fffff),
        base58_prefixes: Base58Prefixes {
            pubkey_address: vec![36],
            script_address: vec![63],
            secret_key: vec![128],
            ext_public_key: vec![0x04, 0x88, 0xB2, 0x1E],
            ext_secret_key: vec![0x04, 0x88, 0xAD, 0xE4],
        },
        checkpoints: CheckpointData::default(),
        // Data as of the genesis block
        chain_tx_data: ChainTxData {
            time: GENESIS_TIME as i64,
            tx_count: 0,
            tx_rate: 0.0,
        },
    }
}

/// Public test network. Shares the main genesis block.
pub fn test_spec() -> NetworkSpec {
    NetworkSpec {
        identity: NetworkIdentity {
            network: Network::Test,
            message_start: [0x58, 0x38, 0x62, 0x41],
            default_port: 19876,
            prune_after_height: 1000,
            default_consistency_checks: false,
            require_standard: false,
            mine_blocks_on_demand: false,
            mining_requires_peers: true,
        },
        consensus: ConsensusParams {
            hash_genesis_block: Uint256::ZERO,
            subsidy_halving_interval: 840_000,
            bip34_height: 0,
            bip34_hash: MAIN_GENESIS_HASH,
            bip65_height: 0,
            bip66_height: 0,
            rule_change_activation_threshold: 1512,
            miner_confirmation_window: 2016,
            deployments: deployments(TESTDUMMY_WINDOW, SOFT_FORK_WINDOW),
            pow_limit: MAIN_POW_LIMIT,
            pow_allow_min_difficulty_blocks: true,
            pow_no_retargeting: false,
            pow_target_spacing: POW_TARGET_SPACING,
            pow_target_timespan: POW_TARGET_TIMESPAN,
            minimum_chain_work: Uint256::ZERO,
            default_assume_valid: MAIN_GENESIS_HASH,
        },
        genesis: main_genesis(0x1f0fffff),
        base58_prefixes: test_base58_prefixes(),
        checkpoints: CheckpointData::default(),
        chain_tx_data: ChainTxData {
            time: GENESIS_TIME as i64,
            tx_count: 0,
            tx_rate: 0.0,
        },
    }
}

/// Regression test network: no retargeting and short activation windows so
/// tests can mine deterministic chains quickly.
pub fn regtest_spec() -> NetworkSpec {
    NetworkSpec {
        identity: NetworkIdentity {
            network: Network::Regtest,
            message_start: [0x47, 0x28, 0x74, 0x32],
            default_port: 19444,
            prune_after_height: 1000,
            default_consistency_checks: true,
            require_standard: false,
            mine_blocks_on_demand: true,
            mining_requires_peers: false,
        },
        consensus: ConsensusParams {
            hash_genesis_block: Uint256::ZERO,
            subsidy_halving_interval: 35,
            // Far in the future so version 1 blocks are not rejected in tests
            bip34_height: 100_000_000,
            bip34_hash: Uint256::ZERO,
            bip65_height: 0,
            bip66_height: 0,
            rule_change_activation_threshold: 108, // 75% for test chains
            miner_confirmation_window: 144,        // faster than normal (144 instead of 2016)
            deployments: deployments(ALWAYS_OPEN_WINDOW, ALWAYS_OPEN_WINDOW),
            pow_limit: REGTEST_POW_LIMIT,
            pow_allow_min_difficulty_blocks: true,
            pow_no_retargeting: true,
            pow_target_spacing: POW_TARGET_SPACING,
            pow_target_timespan: POW_TARGET_TIMESPAN,
            minimum_chain_work: Uint256::ZERO,
            default_assume_valid: Uint256::ZERO,
        },
        genesis: GenesisParams {
            time: GENESIS_TIME,
            bits: 0x200fffff,
            version: 1,
            reward: 50 * COIN,
            nonce: GenesisNonce::Known(KnownGenesis {
                nonce: REGTEST_GENESIS_NONCE,
                hash: REGTEST_GENESIS_HASH,
                merkle_root: GENESIS_MERKLE_ROOT,
            }),
        },
        base58_prefixes: test_base58_prefixes(),
        checkpoints: CheckpointData::default(),
        chain_tx_data: ChainTxData {
            time: 0,
            tx_count: 0,
            tx_rate: 0.0,
        },
    }
}

pub fn network_spec(network: Network) -> NetworkSpec {
    match network {
        Network::Main => main_spec(),
        Network::Test => test_spec(),
        Network::Regtest => regtest_spec(),
    }
}

/// Builds the parameter set for a network with the consensus work function.
pub fn create_chain_params(network: Network) -> Result<ChainParams> {
    create_chain_params_with(network, &ScryptPow::default())
}

pub fn create_chain_params_with<H: PowHasher + ?Sized>(network: Network, hasher: &H) -> Result<ChainParams> {
    ChainParams::build(network_spec(network), hasher)
}

/// Same as [`create_chain_params`], starting from the textual identifier.
pub fn create_chain_params_by_name(name: &str) -> Result<ChainParams> {
    create_chain_params(name.parse()?)
}
