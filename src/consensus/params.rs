// Consensus rule parameters shared by every node on a network.
use serde::Serialize;

use crate::primitives::uint256::Uint256;

/// Highest version bit a deployment may signal on. The top three bits of the
/// block version are reserved for the version-bits marker.
pub const MAX_DEPLOYMENT_BIT: u8 = 28;

pub const MAX_VERSION_BITS_DEPLOYMENTS: usize = 3;

/// Soft-fork deployments known to this chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeploymentPos {
    TestDummy,
    /// BIP68, BIP112 and BIP113
    Csv,
    /// BIP141, BIP143 and BIP147
    Segwit,
}

impl DeploymentPos {
    pub const ALL: [DeploymentPos; MAX_VERSION_BITS_DEPLOYMENTS] =
        [DeploymentPos::TestDummy, DeploymentPos::Csv, DeploymentPos::Segwit];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            DeploymentPos::TestDummy => "testdummy",
            DeploymentPos::Csv => "csv",
            DeploymentPos::Segwit => "segwit",
        }
    }
}

/// Activation-signalling window for one deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bip9Deployment {
    /// Bit position in the block version used to signal
    pub bit: u8,
    /// Median time past from which signalling counts
    pub start_time: i64,
    /// Median time past after which the deployment is considered failed
    pub timeout: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsensusParams {
    pub hash_genesis_block: Uint256,
    pub subsidy_halving_interval: u32,
    /// Block height and hash at which BIP34 becomes active
    pub bip34_height: u32,
    pub bip34_hash: Uint256,
    /// Block height at which BIP65 becomes active
    pub bip65_height: u32,
    /// Block height at which BIP66 becomes active
    pub bip66_height: u32,
    /// Minimum blocks signalling within a confirmation window to lock in a
    /// rule change. 1512 is 75% of 2016.
    pub rule_change_activation_threshold: u32,
    pub miner_confirmation_window: u32,
    pub deployments: [Bip9Deployment; MAX_VERSION_BITS_DEPLOYMENTS],
    /// Easiest allowed proof-of-work target
    pub pow_limit: Uint256,
    pub pow_allow_min_difficulty_blocks: bool,
    pub pow_no_retargeting: bool,
    pub pow_target_spacing: i64,
    pub pow_target_timespan: i64,
    /// The best chain should have at least this much work
    pub minimum_chain_work: Uint256,
    /// Signatures in ancestors of this block are assumed valid by default
    pub default_assume_valid: Uint256,
}

impl ConsensusParams {
    pub fn deployment(&self, pos: DeploymentPos) -> &Bip9Deployment {
        &self.deployments[pos.index()]
    }

    /// Blocks between difficulty adjustments
    pub fn difficulty_adjustment_interval(&self) -> i64 {
        self.pow_target_timespan / self.pow_target_spacing
    }

    /// Deployment table sanity: bits in range and distinct, and every window
    /// opens no later than it closes.
    pub fn check_deployments(&self) -> bool {
        let mut seen = 0u32;
        for d in &self.deployments {
            if d.bit > MAX_DEPLOYMENT_BIT || d.start_time > d.timeout {
                return false;
            }
            let mask = 1u32 << d.bit;
            if seen & mask != 0 {
                return false;
            }
            seen |= mask;
        }
        true
    }

    pub(crate) fn set_deployment_window(&mut self, pos: DeploymentPos, start_time: i64, timeout: i64) {
        let deployment = &mut self.deployments[pos.index()];
        deployment.start_time = start_time;
        deployment.timeout = timeout;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConsensusParams {
        ConsensusParams {
            hash_genesis_block: Uint256::ZERO,
            subsidy_halving_interval: 840_000,
            bip34_height: 0,
            bip34_hash: Uint256::ZERO,
            bip65_height: 0,
            bip66_height: 0,
            rule_change_activation_threshold: 1512,
            miner_confirmation_window: 2016,
            deployments: [
                Bip9Deployment { bit: 28, start_time: 1, timeout: 2 },
                Bip9Deployment { bit: 0, start_time: 3, timeout: 4 },
                Bip9Deployment { bit: 1, start_time: 3, timeout: 4 },
            ],
            pow_limit: Uint256::from_static_hex("0x0fff"),
            pow_allow_min_difficulty_blocks: false,
            pow_no_retargeting: false,
            pow_target_spacing: 150,
            pow_target_timespan: 302_400,
            minimum_chain_work: Uint256::ZERO,
            default_assume_valid: Uint256::ZERO,
        }
    }

    #[test]
    fn test_adjustment_interval() {
        assert_eq!(sample().difficulty_adjustment_interval(), 2016);
    }

    #[test]
    fn test_deployment_lookup_by_position() {
        let params = sample();
        assert_eq!(params.deployment(DeploymentPos::TestDummy).bit, 28);
        assert_eq!(params.deployment(DeploymentPos::Csv).bit, 0);
        assert_eq!(params.deployment(DeploymentPos::Segwit).bit, 1);
    }

    #[test]
    fn test_check_deployments() {
        let mut params = sample();
        assert!(params.check_deployments());

        params.deployments[2].bit = 0;
        assert!(!params.check_deployments(), "duplicate bit accepted");

        let mut params = sample();
        params.deployments[0].bit = 29;
        assert!(!params.check_deployments(), "reserved bit accepted");

        let mut params = sample();
        params.deployments[1].start_time = 5;
        assert!(!params.check_deployments(), "inverted window accepted");
    }

    #[test]
    fn test_set_window_touches_one_deployment() {
        let mut params = sample();
        let before = params.clone();
        params.set_deployment_window(DeploymentPos::Csv, 10, 20);

        assert_eq!(params.deployment(DeploymentPos::Csv).start_time, 10);
        assert_eq!(params.deployment(DeploymentPos::Csv).timeout, 20);
        assert_eq!(params.deployment(DeploymentPos::Csv).bit, 0);
        assert_eq!(params.deployments[0], before.deployments[0]);
        assert_eq!(params.deployments[2], before.deployments[2]);
    }

    #[test]
    fn test_deployment_names() {
        let names: Vec<_> = DeploymentPos::ALL.iter().map(|d| d.name()).collect();
        assert_eq!(names, ["testdummy", "csv", "segwit"]);
    }
}
