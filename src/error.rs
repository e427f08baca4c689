use std::fmt;

use thiserror::Error;

use crate::primitives::uint256::Uint256;

/// Which genesis value disagreed with the parameter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenesisField {
    BlockHash,
    MerkleRoot,
    /// Proof-of-work hash above the network's difficulty ceiling. `expected`
    /// carries the ceiling.
    ProofOfWork,
}

impl fmt::Display for GenesisField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenesisField::BlockHash => write!(f, "block hash"),
            GenesisField::MerkleRoot => write!(f, "merkle root"),
            GenesisField::ProofOfWork => write!(f, "proof-of-work"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChainParamsError {
    #[error("unknown chain {0}")]
    UnknownNetwork(String),

    #[error("{network} genesis {field} mismatch: want {expected}, got {actual}")]
    GenesisMismatch {
        network: &'static str,
        field: GenesisField,
        expected: Uint256,
        actual: Uint256,
    },

    #[error("chain parameters read before a network was selected")]
    UninitializedRegistry,

    #[error("genesis nonce search cancelled after {attempts} attempts")]
    SearchCancelled { attempts: u64 },

    #[error("genesis nonce search exhausted the nonce space without meeting the ceiling")]
    NonceSpaceExhausted,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ChainParamsError {
    /// Errors after which the process must not keep running with the
    /// parameters it was building or reading.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ChainParamsError::GenesisMismatch { .. } | ChainParamsError::UninitializedRegistry
        )
    }
}

pub type Result<T> = std::result::Result<T, ChainParamsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(!ChainParamsError::UnknownNetwork("foo".into()).is_fatal());
        assert!(ChainParamsError::UninitializedRegistry.is_fatal());
        assert!(
            ChainParamsError::GenesisMismatch {
                network: "main",
                field: GenesisField::BlockHash,
                expected: Uint256::ZERO,
                actual: Uint256::ZERO,
            }
            .is_fatal()
        );
        assert!(!ChainParamsError::NonceSpaceExhausted.is_fatal());
    }

    #[test]
    fn test_messages() {
        assert_eq!(ChainParamsError::UnknownNetwork("foo".into()).to_string(), "unknown chain foo");
        let err = ChainParamsError::GenesisMismatch {
            network: "regtest",
            field: GenesisField::MerkleRoot,
            expected: Uint256::from_static_hex("0x01"),
            actual: Uint256::ZERO,
        };
        let text = err.to_string();
        assert!(text.starts_with("regtest genesis merkle root mismatch"));
        assert!(text.contains(&format!("{}", Uint256::from_static_hex("0x01"))));
    }
}
