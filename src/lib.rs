//! Consensus parameters and genesis blocks for the main, test and regtest
//! networks.
//!
//! A network is selected once at startup through [`chainparams::Registry`]
//! (or the process-wide [`chainparams::select_params`]); the genesis block is
//! rebuilt from its parameter table and checked against the hashes recorded
//! there before anything is installed.

pub mod chainparams;
pub mod config;
pub mod consensus;
pub mod crypto;
pub mod error;
pub mod miner;
pub mod primitives;

pub use chainparams::{ChainParams, Network, Registry, params, select_params};
pub use error::{ChainParamsError, Result};
