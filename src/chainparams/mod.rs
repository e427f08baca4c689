// Chain parameter modules
pub mod network;   // Network identifiers
pub mod networks;  // main / test / regtest tables
pub mod params;    // ChainParams and its parts
pub mod registry;  // Active parameters

pub use network::Network;
pub use networks::{create_chain_params, create_chain_params_by_name, create_chain_params_with, network_spec};
pub use params::{Base58Type, ChainParams, NetworkIdentity, NetworkSpec};
pub use registry::{Registry, params, select_params, try_params, update_version_bits_parameters};
