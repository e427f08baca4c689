// Active chain parameters.
//
// Selection happens once at startup; afterwards readers take a cheap `Arc`
// clone and read without holding the lock. A deployment-window override
// replaces the installed `Arc`, so readers that already hold one keep a
// consistent snapshot.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use super::network::Network;
use super::networks::create_chain_params;
use super::params::ChainParams;
use crate::consensus::params::DeploymentPos;
use crate::error::{ChainParamsError, Result};

pub struct Registry {
    active: RwLock<Option<Arc<ChainParams>>>,
}

impl Registry {
    pub const fn new() -> Self {
        Registry {
            active: RwLock::new(None),
        }
    }

    /// Builds and installs the named network, replacing any earlier
    /// selection. On error the earlier selection stays in place.
    pub fn select(&self, network: &str) -> Result<Arc<ChainParams>> {
        self.select_network(network.parse()?)
    }

    pub fn select_network(&self, network: Network) -> Result<Arc<ChainParams>> {
        let params = create_chain_params(network)?;
        Ok(self.install(params))
    }

    /// Installs an already built parameter set.
    pub fn install(&self, params: ChainParams) -> Arc<ChainParams> {
        let params = Arc::new(params);
        info!(
            network = params.network_id(),
            genesis = %params.genesis_hash(),
            "chain parameters selected"
        );
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&params));
        params
    }

    pub fn try_current(&self) -> Result<Arc<ChainParams>> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(ChainParamsError::UninitializedRegistry)
    }

    /// Active parameters.
    ///
    /// # Panics
    ///
    /// Panics if no network has been selected; reading consensus rules before
    /// selection is a programming error.
    pub fn current(&self) -> Arc<ChainParams> {
        match self.try_current() {
            Ok(params) => params,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn is_selected(&self) -> bool {
        self.active.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Overrides one deployment's activation window in the active set.
    /// Intended for test setup and operator overrides; nothing else in the
    /// installed parameters can change.
    pub fn update_deployment_window(&self, pos: DeploymentPos, start_time: i64, timeout: i64) -> Result<()> {
        let mut guard = self.active.write().unwrap_or_else(PoisonError::into_inner);
        let active = guard.as_mut().ok_or(ChainParamsError::UninitializedRegistry)?;

        warn!(
            network = active.network_id(),
            deployment = pos.name(),
            start_time,
            timeout,
            "overriding deployment window"
        );
        Arc::make_mut(active).update_deployment_window(pos, start_time, timeout);
        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: Registry = Registry::new();

/// Process-wide registry.
pub fn global() -> &'static Registry {
    &GLOBAL
}

pub fn select_params(network: &str) -> Result<Arc<ChainParams>> {
    GLOBAL.select(network)
}

/// Active process-wide parameters. Panics before [`select_params`].
pub fn params() -> Arc<ChainParams> {
    GLOBAL.current()
}

pub fn try_params() -> Result<Arc<ChainParams>> {
    GLOBAL.try_current()
}

pub fn update_version_bits_parameters(pos: DeploymentPos, start_time: i64, timeout: i64) -> Result<()> {
    GLOBAL.update_deployment_window(pos, start_time, timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_is_reported() {
        let registry = Registry::new();
        assert!(!registry.is_selected());
        assert!(matches!(registry.try_current(), Err(ChainParamsError::UninitializedRegistry)));
        assert!(matches!(
            registry.update_deployment_window(DeploymentPos::Csv, 0, 1),
            Err(ChainParamsError::UninitializedRegistry)
        ));
    }

    #[test]
    #[should_panic(expected = "read before a network was selected")]
    fn test_current_panics_before_select() {
        Registry::new().current();
    }

    #[test]
    fn test_select_and_replace() {
        let registry = Registry::new();
        let regtest = registry.select("regtest").unwrap();
        assert_eq!(registry.current().network(), Network::Regtest);
        assert!(Arc::ptr_eq(&regtest, &registry.current()));

        let main = registry.select_network(Network::Main).unwrap();
        assert_eq!(main.network(), Network::Main);
        assert_eq!(registry.current().network(), Network::Main);
    }

    #[test]
    fn test_failed_select_keeps_previous() {
        let registry = Registry::new();
        registry.select("regtest").unwrap();
        let err = registry.select("nonet").unwrap_err();
        assert!(matches!(err, ChainParamsError::UnknownNetwork(_)));
        assert_eq!(registry.current().network(), Network::Regtest);
    }

    #[test]
    fn test_update_leaves_held_snapshot_alone() {
        let registry = Registry::new();
        let before = registry.select("regtest").unwrap();

        registry.update_deployment_window(DeploymentPos::Segwit, 100, 200).unwrap();
        let after = registry.current();

        assert_eq!(before.consensus().deployment(DeploymentPos::Segwit).start_time, 0);
        assert_eq!(after.consensus().deployment(DeploymentPos::Segwit).start_time, 100);
        assert_eq!(after.consensus().deployment(DeploymentPos::Segwit).timeout, 200);
        assert!(!Arc::ptr_eq(&before, &after));
    }
}
