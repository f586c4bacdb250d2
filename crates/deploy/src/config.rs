//! Task configuration, persisted as TOML.

use std::path::{Path, PathBuf};

use alloy_core::primitives::{Address, address};
use alloy_signer_local::{MnemonicBuilder, coins_bip39::English};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The default name for the task configuration file.
pub const CONFIG_FILENAME: &str = "Prelbp.toml";

/// Bytecode size ceiling handed to the external deployer.
pub const DEFAULT_BYTECODE_SIZE_LIMIT: usize = 60_000;

/// The canonical 0x Exchange Proxy, identical on every supported chain.
pub const ZERO_X_EXCHANGE_PROXY: Address = address!("Def1C0ded9bec7F1a1670819833240f027b25EfF");

/// Well-known development mnemonic (Anvil/Hardhat account set).
pub const DEV_MNEMONIC: &str = "test test test test test test test test test test test junk";

/// Configuration of the pre-LBP stack task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Bytecode size ceiling attached to every descriptor. 0 disables the ceiling.
    pub bytecode_size_limit: usize,
    /// EIP-712 domain name passed to Pearlmit.
    pub pearlmit_name: String,
    /// EIP-712 domain version passed to Pearlmit.
    pub pearlmit_version: String,
    /// Exchange proxy used by the production swapper.
    pub zero_x_proxy: Address,
    /// Settings of the in-process simulated deployer.
    pub simulation: SimulationConfig,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            bytecode_size_limit: DEFAULT_BYTECODE_SIZE_LIMIT,
            pearlmit_name: "Pearlmit".to_string(),
            pearlmit_version: "1".to_string(),
            zero_x_proxy: ZERO_X_EXCHANGE_PROXY,
            simulation: SimulationConfig::default(),
        }
    }
}

/// Settings of the simulated deployer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Explicit deployer address. Takes precedence over the mnemonic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployer: Option<Address>,
    /// Mnemonic the deployer account is derived from.
    pub mnemonic: String,
    /// Derivation index of the deployer account.
    pub account_index: u32,
    /// Nonce of the first deployment.
    pub start_nonce: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            deployer: None,
            mnemonic: DEV_MNEMONIC.to_string(),
            account_index: 0,
            start_nonce: 0,
        }
    }
}

impl SimulationConfig {
    /// The address deployments are simulated from.
    pub fn deployer_address(&self) -> Result<Address> {
        if let Some(deployer) = self.deployer {
            return Ok(deployer);
        }

        let signer = MnemonicBuilder::<English>::default()
            .phrase(self.mnemonic.as_str())
            .index(self.account_index)
            .context("Invalid deployer derivation index")?
            .build()
            .context("Failed to derive deployer account from mnemonic")?;

        Ok(Address::from_slice(signer.address().as_slice()))
    }
}

impl TaskConfig {
    /// The ceiling handed to builders, `None` when disabled.
    pub fn size_limit(&self) -> Option<usize> {
        (self.bytecode_size_limit > 0).then_some(self.bytecode_size_limit)
    }

    /// Save the configuration to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize task config to TOML")?;
        std::fs::write(path, content)
            .context(format!("Failed to write config to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Load the configuration from a TOML file, or from `Prelbp.toml` inside a directory.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "Configuration file or directory not found: {}",
                path.display()
            ));
        }

        let config_path = Self::resolve_path(path);

        let content = std::fs::read_to_string(&config_path)
            .context(format!("Failed to read config from {}", config_path.display()))?;
        let config: Self =
            toml::from_str(&content).context("Failed to parse config file as TOML")?;
        tracing::info!(path = %config_path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Map a directory to the config file inside it.
    pub fn resolve_path(path: &Path) -> PathBuf {
        if path.is_dir() {
            path.join(CONFIG_FILENAME)
        } else {
            path.to_path_buf()
        }
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = TaskConfig::default();
        assert_eq!(config.bytecode_size_limit, 60_000);
        assert_eq!(config.size_limit(), Some(60_000));
        assert_eq!(config.pearlmit_name, "Pearlmit");
        assert_eq!(config.pearlmit_version, "1");
        assert_eq!(config.zero_x_proxy, ZERO_X_EXCHANGE_PROXY);
        assert_eq!(config.simulation.start_nonce, 0);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new("prelbp-test").expect("Failed to create temp dir");
        let path = temp_dir.path().join(CONFIG_FILENAME);

        let config = TaskConfig {
            bytecode_size_limit: 24_576,
            pearlmit_version: "2".to_string(),
            simulation: SimulationConfig {
                start_nonce: 7,
                ..Default::default()
            },
            ..Default::default()
        };

        config.save_to_file(&path).expect("Failed to save config");

        let loaded = TaskConfig::load_from_file(temp_dir.path()).expect("Failed to load config");
        assert_eq!(config, loaded, "Loaded config should match original");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new("prelbp-test").expect("Failed to create temp dir");
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "pearlmit_version = \"3\"\n").unwrap();

        let loaded = TaskConfig::load_from_file(&path).expect("Failed to load config");
        assert_eq!(loaded.pearlmit_version, "3");
        assert_eq!(loaded.pearlmit_name, "Pearlmit");
        assert_eq!(loaded.bytecode_size_limit, DEFAULT_BYTECODE_SIZE_LIMIT);
    }

    #[test]
    fn test_disabled_size_limit_survives_reload() {
        let temp_dir = TempDir::new("prelbp-test").expect("Failed to create temp dir");
        let path = temp_dir.path().join(CONFIG_FILENAME);

        let config = TaskConfig {
            bytecode_size_limit: 0,
            ..Default::default()
        };
        assert_eq!(config.size_limit(), None);

        config.save_to_file(&path).expect("Failed to save config");
        let loaded = TaskConfig::load_from_file(&path).expect("Failed to load config");
        assert_eq!(loaded.bytecode_size_limit, 0);
        assert_eq!(loaded.size_limit(), None, "Disabled ceiling should stay disabled");
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new("prelbp-test").expect("Failed to create temp dir");
        let result = TaskConfig::load_from_file(&temp_dir.path().join("missing.toml"));
        assert!(result.is_err(), "Loading missing file should return error");
    }

    #[test]
    fn test_deployer_from_dev_mnemonic() {
        let deployer = SimulationConfig::default()
            .deployer_address()
            .expect("Dev mnemonic is valid");
        assert_eq!(deployer, address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
    }

    #[test]
    fn test_explicit_deployer_wins() {
        let explicit = address!("3000000000000000000000000000000000000003");
        let config = SimulationConfig {
            deployer: Some(explicit),
            mnemonic: "not a mnemonic".to_string(),
            ..Default::default()
        };
        assert_eq!(config.deployer_address().unwrap(), explicit);
    }
}
