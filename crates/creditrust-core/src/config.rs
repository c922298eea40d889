//! Configuration loading and management.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CoreError;

/// Full configuration for a CrediTrust client.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CrediTrustConfig {
    /// Ledger network settings.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Deployed contract settings.
    #[serde(default)]
    pub contract: ContractConfig,

    /// Wallet integration settings.
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network name (devnet, testnet, mainnet, local).
    #[serde(default = "default_network_name")]
    pub name: String,
    /// Fullnode REST endpoint, including the `/v1` suffix.
    #[serde(default = "default_node_url")]
    pub node_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Account the learning-platform module is published under.
    #[serde(default = "default_contract_address")]
    pub address: String,
    /// Module name.
    #[serde(default = "default_module_name")]
    pub module: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Where users are sent when no wallet extension is installed.
    #[serde(default = "default_install_url")]
    pub install_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_network_name() -> String {
    "devnet".into()
}
fn default_node_url() -> String {
    "https://fullnode.devnet.aptoslabs.com/v1".into()
}
fn default_contract_address() -> String {
    "0x1".into()
}
fn default_module_name() -> String {
    "web3_learning_platform".into()
}
fn default_install_url() -> String {
    "https://petra.app/".into()
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: default_network_name(),
            node_url: default_node_url(),
        }
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: default_contract_address(),
            module: default_module_name(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            install_url: default_install_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ContractConfig {
    /// Fully qualified Move struct tag, e.g. `0x1::web3_learning_platform::UserProfile`.
    pub fn resource_type(&self, name: &str) -> String {
        format!("{}::{}::{}", self.address, self.module, name)
    }

    /// Fully qualified entry function id.
    pub fn function_id(&self, name: &str) -> String {
        format!("{}::{}::{}", self.address, self.module, name)
    }
}

impl CrediTrustConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: CrediTrustConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply `CREDITRUST_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup; empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(name) = get("CREDITRUST_NETWORK") {
            self.network.name = name;
        }
        if let Some(url) = get("CREDITRUST_NODE_URL") {
            self.network.node_url = url;
        }
        if let Some(address) = get("CREDITRUST_CONTRACT_ADDRESS") {
            self.contract.address = address;
        }
        if let Some(module) = get("CREDITRUST_MODULE_NAME") {
            self.contract.module = module;
        }
    }
}
