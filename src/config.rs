// ============================================
// src/config.rs
//! Host configuration for the bridge node

use anyhow::{Context, Result};
use cosmwasm_std::{BlockInfo, Timestamp, Uint256};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::app::BridgeApp;
use crate::audit::{AuditJournal, AuditRecorder, JsonLinesAudit};
use crate::bank::Asset;
use crate::genesis::GenesisState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Account holding locked collateral
    pub custody_address: String,

    /// Only signer allowed to update parameters
    pub authority: String,

    #[serde(default)]
    pub chain: ChainConfig,

    #[serde(default)]
    pub genesis: GenesisState,

    /// Balances credited before the first block
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,

    #[serde(default)]
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_chain_id")]
    pub chain_id: String,

    #[serde(default = "default_genesis_height")]
    pub genesis_height: u64,

    /// Unix seconds
    #[serde(default)]
    pub genesis_time: u64,

    #[serde(default = "default_block_time")]
    pub block_time_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub address: String,
    pub denom: String,
    pub amount: Uint256,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub enabled: bool,

    /// In-memory journal limit; ignored when `path` is set
    pub capacity: Option<usize>,

    /// Append entries as JSON lines to this file
    pub path: Option<PathBuf>,
}

// Default values
fn default_chain_id() -> String {
    "peg-bridge-local".to_string()
}

fn default_genesis_height() -> u64 {
    1
}

fn default_block_time() -> u64 {
    5 // seconds
}

impl Default for ChainConfig {
    fn default() -> Self {
        ChainConfig {
            chain_id: default_chain_id(),
            genesis_height: default_genesis_height(),
            genesis_time: 0,
            block_time_secs: default_block_time(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.custody_address.trim().is_empty() {
            anyhow::bail!("Custody address cannot be empty");
        }

        if self.authority.trim().is_empty() {
            anyhow::bail!("Authority cannot be empty");
        }

        if self.chain.block_time_secs == 0 {
            anyhow::bail!("Block time must be positive");
        }

        if self.chain.chain_id.is_empty() {
            anyhow::bail!("Chain id cannot be empty");
        }

        self.genesis
            .validate()
            .context("Invalid genesis parameters")?;

        for account in &self.accounts {
            if account.address.is_empty() || account.denom.is_empty() {
                anyhow::bail!("Genesis accounts need both an address and a denom");
            }
        }

        Ok(())
    }

    pub fn genesis_block(&self) -> BlockInfo {
        BlockInfo {
            height: self.chain.genesis_height,
            time: Timestamp::from_seconds(self.chain.genesis_time),
            chain_id: self.chain.chain_id.clone(),
        }
    }

    pub fn audit_recorder(&self) -> Result<Option<Box<dyn AuditRecorder>>> {
        if !self.audit.enabled {
            return Ok(None);
        }

        let recorder: Box<dyn AuditRecorder> = match (&self.audit.path, self.audit.capacity) {
            (Some(path), _) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open audit log {}", path.display()))?;
                Box::new(JsonLinesAudit::new(file))
            }
            (None, Some(capacity)) => Box::new(AuditJournal::with_capacity(capacity)),
            (None, None) => Box::new(AuditJournal::new()),
        };
        Ok(Some(recorder))
    }

    /// Builds a host at the genesis block with all configured balances credited.
    pub fn build_app(&self) -> Result<BridgeApp> {
        let mut app = BridgeApp::new(
            &self.genesis,
            &self.custody_address,
            &self.authority,
            self.genesis_block(),
            self.chain.block_time_secs,
        )
        .context("Failed to initialize genesis")?;

        if let Some(recorder) = self.audit_recorder()? {
            app = app.with_audit(recorder);
        }

        for account in &self.accounts {
            let asset = Asset::new(account.amount, account.denom.clone());
            app.fund(&account.address, &asset)
                .with_context(|| format!("Failed to fund {}", account.address))?;
            info!("Funded {} with {}", account.address, asset);
        }

        Ok(app)
    }
}
