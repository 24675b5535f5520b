// ============================================
// src/genesis.rs
// Genesis import / export

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Api, Storage, Uint256};
use tracing::info;

use crate::error::BridgeError;
use crate::ledger::Ledger;
use crate::params::{ParameterStore, Params};
use crate::statistics::{BridgeStatistics, StatisticsStore};

pub const CONTRACT_NAME: &str = "crates.io:peg-bridge";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cw_serde]
#[derive(Default)]
pub struct GenesisState {
    pub params: Params,
    /// Missing counters start at zero.
    #[serde(default)]
    pub total_bridged: Option<Uint256>,
    #[serde(default)]
    pub total_supply: Option<Uint256>,
    #[serde(default)]
    pub statistics: Option<BridgeStatistics>,
}

impl GenesisState {
    pub fn validate(&self) -> Result<(), BridgeError> {
        // Counters are unsigned, so only the params can be wrong.
        self.params.validate()
    }
}

pub fn init_genesis(
    store: &mut dyn Storage,
    api: &dyn Api,
    genesis: &GenesisState,
) -> Result<(), BridgeError> {
    genesis.validate()?;
    cw2::set_contract_version(store, CONTRACT_NAME, CONTRACT_VERSION)?;

    ParameterStore::set(store, api, &genesis.params)?;
    Ledger::set_total_bridged(store, genesis.total_bridged.unwrap_or_else(Uint256::zero))?;
    Ledger::set_total_supply(store, genesis.total_supply.unwrap_or_else(Uint256::zero))?;
    StatisticsStore::set(store, &genesis.statistics.clone().unwrap_or_default())?;

    info!(
        "Genesis initialized: enabled={}, peg_ratio={}, collateral={}, synthetic={}",
        genesis.params.bridge_enabled,
        genesis.params.peg_ratio,
        genesis.params.collateral_denom,
        genesis.params.synthetic_denom
    );
    Ok(())
}

pub fn export_genesis(store: &dyn Storage) -> Result<GenesisState, BridgeError> {
    Ok(GenesisState {
        params: ParameterStore::get(store)?,
        total_bridged: Some(Ledger::total_bridged(store)?),
        total_supply: Some(Ledger::total_supply(store)?),
        statistics: Some(StatisticsStore::get(store)?),
    })
}
