// ============================================
// src/statistics.rs
// Operational counters

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Storage, Timestamp};

use crate::error::BridgeError;
use crate::state::{BRIDGE_STATISTICS, BRIDGE_STATISTICS_KEY};

/// Observational only; no business rule reads these.
#[cw_serde]
#[derive(Default)]
pub struct BridgeStatistics {
    pub total_bridge_in_count: u64,
    pub total_bridge_out_count: u64,
    /// Unix seconds of the last successful BridgeIn, 0 if none.
    pub last_bridge_in_timestamp: u64,
    pub last_bridge_out_timestamp: u64,
}

pub struct StatisticsStore;

impl StatisticsStore {
    pub fn get(store: &dyn Storage) -> Result<BridgeStatistics, BridgeError> {
        Ok(BRIDGE_STATISTICS
            .may_load(store)
            .map_err(|err| BridgeError::corrupted(BRIDGE_STATISTICS_KEY, err))?
            .unwrap_or_default())
    }

    pub fn set(store: &mut dyn Storage, stats: &BridgeStatistics) -> Result<(), BridgeError> {
        BRIDGE_STATISTICS.save(store, stats)?;
        Ok(())
    }

    pub fn record_bridge_in(store: &mut dyn Storage, at: Timestamp) -> Result<(), BridgeError> {
        let mut stats = Self::get(store)?;
        stats.total_bridge_in_count += 1;
        stats.last_bridge_in_timestamp = at.seconds();
        Self::set(store, &stats)
    }

    pub fn record_bridge_out(store: &mut dyn Storage, at: Timestamp) -> Result<(), BridgeError> {
        let mut stats = Self::get(store)?;
        stats.total_bridge_out_count += 1;
        stats.last_bridge_out_timestamp = at.seconds();
        Self::set(store, &stats)
    }
}
