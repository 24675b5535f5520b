// ============================================
// src/state.rs
// State definitions

use cosmwasm_std::Uint256;
use cw_storage_plus::Item;

use crate::params::Params;
use crate::statistics::BridgeStatistics;

pub const PARAMS_KEY: &str = "params";
pub const TOTAL_BRIDGED_KEY: &str = "total_bridged";
pub const TOTAL_SUPPLY_KEY: &str = "total_supply";
pub const BRIDGE_STATISTICS_KEY: &str = "bridge_statistics";

// Storage
pub const PARAMS: Item<Params> = Item::new(PARAMS_KEY);
pub const TOTAL_BRIDGED: Item<Uint256> = Item::new(TOTAL_BRIDGED_KEY);
pub const TOTAL_SUPPLY: Item<Uint256> = Item::new(TOTAL_SUPPLY_KEY);
pub const BRIDGE_STATISTICS: Item<BridgeStatistics> = Item::new(BRIDGE_STATISTICS_KEY);
