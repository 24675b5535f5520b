// ============================================
// src/ledger.rs
// Collateral / synthetic counters

use cosmwasm_std::{Storage, Uint256};
use cw_storage_plus::Item;

use crate::error::BridgeError;
use crate::state::{TOTAL_BRIDGED, TOTAL_BRIDGED_KEY, TOTAL_SUPPLY, TOTAL_SUPPLY_KEY};

/// Net collateral held by the bridge and net synthetic outstanding.
///
/// An absent key reads as zero. A present key that fails to decode is
/// reported as [`BridgeError::Corrupted`]; the ledger never guesses a balance.
pub struct Ledger;

impl Ledger {
    pub fn total_bridged(store: &dyn Storage) -> Result<Uint256, BridgeError> {
        load(store, TOTAL_BRIDGED, TOTAL_BRIDGED_KEY)
    }

    pub fn set_total_bridged(store: &mut dyn Storage, amount: Uint256) -> Result<(), BridgeError> {
        TOTAL_BRIDGED.save(store, &amount)?;
        Ok(())
    }

    pub fn total_supply(store: &dyn Storage) -> Result<Uint256, BridgeError> {
        load(store, TOTAL_SUPPLY, TOTAL_SUPPLY_KEY)
    }

    pub fn set_total_supply(store: &mut dyn Storage, amount: Uint256) -> Result<(), BridgeError> {
        TOTAL_SUPPLY.save(store, &amount)?;
        Ok(())
    }

    /// Applies a BridgeIn: both counters grow.
    pub fn credit(
        store: &mut dyn Storage,
        collateral: Uint256,
        synthetic: Uint256,
    ) -> Result<(), BridgeError> {
        let bridged = Self::total_bridged(store)?.checked_add(collateral)?;
        let supply = Self::total_supply(store)?.checked_add(synthetic)?;
        Self::set_total_bridged(store, bridged)?;
        Self::set_total_supply(store, supply)
    }

    /// Applies a BridgeOut: both counters shrink. Going below zero means the
    /// accounting is already broken, so it is reported as fatal.
    pub fn debit(
        store: &mut dyn Storage,
        collateral: Uint256,
        synthetic: Uint256,
    ) -> Result<(), BridgeError> {
        let bridged = Self::total_bridged(store)?
            .checked_sub(collateral)
            .map_err(|_| BridgeError::LedgerUnderflow {
                counter: TOTAL_BRIDGED_KEY,
            })?;
        let supply = Self::total_supply(store)?
            .checked_sub(synthetic)
            .map_err(|_| BridgeError::LedgerUnderflow {
                counter: TOTAL_SUPPLY_KEY,
            })?;
        Self::set_total_bridged(store, bridged)?;
        Self::set_total_supply(store, supply)
    }
}

fn load(
    store: &dyn Storage,
    item: Item<Uint256>,
    key: &'static str,
) -> Result<Uint256, BridgeError> {
    Ok(item
        .may_load(store)
        .map_err(|err| BridgeError::corrupted(key, err))?
        .unwrap_or_else(Uint256::zero))
}
