// ============================================
// src/params.rs
// Bridge configuration

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Api, Storage};

use crate::error::BridgeError;
use crate::peg::PegRatio;
use crate::state::{PARAMS, PARAMS_KEY};

pub const DEFAULT_PEG_RATIO: &str = "1.0";
pub const DEFAULT_COLLATERAL_DENOM: &str = "uusdc";
pub const DEFAULT_SYNTHETIC_DENOM: &str = "utestusd";

#[cw_serde]
pub struct Params {
    pub bridge_enabled: bool,
    /// Synthetic units per collateral unit, as a decimal string.
    pub peg_ratio: String,
    pub collateral_denom: String,
    pub synthetic_denom: String,
    /// Optional designated operator address; empty when unset.
    #[serde(default)]
    pub bridge_address: String,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            bridge_enabled: true,
            peg_ratio: DEFAULT_PEG_RATIO.to_string(),
            collateral_denom: DEFAULT_COLLATERAL_DENOM.to_string(),
            synthetic_denom: DEFAULT_SYNTHETIC_DENOM.to_string(),
            bridge_address: String::new(),
        }
    }
}

impl Params {
    /// Stateless validation. The operator address needs an `Api` and is
    /// checked by [`ParameterStore::set`].
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.peg_ratio.is_empty() {
            return Err(invalid("peg ratio cannot be empty"));
        }
        PegRatio::parse(&self.peg_ratio)
            .map_err(|_| invalid(format!("peg ratio `{}` is not a positive decimal", self.peg_ratio)))?;
        if self.collateral_denom.is_empty() {
            return Err(invalid("collateral denom cannot be empty"));
        }
        if self.synthetic_denom.is_empty() {
            return Err(invalid("synthetic denom cannot be empty"));
        }
        if self.collateral_denom == self.synthetic_denom {
            return Err(invalid("collateral and synthetic denoms must differ"));
        }
        Ok(())
    }

    pub fn peg(&self) -> Result<PegRatio, BridgeError> {
        PegRatio::parse(&self.peg_ratio)
    }
}

fn invalid(reason: impl Into<String>) -> BridgeError {
    BridgeError::InvalidParameter {
        reason: reason.into(),
    }
}

pub struct ParameterStore;

impl ParameterStore {
    /// Stored params, or the defaults before genesis has written any.
    pub fn get(store: &dyn Storage) -> Result<Params, BridgeError> {
        Ok(PARAMS
            .may_load(store)
            .map_err(|err| BridgeError::corrupted(PARAMS_KEY, err))?
            .unwrap_or_default())
    }

    pub fn set(store: &mut dyn Storage, api: &dyn Api, params: &Params) -> Result<(), BridgeError> {
        params.validate()?;
        if !params.bridge_address.is_empty() {
            api.addr_validate(&params.bridge_address)
                .map_err(|_| invalid(format!("bridge address `{}` is invalid", params.bridge_address)))?;
        }
        PARAMS.save(store, params)?;
        Ok(())
    }
}
