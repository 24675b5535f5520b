// ============================================
// src/query.rs
// Read-only projections

use cosmwasm_std::Storage;

use crate::error::BridgeError;
use crate::ledger::Ledger;
use crate::msg::{
    QueryBridgeStatusRequest, QueryBridgeStatusResponse, QueryParamsResponse,
    QueryTotalSupplyRequest, QueryTotalSupplyResponse,
};
use crate::params::ParameterStore;
use crate::statistics::StatisticsStore;

pub fn bridge_status(
    store: &dyn Storage,
    req: Option<&QueryBridgeStatusRequest>,
) -> Result<QueryBridgeStatusResponse, BridgeError> {
    if req.is_none() {
        return Err(BridgeError::InvalidRequest {});
    }

    let params = ParameterStore::get(store)?;
    Ok(QueryBridgeStatusResponse {
        total_bridged: Ledger::total_bridged(store)?,
        total_supply: Ledger::total_supply(store)?,
        bridge_enabled: params.bridge_enabled,
        statistics: StatisticsStore::get(store)?,
    })
}

pub fn total_supply(
    store: &dyn Storage,
    req: Option<&QueryTotalSupplyRequest>,
) -> Result<QueryTotalSupplyResponse, BridgeError> {
    if req.is_none() {
        return Err(BridgeError::InvalidRequest {});
    }

    Ok(QueryTotalSupplyResponse {
        total_supply: Ledger::total_supply(store)?,
    })
}

pub fn params(store: &dyn Storage) -> Result<QueryParamsResponse, BridgeError> {
    Ok(QueryParamsResponse {
        params: ParameterStore::get(store)?,
    })
}
