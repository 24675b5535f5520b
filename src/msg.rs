// ============================================
// src/msg.rs
// Message definitions

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint256;

use crate::bank::Asset;
use crate::params::Params;
use crate::statistics::BridgeStatistics;

pub use crate::genesis::GenesisState as InstantiateMsg;

/// Lock collateral, receive synthetic. `amount` is an integer string in
/// collateral units; zero, negative and malformed values are rejected.
#[cw_serde]
pub struct MsgBridgeIn {
    pub sender: String,
    pub amount: String,
}

#[cw_serde]
pub struct MsgBridgeInResponse {
    pub minted_amount: Asset,
}

/// Burn synthetic, receive collateral. `amount` is in synthetic units.
#[cw_serde]
pub struct MsgBridgeOut {
    pub sender: String,
    pub amount: String,
}

#[cw_serde]
pub struct MsgBridgeOutResponse {
    pub released_amount: Asset,
}

#[cw_serde]
pub enum ExecuteMsg {
    BridgeIn {
        sender: String,
        amount: String,
    },
    BridgeOut {
        sender: String,
        amount: String,
    },
    /// Governance-only.
    UpdateParams {
        authority: String,
        params: Params,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(QueryBridgeStatusResponse)]
    BridgeStatus {},

    #[returns(QueryTotalSupplyResponse)]
    TotalSupply {},

    #[returns(QueryParamsResponse)]
    Params {},

    #[returns(cw2::ContractVersion)]
    ContractVersion {},
}

#[cw_serde]
pub struct QueryBridgeStatusRequest {}

#[cw_serde]
pub struct QueryBridgeStatusResponse {
    pub total_bridged: Uint256,
    pub total_supply: Uint256,
    pub bridge_enabled: bool,
    pub statistics: BridgeStatistics,
}

#[cw_serde]
pub struct QueryTotalSupplyRequest {}

#[cw_serde]
pub struct QueryTotalSupplyResponse {
    pub total_supply: Uint256,
}

#[cw_serde]
pub struct QueryParamsResponse {
    pub params: Params,
}
