// ============================================
// src/contract.rs
// Message dispatch

use cosmwasm_std::{to_json_binary, Binary, Response, Storage};

use crate::bank::AssetTransferService;
use crate::context::TxContext;
use crate::engine::BridgeEngine;
use crate::error::BridgeError;
use crate::genesis::{self, CONTRACT_VERSION};
use crate::msg::{
    ExecuteMsg, InstantiateMsg, MsgBridgeIn, MsgBridgeOut, QueryBridgeStatusRequest, QueryMsg,
    QueryTotalSupplyRequest,
};
use crate::params::{ParameterStore, Params};
use crate::query;

// ============ Instantiate ============

pub fn instantiate(ctx: &mut TxContext, msg: InstantiateMsg) -> Result<Response, BridgeError> {
    genesis::init_genesis(ctx.storage, ctx.api, &msg)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("version", CONTRACT_VERSION)
        .add_attribute("peg_ratio", msg.params.peg_ratio))
}

// ============ Execute ============

/// Routes one message. `authority` is the only signer accepted for
/// parameter updates.
pub fn execute<B: AssetTransferService>(
    engine: &mut BridgeEngine<B>,
    ctx: &mut TxContext,
    authority: &str,
    msg: ExecuteMsg,
) -> Result<Response, BridgeError> {
    match msg {
        ExecuteMsg::BridgeIn { sender, amount } => {
            let res = engine.bridge_in(ctx, &MsgBridgeIn { sender, amount })?;
            Ok(Response::new()
                .add_attribute("action", "bridge_in")
                .add_events(ctx.take_events())
                .set_data(to_json_binary(&res)?))
        }

        ExecuteMsg::BridgeOut { sender, amount } => {
            let res = engine.bridge_out(ctx, &MsgBridgeOut { sender, amount })?;
            Ok(Response::new()
                .add_attribute("action", "bridge_out")
                .add_events(ctx.take_events())
                .set_data(to_json_binary(&res)?))
        }

        ExecuteMsg::UpdateParams {
            authority: signer,
            params,
        } => execute_update_params(ctx, authority, signer, params),
    }
}

fn execute_update_params(
    ctx: &mut TxContext,
    authority: &str,
    signer: String,
    params: Params,
) -> Result<Response, BridgeError> {
    if signer != authority {
        return Err(BridgeError::Unauthorized {
            expected: authority.to_string(),
            actual: signer,
        });
    }

    ParameterStore::set(ctx.storage, ctx.api, &params)?;

    Ok(Response::new()
        .add_attribute("action", "update_params")
        .add_attribute("bridge_enabled", params.bridge_enabled.to_string())
        .add_attribute("peg_ratio", params.peg_ratio))
}

// ============ Query ============

pub fn query(store: &dyn Storage, msg: QueryMsg) -> Result<Binary, BridgeError> {
    let bin = match msg {
        QueryMsg::BridgeStatus {} => {
            to_json_binary(&query::bridge_status(store, Some(&QueryBridgeStatusRequest {}))?)?
        }
        QueryMsg::TotalSupply {} => {
            to_json_binary(&query::total_supply(store, Some(&QueryTotalSupplyRequest {}))?)?
        }
        QueryMsg::Params {} => to_json_binary(&query::params(store)?)?,
        QueryMsg::ContractVersion {} => to_json_binary(&cw2::get_contract_version(store)?)?,
    };
    Ok(bin)
}

// ============ Tests ============
