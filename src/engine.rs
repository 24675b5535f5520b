// ============================================
// src/engine.rs
// BridgeIn / BridgeOut state machine

use std::str::FromStr;

use cosmwasm_std::{Addr, Event, Uint256};
use serde_json::json;
use tracing::{debug, error, info};

use crate::audit::{AuditEntry, AuditRecorder, EXTERNAL_BRIDGE};
use crate::bank::{Asset, AssetTransferService};
use crate::context::TxContext;
use crate::error::BridgeError;
use crate::ledger::Ledger;
use crate::msg::{MsgBridgeIn, MsgBridgeInResponse, MsgBridgeOut, MsgBridgeOutResponse};
use crate::params::{ParameterStore, Params};
use crate::statistics::StatisticsStore;

pub const EVENT_BRIDGE_IN: &str = "bridge_in";
pub const EVENT_BRIDGE_OUT: &str = "bridge_out";

pub const ATTRIBUTE_SENDER: &str = "sender";
pub const ATTRIBUTE_AMOUNT: &str = "amount";
pub const ATTRIBUTE_MINTED_AMOUNT: &str = "minted_amount";
pub const ATTRIBUTE_RELEASED_AMOUNT: &str = "released_amount";

/// Locks collateral against minted synthetic and reverses it on demand.
///
/// The engine raises errors; discarding the writes of a failed call is the
/// host's job (see [`crate::cache::CacheStorage`]). The one side effect that
/// is allowed to fail on its own is the audit record.
pub struct BridgeEngine<B: AssetTransferService> {
    bank: B,
    custody: Addr,
    audit: Option<Box<dyn AuditRecorder>>,
}

impl<B: AssetTransferService> BridgeEngine<B> {
    pub fn new(bank: B, custody: Addr) -> Self {
        BridgeEngine {
            bank,
            custody,
            audit: None,
        }
    }

    pub fn with_audit(mut self, recorder: Box<dyn AuditRecorder>) -> Self {
        self.audit = Some(recorder);
        self
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    /// Address holding locked collateral.
    pub fn custody(&self) -> &Addr {
        &self.custody
    }

    pub fn bridge_in(
        &mut self,
        ctx: &mut TxContext,
        msg: &MsgBridgeIn,
    ) -> Result<MsgBridgeInResponse, BridgeError> {
        let span = ctx.span.clone();
        let _enter = span.enter();

        let params = ParameterStore::get(ctx.storage)?;
        if !params.bridge_enabled {
            return Err(BridgeError::BridgeDisabled {});
        }
        let amount = parse_amount(&msg.amount)?;
        let sender = self.validate_sender(ctx, &msg.sender)?;

        let collateral = Asset::new(amount, params.collateral_denom.clone());
        self.bank
            .transfer(ctx.storage, &sender, &self.custody, &collateral)
            .map_err(|source| BridgeError::TransferFailed {
                stage: "lock collateral",
                source,
            })?;
        debug!("Locked {} from {} in custody", collateral, sender);

        let peg = params.peg()?;
        let minted = Asset::new(peg.mint_amount(amount)?, params.synthetic_denom.clone());

        self.bank
            .mint(ctx.storage, &self.custody, &minted)
            .map_err(|source| BridgeError::TransferFailed {
                stage: "mint synthetic",
                source,
            })?;
        self.bank
            .transfer(ctx.storage, &self.custody, &sender, &minted)
            .map_err(|source| BridgeError::TransferFailed {
                stage: "deliver synthetic",
                source,
            })?;

        Ledger::credit(ctx.storage, amount, minted.amount)?;
        StatisticsStore::record_bridge_in(ctx.storage, ctx.block.time)?;

        self.record_audit(ctx, &sender, &collateral, &minted, &params);

        ctx.emit(
            Event::new(EVENT_BRIDGE_IN)
                .add_attribute(ATTRIBUTE_SENDER, sender.as_str())
                .add_attribute(ATTRIBUTE_AMOUNT, amount.to_string())
                .add_attribute(ATTRIBUTE_MINTED_AMOUNT, minted.to_string()),
        );

        info!(
            sender = %sender,
            collateral_amount = %collateral,
            synthetic_amount = %minted,
            "Bridge in successful"
        );

        Ok(MsgBridgeInResponse {
            minted_amount: minted,
        })
    }

    /// The custody reserve is checked before any synthetic is collected or
    /// burned.
    pub fn bridge_out(
        &mut self,
        ctx: &mut TxContext,
        msg: &MsgBridgeOut,
    ) -> Result<MsgBridgeOutResponse, BridgeError> {
        let span = ctx.span.clone();
        let _enter = span.enter();

        let params = ParameterStore::get(ctx.storage)?;
        if !params.bridge_enabled {
            return Err(BridgeError::BridgeDisabled {});
        }
        let amount = parse_amount(&msg.amount)?;
        let sender = self.validate_sender(ctx, &msg.sender)?;

        let balance = self
            .bank
            .balance_of(ctx.storage, &sender, &params.synthetic_denom)
            .map_err(|source| BridgeError::TransferFailed {
                stage: "query sender balance",
                source,
            })?;
        if balance < amount {
            return Err(BridgeError::InsufficientBalance {
                denom: params.synthetic_denom.clone(),
                needed: amount.to_string(),
                available: balance.to_string(),
            });
        }

        let peg = params.peg()?;
        let released = Asset::new(peg.release_amount(amount)?, params.collateral_denom.clone());

        let reserve = self
            .bank
            .balance_of(ctx.storage, &self.custody, &params.collateral_denom)
            .map_err(|source| BridgeError::TransferFailed {
                stage: "query bridge reserve",
                source,
            })?;
        if reserve < released.amount {
            return Err(BridgeError::InsufficientBridgeReserve {
                denom: params.collateral_denom.clone(),
                needed: released.amount.to_string(),
                available: reserve.to_string(),
            });
        }

        let burned = Asset::new(amount, params.synthetic_denom.clone());
        self.bank
            .transfer(ctx.storage, &sender, &self.custody, &burned)
            .map_err(|source| BridgeError::TransferFailed {
                stage: "collect synthetic",
                source,
            })?;
        self.bank
            .burn(ctx.storage, &self.custody, &burned)
            .map_err(|source| BridgeError::TransferFailed {
                stage: "burn synthetic",
                source,
            })?;
        debug!("Burned {} collected from {}", burned, sender);

        self.bank
            .transfer(ctx.storage, &self.custody, &sender, &released)
            .map_err(|source| BridgeError::TransferFailed {
                stage: "release collateral",
                source,
            })?;

        Ledger::debit(ctx.storage, released.amount, amount)?;
        StatisticsStore::record_bridge_out(ctx.storage, ctx.block.time)?;

        ctx.emit(
            Event::new(EVENT_BRIDGE_OUT)
                .add_attribute(ATTRIBUTE_SENDER, sender.as_str())
                .add_attribute(ATTRIBUTE_AMOUNT, amount.to_string())
                .add_attribute(ATTRIBUTE_RELEASED_AMOUNT, released.to_string()),
        );

        info!(
            sender = %sender,
            synthetic_burned = %burned,
            collateral_released = %released,
            "Bridge out successful"
        );

        Ok(MsgBridgeOutResponse {
            released_amount: released,
        })
    }

    /// Rejects malformed addresses and the custody account itself.
    fn validate_sender(&self, ctx: &TxContext, raw: &str) -> Result<Addr, BridgeError> {
        let invalid = || BridgeError::InvalidAddress {
            address: raw.to_string(),
        };
        let sender = ctx.api.addr_validate(raw).map_err(|_| invalid())?;
        if sender == self.custody {
            return Err(invalid());
        }
        Ok(sender)
    }

    fn record_audit(
        &mut self,
        ctx: &TxContext,
        sender: &Addr,
        collateral: &Asset,
        minted: &Asset,
        params: &Params,
    ) {
        let Some(recorder) = self.audit.as_mut() else {
            return;
        };

        let metadata = json!({
            "collateral_amount": collateral.to_string(),
            "synthetic_amount": minted.to_string(),
            "peg_ratio": params.peg_ratio,
        })
        .to_string();
        let entry = AuditEntry::new(
            sender.as_str(),
            EVENT_BRIDGE_IN,
            format!("Bridged in {collateral}, received {minted}"),
            minted.clone(),
            EXTERNAL_BRIDGE,
            sender.as_str(),
            metadata,
            ctx.block.height,
            ctx.block.time.seconds(),
        );

        if let Err(err) = recorder.record(entry) {
            error!(error = %err, sender = %sender, "failed to record transaction");
        }
    }
}

/// Parses a caller-supplied integer amount; anything that is not a strictly
/// positive run of ASCII digits, whitespace included, is `InvalidAmount`.
pub fn parse_amount(raw: &str) -> Result<Uint256, BridgeError> {
    let invalid = || BridgeError::InvalidAmount {
        amount: raw.to_string(),
    };
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let amount = Uint256::from_str(raw).map_err(|_| invalid())?;
    if amount.is_zero() {
        return Err(invalid());
    }
    Ok(amount)
}
