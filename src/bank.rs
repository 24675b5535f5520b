// ============================================
// src/bank.rs
// Asset movement collaborator

use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, OverflowError, StdError, Storage, Uint256};
use cw_storage_plus::Map;
use thiserror::Error;

/// A named-denomination amount. `cosmwasm_std::Coin` is capped at 128 bits,
/// bridge amounts are not.
#[cw_serde]
pub struct Asset {
    pub denom: String,
    pub amount: Uint256,
}

impl Asset {
    pub fn new(amount: impl Into<Uint256>, denom: impl Into<String>) -> Self {
        Asset {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

#[derive(Error, Debug)]
pub enum BankError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("insufficient funds: {address} has {available}{denom}, needs {needed}{denom}")]
    InsufficientFunds {
        address: String,
        denom: String,
        needed: Uint256,
        available: Uint256,
    },

    #[error("account {address} is frozen")]
    AccountFrozen { address: String },
}

/// Moves, mints and burns named-denomination balances.
///
/// Every call receives the transaction-scoped storage so that a host which
/// discards the transaction also discards the balance changes.
pub trait AssetTransferService {
    fn transfer(
        &self,
        store: &mut dyn Storage,
        from: &Addr,
        to: &Addr,
        asset: &Asset,
    ) -> Result<(), BankError>;

    fn mint(&self, store: &mut dyn Storage, to: &Addr, asset: &Asset) -> Result<(), BankError>;

    fn burn(&self, store: &mut dyn Storage, from: &Addr, asset: &Asset) -> Result<(), BankError>;

    /// Spendable balance of `owner` in `denom`.
    fn balance_of(
        &self,
        store: &dyn Storage,
        owner: &Addr,
        denom: &str,
    ) -> Result<Uint256, BankError>;
}

const BALANCES: Map<(&Addr, &str), Uint256> = Map::new("bank_balances");
const SUPPLY: Map<&str, Uint256> = Map::new("bank_supply");
const FROZEN: Map<&Addr, bool> = Map::new("bank_frozen");

/// Bank kept in the same key-value store as the bridge state.
#[derive(Debug, Default, Clone, Copy)]
pub struct StoreBank;

impl StoreBank {
    pub fn new() -> Self {
        StoreBank
    }

    /// Credits a genesis balance, increasing supply.
    pub fn fund(&self, store: &mut dyn Storage, to: &Addr, asset: &Asset) -> Result<(), BankError> {
        self.add_supply(store, &asset.denom, asset.amount)?;
        self.credit(store, to, asset)
    }

    pub fn freeze(&self, store: &mut dyn Storage, account: &Addr) -> Result<(), BankError> {
        FROZEN.save(store, account, &true)?;
        Ok(())
    }

    pub fn unfreeze(&self, store: &mut dyn Storage, account: &Addr) {
        FROZEN.remove(store, account);
    }

    pub fn supply_of(&self, store: &dyn Storage, denom: &str) -> Result<Uint256, BankError> {
        Ok(SUPPLY.may_load(store, denom)?.unwrap_or_else(Uint256::zero))
    }

    fn ensure_active(&self, store: &dyn Storage, account: &Addr) -> Result<(), BankError> {
        if FROZEN.may_load(store, account)?.unwrap_or(false) {
            return Err(BankError::AccountFrozen {
                address: account.to_string(),
            });
        }
        Ok(())
    }

    fn credit(&self, store: &mut dyn Storage, to: &Addr, asset: &Asset) -> Result<(), BankError> {
        let key = (to, asset.denom.as_str());
        let current = BALANCES.may_load(store, key)?.unwrap_or_else(Uint256::zero);
        BALANCES.save(store, key, &current.checked_add(asset.amount)?)?;
        Ok(())
    }

    fn debit(&self, store: &mut dyn Storage, from: &Addr, asset: &Asset) -> Result<(), BankError> {
        let key = (from, asset.denom.as_str());
        let current = BALANCES.may_load(store, key)?.unwrap_or_else(Uint256::zero);
        if current < asset.amount {
            return Err(BankError::InsufficientFunds {
                address: from.to_string(),
                denom: asset.denom.clone(),
                needed: asset.amount,
                available: current,
            });
        }
        let remaining = current - asset.amount;
        if remaining.is_zero() {
            BALANCES.remove(store, key);
        } else {
            BALANCES.save(store, key, &remaining)?;
        }
        Ok(())
    }

    fn add_supply(&self, store: &mut dyn Storage, denom: &str, amount: Uint256) -> Result<(), BankError> {
        let current = SUPPLY.may_load(store, denom)?.unwrap_or_else(Uint256::zero);
        SUPPLY.save(store, denom, &current.checked_add(amount)?)?;
        Ok(())
    }
}

impl AssetTransferService for StoreBank {
    fn transfer(
        &self,
        store: &mut dyn Storage,
        from: &Addr,
        to: &Addr,
        asset: &Asset,
    ) -> Result<(), BankError> {
        self.ensure_active(store, from)?;
        self.ensure_active(store, to)?;
        self.debit(store, from, asset)?;
        self.credit(store, to, asset)
    }

    fn mint(&self, store: &mut dyn Storage, to: &Addr, asset: &Asset) -> Result<(), BankError> {
        self.add_supply(store, &asset.denom, asset.amount)?;
        self.credit(store, to, asset)
    }

    fn burn(&self, store: &mut dyn Storage, from: &Addr, asset: &Asset) -> Result<(), BankError> {
        self.debit(store, from, asset)?;
        let current = SUPPLY.may_load(store, asset.denom.as_str())?.unwrap_or_else(Uint256::zero);
        SUPPLY.save(store, asset.denom.as_str(), &current.checked_sub(asset.amount)?)?;
        Ok(())
    }

    fn balance_of(
        &self,
        store: &dyn Storage,
        owner: &Addr,
        denom: &str,
    ) -> Result<Uint256, BankError> {
        if FROZEN.may_load(store, owner)?.unwrap_or(false) {
            return Ok(Uint256::zero());
        }
        Ok(BALANCES.may_load(store, (owner, denom))?.unwrap_or_else(Uint256::zero))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::MockStorage;

    fn addr(s: &str) -> Addr {
        Addr::unchecked(s)
    }

    #[test]
    fn transfer_moves_balance() {
        let mut store = MockStorage::new();
        let bank = StoreBank::new();
        bank.fund(&mut store, &addr("alice"), &Asset::new(100u128, "uusdc"))
            .unwrap();

        bank.transfer(&mut store, &addr("alice"), &addr("bob"), &Asset::new(40u128, "uusdc"))
            .unwrap();

        assert_eq!(
            bank.balance_of(&store, &addr("alice"), "uusdc").unwrap(),
            Uint256::from(60u128)
        );
        assert_eq!(
            bank.balance_of(&store, &addr("bob"), "uusdc").unwrap(),
            Uint256::from(40u128)
        );
        assert_eq!(bank.supply_of(&store, "uusdc").unwrap(), Uint256::from(100u128));
    }

    #[test]
    fn transfer_rejects_overdraft() {
        let mut store = MockStorage::new();
        let bank = StoreBank::new();
        bank.fund(&mut store, &addr("alice"), &Asset::new(10u128, "uusdc"))
            .unwrap();

        let err = bank
            .transfer(&mut store, &addr("alice"), &addr("bob"), &Asset::new(11u128, "uusdc"))
            .unwrap_err();
        assert!(matches!(err, BankError::InsufficientFunds { .. }));
        assert_eq!(
            bank.balance_of(&store, &addr("alice"), "uusdc").unwrap(),
            Uint256::from(10u128)
        );
    }

    #[test]
    fn frozen_account_cannot_send_or_receive() {
        let mut store = MockStorage::new();
        let bank = StoreBank::new();
        bank.fund(&mut store, &addr("alice"), &Asset::new(10u128, "uusdc"))
            .unwrap();
        bank.freeze(&mut store, &addr("bob")).unwrap();

        let err = bank
            .transfer(&mut store, &addr("alice"), &addr("bob"), &Asset::new(1u128, "uusdc"))
            .unwrap_err();
        assert!(matches!(err, BankError::AccountFrozen { .. }));

        bank.unfreeze(&mut store, &addr("bob"));
        bank.transfer(&mut store, &addr("alice"), &addr("bob"), &Asset::new(1u128, "uusdc"))
            .unwrap();
    }

    #[test]
    fn mint_and_burn_track_supply() {
        let mut store = MockStorage::new();
        let bank = StoreBank::new();
        let custody = addr("custody");

        bank.mint(&mut store, &custody, &Asset::new(500u128, "utestusd"))
            .unwrap();
        bank.burn(&mut store, &custody, &Asset::new(200u128, "utestusd"))
            .unwrap();

        assert_eq!(
            bank.supply_of(&store, "utestusd").unwrap(),
            Uint256::from(300u128)
        );
        assert_eq!(
            bank.balance_of(&store, &custody, "utestusd").unwrap(),
            Uint256::from(300u128)
        );
    }

    #[test]
    fn asset_display() {
        assert_eq!(Asset::new(100u128, "uusdc").to_string(), "100uusdc");
    }
}
