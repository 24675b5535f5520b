// ============================================
// src/app.rs
// In-process host: block clock, atomic commit/abort

use cosmwasm_std::testing::MockApi;
use cosmwasm_std::{
    from_json, Addr, Api, Binary, BlockInfo, MemoryStorage, Response, Storage, Timestamp, Uint256,
};
use tracing::{debug, error, warn};

use crate::audit::AuditRecorder;
use crate::bank::{Asset, AssetTransferService, BankError, StoreBank};
use crate::cache::CacheStorage;
use crate::context::TxContext;
use crate::contract;
use crate::engine::BridgeEngine;
use crate::error::BridgeError;
use crate::genesis::{self, GenesisState};
use crate::msg::{ExecuteMsg, QueryBridgeStatusResponse, QueryMsg};

/// Runs bridge messages one at a time, each in its own storage overlay.
/// A message that fails leaves no trace in storage.
pub struct BridgeApp {
    storage: MemoryStorage,
    api: MockApi,
    block: BlockInfo,
    block_time_secs: u64,
    authority: String,
    engine: BridgeEngine<StoreBank>,
}

impl BridgeApp {
    pub fn new(
        genesis: &GenesisState,
        custody: &str,
        authority: &str,
        block: BlockInfo,
        block_time_secs: u64,
    ) -> Result<Self, BridgeError> {
        let api = MockApi::default();
        let custody = api
            .addr_validate(custody)
            .map_err(|_| BridgeError::InvalidAddress {
                address: custody.to_string(),
            })?;

        let mut app = BridgeApp {
            storage: MemoryStorage::new(),
            api,
            block,
            block_time_secs,
            authority: authority.to_string(),
            engine: BridgeEngine::new(StoreBank::new(), custody),
        };

        let mut cache = CacheStorage::new(&mut app.storage);
        {
            let mut ctx = TxContext::new(&mut cache, &app.api, app.block.clone());
            contract::instantiate(&mut ctx, genesis.clone())?;
        }
        cache.commit();

        Ok(app)
    }

    pub fn with_audit(mut self, recorder: Box<dyn AuditRecorder>) -> Self {
        self.engine = self.engine.with_audit(recorder);
        self
    }

    pub fn block(&self) -> &BlockInfo {
        &self.block
    }

    pub fn custody(&self) -> &Addr {
        self.engine.custody()
    }

    pub fn storage(&self) -> &dyn Storage {
        &self.storage
    }

    pub fn next_block(&mut self) {
        self.block.height += 1;
        self.block.time = self.block.time.plus_seconds(self.block_time_secs);
    }

    pub fn set_time(&mut self, time: Timestamp) {
        self.block.time = time;
    }

    /// Executes `msg` atomically: on error every write it made is discarded.
    pub fn execute(&mut self, msg: ExecuteMsg) -> Result<Response, BridgeError> {
        let mut cache = CacheStorage::new(&mut self.storage);
        let result = {
            let mut ctx = TxContext::new(&mut cache, &self.api, self.block.clone());
            contract::execute(&mut self.engine, &mut ctx, &self.authority, msg)
        };

        match result {
            Ok(res) => {
                debug!("Committing {} writes at height {}", cache.pending_writes(), self.block.height);
                cache.commit();
                Ok(res)
            }
            Err(err) => {
                if err.is_fatal() {
                    error!(code = err.code(), "fatal bridge error, state left untouched: {}", err);
                } else {
                    warn!(code = err.code(), "bridge message rejected: {}", err);
                }
                Err(err)
            }
        }
    }

    pub fn query(&self, msg: QueryMsg) -> Result<Binary, BridgeError> {
        contract::query(&self.storage, msg)
    }

    pub fn bridge_status(&self) -> Result<QueryBridgeStatusResponse, BridgeError> {
        Ok(from_json(self.query(QueryMsg::BridgeStatus {})?)?)
    }

    pub fn export_genesis(&self) -> Result<GenesisState, BridgeError> {
        genesis::export_genesis(&self.storage)
    }

    /// Credits an account outside the bridge, e.g. genesis balances.
    pub fn fund(&mut self, address: &str, asset: &Asset) -> Result<(), BankError> {
        self.engine
            .bank()
            .fund(&mut self.storage, &Addr::unchecked(address), asset)
    }

    pub fn freeze(&mut self, address: &str) -> Result<(), BankError> {
        self.engine
            .bank()
            .freeze(&mut self.storage, &Addr::unchecked(address))
    }

    pub fn balance(&self, address: &str, denom: &str) -> Result<Uint256, BankError> {
        self.engine
            .bank()
            .balance_of(&self.storage, &Addr::unchecked(address), denom)
    }

    pub fn supply(&self, denom: &str) -> Result<Uint256, BankError> {
        self.engine.bank().supply_of(&self.storage, denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::mock_env;

    use crate::audit::AuditJournal;
    use crate::params::Params;
    use crate::state::{PARAMS, TOTAL_BRIDGED_KEY};

    const SENDER: &str = "sender";
    const CUSTODY: &str = "bridge_custody";
    const GOV: &str = "gov_authority";

    fn app_with_ratio(peg_ratio: &str) -> BridgeApp {
        let genesis = GenesisState {
            params: Params {
                peg_ratio: peg_ratio.to_string(),
                ..Params::default()
            },
            ..GenesisState::default()
        };
        BridgeApp::new(&genesis, CUSTODY, GOV, mock_env().block, 5).unwrap()
    }

    fn bridge_in(amount: &str) -> ExecuteMsg {
        ExecuteMsg::BridgeIn {
            sender: SENDER.to_string(),
            amount: amount.to_string(),
        }
    }

    fn bridge_out(amount: &str) -> ExecuteMsg {
        ExecuteMsg::BridgeOut {
            sender: SENDER.to_string(),
            amount: amount.to_string(),
        }
    }

    fn u(n: u128) -> Uint256 {
        Uint256::from(n)
    }

    #[test]
    fn par_scenario() {
        let mut app = app_with_ratio("1.0");
        app.fund(SENDER, &Asset::new(100u128, "uusdc")).unwrap();

        app.execute(bridge_in("100")).unwrap();

        let status = app.bridge_status().unwrap();
        assert_eq!(status.total_bridged, u(100));
        assert_eq!(status.total_supply, u(100));
        assert_eq!(status.statistics.total_bridge_in_count, 1);
        assert!(status.bridge_enabled);
    }

    #[test]
    fn double_peg_scenario_across_blocks() {
        let mut app = app_with_ratio("2.0");
        app.fund(SENDER, &Asset::new(50u128, "uusdc")).unwrap();

        app.execute(bridge_in("50")).unwrap();
        let in_time = app.block().time.seconds();
        app.next_block();
        app.execute(bridge_out("100")).unwrap();

        let status = app.bridge_status().unwrap();
        assert_eq!(status.total_bridged, Uint256::zero());
        assert_eq!(status.total_supply, Uint256::zero());
        assert_eq!(status.statistics.last_bridge_in_timestamp, in_time);
        assert_eq!(status.statistics.last_bridge_out_timestamp, in_time + 5);
        assert_eq!(app.balance(SENDER, "uusdc").unwrap(), u(50));
        assert_eq!(app.supply("utestusd").unwrap(), Uint256::zero());
    }

    #[test]
    fn failed_bridge_in_rolls_back_collateral_lock() {
        let mut app = app_with_ratio("1.0");
        app.fund(SENDER, &Asset::new(100u128, "uusdc")).unwrap();

        let mut params = crate::params::ParameterStore::get(app.storage()).unwrap();
        params.peg_ratio = "broken".to_string();
        PARAMS.save(&mut app.storage, &params).unwrap();

        let err = app.execute(bridge_in("40")).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidPegRatio { .. }));
        // The collateral transfer ran before the ratio parse and was discarded.
        assert_eq!(app.balance(SENDER, "uusdc").unwrap(), u(100));
        assert_eq!(app.balance(CUSTODY, "uusdc").unwrap(), Uint256::zero());
    }

    #[test]
    fn ledger_underflow_discards_burn_and_release() {
        let mut app = app_with_ratio("1.0");
        // Collateral and synthetic that never went through the bridge.
        app.fund(CUSTODY, &Asset::new(100u128, "uusdc")).unwrap();
        app.fund(SENDER, &Asset::new(50u128, "utestusd")).unwrap();

        let err = app.execute(bridge_out("50")).unwrap_err();
        assert!(matches!(err, BridgeError::LedgerUnderflow { .. }));
        assert!(err.is_fatal());

        assert_eq!(app.balance(SENDER, "utestusd").unwrap(), u(50));
        assert_eq!(app.balance(SENDER, "uusdc").unwrap(), Uint256::zero());
        assert_eq!(app.balance(CUSTODY, "uusdc").unwrap(), u(100));
        assert_eq!(app.supply("utestusd").unwrap(), u(50));
        assert_eq!(app.bridge_status().unwrap().statistics.total_bridge_out_count, 0);
    }

    #[test]
    fn oversized_amount_is_rejected_without_halting() {
        let mut app = app_with_ratio("2.0");
        let half = Uint256::MAX / u(2) + Uint256::one();
        app.fund(SENDER, &Asset::new(half, "uusdc")).unwrap();

        let err = app.execute(bridge_in(&half.to_string())).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidAmount { .. }));
        assert!(!err.is_fatal());
        assert_eq!(app.balance(SENDER, "uusdc").unwrap(), half);
        assert_eq!(app.balance(CUSTODY, "uusdc").unwrap(), Uint256::zero());

        app.next_block();
        app.execute(bridge_in("10")).unwrap();
        assert_eq!(app.bridge_status().unwrap().total_supply, u(20));
    }

    #[test]
    fn custody_sender_rejected() {
        let mut app = app_with_ratio("1.0");
        app.fund(SENDER, &Asset::new(100u128, "uusdc")).unwrap();
        app.execute(bridge_in("100")).unwrap();

        let err = app
            .execute(ExecuteMsg::BridgeIn {
                sender: CUSTODY.to_string(),
                amount: "100".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidAddress { .. }));
        let status = app.bridge_status().unwrap();
        assert_eq!(status.total_bridged, u(100));
        assert_eq!(app.balance(CUSTODY, "uusdc").unwrap(), u(100));
    }

    #[test]
    fn frozen_sender_cannot_bridge() {
        let mut app = app_with_ratio("1.0");
        app.fund(SENDER, &Asset::new(100u128, "uusdc")).unwrap();
        app.freeze(SENDER).unwrap();

        let err = app.execute(bridge_in("10")).unwrap_err();
        assert!(matches!(err, BridgeError::TransferFailed { .. }));
        assert_eq!(app.bridge_status().unwrap().total_bridged, Uint256::zero());
    }

    #[test]
    fn corrupted_counter_halts_queries_and_execution() {
        let mut app = app_with_ratio("1.0");
        app.fund(SENDER, &Asset::new(100u128, "uusdc")).unwrap();
        app.storage.set(TOTAL_BRIDGED_KEY.as_bytes(), b"{}");

        assert!(app.bridge_status().unwrap_err().is_fatal());
        assert!(app.execute(bridge_in("1")).unwrap_err().is_fatal());
        assert_eq!(app.balance(SENDER, "uusdc").unwrap(), u(100));
    }

    #[test]
    fn audit_journal_receives_entries() {
        let mut app = app_with_ratio("1.0").with_audit(Box::new(AuditJournal::with_capacity(1)));
        app.fund(SENDER, &Asset::new(100u128, "uusdc")).unwrap();

        app.execute(bridge_in("10")).unwrap();
        // Journal is full now; the operation still succeeds.
        app.execute(bridge_in("10")).unwrap();
        assert_eq!(app.bridge_status().unwrap().total_bridged, u(20));
    }

    #[test]
    fn export_genesis_after_activity() {
        let mut app = app_with_ratio("2.0");
        app.fund(SENDER, &Asset::new(10u128, "uusdc")).unwrap();
        app.execute(bridge_in("10")).unwrap();

        let exported = app.export_genesis().unwrap();
        assert_eq!(exported.total_bridged, Some(u(10)));
        assert_eq!(exported.total_supply, Some(u(20)));
        assert_eq!(exported.params.peg_ratio, "2.0");

        let restored = BridgeApp::new(&exported, CUSTODY, GOV, mock_env().block, 5).unwrap();
        assert_eq!(restored.bridge_status().unwrap().total_supply, u(20));
    }
}
