// ============================================
// src/context.rs
// Transaction-scoped execution context

use cosmwasm_std::{Api, BlockInfo, Event, Storage};
use tracing::Span;

/// Everything an engine call may touch besides its collaborators: the
/// transaction's store, address codec, block clock, event sink and log span.
pub struct TxContext<'a> {
    pub storage: &'a mut dyn Storage,
    pub api: &'a dyn Api,
    pub block: BlockInfo,
    pub events: Vec<Event>,
    pub span: Span,
}

impl<'a> TxContext<'a> {
    pub fn new(storage: &'a mut dyn Storage, api: &'a dyn Api, block: BlockInfo) -> Self {
        let span = tracing::info_span!(
            "bridge_tx",
            chain_id = %block.chain_id,
            height = block.height
        );
        TxContext {
            storage,
            api,
            block,
            events: Vec::new(),
            span,
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Hands the collected events to the caller once the transaction commits.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
