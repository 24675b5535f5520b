// ============================================
// src/audit.rs
// Best-effort transaction history

use std::io::Write;

use cosmwasm_schema::cw_serde;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::bank::Asset;

/// Counterparty recorded for assets entering from outside the chain.
pub const EXTERNAL_BRIDGE: &str = "external_bridge";

#[cw_serde]
pub struct AuditEntry {
    pub tx_hash: String,
    pub address: String,
    pub kind: String,
    pub description: String,
    pub amount: Asset,
    pub from: String,
    pub to: String,
    /// JSON object with operation details.
    pub metadata: String,
    pub height: u64,
    pub timestamp: u64,
}

impl AuditEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        address: &str,
        kind: &str,
        description: String,
        amount: Asset,
        from: &str,
        to: &str,
        metadata: String,
        height: u64,
        timestamp: u64,
    ) -> Self {
        let tx_hash = entry_hash(address, kind, &amount, from, to, &metadata, height, timestamp);
        AuditEntry {
            tx_hash,
            address: address.to_string(),
            kind: kind.to_string(),
            description,
            amount,
            from: from.to_string(),
            to: to.to_string(),
            metadata,
            height,
            timestamp,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn entry_hash(
    address: &str,
    kind: &str,
    amount: &Asset,
    from: &str,
    to: &str,
    metadata: &str,
    height: u64,
    timestamp: u64,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(address.as_bytes());
    hasher.update(kind.as_bytes());
    hasher.update(amount.to_string().as_bytes());
    hasher.update(from.as_bytes());
    hasher.update(to.as_bytes());
    hasher.update(metadata.as_bytes());
    hasher.update(height.to_le_bytes());
    hasher.update(timestamp.to_le_bytes());

    hex::encode_upper(hasher.finalize())
}

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("audit journal full ({capacity} entries)")]
    JournalFull { capacity: usize },

    #[error("failed to encode audit entry: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write audit entry: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only sink for audit entries. Failures are never fatal to the
/// operation being recorded.
pub trait AuditRecorder {
    fn record(&mut self, entry: AuditEntry) -> Result<(), AuditError>;
}

/// Bounded in-memory journal.
#[derive(Debug, Default)]
pub struct AuditJournal {
    entries: Vec<AuditEntry>,
    capacity: Option<usize>,
}

impl AuditJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        AuditJournal {
            entries: Vec::new(),
            capacity: Some(capacity),
        }
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }
}

impl AuditRecorder for AuditJournal {
    fn record(&mut self, entry: AuditEntry) -> Result<(), AuditError> {
        if let Some(capacity) = self.capacity {
            if self.entries.len() >= capacity {
                return Err(AuditError::JournalFull { capacity });
            }
        }
        self.entries.push(entry);
        Ok(())
    }
}

/// Writes one JSON document per line.
pub struct JsonLinesAudit<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesAudit<W> {
    pub fn new(out: W) -> Self {
        JsonLinesAudit { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AuditRecorder for JsonLinesAudit<W> {
    fn record(&mut self, entry: AuditEntry) -> Result<(), AuditError> {
        let line = serde_json::to_string(&entry)?;
        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        Ok(())
    }
}
