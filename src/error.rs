// ============================================
// src/error.rs
// Error definitions

use cosmwasm_std::{OverflowError, StdError};
use thiserror::Error;

use crate::bank::BankError;

/// How an error should be surfaced by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller input or business rule; returned to the submitter.
    User,
    /// Operator misconfiguration; the caller did nothing wrong.
    Internal,
    /// Storage or accounting state can no longer be trusted. The host should halt.
    Fatal,
}

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("bridge is disabled")]
    BridgeDisabled {},

    #[error("invalid amount: {amount}")]
    InvalidAmount { amount: String },

    #[error("invalid sender address: {address}")]
    InvalidAddress { address: String },

    #[error("invalid peg ratio: {ratio}")]
    InvalidPegRatio { ratio: String },

    #[error("insufficient balance: need {needed}{denom}, have {available}{denom}")]
    InsufficientBalance {
        denom: String,
        needed: String,
        available: String,
    },

    #[error("insufficient bridge balance: need {needed}{denom}, reserve holds {available}{denom}")]
    InsufficientBridgeReserve {
        denom: String,
        needed: String,
        available: String,
    },

    #[error("bridge transfer failed ({stage}): {source}")]
    TransferFailed {
        stage: &'static str,
        #[source]
        source: BankError,
    },

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("expected {expected} as only signer for params update, got {actual}")]
    Unauthorized { expected: String, actual: String },

    #[error("invalid request")]
    InvalidRequest {},

    #[error("corrupted store value under key `{key}`: {reason}")]
    Corrupted { key: &'static str, reason: String },

    #[error("ledger counter `{counter}` would go negative")]
    LedgerUnderflow { counter: &'static str },

    #[error("{0}")]
    Overflow(#[from] OverflowError),
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::InvalidPegRatio { .. } => ErrorKind::Internal,
            BridgeError::Corrupted { .. } | BridgeError::LedgerUnderflow { .. } => {
                ErrorKind::Fatal
            }
            BridgeError::Std(StdError::ParseErr { .. }) => ErrorKind::Fatal,
            _ => ErrorKind::User,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Fatal
    }

    /// Module error code as registered with the chain's error registry.
    pub fn code(&self) -> u32 {
        match self {
            BridgeError::Unauthorized { .. } => 1100,
            BridgeError::BridgeDisabled {} => 1102,
            BridgeError::InvalidPegRatio { .. } => 1103,
            BridgeError::InsufficientBalance { .. } => 1104,
            BridgeError::InsufficientBridgeReserve { .. } => 1105,
            BridgeError::InvalidAmount { .. } => 1106,
            BridgeError::TransferFailed { .. } => 1107,
            BridgeError::InvalidAddress { .. } => 1108,
            BridgeError::InvalidParameter { .. } => 1109,
            BridgeError::InvalidRequest {} => 1110,
            BridgeError::Corrupted { .. } => 1111,
            BridgeError::LedgerUnderflow { .. } => 1112,
            BridgeError::Overflow(_) => 1113,
            BridgeError::Std(_) => 1,
        }
    }

    /// Maps a typed-store load failure onto the fatal corruption error.
    pub(crate) fn corrupted(key: &'static str, err: StdError) -> Self {
        BridgeError::Corrupted {
            key,
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::OverflowOperation;

    #[test]
    fn classifies_errors() {
        assert_eq!(BridgeError::BridgeDisabled {}.kind(), ErrorKind::User);
        assert_eq!(
            BridgeError::InvalidPegRatio { ratio: "x".into() }.kind(),
            ErrorKind::Internal
        );
        assert!(BridgeError::LedgerUnderflow { counter: "total_supply" }.is_fatal());
        assert_eq!(
            BridgeError::Overflow(OverflowError::new(OverflowOperation::Mul, 1, 2)).kind(),
            ErrorKind::User
        );
        assert!(!BridgeError::InvalidRequest {}.is_fatal());
    }

    #[test]
    fn registered_codes() {
        assert_eq!(BridgeError::BridgeDisabled {}.code(), 1102);
        assert_eq!(
            BridgeError::InvalidAmount { amount: "0".into() }.code(),
            1106
        );
        assert_eq!(
            BridgeError::InsufficientBridgeReserve {
                denom: "uusdc".into(),
                needed: "1".into(),
                available: "0".into(),
            }
            .code(),
            1105
        );
    }
}
