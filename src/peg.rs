// ============================================
// src/peg.rs
// Peg ratio arithmetic

use std::str::FromStr;

use cosmwasm_std::{Decimal256, Uint256, Uint512};

use crate::error::BridgeError;

/// Synthetic units issued per collateral unit.
///
/// Both conversions truncate toward zero so the bridge never issues more
/// synthetic than the collateral covers and never releases more collateral
/// than the burn entitles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PegRatio(Decimal256);

impl PegRatio {
    /// Surrounding whitespace is rejected, not stripped.
    pub fn parse(raw: &str) -> Result<Self, BridgeError> {
        let invalid = || BridgeError::InvalidPegRatio {
            ratio: raw.to_string(),
        };
        if raw.trim() != raw {
            return Err(invalid());
        }
        let ratio = Decimal256::from_str(raw).map_err(|_| invalid())?;
        if ratio.is_zero() {
            return Err(invalid());
        }
        Ok(PegRatio(ratio))
    }

    pub fn decimal(&self) -> Decimal256 {
        self.0
    }

    /// `floor(amount * ratio)`. A result past `Uint256::MAX` rejects the
    /// caller's amount as `InvalidAmount`.
    pub fn mint_amount(&self, amount: Uint256) -> Result<Uint256, BridgeError> {
        let product = amount.full_mul(self.0.atomics());
        narrow(product / Uint512::from(fractional()), amount)
    }

    /// `floor(amount / ratio)`
    pub fn release_amount(&self, amount: Uint256) -> Result<Uint256, BridgeError> {
        let scaled = amount.full_mul(fractional());
        narrow(scaled / Uint512::from(self.0.atomics()), amount)
    }
}

impl std::fmt::Display for PegRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn fractional() -> Uint256 {
    Uint256::from(10u128.pow(Decimal256::DECIMAL_PLACES))
}

fn narrow(wide: Uint512, amount: Uint256) -> Result<Uint256, BridgeError> {
    Uint256::try_from(wide).map_err(|_| BridgeError::InvalidAmount {
        amount: amount.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(n: u128) -> Uint256 {
        Uint256::from(n)
    }

    #[test]
    fn parses_positive_ratios() {
        assert_eq!(PegRatio::parse("1.0").unwrap().decimal(), Decimal256::one());
        assert_eq!(
            PegRatio::parse("2.5").unwrap().decimal(),
            Decimal256::from_str("2.5").unwrap()
        );
    }

    #[test]
    fn rejects_bad_ratios() {
        for raw in ["", "0", "0.0", "-1", "abc", "1.2.3", " 2.0", "2.0\n"] {
            let err = PegRatio::parse(raw).unwrap_err();
            assert!(
                matches!(err, BridgeError::InvalidPegRatio { .. }),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn mint_truncates() {
        let ratio = PegRatio::parse("1.5").unwrap();
        assert_eq!(ratio.mint_amount(u(3)).unwrap(), u(4));
        assert_eq!(ratio.mint_amount(u(1)).unwrap(), u(1));

        let third = PegRatio::parse("0.333333333333333333").unwrap();
        assert_eq!(third.mint_amount(u(3)).unwrap(), u(0));
        assert_eq!(third.mint_amount(u(1_000_000)).unwrap(), u(333_333));
    }

    #[test]
    fn release_truncates() {
        let ratio = PegRatio::parse("2.0").unwrap();
        assert_eq!(ratio.release_amount(u(100)).unwrap(), u(50));
        assert_eq!(ratio.release_amount(u(101)).unwrap(), u(50));

        let ratio = PegRatio::parse("3").unwrap();
        assert_eq!(ratio.release_amount(u(10)).unwrap(), u(3));
    }

    #[test]
    fn round_trip_never_gains() {
        for raw in ["1.0", "2.0", "1.5", "0.75", "3.333333", "1000"] {
            let ratio = PegRatio::parse(raw).unwrap();
            for amount in [1u128, 7, 50, 99, 1_000, 123_456_789] {
                let minted = ratio.mint_amount(u(amount)).unwrap();
                let released = ratio.release_amount(minted).unwrap();
                assert!(released <= u(amount), "ratio {raw} amount {amount}");
            }
        }
    }

    #[test]
    fn handles_amounts_beyond_u128() {
        let big = Uint256::from(u128::MAX) * u(1_000);
        let ratio = PegRatio::parse("2").unwrap();
        assert_eq!(ratio.mint_amount(big).unwrap(), big * u(2));
        assert_eq!(ratio.release_amount(big * u(2)).unwrap(), big);
    }

    #[test]
    fn mint_overflow_rejects_amount() {
        let ratio = PegRatio::parse("2").unwrap();
        let err = ratio.mint_amount(Uint256::MAX).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidAmount { .. }));
        assert!(!err.is_fatal());

        let tiny = PegRatio::parse("0.5").unwrap();
        let err = tiny.release_amount(Uint256::MAX).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidAmount { .. }));
    }
}
