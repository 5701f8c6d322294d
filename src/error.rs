//! Unified error types for the tidepool exchange engine.
//!
//! All fallible operations across the crate return [`ExchangeError`] as their
//! error type, ensuring a consistent error handling experience for consumers.
//!
//! Every error is a synchronous, typed failure raised before any state is
//! mutated: a caller observing an `Err` may assume reserves, LP supply,
//! positions, and ledger balances are exactly as they were before the call.

use thiserror::Error;

use crate::domain::{Amount, PositionId};

/// Unified error enum for all exchange operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeError {
    /// An amount parameter that must be strictly positive was zero.
    #[error("amount must be greater than zero")]
    ZeroAmount,

    /// No pool is registered under the given asset or pool address.
    #[error("pool not found")]
    PoolNotFound,

    /// A pool is already registered under the given asset or pool address.
    #[error("pool already exists")]
    PoolAlreadyExists,

    /// The bonding-curve pool has graduated; trading on it is closed forever.
    #[error("pool has graduated; trade on its constant-product pool instead")]
    PoolGraduated,

    /// An account balance cannot cover the requested withdrawal.
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance {
        /// Balance currently held.
        have: Amount,
        /// Balance the operation requires.
        need: Amount,
    },

    /// The curve reserve cannot cover the quoted payout.
    #[error("insufficient reserve: have {have}, need {need}")]
    InsufficientReserve {
        /// Reserve currently held.
        have: Amount,
        /// Payout the operation requires.
        need: Amount,
    },

    /// Pool reserves or LP shares cannot satisfy the operation.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// No position exists under the given id in the target pool.
    #[error("position {0} not found")]
    PositionNotFound(PositionId),

    /// Liquidity removal requested while the pool's LP supply is zero.
    #[error("LP supply is zero")]
    LpSupplyZero,

    /// A pool requires two distinct assets.
    #[error("pool requires two distinct assets")]
    IdenticalAssets,

    /// A pool fee of zero basis points is not allowed.
    #[error("pool fee must be greater than zero basis points")]
    FeeZero,

    /// A pool fee of 10 000 basis points or more is not allowed.
    #[error("pool fee of {0} basis points is out of range (must be < 10000)")]
    FeeTooHigh(u16),

    /// The swap output fell below the caller's declared minimum.
    #[error("slippage exceeded: minimum out {min_out}, actual {actual}")]
    Slippage {
        /// Caller-declared minimum acceptable output.
        min_out: Amount,
        /// Output the pool would actually pay.
        actual: Amount,
    },

    /// A caller-supplied account collides with one of the exchange's own
    /// subsystem accounts (curve vaults, graduation reserves, pool vaults,
    /// the treasury).
    #[error("account is reserved for exchange internals")]
    ReservedAccount,

    /// Checked arithmetic overflowed. The payload names the computation.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, ExchangeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            ExchangeError::ZeroAmount.to_string(),
            "amount must be greater than zero"
        );
        assert_eq!(
            ExchangeError::Slippage {
                min_out: Amount::new(100),
                actual: Amount::new(99),
            }
            .to_string(),
            "slippage exceeded: minimum out 100, actual 99"
        );
        assert_eq!(
            ExchangeError::Overflow("lp supply accumulation").to_string(),
            "arithmetic overflow: lp supply accumulation"
        );
    }

    #[test]
    fn errors_are_comparable() {
        assert_eq!(ExchangeError::PoolNotFound, ExchangeError::PoolNotFound);
        assert_ne!(ExchangeError::PoolNotFound, ExchangeError::PoolGraduated);
    }
}
