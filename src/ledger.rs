//! Balance book and delegated asset capabilities.
//!
//! The ledger is a flat balance map `(account, asset) -> amount`. Ordinary
//! deposits, withdrawals, and transfers move balances the caller already
//! holds; supply-changing and ownership-bypassing operations are gated on
//! capability values.
//!
//! A [`CapabilityBundle`] is minted exactly once per asset when the exchange
//! launches it, and is held exclusively by the exchange. The capability types
//! are deliberately not `Clone` and have no public constructor: holding a
//! reference to one is the proof of authority, so the static trust boundary
//! of the issuance path is a type-system fact rather than a convention.

use std::collections::HashMap;

use crate::domain::{AccountId, Amount, AssetId};
use crate::error::{ExchangeError, Result};

/// Delegated authority to mint new units of one asset.
#[derive(Debug)]
pub struct MintCapability {
    asset: AssetId,
}

/// Delegated authority to burn units of one asset from any account.
#[derive(Debug)]
pub struct BurnCapability {
    asset: AssetId,
}

/// Delegated authority to move one asset between accounts irrespective of
/// normal ownership checks.
#[derive(Debug)]
pub struct TransferCapability {
    asset: AssetId,
}

impl MintCapability {
    /// The asset this capability is bound to.
    #[must_use]
    pub const fn asset(&self) -> AssetId {
        self.asset
    }
}

impl BurnCapability {
    /// The asset this capability is bound to.
    #[must_use]
    pub const fn asset(&self) -> AssetId {
        self.asset
    }
}

impl TransferCapability {
    /// The asset this capability is bound to.
    #[must_use]
    pub const fn asset(&self) -> AssetId {
        self.asset
    }
}

/// The full set of delegated capabilities over one asset.
///
/// Created once at launch, held by the pool subsystem, never exposed to
/// callers.
#[derive(Debug)]
pub struct CapabilityBundle {
    mint: MintCapability,
    burn: BurnCapability,
    transfer: TransferCapability,
}

impl CapabilityBundle {
    /// Creates the bundle for one asset. Crate-internal: only the launch
    /// path may construct capabilities.
    pub(crate) const fn new(asset: AssetId) -> Self {
        Self {
            mint: MintCapability { asset },
            burn: BurnCapability { asset },
            transfer: TransferCapability { asset },
        }
    }

    /// The asset the bundle is bound to.
    #[must_use]
    pub const fn asset(&self) -> AssetId {
        self.mint.asset
    }

    /// The mint capability.
    #[must_use]
    pub const fn mint(&self) -> &MintCapability {
        &self.mint
    }

    /// The burn capability.
    #[must_use]
    pub const fn burn(&self) -> &BurnCapability {
        &self.burn
    }

    /// The transfer capability.
    #[must_use]
    pub const fn transfer(&self) -> &TransferCapability {
        &self.transfer
    }
}

/// In-memory balance book for all accounts and assets.
///
/// Every mutation validates fully before writing, so a failed call leaves
/// the book untouched.
#[derive(Debug, Default)]
pub struct Ledger {
    balances: HashMap<(AccountId, AssetId), Amount>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the balance of `account` in `asset` (zero when absent).
    #[must_use]
    pub fn balance_of(&self, account: AccountId, asset: AssetId) -> Amount {
        self.balances
            .get(&(account, asset))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Checks, without mutating, that `account` could be debited `amount`.
    ///
    /// # Errors
    ///
    /// [`ExchangeError::InsufficientBalance`] if the account holds less than
    /// `amount`.
    pub fn ensure_debit(&self, account: AccountId, asset: AssetId, amount: Amount) -> Result<()> {
        let have = self.balance_of(account, asset);
        if have < amount {
            return Err(ExchangeError::InsufficientBalance { have, need: amount });
        }
        Ok(())
    }

    /// Checks, without mutating, that `account` could be credited `amount`.
    ///
    /// # Errors
    ///
    /// [`ExchangeError::Overflow`] if the balance would exceed `u64::MAX`.
    pub fn ensure_credit(&self, account: AccountId, asset: AssetId, amount: Amount) -> Result<()> {
        match self.balance_of(account, asset).checked_add(amount) {
            Some(_) => Ok(()),
            None => Err(ExchangeError::Overflow("ledger balance accumulation")),
        }
    }

    /// Credits `amount` to `account`. This is the host's on-ramp for base
    /// currency; asset supply is created only through [`Self::mint`].
    ///
    /// # Errors
    ///
    /// [`ExchangeError::Overflow`] if the balance would exceed `u64::MAX`.
    pub fn deposit(&mut self, account: AccountId, asset: AssetId, amount: Amount) -> Result<()> {
        let current = self.balance_of(account, asset);
        let updated = current
            .checked_add(amount)
            .ok_or(ExchangeError::Overflow("ledger balance accumulation"))?;
        self.balances.insert((account, asset), updated);
        Ok(())
    }

    /// Debits `amount` from `account`.
    ///
    /// # Errors
    ///
    /// [`ExchangeError::InsufficientBalance`] if the account holds less than
    /// `amount`.
    pub fn withdraw(&mut self, account: AccountId, asset: AssetId, amount: Amount) -> Result<()> {
        let current = self.balance_of(account, asset);
        let updated = current
            .checked_sub(amount)
            .ok_or(ExchangeError::InsufficientBalance {
                have: current,
                need: amount,
            })?;
        self.balances.insert((account, asset), updated);
        Ok(())
    }

    /// Moves `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::InsufficientBalance`] if `from` holds less than
    ///   `amount`.
    /// - [`ExchangeError::Overflow`] if `to`'s balance would exceed
    ///   `u64::MAX`.
    pub fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        asset: AssetId,
        amount: Amount,
    ) -> Result<()> {
        if from == to {
            // Self-transfer: checked for funds, otherwise a no-op.
            let have = self.balance_of(from, asset);
            if have < amount {
                return Err(ExchangeError::InsufficientBalance { have, need: amount });
            }
            return Ok(());
        }
        let from_balance = self.balance_of(from, asset);
        let from_after =
            from_balance
                .checked_sub(amount)
                .ok_or(ExchangeError::InsufficientBalance {
                    have: from_balance,
                    need: amount,
                })?;
        let to_after = self
            .balance_of(to, asset)
            .checked_add(amount)
            .ok_or(ExchangeError::Overflow("ledger balance accumulation"))?;
        self.balances.insert((from, asset), from_after);
        self.balances.insert((to, asset), to_after);
        Ok(())
    }

    /// Mints new units of the capability's asset into `to`.
    ///
    /// # Errors
    ///
    /// [`ExchangeError::Overflow`] if the balance would exceed `u64::MAX`.
    pub fn mint(&mut self, cap: &MintCapability, to: AccountId, amount: Amount) -> Result<()> {
        self.deposit(to, cap.asset, amount)
    }

    /// Burns units of the capability's asset from `from`.
    ///
    /// # Errors
    ///
    /// [`ExchangeError::InsufficientBalance`] if `from` holds less than
    /// `amount`.
    pub fn burn(&mut self, cap: &BurnCapability, from: AccountId, amount: Amount) -> Result<()> {
        self.withdraw(from, cap.asset, amount)
    }

    /// Moves the capability's asset between arbitrary accounts, bypassing
    /// ownership checks.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::transfer`].
    pub fn force_transfer(
        &mut self,
        cap: &TransferCapability,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<()> {
        self.transfer(from, to, cap.asset, amount)
    }
}
