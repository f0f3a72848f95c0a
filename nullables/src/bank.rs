//! Nullable bank: balances kept in the context store.
//!
//! Balances live under their own key prefix in the same store as the
//! module, so a discarded branch rolls transfers back together with the
//! module's own writes.

use foundation::{BankKeeper, Context, FoundationError};
use foundation_store::{decode, encode};
use foundation_types::{Address, Coins};

const BALANCE_PREFIX: u8 = 0xb0;

fn balance_key(address: &Address) -> Vec<u8> {
    let mut key = vec![BALANCE_PREFIX];
    key.extend(address.to_key_bytes());
    key
}

/// An in-store token ledger for testing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullBank;

impl NullBank {
    pub fn new() -> Self {
        Self
    }

    /// Account address of a module.
    pub fn module_account(module: &str) -> Address {
        Address::new(format!("mod-{module}"))
    }

    pub fn set_balance(
        &self,
        ctx: &mut Context<'_>,
        address: &Address,
        coins: &Coins,
    ) -> Result<(), FoundationError> {
        let key = balance_key(address);
        if coins.is_zero() {
            ctx.store_mut().delete(&key);
        } else {
            ctx.store_mut().set(&key, encode(coins)?);
        }
        Ok(())
    }

    /// Move `amount` between two accounts.
    pub fn send(
        &self,
        ctx: &mut Context<'_>,
        from: &Address,
        to: &Address,
        amount: &Coins,
    ) -> Result<(), FoundationError> {
        let available = self.balance(ctx, from)?;
        let remaining = available
            .checked_sub(amount)
            .ok_or_else(|| FoundationError::InsufficientFunds {
                available: available.to_string(),
                needed: amount.to_string(),
            })?;
        self.set_balance(ctx, from, &remaining)?;
        let credited = self.balance(ctx, to)?.checked_add(amount)?;
        self.set_balance(ctx, to, &credited)
    }
}

impl BankKeeper for NullBank {
    fn module_address(&self, module: &str) -> Address {
        Self::module_account(module)
    }

    fn balance(&self, ctx: &Context<'_>, address: &Address) -> Result<Coins, FoundationError> {
        let key = balance_key(address);
        match ctx.store().get(&key) {
            Some(bytes) => Ok(decode(&key, &bytes)?),
            None => Ok(Coins::new()),
        }
    }

    fn send_from_account_to_module(
        &self,
        ctx: &mut Context<'_>,
        from: &Address,
        module: &str,
        amount: &Coins,
    ) -> Result<(), FoundationError> {
        self.send(ctx, from, &Self::module_account(module), amount)
    }

    fn send_from_module_to_account(
        &self,
        ctx: &mut Context<'_>,
        module: &str,
        to: &Address,
        amount: &Coins,
    ) -> Result<(), FoundationError> {
        self.send(ctx, &Self::module_account(module), to, amount)
    }

    fn send_from_module_to_module(
        &self,
        ctx: &mut Context<'_>,
        from_module: &str,
        to_module: &str,
        amount: &Coins,
    ) -> Result<(), FoundationError> {
        self.send(
            ctx,
            &Self::module_account(from_module),
            &Self::module_account(to_module),
            amount,
        )
    }

    fn mint_coins(
        &self,
        ctx: &mut Context<'_>,
        module: &str,
        amount: &Coins,
    ) -> Result<(), FoundationError> {
        let account = Self::module_account(module);
        let minted = self.balance(ctx, &account)?.checked_add(amount)?;
        self.set_balance(ctx, &account, &minted)
    }
}
