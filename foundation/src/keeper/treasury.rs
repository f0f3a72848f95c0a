use foundation_types::{Address, Coin, Coins};

use super::{keys, load, save, Keeper, TREASURY_NAME};
use crate::context::Context;
use crate::event::Event;
use crate::FoundationError;

impl Keeper {
    /// The treasury ledger. It always equals the balance of the treasury
    /// module account.
    pub fn get_pool(&self, ctx: &Context<'_>) -> Result<Coins, FoundationError> {
        Ok(load(ctx, keys::TREASURY_KEY)?.unwrap_or_default())
    }

    pub(crate) fn set_pool(&self, ctx: &mut Context<'_>, pool: &Coins) -> Result<(), FoundationError> {
        save(ctx, keys::TREASURY_KEY, pool)
    }

    fn add_to_pool(&self, ctx: &mut Context<'_>, amount: &Coins) -> Result<Coins, FoundationError> {
        let pool = self.get_pool(ctx)?.checked_add(amount)?;
        self.set_pool(ctx, &pool)?;
        Ok(pool)
    }

    /// Move `amount` from `from` into the treasury.
    pub fn fund_treasury(
        &self,
        ctx: &mut Context<'_>,
        from: &Address,
        amount: &Coins,
    ) -> Result<(), FoundationError> {
        self.bank
            .send_from_account_to_module(ctx, from, TREASURY_NAME, amount)?;
        let pool = self.add_to_pool(ctx, amount)?;
        tracing::info!(%from, %amount, %pool, "treasury funded");
        Ok(())
    }

    /// Pay `amount` out of the treasury to `to`. Checked against the ledger,
    /// not the module account balance.
    pub fn withdraw_from_treasury(
        &self,
        ctx: &mut Context<'_>,
        to: &Address,
        amount: &Coins,
    ) -> Result<(), FoundationError> {
        let pool = self.get_pool(ctx)?;
        let remaining = pool
            .checked_sub(amount)
            .ok_or_else(|| FoundationError::InsufficientFunds {
                available: pool.to_string(),
                needed: amount.to_string(),
            })?;
        self.set_pool(ctx, &remaining)?;
        self.bank
            .send_from_module_to_account(ctx, TREASURY_NAME, to, amount)?;
        tracing::info!(%to, %amount, pool = %remaining, "treasury withdrawal");
        Ok(())
    }

    /// Move the tax share of the fee collector's balance into the treasury.
    /// Every denomination is taxed separately and truncated to whole units.
    pub fn collect_foundation_tax(&self, ctx: &mut Context<'_>) -> Result<(), FoundationError> {
        let tax = self.get_params(ctx)?.foundation_tax;
        if tax.is_zero() {
            return Ok(());
        }

        let collector = self.bank.module_address(&self.config.fee_collector);
        let fees = self.bank.balance(ctx, &collector)?;
        let mut collected = Vec::new();
        for (denom, amount) in fees.iter() {
            let share = tax
                .mul_int_truncate(amount)
                .ok_or_else(|| FoundationError::invalid(format!("tax overflow on {denom}")))?;
            if share > 0 {
                collected.push(Coin::new(denom, share));
            }
        }
        let collected = Coins::from_coins(collected)?;
        if collected.is_zero() {
            return Ok(());
        }

        self.bank.send_from_module_to_module(
            ctx,
            &self.config.fee_collector,
            TREASURY_NAME,
            &collected,
        )?;
        let pool = self.add_to_pool(ctx, &collected)?;
        tracing::debug!(amount = %collected, %pool, "foundation tax collected");
        ctx.emit(Event::CollectedFoundationTax { amount: collected });
        Ok(())
    }
}
