//! Collaborators the module expects from its host.
//!
//! The keeper never owns balances or foreign message handlers. Balances
//! live in the context store so that they roll back together with the
//! module's own state when a branch is discarded.

use foundation_types::{Address, Coins};

use crate::context::Context;
use crate::msgs::{AnyMsg, MsgResponse};
use crate::FoundationError;

/// Token ledger of the host.
pub trait BankKeeper {
    /// Account address of the named module.
    fn module_address(&self, module: &str) -> Address;

    fn balance(&self, ctx: &Context<'_>, address: &Address) -> Result<Coins, FoundationError>;

    /// Fails with `InsufficientFunds` when `from` cannot cover `amount`.
    fn send_from_account_to_module(
        &self,
        ctx: &mut Context<'_>,
        from: &Address,
        module: &str,
        amount: &Coins,
    ) -> Result<(), FoundationError>;

    fn send_from_module_to_account(
        &self,
        ctx: &mut Context<'_>,
        module: &str,
        to: &Address,
        amount: &Coins,
    ) -> Result<(), FoundationError>;

    fn send_from_module_to_module(
        &self,
        ctx: &mut Context<'_>,
        from_module: &str,
        to_module: &str,
        amount: &Coins,
    ) -> Result<(), FoundationError>;

    /// Create `amount` in the named module account.
    fn mint_coins(
        &self,
        ctx: &mut Context<'_>,
        module: &str,
        amount: &Coins,
    ) -> Result<(), FoundationError>;
}

/// Handler for the messages of one foreign module.
pub trait MsgHandler {
    /// Addresses that must have signed `msg`.
    fn signers(&self, msg: &AnyMsg) -> Result<Vec<Address>, FoundationError>;

    fn handle(&self, ctx: &mut Context<'_>, msg: &AnyMsg) -> Result<MsgResponse, FoundationError>;
}

/// Resolves foreign messages to their handlers.
pub trait MsgRouter {
    fn handler(&self, type_url: &str) -> Option<&dyn MsgHandler>;
}
