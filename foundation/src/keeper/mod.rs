//! The keeper: sole owner of the module's state.
//!
//! All reads and writes go through a [`Context`]; the keeper itself only
//! holds configuration and its host collaborators. Each submodule covers
//! one concern:
//!
//! - `params`: on-chain parameters and the tax kill switch
//! - `members`: membership, foundation info, version bumps and aborts
//! - `proposal`: submission, withdrawal, votes and pruning
//! - `tally`: vote counting and finalisation
//! - `exec`: running the messages of accepted proposals
//! - `censorship`: censorship records and grants
//! - `treasury`: the pool ledger and tax collection
//! - `abci`: begin/end block hooks
//! - `msg_server`: message handlers with signer checks and events
//! - `query`: read-only accessors
//! - `genesis`: import and export of the whole state

mod abci;
mod censorship;
mod exec;
mod genesis;
pub(crate) mod keys;
mod members;
mod msg_server;
mod params;
mod proposal;
mod query;
mod tally;
mod treasury;

use serde::de::DeserializeOwned;
use serde::Serialize;

use foundation_store::{decode, encode};
use foundation_types::Address;

use crate::config::FoundationConfig;
use crate::context::Context;
use crate::expected::{BankKeeper, MsgRouter};
use crate::msgs::{AnyMsg, MsgResponse};
use crate::FoundationError;

/// Name of the module; its account address is the foundation authority.
pub const MODULE_NAME: &str = "foundation";

/// Module account holding the treasury funds.
pub const TREASURY_NAME: &str = "treasury";

pub struct Keeper {
    config: FoundationConfig,
    bank: Box<dyn BankKeeper>,
    router: Box<dyn MsgRouter>,
    authority: Address,
    governance: Address,
}

impl Keeper {
    pub fn new(
        config: FoundationConfig,
        bank: impl BankKeeper + 'static,
        router: impl MsgRouter + 'static,
    ) -> Self {
        let authority = bank.module_address(MODULE_NAME);
        let governance = bank.module_address(&config.governance_module);
        Self {
            config,
            bank: Box::new(bank),
            router: Box::new(router),
            authority,
            governance,
        }
    }

    pub fn config(&self) -> &FoundationConfig {
        &self.config
    }

    /// The foundation authority: proposals execute their messages as this
    /// address.
    pub fn authority(&self) -> &Address {
        &self.authority
    }

    /// The governance module account.
    pub fn governance(&self) -> &Address {
        &self.governance
    }

    /// Entry point for a transaction message. Runs in a branch of `ctx`,
    /// so a failing message leaves no trace.
    pub fn deliver(
        &self,
        ctx: &mut Context<'_>,
        msg: &AnyMsg,
    ) -> Result<MsgResponse, FoundationError> {
        let result = ctx.branch(|sub| self.dispatch(sub, msg));
        if let Err(e) = &result {
            tracing::debug!(type_url = %msg.type_url, error = %e, "message rejected");
        }
        result
    }

    /// Route a message to its handler: our own messages to the message
    /// server, everything else to the host router behind the censorship
    /// gate.
    pub(crate) fn dispatch(
        &self,
        ctx: &mut Context<'_>,
        msg: &AnyMsg,
    ) -> Result<MsgResponse, FoundationError> {
        if let Some(decoded) = crate::msgs::FoundationMsg::from_any(msg) {
            let decoded = decoded?;
            decoded.validate_basic(&self.config)?;
            return self.handle(ctx, decoded);
        }

        let handler = self
            .router
            .handler(&msg.type_url)
            .ok_or_else(|| FoundationError::UnknownRequest(msg.type_url.clone()))?;
        for signer in handler.signers(msg)? {
            self.accept(ctx, &signer, msg)?;
        }
        handler.handle(ctx, msg)
    }

    /// Required signers of any routable message.
    pub(crate) fn msg_signers(&self, msg: &AnyMsg) -> Result<Vec<Address>, FoundationError> {
        if let Some(decoded) = crate::msgs::FoundationMsg::from_any(msg) {
            return Ok(decoded?.signers());
        }
        self.router
            .handler(&msg.type_url)
            .ok_or_else(|| FoundationError::UnknownRequest(msg.type_url.clone()))?
            .signers(msg)
    }
}

// ── Store helpers ──────────────────────────────────────────────────────

fn load<T: DeserializeOwned>(ctx: &Context<'_>, key: &[u8]) -> Result<Option<T>, FoundationError> {
    ctx.store()
        .get(key)
        .map(|bytes| decode(key, &bytes))
        .transpose()
        .map_err(FoundationError::from)
}

fn save<T: Serialize>(ctx: &mut Context<'_>, key: &[u8], value: &T) -> Result<(), FoundationError> {
    let bytes = encode(value)?;
    ctx.store_mut().set(key, bytes);
    Ok(())
}

/// Decode every record under `prefix`, in key order.
fn load_prefix<T: DeserializeOwned>(
    ctx: &Context<'_>,
    prefix: &[u8],
) -> Result<Vec<T>, FoundationError> {
    ctx.store()
        .prefix_scan(prefix)
        .into_iter()
        .map(|(key, bytes)| decode(&key, &bytes).map_err(FoundationError::from))
        .collect()
}
