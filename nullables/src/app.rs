//! A complete in-memory host: store, clock, bank, router and keeper.

use foundation::{
    AnyMsg, BankKeeper, Context, Event, FoundationConfig, FoundationError, GenesisState, Keeper,
    Member, Msg, MsgResponse,
};
use foundation_store::MemStore;
use foundation_types::{Address, Coins, Dec};

use crate::bank::NullBank;
use crate::clock::NullClock;
use crate::router::NullRouter;

/// Genesis time of every [`NullApp`].
pub const GENESIS_TIME: u64 = 1_000_000;

pub struct NullApp {
    pub keeper: Keeper,
    pub bank: NullBank,
    pub clock: NullClock,
    pub store: MemStore,
    /// Events of the last delivered message or block hook.
    pub events: Vec<Event>,
}

impl NullApp {
    pub fn new(config: FoundationConfig, genesis: &GenesisState) -> Result<Self, FoundationError> {
        let bank = NullBank::new();
        let keeper = Keeper::new(config, bank, NullRouter::new(bank));
        let mut app = Self {
            keeper,
            bank,
            clock: NullClock::new(GENESIS_TIME),
            store: MemStore::new(),
            events: Vec::new(),
        };
        app.with_ctx(|keeper, ctx| keeper.init_genesis(ctx, genesis))?;
        Ok(app)
    }

    /// Default genesis with the given members.
    pub fn with_members(names: &[&str]) -> Self {
        Self::new(FoundationConfig::default(), &genesis_with_members(names))
            .unwrap_or_else(|e| panic!("invalid test genesis: {e}"))
    }

    pub fn authority(&self) -> Address {
        self.keeper.authority().clone()
    }

    pub fn governance(&self) -> Address {
        self.keeper.governance().clone()
    }

    pub fn treasury(&self) -> Address {
        NullBank::module_account(foundation::TREASURY_NAME)
    }

    pub fn fee_collector(&self) -> Address {
        NullBank::module_account(&self.keeper.config().fee_collector)
    }

    /// Run `f` against a context over the current block.
    pub fn with_ctx<T>(&mut self, f: impl FnOnce(&Keeper, &mut Context<'_>) -> T) -> T {
        let mut ctx = Context::new(&mut self.store, self.clock.header());
        let out = f(&self.keeper, &mut ctx);
        self.events = ctx.take_events();
        out
    }

    pub fn deliver(&mut self, msg: &impl Msg) -> Result<MsgResponse, FoundationError> {
        let any = msg.to_any()?;
        self.deliver_any(&any)
    }

    pub fn deliver_any(&mut self, msg: &AnyMsg) -> Result<MsgResponse, FoundationError> {
        self.with_ctx(|keeper, ctx| keeper.deliver(ctx, msg))
    }

    pub fn begin_block(&mut self) -> Result<(), FoundationError> {
        self.with_ctx(|keeper, ctx| keeper.begin_block(ctx))
    }

    pub fn end_block(&mut self) -> Result<(), FoundationError> {
        self.with_ctx(|keeper, ctx| keeper.end_block(ctx))
    }

    /// Move to a block `secs` later.
    pub fn advance(&mut self, secs: u64) {
        self.clock.advance(secs);
    }

    pub fn balance(&mut self, address: &Address) -> Coins {
        let bank = self.bank;
        self.with_ctx(|_, ctx| bank.balance(ctx, address))
            .unwrap_or_else(|e| panic!("corrupt balance of {address}: {e}"))
    }

    pub fn set_balance(&mut self, address: &Address, coins: &Coins) {
        let bank = self.bank;
        self.with_ctx(|_, ctx| bank.set_balance(ctx, address, coins))
            .unwrap_or_else(|e| panic!("cannot set balance of {address}: {e}"));
    }
}

/// Default genesis with one member per name.
pub fn genesis_with_members(names: &[&str]) -> GenesisState {
    let mut genesis = GenesisState::default();
    genesis.members = names
        .iter()
        .map(|name| Member {
            address: Address::new(*name),
            metadata: String::new(),
            added_at: foundation_types::Timestamp::new(GENESIS_TIME),
        })
        .collect();
    genesis.foundation.total_weight = Dec::from_int(names.len() as u64);
    genesis
}
