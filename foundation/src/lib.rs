//! The foundation module: a one-member-one-vote organisation with a shared
//! treasury.
//!
//! Members decide through proposals that carry arbitrary messages; an
//! accepted proposal executes them as the foundation authority. A
//! censorship registry gates selected message types behind explicit
//! grants, and a per-block tax feeds the treasury from collected fees.
//!
//! The [`Keeper`] owns all state and is driven by the host through
//! [`Keeper::deliver`] for transactions, [`Keeper::begin_block`] and
//! [`Keeper::end_block`] for block hooks, and the `query_*` accessors.

pub mod authorization;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod expected;
pub mod genesis;
pub mod keeper;
pub mod member;
pub mod msgs;
pub mod params;
pub mod policy;
pub mod proposal;
pub mod tally;

pub use authorization::{
    AcceptResponse, Authorization, Censorship, CensorshipAuthority, GrantAuthorization,
};
pub use config::FoundationConfig;
pub use context::{BlockHeader, Context};
pub use error::FoundationError;
pub use event::Event;
pub use expected::{BankKeeper, MsgHandler, MsgRouter};
pub use genesis::GenesisState;
pub use keeper::{Keeper, MODULE_NAME, TREASURY_NAME};
pub use member::{FoundationInfo, Member, MemberRequest};
pub use msgs::{AnyMsg, Exec, FoundationMsg, Msg, MsgResponse};
pub use params::Params;
pub use policy::{DecisionPolicy, DecisionPolicyResult, DecisionPolicyWindows};
pub use proposal::{ExecutorResult, Proposal, ProposalStatus, Vote};
pub use tally::{TallyResult, VoteOption};
