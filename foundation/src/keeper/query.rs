//! Read-only queries. None of them mutates state or emits events.

use foundation_types::{Address, Coins};

use super::Keeper;
use crate::authorization::{Censorship, GrantAuthorization};
use crate::context::Context;
use crate::member::{FoundationInfo, Member};
use crate::params::Params;
use crate::proposal::{Proposal, Vote};
use crate::tally::TallyResult;
use crate::FoundationError;

impl Keeper {
    pub fn query_params(&self, ctx: &Context<'_>) -> Result<Params, FoundationError> {
        self.get_params(ctx)
    }

    pub fn query_treasury(&self, ctx: &Context<'_>) -> Result<Coins, FoundationError> {
        self.get_pool(ctx)
    }

    pub fn query_foundation_info(
        &self,
        ctx: &Context<'_>,
    ) -> Result<FoundationInfo, FoundationError> {
        self.get_foundation_info(ctx)
    }

    pub fn query_member(
        &self,
        ctx: &Context<'_>,
        address: &Address,
    ) -> Result<Member, FoundationError> {
        self.get_member(ctx, address)?
            .ok_or_else(|| FoundationError::NotFound(format!("member {address}")))
    }

    pub fn query_members(&self, ctx: &Context<'_>) -> Result<Vec<Member>, FoundationError> {
        self.get_members(ctx)
    }

    pub fn query_proposal(
        &self,
        ctx: &Context<'_>,
        proposal_id: u64,
    ) -> Result<Proposal, FoundationError> {
        self.get_proposal(ctx, proposal_id)
    }

    pub fn query_proposals(&self, ctx: &Context<'_>) -> Result<Vec<Proposal>, FoundationError> {
        self.get_proposals(ctx)
    }

    pub fn query_vote(
        &self,
        ctx: &Context<'_>,
        proposal_id: u64,
        voter: &Address,
    ) -> Result<Vote, FoundationError> {
        self.get_vote(ctx, proposal_id, voter)?.ok_or_else(|| {
            FoundationError::NotFound(format!("vote of {voter} on proposal {proposal_id}"))
        })
    }

    pub fn query_votes(
        &self,
        ctx: &Context<'_>,
        proposal_id: u64,
    ) -> Result<Vec<Vote>, FoundationError> {
        self.get_votes(ctx, proposal_id)
    }

    /// Live tally of an open proposal, or the final tally of a closed one.
    pub fn query_tally_result(
        &self,
        ctx: &Context<'_>,
        proposal_id: u64,
    ) -> Result<TallyResult, FoundationError> {
        let proposal = self.get_proposal(ctx, proposal_id)?;
        self.tally(ctx, &proposal)
    }

    pub fn query_censorships(&self, ctx: &Context<'_>) -> Result<Vec<Censorship>, FoundationError> {
        self.get_censorships(ctx)
    }

    pub fn query_grants(
        &self,
        ctx: &Context<'_>,
        grantee: &Address,
        msg_type_url: Option<&str>,
    ) -> Result<Vec<GrantAuthorization>, FoundationError> {
        self.get_grants(ctx, grantee, msg_type_url)
    }
}
