use std::collections::BTreeSet;

use foundation_types::{Address, Timestamp};

use super::{keys, load, load_prefix, save, Keeper};
use crate::context::Context;
use crate::msgs::{AnyMsg, FoundationMsg};
use crate::proposal::{ExecutorResult, Proposal, ProposalStatus, Vote};
use crate::tally::TallyResult;
use crate::FoundationError;

impl Keeper {
    /// Create a proposal and return its id.
    pub fn submit_proposal(
        &self,
        ctx: &mut Context<'_>,
        proposers: &[Address],
        metadata: &str,
        messages: Vec<AnyMsg>,
    ) -> Result<u64, FoundationError> {
        if proposers.is_empty() {
            return Err(FoundationError::invalid("empty proposers"));
        }
        let unique: BTreeSet<_> = proposers.iter().collect();
        if unique.len() != proposers.len() {
            return Err(FoundationError::invalid("duplicate proposers"));
        }
        self.validate_members(ctx, proposers)?;
        self.config.validate_metadata(metadata)?;
        if messages.is_empty() {
            return Err(FoundationError::invalid("no messages"));
        }
        for msg in &messages {
            self.validate_proposal_msg(msg)?;
        }

        let info = self.get_foundation_info(ctx)?;
        info.decision_policy.validate(&info, &self.config)?;

        let id = self.next_proposal_id(ctx)?;
        let now = ctx.block_time();
        let proposal = Proposal {
            id,
            metadata: metadata.to_string(),
            proposers: proposers.to_vec(),
            submit_time: now,
            foundation_version: info.version,
            status: ProposalStatus::Submitted,
            final_tally_result: TallyResult::default(),
            voting_period_end: now.saturating_add_secs(info.decision_policy.voting_period_secs()),
            executor_result: ExecutorResult::NotRun,
            messages,
        };
        self.set_proposal(ctx, &proposal)?;
        self.add_to_vp_end_queue(ctx, &proposal);

        tracing::info!(
            proposal_id = id,
            version = info.version,
            voting_period_end = %proposal.voting_period_end,
            "proposal submitted"
        );
        Ok(id)
    }

    /// A proposal message must be routable, well formed and signed by the
    /// foundation authority alone.
    fn validate_proposal_msg(&self, msg: &AnyMsg) -> Result<(), FoundationError> {
        if let Some(decoded) = FoundationMsg::from_any(msg) {
            decoded?.validate_basic(&self.config)?;
        }
        self.ensure_authority_signed(msg)
    }

    pub(crate) fn ensure_authority_signed(&self, msg: &AnyMsg) -> Result<(), FoundationError> {
        let signers = self.msg_signers(msg)?;
        if signers.as_slice() != std::slice::from_ref(&self.authority) {
            return Err(FoundationError::unauthorized(format!(
                "{} must be signed by the foundation authority {} only",
                msg.type_url, self.authority
            )));
        }
        Ok(())
    }

    /// Withdraw a proposal that is still open.
    pub fn withdraw_proposal(
        &self,
        ctx: &mut Context<'_>,
        proposal_id: u64,
    ) -> Result<(), FoundationError> {
        let mut proposal = self.get_proposal(ctx, proposal_id)?;
        if proposal.status != ProposalStatus::Submitted {
            return Err(FoundationError::invalid(format!(
                "cannot withdraw a proposal with status {:?}",
                proposal.status
            )));
        }
        proposal.status = ProposalStatus::Withdrawn;
        self.set_proposal(ctx, &proposal)?;
        tracing::info!(proposal_id, "proposal withdrawn");
        Ok(())
    }

    /// Record a vote. The proposal status is left untouched.
    pub fn vote(&self, ctx: &mut Context<'_>, mut vote: Vote) -> Result<(), FoundationError> {
        let key = keys::vote_key(vote.proposal_id, &vote.voter);
        if ctx.store().has(&key) {
            return Err(FoundationError::invalid(format!(
                "{} already voted on proposal {}",
                vote.voter, vote.proposal_id
            )));
        }

        let proposal = self.get_proposal(ctx, vote.proposal_id)?;
        if proposal.status != ProposalStatus::Submitted {
            return Err(FoundationError::invalid(format!(
                "cannot vote on a proposal with status {:?}",
                proposal.status
            )));
        }
        let now = ctx.block_time();
        if now >= proposal.voting_period_end {
            return Err(FoundationError::invalid(format!(
                "voting period ended at {}",
                proposal.voting_period_end
            )));
        }
        self.config.validate_metadata(&vote.metadata)?;

        vote.submit_time = now;
        save(ctx, &key, &vote)?;
        tracing::debug!(
            proposal_id = vote.proposal_id,
            voter = %vote.voter,
            option = ?vote.option,
            "vote recorded"
        );
        Ok(())
    }

    pub fn get_proposal(&self, ctx: &Context<'_>, id: u64) -> Result<Proposal, FoundationError> {
        load(ctx, &keys::proposal_key(id))?
            .ok_or_else(|| FoundationError::NotFound(format!("proposal {id}")))
    }

    pub fn get_proposals(&self, ctx: &Context<'_>) -> Result<Vec<Proposal>, FoundationError> {
        load_prefix(ctx, keys::PROPOSAL_PREFIX)
    }

    pub(crate) fn set_proposal(
        &self,
        ctx: &mut Context<'_>,
        proposal: &Proposal,
    ) -> Result<(), FoundationError> {
        save(ctx, &keys::proposal_key(proposal.id), proposal)
    }

    pub fn get_vote(
        &self,
        ctx: &Context<'_>,
        proposal_id: u64,
        voter: &Address,
    ) -> Result<Option<Vote>, FoundationError> {
        load(ctx, &keys::vote_key(proposal_id, voter))
    }

    pub fn get_votes(
        &self,
        ctx: &Context<'_>,
        proposal_id: u64,
    ) -> Result<Vec<Vote>, FoundationError> {
        load_prefix(ctx, &keys::votes_prefix(proposal_id))
    }

    pub(crate) fn set_vote(&self, ctx: &mut Context<'_>, vote: &Vote) -> Result<(), FoundationError> {
        save(ctx, &keys::vote_key(vote.proposal_id, &vote.voter), vote)
    }

    pub(crate) fn prune_votes(&self, ctx: &mut Context<'_>, proposal_id: u64) {
        let stale: Vec<_> = ctx
            .store()
            .prefix_scan(&keys::votes_prefix(proposal_id))
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        for key in stale {
            ctx.store_mut().delete(&key);
        }
    }

    /// Delete a proposal together with its votes and index entry.
    pub(crate) fn prune_proposal(&self, ctx: &mut Context<'_>, proposal: &Proposal) {
        self.prune_votes(ctx, proposal.id);
        ctx.store_mut().delete(&keys::proposal_key(proposal.id));
        ctx.store_mut()
            .delete(&keys::proposal_by_vp_end_key(proposal.voting_period_end, proposal.id));
        tracing::debug!(proposal_id = proposal.id, status = ?proposal.status, "proposal pruned");
    }

    pub(crate) fn add_to_vp_end_queue(&self, ctx: &mut Context<'_>, proposal: &Proposal) {
        ctx.store_mut().set(
            &keys::proposal_by_vp_end_key(proposal.voting_period_end, proposal.id),
            Vec::new(),
        );
    }

    /// Ids of the proposals whose voting period ends at or before `end`,
    /// earliest first.
    pub(crate) fn proposals_by_vp_end(&self, ctx: &Context<'_>, end: Timestamp) -> Vec<u64> {
        let bound = keys::proposal_by_vp_end_bound(end);
        ctx.store()
            .range(keys::PROPOSAL_BY_VP_END_PREFIX, Some(bound.as_slice()))
            .into_iter()
            .filter_map(|(key, _)| keys::split_proposal_by_vp_end_key(&key))
            .collect()
    }

    pub fn get_previous_proposal_id(&self, ctx: &Context<'_>) -> Result<u64, FoundationError> {
        Ok(load(ctx, keys::PREVIOUS_PROPOSAL_ID_KEY)?.unwrap_or(0))
    }

    pub(crate) fn set_previous_proposal_id(
        &self,
        ctx: &mut Context<'_>,
        id: u64,
    ) -> Result<(), FoundationError> {
        save(ctx, keys::PREVIOUS_PROPOSAL_ID_KEY, &id)
    }

    fn next_proposal_id(&self, ctx: &mut Context<'_>) -> Result<u64, FoundationError> {
        let id = self
            .get_previous_proposal_id(ctx)?
            .checked_add(1)
            .ok_or_else(|| FoundationError::invalid("proposal id overflow"))?;
        self.set_previous_proposal_id(ctx, id)?;
        Ok(id)
    }
}
