use foundation_types::Timestamp;

use super::Keeper;
use crate::context::Context;
use crate::proposal::ProposalStatus;
use crate::FoundationError;

impl Keeper {
    /// Start-of-block hook: move the foundation tax into the treasury.
    pub fn begin_block(&self, ctx: &mut Context<'_>) -> Result<(), FoundationError> {
        self.collect_foundation_tax(ctx)
    }

    /// End-of-block hook: drop withdrawn and aborted proposals, close the
    /// voting of proposals whose voting period is over, and expire
    /// proposals past their execution deadline.
    pub fn end_block(&self, ctx: &mut Context<'_>) -> Result<(), FoundationError> {
        self.prune_inactive_proposals(ctx)?;
        self.update_tally_of_vp_end_proposals(ctx)?;
        self.prune_expired_proposals(ctx)
    }

    fn prune_inactive_proposals(&self, ctx: &mut Context<'_>) -> Result<(), FoundationError> {
        for proposal in self.get_proposals(ctx)? {
            if matches!(
                proposal.status,
                ProposalStatus::Withdrawn | ProposalStatus::Aborted
            ) {
                self.prune_proposal(ctx, &proposal);
            }
        }
        Ok(())
    }

    fn update_tally_of_vp_end_proposals(&self, ctx: &mut Context<'_>) -> Result<(), FoundationError> {
        let now = ctx.block_time();
        for id in self.proposals_by_vp_end(ctx, now) {
            let mut proposal = self.get_proposal(ctx, id)?;
            if proposal.status != ProposalStatus::Submitted {
                continue;
            }
            self.tally_after_voting_period(ctx, &mut proposal)?;
            self.set_proposal(ctx, &proposal)?;
        }
        Ok(())
    }

    fn prune_expired_proposals(&self, ctx: &mut Context<'_>) -> Result<(), FoundationError> {
        let now = ctx.block_time();
        let Some(deadline) = now
            .as_secs()
            .checked_sub(self.config.max_execution_period_secs)
        else {
            return Ok(());
        };
        let deadline = Timestamp::new(deadline);
        for id in self.proposals_by_vp_end(ctx, deadline) {
            let proposal = self.get_proposal(ctx, id)?;
            tracing::info!(proposal_id = id, status = ?proposal.status, "proposal expired");
            self.prune_proposal(ctx, &proposal);
        }
        Ok(())
    }
}
