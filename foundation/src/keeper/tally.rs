use super::Keeper;
use crate::context::Context;
use crate::policy::DecisionPolicyResult;
use crate::proposal::{Proposal, ProposalStatus};
use crate::tally::TallyResult;
use crate::FoundationError;

impl Keeper {
    /// Count the votes of a proposal. Votes of addresses that are no longer
    /// members are skipped. A proposal that is no longer open reports its
    /// final tally.
    pub(crate) fn tally(
        &self,
        ctx: &Context<'_>,
        proposal: &Proposal,
    ) -> Result<TallyResult, FoundationError> {
        if proposal.status != ProposalStatus::Submitted {
            return Ok(proposal.final_tally_result.clone());
        }
        let mut tally = TallyResult::default();
        for vote in self.get_votes(ctx, proposal.id)? {
            if !self.is_member(ctx, &vote.voter) {
                continue;
            }
            tally.add(vote.option)?;
        }
        Ok(tally)
    }

    /// Tally an open proposal under the execution-window gate and finalise
    /// it if the outcome is settled or the voting period is over.
    pub(crate) fn do_tally_and_update(
        &self,
        ctx: &mut Context<'_>,
        proposal: &mut Proposal,
    ) -> Result<(), FoundationError> {
        let info = self.get_foundation_info(ctx)?;
        let tally = self.tally(ctx, proposal)?;
        let now = ctx.block_time();
        let since_submission = proposal.submit_time.elapsed_since(now);
        let result = info
            .decision_policy
            .allow(&tally, info.total_weight, since_submission)?;

        if result.is_final || now >= proposal.voting_period_end {
            self.finalize(ctx, proposal, tally, result);
        }
        Ok(())
    }

    /// Close the voting of a proposal whose voting period is over, without
    /// the execution-window gate.
    pub(crate) fn tally_after_voting_period(
        &self,
        ctx: &mut Context<'_>,
        proposal: &mut Proposal,
    ) -> Result<(), FoundationError> {
        let info = self.get_foundation_info(ctx)?;
        let tally = self.tally(ctx, proposal)?;
        let result = info.decision_policy.evaluate(&tally, info.total_weight)?;
        self.finalize(ctx, proposal, tally, result);
        Ok(())
    }

    fn finalize(
        &self,
        ctx: &mut Context<'_>,
        proposal: &mut Proposal,
        tally: TallyResult,
        result: DecisionPolicyResult,
    ) {
        self.prune_votes(ctx, proposal.id);
        proposal.final_tally_result = tally;
        proposal.status = if result.allow {
            ProposalStatus::Accepted
        } else {
            ProposalStatus::Rejected
        };
        tracing::info!(
            proposal_id = proposal.id,
            status = ?proposal.status,
            yes = %proposal.final_tally_result.yes_count,
            "proposal finalised"
        );
    }
}
