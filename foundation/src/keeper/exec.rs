use super::Keeper;
use crate::context::Context;
use crate::event::Event;
use crate::proposal::{ExecutorResult, Proposal, ProposalStatus};
use crate::FoundationError;

impl Keeper {
    /// Execute the messages of a proposal.
    ///
    /// An open proposal is tallied first. The messages of an accepted
    /// proposal run in a branch of `ctx`: on success the branch is committed
    /// and the proposal pruned; on failure the branch is dropped and the
    /// failure recorded on the proposal, which stays for a later retry. A
    /// failing message does not fail the call itself. A proposal past its
    /// execution deadline is refused.
    pub fn exec(&self, ctx: &mut Context<'_>, proposal_id: u64) -> Result<(), FoundationError> {
        let mut proposal = self.get_proposal(ctx, proposal_id)?;
        if !matches!(
            proposal.status,
            ProposalStatus::Submitted | ProposalStatus::Accepted
        ) {
            return Err(FoundationError::invalid(format!(
                "cannot execute a proposal with status {:?}",
                proposal.status
            )));
        }
        let expiry = proposal
            .voting_period_end
            .saturating_add_secs(self.config.max_execution_period_secs);
        if expiry < ctx.block_time() {
            return Err(FoundationError::invalid(format!(
                "proposal {proposal_id} expired at {expiry}"
            )));
        }

        if proposal.status == ProposalStatus::Submitted {
            self.do_tally_and_update(ctx, &mut proposal)?;
        } else {
            self.ensure_execution_window(ctx, &proposal)?;
        }

        let mut logs = String::new();
        if proposal.status == ProposalStatus::Accepted
            && proposal.executor_result != ExecutorResult::Success
        {
            let outcome = ctx.branch(|sub| self.execute_msgs(sub, &proposal));
            match outcome {
                Ok(()) => {
                    proposal.executor_result = ExecutorResult::Success;
                    tracing::info!(proposal_id, "proposal executed");
                }
                Err(e) => {
                    proposal.executor_result = ExecutorResult::Failure;
                    logs = format!("proposal execution failed on proposal {proposal_id}: {e}");
                    tracing::warn!(proposal_id, error = %e, "proposal execution failed");
                }
            }
        }

        if proposal.executor_result == ExecutorResult::Success {
            self.prune_proposal(ctx, &proposal);
        } else {
            self.set_proposal(ctx, &proposal)?;
        }

        ctx.emit(Event::Exec {
            proposal_id,
            result: proposal.executor_result,
            logs,
        });
        Ok(())
    }

    /// An accepted proposal may not run before its minimum execution period
    /// has elapsed.
    fn ensure_execution_window(
        &self,
        ctx: &Context<'_>,
        proposal: &Proposal,
    ) -> Result<(), FoundationError> {
        let info = self.get_foundation_info(ctx)?;
        let min_execution = info.decision_policy.windows().min_execution_period_secs;
        let since_submission = proposal.submit_time.elapsed_since(ctx.block_time());
        if since_submission < min_execution {
            return Err(FoundationError::unauthorized(format!(
                "proposal {} may not execute before {}",
                proposal.id,
                proposal.submit_time.saturating_add_secs(min_execution)
            )));
        }
        Ok(())
    }

    fn execute_msgs(&self, ctx: &mut Context<'_>, proposal: &Proposal) -> Result<(), FoundationError> {
        for (index, msg) in proposal.messages.iter().enumerate() {
            self.ensure_authority_signed(msg)
                .and_then(|()| self.dispatch(ctx, msg))
                .map_err(|e| {
                    FoundationError::invalid(format!(
                        "message {} at position {index}: {e}",
                        msg.type_url
                    ))
                })?;
        }
        Ok(())
    }
}
