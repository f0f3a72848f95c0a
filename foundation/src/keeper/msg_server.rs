//! Handlers for the module's own messages.
//!
//! The host has verified signatures before a message reaches us; handlers
//! check that the signer is entitled to the operation, delegate to the
//! keeper and emit one event per successful message.

use foundation_store::encode;
use foundation_types::Address;

use super::Keeper;
use crate::context::Context;
use crate::event::Event;
use crate::msgs::{
    Exec, FoundationMsg, Msg, MsgExec, MsgGrant, MsgResponse, MsgRevoke, MsgSubmitProposal,
    MsgUpdateCensorship, MsgVote, MsgWithdrawFromTreasury, MsgWithdrawProposal,
};
use crate::proposal::Vote;
use crate::tally::VoteOption;
use crate::FoundationError;

impl Keeper {
    pub(crate) fn handle(
        &self,
        ctx: &mut Context<'_>,
        msg: FoundationMsg,
    ) -> Result<MsgResponse, FoundationError> {
        match msg {
            FoundationMsg::UpdateParams(msg) => {
                self.ensure_signer(&msg.authority, &self.governance, "governance authority")?;
                self.update_params(ctx, msg.params.clone())?;
                ctx.emit(Event::UpdatedParams { params: msg.params });
            }
            FoundationMsg::FundTreasury(msg) => {
                self.fund_treasury(ctx, &msg.from, &msg.amount)?;
                ctx.emit(Event::FundedTreasury {
                    from: msg.from,
                    amount: msg.amount,
                });
            }
            FoundationMsg::WithdrawFromTreasury(msg) => {
                self.handle_withdraw_from_treasury(ctx, msg)?
            }
            FoundationMsg::UpdateMembers(msg) => {
                self.ensure_signer(&msg.authority, &self.authority, "foundation authority")?;
                self.update_members(ctx, &msg.member_updates)?;
                ctx.emit(Event::UpdatedMembers {
                    member_updates: msg.member_updates,
                });
            }
            FoundationMsg::UpdateDecisionPolicy(msg) => {
                self.ensure_signer(&msg.authority, &self.authority, "foundation authority")?;
                self.update_decision_policy(ctx, msg.decision_policy.clone())?;
                ctx.emit(Event::UpdatedDecisionPolicy {
                    decision_policy: msg.decision_policy,
                });
            }
            FoundationMsg::SubmitProposal(msg) => return self.handle_submit_proposal(ctx, msg),
            FoundationMsg::WithdrawProposal(msg) => self.handle_withdraw_proposal(ctx, msg)?,
            FoundationMsg::Vote(msg) => self.handle_vote(ctx, msg)?,
            FoundationMsg::Exec(MsgExec {
                proposal_id,
                signer,
            }) => {
                self.validate_members(ctx, std::slice::from_ref(&signer))?;
                self.exec(ctx, proposal_id)?;
            }
            FoundationMsg::LeaveFoundation(msg) => {
                self.leave_foundation(ctx, &msg.address)?;
                ctx.emit(Event::LeaveFoundation {
                    address: msg.address,
                });
            }
            FoundationMsg::UpdateCensorship(msg) => self.handle_update_censorship(ctx, msg)?,
            FoundationMsg::Grant(msg) => self.handle_grant(ctx, msg)?,
            FoundationMsg::Revoke(msg) => self.handle_revoke(ctx, msg)?,
        }
        Ok(MsgResponse::default())
    }

    fn ensure_signer(
        &self,
        signer: &Address,
        expected: &Address,
        role: &str,
    ) -> Result<(), FoundationError> {
        if signer != expected {
            return Err(FoundationError::unauthorized(format!(
                "expected {role} {expected}, got {signer}"
            )));
        }
        Ok(())
    }

    fn handle_withdraw_from_treasury(
        &self,
        ctx: &mut Context<'_>,
        msg: MsgWithdrawFromTreasury,
    ) -> Result<(), FoundationError> {
        self.ensure_signer(&msg.authority, &self.authority, "foundation authority")?;
        self.accept(ctx, &msg.to, &msg.to_any()?)?;
        self.withdraw_from_treasury(ctx, &msg.to, &msg.amount)?;
        ctx.emit(Event::WithdrewFromTreasury {
            to: msg.to,
            amount: msg.amount,
        });
        Ok(())
    }

    fn handle_submit_proposal(
        &self,
        ctx: &mut Context<'_>,
        msg: MsgSubmitProposal,
    ) -> Result<MsgResponse, FoundationError> {
        let id = self.submit_proposal(ctx, &msg.proposers, &msg.metadata, msg.messages)?;
        let proposal = self.get_proposal(ctx, id)?;
        ctx.emit(Event::SubmitProposal { proposal });

        if msg.exec == Exec::Try {
            // Proposers are counted as yes votes.
            for proposer in &msg.proposers {
                self.record_vote(ctx, id, proposer, VoteOption::Yes, String::new())?;
            }
            self.exec(ctx, id)?;
        }

        Ok(MsgResponse {
            data: encode(&id)?,
        })
    }

    fn handle_withdraw_proposal(
        &self,
        ctx: &mut Context<'_>,
        msg: MsgWithdrawProposal,
    ) -> Result<(), FoundationError> {
        let proposal = self.get_proposal(ctx, msg.proposal_id)?;
        if msg.address != self.authority && !proposal.is_proposer(&msg.address) {
            return Err(FoundationError::unauthorized(format!(
                "{} is neither a proposer of proposal {} nor the authority",
                msg.address, msg.proposal_id
            )));
        }
        self.withdraw_proposal(ctx, msg.proposal_id)?;
        ctx.emit(Event::WithdrawProposal {
            proposal_id: msg.proposal_id,
        });
        Ok(())
    }

    fn handle_vote(&self, ctx: &mut Context<'_>, msg: MsgVote) -> Result<(), FoundationError> {
        self.validate_members(ctx, std::slice::from_ref(&msg.voter))?;
        self.record_vote(ctx, msg.proposal_id, &msg.voter, msg.option, msg.metadata)?;
        if msg.exec == Exec::Try {
            self.exec(ctx, msg.proposal_id)?;
        }
        Ok(())
    }

    fn record_vote(
        &self,
        ctx: &mut Context<'_>,
        proposal_id: u64,
        voter: &Address,
        option: VoteOption,
        metadata: String,
    ) -> Result<(), FoundationError> {
        let vote = Vote {
            proposal_id,
            voter: voter.clone(),
            option,
            metadata,
            submit_time: ctx.block_time(),
        };
        self.vote(ctx, vote.clone())?;
        ctx.emit(Event::Vote { vote });
        Ok(())
    }

    fn handle_update_censorship(
        &self,
        ctx: &mut Context<'_>,
        msg: MsgUpdateCensorship,
    ) -> Result<(), FoundationError> {
        self.ensure_censorship_authority(ctx, &msg.censorship.msg_type_url, &msg.authority)?;
        self.update_censorship(ctx, msg.censorship.clone())?;
        ctx.emit(Event::UpdatedCensorship {
            censorship: msg.censorship,
        });
        Ok(())
    }

    fn handle_grant(&self, ctx: &mut Context<'_>, msg: MsgGrant) -> Result<(), FoundationError> {
        self.ensure_censorship_authority(
            ctx,
            msg.authorization.msg_type_url(),
            &msg.authority,
        )?;
        self.grant(ctx, &msg.grantee, msg.authorization.clone())?;
        ctx.emit(Event::Grant {
            grantee: msg.grantee,
            authorization: msg.authorization,
        });
        Ok(())
    }

    fn handle_revoke(&self, ctx: &mut Context<'_>, msg: MsgRevoke) -> Result<(), FoundationError> {
        self.ensure_censorship_authority(ctx, &msg.msg_type_url, &msg.authority)?;
        self.revoke(ctx, &msg.grantee, &msg.msg_type_url)?;
        ctx.emit(Event::Revoke {
            grantee: msg.grantee,
            msg_type_url: msg.msg_type_url,
        });
        Ok(())
    }
}
