use foundation_types::{Address, Dec};

use super::{keys, load, load_prefix, save, Keeper};
use crate::context::Context;
use crate::member::{FoundationInfo, Member, MemberRequest};
use crate::policy::DecisionPolicy;
use crate::proposal::{ExecutorResult, ProposalStatus};
use crate::FoundationError;

impl Keeper {
    /// The foundation record. Absence means genesis never ran, which is
    /// fatal.
    pub fn get_foundation_info(&self, ctx: &Context<'_>) -> Result<FoundationInfo, FoundationError> {
        match load(ctx, keys::FOUNDATION_INFO_KEY)? {
            Some(info) => Ok(info),
            None => panic!("foundation info missing from store; genesis was not initialised"),
        }
    }

    pub(crate) fn set_foundation_info(
        &self,
        ctx: &mut Context<'_>,
        info: &FoundationInfo,
    ) -> Result<(), FoundationError> {
        save(ctx, keys::FOUNDATION_INFO_KEY, info)
    }

    pub fn get_member(
        &self,
        ctx: &Context<'_>,
        address: &Address,
    ) -> Result<Option<Member>, FoundationError> {
        load(ctx, &keys::member_key(address))
    }

    pub fn is_member(&self, ctx: &Context<'_>, address: &Address) -> bool {
        ctx.store().has(&keys::member_key(address))
    }

    pub fn get_members(&self, ctx: &Context<'_>) -> Result<Vec<Member>, FoundationError> {
        load_prefix(ctx, keys::MEMBER_PREFIX)
    }

    pub(crate) fn set_member(
        &self,
        ctx: &mut Context<'_>,
        member: &Member,
    ) -> Result<(), FoundationError> {
        save(ctx, &keys::member_key(&member.address), member)
    }

    /// Fail with `NotAMember` for the first address that is not a member.
    pub(crate) fn validate_members(
        &self,
        ctx: &Context<'_>,
        addresses: &[Address],
    ) -> Result<(), FoundationError> {
        match addresses.iter().find(|a| !self.is_member(ctx, a)) {
            Some(address) => Err(FoundationError::NotAMember(address.clone())),
            None => Ok(()),
        }
    }

    /// Add, update or remove members, then start a new foundation version.
    pub fn update_members(
        &self,
        ctx: &mut Context<'_>,
        requests: &[MemberRequest],
    ) -> Result<(), FoundationError> {
        let mut info = self.get_foundation_info(ctx)?;
        let mut weight = info.total_weight;
        let now = ctx.block_time();

        for request in requests {
            let existing = self.get_member(ctx, &request.address)?;
            if request.remove {
                if existing.is_none() {
                    return Err(FoundationError::NotFound(format!(
                        "member {}",
                        request.address
                    )));
                }
                ctx.store_mut().delete(&keys::member_key(&request.address));
                weight = weight.saturating_sub(Dec::ONE);
                continue;
            }

            let added_at = match &existing {
                Some(member) => member.added_at,
                None => {
                    weight = weight
                        .checked_add(Dec::ONE)
                        .ok_or_else(|| FoundationError::invalid("total weight overflow"))?;
                    now
                }
            };
            self.set_member(
                ctx,
                &Member {
                    address: request.address.clone(),
                    metadata: request.metadata.clone(),
                    added_at,
                },
            )?;
        }

        info.total_weight = weight;
        self.start_new_version(ctx, info)?;
        tracing::info!(updates = requests.len(), total_weight = %weight, "members updated");
        Ok(())
    }

    /// Remove `address` from the foundation on its own request.
    pub fn leave_foundation(
        &self,
        ctx: &mut Context<'_>,
        address: &Address,
    ) -> Result<(), FoundationError> {
        self.validate_members(ctx, std::slice::from_ref(address))?;
        let mut info = self.get_foundation_info(ctx)?;
        ctx.store_mut().delete(&keys::member_key(address));
        info.total_weight = info.total_weight.saturating_sub(Dec::ONE);
        self.start_new_version(ctx, info)?;
        tracing::info!(%address, "member left the foundation");
        Ok(())
    }

    pub fn update_decision_policy(
        &self,
        ctx: &mut Context<'_>,
        policy: DecisionPolicy,
    ) -> Result<(), FoundationError> {
        let mut info = self.get_foundation_info(ctx)?;
        policy.validate(&info, &self.config)?;
        info.decision_policy = policy;
        self.start_new_version(ctx, info)?;
        tracing::info!("decision policy updated");
        Ok(())
    }

    /// Bump the version, store `info` and abort every proposal that was
    /// submitted under an older version.
    fn start_new_version(
        &self,
        ctx: &mut Context<'_>,
        mut info: FoundationInfo,
    ) -> Result<(), FoundationError> {
        info.bump_version();
        self.set_foundation_info(ctx, &info)?;
        self.abort_old_proposals(ctx, info.version)
    }

    fn abort_old_proposals(
        &self,
        ctx: &mut Context<'_>,
        latest_version: u64,
    ) -> Result<(), FoundationError> {
        for mut proposal in self.get_proposals(ctx)? {
            if proposal.foundation_version == latest_version {
                continue;
            }
            let abortable = match proposal.status {
                ProposalStatus::Submitted => true,
                ProposalStatus::Accepted => proposal.executor_result != ExecutorResult::Success,
                _ => false,
            };
            if !abortable {
                continue;
            }
            self.prune_votes(ctx, proposal.id);
            proposal.status = ProposalStatus::Aborted;
            self.set_proposal(ctx, &proposal)?;
            tracing::info!(
                proposal_id = proposal.id,
                proposal_version = proposal.foundation_version,
                latest_version,
                "proposal aborted"
            );
        }
        Ok(())
    }
}
