use super::Keeper;
use crate::context::Context;
use crate::genesis::GenesisState;
use crate::FoundationError;

impl Keeper {
    /// Load a validated genesis state into an empty store.
    pub fn init_genesis(
        &self,
        ctx: &mut Context<'_>,
        genesis: &GenesisState,
    ) -> Result<(), FoundationError> {
        genesis.validate()?;

        self.set_params(ctx, &genesis.params)?;
        self.set_foundation_info(ctx, &genesis.foundation)?;
        for member in &genesis.members {
            self.set_member(ctx, member)?;
        }

        self.set_previous_proposal_id(ctx, genesis.previous_proposal_id)?;
        for proposal in &genesis.proposals {
            self.set_proposal(ctx, proposal)?;
            self.add_to_vp_end_queue(ctx, proposal);
        }
        for vote in &genesis.votes {
            self.set_vote(ctx, vote)?;
        }

        for censorship in &genesis.censorships {
            self.set_censorship(ctx, censorship)?;
        }
        for grant in &genesis.authorizations {
            self.set_grant(ctx, &grant.grantee, grant.authorization.clone())?;
        }

        self.set_pool(ctx, &genesis.pool)?;
        tracing::info!(
            members = genesis.members.len(),
            proposals = genesis.proposals.len(),
            version = genesis.foundation.version,
            "foundation genesis initialised"
        );
        Ok(())
    }

    pub fn export_genesis(&self, ctx: &Context<'_>) -> Result<GenesisState, FoundationError> {
        let proposals = self.get_proposals(ctx)?;
        let mut votes = Vec::new();
        for proposal in &proposals {
            votes.extend(self.get_votes(ctx, proposal.id)?);
        }
        Ok(GenesisState {
            params: self.get_params(ctx)?,
            foundation: self.get_foundation_info(ctx)?,
            members: self.get_members(ctx)?,
            previous_proposal_id: self.get_previous_proposal_id(ctx)?,
            proposals,
            votes,
            censorships: self.get_censorships(ctx)?,
            authorizations: self.get_all_grants(ctx)?,
            pool: self.get_pool(ctx)?,
        })
    }
}
