use super::{keys, load, save, Keeper};
use crate::context::Context;
use crate::params::Params;
use crate::FoundationError;

impl Keeper {
    /// Current parameters. Absence means genesis never ran, which is fatal.
    pub fn get_params(&self, ctx: &Context<'_>) -> Result<Params, FoundationError> {
        match load(ctx, keys::PARAMS_KEY)? {
            Some(params) => Ok(params),
            None => panic!("foundation params missing from store; genesis was not initialised"),
        }
    }

    pub(crate) fn set_params(
        &self,
        ctx: &mut Context<'_>,
        params: &Params,
    ) -> Result<(), FoundationError> {
        save(ctx, keys::PARAMS_KEY, params)
    }

    /// Replace the parameters. The tax may only go down.
    pub fn update_params(
        &self,
        ctx: &mut Context<'_>,
        params: Params,
    ) -> Result<(), FoundationError> {
        let current = self.get_params(ctx)?;
        current.validate_transition(&params)?;
        self.set_params(ctx, &params)?;
        tracing::info!(
            foundation_tax = %params.foundation_tax,
            previous = %current.foundation_tax,
            "foundation params updated"
        );
        Ok(())
    }
}
