use foundation_types::Address;

use super::{keys, load, load_prefix, save, Keeper};
use crate::authorization::{Authorization, Censorship, CensorshipAuthority, GrantAuthorization};
use crate::context::Context;
use crate::msgs::AnyMsg;
use crate::FoundationError;

impl Keeper {
    pub fn get_censorship(
        &self,
        ctx: &Context<'_>,
        msg_type_url: &str,
    ) -> Result<Option<Censorship>, FoundationError> {
        load(ctx, &keys::censorship_key(msg_type_url))
    }

    pub fn get_censorships(&self, ctx: &Context<'_>) -> Result<Vec<Censorship>, FoundationError> {
        load_prefix(ctx, keys::CENSORSHIP_PREFIX)
    }

    pub(crate) fn set_censorship(
        &self,
        ctx: &mut Context<'_>,
        censorship: &Censorship,
    ) -> Result<(), FoundationError> {
        save(ctx, &keys::censorship_key(&censorship.msg_type_url), censorship)
    }

    pub fn is_censored_message(
        &self,
        ctx: &Context<'_>,
        msg_type_url: &str,
    ) -> Result<bool, FoundationError> {
        Ok(self
            .get_censorship(ctx, msg_type_url)?
            .is_some_and(|c| c.is_censored()))
    }

    /// Address that speaks for a censorship authority.
    pub(crate) fn censorship_authority_address(
        &self,
        authority: CensorshipAuthority,
    ) -> Option<&Address> {
        match authority {
            CensorshipAuthority::Unspecified => None,
            CensorshipAuthority::Foundation => Some(&self.authority),
            CensorshipAuthority::Governance => Some(&self.governance),
        }
    }

    /// Fail unless `signer` speaks for the current censorship authority of
    /// `msg_type_url`.
    pub(crate) fn ensure_censorship_authority(
        &self,
        ctx: &Context<'_>,
        msg_type_url: &str,
        signer: &Address,
    ) -> Result<Censorship, FoundationError> {
        let censorship = self
            .get_censorship(ctx, msg_type_url)?
            .filter(Censorship::is_censored)
            .ok_or_else(|| FoundationError::NotFound(format!("censorship of {msg_type_url}")))?;
        if self.censorship_authority_address(censorship.authority) != Some(signer) {
            return Err(FoundationError::unauthorized(format!(
                "{signer} is not the {:?} censorship authority of {msg_type_url}",
                censorship.authority
            )));
        }
        Ok(censorship)
    }

    /// Change the censorship authority of a message type. The authority can
    /// only get weaker; removing the censorship drops every grant for the
    /// type.
    pub fn update_censorship(
        &self,
        ctx: &mut Context<'_>,
        censorship: Censorship,
    ) -> Result<(), FoundationError> {
        let url = censorship.msg_type_url.clone();
        let current = self
            .get_censorship(ctx, &url)?
            .filter(Censorship::is_censored)
            .ok_or_else(|| FoundationError::NotFound(format!("censorship of {url}")))?;
        if censorship.authority > current.authority {
            return Err(FoundationError::invalid(format!(
                "cannot raise censorship authority of {url} from {:?} to {:?}",
                current.authority, censorship.authority
            )));
        }

        if censorship.is_censored() {
            self.set_censorship(ctx, &censorship)?;
        } else {
            ctx.store_mut().delete(&keys::censorship_key(&url));
            let pruned = self.prune_grants_of_type(ctx, &url)?;
            tracing::info!(msg_type_url = %url, pruned, "grants pruned with censorship");
        }
        tracing::info!(
            msg_type_url = %url,
            from = ?current.authority,
            to = ?censorship.authority,
            "censorship updated"
        );
        Ok(())
    }

    fn prune_grants_of_type(
        &self,
        ctx: &mut Context<'_>,
        msg_type_url: &str,
    ) -> Result<usize, FoundationError> {
        let stale: Vec<GrantAuthorization> = self
            .get_all_grants(ctx)?
            .into_iter()
            .filter(|g| g.authorization.msg_type_url() == msg_type_url)
            .collect();
        for grant in &stale {
            ctx.store_mut()
                .delete(&keys::grant_key(&grant.grantee, msg_type_url));
        }
        Ok(stale.len())
    }

    pub fn get_authorization(
        &self,
        ctx: &Context<'_>,
        grantee: &Address,
        msg_type_url: &str,
    ) -> Result<Option<Authorization>, FoundationError> {
        Ok(load::<GrantAuthorization>(ctx, &keys::grant_key(grantee, msg_type_url))?
            .map(|g| g.authorization))
    }

    /// Grants of `grantee`, optionally restricted to one message type.
    pub fn get_grants(
        &self,
        ctx: &Context<'_>,
        grantee: &Address,
        msg_type_url: Option<&str>,
    ) -> Result<Vec<GrantAuthorization>, FoundationError> {
        match msg_type_url {
            Some(url) => Ok(self
                .get_authorization(ctx, grantee, url)?
                .map(|authorization| GrantAuthorization {
                    grantee: grantee.clone(),
                    authorization,
                })
                .into_iter()
                .collect()),
            None => load_prefix(ctx, &keys::grants_prefix(grantee)),
        }
    }

    pub fn get_all_grants(
        &self,
        ctx: &Context<'_>,
    ) -> Result<Vec<GrantAuthorization>, FoundationError> {
        load_prefix(ctx, keys::GRANT_PREFIX)
    }

    pub(crate) fn set_grant(
        &self,
        ctx: &mut Context<'_>,
        grantee: &Address,
        authorization: Authorization,
    ) -> Result<(), FoundationError> {
        let key = keys::grant_key(grantee, authorization.msg_type_url());
        save(
            ctx,
            &key,
            &GrantAuthorization {
                grantee: grantee.clone(),
                authorization,
            },
        )
    }

    /// Store a new grant. The message type must be censored and the grantee
    /// must not hold a grant for it already.
    pub fn grant(
        &self,
        ctx: &mut Context<'_>,
        grantee: &Address,
        authorization: Authorization,
    ) -> Result<(), FoundationError> {
        let url = authorization.msg_type_url();
        if !self.is_censored_message(ctx, url)? {
            return Err(FoundationError::invalid(format!("{url} is not censored")));
        }
        if self.get_authorization(ctx, grantee, url)?.is_some() {
            return Err(FoundationError::invalid(format!(
                "{grantee} already holds an authorization for {url}"
            )));
        }
        self.set_grant(ctx, grantee, authorization)?;
        tracing::info!(%grantee, msg_type_url = url, "authorization granted");
        Ok(())
    }

    pub fn revoke(
        &self,
        ctx: &mut Context<'_>,
        grantee: &Address,
        msg_type_url: &str,
    ) -> Result<(), FoundationError> {
        if self.get_authorization(ctx, grantee, msg_type_url)?.is_none() {
            return Err(FoundationError::NotFound(format!(
                "authorization of {grantee} for {msg_type_url}"
            )));
        }
        ctx.store_mut()
            .delete(&keys::grant_key(grantee, msg_type_url));
        tracing::info!(%grantee, msg_type_url, "authorization revoked");
        Ok(())
    }

    /// Admit `msg` from `grantee`. Uncensored message types pass freely;
    /// censored ones need a grant whose authorization accepts the message.
    pub fn accept(
        &self,
        ctx: &mut Context<'_>,
        grantee: &Address,
        msg: &AnyMsg,
    ) -> Result<(), FoundationError> {
        if !self.is_censored_message(ctx, &msg.type_url)? {
            return Ok(());
        }
        let authorization = self
            .get_authorization(ctx, grantee, &msg.type_url)?
            .ok_or_else(|| {
                FoundationError::unauthorized(format!(
                    "{grantee} holds no authorization for {}",
                    msg.type_url
                ))
            })?;

        let response = authorization.accept(msg)?;
        if response.delete {
            ctx.store_mut()
                .delete(&keys::grant_key(grantee, &msg.type_url));
        } else if let Some(updated) = response.updated {
            self.set_grant(ctx, grantee, updated)?;
        }

        if !response.accept {
            return Err(FoundationError::unauthorized(format!(
                "authorization of {grantee} does not accept this {}",
                msg.type_url
            )));
        }
        Ok(())
    }
}
