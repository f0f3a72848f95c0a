//! Nullable message router with a bank send handler and a staking
//! validator-creation handler.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use foundation::msgs::MsgCreateValidator;
use foundation::{
    AnyMsg, Context, FoundationConfig, FoundationError, Msg, MsgHandler, MsgResponse, MsgRouter,
};
use foundation_types::{Address, Coins};

use crate::bank::NullBank;

const VALIDATOR_PREFIX: u8 = 0xb1;

fn validator_key(address: &Address) -> Vec<u8> {
    let mut key = vec![VALIDATOR_PREFIX];
    key.extend(address.to_key_bytes());
    key
}

/// Token transfer of the bank module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSend {
    pub from_address: Address,
    pub to_address: Address,
    pub amount: Coins,
}

impl Msg for MsgSend {
    const TYPE_URL: &'static str = "/cosmos.bank.v1beta1.MsgSend";

    fn signers(&self) -> Vec<Address> {
        vec![self.from_address.clone()]
    }

    fn validate_basic(&self, _config: &FoundationConfig) -> Result<(), FoundationError> {
        if self.amount.is_zero() {
            return Err(FoundationError::InvalidRequest("empty send".to_string()));
        }
        Ok(())
    }
}

struct SendHandler {
    bank: NullBank,
}

impl MsgHandler for SendHandler {
    fn signers(&self, msg: &AnyMsg) -> Result<Vec<Address>, FoundationError> {
        Ok(MsgSend::from_any(msg)?.signers())
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &AnyMsg) -> Result<MsgResponse, FoundationError> {
        let send = MsgSend::from_any(msg)?;
        send.validate_basic(&FoundationConfig::default())?;
        self.bank
            .send(ctx, &send.from_address, &send.to_address, &send.amount)?;
        Ok(MsgResponse::default())
    }
}

struct CreateValidatorHandler;

impl MsgHandler for CreateValidatorHandler {
    fn signers(&self, msg: &AnyMsg) -> Result<Vec<Address>, FoundationError> {
        Ok(MsgCreateValidator::from_any(msg)?.signers())
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &AnyMsg) -> Result<MsgResponse, FoundationError> {
        let create = MsgCreateValidator::from_any(msg)?;
        let key = validator_key(&create.validator_address);
        if ctx.store().has(&key) {
            return Err(FoundationError::InvalidRequest(format!(
                "validator {} already exists",
                create.validator_address
            )));
        }
        ctx.store_mut().set(&key, Vec::new());
        Ok(MsgResponse::default())
    }
}

/// Whether a validator was created through the router.
pub fn has_validator(ctx: &Context<'_>, address: &Address) -> bool {
    ctx.store().has(&validator_key(address))
}

/// Routes bank sends and validator creation.
pub struct NullRouter {
    handlers: BTreeMap<&'static str, Box<dyn MsgHandler>>,
}

impl NullRouter {
    pub fn new(bank: NullBank) -> Self {
        let mut handlers: BTreeMap<&'static str, Box<dyn MsgHandler>> = BTreeMap::new();
        handlers.insert(MsgSend::TYPE_URL, Box::new(SendHandler { bank }));
        handlers.insert(MsgCreateValidator::TYPE_URL, Box::new(CreateValidatorHandler));
        Self { handlers }
    }

    /// A router that knows no message type at all.
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }
}

impl MsgRouter for NullRouter {
    fn handler(&self, type_url: &str) -> Option<&dyn MsgHandler> {
        self.handlers.get(type_url).map(|h| &**h)
    }
}
