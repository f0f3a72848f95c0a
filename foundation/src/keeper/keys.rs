//! Store layout.
//!
//! Every record family lives under its own one-byte prefix. Addresses are
//! embedded length-prefixed so that one grantee's keys never prefix
//! another's; integers and timestamps are big-endian so that byte order is
//! numeric order.

use foundation_types::{Address, Timestamp};

pub(crate) const PARAMS_KEY: &[u8] = &[0x00];
pub(crate) const FOUNDATION_INFO_KEY: &[u8] = &[0x01];
pub(crate) const TREASURY_KEY: &[u8] = &[0x02];

pub(crate) const MEMBER_PREFIX: &[u8] = &[0x10];

pub(crate) const PREVIOUS_PROPOSAL_ID_KEY: &[u8] = &[0x20];
pub(crate) const PROPOSAL_PREFIX: &[u8] = &[0x21];
pub(crate) const PROPOSAL_BY_VP_END_PREFIX: &[u8] = &[0x22];
pub(crate) const VOTE_PREFIX: &[u8] = &[0x23];

pub(crate) const CENSORSHIP_PREFIX: &[u8] = &[0x30];
pub(crate) const GRANT_PREFIX: &[u8] = &[0x31];

fn concat(parts: &[&[u8]]) -> Vec<u8> {
    parts.concat()
}

pub(crate) fn member_key(address: &Address) -> Vec<u8> {
    concat(&[MEMBER_PREFIX, &address.to_key_bytes()])
}

pub(crate) fn proposal_key(id: u64) -> Vec<u8> {
    concat(&[PROPOSAL_PREFIX, &id.to_be_bytes()])
}

pub(crate) fn proposal_by_vp_end_key(end: Timestamp, id: u64) -> Vec<u8> {
    concat(&[PROPOSAL_BY_VP_END_PREFIX, &end.to_be_bytes(), &id.to_be_bytes()])
}

/// Upper bound (exclusive) of index entries with a voting period end at or
/// before `end`.
pub(crate) fn proposal_by_vp_end_bound(end: Timestamp) -> Vec<u8> {
    match end.as_secs().checked_add(1) {
        Some(next) => concat(&[PROPOSAL_BY_VP_END_PREFIX, &next.to_be_bytes()]),
        None => vec![PROPOSAL_BY_VP_END_PREFIX[0] + 1],
    }
}

/// Proposal id of a voting-period-end index key.
pub(crate) fn split_proposal_by_vp_end_key(key: &[u8]) -> Option<u64> {
    let id: [u8; 8] = key.get(1 + 8..1 + 16)?.try_into().ok()?;
    Some(u64::from_be_bytes(id))
}

pub(crate) fn votes_prefix(proposal_id: u64) -> Vec<u8> {
    concat(&[VOTE_PREFIX, &proposal_id.to_be_bytes()])
}

pub(crate) fn vote_key(proposal_id: u64, voter: &Address) -> Vec<u8> {
    concat(&[&votes_prefix(proposal_id), &voter.to_key_bytes()])
}

pub(crate) fn censorship_key(msg_type_url: &str) -> Vec<u8> {
    concat(&[CENSORSHIP_PREFIX, msg_type_url.as_bytes()])
}

pub(crate) fn grants_prefix(grantee: &Address) -> Vec<u8> {
    concat(&[GRANT_PREFIX, &grantee.to_key_bytes()])
}

pub(crate) fn grant_key(grantee: &Address, msg_type_url: &str) -> Vec<u8> {
    concat(&[&grants_prefix(grantee), msg_type_url.as_bytes()])
}
