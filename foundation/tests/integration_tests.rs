//! Integration tests driving the keeper through a complete in-memory host:
//! messages in, block hooks, state and events out.

use foundation::msgs::{
    MsgCreateValidator, MsgExec, MsgFundTreasury, MsgGrant, MsgLeaveFoundation, MsgSubmitProposal,
    MsgUpdateCensorship, MsgUpdateDecisionPolicy, MsgUpdateMembers, MsgUpdateParams, MsgVote,
    MsgWithdrawFromTreasury, MsgWithdrawProposal,
};
use foundation::{
    AnyMsg, Authorization, Censorship, CensorshipAuthority, DecisionPolicy, DecisionPolicyWindows,
    Event, Exec, ExecutorResult, FoundationConfig, FoundationError, GenesisState, MemberRequest,
    Msg, Params, Proposal, ProposalStatus, Vote, VoteOption,
};
use foundation_nullables::{genesis_with_members, has_validator, MsgSend, NullApp};
use foundation_types::{Address, Coin, Coins, Dec, Timestamp};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const DAY: u64 = 24 * 3600;

fn addr(name: &str) -> Address {
    Address::new(name)
}

fn stake(amount: u128) -> Coins {
    Coins::one("stake", amount)
}

fn app() -> NullApp {
    foundation_utils::init_test_logging();
    NullApp::with_members(&["alice", "bob", "carol"])
}

fn app_with_policy(names: &[&str], policy: DecisionPolicy) -> NullApp {
    foundation_utils::init_test_logging();
    let mut genesis = genesis_with_members(names);
    genesis.foundation.decision_policy = policy;
    NullApp::new(FoundationConfig::default(), &genesis).unwrap()
}

fn windows(voting: u64, min_exec: u64) -> DecisionPolicyWindows {
    DecisionPolicyWindows {
        voting_period_secs: voting,
        min_execution_period_secs: min_exec,
    }
}

/// A payload the authority can run once it holds funds.
fn pay_from_authority(app: &NullApp, to: &str, amount: u128) -> AnyMsg {
    MsgSend {
        from_address: app.authority(),
        to_address: addr(to),
        amount: stake(amount),
    }
    .to_any()
    .unwrap()
}

fn submit(
    app: &mut NullApp,
    proposer: &str,
    messages: Vec<AnyMsg>,
    exec: Exec,
) -> Result<u64, FoundationError> {
    let response = app.deliver(&MsgSubmitProposal {
        proposers: vec![addr(proposer)],
        metadata: String::new(),
        messages,
        exec,
    })?;
    Ok(foundation_store::decode(b"proposal id", &response.data)?)
}

fn vote(
    app: &mut NullApp,
    proposal_id: u64,
    voter: &str,
    option: VoteOption,
) -> Result<(), FoundationError> {
    app.deliver(&MsgVote {
        proposal_id,
        voter: addr(voter),
        option,
        metadata: String::new(),
        exec: Exec::Unspecified,
    })
    .map(|_| ())
}

fn exec(app: &mut NullApp, proposal_id: u64, signer: &str) -> Result<(), FoundationError> {
    app.deliver(&MsgExec {
        proposal_id,
        signer: addr(signer),
    })
    .map(|_| ())
}

fn proposal(app: &mut NullApp, id: u64) -> Result<Proposal, FoundationError> {
    app.with_ctx(|keeper, ctx| keeper.query_proposal(ctx, id))
}

fn pool(app: &mut NullApp) -> Coins {
    app.with_ctx(|keeper, ctx| keeper.query_treasury(ctx)).unwrap()
}

fn grant_receive_from_treasury(app: &mut NullApp, grantee: &str) {
    let authority = app.authority();
    app.deliver(&MsgGrant {
        authority,
        grantee: addr(grantee),
        authorization: Authorization::ReceiveFromTreasury,
    })
    .unwrap();
}

fn exec_event(app: &NullApp) -> Option<(u64, ExecutorResult, String)> {
    app.events.iter().find_map(|event| match event {
        Event::Exec {
            proposal_id,
            result,
            logs,
        } => Some((*proposal_id, *result, logs.clone())),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// 1. Proposal execution
// ---------------------------------------------------------------------------

#[test]
fn single_yes_vote_accepts_and_executes() {
    let mut app = app();
    let authority = app.authority();
    app.set_balance(&authority, &stake(100));

    let msg = pay_from_authority(&app, "dave", 10);
    let id = submit(&mut app, "alice", vec![msg], Exec::Unspecified).unwrap();
    assert_eq!(id, 1);
    assert_eq!(proposal(&mut app, id).unwrap().status, ProposalStatus::Submitted);

    vote(&mut app, id, "alice", VoteOption::Yes).unwrap();
    exec(&mut app, id, "bob").unwrap();

    assert_eq!(exec_event(&app), Some((id, ExecutorResult::Success, String::new())));
    assert!(matches!(proposal(&mut app, id), Err(FoundationError::NotFound(_))));
    assert_eq!(app.balance(&addr("dave")), stake(10));
    assert_eq!(app.balance(&authority), stake(90));
}

#[test]
fn failed_execution_rolls_back_and_can_be_retried() {
    let mut app = app();
    let authority = app.authority();
    app.set_balance(&authority, &stake(100));

    // The second message overdraws, so the first must be rolled back too.
    let messages = vec![
        pay_from_authority(&app, "dave", 10),
        pay_from_authority(&app, "erin", 1_000),
    ];
    let id = submit(&mut app, "alice", messages, Exec::Unspecified).unwrap();
    vote(&mut app, id, "alice", VoteOption::Yes).unwrap();
    exec(&mut app, id, "alice").unwrap();

    let (_, result, logs) = exec_event(&app).unwrap();
    assert_eq!(result, ExecutorResult::Failure);
    assert!(logs.contains("insufficient funds"), "logs: {logs}");
    let stored = proposal(&mut app, id).unwrap();
    assert_eq!(stored.status, ProposalStatus::Accepted);
    assert_eq!(stored.executor_result, ExecutorResult::Failure);
    assert_eq!(stored.final_tally_result.yes_count, Dec::ONE);
    assert!(app.balance(&addr("dave")).is_zero());
    assert_eq!(app.balance(&authority), stake(100));

    app.set_balance(&authority, &stake(2_000));
    exec(&mut app, id, "bob").unwrap();
    assert_eq!(exec_event(&app).unwrap().1, ExecutorResult::Success);
    assert!(proposal(&mut app, id).is_err());
    assert_eq!(app.balance(&addr("dave")), stake(10));
    assert_eq!(app.balance(&addr("erin")), stake(1_000));
}

#[test]
fn try_exec_runs_on_submission() {
    let mut app = app();
    let authority = app.authority();
    app.set_balance(&authority, &stake(100));

    let msg = pay_from_authority(&app, "dave", 25);
    let id = submit(&mut app, "alice", vec![msg], Exec::Try).unwrap();

    assert!(app.events.iter().any(|e| matches!(
        e,
        Event::Vote { vote: Vote { voter, option: VoteOption::Yes, .. } } if *voter == addr("alice")
    )));
    assert_eq!(exec_event(&app).unwrap().1, ExecutorResult::Success);
    assert!(proposal(&mut app, id).is_err());
    assert_eq!(app.balance(&addr("dave")), stake(25));
}

#[test]
fn try_exec_on_vote() {
    let policy = DecisionPolicy::Threshold {
        threshold: Dec::from_int(2),
        windows: windows(DAY, 0),
    };
    let mut app = app_with_policy(&["alice", "bob", "carol"], policy);
    let authority = app.authority();
    app.set_balance(&authority, &stake(100));

    let msg = pay_from_authority(&app, "dave", 5);
    let id = submit(&mut app, "alice", vec![msg], Exec::Try).unwrap();
    // One yes of two required: still open.
    assert_eq!(proposal(&mut app, id).unwrap().status, ProposalStatus::Submitted);

    app.deliver(&MsgVote {
        proposal_id: id,
        voter: addr("bob"),
        option: VoteOption::Yes,
        metadata: String::new(),
        exec: Exec::Try,
    })
    .unwrap();
    assert!(proposal(&mut app, id).is_err());
    assert_eq!(app.balance(&addr("dave")), stake(5));
}

#[test]
fn proposal_messages_must_be_signed_by_authority() {
    let mut app = app();
    let foreign = MsgSend {
        from_address: addr("alice"),
        to_address: addr("dave"),
        amount: stake(1),
    }
    .to_any()
    .unwrap();
    let err = submit(&mut app, "alice", vec![foreign], Exec::Unspecified).unwrap_err();
    assert!(matches!(err, FoundationError::Unauthorized(_)), "{err}");

    let unknown = AnyMsg {
        type_url: "/unknown.v1.MsgNothing".to_string(),
        value: vec![],
    };
    let err = submit(&mut app, "alice", vec![unknown], Exec::Unspecified).unwrap_err();
    assert!(matches!(err, FoundationError::UnknownRequest(_)), "{err}");
}

#[test]
fn unknown_message_is_rejected() {
    let mut app = app();
    let err = app
        .deliver_any(&AnyMsg {
            type_url: "/unknown.v1.MsgNothing".to_string(),
            value: vec![],
        })
        .unwrap_err();
    assert!(matches!(err, FoundationError::UnknownRequest(_)));
}

#[test]
fn min_execution_period_delays_exec() {
    let policy = DecisionPolicy::Threshold {
        threshold: Dec::ONE,
        windows: windows(DAY, 3600),
    };
    let mut app = app_with_policy(&["alice", "bob"], policy);
    let authority = app.authority();
    app.set_balance(&authority, &stake(100));

    let msg = pay_from_authority(&app, "dave", 1);
    let id = submit(&mut app, "alice", vec![msg], Exec::Unspecified).unwrap();
    vote(&mut app, id, "alice", VoteOption::Yes).unwrap();

    let err = exec(&mut app, id, "alice").unwrap_err();
    assert!(matches!(err, FoundationError::Unauthorized(_)), "{err}");
    assert_eq!(proposal(&mut app, id).unwrap().status, ProposalStatus::Submitted);

    app.advance(3600);
    exec(&mut app, id, "alice").unwrap();
    assert!(proposal(&mut app, id).is_err());
}

// ---------------------------------------------------------------------------
// 2. Votes
// ---------------------------------------------------------------------------

#[test]
fn vote_twice_and_after_deadline_fail() {
    let mut app = app();
    let msg = pay_from_authority(&app, "dave", 1);
    let id = submit(&mut app, "alice", vec![msg], Exec::Unspecified).unwrap();

    vote(&mut app, id, "bob", VoteOption::No).unwrap();
    let err = vote(&mut app, id, "bob", VoteOption::Yes).unwrap_err();
    assert!(err.to_string().contains("already voted"), "{err}");

    app.advance(DAY);
    let err = vote(&mut app, id, "carol", VoteOption::Yes).unwrap_err();
    assert!(err.to_string().contains("voting period ended"), "{err}");

    let votes = app
        .with_ctx(|keeper, ctx| keeper.query_votes(ctx, id))
        .unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].option, VoteOption::No);
}

#[test]
fn non_members_cannot_submit_or_vote() {
    let mut app = app();
    let msg = pay_from_authority(&app, "dave", 1);
    let err = submit(&mut app, "dave", vec![msg.clone()], Exec::Unspecified).unwrap_err();
    assert!(matches!(err, FoundationError::NotAMember(_)));

    let id = submit(&mut app, "alice", vec![msg], Exec::Unspecified).unwrap();
    let err = vote(&mut app, id, "dave", VoteOption::Yes).unwrap_err();
    assert!(matches!(err, FoundationError::NotAMember(_)));
    let err = exec(&mut app, id, "dave").unwrap_err();
    assert!(matches!(err, FoundationError::NotAMember(_)));
}

// ---------------------------------------------------------------------------
// 3. Decision policies
// ---------------------------------------------------------------------------

#[test]
fn percentage_policy_outcomes() {
    let names = ["m0", "m1", "m2", "m3", "m4", "m5", "m6", "m7", "m8", "m9"];
    let policy = DecisionPolicy::Percentage {
        percentage: "0.8".parse().unwrap(),
        windows: windows(DAY, 0),
    };
    let mut app = app_with_policy(&names, policy);
    let authority = app.authority();
    app.set_balance(&authority, &stake(100));
    let payload = pay_from_authority(&app, "dave", 1);

    // 7 of 10 yes: still open; the 8th yes settles it.
    let accepted = submit(&mut app, "m0", vec![payload.clone()], Exec::Unspecified).unwrap();
    for voter in &names[..7] {
        vote(&mut app, accepted, voter, VoteOption::Yes).unwrap();
    }
    exec(&mut app, accepted, "m0").unwrap();
    assert_eq!(exec_event(&app).unwrap().1, ExecutorResult::NotRun);
    assert_eq!(proposal(&mut app, accepted).unwrap().status, ProposalStatus::Submitted);
    vote(&mut app, accepted, "m7", VoteOption::Yes).unwrap();
    exec(&mut app, accepted, "m0").unwrap();
    assert!(proposal(&mut app, accepted).is_err());

    // 3 no: at most 7 of 10 yes remain possible.
    let rejected = submit(&mut app, "m0", vec![payload.clone()], Exec::Unspecified).unwrap();
    for voter in &names[..3] {
        vote(&mut app, rejected, voter, VoteOption::No).unwrap();
    }
    exec(&mut app, rejected, "m0").unwrap();
    let stored = proposal(&mut app, rejected).unwrap();
    assert_eq!(stored.status, ProposalStatus::Rejected);
    assert_eq!(stored.final_tally_result.no_count, Dec::from_int(3));
    let votes = app
        .with_ctx(|keeper, ctx| keeper.query_votes(ctx, rejected))
        .unwrap();
    assert!(votes.is_empty());
    let err = exec(&mut app, rejected, "m0").unwrap_err();
    assert!(matches!(err, FoundationError::InvalidRequest(_)));

    // 4 yes and 5 abstain: abstentions count against the 80%.
    let abstained = submit(&mut app, "m0", vec![payload], Exec::Unspecified).unwrap();
    for voter in &names[..4] {
        vote(&mut app, abstained, voter, VoteOption::Yes).unwrap();
    }
    for voter in &names[4..9] {
        vote(&mut app, abstained, voter, VoteOption::Abstain).unwrap();
    }
    exec(&mut app, abstained, "m0").unwrap();
    assert_eq!(
        proposal(&mut app, abstained).unwrap().status,
        ProposalStatus::Rejected
    );
    assert_eq!(app.balance(&addr("dave")), stake(1));
}

#[test]
fn tally_skips_votes_of_non_members() {
    let mut genesis = genesis_with_members(&["alice", "bob"]);
    genesis.previous_proposal_id = 1;
    genesis.proposals.push(Proposal {
        id: 1,
        metadata: String::new(),
        proposers: vec![addr("alice")],
        submit_time: Timestamp::new(foundation_nullables::GENESIS_TIME),
        foundation_version: 1,
        status: ProposalStatus::Submitted,
        final_tally_result: Default::default(),
        voting_period_end: Timestamp::new(foundation_nullables::GENESIS_TIME + DAY),
        executor_result: ExecutorResult::NotRun,
        messages: vec![],
    });
    for voter in ["alice", "zed"] {
        genesis.votes.push(Vote {
            proposal_id: 1,
            voter: addr(voter),
            option: VoteOption::Yes,
            metadata: String::new(),
            submit_time: Timestamp::new(foundation_nullables::GENESIS_TIME),
        });
    }
    let mut app = NullApp::new(FoundationConfig::default(), &genesis).unwrap();

    let tally = app
        .with_ctx(|keeper, ctx| keeper.query_tally_result(ctx, 1))
        .unwrap();
    assert_eq!(tally.yes_count, Dec::ONE);
    assert_eq!(tally.total_counts(), Dec::ONE);
}

// ---------------------------------------------------------------------------
// 4. Membership and versions
// ---------------------------------------------------------------------------

#[test]
fn membership_change_aborts_open_proposals() {
    let mut app = app();
    let authority = app.authority();

    let payload = pay_from_authority(&app, "dave", 1);

    let open = submit(&mut app, "alice", vec![payload.clone()], Exec::Unspecified).unwrap();
    vote(&mut app, open, "bob", VoteOption::No).unwrap();

    // Accepted, but execution failed for lack of funds.
    let accepted = submit(&mut app, "alice", vec![payload], Exec::Try).unwrap();
    assert_eq!(
        proposal(&mut app, accepted).unwrap().executor_result,
        ExecutorResult::Failure
    );

    app.deliver(&MsgUpdateMembers {
        authority,
        member_updates: vec![MemberRequest {
            address: addr("dave"),
            remove: false,
            metadata: "new".to_string(),
        }],
    })
    .unwrap();

    let info = app
        .with_ctx(|keeper, ctx| keeper.query_foundation_info(ctx))
        .unwrap();
    assert_eq!(info.version, 2);
    assert_eq!(info.total_weight, Dec::from_int(4));

    for id in [open, accepted] {
        assert_eq!(proposal(&mut app, id).unwrap().status, ProposalStatus::Aborted);
        let votes = app.with_ctx(|keeper, ctx| keeper.query_votes(ctx, id)).unwrap();
        assert!(votes.is_empty());
    }
    assert!(vote(&mut app, open, "carol", VoteOption::Yes).is_err());
    assert!(exec(&mut app, accepted, "carol").is_err());

    app.end_block().unwrap();
    assert!(proposal(&mut app, open).is_err());
    assert!(proposal(&mut app, accepted).is_err());
}

#[test]
fn update_members_requires_authority_and_existing_removals() {
    let mut app = app();
    let request = MemberRequest {
        address: addr("zed"),
        remove: true,
        metadata: String::new(),
    };
    let err = app
        .deliver(&MsgUpdateMembers {
            authority: addr("alice"),
            member_updates: vec![request.clone()],
        })
        .unwrap_err();
    assert!(matches!(err, FoundationError::Unauthorized(_)));

    let authority = app.authority();
    let err = app
        .deliver(&MsgUpdateMembers {
            authority,
            member_updates: vec![request],
        })
        .unwrap_err();
    assert!(matches!(err, FoundationError::NotFound(_)));
}

#[test]
fn leave_foundation_lowers_weight() {
    let mut app = app();
    app.deliver(&MsgLeaveFoundation {
        address: addr("carol"),
    })
    .unwrap();
    assert_eq!(
        app.events,
        vec![Event::LeaveFoundation {
            address: addr("carol")
        }]
    );

    let info = app
        .with_ctx(|keeper, ctx| keeper.query_foundation_info(ctx))
        .unwrap();
    assert_eq!(info.total_weight, Dec::from_int(2));
    assert_eq!(info.version, 2);

    let err = app
        .deliver(&MsgLeaveFoundation {
            address: addr("carol"),
        })
        .unwrap_err();
    assert!(matches!(err, FoundationError::NotAMember(_)));
}

#[test]
fn decision_policy_update_aborts_open_proposals() {
    let mut app = app();
    let authority = app.authority();
    let payload = pay_from_authority(&app, "dave", 1);
    let id = submit(&mut app, "alice", vec![payload], Exec::Unspecified).unwrap();
    vote(&mut app, id, "bob", VoteOption::No).unwrap();

    let majority = DecisionPolicy::Percentage {
        percentage: "0.5".parse().unwrap(),
        windows: windows(2 * DAY, 0),
    };
    let err = app
        .deliver(&MsgUpdateDecisionPolicy {
            authority: addr("alice"),
            decision_policy: majority.clone(),
        })
        .unwrap_err();
    assert!(matches!(err, FoundationError::Unauthorized(_)), "{err}");

    app.deliver(&MsgUpdateDecisionPolicy {
        authority,
        decision_policy: majority.clone(),
    })
    .unwrap();
    assert_eq!(
        app.events,
        vec![Event::UpdatedDecisionPolicy {
            decision_policy: majority.clone()
        }]
    );

    let info = app
        .with_ctx(|keeper, ctx| keeper.query_foundation_info(ctx))
        .unwrap();
    assert_eq!(info.version, 2);
    assert_eq!(info.decision_policy, majority);

    let stored = proposal(&mut app, id).unwrap();
    assert_eq!(stored.status, ProposalStatus::Aborted);
    assert_eq!(stored.foundation_version, 1);
    let votes = app.with_ctx(|keeper, ctx| keeper.query_votes(ctx, id)).unwrap();
    assert!(votes.is_empty());

    // Proposals under the new version use the new voting period.
    let payload = pay_from_authority(&app, "dave", 1);
    let next = submit(&mut app, "bob", vec![payload], Exec::Unspecified).unwrap();
    let stored = proposal(&mut app, next).unwrap();
    assert_eq!(stored.foundation_version, 2);
    assert_eq!(
        stored.voting_period_end,
        stored.submit_time.saturating_add_secs(2 * DAY)
    );
}

#[test]
fn invalid_decision_policy_keeps_the_version() {
    let mut app = app();
    let authority = app.authority();
    let max_execution = app.keeper.config().max_execution_period_secs;

    let rejected = [
        // Cool-down outlasts the whole execution window.
        DecisionPolicy::Threshold {
            threshold: Dec::ONE,
            windows: windows(DAY, DAY + max_execution),
        },
        // Below the configured minimum threshold of one.
        DecisionPolicy::Threshold {
            threshold: "0.5".parse().unwrap(),
            windows: windows(DAY, 0),
        },
    ];
    for policy in rejected {
        let err = app
            .deliver(&MsgUpdateDecisionPolicy {
                authority: authority.clone(),
                decision_policy: policy,
            })
            .unwrap_err();
        assert!(matches!(err, FoundationError::InvalidRequest(_)), "{err}");
    }

    let info = app
        .with_ctx(|keeper, ctx| keeper.query_foundation_info(ctx))
        .unwrap();
    assert_eq!(info.version, 1);
    assert_eq!(info.decision_policy, DecisionPolicy::default());
}

// ---------------------------------------------------------------------------
// 5. Withdrawal and block sweeps
// ---------------------------------------------------------------------------

#[test]
fn withdraw_by_proposer_or_authority_only() {
    let mut app = app();
    let msg = pay_from_authority(&app, "dave", 1);
    let id = submit(&mut app, "alice", vec![msg], Exec::Unspecified).unwrap();

    let err = app
        .deliver(&MsgWithdrawProposal {
            proposal_id: id,
            address: addr("bob"),
        })
        .unwrap_err();
    assert!(matches!(err, FoundationError::Unauthorized(_)));

    let authority = app.authority();
    app.deliver(&MsgWithdrawProposal {
        proposal_id: id,
        address: authority,
    })
    .unwrap();
    assert_eq!(proposal(&mut app, id).unwrap().status, ProposalStatus::Withdrawn);

    let err = app
        .deliver(&MsgWithdrawProposal {
            proposal_id: id,
            address: addr("alice"),
        })
        .unwrap_err();
    assert!(matches!(err, FoundationError::InvalidRequest(_)));

    app.end_block().unwrap();
    assert!(proposal(&mut app, id).is_err());
}

#[test]
fn end_block_finalises_then_expires() {
    let mut app = app();
    let payload = pay_from_authority(&app, "dave", 1);
    let accepted = submit(&mut app, "alice", vec![payload.clone()], Exec::Unspecified).unwrap();
    vote(&mut app, accepted, "alice", VoteOption::Yes).unwrap();
    let silent = submit(&mut app, "bob", vec![payload], Exec::Unspecified).unwrap();

    app.advance(DAY - 1);
    app.end_block().unwrap();
    assert_eq!(proposal(&mut app, accepted).unwrap().status, ProposalStatus::Submitted);

    app.advance(1);
    app.end_block().unwrap();
    let stored = proposal(&mut app, accepted).unwrap();
    assert_eq!(stored.status, ProposalStatus::Accepted);
    assert_eq!(stored.final_tally_result.yes_count, Dec::ONE);
    assert_eq!(proposal(&mut app, silent).unwrap().status, ProposalStatus::Rejected);

    let max_execution = app.keeper.config().max_execution_period_secs;
    app.advance(max_execution - 1);
    app.end_block().unwrap();
    assert!(proposal(&mut app, accepted).is_ok());

    app.advance(1);
    app.end_block().unwrap();
    assert!(proposal(&mut app, accepted).is_err());
    assert!(proposal(&mut app, silent).is_err());
}

#[test]
fn expired_proposal_cannot_execute() {
    let mut app = app();
    let authority = app.authority();
    let payload = pay_from_authority(&app, "dave", 10);

    // Accepted, but the first run fails for lack of funds.
    let id = submit(&mut app, "alice", vec![payload], Exec::Try).unwrap();
    assert_eq!(exec_event(&app).unwrap().1, ExecutorResult::Failure);

    let max_execution = app.keeper.config().max_execution_period_secs;
    app.advance(DAY + max_execution - 1);
    app.end_block().unwrap();
    assert!(proposal(&mut app, id).is_ok());

    app.advance(2);
    app.set_balance(&authority, &stake(100));
    let err = exec(&mut app, id, "alice").unwrap_err();
    assert!(matches!(err, FoundationError::InvalidRequest(_)), "{err}");
    assert!(err.to_string().contains("expired"), "{err}");
    assert!(app.balance(&addr("dave")).is_zero());
    assert_eq!(app.balance(&authority), stake(100));

    app.end_block().unwrap();
    assert!(proposal(&mut app, id).is_err());
}

// ---------------------------------------------------------------------------
// 6. Censorship and grants
// ---------------------------------------------------------------------------

#[test]
fn removing_censorship_prunes_grants_and_cannot_be_undone() {
    let mut app = app();
    let authority = app.authority();
    let url = MsgWithdrawFromTreasury::TYPE_URL;

    grant_receive_from_treasury(&mut app, "alice");
    let grants = app
        .with_ctx(|keeper, ctx| keeper.query_grants(ctx, &addr("alice"), None))
        .unwrap();
    assert_eq!(grants.len(), 1);

    let err = app
        .deliver(&MsgGrant {
            authority: authority.clone(),
            grantee: addr("alice"),
            authorization: Authorization::ReceiveFromTreasury,
        })
        .unwrap_err();
    assert!(matches!(err, FoundationError::InvalidRequest(_)));

    app.deliver(&MsgUpdateCensorship {
        authority: authority.clone(),
        censorship: Censorship::new(url, CensorshipAuthority::Unspecified),
    })
    .unwrap();

    let grants = app
        .with_ctx(|keeper, ctx| keeper.query_grants(ctx, &addr("alice"), Some(url)))
        .unwrap();
    assert!(grants.is_empty());
    let censored = app
        .with_ctx(|keeper, ctx| keeper.is_censored_message(ctx, url))
        .unwrap();
    assert!(!censored);

    let governance = app.governance();
    for signer in [governance, authority] {
        let result = app.deliver(&MsgUpdateCensorship {
            authority: signer,
            censorship: Censorship::new(url, CensorshipAuthority::Governance),
        });
        assert!(result.is_err());
    }
}

#[test]
fn censorship_authority_can_only_be_lowered_by_its_holder() {
    let mut app = app();
    let authority = app.authority();
    let governance = app.governance();
    let url = MsgCreateValidator::TYPE_URL;

    let err = app
        .deliver(&MsgUpdateCensorship {
            authority: authority.clone(),
            censorship: Censorship::new(url, CensorshipAuthority::Foundation),
        })
        .unwrap_err();
    assert!(matches!(err, FoundationError::Unauthorized(_)));

    app.deliver(&MsgUpdateCensorship {
        authority: governance,
        censorship: Censorship::new(url, CensorshipAuthority::Foundation),
    })
    .unwrap();

    let err = app
        .deliver(&MsgUpdateCensorship {
            authority,
            censorship: Censorship::new(url, CensorshipAuthority::Governance),
        })
        .unwrap_err();
    assert!(matches!(err, FoundationError::InvalidRequest(_)));

    let censorships = app
        .with_ctx(|keeper, ctx| keeper.query_censorships(ctx))
        .unwrap();
    assert!(censorships.contains(&Censorship::new(url, CensorshipAuthority::Foundation)));
}

#[test]
fn censored_foreign_message_needs_a_grant() {
    let mut app = app();
    let create = MsgCreateValidator {
        delegator_address: addr("val1"),
        validator_address: addr("val1"),
        value: Coin::new("stake", 10),
    };

    let err = app.deliver(&create).unwrap_err();
    assert!(matches!(err, FoundationError::Unauthorized(_)));

    // Only governance may grant under a governance censorship.
    let authority = app.authority();
    let grant = |signer: Address| MsgGrant {
        authority: signer,
        grantee: addr("val1"),
        authorization: Authorization::CreateValidator {
            validator_address: addr("val1"),
        },
    };
    let err = app.deliver(&grant(authority)).unwrap_err();
    assert!(matches!(err, FoundationError::Unauthorized(_)));
    let governance = app.governance();
    app.deliver(&grant(governance)).unwrap();

    app.deliver(&create).unwrap();
    let created = app.with_ctx(|_, ctx| has_validator(ctx, &addr("val1")));
    assert!(created);

    // The grant is consumed.
    let grants = app
        .with_ctx(|keeper, ctx| keeper.query_grants(ctx, &addr("val1"), None))
        .unwrap();
    assert!(grants.is_empty());
}

// ---------------------------------------------------------------------------
// 7. Treasury and tax
// ---------------------------------------------------------------------------

#[test]
fn fund_and_withdraw_treasury() {
    let mut app = app();
    app.set_balance(&addr("alice"), &stake(100));

    app.deliver(&MsgFundTreasury {
        from: addr("alice"),
        amount: stake(60),
    })
    .unwrap();
    assert_eq!(
        app.events,
        vec![Event::FundedTreasury {
            from: addr("alice"),
            amount: stake(60)
        }]
    );
    assert_eq!(pool(&mut app), stake(60));
    assert_eq!(app.balance(&addr("alice")), stake(40));
    let treasury = app.treasury();
    assert_eq!(app.balance(&treasury), stake(60));

    let err = app
        .deliver(&MsgFundTreasury {
            from: addr("alice"),
            amount: stake(100),
        })
        .unwrap_err();
    assert!(matches!(err, FoundationError::InsufficientFunds { .. }));
    assert_eq!(pool(&mut app), stake(60));

    grant_receive_from_treasury(&mut app, "dave");
    let authority = app.authority();
    let withdraw = |to: &str, amount: u128| {
        MsgWithdrawFromTreasury {
            authority: authority.clone(),
            to: addr(to),
            amount: stake(amount),
        }
        .to_any()
        .unwrap()
    };

    let id = submit(&mut app, "alice", vec![withdraw("dave", 50)], Exec::Try).unwrap();
    assert!(proposal(&mut app, id).is_err());
    assert_eq!(pool(&mut app), stake(10));
    assert_eq!(app.balance(&addr("dave")), stake(50));

    // The ledger cannot cover it.
    let id = submit(&mut app, "alice", vec![withdraw("dave", 20)], Exec::Try).unwrap();
    let (_, result, logs) = exec_event(&app).unwrap();
    assert_eq!(result, ExecutorResult::Failure);
    assert!(logs.contains("insufficient funds"), "logs: {logs}");
    assert!(proposal(&mut app, id).is_ok());
    assert_eq!(pool(&mut app), stake(10));

    // Erin holds no grant.
    submit(&mut app, "alice", vec![withdraw("erin", 5)], Exec::Try).unwrap();
    let (_, result, logs) = exec_event(&app).unwrap();
    assert_eq!(result, ExecutorResult::Failure);
    assert!(logs.contains("unauthorized"), "logs: {logs}");
    assert!(app.balance(&addr("erin")).is_zero());
}

#[test]
fn tax_is_collected_until_switched_off() {
    let mut genesis = genesis_with_members(&["alice"]);
    genesis.params = Params {
        foundation_tax: "0.5".parse().unwrap(),
    };
    let mut app = NullApp::new(FoundationConfig::default(), &genesis).unwrap();
    let collector = app.fee_collector();
    let fees = Coins::from_coins(vec![Coin::new("stake", 101), Coin::new("uatom", 3)]).unwrap();
    app.set_balance(&collector, &fees);

    app.begin_block().unwrap();
    let collected = Coins::from_coins(vec![Coin::new("stake", 50), Coin::new("uatom", 1)]).unwrap();
    assert_eq!(
        app.events,
        vec![Event::CollectedFoundationTax {
            amount: collected.clone()
        }]
    );
    assert_eq!(pool(&mut app), collected);
    let treasury = app.treasury();
    assert_eq!(app.balance(&treasury), collected);
    assert_eq!(
        app.balance(&collector),
        Coins::from_coins(vec![Coin::new("stake", 51), Coin::new("uatom", 2)]).unwrap()
    );

    let authority = app.authority();
    let zero = Params {
        foundation_tax: Dec::ZERO,
    };
    let err = app
        .deliver(&MsgUpdateParams {
            authority,
            params: zero.clone(),
        })
        .unwrap_err();
    assert!(matches!(err, FoundationError::Unauthorized(_)));

    let governance = app.governance();
    app.deliver(&MsgUpdateParams {
        authority: governance.clone(),
        params: zero,
    })
    .unwrap();
    let err = app
        .deliver(&MsgUpdateParams {
            authority: governance,
            params: Params {
                foundation_tax: "0.1".parse().unwrap(),
            },
        })
        .unwrap_err();
    assert!(matches!(err, FoundationError::InvalidRequest(_)));

    app.advance(5);
    app.begin_block().unwrap();
    assert!(app.events.is_empty());
    assert_eq!(pool(&mut app), collected);
}

// ---------------------------------------------------------------------------
// 8. Genesis
// ---------------------------------------------------------------------------

#[test]
fn genesis_export_import_round_trip() {
    let mut app = app();
    app.set_balance(&addr("alice"), &stake(10));
    app.deliver(&MsgFundTreasury {
        from: addr("alice"),
        amount: stake(10),
    })
    .unwrap();
    grant_receive_from_treasury(&mut app, "bob");
    let msg = pay_from_authority(&app, "dave", 1);
    let id = submit(&mut app, "alice", vec![msg], Exec::Unspecified).unwrap();
    vote(&mut app, id, "carol", VoteOption::NoWithVeto).unwrap();

    let exported = app.with_ctx(|keeper, ctx| keeper.export_genesis(ctx)).unwrap();
    exported.validate().unwrap();
    assert_eq!(exported.previous_proposal_id, 1);
    assert_eq!(exported.members.len(), 3);
    assert_eq!(exported.votes.len(), 1);
    assert_eq!(exported.authorizations.len(), 1);
    assert_eq!(exported.pool, stake(10));

    let json = exported.to_json().unwrap();
    let imported = GenesisState::from_json(&json).unwrap();
    assert_eq!(imported, exported);

    let mut restored = NullApp::new(FoundationConfig::default(), &imported).unwrap();
    let again = restored
        .with_ctx(|keeper, ctx| keeper.export_genesis(ctx))
        .unwrap();
    assert_eq!(again, exported);

    // Proposal ids continue where the export left off.
    let msg = pay_from_authority(&restored, "dave", 1);
    let next = submit(&mut restored, "bob", vec![msg], Exec::Unspecified).unwrap();
    assert_eq!(next, 2);
}

#[test]
fn invalid_genesis_is_refused() {
    let mut genesis = genesis_with_members(&["alice"]);
    genesis.foundation.version = 0;
    let err = NullApp::new(FoundationConfig::default(), &genesis)
        .err()
        .unwrap();
    assert!(matches!(err, FoundationError::InvalidVersion(0)));
}
