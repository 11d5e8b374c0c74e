//! # Logout Scenarios

use super::harness::*;
use shared_bus::TicketEventKind;
use tgt_02_alias_store::{AliasRole, AliasStoreApi};
use tgt_03_ticket_lifecycle::TicketLifecycleApi;
use tgt_04_federated_logout::domain::response::{
    STATUS_PARTIAL_LOGOUT, STATUS_REQUESTER, STATUS_SUCCESS,
};
use tgt_04_federated_logout::{
    LogoutApi, LogoutOutcome, LogoutRequest, LogoutState, ProtocolFault, RejectReason,
};

#[test]
fn test_timeout_detaches_then_explicit_logout_ends_session() {
    let world = World::new();
    let id = world.login("alice", &[SP_A, SP_B]);
    assert_eq!(world.core.config.lifecycle.ttl_secs, 30 * 60);

    let first = world.logout(&id, SP_A, Some("timeout"));
    assert_eq!(first.outcome, LogoutOutcome::PartiallyLoggedOut);
    assert_eq!(first.status_code().value, STATUS_SUCCESS);
    assert_eq!(first.status_code().sub_status, Some(STATUS_PARTIAL_LOGOUT));

    let ticket = world.core.lifecycle.retrieve(&id).unwrap().unwrap();
    assert_eq!(ticket.requestor_ids(), [SP_B]);
    assert!(!world.has_alias(&id, SP_A));
    assert!(world.has_alias(&id, SP_B));

    world.clock.advance(5);
    let second = world.logout(&id, SP_B, None);
    assert_eq!(second.outcome, LogoutOutcome::FullyLoggedOut);
    assert!(!world.core.lifecycle.exists(&id).unwrap());
    assert!(!world.has_alias(&id, SP_B));
}

#[test]
fn test_full_logout_clears_both_alias_stores() {
    let world = World::new();
    let id = world.login("alice", &[SP_A, SP_B]);
    world
        .core
        .lifecycle
        .aliases(AliasRole::IdentityProvider)
        .put_alias("name_id", IDP, &id, "alice@upstream")
        .unwrap();
    world.recorder.clear();

    let response = world.logout(&id, SP_A, None);

    assert_eq!(response.outcome, LogoutOutcome::FullyLoggedOut);
    assert_eq!(world.recorder.ids_for(TicketEventKind::Remove), vec![id.clone()]);
    assert!(!world.has_alias(&id, SP_A));
    assert!(!world.has_alias(&id, SP_B));
    assert!(!world
        .core
        .lifecycle
        .aliases(AliasRole::IdentityProvider)
        .is_alias("name_id", IDP, "alice@upstream")
        .unwrap());
}

#[test]
fn test_unknown_session_index_is_a_requester_fault() {
    let world = World::new();
    let id = world.login("alice", &[SP_A]);
    let stored_keys = world.kv.len();
    world.recorder.clear();

    let response = world.core.relying_party_logout.handle(
        &LogoutRequest::new("_r", SP_A, START).with_reference("session_index", "_forged"),
    );

    assert_eq!(
        response.outcome,
        LogoutOutcome::Rejected(RejectReason::UnresolvedReference)
    );
    assert_eq!(response.status_code().value, STATUS_REQUESTER);
    assert_eq!(response.outcome.fault(), Some(ProtocolFault::Requester));
    assert_eq!(world.kv.len(), stored_keys);
    assert!(world.recorder.kinds().is_empty());
    assert!(world.core.lifecycle.exists(&id).unwrap());
}

#[test]
fn test_stale_request_is_rejected_before_resolution() {
    let world = World::new();
    let id = world.login("alice", &[SP_A]);
    let request = world.request(&id, SP_A);
    world.clock.advance(world.core.config.logout.window_secs + 1);
    world.kv.set_unavailable(true);

    let response = world.core.relying_party_logout.handle(&request);

    world.kv.set_unavailable(false);
    assert!(matches!(
        response.outcome,
        LogoutOutcome::Rejected(RejectReason::Stale { .. })
    ));
    assert_eq!(response.final_state, LogoutState::Rejected);
    assert!(world.core.lifecycle.exists(&id).unwrap());
}

#[test]
fn test_logout_of_expired_ticket_is_idempotent() {
    let world = World::new();
    let id = world.login("alice", &[SP_A, SP_B]);
    world.clock.advance(world.core.config.lifecycle.ttl_secs);
    let stored_keys = world.kv.len();
    world.recorder.clear();

    let response = world.logout(&id, SP_A, Some("timeout"));

    assert_eq!(response.outcome, LogoutOutcome::FullyLoggedOut);
    assert_eq!(world.kv.len(), stored_keys);
    assert!(world.recorder.kinds().is_empty());
}

#[test]
fn test_relying_party_cannot_end_foreign_session() {
    let world = World::new();
    let alice = world.login("alice", &[SP_A]);
    let bob = world.login("bob", &[SP_B]);
    // SP_B somehow holds an alias pointing at alice's session.
    world
        .core
        .lifecycle
        .aliases(AliasRole::RelyingParty)
        .put_alias("credential", SP_B, &alice, "leaked")
        .unwrap();

    let response = world.core.relying_party_logout.handle(
        &LogoutRequest::new("_r", SP_B, START).with_reference("credential", "leaked"),
    );

    assert!(matches!(
        response.outcome,
        LogoutOutcome::Rejected(RejectReason::IssuerNotAttached { .. })
    ));
    assert!(world.core.lifecycle.exists(&alice).unwrap());
    assert!(world.core.lifecycle.exists(&bob).unwrap());
}

#[test]
fn test_identity_provider_initiated_logout() {
    let world = World::new();
    let mut ticket = world
        .core
        .lifecycle
        .create_ticket(
            shared_types::TicketBuilder::new(shared_types::Principal::new("alice"))
                .requestor(SP_A)
                .remote_idp(IDP),
        )
        .unwrap();
    world.core.lifecycle.persist(&mut ticket).unwrap();
    let id = ticket.id().cloned().unwrap();
    world
        .core
        .lifecycle
        .aliases(AliasRole::IdentityProvider)
        .put_alias("session_index", IDP, &id, "_idp-session")
        .unwrap();

    let response = world.core.identity_provider_logout.handle(
        &LogoutRequest::new("_r", IDP, START)
            .with_destination(world.core.config.logout.endpoint.clone())
            .with_reference("session_index", "_idp-session"),
    );

    assert_eq!(response.outcome, LogoutOutcome::FullyLoggedOut);
    assert_eq!(response.issuer, world.core.config.logout.endpoint);
    assert!(!world.core.lifecycle.exists(&id).unwrap());
}
