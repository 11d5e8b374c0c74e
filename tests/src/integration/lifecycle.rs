//! # Lifecycle Scenarios

use super::harness::*;
use shared_bus::testing::FailingListener;
use shared_bus::{DispatchOutcome, ListenerErrorCode, ListenerRegistry, TicketEventKind};
use proptest::prelude::*;
use shared_types::{Principal, Ticket, TicketBuilder, TicketId, TimeSource};
use std::sync::Arc;
use tgt_02_alias_store::{AliasRole, AliasStoreApi};
use tgt_03_ticket_lifecycle::{LifecycleError, TicketLifecycleApi};

fn fresh(uid: &str) -> Ticket {
    TicketBuilder::new(Principal::new(uid)).requestor(SP_A).build()
}

/// Stored tickets to update and to expire, plus unpersisted ones to create.
fn batch_for(world: &World, creates: usize, updates: usize, expires: usize) -> Vec<Ticket> {
    let lifecycle = &world.core.lifecycle;
    let stored = |prefix: &str, i: usize| {
        let id = world.login(&format!("{prefix}-{i}"), &[SP_A]);
        lifecycle.retrieve(&id).unwrap().unwrap()
    };

    let mut batch: Vec<Ticket> = (0..creates).map(|i| fresh(&format!("new-{i}"))).collect();
    batch.extend((0..updates).map(|i| {
        let mut ticket = stored("upd", i);
        ticket.attach_requestor(SP_B);
        ticket
    }));
    batch.extend((0..expires).map(|i| {
        let mut ticket = stored("exp", i);
        ticket.expire(world.clock.now());
        ticket
    }));
    batch
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_batch_persist_is_all_or_nothing(
        creates in 0usize..4,
        updates in 0usize..4,
        expires in 0usize..4,
        fail_commit in any::<bool>(),
    ) {
        let world = World::new();
        let lifecycle = &world.core.lifecycle;
        let mut batch = batch_for(&world, creates, updates, expires);
        let snapshot = batch.clone();
        let before = lifecycle.count().unwrap();
        world.recorder.clear();

        if fail_commit {
            world.kv.fail_next_commit();
        }
        let result = lifecycle.persist_all(&mut batch);

        if fail_commit && !batch.is_empty() {
            prop_assert!(result.is_err());
            prop_assert_eq!(lifecycle.count().unwrap(), before);
            prop_assert_eq!(&batch, &snapshot);
            prop_assert!(world.recorder.kinds().is_empty());
            for ticket in &snapshot[creates..] {
                let stored = lifecycle.retrieve(ticket.id().unwrap()).unwrap().unwrap();
                prop_assert!(!stored.has_requestor(SP_B));
            }
        } else {
            prop_assert!(result.is_ok());
            prop_assert_eq!(lifecycle.count().unwrap(), before + creates - expires);
            prop_assert!(batch.iter().all(Ticket::is_persisted));
            for ticket in &batch[creates..creates + updates] {
                let stored = lifecycle.retrieve(ticket.id().unwrap()).unwrap().unwrap();
                prop_assert!(stored.has_requestor(SP_B));
            }
            for ticket in &batch[creates + updates..] {
                prop_assert!(!lifecycle.exists(ticket.id().unwrap()).unwrap());
            }
            prop_assert_eq!(world.recorder.kinds().len(), batch.len());
        }
    }

    #[test]
    fn test_dispatch_outcome_for_every_failure_mix(
        codes in prop::collection::vec(
            prop::sample::select(vec![ListenerErrorCode::PartiallyFailed, ListenerErrorCode::Failed]),
            0..5,
        )
    ) {
        let ticket = fresh("alice");
        let registry = ListenerRegistry::new();
        for (i, code) in codes.iter().enumerate() {
            registry.add_listener(Arc::new(FailingListener::new(format!("l{i}"), *code)));
        }

        let expected = if codes.contains(&ListenerErrorCode::Failed) {
            DispatchOutcome::Failed
        } else if codes.is_empty() {
            DispatchOutcome::Succeeded
        } else {
            DispatchOutcome::PartiallySucceeded
        };
        let result = registry.dispatch(TicketEventKind::Update, &ticket);
        prop_assert_eq!(DispatchOutcome::classify(&result), expected);
        if let Err(e) = result {
            prop_assert_eq!(e.failures.len(), codes.len());
        }
    }
}

#[test]
fn test_batch_persist_commits_every_group() {
    let world = World::new();
    let lifecycle = &world.core.lifecycle;
    let keep = world.login("keep", &[SP_A]);
    let drop = world.login("drop", &[SP_A]);
    world.recorder.clear();

    let mut updated = lifecycle.retrieve(&keep).unwrap().unwrap();
    updated.attach_requestor(SP_C);
    let mut removed = lifecycle.retrieve(&drop).unwrap().unwrap();
    removed.expire(world.clock.now());
    let mut batch = vec![updated, fresh("carol"), removed];

    lifecycle.persist_all(&mut batch).unwrap();

    assert_eq!(
        world.recorder.kinds(),
        vec![
            TicketEventKind::Create,
            TicketEventKind::Remove,
            TicketEventKind::Update
        ]
    );
    assert_eq!(lifecycle.count().unwrap(), 2);
    assert!(!world.has_alias(&drop, SP_A));
    assert!(lifecycle
        .retrieve(&keep)
        .unwrap()
        .unwrap()
        .has_requestor(SP_C));
}

#[test]
fn test_alias_roles_are_isolated() {
    let world = World::new();
    let id = world.login("alice", &[SP_A]);
    let lifecycle = &world.core.lifecycle;
    let rp = lifecycle.aliases(AliasRole::RelyingParty);
    let idp = lifecycle.aliases(AliasRole::IdentityProvider);

    idp.put_alias("session_index", SP_A, &id, "_upstream").unwrap();

    assert_eq!(
        rp.get_alias("session_index", SP_A, &id).unwrap(),
        Some(session_index(&id, SP_A))
    );
    assert_eq!(
        idp.get_alias("session_index", SP_A, &id).unwrap(),
        Some("_upstream".to_string())
    );

    assert!(idp.remove_all_for_ticket(SP_A, &id).unwrap());
    assert!(world.has_alias(&id, SP_A));
}

#[test]
fn test_quota_is_distinct_from_persistence_failure() {
    let mut config = session_runtime::SessionConfig::default();
    config.lifecycle.max_tickets = Some(1);
    let world = World::with_config(config);
    world.login("alice", &[SP_A]);

    let err = world
        .core
        .lifecycle
        .create_ticket(TicketBuilder::new(Principal::new("bob")))
        .unwrap_err();
    assert!(matches!(err, LifecycleError::QuotaExceeded { max: 1, .. }));
}

#[test]
fn test_expiry_sweep_clears_tickets_and_aliases() {
    let world = World::new();
    let old = world.login("alice", &[SP_A, SP_B]);
    world.clock.advance(600);
    let young = world.login("bob", &[SP_A]);
    world.recorder.clear();

    world.clock.advance(world.core.config.lifecycle.ttl_secs - 300);
    let report = world.core.lifecycle.remove_expired().unwrap();

    assert_eq!(report.removed, 1);
    assert_eq!(report.orphaned_aliases, 2);
    assert_eq!(world.recorder.ids_for(TicketEventKind::Expire), vec![old.clone()]);
    assert!(!world.has_alias(&old, SP_A));
    assert!(!world.has_alias(&old, SP_B));
    assert!(world.has_alias(&young, SP_A));
}

#[test]
fn test_clean_removes_everything() {
    let world = World::new();
    let id = world.login("alice", &[SP_A, SP_B]);
    let ticket = world.core.lifecycle.retrieve(&id).unwrap().unwrap();
    world.recorder.clear();

    world.core.lifecycle.clean(&ticket).unwrap();

    assert!(!world.core.lifecycle.exists(&id).unwrap());
    assert!(!world.has_alias(&id, SP_A));
    assert_eq!(world.recorder.kinds(), vec![TicketEventKind::Expire]);
    let unknown = TicketId::from("never-existed");
    assert!(!world.core.lifecycle.exists(&unknown).unwrap());
}
