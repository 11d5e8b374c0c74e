//! # Concurrency Scenarios
//!
//! Racing requests on one ticket must serialize: exactly one wins, the rest
//! see an idempotent outcome, and no update is lost.

use super::harness::*;
use shared_bus::TicketEventKind;
use tgt_03_ticket_lifecycle::TicketLifecycleApi;
use tgt_04_federated_logout::{LogoutApi, LogoutOutcome, RejectReason};

const RACERS: usize = 8;

#[test]
fn test_racing_full_logouts_remove_once() {
    let world = World::new();
    let id = world.login("alice", &[SP_A]);
    let request = world.request(&id, SP_A);
    world.recorder.clear();

    let outcomes: Vec<LogoutOutcome> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..RACERS)
            .map(|_| s.spawn(|| world.core.relying_party_logout.handle(&request).outcome))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect()
    });

    assert!(outcomes.contains(&LogoutOutcome::FullyLoggedOut));
    for outcome in &outcomes {
        assert!(
            matches!(
                outcome,
                LogoutOutcome::FullyLoggedOut
                    | LogoutOutcome::Rejected(RejectReason::UnresolvedReference)
            ),
            "{outcome:?}"
        );
    }
    assert_eq!(world.recorder.ids_for(TicketEventKind::Remove), vec![id.clone()]);
    assert!(!world.core.lifecycle.exists(&id).unwrap());
}

#[test]
fn test_racing_partial_logouts_lose_no_detach() {
    let world = World::new();
    let id = world.login("alice", &[SP_A, SP_B, SP_C, SP_D]);

    let outcomes: Vec<LogoutOutcome> = std::thread::scope(|s| {
        let handles: Vec<_> = [SP_A, SP_B, SP_C]
            .into_iter()
            .map(|party| {
                let world = &world;
                let id = &id;
                s.spawn(move || world.logout(id, party, Some("timeout")).outcome)
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect()
    });

    assert!(outcomes
        .iter()
        .all(|o| *o == LogoutOutcome::PartiallyLoggedOut));
    let ticket = world.core.lifecycle.retrieve(&id).unwrap().unwrap();
    assert_eq!(ticket.requestor_ids(), [SP_D]);
    for party in [SP_A, SP_B, SP_C] {
        assert!(!world.has_alias(&id, party));
    }
    assert!(world.has_alias(&id, SP_D));
}
