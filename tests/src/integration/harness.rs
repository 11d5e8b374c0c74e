//! # Test Harness
//!
//! A `SessionCore` wired exactly as the runtime wires it, on an in-memory
//! store and a manual clock, with a recording listener attached.

use session_runtime::{SessionConfig, SessionCore};
use shared_bus::testing::RecordingListener;
use shared_types::{InMemoryKVStore, ManualClock, Principal, TicketBuilder, TicketId, TimeSource};
use std::sync::Arc;
use tgt_02_alias_store::{AliasRole, AliasStoreApi};
use tgt_03_ticket_lifecycle::TicketLifecycleApi;
use tgt_04_federated_logout::{LogoutApi, LogoutRequest, LogoutResponse};

pub const START: u64 = 1_700_000_000;
pub const SP_A: &str = "https://mail.example.org";
pub const SP_B: &str = "https://wiki.example.org";
pub const SP_C: &str = "https://lms.example.org";
pub const SP_D: &str = "https://hr.example.org";
pub const IDP: &str = "https://upstream-idp.example.net";

pub struct World {
    pub kv: Arc<InMemoryKVStore>,
    pub clock: ManualClock,
    pub core: SessionCore,
    pub recorder: Arc<RecordingListener>,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(mut config: SessionConfig) -> Self {
        config.logout.requestors = [SP_A, SP_B, SP_C, SP_D].map(String::from).to_vec();
        config.logout.identity_providers = vec![IDP.to_string()];

        let kv = Arc::new(InMemoryKVStore::new());
        let clock = ManualClock::new(START);
        let core = SessionCore::with_store(config, kv.clone(), Arc::new(clock.clone()))
            .unwrap_or_else(|e| panic!("core failed to start: {e}"));
        let recorder = Arc::new(RecordingListener::new("recorder"));
        core.listeners.add_listener(recorder.clone());

        Self {
            kv,
            clock,
            core,
            recorder,
        }
    }

    /// Open a session for `uid` shared by `parties`, each holding a session
    /// index alias.
    pub fn login(&self, uid: &str, parties: &[&str]) -> TicketId {
        let lifecycle = &self.core.lifecycle;
        let builder = parties
            .iter()
            .fold(TicketBuilder::new(Principal::new(uid)), |b, p| b.requestor(*p));
        let mut ticket = lifecycle
            .create_ticket(builder)
            .unwrap_or_else(|e| panic!("admission failed: {e}"));
        lifecycle
            .persist(&mut ticket)
            .unwrap_or_else(|e| panic!("persist failed: {e}"));
        let Some(id) = ticket.id().cloned() else {
            panic!("persisted ticket has no id");
        };

        for party in parties {
            lifecycle
                .aliases(AliasRole::RelyingParty)
                .put_alias("session_index", party, &id, &session_index(&id, party))
                .unwrap_or_else(|e| panic!("alias failed: {e}"));
        }
        id
    }

    /// A fresh logout request from `party` for `id`.
    pub fn request(&self, id: &TicketId, party: &str) -> LogoutRequest {
        LogoutRequest::new(format!("_req-{}", self.clock.now()), party, self.clock.now())
            .with_reference("session_index", &session_index(id, party))
    }

    pub fn logout(&self, id: &TicketId, party: &str, reason: Option<&str>) -> LogoutResponse {
        let mut request = self.request(id, party);
        request.reason = reason.map(String::from);
        self.core.relying_party_logout.handle(&request)
    }

    /// Whether `party`'s session index still resolves.
    pub fn has_alias(&self, id: &TicketId, party: &str) -> bool {
        self.core
            .lifecycle
            .aliases(AliasRole::RelyingParty)
            .is_alias("session_index", party, &session_index(id, party))
            .unwrap_or_else(|e| panic!("alias lookup failed: {e}"))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

pub fn session_index(id: &TicketId, party: &str) -> String {
    format!("_{id}@{party}")
}
