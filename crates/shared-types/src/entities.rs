//! # Core Domain Entities
//!
//! The ticket (the server-side record of one authenticated session) and the
//! value types it carries.
//!
//! ## Lifecycle
//!
//! ```text
//! TicketBuilder::build()         unpersisted (id == None)
//!        │
//!        ▼ first persist         assign_identity(): id + expiration
//!   [LIVE] ── persist ──→ renew(): expiration moves forward only
//!        │
//!        ▼ expire(now) / zero requestors
//!   [EXPIRED] ── persist ──→ row deleted, aliases swept
//! ```

use crate::errors::TicketError;
use crate::time::Timestamp;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque unique ticket identifier.
///
/// Immutable once assigned to a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketId(String);

impl TicketId {
    /// Wrap a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TicketId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// The authenticated principal a ticket belongs to.
///
/// Persisted as an opaque blob through a principal codec.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Principal {
    /// User identifier at the authenticating source.
    pub uid: String,
    /// Organization (authentication source) the user authenticated at.
    pub organization: Option<String>,
}

impl Principal {
    /// Create a principal without an organization.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            organization: None,
        }
    }
}

/// Authentication method/strength used to establish a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationProfile {
    /// Profile identifier.
    pub id: String,
    /// Relative strength; protocol layers use it to pick the highest profile.
    pub level: u32,
    /// Authentication methods that made up this profile.
    pub methods: Vec<String>,
}

/// Key-scoped attribute bag carried between requests.
///
/// Keys are `scope` + `name`, so two protocol handlers can use the same
/// attribute name without clobbering each other.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TicketAttributes {
    entries: BTreeMap<String, serde_json::Value>,
}

impl TicketAttributes {
    fn scoped_key(scope: &str, name: &str) -> String {
        format!("{scope}.{name}")
    }

    /// Store `value` under (`scope`, `name`), replacing any previous value.
    pub fn put<T: Serialize>(
        &mut self,
        scope: &str,
        name: &str,
        value: &T,
    ) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        self.entries.insert(Self::scoped_key(scope, name), value);
        Ok(())
    }

    /// Read the value stored under (`scope`, `name`).
    pub fn get<T: DeserializeOwned>(
        &self,
        scope: &str,
        name: &str,
    ) -> Result<Option<T>, serde_json::Error> {
        self.entries
            .get(&Self::scoped_key(scope, name))
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
    }

    /// Remove an attribute. Returns true if it was present.
    pub fn remove(&mut self, scope: &str, name: &str) -> bool {
        self.entries.remove(&Self::scoped_key(scope, name)).is_some()
    }

    /// Whether an attribute is present.
    pub fn contains(&self, scope: &str, name: &str) -> bool {
        self.entries.contains_key(&Self::scoped_key(scope, name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All persisted fields of a ticket, used to rebuild one from storage.
#[derive(Debug, Clone)]
pub struct TicketParts {
    pub id: TicketId,
    pub expiration_time: Timestamp,
    pub created_at: Timestamp,
    pub user: Principal,
    pub authentication_profile: Option<AuthenticationProfile>,
    pub authentication_profile_ids: Vec<String>,
    pub requestor_ids: Vec<String>,
    pub remote_idp: Option<String>,
    pub attributes: TicketAttributes,
}

/// Server-side record of one authenticated session.
///
/// Identity fields (`id`, `expiration_time`) can only move through
/// [`Ticket::assign_identity`], [`Ticket::renew`] and [`Ticket::expire`].
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    id: Option<TicketId>,
    expiration_time: Timestamp,
    created_at: Timestamp,
    user: Principal,
    authentication_profile: Option<AuthenticationProfile>,
    authentication_profile_ids: Vec<String>,
    requestor_ids: Vec<String>,
    remote_idp: Option<String>,
    attributes: TicketAttributes,
}

impl Ticket {
    /// Rebuild a persisted ticket from its stored fields.
    pub fn from_parts(parts: TicketParts) -> Self {
        Self {
            id: Some(parts.id),
            expiration_time: parts.expiration_time,
            created_at: parts.created_at,
            user: parts.user,
            authentication_profile: parts.authentication_profile,
            authentication_profile_ids: parts.authentication_profile_ids,
            requestor_ids: parts.requestor_ids,
            remote_idp: parts.remote_idp,
            attributes: parts.attributes,
        }
    }

    /// Best-available stand-in for a ticket whose stored payload is unreadable.
    ///
    /// Only the id and expiration are meaningful.
    pub fn placeholder(id: TicketId, expiration_time: Timestamp) -> Self {
        Self {
            id: Some(id),
            expiration_time,
            created_at: 0,
            user: Principal::default(),
            authentication_profile: None,
            authentication_profile_ids: Vec::new(),
            requestor_ids: Vec::new(),
            remote_idp: None,
            attributes: TicketAttributes::default(),
        }
    }

    pub fn id(&self) -> Option<&TicketId> {
        self.id.as_ref()
    }

    /// Whether the ticket has been persisted at least once.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn expiration_time(&self) -> Timestamp {
        self.expiration_time
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// A ticket is expired once `now >= expiration_time`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expiration_time
    }

    pub fn user(&self) -> &Principal {
        &self.user
    }

    pub fn authentication_profile(&self) -> Option<&AuthenticationProfile> {
        self.authentication_profile.as_ref()
    }

    pub fn set_authentication_profile(&mut self, profile: AuthenticationProfile) {
        self.authentication_profile = Some(profile);
    }

    /// Authentication profile IDs in the order they were established.
    pub fn authentication_profile_ids(&self) -> &[String] {
        &self.authentication_profile_ids
    }

    /// Record a profile ID; duplicates keep their original position.
    pub fn add_authentication_profile_id(&mut self, profile_id: impl Into<String>) -> bool {
        let profile_id = profile_id.into();
        if self.authentication_profile_ids.contains(&profile_id) {
            return false;
        }
        self.authentication_profile_ids.push(profile_id);
        true
    }

    /// Relying parties currently attached, in attachment order.
    pub fn requestor_ids(&self) -> &[String] {
        &self.requestor_ids
    }

    pub fn has_requestor(&self, requestor_id: &str) -> bool {
        self.requestor_ids.iter().any(|r| r == requestor_id)
    }

    /// Attach a relying party. Returns false if it was already attached.
    pub fn attach_requestor(&mut self, requestor_id: impl Into<String>) -> bool {
        let requestor_id = requestor_id.into();
        if self.has_requestor(&requestor_id) {
            return false;
        }
        self.requestor_ids.push(requestor_id);
        true
    }

    /// Detach a relying party. Returns false if it was not attached.
    pub fn detach_requestor(&mut self, requestor_id: &str) -> bool {
        let before = self.requestor_ids.len();
        self.requestor_ids.retain(|r| r != requestor_id);
        before != self.requestor_ids.len()
    }

    /// Upstream identity provider the session was federated from.
    pub fn remote_idp(&self) -> Option<&str> {
        self.remote_idp.as_deref()
    }

    pub fn set_remote_idp(&mut self, idp: impl Into<String>) {
        self.remote_idp = Some(idp.into());
    }

    /// Whether `party` is still attached, either as a relying party or as
    /// the upstream identity provider.
    pub fn is_attached(&self, party: &str) -> bool {
        self.has_requestor(party) || self.remote_idp.as_deref() == Some(party)
    }

    pub fn attributes(&self) -> &TicketAttributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut TicketAttributes {
        &mut self.attributes
    }

    /// Assign identity on first persist.
    ///
    /// Fails if the ticket already carries an id.
    pub fn assign_identity(
        &mut self,
        id: TicketId,
        created_at: Timestamp,
        expiration_time: Timestamp,
    ) -> Result<(), TicketError> {
        if let Some(existing) = &self.id {
            return Err(TicketError::IdentityAlreadyAssigned {
                id: existing.clone(),
            });
        }
        self.id = Some(id);
        self.created_at = created_at;
        self.expiration_time = expiration_time;
        Ok(())
    }

    /// Push the expiration forward. A renewal never moves it backward.
    pub fn renew(&mut self, expiration_time: Timestamp) {
        self.expiration_time = self.expiration_time.max(expiration_time);
    }

    /// Mark the ticket expired as of `now`.
    pub fn expire(&mut self, now: Timestamp) {
        self.expiration_time = self.expiration_time.min(now);
    }
}

/// Builder for unpersisted tickets.
#[derive(Debug, Clone)]
pub struct TicketBuilder {
    ticket: Ticket,
}

impl TicketBuilder {
    /// Start a ticket for `user`.
    pub fn new(user: Principal) -> Self {
        Self {
            ticket: Ticket {
                id: None,
                expiration_time: 0,
                created_at: 0,
                user,
                authentication_profile: None,
                authentication_profile_ids: Vec::new(),
                requestor_ids: Vec::new(),
                remote_idp: None,
                attributes: TicketAttributes::default(),
            },
        }
    }

    pub fn authentication_profile(mut self, profile: AuthenticationProfile) -> Self {
        self.ticket.add_authentication_profile_id(profile.id.clone());
        self.ticket.authentication_profile = Some(profile);
        self
    }

    pub fn authentication_profile_id(mut self, profile_id: impl Into<String>) -> Self {
        self.ticket.add_authentication_profile_id(profile_id);
        self
    }

    pub fn requestor(mut self, requestor_id: impl Into<String>) -> Self {
        self.ticket.attach_requestor(requestor_id);
        self
    }

    pub fn remote_idp(mut self, idp: impl Into<String>) -> Self {
        self.ticket.set_remote_idp(idp);
        self
    }

    pub fn attributes(mut self, attributes: TicketAttributes) -> Self {
        self.ticket.attributes = attributes;
        self
    }

    pub fn build(self) -> Ticket {
        self.ticket
    }
}
