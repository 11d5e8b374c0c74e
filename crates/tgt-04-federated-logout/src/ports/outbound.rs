//! # Outbound Port
//!
//! Read-only requestor metadata supplied by the host.

/// A single relying party or identity provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestorInfo {
    pub id: String,
    pub enabled: bool,
}

/// A named group of requestors sharing one configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestorPool {
    pub id: String,
    pub enabled: bool,
    pub members: Vec<String>,
}

impl RequestorPool {
    pub fn contains(&self, requestor_id: &str) -> bool {
        self.members.iter().any(|m| m == requestor_id)
    }
}

pub trait RequestorMetadata: Send + Sync {
    fn is_pool(&self, id: &str) -> bool;

    fn get_requestor(&self, id: &str) -> Option<RequestorInfo>;

    fn get_requestor_pool(&self, id: &str) -> Option<RequestorPool>;
}
