//! # Static Requestor Metadata
//!
//! Fixed in-memory catalog, filled at startup from configuration.

use crate::ports::outbound::{RequestorInfo, RequestorMetadata, RequestorPool};
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct StaticRequestorMetadata {
    requestors: HashMap<String, RequestorInfo>,
    pools: HashMap<String, RequestorPool>,
}

impl StaticRequestorMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_requestor(mut self, id: impl Into<String>) -> Self {
        self.insert_requestor(id.into(), true);
        self
    }

    pub fn with_disabled_requestor(mut self, id: impl Into<String>) -> Self {
        self.insert_requestor(id.into(), false);
        self
    }

    pub fn with_pool<I, S>(mut self, id: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        let pool = RequestorPool {
            id: id.clone(),
            enabled: true,
            members: members.into_iter().map(Into::into).collect(),
        };
        self.pools.insert(id, pool);
        self
    }

    pub fn len(&self) -> usize {
        self.requestors.len() + self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert_requestor(&mut self, id: String, enabled: bool) {
        self.requestors
            .insert(id.clone(), RequestorInfo { id, enabled });
    }
}

impl RequestorMetadata for StaticRequestorMetadata {
    fn is_pool(&self, id: &str) -> bool {
        self.pools.contains_key(id)
    }

    fn get_requestor(&self, id: &str) -> Option<RequestorInfo> {
        self.requestors.get(id).cloned()
    }

    fn get_requestor_pool(&self, id: &str) -> Option<RequestorPool> {
        self.pools.get(id).cloned()
    }
}
