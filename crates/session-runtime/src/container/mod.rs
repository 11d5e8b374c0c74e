//! # Session Core Container
//!
//! Builds every subsystem and wires them together.
//!
//! ## Initialization Order
//!
//! ```text
//! 1. Key-value store (memory | file | rocksdb)
//! 2. Provision tables on first bootstrap, then validate the configured
//!    columns against what is stored
//! 3. Ticket store, both alias stores, listener registry (+ audit listener)
//! 4. Lifecycle manager
//! 5. Logout services (relying-party role, identity-provider role)
//! ```
//!
//! Schema problems are fatal: the core refuses to start.

pub mod config;

use crate::adapters::AuditListener;
use config::{ConfigError, SessionConfig, StorageBackend};
use shared_bus::ListenerRegistry;
use shared_types::{
    FileBackedKVStore, InMemoryKVStore, KVStoreError, KeyValueStore, SchemaError,
    SystemTimeSource, TimeSource,
};
use std::sync::Arc;
use tgt_01_ticket_store::{TicketStore, TicketStoreError};
use tgt_02_alias_store::{AliasRole, AliasStore, AliasStoreConfig, AliasStoreError};
use tgt_03_ticket_lifecycle::{
    LifecycleDependencies, RandomTicketIdGenerator, TicketLifecycleManager,
};
use tgt_04_federated_logout::{
    FederatedLogoutService, LogoutDependencies, LogoutRole, StaticRequestorMetadata,
};
use thiserror::Error;
use tracing::info;

/// Backend chosen at startup.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Startup failures.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Storage unavailable: {0}")]
    Store(#[from] KVStoreError),

    #[error("Schema check failed: {0}")]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Tickets(#[from] TicketStoreError),

    #[error(transparent)]
    Aliases(#[from] AliasStoreError),

    #[error("Storage backend '{backend}' is not compiled in")]
    BackendUnavailable { backend: &'static str },
}

/// Every session subsystem, ready to serve.
pub struct SessionCore {
    pub config: SessionConfig,
    pub store: Arc<SharedStore>,
    pub listeners: Arc<ListenerRegistry>,
    pub audit: Arc<AuditListener>,
    pub lifecycle: Arc<TicketLifecycleManager<SharedStore>>,
    pub relying_party_logout: Arc<FederatedLogoutService<SharedStore>>,
    pub identity_provider_logout: Arc<FederatedLogoutService<SharedStore>>,
}

impl SessionCore {
    /// Open the configured backend and build the core on the system clock.
    pub fn open(config: SessionConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let store = open_store(&config)?;
        Self::with_store(config, store, Arc::new(SystemTimeSource))
    }

    /// Build the core on an already opened store.
    pub fn with_store(
        config: SessionConfig,
        store: SharedStore,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        let store = Arc::new(store);

        let tickets = Arc::new(TicketStore::with_defaults(
            store.clone(),
            config.tickets.clone(),
        ));
        config.tickets.schema().provision_if_absent(&**store)?;
        tickets.validate()?;

        let relying_party_aliases = alias_store(
            &store,
            AliasRole::RelyingParty,
            &config.relying_party_aliases,
        )?;
        let identity_provider_aliases = alias_store(
            &store,
            AliasRole::IdentityProvider,
            &config.identity_provider_aliases,
        )?;

        let listeners = Arc::new(ListenerRegistry::new());
        let audit = Arc::new(AuditListener::new());
        listeners.add_listener(audit.clone());

        let lifecycle = Arc::new(TicketLifecycleManager::new(
            LifecycleDependencies {
                tickets,
                relying_party_aliases,
                identity_provider_aliases,
                listeners: listeners.clone(),
                clock,
                ids: Arc::new(RandomTicketIdGenerator),
            },
            config.lifecycle.clone(),
        ));

        let metadata = config
            .logout
            .requestors
            .iter()
            .chain(&config.logout.identity_providers)
            .fold(StaticRequestorMetadata::new(), |m, id| m.with_requestor(id.clone()));
        let metadata = Arc::new(metadata);
        let logout = |role: LogoutRole| {
            Arc::new(FederatedLogoutService::new(
                LogoutDependencies {
                    lifecycle: lifecycle.clone(),
                    metadata: metadata.clone(),
                },
                config.logout.config_for(role),
            ))
        };
        let relying_party_logout = logout(LogoutRole::RelyingParty);
        let identity_provider_logout = logout(LogoutRole::IdentityProvider);

        info!(
            backend = ?config.storage.backend,
            ttl_secs = config.lifecycle.ttl_secs,
            known_parties = metadata.len(),
            "[runtime] Session core ready"
        );

        Ok(Self {
            config,
            store,
            listeners,
            audit,
            lifecycle,
            relying_party_logout,
            identity_provider_logout,
        })
    }
}

fn alias_store(
    store: &Arc<SharedStore>,
    role: AliasRole,
    config: &AliasStoreConfig,
) -> Result<Arc<AliasStore<SharedStore>>, CoreError> {
    if config.enabled {
        config.schema().provision_if_absent(&**store)?;
    }
    let aliases = AliasStore::new(store.clone(), role, config.clone());
    aliases.validate()?;
    Ok(Arc::new(aliases))
}

fn open_store(config: &SessionConfig) -> Result<SharedStore, CoreError> {
    let storage = &config.storage;
    if storage.backend != StorageBackend::Memory {
        std::fs::create_dir_all(&storage.data_dir).map_err(|e| KVStoreError::IOError {
            message: format!("cannot create {}: {e}", storage.data_dir.display()),
        })?;
    }

    let store: SharedStore = match storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryKVStore::new()),
        StorageBackend::File => Arc::new(FileBackedKVStore::open(storage.file_path())?),
        #[cfg(feature = "rocksdb")]
        StorageBackend::RocksDb => Arc::new(crate::adapters::storage::RocksDbStore::open(
            crate::adapters::storage::RocksDbConfig::new(storage.rocksdb_path()),
        )?),
        #[cfg(not(feature = "rocksdb"))]
        StorageBackend::RocksDb => {
            return Err(CoreError::BackendUnavailable { backend: "rocksdb" })
        }
    };
    info!(backend = ?storage.backend, "[runtime] Storage opened");
    Ok(store)
}
