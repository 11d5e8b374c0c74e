//! # Session Configuration
//!
//! Defaults for every subsystem, overridden from `SSO_*` environment
//! variables.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `SSO_STORAGE_BACKEND` | `memory`, `file` or `rocksdb` |
//! | `SSO_DATA_DIR` | directory for file and RocksDB stores |
//! | `SSO_TICKET_TABLE`, `SSO_TICKET_PROBE` | ticket table name, validation probe |
//! | `SSO_TICKET_TTL_SECS` | ticket lifetime |
//! | `SSO_MAX_TICKETS` | ticket cap, 0 = unlimited |
//! | `SSO_RP_ALIAS_{ENABLED,TABLE,COLUMNS,PROBE}` | relying-party alias store |
//! | `SSO_IDP_ALIAS_{ENABLED,TABLE,COLUMNS,PROBE}` | identity-provider alias store |
//! | `SSO_LOGOUT_ENDPOINT`, `SSO_LOGOUT_WINDOW_SECS` | logout endpoint |
//! | `SSO_REQUESTORS`, `SSO_IDENTITY_PROVIDERS` | known parties, comma separated |
//! | `SSO_CLEANER_INTERVAL_SECS` | expiry sweep period, 0 = off |
//!
//! Alias columns are written `type=column,type=column`.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tgt_01_ticket_store::TicketStoreConfig;
use tgt_02_alias_store::{AliasRole, AliasStoreConfig};
use tgt_03_ticket_lifecycle::LifecycleConfig;
use tgt_04_federated_logout::{LogoutConfig, LogoutRole};
use thiserror::Error;

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub storage: StorageConfig,
    pub tickets: TicketStoreConfig,
    pub lifecycle: LifecycleConfig,
    pub relying_party_aliases: AliasStoreConfig,
    pub identity_provider_aliases: AliasStoreConfig,
    pub logout: LogoutSettings,
    pub cleaner: CleanerConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            tickets: TicketStoreConfig::default(),
            lifecycle: LifecycleConfig::default(),
            relying_party_aliases: AliasStoreConfig::relying_party(),
            identity_provider_aliases: AliasStoreConfig::identity_provider(),
            logout: LogoutSettings::default(),
            cleaner: CleanerConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}='{value}' is invalid: {reason}")]
    InvalidValue {
        var: String,
        value: String,
        reason: String,
    },

    #[error("Unknown storage backend '{value}' (expected memory, file or rocksdb)")]
    UnknownBackend { value: String },

    #[error("Ticket TTL must be greater than zero")]
    ZeroTtl,

    #[error("Logout endpoint must not be empty")]
    EmptyEndpoint,

    #[error("The {role} alias store is enabled but maps no alias types")]
    EmptyAliasColumns { role: AliasRole },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File,
    RocksDb,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            "rocksdb" => Ok(StorageBackend::RocksDb),
            _ => Err(ConfigError::UnknownBackend {
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl StorageConfig {
    /// Store file used by the `file` backend.
    pub fn file_path(&self) -> PathBuf {
        self.data_dir.join("sessions.db")
    }

    /// Database directory used by the `rocksdb` backend.
    pub fn rocksdb_path(&self) -> PathBuf {
        self.data_dir.join("rocksdb")
    }
}

/// Settings shared by both logout endpoints.
#[derive(Debug, Clone)]
pub struct LogoutSettings {
    pub endpoint: String,
    pub window_secs: u64,
    /// Relying parties allowed to send logout requests.
    pub requestors: Vec<String>,
    /// Upstream identity providers allowed to send logout requests.
    pub identity_providers: Vec<String>,
}

impl Default for LogoutSettings {
    fn default() -> Self {
        let defaults = LogoutConfig::default();
        Self {
            endpoint: defaults.endpoint,
            window_secs: defaults.window_secs,
            requestors: Vec::new(),
            identity_providers: Vec::new(),
        }
    }
}

impl LogoutSettings {
    pub fn config_for(&self, role: LogoutRole) -> LogoutConfig {
        let mut config = LogoutConfig::new(role, self.endpoint.clone());
        config.window_secs = self.window_secs;
        config
    }
}

#[derive(Debug, Clone)]
pub struct CleanerConfig {
    pub interval_secs: u64,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

impl CleanerConfig {
    /// `None` when the cleaner is switched off.
    pub fn interval(&self) -> Option<Duration> {
        (self.interval_secs > 0).then(|| Duration::from_secs(self.interval_secs))
    }
}

impl SessionConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("SSO_STORAGE_BACKEND") {
            config.storage.backend = value.parse()?;
        }
        if let Some(value) = lookup("SSO_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(value);
        }

        if let Some(value) = lookup("SSO_TICKET_TABLE") {
            config.tickets.table = value;
        }
        if let Some(value) = lookup("SSO_TICKET_PROBE") {
            config.tickets.validation_probe = Some(value);
        }
        if let Some(value) = lookup("SSO_TICKET_TTL_SECS") {
            config.lifecycle.ttl_secs = parse_number("SSO_TICKET_TTL_SECS", &value)?;
        }
        if let Some(value) = lookup("SSO_MAX_TICKETS") {
            let max: usize = parse_number("SSO_MAX_TICKETS", &value)?;
            config.lifecycle.max_tickets = (max > 0).then_some(max);
        }

        apply_alias_overrides(&lookup, "SSO_RP_ALIAS", &mut config.relying_party_aliases)?;
        apply_alias_overrides(&lookup, "SSO_IDP_ALIAS", &mut config.identity_provider_aliases)?;

        if let Some(value) = lookup("SSO_LOGOUT_ENDPOINT") {
            config.logout.endpoint = value;
        }
        if let Some(value) = lookup("SSO_LOGOUT_WINDOW_SECS") {
            config.logout.window_secs = parse_number("SSO_LOGOUT_WINDOW_SECS", &value)?;
        }
        if let Some(value) = lookup("SSO_REQUESTORS") {
            config.logout.requestors = parse_list(&value);
        }
        if let Some(value) = lookup("SSO_IDENTITY_PROVIDERS") {
            config.logout.identity_providers = parse_list(&value);
        }

        if let Some(value) = lookup("SSO_CLEANER_INTERVAL_SECS") {
            config.cleaner.interval_secs = parse_number("SSO_CLEANER_INTERVAL_SECS", &value)?;
        }

        Ok(config)
    }

    /// Reject settings the core cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lifecycle.ttl_secs == 0 {
            return Err(ConfigError::ZeroTtl);
        }
        if self.logout.endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        for (role, aliases) in [
            (AliasRole::RelyingParty, &self.relying_party_aliases),
            (AliasRole::IdentityProvider, &self.identity_provider_aliases),
        ] {
            if aliases.enabled && aliases.alias_columns.is_empty() {
                return Err(ConfigError::EmptyAliasColumns { role });
            }
        }
        Ok(())
    }
}

fn apply_alias_overrides<F>(
    lookup: &F,
    prefix: &str,
    aliases: &mut AliasStoreConfig,
) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |suffix: &str| format!("{prefix}_{suffix}");

    if let Some(value) = lookup(&var("ENABLED")) {
        aliases.enabled = parse_bool(&var("ENABLED"), &value)?;
    }
    if let Some(value) = lookup(&var("TABLE")) {
        aliases.table = value;
    }
    if let Some(value) = lookup(&var("COLUMNS")) {
        aliases.alias_columns = parse_columns(&var("COLUMNS"), &value)?;
    }
    if let Some(value) = lookup(&var("PROBE")) {
        aliases.validation_probe = Some(value);
    }
    Ok(())
}

fn invalid(var: &str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        var: var.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_number<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(var, value, e.to_string()))
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(invalid(var, value, "expected true or false")),
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// `type=column,type=column` into an alias type → column map.
pub fn parse_columns(var: &str, value: &str) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut columns = BTreeMap::new();
    for pair in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((alias_type, column)) = pair.split_once('=') else {
            return Err(invalid(var, value, format!("'{pair}' is not type=column")));
        };
        let (alias_type, column) = (alias_type.trim(), column.trim());
        if alias_type.is_empty() || column.is_empty() {
            return Err(invalid(var, value, format!("'{pair}' has an empty side")));
        }
        if columns
            .insert(alias_type.to_string(), column.to_string())
            .is_some()
        {
            return Err(invalid(var, value, format!("'{alias_type}' mapped twice")));
        }
    }
    Ok(columns)
}
