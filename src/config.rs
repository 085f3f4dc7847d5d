//! Engine-level configuration, loaded from the environment (optionally
//! via a `.env` file) the same way the teacher's root package loaded
//! its database configuration — a `Lazy`-style global would fit just
//! as well, but this config is consumed exactly once at startup by the
//! demo binary, so a plain constructor is simpler.

use opseq_domain::PrimaryKeyKind;
use std::env;

#[derive(Debug, Clone)]
pub struct TableNames {
    pub operations: String,
    pub operation_errors: String,
}

impl Default for TableNames {
    fn default() -> Self {
        TableNames { operations: "operations".to_string(), operation_errors: "operation_errors".to_string() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportingConfig {
    /// Whether to emit a heartbeat event bus observer (cheap liveness signal).
    pub pulse: bool,
    /// Whether to emit verbose per-attempt tracing, mirroring a request
    /// profiler toggle.
    pub telescope: bool,
}

/// Everything the spec's "Configuration knobs" enumerate. Several of
/// these (`table_names`, `operation_error_model`) only matter to a
/// relational backend this crate doesn't ship, but they're still
/// parsed so an operator's existing environment round-trips cleanly.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub primary_key_type: PrimaryKeyKind,
    pub table_names: TableNames,
    pub operation_error_model: String,
    pub reporting: ReportingConfig,
    pub parallelism: usize,
    pub default_max_attempts: u32,
    pub default_initial_backoff_ms: u64,
    pub default_backoff_multiplier: f64,
    pub default_max_backoff_ms: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },
}

impl EngineConfig {
    /// Loads `.env` if present (ignored if missing — parity with the
    /// teacher, which never required one for local runs either) and
    /// then reads each knob from the environment, falling back to the
    /// spec's documented defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let primary_key_type = match env::var("OPSEQ_PRIMARY_KEY_TYPE").ok().as_deref() {
            None | Some("id") => PrimaryKeyKind::Id,
            Some("uuid") => PrimaryKeyKind::Uuid,
            Some("ulid") => PrimaryKeyKind::Ulid,
            Some(other) => return Err(ConfigError::InvalidValue { field: "primary_key_type", value: other.to_string() }),
        };

        let parallelism = env::var("OPSEQ_PARALLELISM")
            .ok()
            .map(|v| v.parse::<usize>().map_err(|_| ConfigError::InvalidValue { field: "parallelism", value: v.clone() }))
            .transpose()?
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4));

        let default_max_attempts = env::var("OPSEQ_DEFAULT_MAX_ATTEMPTS")
            .ok()
            .map(|v| v.parse::<u32>().map_err(|_| ConfigError::InvalidValue { field: "default_max_attempts", value: v.clone() }))
            .transpose()?
            .unwrap_or(1);

        Ok(EngineConfig {
            primary_key_type,
            table_names: TableNames::default(),
            operation_error_model: env::var("OPSEQ_OPERATION_ERROR_MODEL").unwrap_or_else(|_| "OperationError".to_string()),
            reporting: ReportingConfig {
                pulse: env::var("OPSEQ_REPORTING_PULSE").map(|v| v == "1" || v == "true").unwrap_or(false),
                telescope: env::var("OPSEQ_REPORTING_TELESCOPE").map(|v| v == "1" || v == "true").unwrap_or(false),
            },
            parallelism,
            default_max_attempts,
            default_initial_backoff_ms: 200,
            default_backoff_multiplier: 2.0,
            default_max_backoff_ms: 30_000,
        })
    }
}
