//! Runtime configuration: command line and environment, plus the seed catalogue.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;

#[derive(Debug, Parser)]
#[command(name = "flash-sale", about = "Flash sale purchase arbitration service")]
pub struct Cli {
    /// Address the HTTP server listens on.
    #[arg(long, env = "FLASHSALE_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Purchase attempts allowed in flight before new ones are shed.
    #[arg(long, env = "FLASHSALE_CAPACITY", default_value_t = 100)]
    pub capacity: usize,

    /// How long a resolved outcome is replayed to a resubmitting pair. 0 disables it.
    #[arg(long, env = "FLASHSALE_DEDUP_WINDOW_MS", default_value_t = 2000)]
    pub dedup_window_ms: u64,

    /// Longest wait for room in a ledger or record queue before answering overloaded.
    #[arg(long, env = "FLASHSALE_LEDGER_WAIT_MS", default_value_t = 250)]
    pub ledger_wait_ms: u64,

    /// Shard actors per store.
    #[arg(long, env = "FLASHSALE_SHARDS", default_value_t = 4)]
    pub shards: usize,

    /// Queue length of each shard actor.
    #[arg(long, env = "FLASHSALE_BUFFER", default_value_t = 1024)]
    pub buffer: usize,

    /// Log a warning every N shed attempts. 0 disables it.
    #[arg(long, env = "FLASHSALE_SHED_LOG_EVERY", default_value_t = 100)]
    pub shed_log_every: u64,

    /// JSON array of `{"name", "count"}` to seed. Defaults to a demo catalogue.
    #[arg(long, env = "FLASHSALE_SEED")]
    pub seed: Option<PathBuf>,
}

impl Cli {
    pub fn sale_config(&self) -> SaleConfig {
        SaleConfig {
            capacity: self.capacity,
            dedup_window: Duration::from_millis(self.dedup_window_ms),
            ledger_wait: Duration::from_millis(self.ledger_wait_ms),
            shards: self.shards,
            buffer: self.buffer,
            shed_log_every: self.shed_log_every,
        }
    }

    /// The seed products: the `--seed` file if given, else the demo catalogue.
    pub fn seed_products(&self) -> Result<Vec<SeedProduct>, ConfigError> {
        match &self.seed {
            Some(path) => load_seed(path),
            None => Ok(demo_catalogue()),
        }
    }
}

/// Tuning of a running sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleConfig {
    pub capacity: usize,
    pub dedup_window: Duration,
    pub ledger_wait: Duration,
    pub shards: usize,
    pub buffer: usize,
    pub shed_log_every: u64,
}

impl Default for SaleConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            dedup_window: Duration::from_millis(2000),
            ledger_wait: Duration::from_millis(250),
            shards: 4,
            buffer: 1024,
            shed_log_every: 100,
        }
    }
}

/// Longest dedup window accepted.
pub const MAX_DEDUP_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

impl SaleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid("capacity must be at least 1".into()));
        }
        if self.capacity > Semaphore::MAX_PERMITS {
            return Err(ConfigError::Invalid(format!(
                "capacity must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }
        if self.dedup_window > MAX_DEDUP_WINDOW {
            return Err(ConfigError::Invalid(format!(
                "dedup window must be at most {}s",
                MAX_DEDUP_WINDOW.as_secs()
            )));
        }
        if self.shards == 0 {
            return Err(ConfigError::Invalid("shards must be at least 1".into()));
        }
        if self.buffer == 0 {
            return Err(ConfigError::Invalid("buffer must be at least 1".into()));
        }
        if self.ledger_wait.is_zero() {
            return Err(ConfigError::Invalid("ledger wait must be positive".into()));
        }
        Ok(())
    }
}

/// One product to seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    pub count: u32,
}

impl SeedProduct {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

pub fn demo_catalogue() -> Vec<SeedProduct> {
    vec![
        SeedProduct::new("Concert ticket - front row", 10),
        SeedProduct::new("Concert ticket - balcony", 50),
        SeedProduct::new("Limited edition vinyl", 5),
        SeedProduct::new("Tour hoodie", 100),
    ]
}

pub fn load_seed(path: &Path) -> Result<Vec<SeedProduct>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to read seed file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse seed file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let cli = Cli::try_parse_from(["flash-sale"]).unwrap();
        assert_eq!(cli.bind, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(cli.sale_config(), SaleConfig::default());
        assert_eq!(cli.seed_products().unwrap(), demo_catalogue());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "flash-sale",
            "--capacity",
            "8",
            "--dedup-window-ms",
            "0",
            "--shards",
            "2",
        ])
        .unwrap();
        let config = cli.sale_config();
        assert_eq!(config.capacity, 8);
        assert!(config.dedup_window.is_zero());
        assert_eq!(config.shards, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = SaleConfig {
            capacity: 0,
            ..SaleConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn capacity_beyond_the_permit_limit_is_rejected() {
        let config = SaleConfig {
            capacity: Semaphore::MAX_PERMITS + 1,
            ..SaleConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = SaleConfig {
            capacity: usize::MAX,
            ..SaleConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn unbounded_dedup_window_is_rejected() {
        let cli = Cli::try_parse_from([
            "flash-sale",
            "--dedup-window-ms",
            &u64::MAX.to_string(),
        ])
        .unwrap();
        assert!(matches!(
            cli.sale_config().validate(),
            Err(ConfigError::Invalid(_))
        ));

        let config = SaleConfig {
            dedup_window: Duration::MAX,
            ..SaleConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = SaleConfig {
            dedup_window: MAX_DEDUP_WINDOW,
            ..SaleConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn seed_file_is_read_as_name_count_pairs() {
        let path = std::env::temp_dir().join(format!("flash-sale-seed-{}.json", std::process::id()));
        std::fs::write(&path, r#"[{"name": "Mug", "count": 3}]"#).unwrap();

        let seed = load_seed(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(seed, vec![SeedProduct::new("Mug", 3)]);
    }

    #[test]
    fn missing_seed_file_is_an_io_error() {
        let err = load_seed(Path::new("/nonexistent/flash-sale/seed.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
