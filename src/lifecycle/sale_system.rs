use crate::arbiter::Arbiter;
use crate::catalog::{Catalog, StockBoard};
use crate::clients::{LedgerClient, RecordClient};
use crate::config::{SaleConfig, SeedProduct};
use crate::gateway::Gateway;
use crate::http::AppState;
use crate::ledger::LedgerError;
use crate::model::ProductId;
use crate::records::RecordError;
use actor_framework::ActorClient;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Records(#[from] RecordError),
    #[error("Actor task failed: {0}")]
    ActorFailed(String),
}

/// Ledger versus record book, per product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub products: usize,
    /// Units taken from the ledger (`initial - remaining`, summed).
    pub sold: u64,
    pub recorded: u64,
    /// Products whose sold units differ from their purchase records.
    pub mismatched: Vec<ProductId>,
}

impl AuditReport {
    pub fn is_consistent(&self) -> bool {
        self.mismatched.is_empty()
    }
}

/// The running sale: every actor of the ledger and record book plus the services on top.
///
/// # Example
///
/// ```ignore
/// let system = SaleSystem::start(&SaleConfig::default());
/// system.seed(&demo_catalogue()).await?;
///
/// let outcome = system.gateway.submit(UserId(1), ProductId(1)).await?;
///
/// let report = system.shutdown().await?;
/// assert!(report.is_consistent());
/// ```
pub struct SaleSystem {
    pub ledger: LedgerClient,
    pub records: RecordClient,
    pub catalog: Catalog,
    pub gateway: Gateway<Arbiter>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl SaleSystem {
    /// Spawns all shard actors. Must be called inside a Tokio runtime.
    pub fn start(config: &SaleConfig) -> Self {
        let (ledger_actors, ledger) =
            crate::ledger::new(config.shards, config.buffer, config.ledger_wait);
        let (record_actors, records) =
            crate::records::new(config.shards, config.buffer, config.ledger_wait);

        let board = StockBoard::new();
        let mut handles = Vec::with_capacity(ledger_actors.len() + record_actors.len());
        for actor in ledger_actors {
            handles.push(tokio::spawn(actor.run(board.clone())));
        }
        for actor in record_actors {
            handles.push(tokio::spawn(actor.run(())));
        }

        let arbiter = Arbiter::new(ledger.clone(), records.clone());
        let gateway = Gateway::new(
            arbiter,
            config.capacity,
            config.dedup_window,
            config.shed_log_every,
        );

        info!(
            shards = config.shards,
            capacity = config.capacity,
            "Sale system started"
        );

        Self {
            ledger,
            records,
            catalog: Catalog::new(board),
            gateway,
            handles,
        }
    }

    /// Registers `products` in order; the first gets id 1 on a fresh system.
    pub async fn seed(&self, products: &[SeedProduct]) -> Result<Vec<ProductId>, SystemError> {
        let mut ids = Vec::with_capacity(products.len());
        for product in products {
            let id = self.ledger.register(&product.name, product.count).await?;
            info!(product_id = %id, name = %product.name, stock = product.count, "Seeded");
            ids.push(id);
        }
        Ok(ids)
    }

    pub fn arbiter(&self) -> &Arbiter {
        self.gateway.arbiter()
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.catalog.clone(), self.gateway.clone())
    }

    /// Compares units taken from each product with its purchase records.
    ///
    /// Only meaningful while no attempt is in flight: an attempt between decrement
    /// and record shows up as a mismatch.
    pub async fn audit(&self) -> Result<AuditReport, SystemError> {
        let entries = self.ledger.list().await?;
        let records = self.records.list().await?;

        let mut recorded: HashMap<ProductId, u64> = HashMap::new();
        for record in &records {
            *recorded.entry(record.key.product).or_default() += 1;
        }

        let mut report = AuditReport {
            products: entries.len(),
            recorded: records.len() as u64,
            ..AuditReport::default()
        };
        for entry in &entries {
            let sold = u64::from(entry.sold());
            let granted = recorded.get(&entry.id).copied().unwrap_or(0);
            report.sold += sold;
            if sold != granted {
                warn!(product_id = %entry.id, sold, granted, "Ledger and records disagree");
                report.mismatched.push(entry.id);
            }
        }
        report.mismatched.sort();
        Ok(report)
    }

    /// Audits, then stops every actor and waits for it to finish.
    ///
    /// Clones of the gateway or clients held elsewhere (for example by the HTTP
    /// router) must be dropped first, or the shards never see their channels close.
    pub async fn shutdown(self) -> Result<AuditReport, SystemError> {
        info!("Shutting down sale system...");
        let report = self.audit().await?;
        if report.is_consistent() {
            info!(sold = report.sold, recorded = report.recorded, "Audit clean");
        } else {
            error!(mismatched = ?report.mismatched, "Audit found inconsistencies");
        }

        drop(self.gateway);
        drop(self.ledger);
        drop(self.records);
        drop(self.catalog);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(SystemError::ActorFailed(e.to_string()));
            }
        }

        info!("Sale system shut down");
        Ok(report)
    }
}
