//! # Flash Sale
//!
//! The purchase-arbitration core of a flash sale: many buyers racing for a few units
//! of stock, where no unit may be sold twice, no buyer may buy the same product
//! twice, and a burst of requests must be turned away quickly instead of queueing
//! without bound.
//!
//! ## Module Tour
//!
//! ### 1. State ([`ledger`], [`records`])
//! Two stores built on [`actor_framework`]. Each is split into shard actors; the actor
//! owning an id is its only writer.
//! - **Ledger**: remaining stock per product, with an atomic `TryDecrement`.
//! - **Records**: one [`PurchaseRecord`](model::PurchaseRecord) per (user, product),
//!   inserted if absent.
//!
//! ### 2. Decision ([`arbiter`])
//! Claims the pair, checks the records, decrements the ledger, records the purchase.
//! Returns one [`Outcome`](model::Outcome) per attempt.
//!
//! ### 3. Entry ([`gateway`], [`http`])
//! Replays recent outcomes, sheds attempts beyond capacity, and hands the rest to
//! the arbiter.
//!
//! ### 4. Reads ([`catalog`])
//! Product listing from the stock board the ledger publishes to. Never enters an
//! actor queue.
//!
//! ### 5. Wiring ([`lifecycle`], [`config`])
//! [`SaleSystem`](lifecycle::SaleSystem) starts, seeds, audits and stops everything.
//!
//! ## Observability
//! Everything logs through `tracing` with structured fields. Binaries install the
//! subscriber with [`actor_framework::tracing::setup_tracing`]:
//!
//! ```bash
//! RUST_LOG=info cargo run                   # grants, sheds, lifecycle
//! RUST_LOG=flash_sale=debug cargo run       # every decision
//! ```

pub mod arbiter;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod gateway;
pub mod http;
pub mod ledger;
pub mod lifecycle;
pub mod model;
pub mod records;
