//! # System Lifecycle
//!
//! Builds, wires, seeds and stops the actors behind a sale.
//!
//! 1. **Creation**: ledger and record shards are created with their clients. No
//!    actor runs yet.
//! 2. **Context injection**: ledger shards get the catalog's stock board through
//!    `run(board)`; record shards need nothing.
//! 3. **Seeding**: products are registered through the ledger, which publishes them
//!    to the board.
//! 4. **Shutdown**: every client is dropped, each shard sees its channel close and
//!    exits, and the tasks are awaited. The ledger and record book are audited
//!    against each other first.
//!
//! The dependency graph is acyclic (the board is plain shared state, not a client),
//! so dropping the clients is enough to stop every shard.

pub mod sale_system;

pub use sale_system::*;
