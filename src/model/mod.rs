//! Pure data structures of the sale. [`StockEntry`] and [`PurchaseRecord`] implement
//! [`ActorEntity`](actor_framework::ActorEntity) in the [`ledger`](crate::ledger) and
//! [`records`](crate::records) modules.

pub mod ids;
pub mod outcome;
pub mod product;
pub mod purchase;

pub use ids::*;
pub use outcome::*;
pub use product::*;
pub use purchase::*;
