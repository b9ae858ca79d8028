use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The decision returned once per purchase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Granted,
    RejectedSoldOut,
    RejectedDuplicate,
    /// The attempt was turned away before a unit was taken. Safe to retry.
    RejectedOverloaded,
}

impl Outcome {
    pub fn is_granted(self) -> bool {
        matches!(self, Outcome::Granted)
    }

    /// Wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Granted => "granted",
            Outcome::RejectedSoldOut => "rejected-sold-out",
            Outcome::RejectedDuplicate => "rejected-duplicate",
            Outcome::RejectedOverloaded => "rejected-overloaded",
        }
    }

    /// Message shown to the buyer.
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Granted => "Purchase successful",
            Outcome::RejectedSoldOut => "Sorry, this product is sold out",
            Outcome::RejectedDuplicate => "You have already purchased this product",
            Outcome::RejectedOverloaded => "The sale is busy right now, please try again",
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
