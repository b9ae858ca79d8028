use crate::arbiter::ArbiterStatsSnapshot;
use crate::gateway::GatewayStatsSnapshot;
use crate::model::Outcome;
use serde::{Deserialize, Serialize};

/// Reply to a purchase attempt. `status` is `success` only for a granted attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashSaleResponse {
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl FlashSaleResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: "failed".into(),
            message: message.into(),
            outcome: None,
        }
    }
}

impl From<Outcome> for FlashSaleResponse {
    fn from(outcome: Outcome) -> Self {
        let status = if outcome.is_granted() { "success" } else { "failed" };
        Self {
            status: status.into(),
            message: outcome.message().into(),
            outcome: Some(outcome),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub arbiter: ArbiterStatsSnapshot,
    pub gateway: GatewayStatsSnapshot,
}
