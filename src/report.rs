//! The composite `/health` document.

use crate::metrics::{
    ContributionStat, HealthBreakdown, HealthScore, HealthTrend, MetricsEngine, TrendPoint,
    VelocityRow,
};
use serde::{Deserialize, Serialize};
use tracing::info_span;

/// Health score with its trend attached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthWithTrend {
    pub overall: u32,
    pub breakdown: HealthBreakdown,
    pub trend: Vec<TrendPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthWithTrend {
    pub fn new(score: HealthScore, trend: HealthTrend) -> Self {
        Self {
            overall: score.overall,
            breakdown: score.breakdown,
            trend: trend.trend,
            message: trend.message,
        }
    }

    pub fn score(&self) -> HealthScore {
        HealthScore {
            overall: self.overall,
            breakdown: self.breakdown,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub health_score: HealthWithTrend,
    pub velocity: Vec<VelocityRow>,
    pub contributions: Vec<ContributionStat>,
}

pub fn health_report(engine: &MetricsEngine<'_>) -> HealthReport {
    let _span = info_span!("health_report", now = %engine.now()).entered();
    HealthReport {
        health_score: HealthWithTrend::new(engine.health_score(), engine.health_trend()),
        velocity: engine.velocity(),
        contributions: engine.contributions(),
    }
}
