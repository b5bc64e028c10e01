use super::delivery::delivery_risk;
use super::integration::integration_risk;
use super::stability::stability_risk;
use super::view::AsOfView;
use crate::config::HealthWeights;
use crate::core::time::score;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthBreakdown {
    pub delivery_risk: u32,
    pub integration_risk: u32,
    pub stability_risk: u32,
}

/// Composite health, higher is healthier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScore {
    pub overall: u32,
    pub breakdown: HealthBreakdown,
}

impl HealthScore {
    pub fn from_breakdown(breakdown: HealthBreakdown, weights: &HealthWeights) -> Self {
        let weighted = breakdown.delivery_risk as f64 * weights.delivery
            + breakdown.integration_risk as f64 * weights.integration
            + breakdown.stability_risk as f64 * weights.stability;
        Self {
            overall: score(100.0 - weighted),
            breakdown,
        }
    }
}

pub fn health_as_of(view: &AsOfView<'_>) -> HealthScore {
    let breakdown = HealthBreakdown {
        delivery_risk: delivery_risk(view).score,
        integration_risk: integration_risk(view).score,
        stability_risk: stability_risk(view).score,
    };
    HealthScore::from_breakdown(breakdown, &view.settings.weights)
}
