//! Live metrics engine
//!
//! Recomputes delivery, integration and stability risk, the composite health
//! score, the health trend, velocity and contribution statistics straight
//! from a [`Snapshot`] on every call. Nothing is cached between calls and
//! nothing produced by the derived-entity builder is read back.
//!
//! Every risk goes through [`view::AsOfView`]: the live reading uses
//! `now` as the cutoff, each trend point uses the end of its own day.

pub mod contributions;
pub mod delivery;
pub mod health;
pub mod integration;
pub mod stability;
pub mod trend;
pub mod velocity;
pub mod view;

pub use contributions::ContributionStat;
pub use delivery::DeliveryFactors;
pub use health::{HealthBreakdown, HealthScore};
pub use integration::IntegrationFactors;
pub use stability::StabilityFactors;
pub use trend::{HealthTrend, TrendPoint};
pub use velocity::VelocityRow;
pub use view::AsOfView;

use crate::config::Settings;
use crate::core::Snapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A 0-100 risk score together with the counts that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskReading<F> {
    pub score: u32,
    pub factors: F,
}

pub struct MetricsEngine<'a> {
    snapshot: &'a Snapshot,
    settings: &'a Settings,
    now: DateTime<Utc>,
}

impl<'a> MetricsEngine<'a> {
    pub fn new(snapshot: &'a Snapshot, settings: &'a Settings, now: DateTime<Utc>) -> Self {
        Self {
            snapshot,
            settings,
            now,
        }
    }

    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    pub fn settings(&self) -> &'a Settings {
        self.settings
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn live_view(&self) -> AsOfView<'a> {
        AsOfView::new(self.snapshot, self.settings, self.now)
    }

    pub fn delivery_risk(&self) -> RiskReading<DeliveryFactors> {
        delivery::delivery_risk(&self.live_view())
    }

    pub fn integration_risk(&self) -> RiskReading<IntegrationFactors> {
        integration::integration_risk(&self.live_view())
    }

    pub fn stability_risk(&self) -> RiskReading<StabilityFactors> {
        stability::stability_risk(&self.live_view())
    }

    pub fn health_score(&self) -> HealthScore {
        self.health_as_of(self.now)
    }

    /// Composite health using only data visible at `cutoff`.
    pub fn health_as_of(&self, cutoff: DateTime<Utc>) -> HealthScore {
        health::health_as_of(&AsOfView::new(self.snapshot, self.settings, cutoff))
    }

    pub fn health_trend(&self) -> HealthTrend {
        trend::health_trend(self.snapshot, self.settings, self.now)
    }

    pub fn velocity(&self) -> Vec<VelocityRow> {
        velocity::velocity(self.snapshot, self.now)
    }

    pub fn contributions(&self) -> Vec<ContributionStat> {
        contributions::contributions(self.snapshot)
    }
}
