//! Wind subsystem: viability gate, Rayleigh-weighted capacity factor and
//! annual yield for a 1 kW reference turbine.

use serde::{Deserialize, Serialize};

use crate::engine::physics::{rayleigh_pdf, turbine_power, KMH_TO_MS, TURBINE_RATED_W};

/// Below this annual average the site is reported as low-wind instead of a
/// numeric yield.
pub const VIABILITY_THRESHOLD_KMH: f64 = 14.0;

/// Speed multiplier for the elevated (100 m) reference height. A rough
/// estimate standing in for a real wind-shear model, kept as a named constant
/// the caller can override.
pub const ELEVATED_SPEED_MULTIPLIER: f64 = 1.35;

/// Capacity-factor integration range and step (m/s).
pub const INTEGRATION_MAX_MS: f64 = 30.0;
pub const INTEGRATION_STEP_MS: f64 = 0.5;

pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Flat installed cost of the 1 kW reference turbine kit when viable.
pub const WIND_KIT_COST: f64 = 4000.0;

/// Selected reference height for the speed measurement.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HubHeight {
    #[default]
    Standard10m,
    Elevated100m,
}

/// Wind siting choices for one estimation run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct WindSite {
    #[serde(default)]
    pub height: HubHeight,
    /// Overrides [`ELEVATED_SPEED_MULTIPLIER`] when set.
    #[serde(default)]
    pub shear_multiplier: Option<f64>,
}

impl WindSite {
    /// The elevated-height multiplier in effect for this site: the override
    /// when it is finite and positive, else [`ELEVATED_SPEED_MULTIPLIER`].
    /// Reports echo this, never the raw override.
    pub fn elevated_multiplier(&self) -> f64 {
        self.shear_multiplier
            .filter(|m| m.is_finite() && *m > 0.0)
            .unwrap_or(ELEVATED_SPEED_MULTIPLIER)
    }

    fn height_multiplier(&self) -> f64 {
        match self.height {
            HubHeight::Standard10m => 1.0,
            HubHeight::Elevated100m => self.elevated_multiplier(),
        }
    }
}

/// Explicit output state: a low-wind site reports this, never a zero that
/// looks like a measurement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WindViability {
    Viable,
    LowWind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindEstimate {
    pub viability: WindViability,
    /// Average speed after the height adjustment (km/h).
    pub average_speed_kmh: f64,
    /// Ratio of average delivered power to rated power, in [0, 1].
    pub capacity_factor: f64,
    /// Annual yield of the 1 kW reference turbine (kWh), 0 when not viable.
    pub annual_yield_kwh: f64,
    /// Installed kit cost, 0 when not viable.
    pub install_cost: f64,
}

/// Rayleigh-weighted capacity factor of the reference turbine at the given
/// mean speed: numeric integral of pdf · power over 0..=30 m/s.
pub fn capacity_factor(mean_speed_ms: f64) -> f64 {
    let steps = (INTEGRATION_MAX_MS / INTEGRATION_STEP_MS) as usize;
    let mut mean_power_w = 0.0;
    for i in 0..=steps {
        let v = i as f64 * INTEGRATION_STEP_MS;
        mean_power_w += rayleigh_pdf(v, mean_speed_ms) * turbine_power(v) * INTEGRATION_STEP_MS;
    }
    (mean_power_w / TURBINE_RATED_W).clamp(0.0, 1.0)
}

/// Gate on viability, then integrate the capacity factor and price the kit.
pub fn estimate_wind(site: &WindSite, wind_speed_kmh: f64) -> WindEstimate {
    let average_speed_kmh = wind_speed_kmh.max(0.0) * site.height_multiplier();

    if average_speed_kmh < VIABILITY_THRESHOLD_KMH {
        return WindEstimate {
            viability: WindViability::LowWind,
            average_speed_kmh,
            capacity_factor: 0.0,
            annual_yield_kwh: 0.0,
            install_cost: 0.0,
        };
    }

    let cf = capacity_factor(average_speed_kmh * KMH_TO_MS);
    WindEstimate {
        viability: WindViability::Viable,
        average_speed_kmh,
        capacity_factor: cf,
        annual_yield_kwh: HOURS_PER_YEAR * cf,
        install_cost: WIND_KIT_COST,
    }
}
