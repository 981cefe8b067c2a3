//! Energy storage sizing and cost per storage kind.

use serde::{Deserialize, Serialize};

use crate::domain::equipment::{StorageSpec, VoltageBus};

/// Gravitational potential of one tonne lifted `height_m` meters, in kWh:
/// m·g·h over J-per-kWh.
pub fn gravity_kwh_per_tonne(height_m: f64) -> f64 {
    (1000.0 * 9.81 * height_m.max(0.0)) / 3_600_000.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageEstimate {
    /// Nameplate storage the load requires (kWh).
    pub required_kwh: f64,
    pub cost: f64,
    /// Battery bank size at the DC bus voltage (Ah); only set for battery
    /// storage.
    pub battery_bank_ah: Option<f64>,
    /// Water mass a gravity system must cycle (tonnes); only set for gravity
    /// storage.
    pub gravity_mass_tonnes: Option<f64>,
}

/// Size the storage for the configured autonomy and price it.
///
/// Battery sizing inflates the autonomy energy by depth-of-discharge and
/// round-trip losses; both denominators are floored so a zeroed fraction
/// cannot blow up the figure.
pub fn size_storage(spec: &StorageSpec, bus: VoltageBus, daily_usage_kwh: f64) -> StorageEstimate {
    let daily_usage_kwh = daily_usage_kwh.max(0.0);

    match spec {
        StorageSpec::None => StorageEstimate {
            required_kwh: 0.0,
            cost: 0.0,
            battery_bank_ah: None,
            gravity_mass_tonnes: None,
        },
        StorageSpec::Battery {
            autonomy_days,
            usable_dod,
            round_trip_efficiency,
            cost_per_kwh,
        } => {
            let required_kwh = daily_usage_kwh * autonomy_days.max(0.0)
                / usable_dod.clamp(0.0, 1.0).max(0.1)
                / round_trip_efficiency.clamp(0.0, 1.0).max(0.1);
            StorageEstimate {
                required_kwh,
                cost: required_kwh * cost_per_kwh.max(0.0),
                battery_bank_ah: Some(required_kwh * 1000.0 / bus.volts()),
                gravity_mass_tonnes: None,
            }
        }
        StorageSpec::Gravity {
            autonomy_days,
            lift_height_m,
            cost_per_kwh,
        } => {
            let required_kwh = daily_usage_kwh * autonomy_days.max(0.0);
            let kwh_per_tonne = gravity_kwh_per_tonne(*lift_height_m).max(1e-6);
            StorageEstimate {
                required_kwh,
                cost: required_kwh * cost_per_kwh.max(0.0),
                battery_bank_ah: None,
                gravity_mass_tonnes: Some(required_kwh / kwh_per_tonne),
            }
        }
        StorageSpec::Custom { capacity_kwh, cost } => StorageEstimate {
            required_kwh: capacity_kwh.max(0.0),
            cost: cost.max(0.0),
            battery_bank_ah: None,
            gravity_mass_tonnes: None,
        },
    }
}
