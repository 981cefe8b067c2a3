//! The resource estimation engine.
//!
//! A deterministic, side-effect-free pipeline: one immutable input snapshot
//! in, one full-replace output snapshot out. No I/O, no clock, no hidden
//! state; identical inputs always produce identical outputs, so callers may
//! re-invoke it on every input change and from any number of threads.

pub mod food;
pub mod physics;
pub mod solar;
pub mod storage;
pub mod water;
pub mod wind;

use serde::{Deserialize, Serialize};

use crate::domain::climate::ClimateRecord;
use crate::domain::equipment::{EquipmentConfig, MountType};
use crate::domain::geometry::{CatchmentSurfaces, GeometryInput};
use crate::domain::report::{limitations, Assumptions};
use food::FoodEstimate;
use solar::{SizingMode, SolarEstimate};
use storage::StorageEstimate;
use water::WaterEstimate;
use wind::{WindEstimate, WindSite, WindViability};

/// Daily household demand.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Demand {
    pub daily_water_l: f64,
    pub daily_energy_kwh: f64,
}

impl Demand {
    fn sanitized(&self) -> Self {
        Self {
            daily_water_l: crate::domain::finite_or_zero(self.daily_water_l).max(0.0),
            daily_energy_kwh: crate::domain::finite_or_zero(self.daily_energy_kwh).max(0.0),
        }
    }
}

/// Geometry per resource layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeometrySet {
    pub solar: SizingMode,
    pub water: CatchmentSurfaces,
    pub food: GeometryInput,
}

/// The full immutable snapshot an estimation runs on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimationInputs {
    pub climate: ClimateRecord,
    pub equipment: EquipmentConfig,
    pub geometry: GeometrySet,
    pub demand: Demand,
    pub wind_site: WindSite,
}

/// Rolled-up costs, savings and payback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostSummary {
    pub solar_hardware: f64,
    pub wind_kit: f64,
    pub storage: f64,
    pub total: f64,
    pub annual_savings: f64,
    /// `None` when there are no savings to pay the system back; never an
    /// infinity leaked into the report.
    pub payback_years: Option<f64>,
}

/// Full-replace output snapshot; rebuilt from scratch on every call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimationOutput {
    pub solar: SolarEstimate,
    pub wind: WindEstimate,
    pub water: WaterEstimate,
    pub food: FoodEstimate,
    pub storage: StorageEstimate,
    pub costs: CostSummary,
    pub assumptions: Assumptions,
    pub limitations: Vec<String>,
}

/// Run the whole pipeline once.
pub fn estimate(inputs: &EstimationInputs) -> EstimationOutput {
    let climate = inputs.climate.sanitized();
    let equipment = inputs.equipment.sanitized();
    let demand = inputs.demand.sanitized();

    let solar = solar::estimate_solar(
        &equipment,
        inputs.geometry.solar,
        climate.solar_irradiance_kwh_m2_day,
        demand.daily_energy_kwh,
    );

    let wind = wind::estimate_wind(&inputs.wind_site, climate.wind_speed_kmh);

    // Only ground-mounted arrays feed the rain harvest.
    let panel_catchment_m2 = match equipment.mount {
        MountType::Ground => solar.panel_surface_m2,
        MountType::Roof => 0.0,
    };
    let water = water::estimate_water(
        &inputs.geometry.water,
        &climate,
        panel_catchment_m2,
        demand.daily_water_l,
    );

    let food = food::estimate_food(inputs.geometry.food.total_area_m2(), &climate);

    let storage = storage::size_storage(
        &equipment.storage,
        equipment.voltage_bus,
        demand.daily_energy_kwh,
    );

    let wind_kit = match wind.viability {
        WindViability::Viable => wind.install_cost,
        WindViability::LowWind => 0.0,
    };
    let solar_hardware = solar.hardware_cost;
    let storage_cost = storage.cost;
    let total = solar_hardware + wind_kit + storage_cost;
    let annual_savings =
        (solar.annual_yield_kwh + wind.annual_yield_kwh) * equipment.energy_value_per_kwh;
    let payback_years = if annual_savings > 0.0 {
        Some(total / annual_savings)
    } else {
        None
    };

    EstimationOutput {
        assumptions: Assumptions::for_run(&equipment, &inputs.wind_site),
        limitations: limitations(),
        solar,
        wind,
        water,
        food,
        storage,
        costs: CostSummary {
            solar_hardware,
            wind_kit,
            storage: storage_cost,
            total,
            annual_savings,
            payback_years,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payback_none_when_energy_worthless() {
        let mut inputs = test_inputs();
        inputs.equipment.energy_value_per_kwh = 0.0;
        let out = estimate(&inputs);
        assert_eq!(out.costs.annual_savings, 0.0);
        assert!(out.costs.payback_years.is_none());
    }

    #[test]
    fn test_total_cost_is_sum_of_parts() {
        let out = estimate(&test_inputs());
        let sum = out.costs.solar_hardware + out.costs.wind_kit + out.costs.storage;
        assert!((out.costs.total - sum).abs() < 1e-9);
        assert_eq!(out.costs.solar_hardware, out.solar.hardware_cost);
        assert_eq!(out.costs.storage, out.storage.cost);
    }

    #[test]
    fn test_ground_mount_feeds_rain_harvest() {
        let mut inputs = test_inputs();
        inputs.equipment.mount = MountType::Roof;
        let roof = estimate(&inputs);
        assert_eq!(roof.water.panel_yield_l, 0.0);

        inputs.equipment.mount = MountType::Ground;
        let ground = estimate(&inputs);
        assert!(ground.water.panel_yield_l > 0.0);
        assert!(ground.water.total_yield_l > roof.water.total_yield_l);
    }

    fn test_inputs() -> EstimationInputs {
        EstimationInputs {
            climate: ClimateRecord {
                solar_irradiance_kwh_m2_day: 5.0,
                rainfall_mm_year: 800.0,
                wind_speed_kmh: 18.0,
                monthly_rainfall_mm: [800.0 / 12.0; 12],
                monthly_solar_kwh: [5.0; 12],
                monthly_temp_c: [15.0; 12],
                annual_rain_days: 80,
            },
            equipment: EquipmentConfig::default(),
            geometry: GeometrySet {
                solar: SizingMode::Manual { capacity_kw: 5.0 },
                water: CatchmentSurfaces {
                    geometry: GeometryInput::Area(120.0),
                    ..Default::default()
                },
                food: GeometryInput::Area(400.0),
            },
            demand: Demand {
                daily_water_l: 150.0,
                daily_energy_kwh: 10.0,
            },
            wind_site: WindSite::default(),
        }
    }
}
