//! Transparency block attached to every estimation output.
//!
//! The assumptions record collects the loss factors, thresholds and
//! conversion constants a run actually used; the limitations list names the
//! modeling shortcuts. Both are meant to be surfaced verbatim to end users.

use serde::{Deserialize, Serialize};

use crate::domain::equipment::EquipmentConfig;
use crate::engine::wind::WindSite;
use crate::engine::{food, physics, solar, water, wind};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assumptions {
    pub solar_loss_factor: f64,
    pub peak_draw_hours: f64,
    pub dc_ac_ratio: f64,

    pub first_flush_mm_per_rain_day: f64,
    pub panel_catchment_efficiency: f64,
    pub tank_buffer_factor: f64,
    pub fallback_storage_days: f64,

    pub wind_viability_threshold_kmh: f64,
    pub elevated_speed_multiplier: f64,
    pub turbine_rated_w: f64,
    pub rayleigh_scale_factor: f64,
    pub wind_kit_cost: f64,

    pub reference_area_per_person_m2: f64,
    pub reference_rainfall_mm: f64,
    pub reference_irradiance_kwh_m2_day: f64,

    pub kmh_to_ms: f64,
    pub mj_m2_to_kwh_m2: f64,
    pub air_density_kg_m3: f64,
}

impl Assumptions {
    /// Snapshot the constants in effect for one run.
    pub fn for_run(equipment: &EquipmentConfig, site: &WindSite) -> Self {
        Self {
            solar_loss_factor: equipment.loss_factor,
            peak_draw_hours: solar::PEAK_DRAW_HOURS,
            dc_ac_ratio: equipment.inverter_type.dc_ac_ratio(),
            first_flush_mm_per_rain_day: physics::FIRST_FLUSH_MM_PER_RAIN_DAY,
            panel_catchment_efficiency: water::PANEL_CATCHMENT_EFFICIENCY,
            tank_buffer_factor: water::TANK_BUFFER_FACTOR,
            fallback_storage_days: water::FALLBACK_STORAGE_DAYS,
            wind_viability_threshold_kmh: wind::VIABILITY_THRESHOLD_KMH,
            elevated_speed_multiplier: site.elevated_multiplier(),
            turbine_rated_w: physics::TURBINE_RATED_W,
            rayleigh_scale_factor: physics::RAYLEIGH_SCALE_FACTOR,
            wind_kit_cost: wind::WIND_KIT_COST,
            reference_area_per_person_m2: food::REFERENCE_AREA_PER_PERSON_M2,
            reference_rainfall_mm: food::REFERENCE_RAINFALL_MM,
            reference_irradiance_kwh_m2_day: food::REFERENCE_IRRADIANCE,
            kmh_to_ms: physics::KMH_TO_MS,
            mj_m2_to_kwh_m2: physics::MJ_M2_TO_KWH_M2,
            air_density_kg_m3: physics::AIR_DENSITY_KG_M3,
        }
    }
}

/// Caveats shipped with every report.
pub fn limitations() -> Vec<String> {
    [
        "Solar yield ignores shading, tilt and azimuth; the loss factor is a flat derate.",
        "The elevated wind speed multiplier is a rough approximation, not a wind-shear model.",
        "Wind yield is for a nominal 1 kW reference turbine with a generic power curve.",
        "First-flush loss is approximated as a fixed volume per rain day.",
        "Catchment material efficiencies are nominal values; real surfaces vary.",
        "Food productivity is a coarse climate blend; soil and crop choice dominate in practice.",
        "Payback is simple cost over annual savings, with no maintenance, degradation or financing.",
        "Estimates use historical climate for one trailing year; any single year can be atypical.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assumptions_reflect_run_inputs() {
        let mut equipment = EquipmentConfig::default();
        equipment.loss_factor = 0.8;
        let site = WindSite {
            shear_multiplier: Some(1.2),
            ..Default::default()
        };

        let a = Assumptions::for_run(&equipment, &site);
        assert_eq!(a.solar_loss_factor, 0.8);
        assert_eq!(a.elevated_speed_multiplier, 1.2);
        assert_eq!(a.wind_viability_threshold_kmh, 14.0);
        assert_eq!(a.tank_buffer_factor, 1.15);
    }

    #[test]
    fn test_garbage_shear_override_not_echoed() {
        // A NaN or non-positive override is ignored by the wind computation,
        // so the assumptions block must report the multiplier actually used.
        for bad in [f64::NAN, f64::INFINITY, -2.0, 0.0] {
            let site = WindSite {
                shear_multiplier: Some(bad),
                ..Default::default()
            };
            let a = Assumptions::for_run(&EquipmentConfig::default(), &site);
            assert_eq!(a.elevated_speed_multiplier, wind::ELEVATED_SPEED_MULTIPLIER);
        }
    }

    #[test]
    fn test_limitations_are_non_empty_prose() {
        let caveats = limitations();
        assert!(!caveats.is_empty());
        assert!(caveats.iter().all(|c| c.len() > 20));
    }
}
