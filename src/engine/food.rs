//! Food subsystem: climate-scaled land productivity and people-fed estimate.

use serde::{Deserialize, Serialize};

use crate::domain::climate::ClimateRecord;

/// Intensive cultivation area feeding one person at reference productivity
/// (m²).
pub const REFERENCE_AREA_PER_PERSON_M2: f64 = 100.0;

/// Rainfall (mm/yr) and irradiance (kWh/m²/day) at which the productivity
/// factor is 1.0.
pub const REFERENCE_RAINFALL_MM: f64 = 700.0;
pub const REFERENCE_IRRADIANCE: f64 = 4.0;

pub const RAINFALL_WEIGHT: f64 = 0.6;
pub const IRRADIANCE_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodEstimate {
    pub allocated_area_m2: f64,
    /// Climate productivity relative to the reference yield, in [0.5, 1.6].
    pub productivity_factor: f64,
    pub area_per_person_m2: f64,
    pub people_fed: u32,
}

/// Blend rainfall and irradiance into a productivity factor and divide the
/// allocated land by the per-person requirement.
pub fn estimate_food(allocated_area_m2: f64, climate: &ClimateRecord) -> FoodEstimate {
    let allocated_area_m2 = allocated_area_m2.max(0.0);

    let rain_term = (climate.rainfall_mm_year / REFERENCE_RAINFALL_MM).clamp(0.4, 1.6);
    let sun_term = (climate.solar_irradiance_kwh_m2_day / REFERENCE_IRRADIANCE).clamp(0.6, 1.4);
    let productivity_factor =
        (RAINFALL_WEIGHT * rain_term + IRRADIANCE_WEIGHT * sun_term).clamp(0.5, 1.6);

    let area_per_person_m2 = REFERENCE_AREA_PER_PERSON_M2 / productivity_factor.max(0.2);
    let people_fed = (allocated_area_m2 / area_per_person_m2).floor() as u32;

    FoodEstimate {
        allocated_area_m2,
        productivity_factor,
        area_per_person_m2,
        people_fed,
    }
}
