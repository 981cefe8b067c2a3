//! Water subsystem: rain catchment yield, per-material breakdown, demand
//! coverage and tank sizing.
//!
//! Tank sizing runs a 24-month (two repeated annual cycles) mass balance so a
//! dry season straddling the calendar year boundary is not under-sized; a
//! naive single-year pass would reset the deficit at New Year.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::domain::climate::ClimateRecord;
use crate::domain::geometry::{CatchmentSurfaces, GeometryInput};
use crate::engine::physics::effective_rainfall;

/// Ground-mounted panels are treated as a 90%-efficient catchment surface.
pub const PANEL_CATCHMENT_EFFICIENCY: f64 = 0.9;

/// Safety buffer applied to the simulated worst deficit.
pub const TANK_BUFFER_FACTOR: f64 = 1.15;

/// Suggested tank sizes round up to this granularity (liters).
pub const TANK_ROUND_L: f64 = 1000.0;

/// Fallback sizing when monthly data is absent or demand is zero: this many
/// days of demand.
pub const FALLBACK_STORAGE_DAYS: f64 = 90.0;

pub const DAYS_IN_MONTH: [f64; 12] = [
    31.0, 28.0, 31.0, 30.0, 31.0, 30.0, 31.0, 31.0, 30.0, 31.0, 30.0, 31.0,
];

/// One material group of the catchment breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialYield {
    pub material: String,
    pub area_m2: f64,
    pub effective_area_m2: f64,
    pub annual_yield_l: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterEstimate {
    /// Annual rainfall after first-flush diversion (mm).
    pub effective_rainfall_mm: f64,
    /// Material-weighted catchment area (m²).
    pub effective_catchment_m2: f64,
    /// Yield off the configured catchment surfaces (L/yr). 1 mm over 1 m²
    /// is 1 L, so mm · m² is used as liters directly.
    pub catchment_yield_l: f64,
    /// Extra yield off ground-mounted panel surfaces (L/yr), 0 for roof mount.
    pub panel_yield_l: f64,
    pub total_yield_l: f64,
    /// Per-material groups, sorted descending by yield. Sums to the
    /// catchment figures above.
    pub breakdown: Vec<MaterialYield>,
    /// Annual yield as a percentage of annual demand, 0 when demand is 0.
    pub demand_coverage_percent: f64,
    /// Worst running deficit over the simulated 24 months (L).
    pub required_tank_l: f64,
    /// Required tank with buffer, rounded up to the nearest 1000 L.
    pub suggested_tank_l: f64,
}

/// Estimate catchment yield and size the storage tank.
///
/// `panel_surface_m2` is the rain-collecting panel area and must already be 0
/// unless the array is ground-mounted.
pub fn estimate_water(
    surfaces: &CatchmentSurfaces,
    climate: &ClimateRecord,
    panel_surface_m2: f64,
    daily_demand_l: f64,
) -> WaterEstimate {
    let rain_mm = effective_rainfall(climate.rainfall_mm_year, climate.annual_rain_days);
    let daily_demand_l = daily_demand_l.max(0.0);
    let panel_surface_m2 = panel_surface_m2.max(0.0);

    let breakdown = material_breakdown(surfaces, rain_mm);
    let effective_catchment_m2: f64 = breakdown.iter().map(|g| g.effective_area_m2).sum();

    let catchment_yield_l = rain_mm * effective_catchment_m2;
    let panel_yield_l = rain_mm * panel_surface_m2 * PANEL_CATCHMENT_EFFICIENCY;
    let total_yield_l = catchment_yield_l + panel_yield_l;

    let annual_demand_l = daily_demand_l * 365.0;
    let demand_coverage_percent = if annual_demand_l > 0.0 {
        100.0 * total_yield_l / annual_demand_l
    } else {
        0.0
    };

    let (required_tank_l, suggested_tank_l) = size_tank(
        &climate.monthly_rainfall_mm,
        effective_catchment_m2,
        panel_surface_m2,
        daily_demand_l,
    );

    WaterEstimate {
        effective_rainfall_mm: rain_mm,
        effective_catchment_m2,
        catchment_yield_l,
        panel_yield_l,
        total_yield_l,
        breakdown,
        demand_coverage_percent,
        required_tank_l,
        suggested_tank_l,
    }
}

/// Group catchment surfaces by material and compute per-group yield.
fn material_breakdown(surfaces: &CatchmentSurfaces, rain_mm: f64) -> Vec<MaterialYield> {
    let polygons: Vec<(String, f64, f64)> = match &surfaces.geometry {
        GeometryInput::Area(area) => {
            let area = area.max(0.0);
            vec![(
                surfaces.default_material.clone(),
                area,
                area * surfaces.efficiency(None),
            )]
        }
        GeometryInput::Polygons(polys) => polys
            .iter()
            .map(|p| {
                let area = p.area_m2.max(0.0);
                let eff = surfaces.efficiency(p.material.as_deref());
                (
                    surfaces.material_label(p.material.as_deref()).to_string(),
                    area,
                    area * eff,
                )
            })
            .collect(),
    };

    // BTreeMap keeps grouping deterministic, so equal-yield groups cannot
    // reorder between otherwise identical runs.
    let mut groups: std::collections::BTreeMap<String, (f64, f64)> = std::collections::BTreeMap::new();
    for (material, raw, eff) in polygons {
        let entry = groups.entry(material).or_insert((0.0, 0.0));
        entry.0 += raw;
        entry.1 += eff;
    }

    groups
        .into_iter()
        .map(|(material, (area_m2, effective_area_m2))| MaterialYield {
            material,
            area_m2,
            effective_area_m2,
            annual_yield_l: rain_mm * effective_area_m2,
        })
        .sorted_by(|a, b| {
            b.annual_yield_l
                .partial_cmp(&a.annual_yield_l)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.material.cmp(&b.material))
        })
        .collect()
}

/// 24-month rolling deficit simulation.
///
/// Two repeated annual cycles (`m = i % 12`) let a deficit carry across the
/// December/January boundary. Returns (required, suggested) liters.
fn size_tank(
    monthly_rainfall_mm: &[f64; 12],
    effective_catchment_m2: f64,
    panel_surface_m2: f64,
    daily_demand_l: f64,
) -> (f64, f64) {
    let have_monthly = monthly_rainfall_mm.iter().sum::<f64>() > 0.0;
    if daily_demand_l <= 0.0 || !have_monthly {
        let fallback = daily_demand_l * FALLBACK_STORAGE_DAYS;
        return (fallback, fallback);
    }

    let mut deficit = 0.0_f64;
    let mut worst = 0.0_f64;
    for i in 0..24 {
        let m = i % 12;
        let supply = monthly_rainfall_mm[m] * effective_catchment_m2
            + monthly_rainfall_mm[m] * panel_surface_m2 * PANEL_CATCHMENT_EFFICIENCY;
        let demand = daily_demand_l * DAYS_IN_MONTH[m];
        deficit = (deficit + demand - supply).max(0.0);
        worst = worst.max(deficit);
    }

    let suggested = (worst * TANK_BUFFER_FACTOR / TANK_ROUND_L).ceil() * TANK_ROUND_L;
    (worst, suggested)
}
