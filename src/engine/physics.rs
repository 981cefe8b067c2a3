//! Physical models and unit conversions shared by the estimation subsystems.
//!
//! Everything here is a pure function of its arguments; the named constants
//! are surfaced verbatim in the report's assumptions block.

/// km/h to m/s.
pub const KMH_TO_MS: f64 = 0.27778;

/// MJ/m² to kWh/m², for radiation sums as archive APIs report them.
pub const MJ_M2_TO_KWH_M2: f64 = 0.277778;

/// Sea-level air density (kg/m³).
pub const AIR_DENSITY_KG_M3: f64 = 1.225;

/// Reference turbine cut-in speed (m/s). No output below this.
pub const TURBINE_CUT_IN_MS: f64 = 3.0;

/// Reference turbine rated speed (m/s). Full rated output at and above this.
pub const TURBINE_RATED_MS: f64 = 11.0;

/// Reference turbine cut-out speed (m/s). The turbine furls above this.
pub const TURBINE_CUT_OUT_MS: f64 = 25.0;

/// Rated power of the 1 kW reference turbine (W).
pub const TURBINE_RATED_W: f64 = 1000.0;

/// Rayleigh scale from mean speed: c = 2/sqrt(pi) * mean ≈ 1.128 * mean.
pub const RAYLEIGH_SCALE_FACTOR: f64 = 1.128;

/// First-flush diverter loss per rain day (mm). Rainfall spent washing debris
/// off the catchment before clean collection begins.
pub const FIRST_FLUSH_MM_PER_RAIN_DAY: f64 = 1.0;

/// Power curve of the 1 kW reference turbine.
///
/// Zero outside the [cut-in, cut-out] window, rated at and above the rated
/// speed, cubic interpolation between cut-in and rated.
pub fn turbine_power(speed_ms: f64) -> f64 {
    if !speed_ms.is_finite() || speed_ms < TURBINE_CUT_IN_MS || speed_ms > TURBINE_CUT_OUT_MS {
        return 0.0;
    }
    if speed_ms >= TURBINE_RATED_MS {
        return TURBINE_RATED_W;
    }
    let t = (speed_ms - TURBINE_CUT_IN_MS) / (TURBINE_RATED_MS - TURBINE_CUT_IN_MS);
    TURBINE_RATED_W * t.powi(3)
}

/// Rayleigh (Weibull shape-2) probability density of wind speed, scaled from
/// the annual mean. Zero when the mean is zero, so callers never divide by it.
pub fn rayleigh_pdf(speed_ms: f64, mean_speed_ms: f64) -> f64 {
    if mean_speed_ms <= 0.0 || speed_ms < 0.0 || !speed_ms.is_finite() {
        return 0.0;
    }
    let c = RAYLEIGH_SCALE_FACTOR * mean_speed_ms;
    let r = speed_ms / c;
    (2.0 * speed_ms / (c * c)) * (-(r * r)).exp()
}

/// Annual rainfall available for collection after first-flush diversion,
/// floored at 0.
pub fn effective_rainfall(annual_mm: f64, rain_days: u32) -> f64 {
    (annual_mm - FIRST_FLUSH_MM_PER_RAIN_DAY * rain_days as f64).max(0.0)
}

/// Kinetic power density of moving air (W/m²): 0.5 · ρ · v³.
pub fn wind_power_density(speed_ms: f64) -> f64 {
    0.5 * AIR_DENSITY_KG_M3 * speed_ms.max(0.0).powi(3)
}
