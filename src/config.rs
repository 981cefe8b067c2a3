use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::domain::climate::ClimateRecord;
use crate::domain::equipment::EquipmentConfig;
use crate::domain::geometry::{CatchmentSurfaces, GeometryInput};
use crate::engine::solar::SizingMode;
use crate::engine::wind::WindSite;
use crate::engine::{Demand, EstimationInputs, GeometrySet};
use crate::provider::GeoLocation;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub location: LocationConfig,
    pub demand: Demand,
    pub equipment: EquipmentConfig,
    pub geometry: GeometryConfig,
    #[serde(default)]
    pub wind_site: WindSite,
    pub climate: ClimateSource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub name: Option<String>,
    /// When set, the address is geocoded and overrides the coordinates.
    #[serde(default)]
    pub address: Option<String>,
}

impl LocationConfig {
    pub fn geo(&self) -> GeoLocation {
        GeoLocation {
            latitude: self.latitude,
            longitude: self.longitude,
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeometryConfig {
    pub solar: SizingMode,
    pub water: CatchmentSurfaces,
    pub food: GeometryInput,
}

/// Where the climate record comes from.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ClimateSource {
    /// Fetch a trailing 12-month window from the Open-Meteo archive.
    OpenMeteo,
    /// Use a climate record inlined in the configuration.
    Inline {
        solar_irradiance_kwh_m2_day: f64,
        rainfall_mm_year: f64,
        wind_speed_kmh: f64,
        #[serde(default)]
        monthly_rainfall_mm: Vec<f64>,
        #[serde(default)]
        monthly_solar_kwh: Vec<f64>,
        #[serde(default)]
        monthly_temp_c: Vec<f64>,
        annual_rain_days: u32,
    },
}

impl ClimateSource {
    /// Build the record for an inline source. Empty monthly series are
    /// accepted and become all-zero months.
    pub fn inline_record(&self) -> Result<Option<ClimateRecord>> {
        let ClimateSource::Inline {
            solar_irradiance_kwh_m2_day,
            rainfall_mm_year,
            wind_speed_kmh,
            monthly_rainfall_mm,
            monthly_solar_kwh,
            monthly_temp_c,
            annual_rain_days,
        } = self
        else {
            return Ok(None);
        };

        let monthly = |values: &Vec<f64>| -> Result<[f64; 12]> {
            if values.is_empty() {
                return Ok([0.0; 12]);
            }
            Ok(ClimateRecord::monthly_array(values)?)
        };

        Ok(Some(ClimateRecord {
            solar_irradiance_kwh_m2_day: *solar_irradiance_kwh_m2_day,
            rainfall_mm_year: *rainfall_mm_year,
            wind_speed_kmh: *wind_speed_kmh,
            monthly_rainfall_mm: monthly(monthly_rainfall_mm)?,
            monthly_solar_kwh: monthly(monthly_solar_kwh)?,
            monthly_temp_c: monthly(monthly_temp_c)?,
            annual_rain_days: *annual_rain_days,
        }))
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("HOMESTEAD__").split("__"));
        Ok(figment.extract()?)
    }

    /// Assemble the engine input snapshot around a resolved climate record.
    pub fn estimation_inputs(&self, climate: ClimateRecord) -> EstimationInputs {
        EstimationInputs {
            climate,
            equipment: self.equipment.clone(),
            geometry: GeometrySet {
                solar: self.geometry.solar,
                water: self.geometry.water.clone(),
                food: self.geometry.food.clone(),
            },
            demand: self.demand,
            wind_site: self.wind_site,
        }
    }
}
