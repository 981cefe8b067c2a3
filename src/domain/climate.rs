//! Climate data for a queried location.
//!
//! A [`ClimateRecord`] is the immutable climate snapshot consumed by the
//! estimation engine. It is either supplied directly by the caller or
//! aggregated from a trailing 12-month window of daily samples fetched by a
//! climate provider.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::physics::MJ_M2_TO_KWH_M2;

/// A day counts as a rain day when it delivers more than this much rainfall.
/// Drives the first-flush diverter loss estimate.
pub const RAIN_DAY_THRESHOLD_MM: f64 = 1.0;

#[derive(Debug, Error)]
pub enum ClimateError {
    #[error("expected 12 monthly entries, got {0}")]
    MonthCount(usize),
}

/// Immutable climate snapshot for one location, produced once per query.
///
/// Monthly arrays are indexed 0 = January .. 11 = December. Months with no
/// samples hold 0.0, never NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateRecord {
    /// Annual daily-average global irradiance (kWh/m²/day).
    pub solar_irradiance_kwh_m2_day: f64,
    /// Annual rainfall total (mm).
    pub rainfall_mm_year: f64,
    /// Annual average wind speed (km/h). Prefers the 100 m hourly mean over
    /// the 10 m daily-max mean when both are available.
    pub wind_speed_kmh: f64,
    /// Rainfall total per calendar month (mm).
    pub monthly_rainfall_mm: [f64; 12],
    /// Daily-average irradiance per calendar month (kWh/m²/day).
    pub monthly_solar_kwh: [f64; 12],
    /// Mean temperature per calendar month (°C).
    pub monthly_temp_c: [f64; 12],
    /// Days in the window with rainfall above [`RAIN_DAY_THRESHOLD_MM`].
    pub annual_rain_days: u32,
}

impl ClimateRecord {
    /// Copy of this record with every non-finite field coerced to 0 and
    /// negative magnitudes floored at 0.
    pub fn sanitized(&self) -> Self {
        let clean = |v: f64| super::finite_or_zero(v).max(0.0);
        Self {
            solar_irradiance_kwh_m2_day: clean(self.solar_irradiance_kwh_m2_day),
            rainfall_mm_year: clean(self.rainfall_mm_year),
            wind_speed_kmh: clean(self.wind_speed_kmh),
            monthly_rainfall_mm: self.monthly_rainfall_mm.map(clean),
            monthly_solar_kwh: self.monthly_solar_kwh.map(clean),
            monthly_temp_c: self.monthly_temp_c.map(super::finite_or_zero),
            annual_rain_days: self.annual_rain_days,
        }
    }

    /// Convert a caller-supplied monthly series into the fixed 12-entry form.
    pub fn monthly_array(values: &[f64]) -> Result<[f64; 12], ClimateError> {
        let arr: [f64; 12] = values
            .try_into()
            .map_err(|_| ClimateError::MonthCount(values.len()))?;
        Ok(arr.map(super::finite_or_zero))
    }
}

/// One day of climate observations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySample {
    pub date: NaiveDate,
    /// Precipitation sum (mm).
    pub rain_mm: f64,
    /// Shortwave radiation sum (MJ/m²), as archive APIs report it.
    pub shortwave_mj_m2: f64,
    /// Daily mean temperature (°C).
    pub mean_temp_c: f64,
    /// Daily maximum 10 m wind speed (km/h).
    pub wind_10m_max_kmh: f64,
}

/// Raw sample window from a climate provider, before aggregation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClimateSamples {
    pub daily: Vec<DailySample>,
    /// Hourly 100 m wind speeds (km/h) over the same window, when available.
    /// Preferred over the 10 m daily-max series for the annual average.
    pub hourly_wind_100m_kmh: Vec<f64>,
}

impl ClimateSamples {
    /// Aggregate the sample window into a [`ClimateRecord`].
    ///
    /// Calendar-month bucketing: rainfall is summed, irradiance and
    /// temperature are averaged. Months with no samples stay at 0.
    pub fn aggregate(&self) -> ClimateRecord {
        let mut rain_sum = [0.0_f64; 12];
        let mut solar_sum = [0.0_f64; 12];
        let mut temp_sum = [0.0_f64; 12];
        let mut day_count = [0_u32; 12];

        let mut annual_rain = 0.0;
        let mut annual_solar_kwh = 0.0;
        let mut rain_days = 0_u32;
        let mut wind_10m_sum = 0.0;

        for sample in &self.daily {
            let m = sample.date.month0() as usize;
            let rain = super::finite_or_zero(sample.rain_mm).max(0.0);
            let solar_kwh = super::finite_or_zero(sample.shortwave_mj_m2).max(0.0) * MJ_M2_TO_KWH_M2;

            rain_sum[m] += rain;
            solar_sum[m] += solar_kwh;
            temp_sum[m] += super::finite_or_zero(sample.mean_temp_c);
            day_count[m] += 1;

            annual_rain += rain;
            annual_solar_kwh += solar_kwh;
            wind_10m_sum += super::finite_or_zero(sample.wind_10m_max_kmh).max(0.0);
            if rain > RAIN_DAY_THRESHOLD_MM {
                rain_days += 1;
            }
        }

        let n_days = self.daily.len() as f64;
        let mut monthly_solar = [0.0_f64; 12];
        let mut monthly_temp = [0.0_f64; 12];
        for m in 0..12 {
            if day_count[m] > 0 {
                monthly_solar[m] = solar_sum[m] / day_count[m] as f64;
                monthly_temp[m] = temp_sum[m] / day_count[m] as f64;
            }
        }

        let wind_kmh = if !self.hourly_wind_100m_kmh.is_empty() {
            let sum: f64 = self
                .hourly_wind_100m_kmh
                .iter()
                .map(|v| super::finite_or_zero(*v).max(0.0))
                .sum();
            sum / self.hourly_wind_100m_kmh.len() as f64
        } else if n_days > 0.0 {
            wind_10m_sum / n_days
        } else {
            0.0
        };

        ClimateRecord {
            solar_irradiance_kwh_m2_day: if n_days > 0.0 {
                annual_solar_kwh / n_days
            } else {
                0.0
            },
            rainfall_mm_year: annual_rain,
            wind_speed_kmh: wind_kmh,
            monthly_rainfall_mm: rain_sum,
            monthly_solar_kwh: monthly_solar,
            monthly_temp_c: monthly_temp,
            annual_rain_days: rain_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(date: NaiveDate, rain_mm: f64) -> DailySample {
        DailySample {
            date,
            rain_mm,
            shortwave_mj_m2: 18.0, // 18 MJ ≈ 5.0 kWh
            mean_temp_c: 12.0,
            wind_10m_max_kmh: 20.0,
        }
    }

    #[test]
    fn test_aggregate_buckets_by_calendar_month() {
        let jan = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let jul = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
        let samples = ClimateSamples {
            daily: vec![sample(jan, 4.0), sample(jan.succ_opt().unwrap(), 6.0), sample(jul, 0.5)],
            hourly_wind_100m_kmh: vec![],
        };

        let record = samples.aggregate();
        assert_eq!(record.monthly_rainfall_mm[0], 10.0);
        assert_eq!(record.monthly_rainfall_mm[6], 0.5);
        assert_eq!(record.monthly_rainfall_mm[3], 0.0); // no April samples
        assert_eq!(record.rainfall_mm_year, 10.5);
        // 0.5 mm is below the 1.0 mm rain-day threshold
        assert_eq!(record.annual_rain_days, 2);
    }

    #[test]
    fn test_aggregate_converts_radiation_to_kwh() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let samples = ClimateSamples {
            daily: vec![sample(date, 0.0)],
            hourly_wind_100m_kmh: vec![],
        };

        let record = samples.aggregate();
        let expected = 18.0 * MJ_M2_TO_KWH_M2;
        assert!((record.solar_irradiance_kwh_m2_day - expected).abs() < 1e-9);
        assert!((record.monthly_solar_kwh[5] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_prefers_100m_wind() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let samples = ClimateSamples {
            daily: vec![sample(date, 0.0)],
            hourly_wind_100m_kmh: vec![30.0, 34.0],
        };

        let record = samples.aggregate();
        assert_eq!(record.wind_speed_kmh, 32.0);
    }

    #[test]
    fn test_aggregate_falls_back_to_10m_wind() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let samples = ClimateSamples {
            daily: vec![sample(date, 0.0)],
            hourly_wind_100m_kmh: vec![],
        };

        assert_eq!(samples.aggregate().wind_speed_kmh, 20.0);
    }

    #[test]
    fn test_empty_window_yields_zeros_not_nan() {
        let record = ClimateSamples::default().aggregate();
        assert_eq!(record.solar_irradiance_kwh_m2_day, 0.0);
        assert_eq!(record.wind_speed_kmh, 0.0);
        assert!(record.monthly_rainfall_mm.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_sanitized_strips_non_finite() {
        let mut record = ClimateSamples::default().aggregate();
        record.rainfall_mm_year = f64::NAN;
        record.monthly_solar_kwh[4] = f64::INFINITY;

        let clean = record.sanitized();
        assert_eq!(clean.rainfall_mm_year, 0.0);
        assert_eq!(clean.monthly_solar_kwh[4], 0.0);
    }

    #[test]
    fn test_monthly_array_rejects_wrong_length() {
        assert!(matches!(
            ClimateRecord::monthly_array(&[1.0; 11]),
            Err(ClimateError::MonthCount(11))
        ));
        assert!(ClimateRecord::monthly_array(&[1.0; 12]).is_ok());
    }
}
