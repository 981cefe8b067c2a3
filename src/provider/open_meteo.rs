//! Climate provider (Open-Meteo).
//!
//! Resolves an address to coordinates and fetches a trailing 12-month window
//! of daily climate samples plus hourly 100 m wind. All network work happens
//! here, strictly before the engine runs; the engine itself never does I/O.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::climate::{ClimateSamples, DailySample};

/// The archive lags behind realtime by a few days; end the window early
/// enough that every requested day is published.
const ARCHIVE_LAG_DAYS: i64 = 7;

/// Geographic location resolved from an address or supplied directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub name: Option<String>,
}

/// Open-Meteo client for geocoding and historical weather.
pub struct OpenMeteoClient {
    client: Client,
    archive_url: String,
    geocoding_url: String,
}

impl OpenMeteoClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            archive_url: "https://archive-api.open-meteo.com/v1/archive".to_string(),
            geocoding_url: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
        }
    }

    /// Resolve a free-text address to coordinates, taking the best match.
    pub async fn geocode(&self, query: &str) -> Result<GeoLocation> {
        debug!(query, "geocoding address via Open-Meteo");

        let response = self
            .client
            .get(&self.geocoding_url)
            .query(&[("name", query), ("count", "1")])
            .send()
            .await
            .context("failed to send geocoding request")?;

        if !response.status().is_success() {
            anyhow::bail!("geocoding API error: {}", response.status());
        }

        let parsed: GeocodingResponse = response
            .json()
            .await
            .context("failed to parse geocoding response")?;

        let hit = parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .with_context(|| format!("no geocoding match for '{query}'"))?;

        info!(
            name = %hit.name,
            lat = hit.latitude,
            lon = hit.longitude,
            "resolved address"
        );

        Ok(GeoLocation {
            latitude: hit.latitude,
            longitude: hit.longitude,
            name: Some(hit.name),
        })
    }

    /// Fetch the trailing 12-month daily + hourly sample window for a
    /// location.
    pub async fn fetch_climate(&self, location: &GeoLocation) -> Result<ClimateSamples> {
        let end = Utc::now().date_naive() - Duration::days(ARCHIVE_LAG_DAYS);
        let start = end - Duration::days(365);
        self.fetch_climate_window(location, start, end).await
    }

    /// Fetch an explicit sample window. Split out so tests and backfills can
    /// pin the dates.
    pub async fn fetch_climate_window(
        &self,
        location: &GeoLocation,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ClimateSamples> {
        debug!(
            lat = location.latitude,
            lon = location.longitude,
            %start,
            %end,
            "fetching climate archive from Open-Meteo"
        );

        let response = self
            .client
            .get(&self.archive_url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("start_date", start.to_string()),
                ("end_date", end.to_string()),
                (
                    "daily",
                    "precipitation_sum,shortwave_radiation_sum,temperature_2m_mean,wind_speed_10m_max"
                        .to_string(),
                ),
                ("hourly", "wind_speed_100m".to_string()),
                ("wind_speed_unit", "kmh".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .context("failed to send archive request")?;

        if !response.status().is_success() {
            anyhow::bail!("archive API error: {}", response.status());
        }

        let parsed: ArchiveResponse = response
            .json()
            .await
            .context("failed to parse archive response")?;

        let samples = parsed.into_samples()?;
        info!(
            days = samples.daily.len(),
            hourly_wind = samples.hourly_wind_100m_kmh.len(),
            "fetched climate window"
        );
        Ok(samples)
    }
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}

// Open-Meteo response structures. Series may contain nulls for unpublished
// days; those become 0 samples, matching the record invariant.
#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: DailyBlock,
    hourly: Option<HourlyBlock>,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<NaiveDate>,
    precipitation_sum: Vec<Option<f64>>,
    shortwave_radiation_sum: Vec<Option<f64>>,
    temperature_2m_mean: Vec<Option<f64>>,
    wind_speed_10m_max: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    wind_speed_100m: Vec<Option<f64>>,
}

// The geocoding API omits `results` entirely when nothing matches.
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodeHit>>,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    name: String,
    latitude: f64,
    longitude: f64,
}

impl ArchiveResponse {
    fn into_samples(self) -> Result<ClimateSamples> {
        let DailyBlock {
            time,
            precipitation_sum,
            shortwave_radiation_sum,
            temperature_2m_mean,
            wind_speed_10m_max,
        } = self.daily;

        let n = time.len();
        for (name, len) in [
            ("precipitation_sum", precipitation_sum.len()),
            ("shortwave_radiation_sum", shortwave_radiation_sum.len()),
            ("temperature_2m_mean", temperature_2m_mean.len()),
            ("wind_speed_10m_max", wind_speed_10m_max.len()),
        ] {
            if len != n {
                anyhow::bail!("archive series {name} has {len} entries, expected {n}");
            }
        }

        let daily = time
            .into_iter()
            .enumerate()
            .map(|(i, date)| DailySample {
                date,
                rain_mm: precipitation_sum[i].unwrap_or(0.0),
                shortwave_mj_m2: shortwave_radiation_sum[i].unwrap_or(0.0),
                mean_temp_c: temperature_2m_mean[i].unwrap_or(0.0),
                wind_10m_max_kmh: wind_speed_10m_max[i].unwrap_or(0.0),
            })
            .collect();

        let hourly_wind_100m_kmh = self
            .hourly
            .map(|h| h.wind_speed_100m.into_iter().flatten().collect())
            .unwrap_or_default();

        Ok(ClimateSamples {
            daily,
            hourly_wind_100m_kmh,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_parsing_with_nulls() {
        let json = r#"{
            "daily": {
                "time": ["2025-01-01", "2025-01-02"],
                "precipitation_sum": [3.2, null],
                "shortwave_radiation_sum": [6.1, 5.8],
                "temperature_2m_mean": [null, 4.5],
                "wind_speed_10m_max": [22.0, 18.5]
            },
            "hourly": {
                "wind_speed_100m": [30.0, null, 28.0]
            }
        }"#;

        let parsed: ArchiveResponse = serde_json::from_str(json).unwrap();
        let samples = parsed.into_samples().unwrap();

        assert_eq!(samples.daily.len(), 2);
        assert_eq!(samples.daily[0].rain_mm, 3.2);
        assert_eq!(samples.daily[1].rain_mm, 0.0); // null coerced
        assert_eq!(samples.daily[0].mean_temp_c, 0.0);
        // hourly nulls are dropped, not zero-filled, so they don't drag the mean
        assert_eq!(samples.hourly_wind_100m_kmh, vec![30.0, 28.0]);
    }

    #[test]
    fn test_archive_parsing_rejects_ragged_series() {
        let json = r#"{
            "daily": {
                "time": ["2025-01-01", "2025-01-02"],
                "precipitation_sum": [3.2],
                "shortwave_radiation_sum": [6.1, 5.8],
                "temperature_2m_mean": [1.0, 4.5],
                "wind_speed_10m_max": [22.0, 18.5]
            }
        }"#;

        let parsed: ArchiveResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.into_samples().is_err());
    }

    #[test]
    fn test_geocoding_parsing_takes_first_hit() {
        let json = r#"{
            "results": [
                {"name": "Stockholm", "latitude": 59.3293, "longitude": 18.0686, "country": "Sweden"},
                {"name": "Stockholm", "latitude": 44.0, "longitude": -92.5}
            ]
        }"#;

        let parsed: GeocodingResponse = serde_json::from_str(json).unwrap();
        let hit = parsed.results.unwrap().into_iter().next().unwrap();
        assert_eq!(hit.name, "Stockholm");
        assert!((hit.latitude - 59.3293).abs() < 1e-9);
        assert!((hit.longitude - 18.0686).abs() < 1e-9);
    }

    #[test]
    fn test_geocoding_parsing_handles_no_match() {
        // no `results` key at all on a miss
        let parsed: GeocodingResponse = serde_json::from_str(r#"{"generationtime_ms": 0.5}"#).unwrap();
        assert!(parsed.results.is_none());
    }

    #[tokio::test]
    #[ignore] // requires network access
    async fn test_fetch_climate_window() {
        let client = OpenMeteoClient::new();
        let location = GeoLocation {
            latitude: 59.3293,
            longitude: 18.0686,
            name: Some("Stockholm".to_string()),
        };

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let samples = client
            .fetch_climate_window(&location, start, end)
            .await
            .unwrap();

        assert_eq!(samples.daily.len(), 366);
        let record = samples.aggregate();
        assert!(record.rainfall_mm_year > 0.0);
    }

    #[tokio::test]
    #[ignore] // requires network access
    async fn test_geocode() {
        let client = OpenMeteoClient::new();
        let location = client.geocode("Stockholm").await.unwrap();
        assert!((location.latitude - 59.3).abs() < 1.0);
    }
}
