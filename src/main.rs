use anyhow::Result;
use homestead_estimator::{config, engine, provider, telemetry};

use config::Config;
use provider::OpenMeteoClient;
use telemetry::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;

    let climate = match cfg.climate.inline_record()? {
        Some(record) => record,
        None => {
            let client = OpenMeteoClient::new();
            let location = match &cfg.location.address {
                Some(address) => client.geocode(address).await?,
                None => cfg.location.geo(),
            };
            let samples = client.fetch_climate(&location).await?;
            samples.aggregate()
        }
    };

    info!(
        irradiance = climate.solar_irradiance_kwh_m2_day,
        rainfall = climate.rainfall_mm_year,
        wind = climate.wind_speed_kmh,
        "climate record ready"
    );

    let inputs = cfg.estimation_inputs(climate);
    let report = engine::estimate(&inputs);

    info!(
        total_cost = report.costs.total,
        annual_savings = report.costs.annual_savings,
        "estimation complete"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
