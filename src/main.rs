use std::env;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carwings_rs::{CarwingsClient, Credentials, RegionCode};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carwings_rs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(command) = args.get(1).map(String::as_str) else {
        eprintln!("Usage: {} <command>", args[0]);
        eprintln!("  commands: battery, preheat, cooling, climate-off, refresh");
        eprintln!("  credentials come from the username/password env vars;");
        eprintln!("  region defaults to NE (also: NNA, NCI)");
        std::process::exit(1);
    };

    let region = match env::var("region") {
        Ok(value) => RegionCode::parse(&value)
            .with_context(|| format!("unknown region code: {value}"))?,
        Err(_) => RegionCode::Europe,
    };
    let credentials = Credentials {
        user_id: env::var("username").context("username env var not set")?,
        password: env::var("password").context("password env var not set")?,
        region,
    };

    let mut client = CarwingsClient::new(credentials);

    match command {
        "battery" => {
            let response = client.get_battery_status().await?;
            let records = response
                .records
                .context("portal returned no battery records")?;
            match (records.charge_percent(), records.cruising_range_miles()) {
                (Some(percent), Some(miles)) => {
                    println!("Battery: {percent}%, approximately {miles} miles of range");
                }
                (Some(percent), None) => println!("Battery: {percent}%"),
                _ => println!("Battery level unavailable"),
            }
            println!(
                "Plugged in: {}, charging: {}",
                if records.is_plugged_in() { "yes" } else { "no" },
                if records.is_charging() { "yes" } else { "no" },
            );
        }
        "preheat" => {
            client.send_preheat_command().await?;
            println!("Climate control on (heat) requested");
        }
        "cooling" => {
            client.send_cooling_command().await?;
            println!("Climate control on (cool) requested");
        }
        "climate-off" => {
            client.send_climate_control_off_command().await?;
            println!("Climate control off requested");
        }
        "refresh" => {
            client.send_update_command().await?;
            println!("Data refresh requested; battery status will update shortly");
        }
        other => {
            eprintln!("Unknown command: {other}");
            std::process::exit(1);
        }
    }

    Ok(())
}
