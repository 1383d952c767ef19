//! Print detection results from a serial-connected HuskyLens

use std::time::Duration;

use huskylens::{Algorithm, Connection, HuskyLens, ResultQuery};
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("HUSKYLENS_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    println!("Connecting to {}...", port);
    let mut lens = HuskyLens::connect(Connection::serial(port)).await?;

    let Some(version) = lens.version() else {
        anyhow::bail!("no HuskyLens answered");
    };
    println!("✓ HuskyLens {}", version);

    if let Some(firmware) = lens.get_firmware_version().await {
        println!("✓ Firmware {}", firmware);
    }

    if !lens.set_algorithm(Some(Algorithm::ObjectRecognition)).await {
        anyhow::bail!("algorithm switch was not acknowledged");
    }

    for _ in 0..20 {
        let results = lens.get_results(&ResultQuery::new()).await;
        println!("{} records", results.len());
        for block in &results.blocks {
            println!("  {}", block);
        }
        sleep(Duration::from_millis(500)).await;
    }

    Ok(())
}
