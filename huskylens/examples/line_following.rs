//! Steer from the line-tracking arrow

use std::time::Duration;

use huskylens::{Algorithm, Connection, HuskyLens, ResultQuery};
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

/// Map a heading in degrees to a steering command in -100..=100
fn steering(direction: f64) -> i32 {
    (direction * 100.0 / 90.0).clamp(-100.0, 100.0) as i32
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("HUSKYLENS_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());
    let mut lens = HuskyLens::connect(Connection::serial(port)).await?;

    if !lens.set_algorithm(Some(Algorithm::LineTracking)).await {
        anyhow::bail!("line tracking not acknowledged");
    }

    loop {
        match lens.get_arrows(&ResultQuery::new()).await.first() {
            Some(arrow) => println!("{} -> steer {}", arrow, steering(arrow.direction())),
            None => println!("no line"),
        }
        sleep(Duration::from_millis(100)).await;
    }
}
