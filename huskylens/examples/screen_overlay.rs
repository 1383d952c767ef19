//! Draw text (and rectangles on HuskyLens 2) on the device screen

use std::time::Duration;

use huskylens::{Color, Connection, HuskyLens, ProtocolVersion};
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let port = std::env::var("HUSKYLENS_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());
    let mut lens = HuskyLens::connect(Connection::serial(port)).await?;

    println!("text: {}", lens.draw_text("Hello", 10, 10, Color::Green).await);

    if lens.version() == Some(ProtocolVersion::V2) {
        println!("rect: {}", lens.draw_rect(20, 20, 120, 100, Color::Red).await);
    }

    sleep(Duration::from_secs(3)).await;

    println!("clear text: {}", lens.clear_text().await);
    if lens.version() == Some(ProtocolVersion::V2) {
        println!("clear rect: {}", lens.clear_rect().await);
    }

    Ok(())
}
