//! Probe the sensor and search for the presented finger
//!
//! The serial port is expected behind a ser2net-style TCP bridge; set
//! SENSOR_ADDR to its host:port.

use tokio::net::TcpStream;

use as108m::{Sensor, StreamTransport};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let addr = std::env::var("SENSOR_ADDR").unwrap_or_else(|_| "192.168.4.21:3333".to_string());

    println!("Connecting to sensor bridge at {}...", addr);
    let stream = TcpStream::connect(&addr).await?;
    let mut sensor = Sensor::new(StreamTransport::new(stream));

    sensor.probe().await?;
    println!("✓ Sensor responding");

    let params = sensor.read_parameters().await?;
    println!("✓ {}", params);

    println!("Place a finger on the sensor...");
    let result = sensor.search().await?;

    if result.matched {
        println!("✓ Matched page {} (score {})", result.page_id, result.score);
    } else {
        println!("✗ No match ({})", result.status);
    }

    Ok(())
}
