//! Enroll a fingerprint at a database page
//!
//! Prompts are printed from the injected event handler, the way a UI would
//! surface them.

use tokio::net::TcpStream;

use as108m::{Prompt, Sensor, SensorEvent, StreamTransport};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let addr = std::env::var("SENSOR_ADDR").unwrap_or_else(|_| "192.168.4.21:3333".to_string());
    let page: u8 = std::env::var("PAGE_ID")
        .unwrap_or_else(|_| "0".to_string())
        .parse()?;

    let stream = TcpStream::connect(&addr).await?;
    let mut sensor = Sensor::new(StreamTransport::new(stream)).on_event(|event| match event {
        SensorEvent::Prompt(Prompt::TouchSensor) => println!("→ touch the sensor"),
        SensorEvent::Prompt(Prompt::RemoveFinger) => println!("→ remove your finger"),
        SensorEvent::Fault(status) => eprintln!("! {}", status),
    });

    sensor.probe().await?;
    println!("✓ Sensor responding");

    println!("Enrolling at page {} (3 samples)...", page);
    sensor.enroll(page, 3).await?;
    println!("✓ Enrolled");

    Ok(())
}
