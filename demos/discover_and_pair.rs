//! Find the bridge, pair with it if needed, and toggle one light.
//!
//! This example demonstrates:
//! - Discovery, using the cached bridge when there is one
//! - Pairing after the link button was pressed
//! - Looking up a light by name and switching it
//!
//! Run with: cargo run --example discover_and_pair -- "Couch"

use std::io::BufRead;

use hue_bridge_rs::{ApiError, Error, discover};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let name = std::env::args().nth(1).unwrap_or_else(|| "Couch".to_string());

    println!("Looking for a bridge...");
    let mut bridge = discover().await?;
    println!("Using bridge {}", bridge.identity());

    if !bridge.is_paired() {
        println!("Press the link button on the bridge, then press ENTER to continue...");
        std::io::stdin().lock().read_line(&mut String::new())?;

        match bridge.pair().await {
            Ok(paired) => println!("Paired as {}", paired.username()),
            Err(e) if e.api_code() == Some(ApiError::LINK_BUTTON_NOT_PRESSED) => {
                eprintln!("The link button was not pressed, try again.");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }

    match bridge.lights().get(&name).await {
        Ok(mut light) => {
            light.toggle().await?;
            let state = if light.state().on { "ON" } else { "OFF" };
            println!("Light {:?} is now {}", light.name(), state);
        }
        Err(Error::LightNotFound(_)) => {
            println!("No light named {name:?}. Known lights:");
            for light in bridge.lights().list().await? {
                println!("  {:>3}  {}", light.id(), light.name());
            }
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
