//! CLI application for controlling Hue lights through a bridge.
//!
//! This example demonstrates a full-featured command-line interface for
//! discovering, pairing with, and controlling a Hue bridge.
//!
//! Run with: cargo run --example hue_cli -- --help

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use hue_bridge_rs::{
    Alert, Bridge, Brightness, Color, Discoverer, DiscoveryConfig, Effect, Error, Group, Light,
    Mired, State,
};
use strum::IntoEnumIterator;

type Result<T> = std::result::Result<T, Error>;

#[derive(Parser)]
#[command(name = "hue-cli")]
#[command(about = "Control Hue lights from the command line", long_about = None)]
struct Cli {
    /// Cache file for the paired bridge (default: ~/.hue)
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    /// How long to wait for SSDP replies, in seconds
    #[arg(long, global = true, default_value = "5")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the bridge, from the cache or the network
    Discover,

    /// Pair with the bridge (press its link button first)
    Pair {
        /// Application name sent to the bridge
        #[arg(long, default_value = hue_bridge_rs::DEFAULT_APP_NAME)]
        app: String,
    },

    /// Forget the cached bridge
    Forget,

    /// List all lights, or control one of them
    Light(LightArgs),

    /// List all groups, or control one of them
    Group(GroupArgs),

    /// Turn every light on
    AllOn,

    /// Turn every light off
    AllOff,

    /// Ask the bridge to search for new lights
    Scan,
}

#[derive(Args)]
struct LightArgs {
    /// Light name or id; lists all lights when omitted
    light: Option<String>,

    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Args)]
struct GroupArgs {
    /// Group name or id; lists all groups when omitted
    group: Option<String>,

    #[command(subcommand)]
    action: Option<GroupAction>,
}

#[derive(Subcommand, Clone)]
enum Action {
    /// Turn on
    On,
    /// Turn off
    Off,
    /// Toggle on/off
    Toggle,
    /// Set brightness in percent (0-100)
    Brightness {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: u8,
    },
    /// Set RGB color (0-255 for each component)
    Color { red: u8, green: u8, blue: u8 },
    /// Set color temperature in Kelvin (2000-6500)
    Temperature {
        #[arg(value_parser = clap::value_parser!(u32).range(2000..=6500))]
        kelvin: u32,
    },
    /// Start or stop an effect (none, colorloop)
    Effect { effect: Effect },
    /// Flash once (select) or for 15 seconds (lselect)
    Alert { alert: Alert },
    /// Give a new name
    Rename { name: String },
}

#[derive(Subcommand)]
enum GroupAction {
    #[command(flatten)]
    Light(Action),
    /// Show member lights
    Members,
    /// Create a group from light ids
    Create { lights: Vec<String> },
    /// Replace member lights
    SetLights { lights: Vec<String> },
    /// Delete the group
    Delete,
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = DiscoveryConfig::default().with_deadline(Duration::from_secs(cli.timeout));
    if let Some(path) = cli.cache {
        config = config.with_cache_path(path);
    }

    if let Commands::Forget = cli.command {
        if config.cache_store().clear()? {
            println!("Forgot the cached bridge");
        } else {
            println!("No bridge was cached");
        }
        return Ok(());
    }

    let discoverer = Discoverer::new(&config)?;
    let mut bridge = discoverer.discover_bridge().await?;

    match cli.command {
        Commands::Forget => unreachable!(),

        Commands::Discover => {
            println!("Bridge {}", bridge.identity());
            println!("  Paired: {}", if bridge.is_paired() { "yes" } else { "no" });
        }

        Commands::Pair { app } => {
            let paired = bridge.pair_as(&app).await?;
            println!("Paired with {} as {}", paired.identity(), paired.username());
        }

        Commands::Light(args) => {
            let Some(target) = args.light else {
                for light in bridge.lights().list().await? {
                    print_light(&light);
                }
                return Ok(());
            };
            let mut light = find_light(&bridge, &target).await?;
            match args.action {
                None => print_light(&light),
                Some(action) => {
                    run_on_light(&mut light, action).await?;
                    print_light(&light);
                }
            }
        }

        Commands::Group(args) => {
            let Some(target) = args.group else {
                for group in bridge.groups().list().await? {
                    print_group(&group);
                }
                return Ok(());
            };

            if let Some(GroupAction::Create { lights }) = &args.action {
                let ids: Vec<&str> = lights.iter().map(String::as_str).collect();
                let id = bridge.groups().create(&target, &ids).await?;
                println!("Created group {target:?} with id {id}");
                return Ok(());
            }

            let mut group = find_group(&bridge, &target).await?;
            match args.action {
                None => print_group(&group),
                Some(GroupAction::Create { .. }) => unreachable!(),
                Some(GroupAction::Members) => {
                    for light in group.lights().await? {
                        print_light(&light);
                    }
                }
                Some(GroupAction::SetLights { lights }) => {
                    let ids: Vec<&str> = lights.iter().map(String::as_str).collect();
                    group.set_lights(&ids).await?;
                    print_group(&group);
                }
                Some(GroupAction::Delete) => {
                    let name = group.name().to_string();
                    group.delete().await?;
                    println!("Deleted group {name:?}");
                }
                Some(GroupAction::Light(action)) => {
                    run_on_group(&mut group, action).await?;
                    print_group(&group);
                }
            }
        }

        Commands::AllOn => {
            bridge.lights().on().await?;
            println!("All lights turned ON");
        }

        Commands::AllOff => {
            bridge.lights().off().await?;
            println!("All lights turned OFF");
        }

        Commands::Scan => {
            bridge.lights().scan().await?;
            println!("Searching for new lights, check back in a minute");
        }
    }

    Ok(())
}

async fn find_light(bridge: &Bridge, target: &str) -> Result<Light> {
    match bridge.lights().get_by_id(target).await {
        Ok(light) => Ok(light),
        Err(_) => bridge.lights().get(target).await,
    }
}

async fn find_group(bridge: &Bridge, target: &str) -> Result<Group> {
    match bridge.groups().get_by_id(target).await {
        Ok(group) => Ok(group),
        Err(_) => bridge.groups().get(target).await,
    }
}

async fn run_on_light(light: &mut Light, action: Action) -> Result<()> {
    match action {
        Action::On => light.on().await,
        Action::Off => light.off().await,
        Action::Toggle => light.toggle().await,
        Action::Brightness { percent } => {
            light
                .set_brightness(&Brightness::from_percent(percent))
                .await
        }
        Action::Color { red, green, blue } => light.set_color(&Color::rgb(red, green, blue)).await,
        Action::Temperature { kelvin } => {
            light
                .set_color_temperature(&Mired::from_kelvin(kelvin))
                .await
        }
        Action::Effect { effect } => light.set_effect(effect).await,
        Action::Alert { alert } => light.set_alert(alert).await,
        Action::Rename { name } => light.rename(&name).await,
    }
}

async fn run_on_group(group: &mut Group, action: Action) -> Result<()> {
    let mut state = State::new();
    match action {
        Action::On => return group.on().await,
        Action::Off => return group.off().await,
        Action::Toggle => return group.toggle().await,
        Action::Rename { name } => return group.rename(&name).await,
        Action::Brightness { percent } => state.brightness(&Brightness::from_percent(percent)),
        Action::Color { red, green, blue } => state.color(&Color::rgb(red, green, blue)),
        Action::Temperature { kelvin } => state.color_temperature(&Mired::from_kelvin(kelvin)),
        Action::Effect { effect } => state.effect(effect),
        Action::Alert { alert } => state.alert(alert),
    };
    group.set(&state).await
}

fn print_light(light: &Light) {
    let state = light.state();
    println!(
        "{:>3}  {:<24} {:<3} {}",
        light.id(),
        light.name(),
        if state.on { "ON" } else { "OFF" },
        if state.reachable { "" } else { "(unreachable)" }
    );
    if let Some(bri) = state.brightness() {
        println!("       Brightness: {}/254", bri.value());
    }
    if let Some(ct) = state.color_temperature() {
        println!("       Temperature: {}K", ct.kelvin());
    }
    if let Some(effect) = state.effect.filter(|e| *e != Effect::None) {
        let known: Vec<String> = Effect::iter().map(|e| e.to_string()).collect();
        println!("       Effect: {effect} (one of {})", known.join(", "));
    }
}

fn print_group(group: &Group) {
    println!(
        "{:>3}  {:<24} {:<10} lights {}",
        group.id(),
        group.name(),
        group.group_type(),
        group.light_ids().join(",")
    );
}
