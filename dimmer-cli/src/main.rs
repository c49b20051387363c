//! Host tool for Dimmer receivers
//!
//! Inspect the gesture/preset table, run the receiver logic against simulated
//! hardware, or talk to a real receiver over BLE.

mod script;
mod sim;
mod simulate;
mod store;

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use dimmer_ble_controller::ble;
use dimmer_mcu::{Dimmer, DimmerConfig};
use dimmer_proto::{parse_advertising_byte, Gesture, Preset, Rejected};
use log::*;

use sim::{describe, ConsoleLed, SimBootloader, SimRadio};
use store::FileStorage;

#[derive(Parser)]
#[command(name = "dimmer")]
#[command(about = "Simulate and control Dimmer BLE receivers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List gestures and the preset each one applies
    Presets,
    /// Show what the receiver does with an advertising byte
    Decode {
        /// Advertising byte, e.g. 0x18
        #[arg(value_parser = script::byte_arg)]
        byte: u8,
    },
    /// Run the receiver logic against simulated hardware
    Simulate {
        /// Event script (defaults to stdin)
        #[arg(short, long)]
        script: Option<PathBuf>,
        /// Main loop tick in milliseconds
        #[arg(long, default_value = "50")]
        tick_ms: u64,
        /// Make persistent storage fail to initialize
        #[arg(long)]
        storage_fail: bool,
        /// Polls the storage reports busy after seeding
        #[arg(long, default_value = "0")]
        busy_polls: u32,
        /// Run the light management tick on every loop
        #[arg(long)]
        manage_light: bool,
    },
    /// Talk to receivers over BLE
    Ble {
        #[command(subcommand)]
        command: BleCommands,
    },
}

#[derive(Subcommand)]
enum BleCommands {
    /// Scan for receivers
    Scan {
        /// Scan duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Write a raw byte to the special-op characteristic
    SpecialOp {
        #[arg(value_parser = script::byte_arg)]
        byte: u8,
        /// Device name or address to connect to
        #[arg(short, long)]
        device: Option<String>,
    },
    /// Reboot a receiver into its DFU bootloader
    Dfu {
        /// Device name or address to connect to
        #[arg(short, long)]
        device: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Presets => print_presets(),
        Commands::Decode { byte } => print_decode(byte),
        Commands::Simulate {
            script,
            tick_ms,
            storage_fail,
            busy_polls,
            manage_light,
        } => {
            let source = match script {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let steps = script::parse(&source)?;

            let home = dimmer_home()?;
            let storage = FileStorage::new(home.join("memory.json"))
                .unavailable(storage_fail)
                .busy_polls(busy_polls);
            let mut dimmer = Dimmer::new(
                SimRadio::default(),
                storage,
                ConsoleLed::default(),
                SimBootloader::new(home.join("retention")),
                DimmerConfig { manage_light },
            );
            dimmer.init()?;
            if dimmer.storage_degraded() {
                warn!("Running on default settings");
            }

            let outcome = simulate::run(&mut dimmer, steps, Duration::from_millis(tick_ms.max(1))).await?;

            println!("events:   {}", outcome.events);
            println!("fade:     {}%", dimmer.settings().fade_percent());
            println!("strip:    {}", describe(dimmer.led().channels));
            println!(
                "radio:    {} advertising start(s), {} scan start(s)",
                dimmer.radio().advertising_starts,
                dimmer.radio().scan_starts
            );
            if manage_light {
                println!("ticks:    {}", dimmer.led().ticks);
            }
            if outcome.reset {
                println!("reset:    into bootloader");
            }
        }
        Commands::Ble { command } => match command {
            BleCommands::Scan { duration } => {
                println!("Scanning for Dimmer devices ({} seconds)...", duration);
                let devices = ble::scan(duration).await?;
                println!("\nFound {} devices:", devices.len());
                for device in devices {
                    let rssi = device
                        .rssi
                        .map(|r| format!("{} dBm", r))
                        .unwrap_or_else(|| "N/A".to_string());
                    let marker = if device.is_dimmer { " [DIMMER]" } else { "" };
                    println!("  {} ({}) RSSI: {}{}", device.name, device.address, rssi, marker);
                }
            }
            BleCommands::SpecialOp { byte, device } => {
                ble::send_special_op(device.as_deref(), byte).await?;
                println!("Wrote 0x{byte:02x} to the special-op characteristic");
            }
            BleCommands::Dfu { device } => {
                ble::trigger_firmware_update(device.as_deref()).await?;
                println!("DFU password sent! Device will restart into its bootloader.");
            }
        },
    }

    Ok(())
}

/// `$DIMMER_HOME`, else `~/.dimmer`
fn dimmer_home() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let home = match std::env::var_os("DIMMER_HOME") {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .ok_or("Could not determine home directory")?
            .join(".dimmer"),
    };
    std::fs::create_dir_all(&home)?;
    Ok(home)
}

fn print_presets() {
    println!("{:<6} {:<10} {:<22} CHANNELS", "BYTE", "GESTURE", "PRESET");
    for gesture in Gesture::ALL {
        let preset = gesture.preset();
        println!(
            "0x{:02x}   {:<10} {:<22} {}",
            gesture.to_byte(),
            gesture.label(),
            preset_name(preset),
            describe(preset.channels())
        );
    }
}

fn print_decode(byte: u8) {
    match parse_advertising_byte(byte) {
        Ok(gesture) => {
            let preset = gesture.preset();
            println!("0x{byte:02x}: {} -> {}", gesture.label(), preset_name(preset));
            println!("  {}", describe(preset.channels()));
        }
        Err(Rejected::Category(category)) => {
            println!("0x{byte:02x}: ignored, category 0x{category:02x} is not a gesture");
        }
        Err(Rejected::Index(index)) => {
            println!("0x{byte:02x}: ignored, index {index} has no preset");
        }
    }
}

fn preset_name(preset: Preset) -> String {
    match preset {
        Preset::AllOff => "off".to_string(),
        Preset::Ramp(level) => format!("{:?} ({}%)", level, level.percent()),
        Preset::Reserved => "reserved (off)".to_string(),
    }
}
