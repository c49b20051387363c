//! BLE Client for Dimmer receivers
//!
//! Provides functions to scan for receivers and write the special-op
//! characteristic.

use btleplug::api::{Central, Characteristic, Manager as _, Peripheral as _, ScanFilter, WriteType};
use btleplug::platform::{Adapter, Manager, Peripheral};
use log::*;
use std::time::Duration;
use uuid::Uuid;

use dimmer_proto::ble::{special_op, DEVICE_NAME_PREFIX, SPECIAL_OP_UUID};

/// A discovered BLE device
#[derive(Debug, Clone)]
pub struct DimmerDevice {
    pub name: String,
    pub address: String,
    pub rssi: Option<i16>,
    pub is_dimmer: bool,
}

/// Parse UUID string into uuid::Uuid
fn parse_uuid(s: &str) -> Result<Uuid, Box<dyn std::error::Error>> {
    Ok(Uuid::parse_str(s)?)
}

/// Receivers advertise as "Dimmer-xxx" (or "nimble [Dimmer-xxx]")
pub fn is_dimmer_name(name: &str) -> bool {
    name.starts_with(DEVICE_NAME_PREFIX) || name.contains(&format!("[{DEVICE_NAME_PREFIX}"))
}

/// Get the default Bluetooth adapter
pub async fn get_adapter() -> Result<Adapter, Box<dyn std::error::Error>> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;
    adapters.into_iter().next().ok_or_else(|| "No Bluetooth adapter found".into())
}

/// Listen for `window`, then stop scanning and return every peripheral
/// that reported properties, paired with its advertised name.
async fn survey(window: Duration) -> Result<Vec<(Peripheral, Option<String>, Option<i16>)>, Box<dyn std::error::Error>> {
    let adapter = get_adapter().await?;

    adapter.start_scan(ScanFilter::default()).await?;
    tokio::time::sleep(window).await;
    let peripherals = adapter.peripherals().await;
    adapter.stop_scan().await?;

    let mut seen = Vec::new();
    for peripheral in peripherals? {
        if let Some(props) = peripheral.properties().await? {
            seen.push((peripheral, props.local_name, props.rssi));
        }
    }
    debug!("survey saw {} peripheral(s)", seen.len());
    Ok(seen)
}

/// Scan for BLE devices
///
/// Returns every device seen. Dimmer receivers have `is_dimmer = true`.
pub async fn scan(duration_secs: u64) -> Result<Vec<DimmerDevice>, Box<dyn std::error::Error>> {
    let devices = survey(Duration::from_secs(duration_secs))
        .await?
        .into_iter()
        .map(|(peripheral, name, rssi)| {
            let name = name.unwrap_or_else(|| "Unknown".to_string());
            DimmerDevice {
                is_dimmer: is_dimmer_name(&name),
                address: peripheral.address().to_string(),
                name,
                rssi,
            }
        })
        .collect();
    Ok(devices)
}

/// True if a peripheral is the one asked for, or any receiver when no
/// target is given
fn is_target(target: Option<&str>, name: &str, address: &str) -> bool {
    match target {
        Some(t) => name.contains(t) || address.contains(t),
        None => is_dimmer_name(name),
    }
}

/// Find a receiver by name/address pattern, or find any receiver
pub async fn find_device(target: Option<&str>) -> Result<Peripheral, Box<dyn std::error::Error>> {
    for (peripheral, name, _) in survey(Duration::from_secs(5)).await? {
        let name = name.unwrap_or_default();
        let address = peripheral.address().to_string();
        if is_target(target, &name, &address) {
            info!("Found device: {name} ({address})");
            return Ok(peripheral);
        }
    }
    Err("No Dimmer device found".into())
}

/// Connect, discover services and look up one characteristic
async fn connect_characteristic(
    target: Option<&str>,
    uuid: &str,
) -> Result<(Peripheral, Characteristic), Box<dyn std::error::Error>> {
    let device = find_device(target).await?;

    device.connect().await?;
    device.discover_services().await?;

    let uuid = parse_uuid(uuid)?;
    let characteristic = device
        .characteristics()
        .into_iter()
        .find(|c| c.uuid == uuid)
        .ok_or_else(|| format!("characteristic {uuid} not found"))?;

    Ok((device, characteristic))
}

/// Write one byte to the special-op characteristic
///
/// # Arguments
/// * `target` - Device name/address pattern, or None to find any receiver
/// * `byte` - Raw special-op byte
pub async fn send_special_op(target: Option<&str>, byte: u8) -> Result<(), Box<dyn std::error::Error>> {
    let (device, special_op_char) = connect_characteristic(target, SPECIAL_OP_UUID).await?;

    info!("Writing special-op 0x{byte:02x}");
    device.write(&special_op_char, &[byte], WriteType::WithResponse).await?;

    // A matching password resets the device, which drops the link itself
    let _ = device.disconnect().await;
    Ok(())
}

/// Reboot a receiver into its DFU bootloader
///
/// # Arguments
/// * `target` - Device name/address pattern, or None to find any receiver
pub async fn trigger_firmware_update(target: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    send_special_op(target, special_op::DFU_PASSWORD).await
}
