//! Dimmer BLE Controller
//!
//! BLE client for finding Dimmer receivers and sending special operations.
//!
//! # Example
//!
//! ```ignore
//! use dimmer_ble_controller::ble;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Scan for devices
//!     let devices = ble::scan(5).await?;
//!     for device in &devices {
//!         println!("{} ({})", device.name, device.address);
//!     }
//!
//!     // Reboot the first receiver found into its DFU bootloader
//!     ble::trigger_firmware_update(None).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod ble;
