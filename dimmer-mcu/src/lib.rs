//! Dimmer MCU Library
//!
//! Control logic for a BLE gesture receiver driving an RGBW LED strip.
//!
//! This crate provides:
//! - Traits for the radio, persistent storage, LED strip and bootloader
//! - The advertising decoder and the firmware-update trigger
//! - [`Dimmer`], the lifecycle controller tying them together
//!
//! MCU-specific crates implement the traits on top of their BLE stack, flash
//! driver and PWM peripheral, then feed radio events into [`Dimmer`] and call
//! [`Dimmer::run`] from the main loop.
//!
//! # Example
//!
//! ```ignore
//! let mut dimmer = Dimmer::new(radio, storage, led, bootloader, DimmerConfig::default());
//! dimmer.init()?;
//!
//! // hand this to the radio event callback
//! let timeout = dimmer.adv_timeout();
//!
//! loop {
//!     dimmer.run()?;
//! }
//! ```

pub mod app;
pub mod ble;
pub mod boot;
pub mod error;
pub mod led;
pub mod scan;
pub mod storage;

#[cfg(test)]
mod mock;

pub use app::{AdvTimeout, Dimmer, DimmerConfig, Lifecycle};
pub use ble::{Radio, RadioEvent};
pub use boot::{handle_special_op, Bootloader};
pub use error::Error;
pub use led::LedStrip;
pub use scan::decode_and_apply;
pub use storage::{MemoryRecord, Storage};

pub use dimmer_proto::{Gesture, Preset, Rgbw};
