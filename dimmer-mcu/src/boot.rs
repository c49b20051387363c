//! Firmware-update trigger
//!
//! A central writes one byte to the special-op characteristic. If it matches
//! the DFU password the device flags the bootloader and resets into it.

use dimmer_proto::ble::special_op::{BOOTLOADER_DFU_START, DFU_PASSWORD};
use log::*;

/// Trait for entering the secondary bootloader
///
/// MCU-specific crates implement this with a retention register that
/// survives soft reset (GPREGRET on nRF, RTC memory on ESP32) and the
/// core's system reset.
pub trait Bootloader {
    /// Write the value checked by the bootloader on the next boot
    fn set_retention(&mut self, value: u8);

    /// Reset the system. Does not return on hardware.
    fn system_reset(&mut self);
}

/// Handle a write to the special-op characteristic
///
/// Returns true if the password matched and a reset was requested. Any other
/// byte is ignored.
pub fn handle_special_op<B: Bootloader>(boot: &mut B, byte: u8) -> bool {
    if byte != DFU_PASSWORD {
        debug!("special-op: ignoring 0x{byte:02x}");
        return false;
    }

    warn!("special-op: DFU password accepted, rebooting into bootloader");
    boot.set_retention(BOOTLOADER_DFU_START);
    boot.system_reset();
    true
}
