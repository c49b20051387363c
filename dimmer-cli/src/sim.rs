//! Host stand-ins for the receiver's radio, LED strip and bootloader

use std::convert::Infallible;
use std::path::PathBuf;

use dimmer_mcu::{Bootloader, LedStrip, Radio, Rgbw};
use log::*;

/// Radio that only reports what the BLE stack would have been asked to do
#[derive(Debug, Default)]
pub struct SimRadio {
    pub advertising_starts: u32,
    pub scan_starts: u32,
}

impl Radio for SimRadio {
    type Error = Infallible;

    fn init(&mut self) -> Result<(), Infallible> {
        info!("[RADIO] stack up, service {}", dimmer_mcu::ble::SERVICE_UUID);
        Ok(())
    }

    fn start_advertising(&mut self) -> Result<(), Infallible> {
        self.advertising_starts += 1;
        info!("[RADIO] advertising (#{})", self.advertising_starts);
        Ok(())
    }

    fn start_scanning(&mut self) -> Result<(), Infallible> {
        self.scan_starts += 1;
        info!("[RADIO] scanning (#{})", self.scan_starts);
        Ok(())
    }
}

/// Strip that keeps the last channel values and prints each change
#[derive(Debug, Default)]
pub struct ConsoleLed {
    pub channels: Rgbw,
    pub updates: u32,
    pub ticks: u32,
}

impl LedStrip for ConsoleLed {
    type Error = Infallible;

    fn init(&mut self) -> Result<(), Infallible> {
        self.channels = Rgbw::OFF;
        info!("[LED] strip initialized");
        Ok(())
    }

    fn set_channels(&mut self, channels: Rgbw) {
        self.channels = channels;
        self.updates += 1;
        info!("[LED] {}", describe(channels));
    }

    fn manage_light(&mut self) {
        self.ticks += 1;
    }
}

/// Bootloader whose retention register is a file under the home directory
#[derive(Debug)]
pub struct SimBootloader {
    retention_path: PathBuf,
    reset_requested: bool,
}

impl SimBootloader {
    pub fn new(retention_path: PathBuf) -> Self {
        Self {
            retention_path,
            reset_requested: false,
        }
    }

    pub fn reset_requested(&self) -> bool {
        self.reset_requested
    }
}

impl Bootloader for SimBootloader {
    fn set_retention(&mut self, value: u8) {
        match std::fs::write(&self.retention_path, [value]) {
            Ok(()) => info!(
                "[BOOT] retention 0x{value:02x} -> {}",
                self.retention_path.display()
            ),
            Err(e) => error!(
                "[BOOT] failed to write {}: {e}",
                self.retention_path.display()
            ),
        }
    }

    fn system_reset(&mut self) {
        warn!("[BOOT] system reset requested");
        self.reset_requested = true;
    }
}

/// `R 100 G 100 B 100 W 100 |##########|`
pub fn describe(channels: Rgbw) -> String {
    let level = channels.as_array().iter().map(|c| *c as usize).max().unwrap_or(0);
    let bar = "#".repeat(level / 10);
    format!(
        "R{:>4} G{:>4} B{:>4} W{:>4} |{:<10}|",
        channels.red, channels.green, channels.blue, channels.white, bar
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_full_and_off() {
        assert_eq!(
            describe(Rgbw::uniform(100)),
            "R 100 G 100 B 100 W 100 |##########|"
        );
        assert_eq!(describe(Rgbw::OFF), "R   0 G   0 B   0 W   0 |          |");
        assert_eq!(describe(Rgbw::uniform(25)), "R  25 G  25 B  25 W  25 |##        |");
    }

    #[test]
    fn retention_lands_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("retention");
        let mut boot = SimBootloader::new(path.clone());

        boot.set_retention(0xB1);
        assert!(!boot.reset_requested());
        boot.system_reset();

        assert!(boot.reset_requested());
        assert_eq!(std::fs::read(path).unwrap(), vec![0xB1]);
    }
}
