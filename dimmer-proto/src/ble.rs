//! BLE GATT Service Protocol Constants for the Dimmer receiver
//!
//! The receiver scans for gesture beacons and, in parallel, advertises a
//! connectable GATT service that carries the firmware-update trigger.

/// BLE Service UUID: d1a30000-7c2e-4b1e-9a55-000000000000
pub const SERVICE_UUID: &str = "d1a30000-7c2e-4b1e-9a55-000000000000";

/// Special operation Characteristic UUID (write, 1 byte)
pub const SPECIAL_OP_UUID: &str = "d1a30001-7c2e-4b1e-9a55-000000000000";

/// Advertised local name prefix
pub const DEVICE_NAME_PREFIX: &str = "Dimmer";

/// Special operation bytes
pub mod special_op {
    /// Password written to the special-op characteristic to reboot into
    /// the DFU bootloader.
    ///
    /// A single static byte with no replay protection. It keeps stray
    /// writes from rebooting the device and nothing more.
    pub const DFU_PASSWORD: u8 = 0xA9;

    /// Retention register value the bootloader checks after reset
    pub const BOOTLOADER_DFU_START: u8 = 0xB1;
}
