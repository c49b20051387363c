//! Radio abstraction and the events it delivers
//!
//! Service UUIDs and special-op bytes live in dimmer_proto::ble.

pub use dimmer_proto::ble::{DEVICE_NAME_PREFIX, SERVICE_UUID, SPECIAL_OP_UUID, special_op};

/// Event delivered by the BLE stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioEvent {
    /// Advertising ran for its configured duration and stopped
    AdvertisingTimeout,
    /// A central wrote the special-op characteristic
    SpecialOp(u8),
    /// A scan observed an advertising payload byte
    Scan(u8),
    /// A central connected
    Connected,
    /// The central disconnected
    Disconnected,
}

/// Trait for the BLE peripheral/observer stack
///
/// MCU-specific crates implement this trait using their BLE stack
/// (SoftDevice on nRF, NimBLE on ESP32, ...).
pub trait Radio {
    /// Error type for radio operations
    type Error;

    /// Bring up the stack, GAP parameters and the dimmer GATT service
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Start connectable advertising
    fn start_advertising(&mut self) -> Result<(), Self::Error>;

    /// Start passive scanning for gesture beacons
    fn start_scanning(&mut self) -> Result<(), Self::Error>;
}
