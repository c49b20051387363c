//! Persistent Storage Abstraction Traits
//!
//! Traits for the non-volatile record holding the default lighting settings.

/// Length of the persisted record
pub const RECORD_LEN: usize = 8;

/// Default fade percentage
pub const DEFAULT_FADE_PERCENT: u8 = 10;

/// Filler for bytes with no assigned meaning
pub const RESERVED_FILL: u8 = 0xFF;

/// The persisted settings record
///
/// Byte 0 is the fade percentage, bytes 1..8 are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRecord([u8; RECORD_LEN]);

impl MemoryRecord {
    /// Seed written on first boot
    pub const DEFAULT: MemoryRecord = MemoryRecord([
        DEFAULT_FADE_PERCENT,
        RESERVED_FILL,
        RESERVED_FILL,
        RESERVED_FILL,
        RESERVED_FILL,
        RESERVED_FILL,
        RESERVED_FILL,
        RESERVED_FILL,
    ]);

    pub const fn from_bytes(bytes: [u8; RECORD_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; RECORD_LEN] {
        &self.0
    }

    pub fn fade_percent(&self) -> u8 {
        self.0[0]
    }

    pub fn reserved(&self) -> &[u8] {
        &self.0[1..]
    }
}

impl Default for MemoryRecord {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Trait for persistent storage operations
///
/// MCU-specific crates implement this trait using their storage backend
/// (pstorage on nRF51, NVS for ESP32, ...).
pub trait Storage {
    /// Error type for storage operations
    type Error;

    /// Open the store, writing `defaults` if it has never been initialized.
    ///
    /// May return while the write is still in flight; see [`Storage::is_busy`].
    fn init(&mut self, defaults: &MemoryRecord) -> Result<(), Self::Error>;

    /// True while a flash operation started by `init` is pending
    fn is_busy(&self) -> bool;

    /// Read the persisted record
    fn read(&self) -> Result<MemoryRecord, Self::Error>;
}
