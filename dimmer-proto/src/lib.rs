//! Dimmer wire protocol - advertising byte layout and presets
//!
//! A remote beacon broadcasts a single byte in its advertising data. The high
//! nibble selects the category, the low nibble names a gesture, and each
//! gesture maps to one entry of the preset table.

pub mod ble;
pub mod preset;

pub use preset::{lookup, Level, Preset, Rgbw};

// Advertising byte layout
pub const CATEGORY_MASK: u8 = 0xF0;
pub const INDEX_MASK: u8 = 0x0F;

/// The only category this receiver reacts to
pub const CATEGORY_GESTURE: u8 = 0x10;

/// Number of meaningful gesture indices (0x0..=0xB)
pub const NUM_GESTURES: usize = 12;

/// Gesture carried in the low nibble of a `0x1_` advertising byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    XUp,
    XDown,
    XRotRight,
    XRotLeft,
    YUp,
    YDown,
    YRotRight,
    YRotLeft,
    ZUp,
    ZDown,
    ZRotRight,
    ZRotLeft,
}

impl Gesture {
    pub const ALL: [Gesture; NUM_GESTURES] = [
        Gesture::XUp,
        Gesture::XDown,
        Gesture::XRotRight,
        Gesture::XRotLeft,
        Gesture::YUp,
        Gesture::YDown,
        Gesture::YRotRight,
        Gesture::YRotLeft,
        Gesture::ZUp,
        Gesture::ZDown,
        Gesture::ZRotRight,
        Gesture::ZRotLeft,
    ];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Advertising byte a beacon sends for this gesture
    pub fn to_byte(self) -> u8 {
        CATEGORY_GESTURE | self.index()
    }

    /// Preset applied when this gesture is observed
    pub fn preset(self) -> Preset {
        // every gesture index is inside the table
        lookup(self.index()).unwrap_or(Preset::Reserved)
    }

    pub fn label(self) -> &'static str {
        match self {
            Gesture::XUp => "X UP",
            Gesture::XDown => "X DOWN",
            Gesture::XRotRight => "X ROT R",
            Gesture::XRotLeft => "X ROT L",
            Gesture::YUp => "Y UP",
            Gesture::YDown => "Y DOWN",
            Gesture::YRotRight => "Y ROT R",
            Gesture::YRotLeft => "Y ROT L",
            Gesture::ZUp => "Z UP",
            Gesture::ZDown => "Z DOWN",
            Gesture::ZRotRight => "Z ROT R",
            Gesture::ZRotLeft => "Z ROT L",
        }
    }
}

/// Why an advertising byte was not turned into a gesture
///
/// Neither case is a fault: the advertising channel is shared, so foreign and
/// malformed payloads are expected and simply dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    /// High nibble is not [`CATEGORY_GESTURE`]
    Category(u8),
    /// Low nibble is past the end of the preset table
    Index(u8),
}

/// Split an advertising byte into its gesture
pub fn parse_advertising_byte(byte: u8) -> Result<Gesture, Rejected> {
    let category = byte & CATEGORY_MASK;
    if category != CATEGORY_GESTURE {
        return Err(Rejected::Category(category));
    }

    let index = byte & INDEX_MASK;
    Gesture::from_index(index).ok_or(Rejected::Index(index))
}
