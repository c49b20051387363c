//! Advertising decoder
//!
//! Runs once per scan observation in the radio event context.

use dimmer_proto::{parse_advertising_byte, Rejected, Rgbw};
use log::*;

use crate::LedStrip;

/// Decode one advertising byte and drive the strip with its preset.
///
/// Returns the channels applied, or `None` when the byte was dropped.
/// Foreign categories and out-of-range indices are expected on a shared
/// advertising channel and are dropped without touching the strip.
pub fn decode_and_apply<L: LedStrip>(led: &mut L, byte: u8) -> Option<Rgbw> {
    let gesture = match parse_advertising_byte(byte) {
        Ok(g) => g,
        Err(Rejected::Category(category)) => {
            debug!("scan: ignoring 0x{byte:02x} (category 0x{category:02x})");
            return None;
        }
        Err(Rejected::Index(index)) => {
            debug!("scan: ignoring 0x{byte:02x} (index {index} out of range)");
            return None;
        }
    };

    let preset = gesture.preset();
    let channels = preset.channels();
    if preset.is_reserved() {
        debug!("scan: {} has no preset assigned, turning off", gesture.label());
    }

    debug!(
        "scan: {} -> R{} G{} B{} W{}",
        gesture.label(),
        channels.red,
        channels.green,
        channels.blue,
        channels.white
    );
    led.set_channels(channels);
    Some(channels)
}
