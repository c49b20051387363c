//! LED strip abstraction

use dimmer_proto::Rgbw;

/// Trait for the RGBW strip driver
///
/// MCU-specific crates implement this trait on top of their PWM peripheral.
pub trait LedStrip {
    /// Error type for driver bring-up
    type Error;

    /// Configure PWM channels and GPIOs
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Drive all four channels, each a percentage in 0..=100
    fn set_channels(&mut self, channels: Rgbw);

    /// Periodic light management tick (animated transitions).
    ///
    /// Called from the main loop only when enabled in `DimmerConfig`.
    fn manage_light(&mut self) {}
}
