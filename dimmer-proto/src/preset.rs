//! Lighting preset table

/// Channel intensities in percent (0..=100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgbw {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub white: u8,
}

impl Rgbw {
    pub const OFF: Rgbw = Rgbw::uniform(0);

    pub const fn new(red: u8, green: u8, blue: u8, white: u8) -> Self {
        Self { red, green, blue, white }
    }

    /// Same intensity on every channel
    pub const fn uniform(percent: u8) -> Self {
        Self::new(percent, percent, percent, percent)
    }

    pub fn as_array(&self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.white]
    }
}

/// Brightness steps of the uniform ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    GoodNight,
    Low,
    MidLow,
    MidHigh,
    High,
}

impl Level {
    pub const fn percent(self) -> u8 {
        match self {
            Level::GoodNight => 10,
            Level::Low => 25,
            Level::MidLow => 50,
            Level::MidHigh => 75,
            Level::High => 100,
        }
    }
}

/// One entry of the preset table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every channel dark
    AllOff,
    /// Every channel at the same ramp level
    Ramp(Level),
    /// Index with no assigned meaning yet; lights nothing
    Reserved,
}

impl Preset {
    pub const fn channels(self) -> Rgbw {
        match self {
            Preset::Ramp(level) => Rgbw::uniform(level.percent()),
            Preset::AllOff | Preset::Reserved => Rgbw::OFF,
        }
    }

    pub fn is_reserved(self) -> bool {
        matches!(self, Preset::Reserved)
    }
}

/// Presets indexed by the low nibble of a gesture advertising byte
const PRESETS: [Preset; crate::NUM_GESTURES] = [
    Preset::Ramp(Level::GoodNight),
    Preset::Ramp(Level::Low),
    Preset::Reserved,
    Preset::Reserved,
    Preset::Ramp(Level::MidLow),
    Preset::Ramp(Level::MidHigh),
    Preset::Reserved,
    Preset::Reserved,
    Preset::Ramp(Level::High),
    Preset::AllOff,
    Preset::Reserved,
    Preset::Reserved,
];

/// Look up a preset by table index
pub fn lookup(index: u8) -> Option<Preset> {
    PRESETS.get(index as usize).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_past_end() {
        assert_eq!(lookup(12), None);
        assert_eq!(lookup(0xFF), None);
    }

    #[test]
    fn ramp_indices() {
        let ramp: Vec<(u8, u8)> = (0..12)
            .filter_map(|i| match lookup(i)? {
                Preset::Ramp(level) => Some((i, level.percent())),
                _ => None,
            })
            .collect();
        assert_eq!(ramp, vec![(0, 10), (1, 25), (4, 50), (5, 75), (8, 100)]);
    }

    #[test]
    fn dark_indices() {
        for i in [2, 3, 6, 7, 9, 10, 11] {
            assert_eq!(lookup(i).unwrap().channels(), Rgbw::OFF, "index {i}");
        }
        assert_eq!(lookup(9), Some(Preset::AllOff));
        assert!(lookup(10).unwrap().is_reserved());
    }

    #[test]
    fn channels_stay_in_percent_range() {
        for preset in PRESETS {
            assert!(preset.channels().as_array().iter().all(|c| *c <= 100));
        }
    }
}
