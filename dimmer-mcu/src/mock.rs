//! Recording collaborators for unit tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::{Bootloader, Dimmer, DimmerConfig, LedStrip, MemoryRecord, Radio, Rgbw, Storage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    RadioInit,
    StartAdvertising,
    StartScanning,
    StorageInit(MemoryRecord),
    StorageRead,
    LedInit,
    SetChannels(Rgbw),
    ManageLight,
    SetRetention(u8),
    SystemReset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockError(pub &'static str);

#[derive(Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn count(&self, call: &Call) -> usize {
        self.0.borrow().iter().filter(|c| *c == call).count()
    }
}

#[derive(Default)]
pub struct MockRadio {
    pub log: CallLog,
    pub fail_init: bool,
    pub fail_advertising: bool,
    pub fail_scanning: bool,
}

impl Radio for MockRadio {
    type Error = MockError;

    fn init(&mut self) -> Result<(), MockError> {
        self.log.push(Call::RadioInit);
        if self.fail_init {
            return Err(MockError("radio init"));
        }
        Ok(())
    }

    fn start_advertising(&mut self) -> Result<(), MockError> {
        self.log.push(Call::StartAdvertising);
        if self.fail_advertising {
            return Err(MockError("advertising"));
        }
        Ok(())
    }

    fn start_scanning(&mut self) -> Result<(), MockError> {
        self.log.push(Call::StartScanning);
        if self.fail_scanning {
            return Err(MockError("scanning"));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MockStorage {
    pub log: CallLog,
    pub fail_init: bool,
    pub fail_read: bool,
    /// Record already in flash before `init`
    pub stored: Option<MemoryRecord>,
    /// Number of `is_busy` calls that report true after `init`
    pub busy_polls: Rc<Cell<u32>>,
    pub polled: Rc<Cell<u32>>,
}

impl Storage for MockStorage {
    type Error = MockError;

    fn init(&mut self, defaults: &MemoryRecord) -> Result<(), MockError> {
        self.log.push(Call::StorageInit(*defaults));
        if self.fail_init {
            return Err(MockError("storage init"));
        }
        if self.stored.is_none() {
            self.stored = Some(*defaults);
        }
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.polled.set(self.polled.get() + 1);
        let remaining = self.busy_polls.get();
        if remaining == 0 {
            return false;
        }
        self.busy_polls.set(remaining - 1);
        true
    }

    fn read(&self) -> Result<MemoryRecord, MockError> {
        self.log.push(Call::StorageRead);
        if self.fail_read {
            return Err(MockError("storage read"));
        }
        self.stored.ok_or(MockError("storage empty"))
    }
}

#[derive(Default)]
pub struct MockLed {
    pub log: CallLog,
    pub fail_init: bool,
}

impl LedStrip for MockLed {
    type Error = MockError;

    fn init(&mut self) -> Result<(), MockError> {
        self.log.push(Call::LedInit);
        if self.fail_init {
            return Err(MockError("led init"));
        }
        Ok(())
    }

    fn set_channels(&mut self, channels: Rgbw) {
        self.log.push(Call::SetChannels(channels));
    }

    fn manage_light(&mut self) {
        self.log.push(Call::ManageLight);
    }
}

#[derive(Default)]
pub struct MockBootloader {
    pub log: CallLog,
}

impl Bootloader for MockBootloader {
    fn set_retention(&mut self, value: u8) {
        self.log.push(Call::SetRetention(value));
    }

    fn system_reset(&mut self) {
        self.log.push(Call::SystemReset);
    }
}

pub type MockDimmer = Dimmer<MockRadio, MockStorage, MockLed, MockBootloader>;

/// A full set of collaborators sharing one call log
pub struct Rig {
    pub log: CallLog,
    pub radio: MockRadio,
    pub storage: MockStorage,
    pub led: MockLed,
    pub boot: MockBootloader,
}

impl Rig {
    pub fn new() -> Self {
        let log = CallLog::default();
        Self {
            radio: MockRadio { log: log.clone(), ..Default::default() },
            storage: MockStorage { log: log.clone(), ..Default::default() },
            led: MockLed { log: log.clone(), ..Default::default() },
            boot: MockBootloader { log: log.clone() },
            log,
        }
    }

    pub fn build(self, config: DimmerConfig) -> (MockDimmer, CallLog) {
        let dimmer = Dimmer::new(self.radio, self.storage, self.led, self.boot, config);
        (dimmer, self.log)
    }

    /// Build and run `init`, discarding the startup calls from the log
    pub fn started(self) -> (MockDimmer, CallLog) {
        let (mut dimmer, log) = self.build(DimmerConfig::default());
        dimmer.init().unwrap();
        log.take();
        (dimmer, log)
    }
}
