//! Receiver lifecycle: startup sequencing and the main loop step

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dimmer_proto::Rgbw;
use log::*;

use crate::{
    decode_and_apply, handle_special_op, Bootloader, Error, LedStrip, MemoryRecord, Radio,
    RadioEvent, Storage,
};

/// Advertising timeout notification shared between the radio event context
/// (single writer) and the main loop (single reader/clearer).
#[derive(Debug, Clone, Default)]
pub struct AdvTimeout(Arc<AtomicBool>);

impl AdvTimeout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that advertising timed out. Safe from any thread.
    pub fn notify(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Clear the flag, returning whether it was set
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Controller options
#[derive(Debug, Clone, Copy, Default)]
pub struct DimmerConfig {
    /// Call [`LedStrip::manage_light`] on every [`Dimmer::run`]
    pub manage_light: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initializing,
    /// Advertising and scanning; re-entered after every timeout
    Active,
}

pub type DimmerResult<R, L> =
    Result<(), Error<<R as Radio>::Error, <L as LedStrip>::Error>>;

/// The receiver application
pub struct Dimmer<R, S, L, B> {
    radio: R,
    storage: S,
    led: L,
    boot: B,
    config: DimmerConfig,
    adv_timeout: AdvTimeout,
    state: Lifecycle,
    settings: MemoryRecord,
    storage_degraded: bool,
}

impl<R, S, L, B> Dimmer<R, S, L, B>
where
    R: Radio,
    S: Storage,
    L: LedStrip,
    B: Bootloader,
    R::Error: std::fmt::Debug,
    S::Error: std::fmt::Debug,
    L::Error: std::fmt::Debug,
{
    pub fn new(radio: R, storage: S, led: L, boot: B, config: DimmerConfig) -> Self {
        Self {
            radio,
            storage,
            led,
            boot,
            config,
            adv_timeout: AdvTimeout::new(),
            state: Lifecycle::Uninitialized,
            settings: MemoryRecord::DEFAULT,
            storage_degraded: false,
        }
    }

    /// Bring up radio, storage and the strip, then start advertising and
    /// scanning.
    ///
    /// Storage failure is not fatal: the receiver keeps going on the default
    /// settings so the strip still lights up.
    pub fn init(&mut self) -> DimmerResult<R, L> {
        self.state = Lifecycle::Initializing;
        info!("Initializing...");

        self.radio.init().map_err(Error::RadioInit)?;
        info!("Radio initialized");

        self.load_settings();

        self.led.init().map_err(Error::LedInit)?;
        info!("LED strip initialized");

        self.radio.start_advertising().map_err(Error::StartAdvertising)?;
        self.radio.start_scanning().map_err(Error::StartScanning)?;
        info!("Advertising and scanning");

        self.state = Lifecycle::Active;
        Ok(())
    }

    fn load_settings(&mut self) {
        if let Err(e) = self.storage.init(&MemoryRecord::DEFAULT) {
            warn!("Storage init failed: {e:?}, using default settings");
            self.storage_degraded = true;
            return;
        }

        // One-time wait for the seed write; nothing time-critical runs yet.
        while self.storage.is_busy() {
            std::hint::spin_loop();
        }

        match self.storage.read() {
            Ok(record) => {
                info!("Loaded settings: fade {}%", record.fade_percent());
                self.settings = record;
            }
            Err(e) => {
                warn!("Storage read failed: {e:?}, using default settings");
                self.storage_degraded = true;
            }
        }
    }

    /// One main loop step
    pub fn run(&mut self) -> DimmerResult<R, L> {
        if self.state != Lifecycle::Active {
            return Ok(());
        }

        if self.adv_timeout.take() {
            debug!("Advertising timed out, re-arming scan");
            self.radio.start_scanning().map_err(Error::StartScanning)?;
        }

        if self.config.manage_light {
            self.led.manage_light();
        }

        Ok(())
    }

    /// Dispatch an event delivered by the radio
    pub fn handle_event(&mut self, event: RadioEvent) -> DimmerResult<R, L> {
        match event {
            RadioEvent::AdvertisingTimeout => self.on_adv_timeout(),
            RadioEvent::SpecialOp(byte) => {
                self.on_special_op(byte);
            }
            RadioEvent::Scan(byte) => {
                self.on_scan(byte);
            }
            RadioEvent::Connected => self.on_connect(),
            RadioEvent::Disconnected => self.on_disconnect()?,
        }
        Ok(())
    }

    pub fn on_scan(&mut self, byte: u8) -> Option<Rgbw> {
        decode_and_apply(&mut self.led, byte)
    }

    pub fn on_special_op(&mut self, byte: u8) -> bool {
        handle_special_op(&mut self.boot, byte)
    }

    pub fn on_adv_timeout(&self) {
        self.adv_timeout.notify();
    }

    pub fn on_connect(&mut self) {
        info!("Central connected");
    }

    /// Restart advertising so the receiver stays discoverable
    pub fn on_disconnect(&mut self) -> DimmerResult<R, L> {
        info!("Central disconnected, advertising again");
        self.radio.start_advertising().map_err(Error::StartAdvertising)
    }

    /// Handle for notifying advertising timeouts from another context
    pub fn adv_timeout(&self) -> AdvTimeout {
        self.adv_timeout.clone()
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    /// Settings in effect: the stored record, or defaults if storage failed
    pub fn settings(&self) -> &MemoryRecord {
        &self.settings
    }

    pub fn storage_degraded(&self) -> bool {
        self.storage_degraded
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn led(&self) -> &L {
        &self.led
    }

    pub fn bootloader(&self) -> &B {
        &self.boot
    }
}
