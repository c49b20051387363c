//! Two-context simulation of the receiver
//!
//! A tokio task plays the BLE stack: it walks the script, sends radio events
//! over a channel and raises advertising timeouts straight through the shared
//! flag. The caller's task plays the main loop: it dispatches events and calls
//! `run()` on every tick.

use std::time::Duration;

use dimmer_mcu::{AdvTimeout, Dimmer, RadioEvent};
use log::*;
use tokio::sync::mpsc;

use crate::script::Step;
use crate::sim::{ConsoleLed, SimBootloader, SimRadio};
use crate::store::FileStorage;

pub type SimDimmer = Dimmer<SimRadio, FileStorage, ConsoleLed, SimBootloader>;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Events dispatched by the main loop
    pub events: usize,
    /// The special-op password was accepted
    pub reset: bool,
}

pub async fn run(
    dimmer: &mut SimDimmer,
    steps: Vec<Step>,
    tick: Duration,
) -> Result<Outcome, Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::channel(16);
    let radio = tokio::spawn(play(steps, tx, dimmer.adv_timeout()));

    let mut outcome = Outcome::default();
    let mut ticker = tokio::time::interval(tick);

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                dimmer.handle_event(event)?;
                outcome.events += 1;

                if dimmer.bootloader().reset_requested() {
                    outcome.reset = true;
                    break;
                }
            }
            _ = ticker.tick() => dimmer.run()?,
        }
    }

    if outcome.reset {
        radio.abort();
        info!("Device reset into bootloader, stopping");
    } else {
        radio.await?;
        // Pick up a timeout raised after the last event
        dimmer.run()?;
    }

    Ok(outcome)
}

async fn play(steps: Vec<Step>, tx: mpsc::Sender<RadioEvent>, timeout: AdvTimeout) {
    for step in steps {
        match step {
            Step::Sleep(d) => tokio::time::sleep(d).await,
            Step::Event(RadioEvent::AdvertisingTimeout) => timeout.notify(),
            Step::Event(event) => {
                if tx.send(event).await.is_err() {
                    // main loop is gone (reset)
                    return;
                }
            }
        }
    }
}
