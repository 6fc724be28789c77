//! Codec machine layer for the `SoulAudio` headset card
//!
//! Runtime control of an RT5625-class headset codec hanging off the host's
//! serial audio link: jack insertion/removal detection, analog routing
//! updates, master-clock/PLL sequencing for active streams, and jack-state
//! notification fan-out.
//!
//! # Data flow
//!
//! ```text
//! pin edge ──▶ MachineEvents ──▶ jack_service ──▶ JackStateMachine
//!                                                   │ state change
//!                                      ┌────────────┴────────────┐
//!                                      ▼                         ▼
//!                                RoutingGraph            NotificationDispatcher
//!
//! transport events ──▶ CodecMachine::on_* ──▶ StreamLifecycle ──▶ ClockSequencer
//!                                 │ resume
//!                                 ▼
//!                           resume_service ──▶ forced re-evaluation
//! ```
//!
//! Everything hardware-facing goes through the `platform` traits; the board
//! crate supplies the implementations and this crate never sees a register.

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::doc_markdown)] // signal and terminal names in doc comments
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod clocking;
pub mod jack;
pub mod notify;
pub mod routing;
pub mod stream;
pub mod tasks;

pub use clocking::{ClockSequencer, OVERSAMPLE_RATIO};
pub use jack::JackStateMachine;
pub use notify::NotificationDispatcher;
pub use routing::{Route, RoutingGraph, AUDIO_MAP};
pub use stream::{StreamLifecycle, StreamPhase};
pub use tasks::MachineEvents;

use platform::{
    CodecControl, EventSink, HeadsetHook, HeadsetState, HostDai, JackDetect, MachineConfig,
    MachineError, MasterClock, StateIndicator, StreamDirection, TerminalControl, TriggerCommand,
};

/// Hardware collaborator handles for one codec card.
///
/// Board bring-up constructs the concrete drivers and hands them over in one
/// bundle; the machine owns them for the lifetime of the device.
pub struct CardHardware<P, C, D, M, H> {
    /// Jack-detect pin (or [`platform::NotWired`]).
    pub jack_pin: P,
    /// Codec control port.
    pub codec: C,
    /// Routing terminal controller.
    pub dapm: D,
    /// Gated master clock.
    pub mclk: M,
    /// Host digital audio interface.
    pub dai: H,
}

/// Device context for one codec card.
///
/// Owns the five machine components and every hardware handle; one instance
/// per device, no ambient global state. Serialize access between the
/// deferred-work and stream-control contexts by placing it behind an
/// `embassy_sync::mutex::Mutex` (see [`tasks`]).
pub struct CodecMachine<'e, P, C, D, M, H, I, E, K> {
    config: MachineConfig,
    events: &'e MachineEvents,
    jack_pin: P,
    codec: C,
    dapm: D,
    mclk: M,
    dai: H,
    jack: JackStateMachine,
    routing: RoutingGraph,
    clocks: ClockSequencer,
    notify: NotificationDispatcher<I, E, K>,
    stream: StreamLifecycle,
}

impl<'e, P, C, D, M, H, I, E, K> CodecMachine<'e, P, C, D, M, H, I, E, K>
where
    P: JackDetect,
    C: CodecControl,
    D: TerminalControl,
    M: MasterClock,
    H: HostDai,
    I: StateIndicator,
    E: EventSink,
    K: HeadsetHook,
{
    /// Assemble the machine from configuration and collaborator handles.
    ///
    /// Products without a callback pass [`platform::NoHook`] as `hook`.
    /// Nothing touches hardware until [`init`](CodecMachine::init).
    pub fn new(
        config: MachineConfig,
        events: &'e MachineEvents,
        hardware: CardHardware<P, C, D, M, H>,
        indicator: I,
        event_sink: E,
        hook: K,
    ) -> Self {
        Self {
            events,
            jack_pin: hardware.jack_pin,
            codec: hardware.codec,
            dapm: hardware.dapm,
            mclk: hardware.mclk,
            dai: hardware.dai,
            jack: JackStateMachine::new(config.jack_invert),
            routing: RoutingGraph::new(),
            clocks: ClockSequencer::new(config.sysclk_hz),
            notify: NotificationDispatcher::new(indicator, event_sink, hook),
            stream: StreamLifecycle::new(),
            config,
        }
    }

    /// One-time bring-up: configure the link topology, push the power-on
    /// routing defaults, then sample the pin and publish the initial state.
    pub async fn init(&mut self) -> Result<(), MachineError> {
        self.dai
            .configure_link(self.config.internal_port, self.config.external_port)
            .await
            .map_err(|_e| MachineError::HardwareIo)?;
        self.routing.seed(&mut self.dapm).await?;
        self.evaluate_jack(true).await;
        Ok(())
    }

    /// Sample the jack pin and apply any resulting state change: routing
    /// sync plus notification broadcast. With `forced` set, routing and
    /// notifications run even when the sampled state is unchanged.
    ///
    /// Never fails: detection problems degrade with a log line.
    pub async fn evaluate_jack(&mut self, forced: bool) {
        let Some(state) = self
            .jack
            .evaluate(&mut self.jack_pin, &mut self.codec, forced)
            .await
        else {
            return;
        };

        #[cfg(feature = "defmt")]
        defmt::info!("headset state: {}", state);

        if let Err(_e) = self.routing.sync(state, &mut self.dapm).await {
            #[cfg(feature = "defmt")]
            defmt::warn!("routing sync failed, analog path may lag the jack state");
        }
        self.notify.broadcast(state).await;
    }

    /// Transport entry point: a stream direction was opened.
    pub async fn on_stream_open(&mut self, direction: StreamDirection) -> Result<(), MachineError> {
        self.stream
            .on_open(direction, &mut self.clocks, &mut self.mclk)
            .await
    }

    /// Transport entry point: a stream direction was closed.
    pub async fn on_stream_close(
        &mut self,
        direction: StreamDirection,
    ) -> Result<(), MachineError> {
        self.stream
            .on_close(direction, &mut self.clocks, &mut self.mclk)
            .await
    }

    /// Transport entry point: stream parameters were negotiated.
    ///
    /// A [`MachineError::Config`] result means the device may be misclocked;
    /// the transport must fail the stream open and not retry.
    pub async fn on_params(&mut self, channels: u8, rate_hz: u32) -> Result<(), MachineError> {
        self.stream
            .on_params(channels, rate_hz, &mut self.clocks, &mut self.dai, &mut self.codec)
            .await
    }

    /// Transport entry point: trigger command (start/stop/resume).
    ///
    /// Resume schedules a coalesced, settle-delayed jack re-evaluation when
    /// either detect capability is wired on this product.
    pub fn on_trigger(&mut self, command: TriggerCommand) {
        let reevaluate = self.stream.on_trigger(command);
        if reevaluate && (self.jack_pin.is_wired() || self.config.mic_wired) {
            self.events.resume_requested();
        }
    }

    /// Last sampled headset state.
    pub fn headset_state(&self) -> HeadsetState {
        self.jack.state()
    }

    /// Current stream lifecycle phase.
    pub fn stream_phase(&self) -> StreamPhase {
        self.stream.phase()
    }

    /// Clock sequencer state (reference count, programmed PLL target).
    pub fn clocks(&self) -> &ClockSequencer {
        &self.clocks
    }

    /// Routing graph state (terminal enablement).
    pub fn routing(&self) -> &RoutingGraph {
        &self.routing
    }

    /// Static machine configuration.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// The event inputs this machine listens on.
    pub fn events(&self) -> &'e MachineEvents {
        self.events
    }
}
