//! Hardware Abstraction Layer (HAL) for the `SoulAudio` headset codec card
//!
//! This crate provides trait-based abstractions for every hardware
//! collaborator the codec machine layer talks to, enabling development and
//! testing without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Machine layer (machine crate — jack / routing / clocking / notify / stream)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (board crate: Embassy HAL + PAC + codec register driver)
//! ```
//!
//! # Abstraction Levels
//!
//! - [`JackDetect`] - Headset jack-detect GPIO (level + edge wait)
//! - [`CodecControl`] - Codec-side control port (mic probe, PLL, sysclk)
//! - [`HostDai`] - Host-side digital audio interface (link mux, dividers, TDM)
//! - [`MasterClock`] - Gated codec master clock
//! - [`TerminalControl`] - Analog routing endpoints (enable/disable + commit)
//! - [`StateIndicator`] / [`EventSink`] / [`HeadsetHook`] - Notification sinks
//!
//! # Features
//!
//! - `std`: expose the [`mocks`] module to downstream host tests
//! - `defmt`: enable defmt::Format derives on all platform types

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
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // register and signal names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod clock;
pub mod codec;
pub mod config;
pub mod dai;
pub mod error;
pub mod jack;
pub mod notify;
pub mod routing;
pub mod types;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

// Re-export main traits
pub use clock::MasterClock;
pub use codec::CodecControl;
pub use dai::{
    ClockDivider, DaiClockPolarity, DaiClockProvider, DaiFormat, DaiInterfaceFormat, HostDai,
    TdmSlots,
};
pub use jack::{EdgePin, JackDetect, NotWired};
pub use notify::{EventSink, HeadsetHook, NoHook, StateIndicator};
pub use routing::TerminalControl;

// Re-export shared types
pub use config::MachineConfig;
pub use error::MachineError;
pub use types::{HeadsetState, StreamDirection, TriggerCommand};
