//! Async service glue.
//!
//! # Architecture
//!
//! Three call contexts touch the machine and must never overlap:
//!
//! 1. The edge/interrupt context only *signals* — [`MachineEvents`] wraps
//!    two single-slot [`Signal`]s, so signalling is non-blocking and a second
//!    pending trigger coalesces with one already scheduled.
//! 2. The deferred-work context is [`jack_service`]: one loop, one evaluate
//!    at a time, behind the shared machine mutex.
//! 3. The stream-control context calls the `CodecMachine::on_*` entry points
//!    through the same mutex.
//!
//! A resume re-evaluation waits out a settle window first; resumes arriving
//! inside the window are absorbed by the pending signal instead of queueing
//! a second evaluation.

use embassy_futures::join::join;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::Timer;

use platform::{
    CodecControl, EventSink, HeadsetHook, HostDai, JackDetect, MasterClock, StateIndicator,
    TerminalControl,
};

use crate::CodecMachine;

/// Coalescing event inputs to the machine services.
///
/// Declare one as a `static` and hand it to the ISR/transport glue; both
/// entry points are synchronous and safe from any context.
pub struct MachineEvents {
    jack: Signal<CriticalSectionRawMutex, ()>,
    resume: Signal<CriticalSectionRawMutex, ()>,
}

impl MachineEvents {
    /// Create both event slots empty.
    pub const fn new() -> Self {
        Self {
            jack: Signal::new(),
            resume: Signal::new(),
        }
    }

    /// Entry point for debounced jack-pin edge events. Non-blocking;
    /// callable from interrupt context.
    pub fn pin_changed(&self) {
        self.jack.signal(());
    }

    /// Request a post-resume jack re-evaluation. Non-blocking; a request
    /// inside a pending settle window coalesces with it.
    pub fn resume_requested(&self) {
        self.resume.signal(());
    }
}

impl Default for MachineEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Deferred-work loop: one serialized jack evaluation per pin-change event.
///
/// Waits for a [`MachineEvents::pin_changed`] signal, lets the level settle
/// for the configured debounce window (edges inside the window coalesce),
/// then runs a single evaluate.
pub async fn jack_service<P, C, D, M, H, I, E, K>(
    events: &MachineEvents,
    machine: &Mutex<CriticalSectionRawMutex, CodecMachine<'_, P, C, D, M, H, I, E, K>>,
) where
    P: JackDetect,
    C: CodecControl,
    D: TerminalControl,
    M: MasterClock,
    H: HostDai,
    I: StateIndicator,
    E: EventSink,
    K: HeadsetHook,
{
    let debounce = machine.lock().await.config().debounce;
    loop {
        events.jack.wait().await;
        Timer::after(debounce).await;
        // Bounces during the settle window fold into this evaluation.
        events.jack.reset();
        machine.lock().await.evaluate_jack(false).await;
    }
}

/// Resume loop: one forced jack evaluation per settle window.
///
/// Pin state is not guaranteed valid until a stable period after device
/// resume, so the evaluation is delayed by the configured settle window; a
/// second resume inside the window replaces the pending one.
pub async fn resume_service<P, C, D, M, H, I, E, K>(
    events: &MachineEvents,
    machine: &Mutex<CriticalSectionRawMutex, CodecMachine<'_, P, C, D, M, H, I, E, K>>,
) where
    P: JackDetect,
    C: CodecControl,
    D: TerminalControl,
    M: MasterClock,
    H: HostDai,
    I: StateIndicator,
    E: EventSink,
    K: HeadsetHook,
{
    let settle = machine.lock().await.config().resume_settle;
    loop {
        events.resume.wait().await;
        Timer::after(settle).await;
        events.resume.reset();
        machine.lock().await.evaluate_jack(true).await;
    }
}

/// Run both machine services concurrently. Never returns.
pub async fn run<P, C, D, M, H, I, E, K>(
    events: &MachineEvents,
    machine: &Mutex<CriticalSectionRawMutex, CodecMachine<'_, P, C, D, M, H, I, E, K>>,
) where
    P: JackDetect,
    C: CodecControl,
    D: TerminalControl,
    M: MasterClock,
    H: HostDai,
    I: StateIndicator,
    E: EventSink,
    K: HeadsetHook,
{
    join(jack_service(events, machine), resume_service(events, machine)).await;
}
