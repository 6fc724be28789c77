//! Jack state machine.
//!
//! Converts debounced jack-detect pin samples into the discrete
//! [`HeadsetState`], asking the codec for microphone presence when something
//! is plugged in. This module owns the current state exclusively — nothing
//! else in the crate assigns it.
//!
//! Failure policy: a pin read error aborts the evaluation with the state
//! unchanged; a mic-probe error degrades to "no microphone". Neither is
//! propagated past a log line.

use platform::{CodecControl, HeadsetState, JackDetect};

/// Pin-sample driven headset state machine.
pub struct JackStateMachine {
    state: HeadsetState,
    invert: bool,
}

impl JackStateMachine {
    /// Create the state machine in the default `Absent` state.
    ///
    /// `invert` flips the pin polarity: when `true`, a low level means
    /// inserted.
    pub fn new(invert: bool) -> Self {
        Self {
            state: HeadsetState::Absent,
            invert,
        }
    }

    /// Current headset state.
    pub fn state(&self) -> HeadsetState {
        self.state
    }

    /// Sample the pin and recompute the headset state.
    ///
    /// Returns `Some(state)` when the caller must sync routing and broadcast
    /// a notification: either the state changed, or `forced` is set (resume
    /// re-evaluation and the initial evaluation report unconditionally).
    /// Returns `None` on an unchanged reading, on a pin read failure, and
    /// permanently on products without a detect pin.
    ///
    /// The stored state is updated on every successful sample, even when
    /// unchanged, so external readers always see the last sampled value.
    pub async fn evaluate<P, C>(&mut self, pin: &mut P, codec: &mut C, forced: bool) -> Option<HeadsetState>
    where
        P: JackDetect,
        C: CodecControl,
    {
        if !pin.is_wired() {
            return None;
        }

        let level = match pin.read_level().await {
            Ok(level) => level,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("jack pin read failed, keeping state {}", self.state);
                return None;
            }
        };
        let inserted = level != self.invert;

        let next = if inserted {
            match codec.probe_mic_present().await {
                Ok(true) => HeadsetState::HeadsetWithMic,
                Ok(false) => HeadsetState::HeadsetWithoutMic,
                // Probe failure must never promote to "with mic".
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("mic presence probe failed, assuming no microphone");
                    HeadsetState::HeadsetWithoutMic
                }
            }
        } else {
            HeadsetState::Absent
        };

        let changed = next != self.state;
        self.state = next;

        (changed || forced).then_some(next)
    }
}
