//! Stream lifecycle control.
//!
//! Reacts to open/close/parameter-negotiation/trigger events from the audio
//! transport, driving the clock sequencer. Both stream directions share one
//! codec link, so the master clock follows the first open and the last
//! close; everything in between is reference counting.

use platform::{
    CodecControl, HostDai, MachineError, MasterClock, StreamDirection, TdmSlots, TriggerCommand,
};

use crate::clocking::ClockSequencer;

/// Lifecycle phase of the codec link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamPhase {
    /// No stream open.
    Idle,
    /// At least one direction open, parameters not yet negotiated.
    Open,
    /// Link clocking programmed for a negotiated rate.
    Configured,
    /// Stream running.
    Active,
}

fn direction_bit(direction: StreamDirection) -> u8 {
    match direction {
        StreamDirection::Playback => 0b01,
        StreamDirection::Capture => 0b10,
    }
}

/// Per-link stream lifecycle state machine.
pub struct StreamLifecycle {
    phase: StreamPhase,
    open_directions: u8,
}

impl StreamLifecycle {
    /// Create the lifecycle in the idle phase with no direction open.
    pub fn new() -> Self {
        Self {
            phase: StreamPhase::Idle,
            open_directions: 0,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    /// Whether the given direction is currently open.
    pub fn is_open(&self, direction: StreamDirection) -> bool {
        self.open_directions & direction_bit(direction) != 0
    }

    /// Open one stream direction. Idempotent per direction; the master
    /// clock is acquired once per distinct open direction.
    pub async fn on_open<M: MasterClock>(
        &mut self,
        direction: StreamDirection,
        clocks: &mut ClockSequencer,
        mclk: &mut M,
    ) -> Result<(), MachineError> {
        let bit = direction_bit(direction);
        if self.open_directions & bit != 0 {
            return Ok(());
        }
        clocks.acquire(mclk).await?;
        self.open_directions |= bit;
        if self.phase == StreamPhase::Idle {
            self.phase = StreamPhase::Open;
        }
        Ok(())
    }

    /// Close one stream direction. The clock reference is dropped per open
    /// direction; the link returns to idle when the last one closes.
    pub async fn on_close<M: MasterClock>(
        &mut self,
        direction: StreamDirection,
        clocks: &mut ClockSequencer,
        mclk: &mut M,
    ) -> Result<(), MachineError> {
        let bit = direction_bit(direction);
        if self.open_directions & bit == 0 {
            return Ok(());
        }
        clocks.release(mclk).await?;
        self.open_directions &= !bit;
        if self.open_directions == 0 {
            self.phase = StreamPhase::Idle;
        }
        Ok(())
    }

    /// Apply negotiated stream parameters: select TDM slots for the channel
    /// count, then program the link clocking for the rate.
    ///
    /// A [`MachineError::Config`] failure is not retryable within this
    /// stream; the link falls back to idle and the open must fail.
    pub async fn on_params<H, C>(
        &mut self,
        channels: u8,
        rate_hz: u32,
        clocks: &mut ClockSequencer,
        host: &mut H,
        codec: &mut C,
    ) -> Result<(), MachineError>
    where
        H: HostDai,
        C: CodecControl,
    {
        let slots = TdmSlots::for_channels(channels);
        if let Err(_e) = host.set_tdm_slots(slots).await {
            self.phase = StreamPhase::Idle;
            return Err(MachineError::Config);
        }
        match clocks.program(rate_hz, host, codec).await {
            Ok(()) => {
                self.phase = StreamPhase::Configured;
                Ok(())
            }
            Err(err) => {
                self.phase = StreamPhase::Idle;
                Err(err)
            }
        }
    }

    /// Handle a transport trigger command.
    ///
    /// Returns `true` when the caller should schedule a jack re-evaluation
    /// (resume only — pin state needs a settle period before it is valid).
    pub fn on_trigger(&mut self, command: TriggerCommand) -> bool {
        match command {
            TriggerCommand::Start => {
                if self.phase == StreamPhase::Configured {
                    self.phase = StreamPhase::Active;
                }
                false
            }
            TriggerCommand::Stop => {
                if self.phase == StreamPhase::Active {
                    self.phase = StreamPhase::Configured;
                }
                false
            }
            TriggerCommand::Resume => true,
        }
    }
}

impl Default for StreamLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
